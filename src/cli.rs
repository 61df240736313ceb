// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use clap::{Parser, Subcommand};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(author = "Kirky.X", version, about = "Download decks from www.mtgtop8.com", long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines (overrides telemetry.json).
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run a search in-process and print the decks as JSON.
    Local {
        /// Search template, e.g. '{"format": "MO", "date_start": "25/09/2021", "date_end": "27/09/2021"}'
        #[arg(short, long)]
        payload: String,

        /// Number of pages downloaded concurrently (defaults to workers.local_parallelism).
        #[arg(short = 'n', long = "parallelism")]
        parallelism: Option<usize>,

        /// Also archive every deck in the configured storage.
        #[arg(long)]
        store: bool,
    },

    /// Queue one message per results page. Without a payload, the next range is derived from the query registry.
    Produce {
        #[arg(short, long)]
        payload: Option<String>,
    },

    /// Run consumer and archiver loops until Ctrl-C.
    Consume,

    /// Serve the HTTP submission API.
    Serve,
}
