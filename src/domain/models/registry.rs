// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::models::query::SearchTemplate;

/// 模板的提交方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// 人工提交
    #[default]
    Manual,
    /// 根据登记表自动推算
    Automated,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunMode::Manual => write!(f, "manual"),
            RunMode::Automated => write!(f, "automated"),
        }
    }
}

impl FromStr for RunMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(RunMode::Manual),
            "automated" => Ok(RunMode::Automated),
            _ => Err(()),
        }
    }
}

/// 登记表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub template: SearchTemplate,
    pub operation_time: DateTime<Utc>,
    pub mode: RunMode,
}

impl RegistryEntry {
    pub fn new(template: SearchTemplate, operation_time: DateTime<Utc>, mode: RunMode) -> Self {
        Self {
            template,
            operation_time,
            mode,
        }
    }
}
