// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::domain::models::query::{parse_site_date, Format, SearchTemplate};
use crate::domain::models::registry::{RegistryEntry, RunMode};
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::utils::csv;
use crate::utils::errors::RegistryError;

const HEADER: [&str; 6] = [
    "format",
    "date_start",
    "date_end",
    "filters",
    "operation_time",
    "mode",
];

/// 新模板 `date_end` 使用的日期格式
pub const TODAY_FORMAT: &str = "%d/%m/%Y";

/// 查询登记表
///
/// 以CSV对象保存每次提交的搜索模板，用于推算下一次自动查询的日期区间。
/// 追加是读-改-写，并发写入可能丢失记录。
#[derive(Clone)]
pub struct QueryRegistry {
    storage: Arc<dyn StorageRepository>,
    key: String,
}

impl QueryRegistry {
    pub fn new(storage: Arc<dyn StorageRepository>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// 读取全部记录，登记表不存在时为空
    pub async fn entries(&self) -> Result<Vec<RegistryEntry>, RegistryError> {
        let Some(text) = self.storage.get_text(&self.key).await? else {
            return Ok(Vec::new());
        };

        csv::parse_rows(&text)
            .into_iter()
            .enumerate()
            .filter(|(_, row)| !is_header(row))
            .map(|(index, row)| parse_entry(index + 1, &row))
            .collect()
    }

    /// 追加一条记录
    pub async fn append(&self, entry: &RegistryEntry) -> Result<(), RegistryError> {
        let mut text = self.storage.get_text(&self.key).await?.unwrap_or_default();
        if text.trim().is_empty() {
            text.clear();
            csv::write_row(&mut text, &HEADER.map(String::from));
        } else if !text.ends_with('\n') {
            text.push('\n');
        }

        let filters = serde_urlencoded::to_string(entry.template.filters())
            .map_err(|e| RegistryError::Malformed {
                line: 0,
                reason: e.to_string(),
            })?;

        csv::write_row(
            &mut text,
            &[
                entry.template.format().code().to_string(),
                entry.template.date_start().to_string(),
                entry.template.date_end().to_string(),
                filters,
                entry.operation_time.to_rfc3339(),
                entry.mode.to_string(),
            ],
        );

        self.storage.save(&self.key, text.as_bytes()).await?;
        info!(
            "Registered {} search {} in {}",
            entry.mode, entry.template, self.key
        );
        Ok(())
    }

    /// 推算下一次自动查询的模板
    ///
    /// 沿用最后一条记录的赛制和过滤条件，日期区间为
    /// `[最后一条记录的 date_end, today]`
    ///
    /// # 错误
    ///
    /// * `RegistryError::Empty` - 登记表没有记录
    /// * `RegistryError::NotDue` - 最后一条记录的 date_end 晚于 today
    pub async fn next_template(&self, today: NaiveDate) -> Result<SearchTemplate, RegistryError> {
        let entries = self.entries().await?;
        let last = entries.last().ok_or(RegistryError::Empty)?;

        let last_end = parse_site_date("date_end", last.template.date_end())?;
        if last_end > today {
            return Err(RegistryError::NotDue {
                date_end: last.template.date_end().to_string(),
                today: today.format(TODAY_FORMAT).to_string(),
            });
        }

        Ok(last.template.with_date_range(
            last.template.date_end(),
            today.format(TODAY_FORMAT).to_string(),
        )?)
    }
}

fn is_header(row: &[String]) -> bool {
    row.first().map(String::as_str) == Some(HEADER[0])
}

fn parse_entry(line: usize, row: &[String]) -> Result<RegistryEntry, RegistryError> {
    let malformed = |reason: String| RegistryError::Malformed { line, reason };

    let [format, date_start, date_end, filters, operation_time, mode] = row else {
        return Err(malformed(format!(
            "expected {} columns, found {}",
            HEADER.len(),
            row.len()
        )));
    };

    let mut template = SearchTemplate::new(Format::from_str(format)?, date_start, date_end)?;
    let filters: BTreeMap<String, String> =
        serde_urlencoded::from_str(filters).map_err(|e| malformed(e.to_string()))?;
    for (key, value) in filters {
        template = template
            .with_filter(key, value)
            .map_err(|e| malformed(e.to_string()))?;
    }

    let operation_time = DateTime::parse_from_rfc3339(operation_time)
        .map_err(|e| malformed(format!("operation_time: {}", e)))?
        .to_utc();
    let mode = RunMode::from_str(mode).map_err(|_| malformed(format!("unknown mode '{}'", mode)))?;

    Ok(RegistryEntry::new(template, operation_time, mode))
}
