// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::errors::ValidationError;

/// 站点支持的赛制
///
/// 序列化为搜索表单使用的赛制代码（例如 `MO`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Format {
    Vintage,
    Legacy,
    Modern,
    Pioneer,
    Historic,
    Explorer,
    Standard,
    Pauper,
    Peasant,
    Block,
    Extended,
    Premodern,
    DuelCommander,
    Commander,
    Limited,
}

impl Format {
    /// 搜索表单中的赛制代码
    pub fn code(&self) -> &'static str {
        match self {
            Format::Vintage => "VI",
            Format::Legacy => "LE",
            Format::Modern => "MO",
            Format::Pioneer => "PI",
            Format::Historic => "HI",
            Format::Explorer => "EXP",
            Format::Standard => "ST",
            Format::Pauper => "PAU",
            Format::Peasant => "PEA",
            Format::Block => "BL",
            Format::Extended => "EX",
            Format::Premodern => "PREM",
            Format::DuelCommander => "EDH",
            Format::Commander => "cEDH",
            Format::Limited => "LI",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Format {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VI" => Ok(Format::Vintage),
            "LE" => Ok(Format::Legacy),
            "MO" => Ok(Format::Modern),
            "PI" => Ok(Format::Pioneer),
            "HI" => Ok(Format::Historic),
            "EXP" => Ok(Format::Explorer),
            "ST" => Ok(Format::Standard),
            "PAU" => Ok(Format::Pauper),
            "PEA" => Ok(Format::Peasant),
            "BL" => Ok(Format::Block),
            "EX" => Ok(Format::Extended),
            "PREM" => Ok(Format::Premodern),
            "EDH" => Ok(Format::DuelCommander),
            "cEDH" => Ok(Format::Commander),
            "LI" => Ok(Format::Limited),
            other => Err(ValidationError::UnknownFormat(other.to_string())),
        }
    }
}

impl TryFrom<String> for Format {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.code().to_string()
    }
}

/// 解析站点日期
///
/// 站点接受 `dd/mm/yyyy`，也接受两位年份的 `dd/mm/yy`
pub fn parse_site_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    };
    let year_digits = value.rsplit('/').next().map(str::len).ok_or_else(invalid)?;
    let pattern = if year_digits == 2 { "%d/%m/%y" } else { "%d/%m/%Y" };
    NaiveDate::parse_from_str(value.trim(), pattern).map_err(|_| invalid())
}

/// 由模板和页码占用的表单字段
const RESERVED_FIELDS: [&str; 4] = ["format", "date_start", "date_end", "current_page"];

/// 搜索模板
///
/// 不含页码的搜索条件，作为生成逐页查询的模板
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSearchTemplate")]
pub struct SearchTemplate {
    format: Format,
    date_start: String,
    date_end: String,
    /// 额外的表单过滤字段，例如 `event_titre`、`deck_titre`、`player`
    #[serde(flatten)]
    filters: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RawSearchTemplate {
    format: Format,
    date_start: String,
    date_end: String,
    // Submissions may carry a pre-set page; discovery always restarts at page 1.
    #[serde(default, rename = "current_page")]
    _current_page: Option<u32>,
    #[serde(flatten)]
    filters: BTreeMap<String, String>,
}

impl TryFrom<RawSearchTemplate> for SearchTemplate {
    type Error = ValidationError;

    fn try_from(raw: RawSearchTemplate) -> Result<Self, Self::Error> {
        let mut template = SearchTemplate::new(raw.format, raw.date_start, raw.date_end)?;
        for (key, value) in raw.filters {
            template = template.with_filter(key, value)?;
        }
        Ok(template)
    }
}

impl SearchTemplate {
    /// 创建搜索模板，并校验日期区间
    pub fn new(
        format: Format,
        date_start: impl Into<String>,
        date_end: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let date_start = date_start.into();
        let date_end = date_end.into();

        let start = parse_site_date("date_start", &date_start)?;
        let end = parse_site_date("date_end", &date_end)?;
        if start > end {
            return Err(ValidationError::InvertedDateRange {
                start: date_start,
                end: date_end,
            });
        }

        Ok(Self {
            format,
            date_start,
            date_end,
            filters: BTreeMap::new(),
        })
    }

    /// 添加额外的过滤字段
    ///
    /// 键不能为空，也不能与模板自身的表单字段重名
    pub fn with_filter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ValidationError::EmptyField("filter key"));
        }
        if RESERVED_FIELDS.contains(&key.as_str()) {
            return Err(ValidationError::ReservedFilter(key));
        }
        self.filters.insert(key, value.into());
        Ok(self)
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn date_start(&self) -> &str {
        &self.date_start
    }

    pub fn date_end(&self) -> &str {
        &self.date_end
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// 以同样的条件生成新的日期区间
    pub fn with_date_range(
        &self,
        date_start: impl Into<String>,
        date_end: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let mut next = SearchTemplate::new(self.format, date_start, date_end)?;
        next.filters = self.filters.clone();
        Ok(next)
    }
}

/// 指定页码的查询
///
/// 每个查询都是模板的独立副本，`current_page` 始终 >= 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageQuery")]
pub struct PageQuery {
    #[serde(flatten)]
    template: SearchTemplate,
    current_page: u32,
}

#[derive(Deserialize)]
struct RawPageQuery {
    #[serde(flatten)]
    template: SearchTemplate,
    current_page: u32,
}

impl TryFrom<RawPageQuery> for PageQuery {
    type Error = ValidationError;

    fn try_from(raw: RawPageQuery) -> Result<Self, Self::Error> {
        PageQuery::new(raw.template, raw.current_page)
    }
}

impl PageQuery {
    pub fn new(template: SearchTemplate, current_page: u32) -> Result<Self, ValidationError> {
        if current_page == 0 {
            return Err(ValidationError::InvalidPage);
        }
        Ok(Self {
            template,
            current_page,
        })
    }

    pub fn template(&self) -> &SearchTemplate {
        &self.template
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// 搜索表单字段
    ///
    /// 以 urlencoded 表单提交给站点的搜索接口
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("format".to_string(), self.template.format.code().to_string()),
            ("date_start".to_string(), self.template.date_start.clone()),
            ("date_end".to_string(), self.template.date_end.clone()),
        ];
        fields.extend(
            self.template
                .filters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        fields.push(("current_page".to_string(), self.current_page.to_string()));
        fields
    }
}

impl fmt::Display for SearchTemplate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}..{}", self.format, self.date_start, self.date_end)
    }
}

impl fmt::Display for PageQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} page {}", self.template, self.current_page)
    }
}
