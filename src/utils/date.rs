use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fmt::Write;

use crate::config::Config;
use crate::error::{ClientError, Result};

/// 默认短日期格式（月/日/年，无前导零）
pub const DEFAULT_SHORT_DATE: &str = "%-m/%-d/%Y";

/// 短日期格式化器
/// 卡片显示和按日期搜索共用同一格式，保证所见即所搜
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    pattern: String,
    offset: FixedOffset,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_SHORT_DATE.to_string(),
            offset: FixedOffset::east_opt(0).unwrap_or_else(|| Utc.fix()),
        }
    }
}

impl DateFormatter {
    pub fn new(pattern: &str, utc_offset_minutes: i32) -> Result<Self> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(ClientError::config(&format!("invalid date format: {}", pattern)));
        }

        let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
            ClientError::config(&format!("invalid UTC offset: {} minutes", utc_offset_minutes))
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            offset,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.date_format, config.display_utc_offset_minutes)
    }

    pub fn format(&self, timestamp: &DateTime<Utc>) -> String {
        let local = timestamp.with_timezone(&self.offset);
        let mut out = String::new();
        if write!(out, "{}", local.format(&self.pattern)).is_err() {
            out.clear();
            let _ = write!(out, "{}", local.format(DEFAULT_SHORT_DATE));
        }
        out
    }
}
