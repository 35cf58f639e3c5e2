/// API 字段格式兼容的序列化/反序列化辅助模块

use serde::{Deserialize, Deserializer};

/// 计数字段可能是数字，也可能是用户 ID 数组（例如 likes）
pub mod count_or_list {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum CountValue {
            Number(u64),
            List(Vec<serde_json::Value>),
            Null(()),
        }

        match CountValue::deserialize(deserializer)? {
            CountValue::Number(n) => Ok(n),
            CountValue::List(items) => Ok(items.len() as u64),
            CountValue::Null(()) => Ok(0),
        }
    }
}
