// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::utils::errors::{HandlerError, StoreError};
use crate::utils::naming::{to_camel_string, to_snake_string};

/// 存储层交换的行数据，键为列名
pub type Row = Map<String, Value>;

/// 记录字段的命名约定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldNaming {
    /// 字段名与列名一致（snake_case）
    #[default]
    Snake,
    /// 字段名为 PascalCase，例如 `#[serde(rename_all = "PascalCase")]`
    Pascal,
}

/// 记录标识值
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// 二级索引缓存中保存的文本
    ///
    /// 整数写成裸数字，文本写成带引号的 JSON 字符串，读回时类型不变
    pub fn to_index_payload(&self) -> String {
        match self {
            RecordId::Int(v) => v.to_string(),
            RecordId::Text(s) => Value::from(s.as_str()).to_string(),
        }
    }

    /// 解析二级索引缓存中的文本
    ///
    /// 只有 JSON 整数还原为 `Int`；其余内容（包括 `007` 这类非 JSON 文本）原样作为 `Text`
    pub fn from_index_payload(payload: &str) -> Self {
        match serde_json::from_str::<Value>(payload) {
            Ok(Value::Number(n)) => match n.as_i64() {
                Some(v) => RecordId::Int(v),
                None => RecordId::Text(payload.to_string()),
            },
            Ok(Value::String(s)) => RecordId::Text(s),
            _ => RecordId::Text(payload.to_string()),
        }
    }

    /// 是否为零值哨兵（字符串形式为 `"0"`）
    pub fn is_zero(&self) -> bool {
        match self {
            RecordId::Int(v) => *v == 0,
            RecordId::Text(s) => s == "0",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RecordId::Int(v) => Some(*v),
            RecordId::Text(s) => s.parse().ok(),
        }
    }

    /// 作为查询参数使用的值
    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(v) => Value::from(*v),
            RecordId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(v) => write!(f, "{}", v),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(v: i64) -> Self {
        RecordId::Int(v)
    }
}

impl From<i32> for RecordId {
    fn from(v: i32) -> Self {
        RecordId::Int(v as i64)
    }
}

impl From<u32> for RecordId {
    fn from(v: u32) -> Self {
        RecordId::Int(v as i64)
    }
}

impl From<&str> for RecordId {
    fn from(v: &str) -> Self {
        RecordId::Text(v.to_string())
    }
}

impl From<String> for RecordId {
    fn from(v: String) -> Self {
        RecordId::Text(v)
    }
}

/// 记录特质
///
/// 每种表记录类型通过实现该特质提供标识字段的读写能力，
/// 并通过 serde 完成与缓存、存储行之间的转换。
///
/// # 示例
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use tablecache::domain::models::record::{Record, RecordId};
///
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl Record for User {
///     fn identifier_value(&self) -> RecordId {
///         RecordId::Int(self.id)
///     }
///
///     fn set_identifier_value(&mut self, id: RecordId) {
///         self.id = id.as_i64().unwrap_or_default();
///     }
/// }
/// ```
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// 序列化字段名采用的命名约定
    const FIELD_NAMING: FieldNaming = FieldNaming::Snake;

    /// 读取标识字段的当前值
    fn identifier_value(&self) -> RecordId;

    /// 写入存储分配的标识值
    fn set_identifier_value(&mut self, id: RecordId);
}

/// 将记录转换为以列名为键的行
///
/// 记录必须序列化为结构体（JSON对象），否则返回参数错误。
pub fn record_to_row<R: Record>(record: &R) -> Result<Row, HandlerError> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, value)| (to_snake_string(&name), value))
            .collect()),
        other => Err(HandlerError::InvalidArgument(format!(
            "struct value expected, got {}",
            json_kind(&other)
        ))),
    }
}

/// 将存储行解码为记录
pub fn row_to_record<R: Record>(row: Row) -> Result<R, StoreError> {
    let fields: Row = match R::FIELD_NAMING {
        FieldNaming::Snake => row,
        FieldNaming::Pascal => row
            .into_iter()
            .map(|(column, value)| (to_camel_string(&column), value))
            .collect(),
    };
    serde_json::from_value(Value::Object(fields)).map_err(|e| StoreError::Decode(e.to_string()))
}

/// 标量值的文本形式，字符串不带引号
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
