// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;

/// 查询条件
///
/// 列表、计数与求和操作使用的过滤描述，直接交给存储层执行，不经过缓存。
///
/// * `where_clause` - 带 `?` 占位符的过滤模板，例如 `"user = ? and status = ?"`
/// * `params` - 按位置对应的参数
/// * `asc` / `desc` - 升序、降序列，先应用升序再应用降序
/// * `limit` - 小于等于 0 表示不限制，此时忽略 `offset`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    pub where_clause: Option<String>,
    pub params: Vec<Value>,
    pub asc: Vec<String>,
    pub desc: Vec<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置过滤模板与参数
    pub fn filter<I, V>(mut self, where_clause: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_clause = Some(where_clause.into());
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn asc(mut self, column: impl Into<String>) -> Self {
        self.asc.push(column.into());
        self
    }

    pub fn desc(mut self, column: impl Into<String>) -> Self {
        self.desc.push(column.into());
        self
    }

    /// 设置分页
    pub fn page(mut self, limit: i64, offset: i64) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// 非空的过滤模板
    pub fn where_clause(&self) -> Option<&str> {
        self.where_clause
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }

    /// 生效的分页参数 `(limit, offset)`
    pub fn pagination(&self) -> Option<(u64, u64)> {
        if self.limit <= 0 {
            return None;
        }
        Some((self.limit as u64, self.offset.max(0) as u64))
    }
}
