// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::models::condition::Condition;
use crate::domain::models::record::{RecordId, Row};
use crate::utils::errors::StoreError;

/// 记录存储特质
///
/// 对关系型引擎的薄封装，所有操作都以表名为作用域，行数据以列名为键。
/// 表名不做校验，由具体实现交给数据库处理。
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 按 `column = value` 查询单行
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Row))` - 找到记录
    /// * `Ok(None)` - 记录不存在
    /// * `Err(StoreError)` - 查询失败
    async fn get_one(&self, table: &str, column: &str, value: &Value)
        -> Result<Option<Row>, StoreError>;

    /// 按条件过滤、排序、分页查询
    async fn find(&self, table: &str, condition: &Condition) -> Result<Vec<Row>, StoreError>;

    /// 按 `column IN (values)` 批量查询
    async fn find_in(&self, table: &str, column: &str, values: &[Value])
        -> Result<Vec<Row>, StoreError>;

    /// 插入一行
    ///
    /// `identifier_column` 为自增标识列；返回存储分配的标识值（若可获得）
    async fn insert(
        &self,
        table: &str,
        identifier_column: &str,
        row: &Row,
    ) -> Result<Option<RecordId>, StoreError>;

    /// 按 `column = value` 更新全部列，返回受影响行数
    async fn update_all_columns(
        &self,
        table: &str,
        column: &str,
        value: &Value,
        row: &Row,
    ) -> Result<u64, StoreError>;

    /// 按 `column = value` 删除，返回受影响行数
    async fn delete(&self, table: &str, column: &str, value: &Value) -> Result<u64, StoreError>;

    /// 计数，条件为空时统计全表
    async fn count(&self, table: &str, condition: Option<&Condition>) -> Result<i64, StoreError>;

    /// 多列浮点求和，按列顺序返回
    async fn sums(
        &self,
        table: &str,
        condition: Option<&Condition>,
        columns: &[&str],
    ) -> Result<Vec<f64>, StoreError>;

    /// 多列整数求和，按列顺序返回
    async fn sums_int(
        &self,
        table: &str,
        condition: Option<&Condition>,
        columns: &[&str],
    ) -> Result<Vec<i64>, StoreError>;

    /// 执行原生SQL，返回受影响行数
    async fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError>;

    /// 执行原生查询，返回列名到值的映射
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError>;
}
