// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::sea_query::{
    Alias, Asterisk, ConditionalStatement, Expr, Func, Order, Query, SelectStatement, SimpleExpr,
    Value as SqlValue,
};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, FromQueryResult, JsonValue, QueryResult,
    Statement,
};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::models::condition::Condition;
use crate::domain::models::record::{RecordId, Row};
use crate::domain::repositories::record_store::RecordStore;
use crate::utils::errors::StoreError;

/// 基于 sea-orm 的记录存储实现
///
/// 表名与列名在运行时给出，语句通过 sea-query 动态构建，
/// 查询结果以 JSON 对象的形式解码为行。
pub struct SeaOrmRecordStore {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRecordStore {
    /// 创建新的记录存储实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn backend(&self) -> DatabaseBackend {
        self.db.get_database_backend()
    }

    fn sums_statement(
        &self,
        table: &str,
        condition: Option<&Condition>,
        columns: &[&str],
        cast: &str,
    ) -> Result<SelectStatement, StoreError> {
        let mut stmt = Query::select();
        for column in columns {
            stmt.expr(Func::cast_as(
                Func::sum(Expr::col(Alias::new(*column))),
                Alias::new(cast),
            ));
        }
        stmt.from(Alias::new(table));
        apply_filter(&mut stmt, condition, self.backend())?;
        Ok(stmt)
    }

    async fn query_sums(
        &self,
        table: &str,
        condition: Option<&Condition>,
        columns: &[&str],
        integer: bool,
    ) -> Result<Option<QueryResult>, StoreError> {
        if columns.is_empty() {
            return Err(StoreError::Query(
                "at least one column is required".to_string(),
            ));
        }
        let cast = sum_cast(self.backend(), integer);
        let stmt = self.sums_statement(table, condition, columns, cast)?;
        Ok(self.db.query_one(self.backend().build(&stmt)).await?)
    }
}

/// JSON 标量转换为 SQL 参数
fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => Option::<String>::None.into(),
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into()
            } else if let Some(u) = n.as_u64() {
                u.into()
            } else {
                n.as_f64().into()
            }
        }
        Value::String(s) => s.clone().into(),
        other => other.clone().into(),
    }
}

/// 改写过滤模板中的 `?` 占位符
///
/// 引号内的 `?` 不计入，`??` 表示字面量问号。Postgres 的占位符改写为 `$1..$N`，
/// 模板中原有的 `$` 转义为 `$$`；其余后端保持 `?`。占位符数量与参数数量不一致时返回错误。
fn bind_placeholders(
    template: &str,
    params: usize,
    backend: DatabaseBackend,
) -> Result<String, StoreError> {
    let numbered = backend == DatabaseBackend::Postgres;
    let mut sql = String::with_capacity(template.len() + 4);
    let mut count = 0;
    let mut quote: Option<char> = None;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            sql.push(c);
            continue;
        }
        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                sql.push(c);
            }
            '?' if chars.peek() == Some(&'?') => {
                chars.next();
                sql.push_str(if numbered { "?" } else { "??" });
            }
            '?' => {
                count += 1;
                if numbered {
                    sql.push_str(&format!("${}", count));
                } else {
                    sql.push('?');
                }
            }
            '$' if numbered => sql.push_str("$$"),
            other => sql.push(other),
        }
    }

    if quote.is_some() {
        return Err(StoreError::Query(format!(
            "unterminated quote in where clause: {}",
            template
        )));
    }
    if count != params {
        return Err(StoreError::Query(format!(
            "where clause has {} placeholders but {} params were given",
            count, params
        )));
    }
    Ok(sql)
}

fn apply_filter<S: ConditionalStatement>(
    stmt: &mut S,
    condition: Option<&Condition>,
    backend: DatabaseBackend,
) -> Result<(), StoreError> {
    let Some(condition) = condition else {
        return Ok(());
    };
    match condition.where_clause() {
        Some(where_clause) => {
            let sql = bind_placeholders(where_clause, condition.params.len(), backend)?;
            stmt.and_where(Expr::cust_with_values(
                sql,
                condition.params.iter().map(to_sql_value),
            ));
            Ok(())
        }
        None if !condition.params.is_empty() => Err(StoreError::Query(format!(
            "{} params given without a where clause",
            condition.params.len()
        ))),
        None => Ok(()),
    }
}

fn into_row(value: JsonValue) -> Result<Row, StoreError> {
    match value {
        JsonValue::Object(map) => Ok(map),
        other => Err(StoreError::Decode(format!("expected a row object, got {}", other))),
    }
}

fn sum_cast(backend: DatabaseBackend, integer: bool) -> &'static str {
    match (backend, integer) {
        (DatabaseBackend::Postgres, false) => "DOUBLE PRECISION",
        (DatabaseBackend::Postgres, true) => "BIGINT",
        (DatabaseBackend::MySql, false) => "DOUBLE",
        (DatabaseBackend::MySql, true) => "SIGNED",
        (_, false) => "REAL",
        (_, true) => "INTEGER",
    }
}

fn read_identifier(result: &QueryResult, column: &str) -> Result<RecordId, StoreError> {
    if let Ok(id) = result.try_get::<i64>("", column) {
        return Ok(RecordId::Int(id));
    }
    if let Ok(id) = result.try_get::<i32>("", column) {
        return Ok(RecordId::Int(id as i64));
    }
    Ok(RecordId::Text(result.try_get::<String>("", column)?))
}

#[async_trait]
impl RecordStore for SeaOrmRecordStore {
    async fn get_one(
        &self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> Result<Option<Row>, StoreError> {
        let mut stmt = Query::select();
        stmt.column(Asterisk)
            .from(Alias::new(table))
            .and_where(Expr::col(Alias::new(column)).eq(to_sql_value(value)))
            .limit(1);

        let row = JsonValue::find_by_statement(self.backend().build(&stmt))
            .one(self.db.as_ref())
            .await?;
        row.map(into_row).transpose()
    }

    async fn find(&self, table: &str, condition: &Condition) -> Result<Vec<Row>, StoreError> {
        let mut stmt = Query::select();
        stmt.column(Asterisk).from(Alias::new(table));
        apply_filter(&mut stmt, Some(condition), self.backend())?;

        for column in &condition.asc {
            stmt.order_by(Alias::new(column.as_str()), Order::Asc);
        }
        for column in &condition.desc {
            stmt.order_by(Alias::new(column.as_str()), Order::Desc);
        }
        if let Some((limit, offset)) = condition.pagination() {
            stmt.limit(limit).offset(offset);
        }

        let rows = JsonValue::find_by_statement(self.backend().build(&stmt))
            .all(self.db.as_ref())
            .await?;
        rows.into_iter().map(into_row).collect()
    }

    async fn find_in(
        &self,
        table: &str,
        column: &str,
        values: &[Value],
    ) -> Result<Vec<Row>, StoreError> {
        let mut stmt = Query::select();
        stmt.column(Asterisk)
            .from(Alias::new(table))
            .and_where(Expr::col(Alias::new(column)).is_in(values.iter().map(to_sql_value)));

        let rows = JsonValue::find_by_statement(self.backend().build(&stmt))
            .all(self.db.as_ref())
            .await?;
        rows.into_iter().map(into_row).collect()
    }

    async fn insert(
        &self,
        table: &str,
        identifier_column: &str,
        row: &Row,
    ) -> Result<Option<RecordId>, StoreError> {
        let backend = self.backend();
        let mut stmt = Query::insert();
        stmt.into_table(Alias::new(table));
        if row.is_empty() {
            stmt.or_default_values();
        } else {
            stmt.columns(row.keys().map(|column| Alias::new(column.as_str())))
                .values(row.values().map(|v| SimpleExpr::from(to_sql_value(v))))
                .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        if backend == DatabaseBackend::Postgres {
            stmt.returning_col(Alias::new(identifier_column));
            let result = self.db.query_one(backend.build(&stmt)).await?;
            return result
                .map(|r| read_identifier(&r, identifier_column))
                .transpose();
        }

        let result = self.db.execute(backend.build(&stmt)).await?;
        let id = result.last_insert_id();
        Ok((id != 0).then(|| RecordId::Int(id as i64)))
    }

    async fn update_all_columns(
        &self,
        table: &str,
        column: &str,
        value: &Value,
        row: &Row,
    ) -> Result<u64, StoreError> {
        let mut stmt = Query::update();
        stmt.table(Alias::new(table))
            .values(
                row.iter()
                    .map(|(c, v)| (Alias::new(c.as_str()), SimpleExpr::from(to_sql_value(v)))),
            )
            .and_where(Expr::col(Alias::new(column)).eq(to_sql_value(value)));

        let result = self.db.execute(self.backend().build(&stmt)).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, table: &str, column: &str, value: &Value) -> Result<u64, StoreError> {
        let mut stmt = Query::delete();
        stmt.from_table(Alias::new(table))
            .and_where(Expr::col(Alias::new(column)).eq(to_sql_value(value)));

        let result = self.db.execute(self.backend().build(&stmt)).await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, table: &str, condition: Option<&Condition>) -> Result<i64, StoreError> {
        let mut stmt = Query::select();
        stmt.expr(Expr::cust("COUNT(*)")).from(Alias::new(table));
        apply_filter(&mut stmt, condition, self.backend())?;

        let result = self.db.query_one(self.backend().build(&stmt)).await?;
        match result {
            Some(r) => Ok(r.try_get_by_index::<i64>(0)?),
            None => Ok(0),
        }
    }

    async fn sums(
        &self,
        table: &str,
        condition: Option<&Condition>,
        columns: &[&str],
    ) -> Result<Vec<f64>, StoreError> {
        let Some(result) = self.query_sums(table, condition, columns, false).await? else {
            return Ok(vec![0.0; columns.len()]);
        };
        (0..columns.len())
            .map(|i| Ok(result.try_get_by_index::<Option<f64>>(i)?.unwrap_or(0.0)))
            .collect()
    }

    async fn sums_int(
        &self,
        table: &str,
        condition: Option<&Condition>,
        columns: &[&str],
    ) -> Result<Vec<i64>, StoreError> {
        let Some(result) = self.query_sums(table, condition, columns, true).await? else {
            return Ok(vec![0; columns.len()]);
        };
        (0..columns.len())
            .map(|i| Ok(result.try_get_by_index::<Option<i64>>(i)?.unwrap_or(0)))
            .collect()
    }

    async fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        let stmt = Statement::from_sql_and_values(
            self.backend(),
            sql,
            params.iter().map(to_sql_value),
        );
        let result = self.db.execute(stmt).await?;
        Ok(result.rows_affected())
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
        let stmt = Statement::from_sql_and_values(
            self.backend(),
            sql,
            params.iter().map(to_sql_value),
        );
        let rows = JsonValue::find_by_statement(stmt)
            .all(self.db.as_ref())
            .await?;
        rows.into_iter().map(into_row).collect()
    }
}
