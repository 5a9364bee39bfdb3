// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#![allow(dead_code)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tablecache::domain::models::condition::Condition;
use tablecache::domain::models::record::{FieldNaming, Record, RecordId, Row};
use tablecache::domain::repositories::cache_store::CacheStore;
use tablecache::domain::repositories::record_store::RecordStore;
use tablecache::domain::services::cache_observer::{CacheObserver, CacheOp, RepairReason};
use tablecache::utils::errors::{CacheError, StoreError};

/// 测试用户记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

impl User {
    pub fn new(name: &str, email: &str, age: i64) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            email: email.to_string(),
            age,
        }
    }
}

impl Record for User {
    fn identifier_value(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn set_identifier_value(&mut self, id: RecordId) {
        self.id = id.as_i64().unwrap_or_default();
    }
}

/// PascalCase 字段的订单记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    pub id: i64,
    pub order_no: String,
    pub amount: f64,
}

impl Record for Order {
    const FIELD_NAMING: FieldNaming = FieldNaming::Pascal;

    fn identifier_value(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn set_identifier_value(&mut self, id: RecordId) {
        self.id = id.as_i64().unwrap_or_default();
    }
}

/// 以文本编码为标识的优惠券记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub name: String,
}

impl Record for Coupon {
    fn identifier_value(&self) -> RecordId {
        RecordId::Text(self.code.clone())
    }

    fn set_identifier_value(&mut self, id: RecordId) {
        self.code = id.to_string();
    }
}

/// 进程内记录存储
///
/// 按表保存行，自增分配标识，并统计读操作次数
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    next_id: Mutex<i64>,
    reads: AtomicUsize,
    failing: AtomicBool,
    failing_lookup: Mutex<Option<String>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, table: &str, row: Value) {
        let Value::Object(row) = row else {
            panic!("seed rows must be objects");
        };
        if let Some(id) = row.get("id").and_then(Value::as_i64) {
            let mut next = self.next_id.lock().unwrap();
            *next = (*next).max(id);
        }
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn row(&self, table: &str, column: &str, value: &Value) -> Option<Row> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .and_then(|rows| rows.iter().find(|r| r.get(column) == Some(value)).cloned())
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// 之后的所有操作都返回错误
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// 之后按指定列的单行查询都返回错误，其余操作正常
    pub fn fail_lookups_by(&self, column: &str) {
        *self.failing_lookup.lock().unwrap() = Some(column.to_string());
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Query("store is down".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> Result<(), StoreError> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

fn column_sum(rows: &[Row], column: &str) -> f64 {
    rows.iter()
        .filter_map(|r| r.get(column).and_then(Value::as_f64))
        .sum()
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get_one(
        &self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> Result<Option<Row>, StoreError> {
        if self.failing_lookup.lock().unwrap().as_deref() == Some(column) {
            return Err(StoreError::Query(format!("lookup by {} failed", column)));
        }
        self.read()?;
        Ok(self.row(table, column, value))
    }

    async fn find(&self, table: &str, condition: &Condition) -> Result<Vec<Row>, StoreError> {
        self.read()?;
        let rows = self.rows(table);
        Ok(match condition.pagination() {
            Some((limit, offset)) => rows
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect(),
            None => rows,
        })
    }

    async fn find_in(
        &self,
        table: &str,
        column: &str,
        values: &[Value],
    ) -> Result<Vec<Row>, StoreError> {
        self.read()?;
        Ok(self
            .rows(table)
            .into_iter()
            .filter(|r| r.get(column).is_some_and(|v| values.contains(v)))
            .collect())
    }

    async fn insert(
        &self,
        table: &str,
        identifier_column: &str,
        row: &Row,
    ) -> Result<Option<RecordId>, StoreError> {
        self.check()?;
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let mut row = row.clone();
        row.insert(identifier_column.to_string(), Value::from(id));
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(Some(RecordId::Int(id)))
    }

    async fn update_all_columns(
        &self,
        table: &str,
        column: &str,
        value: &Value,
        row: &Row,
    ) -> Result<u64, StoreError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let mut affected = 0;
        for existing in tables.entry(table.to_string()).or_default().iter_mut() {
            if existing.get(column) == Some(value) {
                for (k, v) in row {
                    existing.insert(k.clone(), v.clone());
                }
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn delete(&self, table: &str, column: &str, value: &Value) -> Result<u64, StoreError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        let before = rows.len();
        rows.retain(|r| r.get(column) != Some(value));
        Ok((before - rows.len()) as u64)
    }

    async fn count(&self, table: &str, _condition: Option<&Condition>) -> Result<i64, StoreError> {
        self.read()?;
        Ok(self.rows(table).len() as i64)
    }

    async fn sums(
        &self,
        table: &str,
        _condition: Option<&Condition>,
        columns: &[&str],
    ) -> Result<Vec<f64>, StoreError> {
        self.read()?;
        let rows = self.rows(table);
        Ok(columns.iter().map(|c| column_sum(&rows, c)).collect())
    }

    async fn sums_int(
        &self,
        table: &str,
        _condition: Option<&Condition>,
        columns: &[&str],
    ) -> Result<Vec<i64>, StoreError> {
        self.read()?;
        let rows = self.rows(table);
        Ok(columns.iter().map(|c| column_sum(&rows, c) as i64).collect())
    }

    async fn exec(&self, _sql: &str, _params: &[Value]) -> Result<u64, StoreError> {
        self.check()?;
        Ok(0)
    }

    async fn query(&self, _sql: &str, _params: &[Value]) -> Result<Vec<Row>, StoreError> {
        self.read()?;
        Ok(Vec::new())
    }
}

/// 记录所有缓存事件的观察者
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn has(&self, event: &str) -> bool {
        self.events().iter().any(|e| e == event)
    }

    pub fn errors(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with("error:"))
            .count()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl CacheObserver for RecordingObserver {
    fn on_hit(&self, key: &str) {
        self.push(format!("hit:{}", key));
    }

    fn on_miss(&self, key: &str) {
        self.push(format!("miss:{}", key));
    }

    fn on_repair(&self, key: &str, reason: RepairReason) {
        self.push(format!("repair:{}:{:?}", key, reason));
    }

    fn on_error(&self, op: CacheOp, key: &str, _err: &CacheError) {
        self.push(format!("error:{}:{}", op, key));
    }
}

/// 所有操作都失败的缓存
pub struct UnavailableCache;

#[async_trait]
impl CacheStore for UnavailableCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set_if_absent(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn flush_all(&self) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}
