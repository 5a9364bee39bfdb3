// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::settings::Settings;
use crate::domain::models::condition::Condition;
use crate::domain::models::record::{record_to_row, row_to_record, scalar_text, Record, RecordId, Row};
use crate::domain::repositories::cache_store::CacheStore;
use crate::domain::repositories::record_store::RecordStore;
use crate::domain::services::cache_observer::{CacheObserver, CacheOp, RepairReason};
use crate::infrastructure::cache::redis_client::RedisCache;
use crate::infrastructure::database::connection;
use crate::infrastructure::observability::metrics::MetricsObserver;
use crate::infrastructure::repositories::sea_orm_record_store::SeaOrmRecordStore;
use crate::utils::errors::HandlerError;
use crate::utils::naming::to_snake_string;

/// 单条记录操作的选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOptions {
    /// 标识字段名，默认 `Id`；存储侧使用其 snake_case 形式作为列名
    pub identifier_field: String,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            identifier_field: "Id".to_string(),
        }
    }
}

impl RecordOptions {
    pub fn identifier(field: impl Into<String>) -> Self {
        Self {
            identifier_field: field.into(),
        }
    }

    fn identifier_column(&self) -> String {
        to_snake_string(&self.identifier_field)
    }
}

/// 批量查询的选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiGetOptions {
    /// 参与 `IN` 过滤的列，默认 `id`
    pub column: String,
}

impl Default for MultiGetOptions {
    fn default() -> Self {
        Self {
            column: "id".to_string(),
        }
    }
}

struct CacheLayer {
    store: Arc<dyn CacheStore>,
    expire: Duration,
}

/// 带缓存旁路的数据访问处理器
///
/// 读操作先查缓存，未命中时回源存储并尽力回填；写操作成功后刷新缓存；
/// 删除操作先删存储再删缓存。缓存错误从不向调用方暴露，只会降级为直接访问存储。
///
/// 缓存键有两种形式：
/// - 主键形式 `{database}|{table}|{id}`，值为序列化后的完整记录
/// - 二级索引形式 `{database}|{table}|{field}|{value}`，值为主键
pub struct DbHandler {
    database: String,
    store: Arc<dyn RecordStore>,
    cache: Option<CacheLayer>,
    observer: Arc<dyn CacheObserver>,
}

/// 数据访问处理器构建器
pub struct DbHandlerBuilder {
    database: String,
    store: Arc<dyn RecordStore>,
    cache: Option<CacheLayer>,
    observer: Option<Arc<dyn CacheObserver>>,
}

impl DbHandlerBuilder {
    /// 启用缓存，`expire` 为每条缓存的过期时间
    pub fn cache(mut self, cache: Arc<dyn CacheStore>, expire: Duration) -> Self {
        self.cache = Some(CacheLayer {
            store: cache,
            expire,
        });
        self
    }

    /// 注入缓存可观测性钩子
    pub fn observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn build(self) -> DbHandler {
        DbHandler {
            database: self.database,
            store: self.store,
            cache: self.cache,
            observer: self
                .observer
                .unwrap_or_else(|| Arc::new(MetricsObserver::new())),
        }
    }
}

impl DbHandler {
    /// 创建构建器
    ///
    /// # 参数
    ///
    /// * `database` - 数据库名，作为缓存键的第一段
    /// * `store` - 记录存储实现
    pub fn builder(database: impl Into<String>, store: Arc<dyn RecordStore>) -> DbHandlerBuilder {
        DbHandlerBuilder {
            database: database.into(),
            store,
            cache: None,
            observer: None,
        }
    }

    /// 按配置连接存储与缓存
    ///
    /// 配置了Redis时会立即 ping，连接失败直接返回错误；未配置Redis时以纯存储模式运行。
    ///
    /// # 返回值
    ///
    /// * `Ok(DbHandler)` - 处理器实例
    /// * `Err(HandlerError::Config)` - 配置无效
    /// * `Err(HandlerError::Connection)` - 存储或缓存不可达
    pub async fn connect(settings: &Settings) -> Result<Self, HandlerError> {
        settings.validate()?;

        let db = connection::create_pool(&settings.database)
            .await
            .map_err(|e| HandlerError::Connection(format!("database: {}", e)))?;
        let store = Arc::new(SeaOrmRecordStore::new(Arc::new(db)));
        let mut builder = DbHandler::builder(settings.database.db_name.clone(), store);

        if let Some(redis) = &settings.redis {
            let cache = RedisCache::connect(&redis.url())
                .await
                .map_err(|e| HandlerError::Connection(format!("redis: {}", e)))?;
            builder = builder.cache(Arc::new(cache), Duration::from_secs(redis.expire));
            info!(
                "Record cache enabled on {}:{} (db {}, expire {}s)",
                redis.host, redis.port, redis.db, redis.expire
            );
        } else {
            info!("No cache configured, running in store-only mode");
        }

        Ok(builder.build())
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// 是否配置了缓存
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// 主键形式的缓存键
    pub fn primary_key(&self, table: &str, id: &RecordId) -> String {
        format!("{}|{}|{}", self.database, table, id)
    }

    /// 二级索引形式的缓存键
    pub fn index_key(&self, table: &str, field: &str, value: &Value) -> String {
        format!(
            "{}|{}|{}|{}",
            self.database,
            table,
            field,
            scalar_text(value)
        )
    }

    /// 按主键获取记录
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(R))` - 找到记录（来自缓存或存储）
    /// * `Ok(None)` - 记录不存在
    /// * `Err(HandlerError)` - 存储错误
    pub async fn get<R: Record>(
        &self,
        table: &str,
        id: impl Into<RecordId>,
    ) -> Result<Option<R>, HandlerError> {
        self.get_with(table, id, &RecordOptions::default()).await
    }

    /// 按主键获取记录，使用自定义标识字段
    pub async fn get_with<R: Record>(
        &self,
        table: &str,
        id: impl Into<RecordId>,
        options: &RecordOptions,
    ) -> Result<Option<R>, HandlerError> {
        let id = id.into();
        self.get_by_id(table, &id, options).await
    }

    async fn get_by_id<R: Record>(
        &self,
        table: &str,
        id: &RecordId,
        options: &RecordOptions,
    ) -> Result<Option<R>, HandlerError> {
        let key = self.primary_key(table, id);

        if let Some(cache) = &self.cache {
            if let Some(record) = self.read_cached::<R>(cache, &key).await {
                return Ok(Some(record));
            }
        }

        let row = self
            .store
            .get_one(table, &options.identifier_column(), &id.to_value())
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let record: R = row_to_record(row)?;

        if let Some(cache) = &self.cache {
            self.populate(cache, &key, &record).await;
        }
        Ok(Some(record))
    }

    /// 按非主键字段获取记录
    ///
    /// 先通过二级索引缓存解析出主键，再走主键读取；
    /// 索引指向的记录已不存在时删除该索引并回源存储。
    pub async fn get_one<R: Record>(
        &self,
        table: &str,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Option<R>, HandlerError> {
        self.get_one_with(table, field, value, &RecordOptions::default())
            .await
    }

    /// 按非主键字段获取记录，使用自定义标识字段
    pub async fn get_one_with<R: Record>(
        &self,
        table: &str,
        field: &str,
        value: impl Into<Value>,
        options: &RecordOptions,
    ) -> Result<Option<R>, HandlerError> {
        let value = value.into();
        let key = self.index_key(table, field, &value);

        if let Some(cache) = &self.cache {
            match cache.store.get(&key).await {
                Ok(Some(payload)) if !payload.is_empty() => {
                    let id = RecordId::from_index_payload(&payload);
                    match self.get_by_id::<R>(table, &id, options).await {
                        Ok(Some(record)) => {
                            self.observer.on_hit(&key);
                            return Ok(Some(record));
                        }
                        Ok(None) => {
                            self.evict(cache, &key, RepairReason::DanglingIndex).await;
                        }
                        Err(err) => {
                            // The index may still be valid; only the lookup failed.
                            warn!(
                                "Primary lookup through index {} failed, querying store directly: {}",
                                key, err
                            );
                        }
                    }
                }
                Ok(Some(_)) => {
                    self.evict(cache, &key, RepairReason::EmptyPayload).await;
                }
                Ok(None) => self.observer.on_miss(&key),
                Err(err) => {
                    self.observer.on_error(CacheOp::Get, &key, &err);
                    self.evict(cache, &key, RepairReason::ReadError).await;
                }
            }
        }

        let row = self.store.get_one(table, field, &value).await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let record: R = row_to_record(row)?;

        if let Some(cache) = &self.cache {
            let id = record.identifier_value();
            self.best_effort_set(cache, &key, &id.to_index_payload()).await;
            self.populate(cache, &self.primary_key(table, &id), &record)
                .await;
        }
        Ok(Some(record))
    }

    /// 按条件查询记录列表，不经过缓存
    pub async fn list<R: Record>(
        &self,
        table: &str,
        condition: &Condition,
    ) -> Result<Vec<R>, HandlerError> {
        let rows = self.store.find(table, condition).await?;
        decode_rows(rows)
    }

    /// 保存记录
    ///
    /// 标识值为零时插入并回写存储分配的标识，否则按标识更新全部列。
    /// 成功后将写入后的记录刷新到缓存；更新未影响任何行时只删除主键缓存。
    pub async fn save<R: Record>(&self, table: &str, record: &mut R) -> Result<(), HandlerError> {
        self.save_with(table, record, &RecordOptions::default())
            .await
    }

    /// 保存记录，使用自定义标识字段
    pub async fn save_with<R: Record>(
        &self,
        table: &str,
        record: &mut R,
        options: &RecordOptions,
    ) -> Result<(), HandlerError> {
        let mut row = record_to_row(record)?;
        let id_column = options.identifier_column();
        let id = record.identifier_value();

        if id.is_zero() {
            row.remove(&id_column);
            if let Some(assigned) = self.store.insert(table, &id_column, &row).await? {
                record.set_identifier_value(assigned);
            }
        } else {
            let affected = self
                .store
                .update_all_columns(table, &id_column, &id.to_value(), &row)
                .await?;
            if affected == 0 {
                // Zero affected rows (missing row, or an unchanged row on MySQL): drop the key.
                if let Some(cache) = &self.cache {
                    debug!("Update of {} {} matched no row, invalidating cache", table, id);
                    self.best_effort_delete(cache, &self.primary_key(table, &id))
                        .await;
                }
                return Ok(());
            }
        }

        if let Some(cache) = &self.cache {
            let id = record.identifier_value();
            if id.is_zero() {
                debug!("Store did not report an identifier for {}, skipping cache", table);
                return Ok(());
            }
            let key = self.primary_key(table, &id);
            match serde_json::to_string(record) {
                Ok(payload) => {
                    debug!("Storing saved record in cache: {}", key);
                    // Drop the previous content so the write below is not a TTL-only refresh.
                    self.best_effort_delete(cache, &key).await;
                    self.best_effort_set(cache, &key, &payload).await;
                }
                Err(e) => warn!("Failed to serialize saved record for {}: {}", key, e),
            }
        }
        Ok(())
    }

    /// 按主键删除记录
    ///
    /// 先删除存储中的行，再删除主键缓存。
    pub async fn del(&self, table: &str, id: impl Into<RecordId>) -> Result<(), HandlerError> {
        self.del_with(table, id, &RecordOptions::default()).await
    }

    /// 按主键删除记录，使用自定义标识字段
    pub async fn del_with(
        &self,
        table: &str,
        id: impl Into<RecordId>,
        options: &RecordOptions,
    ) -> Result<(), HandlerError> {
        let id = id.into();
        let result = self
            .store
            .delete(table, &options.identifier_column(), &id.to_value())
            .await;

        if let Some(cache) = &self.cache {
            self.best_effort_delete(cache, &self.primary_key(table, &id))
                .await;
        }

        result?;
        Ok(())
    }

    /// 按 `id` 列批量查询，不经过缓存
    pub async fn multi_get<R, I, V>(&self, table: &str, ids: I) -> Result<Vec<R>, HandlerError>
    where
        R: Record,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.multi_get_with(table, ids, &MultiGetOptions::default())
            .await
    }

    /// 按指定列批量查询
    pub async fn multi_get_with<R, I, V>(
        &self,
        table: &str,
        ids: I,
        options: &MultiGetOptions,
    ) -> Result<Vec<R>, HandlerError>
    where
        R: Record,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = ids.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self.store.find_in(table, &options.column, &values).await?;
        decode_rows(rows)
    }

    /// 计数，条件为空时统计全表
    pub async fn count(
        &self,
        table: &str,
        condition: Option<&Condition>,
    ) -> Result<i64, HandlerError> {
        Ok(self.store.count(table, condition).await?)
    }

    /// 单列浮点求和
    pub async fn sum(
        &self,
        table: &str,
        column: &str,
        condition: Option<&Condition>,
    ) -> Result<f64, HandlerError> {
        let sums = self.store.sums(table, condition, &[column]).await?;
        Ok(sums.into_iter().next().unwrap_or_default())
    }

    /// 单列整数求和
    pub async fn sum_int(
        &self,
        table: &str,
        column: &str,
        condition: Option<&Condition>,
    ) -> Result<i64, HandlerError> {
        let sums = self.store.sums_int(table, condition, &[column]).await?;
        Ok(sums.into_iter().next().unwrap_or_default())
    }

    /// 多列浮点求和
    pub async fn sums(
        &self,
        table: &str,
        condition: Option<&Condition>,
        columns: &[&str],
    ) -> Result<Vec<f64>, HandlerError> {
        Ok(self.store.sums(table, condition, columns).await?)
    }

    /// 多列整数求和
    pub async fn sums_int(
        &self,
        table: &str,
        condition: Option<&Condition>,
        columns: &[&str],
    ) -> Result<Vec<i64>, HandlerError> {
        Ok(self.store.sums_int(table, condition, columns).await?)
    }

    /// 执行原生SQL，绕过缓存
    pub async fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, HandlerError> {
        Ok(self.store.exec(sql, params).await?)
    }

    /// 执行原生查询，绕过缓存
    pub async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, HandlerError> {
        Ok(self.store.query(sql, params).await?)
    }

    /// 清空缓存，未配置缓存时不做任何操作
    pub async fn flush(&self) -> Result<(), HandlerError> {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.store.flush_all().await {
                self.observer.on_error(CacheOp::Flush, "*", &err);
                return Err(HandlerError::Cache(err));
            }
            info!("Flushed record cache for {}", self.database);
        }
        Ok(())
    }

    async fn read_cached<R: Record>(&self, cache: &CacheLayer, key: &str) -> Option<R> {
        match cache.store.get(key).await {
            Ok(None) => {
                self.observer.on_miss(key);
                None
            }
            Ok(Some(payload)) if payload.is_empty() => {
                self.evict(cache, key, RepairReason::EmptyPayload).await;
                None
            }
            Ok(Some(payload)) => match serde_json::from_str::<R>(&payload) {
                Ok(record) => {
                    self.observer.on_hit(key);
                    self.best_effort_set(cache, key, &payload).await;
                    Some(record)
                }
                Err(e) => {
                    debug!("Cached payload for {} is not decodable: {}", key, e);
                    self.evict(cache, key, RepairReason::Undecodable).await;
                    None
                }
            },
            Err(err) => {
                self.observer.on_error(CacheOp::Get, key, &err);
                self.evict(cache, key, RepairReason::ReadError).await;
                None
            }
        }
    }

    async fn populate<R: Record>(&self, cache: &CacheLayer, key: &str, record: &R) {
        match serde_json::to_string(record) {
            Ok(payload) => self.best_effort_set(cache, key, &payload).await,
            Err(e) => warn!("Failed to serialize record for {}: {}", key, e),
        }
    }

    async fn evict(&self, cache: &CacheLayer, key: &str, reason: RepairReason) {
        match cache.store.delete(key).await {
            Ok(()) => self.observer.on_repair(key, reason),
            Err(err) => self.observer.on_error(CacheOp::Delete, key, &err),
        }
    }

    async fn best_effort_set(&self, cache: &CacheLayer, key: &str, payload: &str) {
        if let Err(err) = cache.store.set_if_absent(key, payload, cache.expire).await {
            self.observer.on_error(CacheOp::SetIfAbsent, key, &err);
        }
    }

    async fn best_effort_delete(&self, cache: &CacheLayer, key: &str) {
        if let Err(err) = cache.store.delete(key).await {
            self.observer.on_error(CacheOp::Delete, key, &err);
        }
    }
}

fn decode_rows<R: Record>(rows: Vec<Row>) -> Result<Vec<R>, HandlerError> {
    rows.into_iter()
        .map(|row| row_to_record(row).map_err(HandlerError::from))
        .collect()
}
