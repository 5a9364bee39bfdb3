// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::debug;

use crate::domain::repositories::cache_store::CacheStore;
use crate::utils::errors::CacheError;

/// Redis缓存
///
/// 持有一条长连接的多路复用连接，克隆开销很低，可在进程内共享
#[derive(Clone)]
pub struct RedisCache {
    /// 多路复用连接
    con: MultiplexedConnection,
}

impl RedisCache {
    /// 连接Redis并立即 ping 验证可用性
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    ///
    /// # 返回值
    ///
    /// * `Ok(RedisCache)` - Redis缓存实例
    /// * `Err(CacheError)` - 连接或 ping 失败
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let con = client.get_multiplexed_async_connection().await?;
        let cache = Self { con };
        cache.ping().await?;
        Ok(cache)
    }

    /// 检查连接
    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut con = self.con.clone();
        let pong: String = redis::cmd("PING").query_async(&mut con).await?;
        if pong != "PONG" {
            return Err(CacheError::Unavailable(format!(
                "unexpected PING reply: {}",
                pong
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut con = self.con.clone();
        let value: Option<String> = con.get(key).await?;
        Ok(value)
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut con = self.con.clone();
        let seconds = ttl.as_secs().max(1);
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(seconds)
            .query_async(&mut con)
            .await?;

        if reply.is_none() {
            // Key already present: keep its content, only push the expiry out.
            con.expire::<_, ()>(key, seconds as i64).await?;
            debug!("Refreshed expiry of existing cache key: {}", key);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut con = self.con.clone();
        con.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn flush_all(&self) -> Result<(), CacheError> {
        let mut con = self.con.clone();
        redis::cmd("FLUSHDB").query_async::<()>(&mut con).await?;
        Ok(())
    }
}
