// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;

use crate::utils::errors::CacheError;

/// 缓存存储特质
///
/// 对缓存服务的薄封装，值均为字符串。
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 获取指定键的值，键不存在时返回 `None`
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// 键不存在时写入并设置过期时间
    ///
    /// 键已存在时不覆盖内容，只刷新过期时间。
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration)
        -> Result<(), CacheError>;

    /// 删除指定键
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// 清空缓存命名空间
    async fn flush_all(&self) -> Result<(), CacheError>;
}
