// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 记录存储层错误类型
///
/// 来自关系型存储的错误总是原样返回给调用方
#[derive(Error, Debug)]
pub enum StoreError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// 语句构建错误
    #[error("Query build error: {0}")]
    Query(String),

    /// 行数据无法解码为记录
    #[error("Row decode error: {0}")]
    Decode(String),
}

/// 缓存层错误类型
///
/// 缓存错误从不向调用方暴露，只会降级为直接访问存储
#[derive(Error, Debug)]
pub enum CacheError {
    /// Redis错误
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// 缓存服务不可用
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// 数据访问处理器错误类型
#[derive(Error, Debug)]
pub enum HandlerError {
    /// 配置缺失或无效
    #[error("Configuration error: {0}")]
    Config(String),

    /// 构建时无法连接存储或缓存
    #[error("Connection error: {0}")]
    Connection(String),

    /// 调用参数无效，不会发起任何I/O
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 存储操作错误
    #[error(transparent)]
    Store(#[from] StoreError),

    /// 显式缓存维护操作（清空）失败
    #[error("Cache error: {0}")]
    Cache(CacheError),

    /// 记录序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for HandlerError {
    fn from(err: config::ConfigError) -> Self {
        HandlerError::Config(err.to_string())
    }
}

impl HandlerError {
    /// 是否为存储侧错误
    pub fn is_store(&self) -> bool {
        matches!(self, HandlerError::Store(_))
    }
}
