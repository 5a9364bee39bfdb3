// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 带旁路缓存的数据表访问层
//!
//! 以 `DbHandler` 为入口：按主键或唯一字段读取的记录先查 Redis，
//! 未命中再查关系库并回填；写入与删除后使对应缓存失效。

/// 配置模块
///
/// 处理数据库与缓存的连接配置
pub mod config;

/// 领域模块
///
/// 记录模型、存储接口与缓存协调服务
pub mod domain;

/// 基础设施模块
///
/// 数据库、缓存与指标的具体实现
pub mod infrastructure;

/// 工具模块
///
/// 错误类型、命名转换与日志初始化
pub mod utils;

pub use config::settings::Settings;
pub use domain::models::condition::Condition;
pub use domain::models::record::{FieldNaming, Record, RecordId, Row};
pub use domain::services::db_handler::{DbHandler, MultiGetOptions, RecordOptions};
pub use utils::errors::{CacheError, HandlerError, StoreError};
pub use utils::telemetry::{init_telemetry, LogFormat};
