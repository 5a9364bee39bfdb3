// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 领域层抽象接口的具体实现：
/// - 缓存（cache）：Redis 客户端与进程内缓存
/// - 数据库（database）：连接池创建
/// - 可观测性（observability）：缓存指标
/// - 仓库实现（repositories）：基于 sea-orm 的记录存储
pub mod cache;
pub mod database;
pub mod observability;
pub mod repositories;
