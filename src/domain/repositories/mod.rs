// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义协调器依赖的两个外部协作者的契约：
/// - 记录存储（record_store）：按表执行过滤查询、写入、删除、聚合与原生SQL
/// - 缓存存储（cache_store）：按键读取、不存在时写入、删除与清空
///
/// 具体实现由基础设施层提供。
pub mod cache_store;
pub mod record_store;
