// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 数据访问处理器（db_handler）：缓存旁路的读、写、删协调逻辑
/// - 缓存观察者（cache_observer）：尽力而为缓存操作的上报钩子
pub mod cache_observer;
pub mod db_handler;
