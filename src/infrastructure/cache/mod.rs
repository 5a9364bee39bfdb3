// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 提供 `CacheStore` 的实现：Redis 客户端与进程内缓存
pub mod memory_cache;
pub mod redis_client;
