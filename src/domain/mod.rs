// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心逻辑，包括：
/// - 领域模型（models）：记录、标识值与查询条件
/// - 仓库接口（repositories）：记录存储与缓存的抽象接口
/// - 服务（services）：缓存旁路协调器与可观测性钩子
///
/// 领域层不依赖于具体的存储或缓存实现。
pub mod models;
pub mod repositories;
pub mod services;
