// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 包含记录特质、标识值与查询条件等核心数据结构
pub mod condition;
pub mod record;
