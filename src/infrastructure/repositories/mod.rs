// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供 `RecordStore` 的数据库实现
pub mod sea_orm_record_store;
