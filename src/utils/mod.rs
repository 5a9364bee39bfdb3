// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括错误类型、命名约定转换、日志初始化等功能
pub mod errors;
pub mod naming;
pub mod telemetry;
