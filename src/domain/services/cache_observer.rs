// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;

use crate::utils::errors::CacheError;

/// 缓存操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOp {
    Get,
    SetIfAbsent,
    Delete,
    Flush,
}

impl CacheOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOp::Get => "get",
            CacheOp::SetIfAbsent => "set_if_absent",
            CacheOp::Delete => "delete",
            CacheOp::Flush => "flush",
        }
    }
}

impl fmt::Display for CacheOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 缓存修复原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepairReason {
    /// 缓存值为空
    EmptyPayload,
    /// 缓存值无法反序列化
    Undecodable,
    /// 读取缓存出错
    ReadError,
    /// 二级索引指向的主键记录不存在
    DanglingIndex,
}

/// 缓存可观测性钩子
///
/// 尽力而为的缓存操作不会让调用失败，其结果通过该钩子上报。
pub trait CacheObserver: Send + Sync {
    /// 命中可用的缓存值
    fn on_hit(&self, _key: &str) {}

    /// 未命中，转而访问存储
    fn on_miss(&self, _key: &str) {}

    /// 删除了损坏或过期的缓存键
    fn on_repair(&self, _key: &str, _reason: RepairReason) {}

    /// 缓存操作失败（已被吞掉）
    fn on_error(&self, op: CacheOp, key: &str, err: &CacheError);
}
