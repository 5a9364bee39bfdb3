// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{counter, describe_counter};
use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::domain::services::cache_observer::{CacheObserver, CacheOp, RepairReason};
use crate::utils::errors::CacheError;

static DESCRIBE_METRICS: Lazy<()> = Lazy::new(|| {
    describe_counter!(
        "record_cache_hits_total",
        "Total number of reads served from the record cache"
    );
    describe_counter!(
        "record_cache_misses_total",
        "Total number of reads that fell through to the record store"
    );
    describe_counter!(
        "record_cache_repairs_total",
        "Total number of corrupt or dangling cache keys evicted"
    );
    describe_counter!(
        "record_cache_errors_total",
        "Total number of swallowed cache operation failures"
    );
});

/// 注册缓存指标的描述信息
///
/// 可重复调用，只生效一次。指标的导出器由宿主进程负责安装。
pub fn describe_metrics() {
    Lazy::force(&DESCRIBE_METRICS);
}

/// 默认的缓存观察者
///
/// 把缓存事件写入 tracing 日志并累加 `metrics` 计数器
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsObserver;

impl MetricsObserver {
    pub fn new() -> Self {
        describe_metrics();
        Self
    }
}

impl CacheObserver for MetricsObserver {
    fn on_hit(&self, key: &str) {
        debug!("Cache hit: {}", key);
        counter!("record_cache_hits_total").increment(1);
    }

    fn on_miss(&self, key: &str) {
        debug!("Cache miss: {}", key);
        counter!("record_cache_misses_total").increment(1);
    }

    fn on_repair(&self, key: &str, reason: RepairReason) {
        debug!("Evicted cache key {} ({:?})", key, reason);
        counter!("record_cache_repairs_total").increment(1);
    }

    fn on_error(&self, op: CacheOp, key: &str, err: &CacheError) {
        warn!("Cache {} failed for key {}: {}", op, key, err);
        counter!("record_cache_errors_total", "op" => op.as_str()).increment(1);
    }
}
