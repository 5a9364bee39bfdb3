// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 默认日志过滤规则
pub const DEFAULT_FILTER: &str = "info,tablecache=debug";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人类可读的文本
    #[default]
    Text,
    /// 每行一个 JSON 对象，便于日志采集
    Json,
}

/// 初始化日志
///
/// 过滤规则取自 `RUST_LOG`，未设置时使用 [`DEFAULT_FILTER`]。
/// 进程内已安装订阅者时保留原订阅者，只在 debug 级别记录一条日志。
///
/// # 参数
///
/// * `format` - 日志输出格式
pub fn init_telemetry(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json = format == LogFormat::Json;

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .try_init();

    if let Err(e) = installed {
        tracing::debug!("Keeping the existing tracing subscriber: {}", e);
    }
}
