// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::DatabaseSettings;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

/// 连接的最长存活时间
const MAX_LIFETIME: Duration = Duration::from_secs(3600);

/// 根据配置生成连接池参数
///
/// sqlite 内存库的每条连接都是独立的数据库，因此连接数固定为 1
pub fn pool_options(settings: &DatabaseSettings) -> ConnectOptions {
    let dsn = settings.dsn();
    let in_memory = settings.driver == "sqlite" && dsn.contains(":memory:");
    let mut opt = ConnectOptions::new(dsn);

    if in_memory {
        opt.max_connections(1).min_connections(1);
    } else {
        if let Some(max) = settings.max_connections {
            opt.max_connections(max);
        }
        if let Some(min) = settings.min_connections {
            opt.min_connections(min);
        }
    }

    if let Some(timeout) = settings.connect_timeout {
        let timeout = Duration::from_secs(timeout);
        opt.connect_timeout(timeout).acquire_timeout(timeout);
    }
    if let Some(idle) = settings.idle_timeout {
        opt.idle_timeout(Duration::from_secs(idle));
    }

    opt.max_lifetime(MAX_LIFETIME)
        .sqlx_logging(settings.show_log);
    opt
}

/// 创建数据库连接池并验证连通性
///
/// 连接池在进程生命周期内共享复用
///
/// # 参数
///
/// * `settings` - 数据库配置
///
/// # 返回值
///
/// * `Ok(DatabaseConnection)` - 数据库连接
/// * `Err(DbErr)` - 连接或 ping 失败
pub async fn create_pool(settings: &DatabaseSettings) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(pool_options(settings)).await?;
    db.ping().await?;
    info!(
        "Connected to {} database {} (sql log: {})",
        settings.driver, settings.db_name, settings.show_log
    );
    Ok(db)
}
