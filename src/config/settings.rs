// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;

use crate::utils::errors::HandlerError;

/// 应用程序配置设置
///
/// 进程启动时构建一次，之后不可变
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// Redis配置，缺省时以纯存储模式运行
    #[serde(default)]
    pub redis: Option<RedisSettings>,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 驱动类型 (mysql, postgres, sqlite)
    pub driver: String,
    /// 完整连接URL，设置后忽略主机、端口等分项
    pub url: Option<String>,
    /// 主机地址
    pub host: String,
    /// 端口，缺省时使用驱动的默认端口
    pub port: Option<u16>,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
    /// 数据库名（sqlite 为文件路径）
    pub db_name: String,
    /// 字符集（仅 mysql 使用）
    pub charset: String,
    /// 是否输出SQL日志
    pub show_log: bool,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// Redis配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    /// 主机地址
    pub host: String,
    /// 端口
    #[serde(default = "default_redis_port")]
    pub port: u16,
    /// 密码
    #[serde(default)]
    pub password: String,
    /// 逻辑数据库编号
    #[serde(default)]
    pub db: i64,
    /// 每条缓存的过期时间（秒）
    #[serde(default = "default_expire")]
    pub expire: u64,
}

fn default_redis_port() -> u16 {
    6379
}

fn default_expire() -> u64 {
    3600
}

const DRIVERS: [&str; 3] = ["mysql", "postgres", "sqlite"];

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载 `config/default`、`config/{APP_ENVIRONMENT}` 与 `TABLECACHE__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("TABLECACHE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 从TOML文本加载配置
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database.driver", "mysql")?
            .set_default("database.host", "127.0.0.1")?
            .set_default("database.username", "")?
            .set_default("database.password", "")?
            .set_default("database.db_name", "")?
            .set_default("database.charset", "utf8mb4")?
            .set_default("database.show_log", false)?
            // Default DB pool settings
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)
    }

    /// 校验配置
    ///
    /// # Returns
    ///
    /// * `Err(HandlerError::Config)` - 缺少数据库名、驱动未知或缓存过期时间为零
    pub fn validate(&self) -> Result<(), HandlerError> {
        let database = &self.database;
        if !DRIVERS.contains(&database.driver.as_str()) {
            return Err(HandlerError::Config(format!(
                "unsupported database driver: {}",
                database.driver
            )));
        }
        if database.db_name.trim().is_empty() {
            return Err(HandlerError::Config("database.db_name is empty".to_string()));
        }
        if let Some(redis) = &self.redis {
            if redis.host.trim().is_empty() {
                return Err(HandlerError::Config("redis.host is empty".to_string()));
            }
            if redis.expire == 0 {
                return Err(HandlerError::Config(
                    "redis.expire must be greater than zero".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl DatabaseSettings {
    /// 组装连接字符串
    pub fn dsn(&self) -> String {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return url.to_string();
        }

        match self.driver.as_str() {
            "sqlite" => format!("sqlite://{}?mode=rwc", self.db_name),
            "postgres" => format!(
                "postgres://{}@{}:{}/{}",
                self.credentials(),
                self.host,
                self.port.unwrap_or(5432),
                self.db_name
            ),
            _ => format!(
                "mysql://{}@{}:{}/{}?charset={}",
                self.credentials(),
                self.host,
                self.port.unwrap_or(3306),
                self.db_name,
                self.charset
            ),
        }
    }

    fn credentials(&self) -> String {
        let user = urlencoding::encode(&self.username);
        if self.password.is_empty() {
            user.into_owned()
        } else {
            format!("{}:{}", user, urlencoding::encode(&self.password))
        }
    }
}

impl RedisSettings {
    /// 组装Redis连接URL
    pub fn url(&self) -> String {
        if self.password.is_empty() {
            format!("redis://{}:{}/{}", self.host, self.port, self.db)
        } else {
            format!(
                "redis://:{}@{}:{}/{}",
                urlencoding::encode(&self.password),
                self.host,
                self.port,
                self.db
            )
        }
    }
}
