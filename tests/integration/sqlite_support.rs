// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tablecache::config::settings::Settings;
use tablecache::domain::models::record::{Record, RecordId};
use tablecache::domain::repositories::record_store::RecordStore;
use tablecache::infrastructure::database::connection;
use tablecache::infrastructure::repositories::sea_orm_record_store::SeaOrmRecordStore;
use tempfile::TempDir;

pub const CREATE_MEMBERS: &str = "CREATE TABLE members (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    age INTEGER NOT NULL,
    balance REAL NOT NULL
)";

pub const CREATE_COUPONS: &str = "CREATE TABLE coupons (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL
)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub balance: f64,
}

impl Member {
    pub fn new(name: &str, age: i64, balance: f64) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            email: format!("{}@example.com", name),
            age,
            balance,
        }
    }
}

impl Record for Member {
    fn identifier_value(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn set_identifier_value(&mut self, id: RecordId) {
        self.id = id.as_i64().unwrap_or_default();
    }
}

/// 基于临时文件的 sqlite 配置
pub fn sqlite_settings(dir: &TempDir) -> Settings {
    let path = dir.path().join("shop.db");
    Settings::from_toml_str(&format!(
        "[database]\ndriver = \"sqlite\"\ndb_name = \"{}\"\nmax_connections = 4\n",
        path.display()
    ))
    .expect("Failed to build sqlite settings")
}

/// 创建带 members 表的 sqlite 记录存储
pub async fn sqlite_store() -> (Arc<SeaOrmRecordStore>, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let settings = sqlite_settings(&dir);
    let db = connection::create_pool(&settings.database)
        .await
        .expect("Failed to open sqlite database");
    let store = Arc::new(SeaOrmRecordStore::new(Arc::new(db)));
    store
        .exec(CREATE_MEMBERS, &[])
        .await
        .expect("Failed to create members table");
    (store, dir)
}
