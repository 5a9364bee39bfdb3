// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use tablecache::domain::repositories::cache_store::CacheStore;
use tablecache::infrastructure::cache::redis_client::RedisCache;
use testcontainers::core::WaitFor;
use testcontainers::runners::AsyncRunner;
use testcontainers::GenericImage;

/// 验证 Redis 缓存的写入、过期刷新、删除与清空
#[tokio::test]
#[ignore = "requires docker"]
async fn test_redis_cache_semantics() {
    let redis_node = GenericImage::new("redis", "7-alpine")
        .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
        .start()
        .await
        .expect("Failed to start Redis");
    let redis_port = redis_node
        .get_host_port_ipv4(6379)
        .await
        .expect("Failed to get Redis port");
    let cache = RedisCache::connect(&format!("redis://127.0.0.1:{}/0", redis_port))
        .await
        .expect("Failed to connect to Redis");

    assert_eq!(cache.get("shop|users|1").await.unwrap(), None);

    cache
        .set_if_absent("shop|users|1", "first", Duration::from_secs(60))
        .await
        .unwrap();
    cache
        .set_if_absent("shop|users|1", "second", Duration::from_secs(60))
        .await
        .unwrap();
    assert_eq!(
        cache.get("shop|users|1").await.unwrap().as_deref(),
        Some("first")
    );

    cache.delete("shop|users|1").await.unwrap();
    assert_eq!(cache.get("shop|users|1").await.unwrap(), None);

    cache
        .set_if_absent("shop|users|2", "x", Duration::from_secs(60))
        .await
        .unwrap();
    cache.flush_all().await.unwrap();
    assert_eq!(cache.get("shop|users|2").await.unwrap(), None);
}

#[tokio::test]
async fn test_connect_to_unreachable_redis_fails() {
    let result = RedisCache::connect("redis://127.0.0.1:1/0").await;
    assert!(result.is_err());
}
