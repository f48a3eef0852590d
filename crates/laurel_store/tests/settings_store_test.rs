//! Tests for the per-guild settings store.

use laurel_core::GuildConfig;
use laurel_store::SettingsStore;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(temp_dir.path().join("settings.json")).unwrap();

    let mut configs = HashMap::new();
    configs.insert(
        100,
        GuildConfig {
            review_channel: Some(1),
            testimonial_channel: Some(2),
            ..Default::default()
        },
    );

    store.save(&configs).await.unwrap();
    let loaded = store.load().await;

    assert_eq!(loaded, configs);
}

#[tokio::test]
async fn test_missing_file_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    let store = SettingsStore::new(&path).unwrap();

    // Remove the initialized file to simulate a fresh deployment losing it
    tokio::fs::remove_file(&path).await.unwrap();

    let loaded = store.load().await;
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn test_corrupt_file_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    let store = SettingsStore::new(&path).unwrap();

    tokio::fs::write(&path, b"{ not json !!!").await.unwrap();

    let loaded = store.load().await;
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn test_first_run_initializes_empty_object() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested/dir/settings.json");
    let _store = SettingsStore::new(&path).unwrap();

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(raw, "{}");
}

#[tokio::test]
async fn test_update_creates_default_config() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(temp_dir.path().join("settings.json")).unwrap();

    let config = store
        .update(100, |config| config.reward_role = Some(7))
        .await
        .unwrap();

    assert_eq!(config.reward_role, Some(7));
    assert_eq!(config.review_channel, None);

    let stored = store.get(100).await.unwrap();
    assert_eq!(stored, config);
}

#[tokio::test]
async fn test_update_preserves_other_fields() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(temp_dir.path().join("settings.json")).unwrap();

    store
        .update(100, |config| config.review_channel = Some(1))
        .await
        .unwrap();
    let config = store
        .update(100, |config| config.testimonial_channel = Some(2))
        .await
        .unwrap();

    assert_eq!(config.review_channel, Some(1));
    assert_eq!(config.testimonial_channel, Some(2));
}

#[tokio::test]
async fn test_clear_removes_guild() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(temp_dir.path().join("settings.json")).unwrap();

    store
        .update(100, |config| config.review_channel = Some(1))
        .await
        .unwrap();
    store
        .update(200, |config| config.review_channel = Some(2))
        .await
        .unwrap();

    assert!(store.clear(100).await.unwrap());
    assert!(!store.clear(100).await.unwrap());

    assert!(store.get(100).await.is_none());
    assert!(store.get(200).await.is_some());
}

#[tokio::test]
async fn test_on_disk_field_names() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    let store = SettingsStore::new(&path).unwrap();

    store
        .update(100, |config| {
            config.review_channel = Some(1);
            config.review_message_id = Some(5);
        })
        .await
        .unwrap();

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(raw.contains("\"reviewChannel\""));
    assert!(raw.contains("\"reviewMessageId\""));
    assert!(!raw.contains("review_channel"));
}

#[tokio::test]
async fn test_concurrent_updates_both_persist() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SettingsStore::new(temp_dir.path().join("settings.json")).unwrap());

    let a = {
        let store = store.clone();
        tokio::spawn(async move {
            store
                .update(100, |config| config.review_channel = Some(1))
                .await
                .unwrap();
        })
    };
    let b = {
        let store = store.clone();
        tokio::spawn(async move {
            store
                .update(200, |config| config.review_channel = Some(2))
                .await
                .unwrap();
        })
    };

    a.await.unwrap();
    b.await.unwrap();

    let loaded = store.load().await;
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[&100].review_channel, Some(1));
    assert_eq!(loaded[&200].review_channel, Some(2));
}
