use crate::db::Database;
use tempfile::NamedTempFile;

#[tokio::test]
async fn database_creation_builds_schema() {
    let temp_file = NamedTempFile::new().unwrap();
    let db = Database::new(temp_file.path()).await.unwrap();

    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .unwrap();

    assert!(tables.contains(&"issues".to_string()));
    assert!(tables.contains(&"comments".to_string()));
    assert!(tables.contains(&"schema_version".to_string()));

    db.close().await;
}

#[tokio::test]
async fn reopening_does_not_reapply_migrations() {
    let temp_file = NamedTempFile::new().unwrap();

    let db = Database::new(temp_file.path()).await.unwrap();
    db.close().await;

    // Second open must tolerate the existing schema
    let db = Database::new(temp_file.path()).await.unwrap();

    let versions: Vec<i64> = sqlx::query_scalar("SELECT version FROM schema_version")
        .fetch_all(db.pool())
        .await
        .unwrap();
    assert_eq!(versions, vec![1], "migration v1 recorded exactly once");

    db.close().await;
}

#[tokio::test]
async fn foreign_keys_are_enforced() {
    let temp_file = NamedTempFile::new().unwrap();
    let db = Database::new(temp_file.path()).await.unwrap();

    // Comment pointing at a missing issue must be rejected
    let result = sqlx::query(
        "INSERT INTO comments (id, issue_number, author, body, created_at) \
         VALUES (1, 999, 'ghost', 'orphan', '2024-01-01T00:00:00Z')",
    )
    .execute(db.pool())
    .await;

    assert!(result.is_err(), "orphan comment should violate the FK");

    db.close().await;
}

#[tokio::test]
async fn missing_parent_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("deep/nested/issues.db");

    let db = Database::new(&nested).await.unwrap();
    assert!(nested.exists());

    db.close().await;
}
