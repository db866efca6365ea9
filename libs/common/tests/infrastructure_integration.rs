//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database and Redis are reachable
//! from the application. They only run when `DATABASE_URL` and `REDIS_URL`
//! are both set.

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
};
use sqlx::Row;

#[tokio::test]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("DATABASE_URL").is_err() || std::env::var("REDIS_URL").is_err() {
        eprintln!("skipping: DATABASE_URL and REDIS_URL must both be set");
        return Ok(());
    }

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config)?;

    assert!(
        redis_pool.health_check().await?,
        "Redis health check failed"
    );

    let test_key = "integration_test_revoked_token";
    redis_pool.set(test_key, "1", Some(10)).await?;
    assert!(redis_pool.exists(test_key).await?, "Redis SET/EXISTS test failed");

    Ok(())
}
