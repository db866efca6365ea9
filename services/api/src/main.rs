use anyhow::Result;
use aws_config::BehaviorVersion;
use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use seastay_api::{AppState, MIGRATOR, config::Settings, routes, storage::ImageStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting SeaStay API service");

    let settings = Settings::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool, &MIGRATOR).await?;

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config)?;

    // Check Redis connectivity
    if redis_pool.health_check().await? {
        info!("Redis connection successful");
    } else {
        anyhow::bail!("Failed to connect to Redis");
    }

    // Initialize AWS S3 client
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_client = match &settings.storage.endpoint {
        Some(endpoint) => {
            info!("Using S3 endpoint override: {}", endpoint);
            let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint)
                .force_path_style(true)
                .build();
            aws_sdk_s3::Client::from_conf(s3_config)
        }
        None => aws_sdk_s3::Client::new(&sdk_config),
    };

    let image_store = ImageStore::new(
        s3_client,
        settings.storage.bucket.clone(),
        settings.storage.public_url.clone(),
    );

    let bind_address = settings.bind_address();
    let app_state = AppState::new(pool, redis_pool, image_store, settings);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("SeaStay API service listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
