use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::get_config;
use crate::error::Result;

const MAX_CONNECTIONS: u32 = 50;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn create_pool() -> Result<PgPool> {
    let config = get_config();
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(&config.database_url)
        .await?;
    info!("Database pool ready");
    Ok(pool)
}
