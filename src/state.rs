use sqlx::PgPool;

use coursereg_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
use coursereg_db::init_db_pool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
}

pub async fn init_app_state(server_config: &ServerConfig) -> anyhow::Result<AppState> {
    Ok(AppState {
        db: init_db_pool(server_config.database_max_connections).await?,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
    })
}
