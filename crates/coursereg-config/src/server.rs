use crate::env_or;

/// Listener and connection pool settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub database_max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_max_connections: 10,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_or("SERVER_PORT", defaults.port),
            database_max_connections: env_or(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            ),
        }
    }
}
