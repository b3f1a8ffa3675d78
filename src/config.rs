use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_connections: u32,
    pub max_body_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL").or_else(|e| {
            std::env::var("DB_DSN").map_err(|_| e)
        })?;

        let host: IpAddr = env_or("USERD_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid USERD_HOST: {e}"))?;

        let port: u16 = env_or("USERD_PORT", "8080")
            .parse()
            .map_err(|e| format!("Invalid USERD_PORT: {e}"))?;

        let max_connections: u32 = env_or("USERD_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid USERD_MAX_CONNECTIONS: {e}"))?;
        if max_connections == 0 {
            return Err("Invalid USERD_MAX_CONNECTIONS: must be at least 1".to_string());
        }

        let max_body_size: usize = env_or("USERD_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid USERD_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("USERD_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            host,
            port,
            max_connections,
            max_body_size,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
