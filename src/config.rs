use std::{env, net::SocketAddr};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://itinerary.db".to_string());
        let mut listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        if let Ok(port) = env::var("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|err| AppError::Config(format!("invalid PORT: {err}")))?;
            listen_addr.set_port(port);
        }

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .ok()
                .filter(|count: &u32| *count > 0)
                .ok_or_else(|| AppError::Config(format!("invalid DB_MAX_CONNECTIONS: {raw}")))?,
            Err(_) => 10,
        };

        Ok(Self {
            database_url,
            listen_addr,
            max_connections,
        })
    }
}
