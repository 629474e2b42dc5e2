//! Server configuration from environment variables

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Report chats that have since been closed in `list_user_chats`
    pub list_closed_user_chats: bool,
    pub cors_permissive: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            list_closed_user_chats: false,
            cors_permissive: true,
        }
    }
}

impl ChatConfig {
    /// Load config from environment variables
    ///
    /// - `CHAT_HOST` / `CHAT_PORT`: listen address (default `0.0.0.0:8080`)
    /// - `CHAT_LIST_CLOSED_USER_CHATS`: include closed chats in `list_user_chats`
    /// - `CHAT_CORS_PERMISSIVE`: allow any origin (default on)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_var("CHAT_HOST", defaults.host)?;
        let port = parse_var("CHAT_PORT", defaults.port)?;
        let list_closed_user_chats =
            flag_var("CHAT_LIST_CLOSED_USER_CHATS", defaults.list_closed_user_chats);
        let cors_permissive = flag_var("CHAT_CORS_PERMISSIVE", defaults.cors_permissive);

        tracing::info!(
            %host,
            port,
            list_closed_user_chats,
            cors_permissive,
            "Chat config loaded"
        );

        Ok(Self {
            host,
            port,
            list_closed_user_chats,
            cors_permissive,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        _ => Ok(default),
    }
}

fn flag_var(var: &str, default: bool) -> bool {
    std::env::var(var)
        .map(|v| {
            let v = v.trim();
            v != "0" && !v.eq_ignore_ascii_case("false")
        })
        .unwrap_or(default)
}
