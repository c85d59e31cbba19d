use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL; absent means the in-memory backend
    #[serde(default)]
    pub postgres_url: Option<String>,
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
    /// First-run seed; applied only when the staff directory is empty
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Seed branch + admin so a fresh deployment has someone who can log in.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub branch_name: String,
    pub branch_address: String,
    pub admin_identity: String,
    pub admin_name: String,
    pub admin_pin: String,
}

fn default_token_ttl_secs() -> i64 {
    crate::gateway::auth::DEFAULT_TOKEN_TTL_SECS
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}
