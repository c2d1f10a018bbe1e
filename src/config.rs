use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,
    #[serde(default = "default_nats_url")]
    pub nats_url: String,
    #[serde(default = "default_fcm_base_url")]
    pub fcm_base_url: String,
    pub fcm_server_key: String,
}

fn default_database_max_connections() -> u32 {
    5
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_fcm_base_url() -> String {
    "https://fcm.googleapis.com".to_string()
}

impl AppConfig {
    pub fn from_env() -> Self {
        Config::builder()
            .add_source(Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }
}
