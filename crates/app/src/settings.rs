//! Handles settings for the application. Configuration is read from
//! `settings.toml` and may be overridden with `CONSULTORIO__*` environment
//! variables, e.g. `CONSULTORIO__SERVER__PORT=8080`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Default, Deserialize)]
pub struct Clinic {
    /// IANA zone used for "today" and "this month" on the dashboard.
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
    #[serde(default)]
    pub clinic: Clinic,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("CONSULTORIO").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
