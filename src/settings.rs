use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: String,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Defaults overridden by `TRIVIA_DB_PATH`, `TRIVIA_HOST` and `TRIVIA_PORT`,
    /// read from the environment or a `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_source(Environment::with_prefix("TRIVIA").try_parsing(true))
    }

    fn from_source(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("db_path", "trivia.db")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
