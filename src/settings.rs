use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub listen: String,
}

/// Pix settings of the doula receiving the payments.
#[derive(Debug, Clone, Deserialize)]
pub struct Merchant {
    pub pix_key: String,
    pub beneficiary_name: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Charges {
    pub max_amount: Option<Decimal>,
    /// Charges kept in memory before the oldest are evicted.
    pub max_stored: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub merchant: Merchant,
    #[serde(default)]
    pub charges: Charges,
}

impl Settings {
    /// Loads `path` (or the same file name under the platform config
    /// directory) and applies `DOULA_PIX__SECTION__KEY` overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.listen", "0.0.0.0:8080")?
            .add_source(File::with_name(&resolve_path(path)))
            .add_source(Environment::with_prefix("DOULA_PIX").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

fn resolve_path(path: &str) -> String {
    if Path::new(path).exists() {
        return path.to_string();
    }

    ProjectDirs::from("", "", "doula-pix")
        .map(|dirs| dirs.config_dir().join(path))
        .filter(|candidate| candidate.exists())
        .map(|candidate| candidate.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
