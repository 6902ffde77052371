// Environment-driven configuration.
//
// Two knobs: where the SQLite store lives and where change notifications go.
// The webhook is required for live runs and optional for dry runs; that rule
// is enforced by the runner, before any fetching starts.

use std::env;
use std::path::PathBuf;

pub const DB_ENV: &str = "WSO_RECORDS_DB";
pub const WEBHOOK_ENV: &str = "DISCORD_WEBHOOK_URL";
pub const DEFAULT_DB_PATH: &str = "wso_records.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub webhook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Config {
        let db_path = env::var(DB_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let webhook_url = env::var(WEBHOOK_ENV).ok().filter(|v| !v.is_empty());

        Config {
            db_path,
            webhook_url,
        }
    }
}
