//! Server Configuration
//!
//! Environment-driven settings with workable defaults for local use.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port (`PORT`).
    pub port: u16,
    /// Directory holding the SQLite database (`DATA_DIR`), created if
    /// missing.
    pub data_dir: PathBuf,
    /// Directory with the built SPA assets (`STATIC_DIR`).
    pub static_dir: PathBuf,
    /// `RATE_LIMIT_DISABLED=1` turns rate limiting off.
    pub rate_limit_disabled: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3080);
        let data_dir = env::var("DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("data"));
        let static_dir = env::var("STATIC_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("dist"));
        let rate_limit_disabled = matches!(
            env::var("RATE_LIMIT_DISABLED").as_deref(),
            Ok("1") | Ok("true")
        );
        Self { port, data_dir, static_dir, rate_limit_disabled }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("tasks.db")
    }
}
