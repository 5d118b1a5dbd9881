use crate::error::{Result, TraderError};
use std::path::Path;

const DEFAULT_INSTRUCTIONS_PATH: &str = "instructions.md";
const DEFAULT_PAIR: &str = "KRW-BTC";

/// Startup configuration. Missing credentials are fatal; everything
/// else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub upbit_access_key: String,
    pub upbit_secret_key: String,
    pub openai_api_key: String,
    pub instructions_path: String,
    pub pair: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            upbit_access_key: required("UPBIT_ACCESS_KEY")?,
            upbit_secret_key: required("UPBIT_SECRET_KEY")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            instructions_path: std::env::var("INSTRUCTIONS_PATH")
                .unwrap_or_else(|_| DEFAULT_INSTRUCTIONS_PATH.to_string()),
            pair: std::env::var("TRADING_PAIR").unwrap_or_else(|_| DEFAULT_PAIR.to_string()),
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| TraderError::Config(format!("{} not found in environment", name)))
}

/// The oracle's system instruction document, loaded once at startup.
///
/// Absence is an explicit state, not a silent `None` deep in the
/// pipeline: cycles abort at the oracle step while the process keeps
/// running on its schedule.
#[derive(Debug, Clone)]
pub enum Instructions {
    Loaded(String),
    Absent,
}

impl Instructions {
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                tracing::info!(path = %path.display(), bytes = text.len(), "instructions loaded");
                Instructions::Loaded(text)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "no instructions found, cycles will abort at the oracle step"
                );
                Instructions::Absent
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Instructions::Loaded(_))
    }
}
