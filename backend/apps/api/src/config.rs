//! Process Configuration
//!
//! Everything read from the environment at startup.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub newsapi_key: String,
    pub newsapi_base_url: Option<String>,
    pub bind_addr: SocketAddr,
    /// In-memory store when unset
    pub local_store_path: Option<PathBuf>,
    /// `None` means "generate one" (debug builds only)
    pub session_secret: Option<[u8; 32]>,
    pub frontend_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let newsapi_key = lookup("NEWSAPI_KEY").unwrap_or_default();
        if newsapi_key.is_empty() {
            tracing::warn!("NEWSAPI_KEY is not set; every page will show fallback data");
        }

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let session_secret = match lookup("SESSION_SECRET") {
            Some(encoded) => Some(decode_secret(&encoded)?),
            None if cfg!(debug_assertions) => None,
            None => bail!("SESSION_SECRET must be set in production"),
        };

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            newsapi_key,
            newsapi_base_url: lookup("NEWSAPI_BASE_URL").filter(|url| !url.is_empty()),
            bind_addr,
            local_store_path: lookup("LOCAL_STORE_PATH")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            session_secret,
            frontend_origins,
        })
    }
}

fn decode_secret(encoded: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("SESSION_SECRET must be base64")?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", bytes.len()))
}
