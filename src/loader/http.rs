//! HTTP stylesheet loader
//!
//! `ureq` is blocking, so each fetch runs on tokio's blocking pool.

use crate::error::LoadError;
use crate::loader::sheet_loader::SheetLoader;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Loads `http://` and `https://` stylesheets
#[derive(Clone)]
pub struct HttpLoader {
    agent: Agent,
    max_bytes: u64,
}

impl HttpLoader {
    pub fn new(timeout: Duration, max_bytes: u64) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: Agent::new_with_config(config),
            max_bytes,
        }
    }
}

impl fmt::Debug for HttpLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpLoader")
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

fn fetch(agent: &Agent, url: &str, limit: u64) -> Result<String, LoadError> {
    let mut response = agent.get(url).call().map_err(|e| match e {
        ureq::Error::StatusCode(status) => LoadError::Status {
            identifier: url.to_string(),
            status,
        },
        other => LoadError::Http {
            identifier: url.to_string(),
            reason: other.to_string(),
        },
    })?;

    response
        .body_mut()
        .with_config()
        .limit(limit)
        .read_to_string()
        .map_err(|e| match e {
            ureq::Error::BodyExceedsLimit(_) => LoadError::TooLarge {
                identifier: url.to_string(),
                limit,
            },
            other => LoadError::Http {
                identifier: url.to_string(),
                reason: other.to_string(),
            },
        })
}

#[async_trait]
impl SheetLoader for HttpLoader {
    async fn load(&self, identifier: &str) -> Result<String, LoadError> {
        debug!("Fetching stylesheet {}", identifier);

        let agent = self.agent.clone();
        let url = identifier.to_string();
        let limit = self.max_bytes;

        tokio::task::spawn_blocking(move || fetch(&agent, &url, limit))
            .await
            .map_err(|e| LoadError::Http {
                identifier: identifier.to_string(),
                reason: format!("fetch task aborted: {}", e),
            })?
    }

    fn loader_name(&self) -> &'static str {
        "http"
    }
}
