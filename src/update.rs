//! Background release check.
//!
//! The check is spawned before analysis starts and joined once after the
//! results have been printed. Its failures never reach the run's result.

use crate::config::UpdateConfig;
use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Something that knows the latest released version.
pub trait ReleaseSource: Send + Sync {
    fn latest_version(&self) -> BoxFuture<'static, Result<String>>;
}

/// Latest release from a GitHub-style releases endpoint.
pub struct GithubReleases {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    tag_name: String,
}

impl GithubReleases {
    pub fn new(config: &UpdateConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("deadscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl ReleaseSource for GithubReleases {
    fn latest_version(&self) -> BoxFuture<'static, Result<String>> {
        let client = self.client.clone();
        let url = self.url.clone();

        async move {
            let response = client
                .get(&url)
                .send()
                .await
                .with_context(|| format!("Failed to reach {}", url))?;

            if !response.status().is_success() {
                anyhow::bail!("Release endpoint returned {}", response.status());
            }

            let release: ReleaseResponse = response
                .json()
                .await
                .context("Failed to parse release response")?;

            Ok(release.tag_name.trim_start_matches('v').to_string())
        }
        .boxed()
    }
}

/// Handle on a running release check.
pub struct UpdateNotifier {
    current: String,
    handle: Option<JoinHandle<Option<String>>>,
}

impl UpdateNotifier {
    /// A notifier that never reports anything.
    pub fn disabled() -> Self {
        Self {
            current: env!("CARGO_PKG_VERSION").to_string(),
            handle: None,
        }
    }

    /// Spawn the check. Must be called from within a tokio runtime.
    pub fn start(source: Arc<dyn ReleaseSource>, current: &str) -> Self {
        let check = source.latest_version();

        let handle = tokio::spawn(async move {
            match check.await {
                Ok(version) => Some(version),
                Err(e) => {
                    debug!("Update check failed: {:#}", e);
                    None
                }
            }
        });

        Self {
            current: current.to_string(),
            handle: Some(handle),
        }
    }

    /// Wait for the check and return a notification if a newer release exists.
    pub async fn finish(self) -> Option<String> {
        let handle = self.handle?;

        let latest = match handle.await {
            Ok(latest) => latest?,
            Err(e) => {
                debug!("Update check task did not complete: {}", e);
                return None;
            }
        };

        if is_newer(&latest, &self.current) {
            Some(notification(&latest, &self.current))
        } else {
            debug!("No newer release (latest {}, current {})", latest, self.current);
            None
        }
    }
}

/// Compare dotted numeric versions. Unparsable input is never newer.
pub fn is_newer(candidate: &str, current: &str) -> bool {
    match (parse_version(candidate), parse_version(current)) {
        (Some(candidate), Some(current)) => candidate > current,
        _ => false,
    }
}

fn parse_version(version: &str) -> Option<Vec<u64>> {
    let core = version.trim().split(['-', '+']).next()?;
    let mut parts: Vec<u64> = core
        .split('.')
        .map(|part| part.parse().ok())
        .collect::<Option<_>>()?;

    // 1.2 == 1.2.0
    while parts.len() > 1 && parts.last() == Some(&0) {
        parts.pop();
    }
    Some(parts)
}

fn notification(latest: &str, current: &str) -> String {
    format!(
        "* Update available: deadscan {} is out (you have {}).",
        latest, current
    )
}
