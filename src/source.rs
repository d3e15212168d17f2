use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use reqwest::Client;

/// Result of looking a date up. A missing verse is an ordinary answer, not an
/// error; errors are reserved for the transport failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(String),
    NotFound,
}

/// Where verse fragments come from: `verses/<date>.html` below a base URL or a
/// local directory.
#[derive(Debug, Clone)]
pub enum VerseSource {
    Http { client: Client, base: String },
    Dir { root: PathBuf },
}

impl VerseSource {
    /// URLs with an http(s) scheme are fetched over the network, anything else is
    /// read as a directory.
    pub fn from_location(location: &str, timeout: Option<Duration>) -> Result<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let mut builder = Client::builder();
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            Ok(Self::Http {
                client: builder.build().context("building HTTP client")?,
                base: location.trim_end_matches('/').to_string(),
            })
        } else {
            Ok(Self::Dir {
                root: PathBuf::from(location),
            })
        }
    }

    pub async fn fetch(&self, date: &str) -> Result<FetchOutcome> {
        match self {
            Self::Http { client, base } => {
                let url = format!("{base}/verses/{date}.html");
                info!("GET {url}");
                let response = client
                    .get(&url)
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?;
                let status = response.status();
                if !status.is_success() {
                    warn!("GET {url} answered {status}");
                    return Ok(FetchOutcome::NotFound);
                }
                let body = response
                    .text()
                    .await
                    .with_context(|| format!("reading body of {url}"))?;
                Ok(FetchOutcome::Found(body))
            }
            Self::Dir { root } => {
                let path = root.join("verses").join(format!("{date}.html"));
                info!("reading {}", path.display());
                match tokio::fs::read_to_string(&path).await {
                    Ok(body) => Ok(FetchOutcome::Found(body)),
                    Err(err) if err.kind() == ErrorKind::NotFound => Ok(FetchOutcome::NotFound),
                    Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
                }
            }
        }
    }
}
