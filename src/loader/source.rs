//! Where topology documents come from: the live backend or a directory of captures.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default address of the topology backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8088/";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    /// True when the document simply does not exist (HTTP 404 or missing file).
    pub fn is_not_found(&self) -> bool {
        match self {
            SourceError::Status { status, .. } => *status == 404,
            SourceError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// The four documents the backend publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Geometry,
    Topology,
    BlackTree,
    StackTreed,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Geometry => "geometry",
            Endpoint::Topology => "topology",
            Endpoint::BlackTree => "black_tree",
            Endpoint::StackTreed => "stack_treed",
        }
    }
}

/// Fetches raw JSON documents for the loader.
pub trait TopologySource: Send + Sync {
    fn fetch(&self, endpoint: Endpoint) -> impl Future<Output = Result<String, SourceError>> + Send;

    /// Human readable origin, for logs and error messages.
    fn describe(&self) -> String;
}

/// Plain GET requests against the backend, no query or body.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::Client)?;

        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self { client, base_url })
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl TopologySource for HttpSource {
    async fn fetch(&self, endpoint: Endpoint) -> Result<String, SourceError> {
        let url = self.url(endpoint);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| SourceError::Request { url, source })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Reads `<dir>/<endpoint>.json`, e.g. a capture of a previous simulator run.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn file(&self, endpoint: Endpoint) -> PathBuf {
        self.dir.join(format!("{}.json", endpoint.path()))
    }
}

impl TopologySource for DirSource {
    async fn fetch(&self, endpoint: Endpoint) -> Result<String, SourceError> {
        let path = self.file(endpoint);
        debug!(path = %path.display(), "read");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SourceError::Io { path, source })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Either kind of source, picked at runtime from a URL or a path.
#[derive(Debug, Clone)]
pub enum AnySource {
    Http(HttpSource),
    Dir(DirSource),
}

impl AnySource {
    /// `http://` and `https://` locations are fetched, anything else is a directory.
    pub fn from_location(location: &str, timeout: Duration) -> Result<Self, SourceError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(AnySource::Http(HttpSource::new(location, timeout)?))
        } else {
            Ok(AnySource::Dir(DirSource::new(location)))
        }
    }
}

impl TopologySource for AnySource {
    async fn fetch(&self, endpoint: Endpoint) -> Result<String, SourceError> {
        match self {
            AnySource::Http(source) => source.fetch(endpoint).await,
            AnySource::Dir(source) => source.fetch(endpoint).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnySource::Http(source) => source.describe(),
            AnySource::Dir(source) => source.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let source = HttpSource::new("http://127.0.0.1:8088", Duration::from_secs(1)).unwrap();
        assert_eq!(source.url(Endpoint::Geometry), "http://127.0.0.1:8088/geometry");
        assert_eq!(source.url(Endpoint::StackTreed), "http://127.0.0.1:8088/stack_treed");
    }

    #[test]
    fn test_location_selects_source() {
        let timeout = Duration::from_secs(1);
        assert!(matches!(
            AnySource::from_location(DEFAULT_BASE_URL, timeout).unwrap(),
            AnySource::Http(_)
        ));
        assert!(matches!(
            AnySource::from_location("captures/run1", timeout).unwrap(),
            AnySource::Dir(_)
        ));
    }

    #[tokio::test]
    async fn test_dir_source_reads_endpoint_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("geometry.json"), "{}").unwrap();
        let source = DirSource::new(dir.path());

        assert_eq!(source.fetch(Endpoint::Geometry).await.unwrap(), "{}");

        let missing = source.fetch(Endpoint::BlackTree).await.unwrap_err();
        assert!(missing.is_not_found());
    }

    #[test]
    fn test_status_not_found() {
        let err = SourceError::Status {
            url: "x".to_string(),
            status: 404,
        };
        assert!(err.is_not_found());
        let err = SourceError::Status {
            url: "x".to_string(),
            status: 500,
        };
        assert!(!err.is_not_found());
    }
}
