use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use super::{Catalog, CatalogError};

/// The sample dataset shipped with the crate.
pub const BUNDLED_DATASET: &str = include_str!("../../data/schools.csv");

/// Where the dataset lives: a local file, an http(s) URL, or the sample
/// compiled into the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
    Bundled,
}

impl DatasetSource {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            DatasetSource::Url(s.to_string())
        } else {
            DatasetSource::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => f.write_str(url),
            DatasetSource::Bundled => f.write_str("bundled sample dataset"),
        }
    }
}

/// Read the raw dataset bytes. Any failure here is fatal for the catalog;
/// encoding problems are not, they are handled per row by the parser.
pub async fn read_source(source: &DatasetSource) -> Result<Vec<u8>, CatalogError> {
    debug!(%source, "reading dataset");
    match source {
        DatasetSource::File(path) => tokio::fs::read(path)
            .await
            .map_err(|source| CatalogError::Read {
                path: path.clone(),
                source,
            }),
        DatasetSource::Url(url) => {
            let response = reqwest::get(url)
                .await
                .map_err(|source| CatalogError::Fetch {
                    url: url.clone(),
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(CatalogError::Status {
                    url: url.clone(),
                    status,
                });
            }

            let body = response.bytes().await.map_err(|source| CatalogError::Fetch {
                url: url.clone(),
                source,
            })?;
            Ok(body.to_vec())
        }
        DatasetSource::Bundled => Ok(BUNDLED_DATASET.as_bytes().to_vec()),
    }
}

/// Load and build the catalog in one step. Either the whole catalog is
/// returned or an error; there is no partial result.
pub async fn load_catalog(source: &DatasetSource) -> Result<Catalog, CatalogError> {
    let data = read_source(source).await?;
    Catalog::parse(&data)
}
