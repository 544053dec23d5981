use std::fmt;
use std::path::PathBuf;

use routine_core::{Catalog, Product};
use tracing::{info, instrument, warn};

use crate::error::CatalogError;

/// Where the static catalog document lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Path(PathBuf),
    Url(String),
}

impl CatalogSource {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => f.write_str(u),
        }
    }
}

/// Outcome of the one catalog fetch a session makes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogStatus {
    Loaded { count: usize },
    /// The session runs with an empty catalog; `reason` is shown to the user.
    Unavailable { reason: String },
}

impl CatalogStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Fetch and parse the catalog.
#[instrument(skip(source), fields(source = %source))]
pub async fn load_catalog(source: &CatalogSource) -> Result<Catalog, CatalogError> {
    let raw = match source {
        CatalogSource::Path(path) => tokio::fs::read_to_string(path).await.map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?,
        CatalogSource::Url(url) => {
            let resp = reqwest::get(url).await.map_err(|e| CatalogError::Fetch(e.to_string()))?;
            if !resp.status().is_success() {
                return Err(CatalogError::Status(resp.status().as_u16()));
            }
            resp.text().await.map_err(|e| CatalogError::Fetch(e.to_string()))?
        }
    };
    let products: Vec<Product> = serde_json::from_str(&raw)?;
    info!(count = products.len(), "catalog loaded");
    Ok(Catalog::new(products))
}

/// Like [`load_catalog`], but never fails: on error the session gets an empty
/// catalog and a status describing why.
pub async fn load_catalog_or_empty(source: &CatalogSource) -> (Catalog, CatalogStatus) {
    match load_catalog(source).await {
        Ok(catalog) => {
            let count = catalog.len();
            (catalog, CatalogStatus::Loaded { count })
        }
        Err(e) => {
            warn!(error = %e, source = %source, "catalog unavailable, continuing with an empty catalog");
            (Catalog::empty(), CatalogStatus::Unavailable { reason: e.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CATALOG: &str = r#"[
        {"id": "sk-spf50", "name": "UV Perfect", "brand": "L'Oréal Paris", "category": "skincare",
         "concerns": ["sun protection"], "keyIngredients": ["Mexoryl SX"], "steps": ["AM"]},
        {"id": "rt-night", "name": "Retinol Night", "brand": "L'Oréal Paris", "category": "skincare",
         "concerns": ["fine lines"], "keyIngredients": ["Retinol"], "steps": ["PM"]}
    ]"#;

    #[test]
    fn source_parsing() {
        assert_eq!(
            CatalogSource::parse("https://example.com/products.json"),
            CatalogSource::Url("https://example.com/products.json".into())
        );
        assert_eq!(
            CatalogSource::parse("data/products.json"),
            CatalogSource::Path(PathBuf::from("data/products.json"))
        );
    }

    #[tokio::test]
    async fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("products.json");
        std::fs::write(&file, CATALOG).unwrap();

        let catalog = load_catalog(&CatalogSource::Path(file)).await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("rt-night").is_some());
    }

    #[tokio::test]
    async fn loads_from_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/products.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CATALOG))
            .mount(&server)
            .await;

        let source = CatalogSource::parse(&format!("{}/data/products.json", server.uri()));
        let catalog = load_catalog(&source).await.unwrap();
        assert_eq!(catalog.products()[0].id.as_str(), "sk-spf50");
    }

    #[tokio::test]
    async fn http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = CatalogSource::Url(format!("{}/missing.json", server.uri()));
        assert!(matches!(load_catalog(&source).await, Err(CatalogError::Status(404))));
    }

    #[tokio::test]
    async fn missing_file_degrades_to_empty() {
        let source = CatalogSource::Path(PathBuf::from("/definitely/not/here.json"));
        let (catalog, status) = load_catalog_or_empty(&source).await;
        assert!(catalog.is_empty());
        assert!(!status.is_available());
        let CatalogStatus::Unavailable { reason } = status else { panic!("expected unavailable") };
        assert!(reason.contains("here.json"), "got: {reason}");
    }

    #[tokio::test]
    async fn malformed_document_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("products.json");
        std::fs::write(&file, r#"{"products": []}"#).unwrap();

        let (catalog, status) = load_catalog_or_empty(&CatalogSource::Path(file)).await;
        assert!(catalog.is_empty());
        assert!(matches!(status, CatalogStatus::Unavailable { .. }));
    }

    #[tokio::test]
    async fn loaded_status_carries_count() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("products.json");
        std::fs::write(&file, CATALOG).unwrap();

        let (_, status) = load_catalog_or_empty(&CatalogSource::Path(file)).await;
        assert_eq!(status, CatalogStatus::Loaded { count: 2 });
    }
}
