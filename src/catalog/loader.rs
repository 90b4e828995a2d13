use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::fallback::fallback_records;
use super::types::{Domain, RawRecord};

/// Where catalog resources live.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// `http(s)://` base; resources are fetched relative to it.
    Http { client: reqwest::Client, base: String },
    /// Local directory, for development against a checkout of the site.
    Dir(PathBuf),
}

impl DataSource {
    pub fn parse(base: &str) -> Result<Self> {
        let base = base.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            let client = reqwest::Client::builder()
                .build()
                .context("Failed to create HTTP client")?;
            Ok(DataSource::Http {
                client,
                base: base.trim_end_matches('/').to_string(),
            })
        } else {
            Ok(DataSource::Dir(PathBuf::from(base)))
        }
    }
}

/// Single-attempt JSON loader with a per-path cache.
///
/// Failures never reach the caller: `load` swaps in the domain's fallback
/// records and logs a warning instead.
pub struct DataLoader {
    source: DataSource,
    /// Successful fetches by resource path. Never expires; see `clear_cache`.
    cache: tokio::sync::RwLock<HashMap<String, Value>>,
}

impl DataLoader {
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            cache: tokio::sync::RwLock::new(HashMap::new()),
        }
    }

    pub fn from_env() -> Result<Self> {
        let base = dotenv::var("AGMP_DATA_BASE")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let source = DataSource::parse(&base)?;
        info!(base = %base, "Data source configured");
        Ok(Self::new(source))
    }

    /// Fetch and parse one resource, consulting the cache first.
    pub async fn fetch_json(&self, path: &str) -> Result<Value> {
        {
            let cache = self.cache.read().await;
            if let Some(value) = cache.get(path) {
                debug!(path, "cache hit");
                return Ok(value.clone());
            }
        }

        let value = match &self.source {
            DataSource::Http { client, base } => {
                let url = format!("{}/{}", base, path.trim_start_matches('/'));
                let resp = client
                    .get(&url)
                    .send()
                    .await
                    .with_context(|| format!("Request failed for {}", url))?;
                let resp = resp
                    .error_for_status()
                    .with_context(|| format!("HTTP error for {}", url))?;
                let body = resp
                    .bytes()
                    .await
                    .with_context(|| format!("Failed to read body of {}", url))?;
                serde_json::from_slice::<Value>(&body)
                    .with_context(|| format!("Decoding JSON for {}", url))?
            }
            DataSource::Dir(dir) => {
                let file = dir.join(path);
                let body = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                serde_json::from_slice::<Value>(&body)
                    .with_context(|| format!("Decoding JSON for {}", file.display()))?
            }
        };

        {
            let mut cache = self.cache.write().await;
            cache.insert(path.to_string(), value.clone());
        }
        Ok(value)
    }

    /// Raw records of `domain`, or its fallback when the source is
    /// unreachable or not a record array.
    pub async fn load(&self, domain: Domain) -> Vec<RawRecord> {
        let path = domain.resource();
        match self.fetch_json(path).await.and_then(into_records) {
            Ok(records) => {
                info!(path, count = records.len(), "Loaded records");
                records
            }
            Err(e) => {
                warn!(path, error = %format!("{:#}", e), "Failed to load data, using fallback");
                fallback_records(domain)
            }
        }
    }

    /// Best-effort load of a GeoJSON FeatureCollection. No fallback.
    pub async fn load_geojson(&self, path: &str) -> Option<Value> {
        match self.fetch_json(path).await {
            Ok(value) if value.get("features").and_then(Value::as_array).is_some() => Some(value),
            Ok(_) => {
                warn!(path, "GeoJSON has no feature array");
                None
            }
            Err(e) => {
                warn!(path, error = %format!("{:#}", e), "Could not load GeoJSON data");
                None
            }
        }
    }

    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        let dropped = cache.len();
        cache.clear();
        info!(dropped, "Data cache cleared");
    }
}

/// Accept a bare array, or the `{"data": [...]}` wrapper written by the
/// spreadsheet export.
fn into_records(value: Value) -> Result<Vec<RawRecord>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => bail!("expected a JSON array of records"),
        },
        _ => bail!("expected a JSON array of records"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("agmp-loader-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("data")).unwrap();
        dir
    }

    fn write(dir: &Path, rel: &str, body: &str) {
        std::fs::write(dir.join(rel), body).unwrap();
    }

    fn title(record: &RawRecord) -> &str {
        record["Initiative/Item Name"].as_str().unwrap_or("")
    }

    #[tokio::test]
    async fn test_load_returns_records_verbatim() {
        let dir = scratch_dir("verbatim");
        write(
            &dir,
            "data/projects.json",
            r#"[{"Initiative/Item Name": "Rift Study", "Extra": 1}]"#,
        );
        let loader = DataLoader::new(DataSource::Dir(dir));
        let records = loader.load(Domain::Projects).await;
        assert_eq!(records.len(), 1);
        assert_eq!(title(&records[0]), "Rift Study");
        assert_eq!(records[0]["Extra"], 1);
    }

    #[tokio::test]
    async fn test_missing_file_uses_fallback() {
        let dir = scratch_dir("missing");
        let loader = DataLoader::new(DataSource::Dir(dir));
        let records = loader.load(Domain::Projects).await;
        assert!(!records.is_empty());
        assert!(records.iter().any(|r| title(r) == "Africa Array"));
    }

    #[tokio::test]
    async fn test_malformed_json_uses_fallback() {
        let dir = scratch_dir("malformed");
        write(&dir, "data/platforms.json", "[{\"Topic/Website\": ");
        let loader = DataLoader::new(DataSource::Dir(dir));
        let records = loader.load(Domain::Platforms).await;
        assert_eq!(records, fallback_records(Domain::Platforms));
    }

    #[tokio::test]
    async fn test_non_array_uses_fallback() {
        let dir = scratch_dir("non-array");
        write(&dir, "data/datasets.json", r#"{"Country": "Kenya"}"#);
        let loader = DataLoader::new(DataSource::Dir(dir));
        let records = loader.load(Domain::Datasets).await;
        assert_eq!(records, fallback_records(Domain::Datasets));
    }

    #[tokio::test]
    async fn test_data_wrapper_is_unwrapped() {
        let dir = scratch_dir("wrapper");
        write(&dir, "data/datasets.json", r#"{"data": [{"Country": "Kenya"}]}"#);
        let loader = DataLoader::new(DataSource::Dir(dir));
        let records = loader.load(Domain::Datasets).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Country"], "Kenya");
    }

    #[tokio::test]
    async fn test_network_error_uses_fallback() {
        // Nothing listens on the discard port.
        let loader = DataLoader::new(DataSource::parse("http://127.0.0.1:9").unwrap());
        let records = loader.load(Domain::Projects).await;
        assert!(!records.is_empty());
        assert!(records.iter().any(|r| title(r) == "Africa Array"));
    }

    #[tokio::test]
    async fn test_cache_survives_until_cleared() {
        let dir = scratch_dir("cache");
        write(&dir, "data/projects.json", r#"[{"Initiative/Item Name": "Cached"}]"#);
        let loader = DataLoader::new(DataSource::Dir(dir.clone()));
        assert_eq!(title(&loader.load(Domain::Projects).await[0]), "Cached");

        std::fs::remove_file(dir.join("data/projects.json")).unwrap();
        assert_eq!(title(&loader.load(Domain::Projects).await[0]), "Cached");

        loader.clear_cache().await;
        let records = loader.load(Domain::Projects).await;
        assert_eq!(title(&records[0]), "Africa Array");
    }

    #[tokio::test]
    async fn test_geojson_is_best_effort() {
        let dir = scratch_dir("geojson");
        write(
            &dir,
            "data/africa_regions.geojson",
            r#"{"type": "FeatureCollection", "features": []}"#,
        );
        write(&dir, "data/broken.geojson", r#"{"type": "Feature"}"#);
        let loader = DataLoader::new(DataSource::Dir(dir));
        assert!(loader.load_geojson("data/africa_regions.geojson").await.is_some());
        assert!(loader.load_geojson("data/broken.geojson").await.is_none());
        assert!(loader.load_geojson("data/absent.geojson").await.is_none());
    }

    #[test]
    fn test_parse_source() {
        assert!(matches!(
            DataSource::parse("https://agmp.africa/").unwrap(),
            DataSource::Http { ref base, .. } if base == "https://agmp.africa"
        ));
        assert!(matches!(DataSource::parse("./site").unwrap(), DataSource::Dir(_)));
    }
}
