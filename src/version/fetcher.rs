//! Scrapes upstream download pages for release versions

#[cfg(test)]
use mockall::automock;

use regex::Regex;
use tracing::{debug, warn};

use crate::version::catalog::Catalog;
use crate::version::error::{CatalogError, FetchError, LoadError};
use crate::version::types::Family;

/// Default index page listing nginx tarballs
const DEFAULT_NGINX_URL: &str = "http://nginx.org";
const NGINX_INDEX_PATH: &str = "/download/";

/// Default index page listing openresty tarballs
const DEFAULT_OPENRESTY_URL: &str = "http://openresty.org";
const OPENRESTY_INDEX_PATH: &str = "/";

const NGINX_PATTERN: &str = r#"href="nginx-([0-9.]+?)\.tar\.gz""#;
const OPENRESTY_PATTERN: &str = r"(?:ngx_)?openresty-([0-9.]+?)\.tar\.gz";

/// Trait for fetching the raw release list of a family
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// URL the versions of `family` are fetched from
    fn endpoint(&self, family: Family) -> String;

    /// Fetches every version string advertised for `family`
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Matched versions, unsorted and possibly duplicated
    /// * `Err(FetchError)` - Transport failure or non-200 response
    async fn fetch_versions(&self, family: Family) -> Result<Vec<String>, FetchError>;
}

/// Fetcher reading the nginx.org and openresty.org download pages
pub struct HttpCatalogFetcher {
    client: reqwest::Client,
    nginx_url: String,
    openresty_url: String,
    nginx_pattern: Regex,
    openresty_pattern: Regex,
}

impl HttpCatalogFetcher {
    /// Creates a fetcher against custom hosts (scheme + authority)
    pub fn new(nginx_url: &str, openresty_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("ngxbrew")
                .build()
                .expect("Failed to create HTTP client"),
            nginx_url: nginx_url.trim_end_matches('/').to_string(),
            openresty_url: openresty_url.trim_end_matches('/').to_string(),
            nginx_pattern: Regex::new(NGINX_PATTERN).expect("valid nginx pattern"),
            openresty_pattern: Regex::new(OPENRESTY_PATTERN).expect("valid openresty pattern"),
        }
    }

    fn pattern(&self, family: Family) -> &Regex {
        match family {
            Family::Nginx => &self.nginx_pattern,
            Family::Openresty => &self.openresty_pattern,
        }
    }

    /// Extract every captured version from an index page
    fn extract_versions(&self, family: Family, body: &str) -> Vec<String> {
        self.pattern(family)
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

impl Default for HttpCatalogFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_NGINX_URL, DEFAULT_OPENRESTY_URL)
    }
}

#[async_trait::async_trait]
impl CatalogFetcher for HttpCatalogFetcher {
    fn endpoint(&self, family: Family) -> String {
        match family {
            Family::Nginx => format!("{}{}", self.nginx_url, NGINX_INDEX_PATH),
            Family::Openresty => format!("{}{}", self.openresty_url, OPENRESTY_INDEX_PATH),
        }
    }

    async fn fetch_versions(&self, family: Family) -> Result<Vec<String>, FetchError> {
        let url = self.endpoint(family);
        debug!("Fetching {} versions from {}", family, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();

        if status != reqwest::StatusCode::OK {
            warn!("{} returned status {}", url, status);
            return Err(FetchError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| {
            warn!("Failed to read response from {}: {}", url, source);
            FetchError::Network {
                url: url.clone(),
                source,
            }
        })?;

        let versions = self.extract_versions(family, &body);
        debug!("Found {} {} archive links", versions.len(), family);

        Ok(versions)
    }
}

/// Fetch and build the catalog of `family`.
///
/// `nginx_floor` drops nginx releases that can no longer be built; openresty
/// catalogs are left untouched.
pub async fn fetch_catalog(
    fetcher: &dyn CatalogFetcher,
    family: Family,
    nginx_floor: Option<&str>,
) -> Result<Catalog, LoadError> {
    let catalog = fetch_unfiltered(fetcher, family).await?;
    Ok(apply_floor(catalog, nginx_floor)?)
}

/// Fetch and build the catalog of `family` with no floor applied.
pub async fn fetch_unfiltered(
    fetcher: &dyn CatalogFetcher,
    family: Family,
) -> Result<Catalog, LoadError> {
    let versions = fetcher.fetch_versions(family).await?;
    Ok(Catalog::from_family(family, versions)?)
}

/// Drop nginx releases below `nginx_floor`. Other families pass through.
pub fn apply_floor(
    mut catalog: Catalog,
    nginx_floor: Option<&str>,
) -> Result<Catalog, CatalogError> {
    if let (Family::Nginx, Some(floor)) = (catalog.family(), nginx_floor) {
        catalog.retain_at_least(floor)?;
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::naming::{download_url, tarball_name};
    use mockito::Server;

    const NGINX_INDEX: &str = r#"<html><body>
        <table>
        <tr><td><a href="/download/nginx-1.9.9.tar.gz">nginx-1.9.9</a></td></tr>
        <tr><td><a href="nginx-1.9.9.tar.gz">nginx-1.9.9</a></td></tr>
        <tr><td><a href="nginx-1.8.0.tar.gz">nginx-1.8.0</a></td></tr>
        <tr><td><a href="nginx-1.8.0.tar.gz.asc">pgp</a></td></tr>
        <tr><td><a href="nginx-0.5.37.tar.gz">nginx-0.5.37</a></td></tr>
        <tr><td><a href="nginx-1.9.9.zip">zip</a></td></tr>
        </table></body></html>"#;

    const OPENRESTY_INDEX: &str = r#"<ul>
        <li><a href="download/ngx_openresty-1.9.7.1.tar.gz">ngx_openresty-1.9.7.1.tar.gz</a></li>
        <li><a href="download/openresty-1.9.7.4.tar.gz">openresty-1.9.7.4.tar.gz</a></li>
        </ul>"#;

    #[test]
    fn extract_versions_matches_nginx_links_only() {
        let fetcher = HttpCatalogFetcher::default();
        let versions = fetcher.extract_versions(Family::Nginx, NGINX_INDEX);
        assert_eq!(versions, vec!["1.9.9", "1.8.0", "0.5.37"]);
    }

    #[test]
    fn extract_versions_matches_both_openresty_archive_names() {
        let fetcher = HttpCatalogFetcher::default();
        let versions = fetcher.extract_versions(Family::Openresty, OPENRESTY_INDEX);
        assert_eq!(
            versions,
            vec!["1.9.7.1", "1.9.7.1", "1.9.7.4", "1.9.7.4"]
        );
    }

    #[test]
    fn scraped_openresty_versions_map_back_to_their_archive_names() {
        let fetcher = HttpCatalogFetcher::default();
        let archives: Vec<(&str, &str)> = fetcher
            .openresty_pattern
            .captures_iter(OPENRESTY_INDEX)
            .filter_map(|caps| Some((caps.get(0)?.as_str(), caps.get(1)?.as_str())))
            .collect();

        assert!(archives.contains(&("openresty-1.9.7.4.tar.gz", "1.9.7.4")));
        for (archive, version) in archives {
            assert_eq!(tarball_name(version, Family::Openresty), archive);
            assert!(download_url(version, Family::Openresty).ends_with(&format!("/{}", archive)));
        }
    }

    #[test]
    fn endpoint_joins_host_and_index_path() {
        let fetcher = HttpCatalogFetcher::new("http://localhost:1234/", "http://localhost:5678");
        assert_eq!(
            fetcher.endpoint(Family::Nginx),
            "http://localhost:1234/download/"
        );
        assert_eq!(
            fetcher.endpoint(Family::Openresty),
            "http://localhost:5678/"
        );
    }

    #[tokio::test]
    async fn fetch_versions_returns_raw_matches() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/download/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(NGINX_INDEX)
            .create_async()
            .await;

        let fetcher = HttpCatalogFetcher::new(&server.url(), &server.url());
        let versions = fetcher.fetch_versions(Family::Nginx).await.unwrap();

        mock.assert_async().await;
        assert_eq!(versions, vec!["1.9.9", "1.8.0", "0.5.37"]);
    }

    #[tokio::test]
    async fn fetch_versions_fails_on_non_200_status() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .with_status(503)
            .create_async()
            .await;

        let fetcher = HttpCatalogFetcher::new(&server.url(), &server.url());
        let result = fetcher.fetch_versions(Family::Openresty).await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(matches!(
            &err,
            FetchError::UnexpectedStatus { status: 503, .. }
        ));
        assert!(err.to_string().contains(&format!("{}/", server.url())));
    }

    #[tokio::test]
    async fn fetch_versions_fails_on_other_success_status() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/download/")
            .with_status(204)
            .create_async()
            .await;

        let fetcher = HttpCatalogFetcher::new(&server.url(), &server.url());
        let result = fetcher.fetch_versions(Family::Nginx).await;

        assert!(matches!(
            result,
            Err(FetchError::UnexpectedStatus { status: 204, .. })
        ));
    }

    #[tokio::test]
    async fn fetch_versions_reports_transport_errors_with_url() {
        // Nothing listens on port 9 of localhost
        let fetcher = HttpCatalogFetcher::new("http://127.0.0.1:9", "http://127.0.0.1:9");
        let err = fetcher.fetch_versions(Family::Nginx).await.unwrap_err();

        assert!(matches!(&err, FetchError::Network { url, .. } if url == "http://127.0.0.1:9/download/"));
    }

    #[tokio::test]
    async fn fetch_catalog_applies_nginx_floor() {
        let mut fetcher = MockCatalogFetcher::new();
        fetcher
            .expect_fetch_versions()
            .withf(|family| *family == Family::Nginx)
            .times(1)
            .returning(|_| {
                Ok(vec![
                    "0.5.37".to_string(),
                    "0.5.38".to_string(),
                    "1.9.9".to_string(),
                ])
            });

        let catalog = fetch_catalog(&fetcher, Family::Nginx, Some("0.5.38"))
            .await
            .unwrap();

        assert_eq!(catalog.versions(), ["1.9.9", "0.5.38"]);
    }

    #[tokio::test]
    async fn fetch_catalog_ignores_floor_for_openresty() {
        let mut fetcher = MockCatalogFetcher::new();
        fetcher
            .expect_fetch_versions()
            .times(1)
            .returning(|_| Ok(vec!["0.1.0".to_string()]));

        let catalog = fetch_catalog(&fetcher, Family::Openresty, Some("0.5.38"))
            .await
            .unwrap();

        assert_eq!(catalog.versions(), ["0.1.0"]);
    }

    #[tokio::test]
    async fn fetch_catalog_fails_when_page_lists_nothing() {
        let mut fetcher = MockCatalogFetcher::new();
        fetcher
            .expect_fetch_versions()
            .times(1)
            .returning(|_| Ok(vec![]));

        let result = fetch_catalog(&fetcher, Family::Nginx, None).await;

        assert!(matches!(
            result,
            Err(LoadError::Catalog(CatalogError::EmptyCatalog(Family::Nginx)))
        ));
    }
}
