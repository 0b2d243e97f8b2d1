//! Kavita HTTP API client.
//!
//! Authentication goes through the plugin endpoint with the API key embedded in
//! the user's OPDS URL; every later call carries the returned JWT as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::opds::OpdsUrl;
use crate::source::LibrarySource;
use crate::types::{Series, Volume};

/// Plugin name reported to Kavita when authenticating.
pub const PLUGIN_NAME: &str = "Kavita_List";

/// Series filter field meaning "library id" in Kavita's v2 filter API.
const FILTER_FIELD_LIBRARY: u32 = 19;
/// Filter comparison "equal".
const FILTER_COMPARISON_EQUAL: u32 = 0;
/// Sort field "sort name".
const SORT_FIELD_SORT_NAME: u32 = 1;

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

/// A [`LibrarySource`] backed by a Kavita server.
#[derive(Debug)]
pub struct KavitaClient {
    base_url: Url,
    api_key: String,
    client: Client,
    token: RwLock<Option<String>>,
}

impl KavitaClient {
    /// Creates a client for the server at `base_url` (e.g. `http://host:5000`).
    ///
    /// # Arguments
    ///
    /// * `base_url` - Server root, without the `/api` suffix
    /// * `api_key` - The user's API key (the last segment of the OPDS URL)
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut normalized = base_url.trim_end_matches('/').to_string();
        normalized.push('/');
        let base_url = Url::parse(&normalized)
            .map_err(|e| Error::InvalidOpdsUrl(base_url.to_string(), e.to_string()))?;

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            client: Client::builder().timeout(timeout).build()?,
            token: RwLock::new(None),
        })
    }

    /// Creates a client from a parsed OPDS URL.
    pub fn from_opds(opds: &OpdsUrl, timeout: Duration) -> Result<Self> {
        Self::new(&opds.base_url, &opds.api_key, timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Other(format!("Cannot build URL for '{}': {}", path, e)))
    }

    async fn bearer_token(&self) -> Result<String> {
        self.token.read().await.clone().ok_or_else(|| {
            Error::Authentication("not authenticated with the Kavita server".to_string())
        })
    }

    fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl LibrarySource for KavitaClient {
    async fn authenticate(&self) -> Result<()> {
        let mut url = self.endpoint("api/Plugin/authenticate/")?;
        url.query_pairs_mut()
            .append_pair("apiKey", &self.api_key)
            .append_pair("pluginName", PLUGIN_NAME);
        debug!("Authenticating against {}", self.base_url);

        let response = self.client.post(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Authentication(format!(
                "server answered HTTP {}",
                status.as_u16()
            )));
        }

        let auth: AuthResponse = response.json().await?;
        if auth.token.is_empty() {
            return Err(Error::Authentication(
                "server returned an empty token".to_string(),
            ));
        }
        *self.token.write().await = Some(auth.token);
        Ok(())
    }

    async fn fetch_series_list(&self, library_id: i64) -> Result<Vec<Series>> {
        let token = self.bearer_token().await?;
        let mut url = self.endpoint("api/Series/all-v2/")?;
        url.query_pairs_mut()
            .append_pair("PageNumber", "1")
            .append_pair("PageSize", "0");

        let filter = json!({
            "id": 0,
            "name": null,
            "statements": [{
                "comparison": FILTER_COMPARISON_EQUAL,
                "field": FILTER_FIELD_LIBRARY,
                "value": library_id.to_string(),
            }],
            "combination": 0,
            "sortOptions": { "sortField": SORT_FIELD_SORT_NAME, "isAscending": true },
            "limitTo": 0,
        });
        debug!("Fetching series of library {}", library_id);

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&filter)
            .send()
            .await?;
        let series = Self::ensure_success(response)?.json().await?;
        Ok(series)
    }

    async fn fetch_volumes(&self, series_id: i64) -> Result<Vec<Volume>> {
        let token = self.bearer_token().await?;
        let mut url = self.endpoint("api/Series/volumes")?;
        url.query_pairs_mut()
            .append_pair("seriesId", &series_id.to_string());
        debug!("Fetching volumes of series {}", series_id);

        let response = self.client.get(url).bearer_auth(token).send().await?;
        let volumes = Self::ensure_success(response)?.json().await?;
        Ok(volumes)
    }
}
