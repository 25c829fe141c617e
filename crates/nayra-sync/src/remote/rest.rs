//! # PostgREST Client
//!
//! [`RemoteStore`] over HTTP against a Supabase-style `/rest/v1` endpoint.
//!
//! ```text
//! select  GET    /rest/v1/{table}?select=*&order={col}.{asc|desc}
//! insert  POST   /rest/v1/{table}            Prefer: return=representation
//! upsert  POST   /rest/v1/{table}            Prefer: resolution=merge-duplicates
//! delete  DELETE /rest/v1/{table}?{col}=eq.{value}
//! ping    GET    /rest/v1/
//! ```

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{RemoteStore, SortBy};
use crate::error::{RemoteError, RemoteResult, SyncError, SyncResult};

const REST_PREFIX: [&str; 2] = ["rest", "v1"];

/// HTTP client for the hosted store.
/// Clone is cheap - reqwest::Client shares its connection pool.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RestClient {
    pub fn new(base_url: Url, api_key: Option<String>, timeout: Option<Duration>) -> SyncResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(SyncError::InvalidUrl(format!("{} cannot be a base URL", base_url)));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SyncError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, table: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(REST_PREFIX).push(table);
        }
        url
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        match &self.api_key {
            Some(key) => builder.header("apikey", key).bearer_auth(key),
            None => builder,
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> RemoteResult<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(RemoteError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl RemoteStore for RestClient {
    async fn select(&self, table: &str, order: SortBy) -> RemoteResult<Vec<Value>> {
        let mut url = self.endpoint(table);
        let direction = if order.ascending { "asc" } else { "desc" };
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", &format!("{}.{}", order.column, direction));

        debug!(table, %url, "GET");
        let response = self.request(reqwest::Method::GET, url).send().await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(format!("{} rows: {}", table, e)))
    }

    async fn insert(&self, table: &str, row: Value) -> RemoteResult<Value> {
        let url = self.endpoint(table);
        debug!(table, "POST insert");
        let response = self
            .request(reqwest::Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&Value::Array(vec![row]))
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let mut rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(format!("{} insert: {}", table, e)))?;
        if rows.is_empty() {
            return Err(RemoteError::InvalidResponse(format!(
                "{} insert returned no row",
                table
            )));
        }
        Ok(rows.swap_remove(0))
    }

    async fn upsert(&self, table: &str, row: Value) -> RemoteResult<()> {
        let url = self.endpoint(table);
        debug!(table, "POST upsert");
        let response = self
            .request(reqwest::Method::POST, url)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&row)
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, column: &str, value: &str) -> RemoteResult<()> {
        let mut url = self.endpoint(table);
        url.query_pairs_mut()
            .append_pair(column, &format!("eq.{}", value));

        debug!(table, column, value, "DELETE");
        let response = self.request(reqwest::Method::DELETE, url).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn ping(&self) -> RemoteResult<()> {
        let url = self.endpoint("");
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;
        Self::check_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> RestClient {
        RestClient::new(Url::parse(base).unwrap(), Some("anon".into()), None).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(
            client("https://xyz.supabase.co").endpoint("products").as_str(),
            "https://xyz.supabase.co/rest/v1/products"
        );
        assert_eq!(
            client("http://localhost:54321/").endpoint("daily_summaries").as_str(),
            "http://localhost:54321/rest/v1/daily_summaries"
        );
        assert_eq!(
            client("https://xyz.supabase.co").endpoint("").as_str(),
            "https://xyz.supabase.co/rest/v1/"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", client("https://xyz.supabase.co"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("anon"));
    }

    #[test]
    fn test_rejects_non_base_url() {
        let url = Url::parse("mailto:ops@nayra.example").unwrap();
        assert!(RestClient::new(url, None, None).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_remote_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let remote = RestClient::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            None,
            Some(Duration::from_secs(2)),
        )
        .unwrap();
        assert!(remote.ping().await.is_err());
        assert!(remote.select("products", SortBy::asc("name")).await.is_err());
    }
}
