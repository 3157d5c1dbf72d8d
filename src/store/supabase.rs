//! PostgREST client for the hosted user table.
//!
//! Every call targets `{base}/rest/v1/{table}` with `id=eq.{id}` style filters.
//! The anon key goes in both the `apikey` header and the bearer token, matching
//! how the hosted service expects browser-grade clients to authenticate.

use std::future::Future;

use reqwest::Response;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::config::StoreConfig;
use crate::model::UserRecord;

use super::{ListFilter, RowStore, StoreError, UserPatch};

pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    table: String,
    headers: HeaderMap,
}

impl SupabaseStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| StoreError::InvalidApiKey)?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| StoreError::InvalidApiKey)?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            table: config.table.clone(),
            headers,
        })
    }

    fn rows_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    async fn check(resp: Response) -> Result<Response, StoreError> {
        let status = resp.status().as_u16();
        if status >= 400 {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, body });
        }
        Ok(resp)
    }
}

impl RowStore for SupabaseStore {
    fn fetch_user(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send {
        let request = self
            .client
            .get(self.rows_url())
            .headers(self.headers.clone())
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_string())]);

        async move {
            let resp = Self::check(request.send().await?).await?;
            let rows: Vec<UserRecord> = resp.json().await?;
            Ok(rows.into_iter().next())
        }
    }

    fn fetch_all(
        &self,
        filter: ListFilter,
    ) -> impl Future<Output = Result<Vec<UserRecord>, StoreError>> + Send {
        let mut query = filter.query_pairs();
        query.push(("select", "*".to_string()));
        query.push(("order", "email.asc".to_string()));

        let request = self
            .client
            .get(self.rows_url())
            .headers(self.headers.clone())
            .query(&query);

        async move {
            let resp = Self::check(request.send().await?).await?;
            Ok(resp.json().await?)
        }
    }

    fn update_user(
        &self,
        id: &str,
        patch: &UserPatch,
    ) -> impl Future<Output = Result<UserRecord, StoreError>> + Send {
        let request = self
            .client
            .patch(self.rows_url())
            .headers(self.headers.clone())
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))])
            .json(patch);
        let id = id.to_string();

        async move {
            let resp = Self::check(request.send().await?).await?;
            let rows: Vec<UserRecord> = resp.json().await?;
            rows.into_iter().next().ok_or(StoreError::RowMissing(id))
        }
    }

    fn delete_user(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        let request = self
            .client
            .delete(self.rows_url())
            .headers(self.headers.clone())
            .query(&[("id", format!("eq.{id}"))]);

        async move {
            Self::check(request.send().await?).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, api_key: &str) -> StoreConfig {
        StoreConfig {
            url: url.to_string(),
            api_key: api_key.to_string(),
            table: "Users".to_string(),
        }
    }

    #[test]
    fn rows_url_joins_base_and_table() {
        let store = SupabaseStore::new(&config("https://x.supabase.co", "key")).unwrap();
        assert_eq!(store.rows_url(), "https://x.supabase.co/rest/v1/Users");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let store = SupabaseStore::new(&config("https://x.supabase.co/", "key")).unwrap();
        assert_eq!(store.rows_url(), "https://x.supabase.co/rest/v1/Users");
    }

    #[test]
    fn rejects_non_header_api_key() {
        let result = SupabaseStore::new(&config("https://x.supabase.co", "bad\nkey"));
        assert!(matches!(result, Err(StoreError::InvalidApiKey)));
    }
}
