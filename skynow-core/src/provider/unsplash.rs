use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::ImageProvider;

const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

#[derive(Debug, Clone)]
pub struct UnsplashClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl UnsplashClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UsUrls {
    full: String,
}

#[derive(Debug, Deserialize)]
struct UsPhoto {
    urls: UsUrls,
}

#[async_trait]
impl ImageProvider for UnsplashClient {
    async fn random_photo(&self, query: &str) -> Result<String> {
        let url = format!("{}/photos/random", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("query", query), ("client_id", self.api_key.as_str())])
            .send()
            .await
            .context("Failed to send request to Unsplash (random photo)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Unsplash response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Unsplash request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: UsPhoto =
            serde_json::from_str(&body).context("Failed to parse Unsplash photo JSON")?;

        Ok(parsed.urls.full)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_full_resolution_url() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .and(query_param("query", "São Paulo"))
            .and(query_param("client_id", "UKEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "abc",
                "urls": {
                    "raw": "https://images.example/raw.jpg",
                    "full": "https://images.example/full.jpg",
                    "regular": "https://images.example/regular.jpg"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = UnsplashClient::with_base_url("UKEY".into(), &server.uri());
        let url = client.random_photo("São Paulo").await.expect("photo url");

        assert_eq!(url, "https://images.example/full.jpg");
    }

    #[tokio::test]
    async fn rejected_request_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "errors": ["OAuth error: The access token is invalid"]
            })))
            .mount(&server)
            .await;

        let client = UnsplashClient::with_base_url("BAD".into(), &server.uri());
        let err = client.random_photo("Lisbon").await.unwrap_err();

        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }
}
