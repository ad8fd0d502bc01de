use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::Result;

const USER_AGENT: &str = "newsroom/1.0";

/// Shared HTTP plumbing for the hosted backend's REST, auth and storage APIs.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base: Url,
    anon_key: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::build(&config.backend_url, &config.anon_key, config.request_timeout())
    }

    pub fn build(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        // Url::join drops the last segment unless the base ends with a slash
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(anyhow::anyhow!("{} cannot be used as a backend URL", base_url).into());
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client,
            base,
            anon_key: anon_key.to_string(),
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Starts a request carrying the project key and either the session
    /// token or, for anonymous reads, the key itself as bearer.
    pub fn request(&self, method: Method, url: Url, access_token: Option<&str>) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Consumes a failed response and returns the most useful message in it.
pub async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    parse_error_message(&text).unwrap_or_else(|| format!("HTTP {status}"))
}

fn parse_error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error_description
        .or(parsed.message)
        .or(parsed.msg)
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn endpoint_keeps_base_path() {
        let client = BackendClient::build("https://proxy.example.com/project", "anon", TIMEOUT);
        let client = client.unwrap();

        let url = client.endpoint("/rest/v1/articles").unwrap();

        assert_eq!(url.as_str(), "https://proxy.example.com/project/rest/v1/articles");
    }

    #[test]
    fn rejects_urls_that_cannot_be_a_base() {
        let err = BackendClient::build("mailto:desk@example.com", "anon", TIMEOUT).unwrap_err();

        assert!(matches!(err, AppError::Other(_)));
        assert!(err.to_string().contains("cannot be used as a backend URL"));
    }

    #[test]
    fn error_message_prefers_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            parse_error_message(body).as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(
            parse_error_message(r#"{"msg":"User already registered"}"#).as_deref(),
            Some("User already registered")
        );
        assert_eq!(parse_error_message("<html>"), None);
    }
}
