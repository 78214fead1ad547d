// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::retry::RetryPolicy;
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Account credentials used for HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    auth_token: String,
    /// Account group to scope requests to. The user's default group is used
    /// when unset.
    account_group_id: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            auth_token: auth_token.into(),
            account_group_id: None,
        }
    }

    pub fn with_account_group(mut self, account_group_id: impl Into<String>) -> Self {
        self.account_group_id = Some(account_group_id.into());
        self
    }

    pub fn account_group_id(&self) -> Option<&str> {
        self.account_group_id.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("auth_token", &"<redacted>")
            .field("account_group_id", &self.account_group_id)
            .finish()
    }
}

/// Issues authenticated requests against the API and returns the parsed JSON.
///
/// All three request methods share the same policy:
/// - `429` is retried after the configured back-off, up to the policy's
///   attempt limit. If every attempt is throttled the call resolves to
///   `Ok(None)`.
/// - Any other non-success status fails immediately with [`ApiError::Http`].
/// - Transport failures fail immediately with [`ApiError::Transport`].
///
/// Requests are issued one at a time; the client keeps no state between calls
/// besides its credentials.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

impl ApiClient {
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let client = Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            retry: config.retry,
            cancel: CancellationToken::new(),
        })
    }

    /// Lets `token` abort requests. Cancelling ends an in-flight request or a
    /// rate-limit back-off with [`ApiError::Cancelled`], and every later call
    /// fails the same way without touching the network.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// GET `endpoint` (e.g. `/agents`) with the given query parameters.
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<Value>, ApiError> {
        let url = self.endpoint_url(endpoint, params)?;
        self.send(Method::GET, url, None).await
    }

    /// GET a ready-made absolute URL, such as a pagination link returned by the
    /// API. The URL is sent as given: no `format` or `aid` parameter is added.
    pub async fn get_by_url(&self, url: &str) -> Result<Option<Value>, ApiError> {
        let url = Url::parse(url).map_err(|e| ApiError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        self.send(Method::GET, url, None).await
    }

    /// POST `body` as JSON to `endpoint`.
    pub async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        params: &[(&str, &str)],
    ) -> Result<Option<Value>, ApiError> {
        let url = self.endpoint_url(endpoint, params)?;
        self.send(Method::POST, url, Some(body)).await
    }

    /// Builds `base/endpoint?params&format=json[&aid=..]`.
    ///
    /// The account group from the credentials is only appended when the
    /// caller did not pass an explicit `aid`.
    pub fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, endpoint.trim_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params.iter().filter(|(key, _)| *key != "format") {
                query.append_pair(key, value);
            }
            query.append_pair("format", "json");
            if let Some(aid) = self.credentials.account_group_id() {
                if !params.iter().any(|(key, _)| *key == "aid") {
                    query.append_pair("aid", aid);
                }
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Option<Value>, ApiError> {
        for attempt in 1..=self.retry.max_attempts {
            debug!(method = %method, url = %url, attempt, "API request");

            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .basic_auth(&self.credentials.email, Some(&self.credentials.auth_token));
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(ApiError::Cancelled),
                response = request.send() => response?,
            };
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if !self.retry.should_retry(attempt) {
                    break;
                }
                warn!(
                    "API rate limit hit (attempt {attempt}/{}), retrying in {:?}",
                    self.retry.max_attempts, self.retry.backoff
                );
                self.wait_backoff().await?;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                debug!(status = %status, body = %body, "API error response");
                return Err(ApiError::Http {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }

            let bytes = response.bytes().await?;
            debug!(status = %status, body_len = bytes.len(), "API response");
            return Ok(Some(serde_json::from_slice(&bytes)?));
        }

        warn!(
            "API still rate limited after {} attempts, giving up on {method} {url}",
            self.retry.max_attempts
        );
        Ok(None)
    }

    async fn wait_backoff(&self) -> Result<(), ApiError> {
        tokio::select! {
            () = self.cancel.cancelled() => Err(ApiError::Cancelled),
            () = tokio::time::sleep(self.retry.backoff) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::time::Duration;
    use tracing_test::traced_test;

    fn client_for(base_url: &str, credentials: Credentials) -> ApiClient {
        ApiClient::new(
            credentials,
            ClientConfig {
                base_url: base_url.to_string(),
                retry: RetryPolicy::immediate(2),
                ..Default::default()
            },
        )
        .expect("failed to build client")
    }

    #[test]
    fn test_endpoint_url_appends_format() {
        let client = client_for(
            "https://api.thousandeyes.com",
            Credentials::new("user@example.com", "token"),
        );
        let url = client.endpoint_url("/agents", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.thousandeyes.com/agents?format=json");
    }

    #[test]
    fn test_endpoint_url_normalises_slashes() {
        let client = client_for(
            "https://api.thousandeyes.com/",
            Credentials::new("user@example.com", "token"),
        );
        let url = client.endpoint_url("agents/", &[("window", "2d")]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.thousandeyes.com/agents?window=2d&format=json"
        );
    }

    #[test]
    fn test_endpoint_url_format_cannot_be_overridden() {
        let client = client_for(
            "https://api.thousandeyes.com",
            Credentials::new("user@example.com", "token"),
        );
        let url = client.endpoint_url("/agents", &[("format", "xml")]).unwrap();
        assert_eq!(url.query(), Some("format=json"));
    }

    #[test]
    fn test_endpoint_url_adds_account_group() {
        let client = client_for(
            "https://api.thousandeyes.com",
            Credentials::new("user@example.com", "token").with_account_group("42"),
        );
        let url = client.endpoint_url("/tests", &[]).unwrap();
        assert_eq!(url.query(), Some("format=json&aid=42"));
    }

    #[test]
    fn test_endpoint_url_explicit_aid_wins() {
        let client = client_for(
            "https://api.thousandeyes.com",
            Credentials::new("user@example.com", "token").with_account_group("42"),
        );
        let url = client.endpoint_url("/tests", &[("aid", "7")]).unwrap();
        assert_eq!(url.query(), Some("aid=7&format=json"));
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let credentials = Credentials::new("user@example.com", "super-secret");
        let debug_str = format!("{:?}", credentials);
        assert!(debug_str.contains("user@example.com"));
        assert!(!debug_str.contains("super-secret"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_waits_for_the_configured_delay() {
        let client = ApiClient::new(
            Credentials::new("user@example.com", "token"),
            ClientConfig {
                retry: RetryPolicy::new(3, Duration::from_secs(10)),
                ..Default::default()
            },
        )
        .expect("failed to build client");

        let started = tokio::time::Instant::now();
        client.wait_backoff().await.expect("back-off failed");
        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_backoff_returns_immediately() {
        let token = CancellationToken::new();
        let client = client_for(
            "https://api.thousandeyes.com",
            Credentials::new("user@example.com", "token"),
        )
        .with_cancellation(token.clone());
        token.cancel();

        let started = tokio::time::Instant::now();
        assert!(matches!(client.wait_backoff().await, Err(ApiError::Cancelled)));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_exhausted_retries_are_logged() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/agents")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server.url(), Credentials::new("user@example.com", "token"));
        let result = client.get("/agents", &[]).await;

        assert!(matches!(result, Ok(None)));
        assert!(logs_contain("API rate limit hit (attempt 1/2)"));
        assert!(logs_contain("still rate limited after 2 attempts"));
        mock.assert_async().await;
    }
}
