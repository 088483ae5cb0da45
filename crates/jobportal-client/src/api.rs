//! HTTP client for the notification API.

use std::time::Duration;

use jobportal_core::notification::model::{NewNotification, Notification, NotificationList};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use crate::error::{ClientError, ClientResult};

/// Default server URL.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3040";

/// Header carrying the shared secret for internal routes.
const INTERNAL_TOKEN_HEADER: &str = "x-internal-token";

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnreadCount {
    unread_count: i64,
}

#[derive(Deserialize)]
struct Updated {
    updated: u64,
}

/// Talks to the read-state API on behalf of one identity.
#[derive(Clone)]
pub struct NotificationApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    internal_token: Option<String>,
}

impl NotificationApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            internal_token: None,
        }
    }

    /// Bearer token for the caller's identity.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_internal_token(mut self, token: impl Into<String>) -> Self {
        self.internal_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Push channel URL with the bearer token in the query string.
    pub fn ws_url(&self) -> ClientResult<String> {
        let mut url = self.endpoint(&["ws"])?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| ClientError::InvalidUrl(format!("{} has no WebSocket form", self.base_url)))?;
        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(url.into())
    }

    /// Fetch the caller's notifications, newest first.
    pub async fn fetch(&self) -> ClientResult<NotificationList> {
        let response = self.authed(self.client.get(self.endpoint(&["notifications"])?)).send().await?;
        decode(response).await
    }

    pub async fn unread_count(&self) -> ClientResult<i64> {
        let response = self
            .authed(self.client.get(self.endpoint(&["notifications", "unread-count"])?))
            .send()
            .await?;
        let body: UnreadCount = decode(response).await?;
        Ok(body.unread_count)
    }

    pub async fn mark_read(&self, id: &str) -> ClientResult<Notification> {
        let response = self
            .authed(self.client.put(self.endpoint(&["notifications", id, "read"])?))
            .send()
            .await?;
        decode(response).await
    }

    /// Mark every notification read. Returns how many changed.
    pub async fn mark_all_read(&self) -> ClientResult<u64> {
        let response = self
            .authed(self.client.put(self.endpoint(&["notifications", "read-all"])?))
            .send()
            .await?;
        let body: Updated = decode(response).await?;
        Ok(body.updated)
    }

    /// Raise a notification through the internal entry point.
    pub async fn create(&self, new: &NewNotification) -> ClientResult<Notification> {
        let mut request = self.client.post(self.endpoint(&["internal", "notifications"])?).json(new);
        if let Some(token) = &self.internal_token {
            request = request.header(INTERNAL_TOKEN_HEADER, token);
        }
        decode(request.send().await?).await
    }

    /// The base URL with `segments` appended, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.error.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url() {
        let api = NotificationApi::new("http://localhost:3040/").with_token("abc");
        assert_eq!(api.base_url(), "http://localhost:3040");
        assert_eq!(api.ws_url().unwrap(), "ws://localhost:3040/ws?token=abc");

        let api = NotificationApi::new("https://portal.example.com");
        assert_eq!(api.ws_url().unwrap(), "wss://portal.example.com/ws");
    }

    #[test]
    fn test_ws_url_encodes_token() {
        let api = NotificationApi::new("http://localhost:3040").with_token("a+b=c&d");
        assert_eq!(
            api.ws_url().unwrap(),
            "ws://localhost:3040/ws?token=a%2Bb%3Dc%26d"
        );
    }

    #[test]
    fn test_endpoint_escapes_id() {
        let api = NotificationApi::new("http://localhost:3040/");
        let url = api.endpoint(&["notifications", "../a/b?c", "read"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3040/notifications/..%2Fa%2Fb%3Fc/read"
        );

        let api = NotificationApi::new("https://portal.example.com/api");
        let url = api.endpoint(&["notifications", "read-all"]).unwrap();
        assert_eq!(url.as_str(), "https://portal.example.com/api/notifications/read-all");
    }

    #[test]
    fn test_bad_base_url() {
        let api = NotificationApi::new("not a url");
        assert!(matches!(api.ws_url(), Err(ClientError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_mark_read_with_slash_in_id_stays_on_route() {
        use jobportal_web::state::AppState;
        use jobportal_web::ServerConfig;

        let state = AppState::new(jobportal_db::memory_pool(), ServerConfig::new("api-secret"));
        let app = jobportal_web::create_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let identity = jobportal_core::Identity::new("u123", jobportal_core::Role::Candidate).unwrap();
        let token =
            jobportal_core::auth::issue_token("api-secret", &identity, chrono::Duration::minutes(5)).unwrap();
        let api = NotificationApi::new(&format!("http://{}", addr)).with_token(token);

        // Unescaped, this id would turn the request into PUT /notifications/read-all.
        let err = api.mark_read("read-all?x=/").await.unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {}", err);
    }
}
