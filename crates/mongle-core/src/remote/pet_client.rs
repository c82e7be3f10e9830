//! HTTP client for the pet status API.
//!
//! Wraps the four remote endpoints the engine consumes. The request
//! timeout is fixed at construction so that a hung request always
//! resolves; without it a stuck action call would hold the in-flight
//! flag forever and silently disable every further gesture.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::pet::PetStatus;

use super::types::{GaugeSavePayload, PetAction, RemoteError};

/// Default request timeout applied at client construction.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionRequest<'a> {
    user_id: &'a str,
}

/// Pet API client.
#[derive(Debug, Clone)]
pub struct PetClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PetClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RemoteError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Fetch the authoritative pet aggregate.
    pub async fn fetch_status(&self, user_id: &str) -> Result<PetStatus, RemoteError> {
        let mut url = self.endpoint("/pet/status")?;
        url.query_pairs_mut().append_pair("userId", user_id);
        let resp = self.http.get(url).send().await?;
        Self::into_status(resp).await
    }

    /// Perform one gauge-affecting action server-side and return the
    /// updated aggregate.
    pub async fn perform(
        &self,
        action: PetAction,
        user_id: &str,
    ) -> Result<PetStatus, RemoteError> {
        let url = self.endpoint(action.endpoint())?;
        let resp = self
            .http
            .post(url)
            .json(&ActionRequest { user_id })
            .send()
            .await?;
        Self::into_status(resp).await
    }

    /// Best-effort background flush of raw gauge values. The response
    /// body carries nothing the client needs.
    pub async fn save_gauges(&self, payload: &GaugeSavePayload) -> Result<(), RemoteError> {
        let url = self.endpoint("/pet/gauges")?;
        let resp = self.http.post(url).json(payload).send().await?;
        Self::check(resp)?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::InvalidBaseUrl(format!("{path}: {e}")))
    }

    async fn into_status(resp: Response) -> Result<PetStatus, RemoteError> {
        let resp = Self::check(resp)?;
        Ok(resp.json::<PetStatus>().await?)
    }

    /// Map the staleness signal to its tagged variant; everything else
    /// non-2xx is a plain status error.
    fn check(resp: Response) -> Result<Response, RemoteError> {
        let status = resp.status();
        if status == StatusCode::CONFLICT {
            return Err(RemoteError::Conflict);
        }
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> PetClient {
        PetClient::new(&server.url(), DEFAULT_REQUEST_TIMEOUT).unwrap()
    }

    const STATUS_BODY: &str =
        r#"{"affection":72.0,"air":31.5,"energy":90.0,"level":2,"experience":45}"#;

    #[tokio::test]
    async fn fetch_status_decodes_aggregate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pet/status")
            .match_query(Matcher::UrlEncoded("userId".into(), "u1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(STATUS_BODY)
            .create_async()
            .await;

        let status = client(&server).fetch_status("u1").await.unwrap();
        assert_eq!(status.affection, 72.0);
        assert_eq!(status.level, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn perform_posts_user_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pet/ventilate")
            .match_body(Matcher::Json(serde_json::json!({"userId": "u1"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(STATUS_BODY)
            .create_async()
            .await;

        let status = client(&server)
            .perform(PetAction::Ventilate, "u1")
            .await
            .unwrap();
        assert_eq!(status.energy, 90.0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn conflict_status_maps_to_tagged_variant() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/pet/affection-complete")
            .with_status(409)
            .create_async()
            .await;

        let err = client(&server)
            .perform(PetAction::AffectionComplete, "u1")
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/pet/collect-shard")
            .with_status(500)
            .create_async()
            .await;

        let err = client(&server)
            .perform(PetAction::CollectShard, "u1")
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert!(!err.is_conflict());
    }

    #[tokio::test]
    async fn save_gauges_ignores_response_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pet/gauges")
            .match_body(Matcher::PartialJson(serde_json::json!({"userId": "u1"})))
            .with_status(204)
            .create_async()
            .await;

        let payload = GaugeSavePayload {
            user_id: "u1".into(),
            affection: 48.2,
            air: 50.0,
            energy: 47.1,
            saved_at: Utc::now(),
        };
        client(&server).save_gauges(&payload).await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = PetClient::new("not a url", DEFAULT_REQUEST_TIMEOUT).unwrap_err();
        assert!(matches!(err, RemoteError::InvalidBaseUrl(_)));
    }
}
