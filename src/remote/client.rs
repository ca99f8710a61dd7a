//! HTTP client for the remote playback server.
//!
//! # Responsibilities
//! - Build request URLs from the current endpoint
//! - Send JSON bodies, decode JSON responses
//! - Turn non-success statuses and connection failures into `RequestError`
//!
//! # Design Decisions
//! - No retries here; the poller's circuit breaker and the user decide
//! - The endpoint is swapped atomically when the host pushes new global
//!   settings; a request in flight keeps the endpoint it started with

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::RemoteConfig;
use crate::remote::types::{
    PlaybackSnapshot, PlaylistState, RemoteEndpoint, Repeat, RequestError, SoundId,
    SoundboardState,
};

/// Remote playback API client.
#[derive(Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    endpoint: Arc<ArcSwap<RemoteEndpoint>>,
}

impl RemoteClient {
    /// Create a client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: RemoteEndpoint, timeout: Duration) -> Result<Self, RequestError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(RequestError::Transport)?;

        Ok(Self {
            http,
            endpoint: Arc::new(ArcSwap::from_pointee(endpoint)),
        })
    }

    /// Create a client from the `[remote]` configuration section.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, RequestError> {
        let endpoint = RemoteEndpoint::new(
            config.address.clone(),
            config.port,
            Some(config.api_version.as_str()),
        );
        Self::new(endpoint, Duration::from_secs(config.request_timeout_secs))
    }

    /// The endpoint new requests will use.
    pub fn endpoint(&self) -> Arc<RemoteEndpoint> {
        self.endpoint.load_full()
    }

    /// Point subsequent requests at a different server.
    pub fn set_endpoint(&self, endpoint: RemoteEndpoint) {
        let previous = self.endpoint.swap(Arc::new(endpoint));
        tracing::info!(
            previous = %previous,
            current = %self.endpoint.load(),
            "Remote endpoint updated"
        );
    }

    /// Issue a request against the current endpoint and return the JSON body.
    pub async fn call(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, RequestError> {
        let endpoint = self.endpoint.load_full();
        self.call_at(&endpoint, path, method, body).await
    }

    /// Issue a request against an explicit endpoint.
    pub async fn call_at(
        &self,
        endpoint: &RemoteEndpoint,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, RequestError> {
        let url = endpoint.url(path)?;
        tracing::trace!(method = %method, url = %url, "Remote request");

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");
        if method != Method::GET {
            request = request.json(&body.unwrap_or_else(|| json!({})));
        }

        let response = request.send().await.map_err(RequestError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Response {
                status,
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(RequestError::Transport)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(RequestError::Decode)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        let value = self.call(path, Method::GET, None).await?;
        serde_json::from_value(value).map_err(RequestError::Decode)
    }

    async fn put(&self, path: &str, body: Value) -> Result<(), RequestError> {
        self.call(path, Method::PUT, Some(body)).await.map(drop)
    }

    async fn post(&self, path: &str) -> Result<(), RequestError> {
        self.call(path, Method::POST, None).await.map(drop)
    }

    // --- Playback state ---

    pub async fn playlist_playback(&self) -> Result<PlaylistState, RequestError> {
        self.get("playlist/playback").await
    }

    pub async fn soundboard_playback(&self) -> Result<SoundboardState, RequestError> {
        self.get("soundboard/playback").await
    }

    /// Fetch both playback states. Fails as a whole if either request fails.
    pub async fn fetch_snapshot(&self) -> Result<PlaybackSnapshot, RequestError> {
        let (playlist, soundboard) =
            tokio::try_join!(self.playlist_playback(), self.soundboard_playback())?;
        Ok(PlaybackSnapshot {
            playlist,
            soundboard,
        })
    }

    // --- Playlist ---

    /// Start a playlist or a single track by id.
    pub async fn play_playlist(&self, id: &str) -> Result<(), RequestError> {
        self.put("playlist/play", json!({ "id": id })).await
    }

    pub async fn play(&self) -> Result<(), RequestError> {
        self.put("playlist/playback/play", json!({})).await
    }

    pub async fn pause(&self) -> Result<(), RequestError> {
        self.put("playlist/playback/pause", json!({})).await
    }

    pub async fn set_volume(&self, volume: f64) -> Result<(), RequestError> {
        self.put("playlist/playback/volume", json!({ "volume": volume })).await
    }

    pub async fn set_mute(&self, mute: bool) -> Result<(), RequestError> {
        self.put("playlist/playback/mute", json!({ "mute": mute })).await
    }

    pub async fn set_shuffle(&self, shuffle: bool) -> Result<(), RequestError> {
        self.put("playlist/playback/shuffle", json!({ "shuffle": shuffle })).await
    }

    pub async fn set_repeat(&self, repeat: Repeat) -> Result<(), RequestError> {
        self.put("playlist/playback/repeat", json!({ "repeat": repeat })).await
    }

    pub async fn next(&self) -> Result<(), RequestError> {
        self.post("playlist/playback/next").await
    }

    pub async fn previous(&self) -> Result<(), RequestError> {
        self.post("playlist/playback/previous").await
    }

    // --- Soundboard ---

    pub async fn play_sound(&self, id: &SoundId) -> Result<(), RequestError> {
        self.put("soundboard/play", json!({ "id": id })).await
    }

    pub async fn stop_sound(&self, id: &SoundId) -> Result<(), RequestError> {
        self.put("soundboard/stop", json!({ "id": id })).await
    }
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("endpoint", &self.endpoint.load())
            .finish()
    }
}
