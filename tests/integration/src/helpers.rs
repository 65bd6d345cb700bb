//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and driving WebSocket
//! clients against them.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use helpdesk_common::AppConfig;
use helpdesk_gateway::{create_app, create_gateway_state, server::serve};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

/// How long a client waits for an expected frame
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a client listens when asserting nothing arrives
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
    _hub: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with default config
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::default()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let (state, hub) = create_gateway_state(config);
        let app = create_app(state);

        // Ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
            _hub: hub,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket URL of the socket endpoint
    pub fn socket_url(&self) -> String {
        format!("ws://{}/socket", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Current presence list from `/presence`
    pub async fn presence(&self) -> Result<Vec<Value>> {
        let response = self.get("/presence").await?;
        assert_json(response, StatusCode::OK).await
    }

    /// Open a WebSocket client
    pub async fn connect(&self) -> Result<WsClient> {
        WsClient::connect(&self.socket_url()).await
    }
}

/// WebSocket client speaking the `{event, data}` envelope
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url)
            .await
            .with_context(|| format!("connect to {url}"))?;
        Ok(Self { stream })
    }

    /// Send one envelope
    pub async fn emit(&mut self, event: &str, data: Value) -> Result<()> {
        let frame = json!({ "event": event, "data": data });
        self.send_raw(Message::Text(frame.to_string())).await
    }

    /// Send a frame as-is
    pub async fn send_raw(&mut self, message: Message) -> Result<()> {
        self.stream.send(message).await?;
        Ok(())
    }

    /// Announce an identity
    pub async fn announce(&mut self, user_id: Value, user_info: Value) -> Result<()> {
        self.emit("addUser", json!({ "userId": user_id, "userInfo": user_info }))
            .await
    }

    /// Next text frame parsed as JSON
    pub async fn recv(&mut self) -> Result<Value> {
        self.recv_within(RECV_TIMEOUT)
            .await?
            .context("timed out waiting for a frame")
    }

    /// Next text frame within `wait`, or None
    pub async fn recv_within(&mut self, wait: Duration) -> Result<Option<Value>> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let next = tokio::time::timeout_at(deadline, self.stream.next()).await;
            match next {
                Err(_) => return Ok(None),
                Ok(None) => anyhow::bail!("socket closed"),
                Ok(Some(message)) => match message? {
                    Message::Text(text) => return Ok(Some(serde_json::from_str(&text)?)),
                    Message::Close(_) => anyhow::bail!("socket closed"),
                    _ => {}
                },
            }
        }
    }

    /// Skip frames until one with the given event name arrives
    pub async fn recv_event(&mut self, event: &str) -> Result<Value> {
        loop {
            let frame = self.recv().await?;
            if frame["event"] == event {
                return Ok(frame["data"].clone());
            }
        }
    }

    /// Skip frames until a `getUser` snapshot with exactly `count` entries
    pub async fn wait_for_presence(&mut self, count: usize) -> Result<Vec<Value>> {
        loop {
            let data = self.recv_event("getUser").await?;
            let entries = data.as_array().cloned().unwrap_or_default();
            if entries.len() == count {
                return Ok(entries);
            }
        }
    }

    /// Assert no frame with the given event name arrives for a while
    pub async fn expect_no_event(&mut self, event: &str) -> Result<()> {
        let deadline = tokio::time::Instant::now() + QUIET_PERIOD;
        loop {
            let left = deadline.saturating_duration_since(tokio::time::Instant::now());
            match self.recv_within(left).await? {
                None => return Ok(()),
                Some(frame) if frame["event"] == event => {
                    anyhow::bail!("unexpected {event}: {frame}")
                }
                Some(_) => {}
            }
        }
    }

    /// Close the socket cleanly
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

/// User IDs in a presence list
pub fn user_ids(entries: &[Value]) -> Vec<Value> {
    entries.iter().map(|e| e["userId"].clone()).collect()
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
