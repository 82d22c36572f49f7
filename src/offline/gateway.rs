use std::{io, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use super::interceptor::{AssetRecord, OfflineInterceptor};

// Set to true to enable per-request logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_warn};

/// Origin the primary surface is loaded from. Every request the game page
/// makes against it reaches [`OfflineGateway::handle`].
#[cfg(any(windows, target_os = "android"))]
pub const OFFLINE_ORIGIN: &str = "http://offline.localhost";
#[cfg(not(any(windows, target_os = "android")))]
pub const OFFLINE_ORIGIN: &str = "offline://localhost";

/// Request headers that only make sense on the hop between webview and gateway.
const HOP_BY_HOP: [&str; 10] = [
    "accept-encoding",
    "connection",
    "content-length",
    "host",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP
        .iter()
        .any(|header| header.eq_ignore_ascii_case(name))
}

/// What happens to a request the bundle can't answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissStrategy {
    /// Fetch from the game server and answer on the offline origin.
    /// The page never leaves the offline origin.
    #[default]
    Proxy,
    /// `307` to the same path on the game server.
    Redirect,
}

#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: String,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl GatewayRequest {
    pub fn get(uri: impl Into<String>) -> Self {
        Self {
            method: "GET".into(),
            uri: uri.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl GatewayResponse {
    /// `200` with the bundled body. Text types carry the record's charset.
    pub fn from_asset(record: AssetRecord) -> io::Result<Self> {
        let content_type = if record.mime_type.starts_with("text/") {
            format!("{}; charset={}", record.mime_type, record.encoding)
        } else {
            record.mime_type.to_string()
        };

        let mut headers = vec![("Content-Type".to_string(), content_type)];
        headers.extend(record.headers.iter().cloned());
        let body = record.into_bytes()?;

        Ok(Self {
            status: 200,
            headers,
            body,
        })
    }

    pub fn redirect(location: &Url) -> Self {
        Self {
            status: 307,
            headers: vec![
                ("Location".to_string(), location.to_string()),
                ("Cache-Control".to_string(), "no-store".to_string()),
            ],
            body: Vec::new(),
        }
    }

    pub fn bad_gateway() -> Self {
        Self {
            status: 502,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The game server, as seen from the gateway.
pub trait Upstream: Send + Sync {
    fn fetch(&self, url: &Url, request: &GatewayRequest) -> Result<GatewayResponse>;
}

/// Blocking HTTP client. Call it from a blocking thread, never from async code.
pub struct ReqwestUpstream {
    client: reqwest::blocking::Client,
}

impl ReqwestUpstream {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self { client })
    }
}

impl Upstream for ReqwestUpstream {
    fn fetch(&self, url: &Url, request: &GatewayRequest) -> Result<GatewayResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .with_context(|| format!("Invalid request method {}", request.method))?;

        let mut builder = self.client.request(method, url.clone());
        for (name, value) in &request.headers {
            if !is_hop_by_hop(name) {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder
            .send()
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter(|(name, _)| !is_hop_by_hop(name.as_str()))
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .with_context(|| format!("Failed to read body from {url}"))?
            .to_vec();

        Ok(GatewayResponse {
            status,
            headers,
            body,
        })
    }
}

/// Front door of the offline origin.
///
/// GET and HEAD requests the bundle can answer are served locally. Everything
/// else goes to the game server according to the [`MissStrategy`].
pub struct OfflineGateway {
    interceptor: OfflineInterceptor,
    origin: Url,
    entry: Url,
    strategy: MissStrategy,
    upstream: Box<dyn Upstream>,
}

impl OfflineGateway {
    /// `primary_url` is the game server page the offline origin stands in for.
    pub fn new(
        interceptor: OfflineInterceptor,
        primary_url: &str,
        strategy: MissStrategy,
        upstream: Box<dyn Upstream>,
    ) -> Result<Self> {
        let origin = Url::parse(primary_url)
            .with_context(|| format!("Invalid primary url {primary_url}"))?;

        let mut entry = Url::parse(OFFLINE_ORIGIN)
            .with_context(|| format!("Invalid offline origin {OFFLINE_ORIGIN}"))?;
        entry.set_path(origin.path());
        entry.set_query(origin.query());

        Ok(Self {
            interceptor,
            origin,
            entry,
            strategy,
            upstream,
        })
    }

    /// The primary page on the offline origin. Load this instead of `primary_url`.
    pub fn entry_url(&self) -> &Url {
        &self.entry
    }

    /// Same path and query on the game server. `None` for an unparsable URI.
    pub fn network_url(&self, request_uri: &str) -> Option<Url> {
        let request = Url::parse(request_uri).ok()?;
        let mut target = self.origin.clone();
        target.set_path(request.path());
        target.set_query(request.query());
        Some(target)
    }

    pub fn handle(&self, request: &GatewayRequest) -> GatewayResponse {
        let is_read = matches!(request.method.as_str(), "GET" | "HEAD");
        if is_read {
            if let Some(record) = self.interceptor.intercept(&request.uri) {
                match GatewayResponse::from_asset(record) {
                    Ok(mut response) => {
                        if request.method == "HEAD" {
                            response.body.clear();
                        }
                        return response;
                    }
                    Err(err) => {
                        log_error!("failed to read bundled asset for {}: {}", request.uri, err);
                    }
                }
            }
        }

        let Some(target) = self.network_url(&request.uri) else {
            log_warn!("unroutable offline request {}", request.uri);
            return GatewayResponse::not_found();
        };

        match self.strategy {
            MissStrategy::Redirect => {
                log_debug!("redirecting {} to {}", request.uri, target);
                GatewayResponse::redirect(&target)
            }
            MissStrategy::Proxy => {
                log_debug!("proxying {} {}", request.method, target);
                match self.upstream.fetch(&target, request) {
                    Ok(response) => response,
                    Err(err) => {
                        log_error!("upstream fetch failed for {}: {:#}", target, err);
                        GatewayResponse::bad_gateway()
                    }
                }
            }
        }
    }
}
