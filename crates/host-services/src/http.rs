//! Outbound HTTP: the request proxy behind http-request nodes and the chat
//! client behind gemini-chat nodes.

use std::net::IpAddr;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde_json::{json, Value};

use node_engine::{ChatService, HostError, HostResult, HttpProxy, ProxyRequest, ProxyResponse};

use crate::config::ProxyConfig;
use crate::constants::{content_types, defaults};

/// True for loopback, unspecified and private-network addresses
fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback() || v4.is_private() || v4.is_unspecified(),
        IpAddr::V6(v6) => v6.is_loopback() || v6.is_unspecified(),
    }
}

/// Refuse anything that is not plain http(s) to a public host
pub fn check_url(url: &str, allow_private_hosts: bool) -> HostResult<Url> {
    if url.trim().is_empty() {
        return Err(HostError::failed("url is required"));
    }
    let parsed = Url::parse(url).map_err(|e| HostError::Blocked(format!("{}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(HostError::Blocked(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    if allow_private_hosts {
        return Ok(parsed);
    }

    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    let private = match bare.parse::<IpAddr>() {
        Ok(ip) => is_private_ip(ip),
        Err(_) => bare.is_empty() || bare == "localhost" || bare.ends_with(".localhost"),
    };
    if private {
        return Err(HostError::Blocked(
            "internal network requests are not allowed".to_string(),
        ));
    }
    Ok(parsed)
}

/// Extract a value from JSON using a dot-delimited path expression.
///
/// Supports object field access (`field.subfield`), array indexing (`[0]`),
/// and combinations (`field[0].subfield`). Returns `None` when any step
/// is missing.
pub fn extract_json_path<'a>(json: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = json;
    let mut remaining = path;

    while !remaining.is_empty() {
        if let Some(rest) = remaining.strip_prefix('[') {
            let end = rest.find(']')?;
            let index = rest[..end].parse::<usize>().ok()?;
            current = current.get(index)?;
            remaining = &rest[end + 1..];
            remaining = remaining.strip_prefix('.').unwrap_or(remaining);
            continue;
        }

        let split = remaining.find(['.', '[']).unwrap_or(remaining.len());
        let field = &remaining[..split];
        if !field.is_empty() {
            current = current.get(field)?;
        }
        remaining = &remaining[split..];
        remaining = remaining.strip_prefix('.').unwrap_or(remaining);
    }

    Some(current)
}

fn header_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn request_error(e: reqwest::Error, timeout_ms: u64) -> HostError {
    if e.is_timeout() {
        HostError::Timeout(timeout_ms)
    } else {
        HostError::failed(e.to_string())
    }
}

/// reqwest-backed [`HttpProxy`] with a private-network block list
pub struct ReqwestProxy {
    client: Client,
    config: ProxyConfig,
}

impl ReqwestProxy {
    pub fn new(config: ProxyConfig) -> HostResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| HostError::failed(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self { client, config })
    }

    fn headers(request: &ProxyRequest) -> HostResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HostError::failed(format!("invalid header name '{}'", name)))?;
            let value = HeaderValue::from_str(&header_text(value))
                .map_err(|_| HostError::failed(format!("invalid value for header '{}'", name)))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl HttpProxy for ReqwestProxy {
    async fn send(&self, request: ProxyRequest) -> HostResult<ProxyResponse> {
        let url = check_url(&request.url, self.config.allow_private_hosts)?;
        let method = Method::from_bytes(request.method.to_uppercase().as_bytes())
            .map_err(|_| HostError::failed(format!("invalid method '{}'", request.method)))?;
        let timeout_ms = self.config.timeout_secs * 1000;

        let mut builder = self
            .client
            .request(method.clone(), url)
            .headers(Self::headers(&request)?);
        if method != Method::GET {
            builder = match &request.body {
                Some(Value::String(text)) => builder.body(text.clone()),
                // json() only sets Content-Type when the node did not
                Some(body) => builder.json(body),
                None => builder,
            };
        }

        log::debug!("Proxying {} {}", method, request.url);
        let response = builder
            .send()
            .await
            .map_err(|e| request_error(e, timeout_ms))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains(content_types::JSON));

        let data = if is_json {
            response
                .json::<Value>()
                .await
                .map_err(|e| request_error(e, timeout_ms))?
        } else {
            Value::String(
                response
                    .text()
                    .await
                    .map_err(|e| request_error(e, timeout_ms))?,
            )
        };

        let data = if !request.json_path.is_empty() && (data.is_object() || data.is_array()) {
            extract_json_path(&data, &request.json_path)
                .cloned()
                .unwrap_or(Value::Null)
        } else {
            data
        };

        Ok(ProxyResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            data,
            is_json,
        })
    }
}

/// Chat client for a backend that takes `{ "prompt" }` and answers `{ "response" }`
pub struct HttpChatService {
    client: Client,
    endpoint: String,
}

impl HttpChatService {
    pub fn new(endpoint: impl Into<String>) -> HostResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(defaults::CHAT_TIMEOUT_SECS))
            .build()
            .map_err(|e| HostError::failed(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn chat(&self, prompt: &str) -> HostResult<String> {
        let timeout_ms = defaults::CHAT_TIMEOUT_SECS * 1000;
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| request_error(e, timeout_ms))?;

        if !response.status().is_success() {
            return Err(HostError::failed(format!(
                "chat service returned {}",
                response.status()
            )));
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| request_error(e, timeout_ms))?;
        Ok(body
            .get("response")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}
