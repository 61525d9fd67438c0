use serde_json::{Map, Value};

use crate::descriptor::pins;
use crate::error::Result;
use crate::host::ProxyRequest;
use crate::kind::NodeKind;
use crate::runtime::execute::Next;
use crate::runtime::state::ExecContext;
use crate::runtime::value::{to_display_string, truthy};
use crate::runtime::RuntimeInner;
use crate::types::NodeInstance;

const NO_RESPONSE: &str = "[No response]";
const CHAT_UNAVAILABLE: &str = "[Chat service unavailable]";

/// `headers` property: a JSON object, or a string holding one
fn header_map(node: &NodeInstance) -> Map<String, Value> {
    match node.property("headers") {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(text)) if !text.trim().is_empty() => {
            match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => map,
                _ => {
                    log::debug!("Ignoring malformed headers on node '{}'", node.id);
                    Map::new()
                }
            }
        }
        _ => Map::new(),
    }
}

/// Text bodies that parse as JSON are sent as JSON
fn request_body(body: Value) -> Value {
    match body {
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        other => other,
    }
}

impl RuntimeInner {
    pub(crate) async fn exec_api(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        ctx: &ExecContext,
    ) -> Result<Next> {
        match kind {
            NodeKind::HttpRequest => self.exec_http(node, ctx).await,
            // Legacy Miniboard runtimes ended the chain here; this one continues
            // through `exec`, and the response pin calls the service on demand
            NodeKind::GeminiChat => Ok(Some(pins::EXEC)),
            _ => Ok(None),
        }
    }

    /// Fail-hard: failures continue through `execError`
    async fn exec_http(&self, node: &NodeInstance, ctx: &ExecContext) -> Result<Next> {
        let url_input = self.resolve_input(&node.id, pins::URL, ctx).await;
        let url = if truthy(&url_input) {
            to_display_string(&url_input)
        } else {
            node.str_property_or("url", "").to_string()
        };
        let body_input = self.resolve_input(&node.id, pins::BODY, ctx).await;
        let method = node.str_property_or("method", "GET").to_uppercase();

        let request = ProxyRequest {
            body: (truthy(&body_input) && method != "GET").then(|| request_body(body_input)),
            headers: header_map(node),
            json_path: node.str_property_or("jsonPath", "").to_string(),
            url,
            method,
        };
        self.log(format!("HTTP {} -> {}", request.method, request.url));

        let outcome = self.host.http.send(request).await;
        if !self.is_current(ctx) {
            return Ok(None);
        }
        match outcome {
            Ok(response) => {
                self.log(
                    format!("HTTP {} {}", response.status, response.status_text)
                        .trim_end()
                        .to_string(),
                );
                self.update_state(ctx, &node.id, |s| {
                    s.last_result = Some(response.data);
                    s.last_status = Some(response.status);
                });
                Ok(Some(pins::EXEC))
            }
            Err(e) => {
                self.log(format!("HTTP Error: {}", e));
                self.update_state(ctx, &node.id, |s| {
                    s.last_result = Some(Value::Null);
                    s.last_status = Some(0);
                });
                Ok(Some(pins::EXEC_ERROR))
            }
        }
    }

    pub(crate) async fn eval_api(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        pin_id: &str,
        ctx: &ExecContext,
    ) -> Value {
        match kind {
            NodeKind::HttpRequest => match pin_id {
                pins::STATUS => Value::from(self.read_state(&node.id, |s| s.last_status).unwrap_or(0)),
                _ => self
                    .read_state(&node.id, |s| s.last_result.clone())
                    .unwrap_or(Value::Null),
            },
            NodeKind::GeminiChat => {
                let prompt = self.resolve_input(&node.id, pins::PROMPT, ctx).await;
                let prompt = if truthy(&prompt) {
                    to_display_string(&prompt)
                } else {
                    String::new()
                };
                let full_prompt = match node.str_property("template") {
                    Some(template) => format!("{}\n\n{}", template, prompt),
                    None => prompt,
                };

                let reply = self.host.chat.chat(&full_prompt).await;
                if !self.is_current(ctx) {
                    return Value::Null;
                }
                let text = match reply {
                    Ok(text) if !text.is_empty() => text,
                    Ok(_) => NO_RESPONSE.to_string(),
                    Err(e) => {
                        log::debug!("Chat request failed: {}", e);
                        CHAT_UNAVAILABLE.to_string()
                    }
                };
                Value::String(text)
            }
            _ => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_map_parsing() {
        let node = NodeInstance::new("h", "http-request")
            .with_property("headers", r#"{"Authorization":"Bearer x"}"#);
        assert_eq!(header_map(&node)["Authorization"], "Bearer x");

        let bad = NodeInstance::new("h", "http-request").with_property("headers", "{oops");
        assert!(header_map(&bad).is_empty());
    }

    #[test]
    fn test_request_body() {
        assert_eq!(request_body(json!(r#"{"a":1}"#)), json!({"a": 1}));
        assert_eq!(request_body(json!("plain text")), json!("plain text"));
        assert_eq!(request_body(json!(5)), json!(5));
    }
}
