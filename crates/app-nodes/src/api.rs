//! API nodes
//!
//! Outbound requests go through the host's HTTP proxy and chat service,
//! never directly from the runtime.

use node_engine::{
    pins, NodeCategory, NodeDescriptor, NodeTypeDefinition, PinDef, PinType, PropertySchema,
};

/// Asks the chat service; the reply is fetched when `response` is pulled
pub struct GeminiChatNode;

impl NodeDescriptor for GeminiChatNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("gemini-chat", NodeCategory::Api, "Gemini Chat")
            .description("Asks the chat assistant (requires a backend)")
            .input(PinDef::exec())
            .input(PinDef::new(pins::PROMPT, "Prompt", PinType::String))
            .output(PinDef::exec())
            .output(PinDef::new(pins::RESPONSE, "Response", PinType::String))
            .property("template", PropertySchema::string("Template", ""))
    }
}

inventory::submit!(node_engine::DescriptorFn(GeminiChatNode::descriptor));

/// HTTP request through the host proxy
///
/// Continues through `exec` on any response, including non-2xx statuses,
/// and through `execError` when the request itself fails.
pub struct HttpRequestNode;

impl NodeDescriptor for HttpRequestNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("http-request", NodeCategory::Api, "HTTP Request")
            .description("Calls an external API through the backend proxy")
            .input(PinDef::exec())
            .input(PinDef::new(pins::URL, "URL", PinType::String))
            .input(PinDef::new(pins::BODY, "Body", PinType::String))
            .output(PinDef::exec())
            .output(PinDef::exec_named(pins::EXEC_ERROR, "Error"))
            .output(PinDef::new(pins::DATA, "Response Data", PinType::Any))
            .output(PinDef::new(pins::STATUS, "Status Code", PinType::Number))
            .property(
                "method",
                PropertySchema::select("Method", "GET", &["GET", "POST", "PUT", "DELETE", "PATCH"]),
            )
            .property("url", PropertySchema::string("URL", ""))
            .property("jsonPath", PropertySchema::string("JSON Path", ""))
            .property("headers", PropertySchema::string("Headers (JSON)", "{}"))
    }
}

inventory::submit!(node_engine::DescriptorFn(HttpRequestNode::descriptor));
