use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::Notify;

use super::*;
use crate::error::HostError;
use crate::events::VecEventSink;
use crate::host::{
    Battery, BatteryStatus, ChatService, Clipboard, GeoPosition, Geolocation, HostResult,
    HttpProxy, KeyValueStore, MemoryStore, NotificationPermission, Notifier, ProxyRequest,
    ProxyResponse,
};
use crate::types::{Connection, NodeInstance};
use crate::ui::UiStateCallbacks;

struct AppBuilder {
    app: MiniApp,
}

impl AppBuilder {
    fn new() -> Self {
        let mut app = MiniApp::create_empty("Test");
        app.id = "app_test".to_string();
        Self { app }
    }

    fn node(mut self, id: &str, node_type: &str, props: Value) -> Self {
        let mut node = NodeInstance::new(id, node_type);
        if let Value::Object(map) = props {
            node.properties = map;
        }
        self.app.nodes.push(node);
        self
    }

    fn wire(mut self, from: &str, from_pin: &str, to: &str, to_pin: &str) -> Self {
        self.app
            .connections
            .push(Connection::new(from, from_pin, to, to_pin));
        self
    }

    /// `from.exec -> to.exec`
    fn then(self, from: &str, to: &str) -> Self {
        self.wire(from, "exec", to, "exec")
    }

    fn build(self) -> MiniApp {
        self.app
    }
}

fn runtime_with(app: &MiniApp, host: HostServices) -> (Runtime, UiStateCallbacks) {
    let callbacks = UiStateCallbacks::new();
    let runtime = Runtime::new(app, Arc::new(callbacks.clone()), host);
    (runtime, callbacks)
}

fn runtime(app: &MiniApp) -> (Runtime, UiStateCallbacks) {
    runtime_with(app, HostServices::default())
}

fn messages(runtime: &Runtime) -> Vec<String> {
    runtime.logs().into_iter().map(|e| e.message).collect()
}

/// A log node printing a literal
fn log_literal(builder: AppBuilder, id: &str, text: &str) -> AppBuilder {
    let lit = format!("{}_text", id);
    builder
        .node(id, "log", json!({}))
        .node(&lit, "string-literal", json!({ "value": text }))
        .wire(&lit, "value", id, "message")
}

#[tokio::test]
async fn test_start_runs_app_start_chains_once() {
    let app = log_literal(
        AppBuilder::new().node("start", "app-start", json!({})),
        "hello",
        "hello",
    )
    .then("start", "hello")
    .build();
    let (rt, _) = runtime(&app);

    assert_eq!(rt.state(), RunState::Constructed);
    rt.start().await;
    assert_eq!(rt.state(), RunState::Started);
    assert_eq!(messages(&rt), vec!["Runtime started", "hello"]);

    // A second start is ignored
    rt.start().await;
    assert_eq!(messages(&rt).len(), 2);
}

#[tokio::test]
async fn test_legacy_type_ids_run() {
    let app = AppBuilder::new()
        .node("start", "onAppStart", json!({}))
        .node("set", "setVariable", json!({ "varName": "x" }))
        .node("n", "numberLiteral", json!({ "value": 7 }))
        .then("start", "set")
        .wire("n", "value", "set", "value")
        .build();
    let (rt, _) = runtime(&app);
    rt.start().await;
    assert_eq!(rt.variable("x"), Some(json!(7)));
}

#[tokio::test]
async fn test_fan_out_runs_in_connection_order() {
    let mut builder = AppBuilder::new().node("start", "app-start", json!({}));
    for id in ["first", "second", "third"] {
        builder = log_literal(builder, id, id).then("start", id);
    }
    let (rt, _) = runtime(&builder.build());
    rt.start().await;
    assert_eq!(messages(&rt)[1..], ["first", "second", "third"]);
}

#[tokio::test]
async fn test_for_loop_runs_body_then_done() {
    let app = log_literal(
        AppBuilder::new()
            .node("start", "app-start", json!({}))
            .node("loop", "for-loop", json!({}))
            .node("from", "number-literal", json!({ "value": 0 }))
            .node("to", "number-literal", json!({ "value": 3 }))
            .node("body", "log", json!({}))
            .then("start", "loop")
            .wire("from", "value", "loop", "start")
            .wire("to", "value", "loop", "end")
            .wire("loop", "loop", "body", "exec")
            .wire("loop", "index", "body", "message"),
        "done",
        "done",
    )
    .wire("loop", "done", "done", "exec")
    .build();
    let (rt, _) = runtime(&app);
    rt.start().await;
    assert_eq!(messages(&rt)[1..], ["0", "1", "2", "done"]);
}

#[tokio::test]
async fn test_while_loop_stops_at_cap() {
    let app = log_literal(
        log_literal(
            AppBuilder::new()
                .node("start", "app-start", json!({}))
                .node("while", "while-loop", json!({ "maxIterations": 5 }))
                .node("always", "number-literal", json!({ "value": 1 }))
                .then("start", "while")
                .wire("always", "value", "while", "condition"),
            "body",
            "tick",
        )
        .wire("while", "loop", "body", "exec"),
        "done",
        "done",
    )
    .wire("while", "done", "done", "exec")
    .build();
    let (rt, _) = runtime(&app);
    rt.start().await;

    let logs = messages(&rt);
    assert_eq!(logs.iter().filter(|m| *m == "tick").count(), 5);
    let warnings: Vec<_> = logs.iter().filter(|m| m.contains("max iterations")).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(logs.last().map(String::as_str), Some("done"));
}

#[tokio::test]
async fn test_if_condition_takes_one_branch() {
    for (cond, expected) in [(json!(true), "yes"), (json!(false), "no")] {
        let app = log_literal(
            log_literal(
                AppBuilder::new()
                    .node("start", "app-start", json!({}))
                    .node("if", "if-condition", json!({}))
                    .node("c", "string-literal", json!({ "value": cond }))
                    .then("start", "if")
                    .wire("c", "value", "if", "condition"),
                "yes",
                "yes",
            )
            .wire("if", "true", "yes", "exec"),
            "no",
            "no",
        )
        .wire("if", "false", "no", "exec")
        .build();
        let (rt, _) = runtime(&app);
        rt.start().await;
        assert_eq!(messages(&rt)[1..], [expected]);
    }
}

fn math_app(op: &str, a: Value, b: Value) -> MiniApp {
    AppBuilder::new()
        .node("start", "app-start", json!({}))
        .node("set", "set-variable", json!({ "varName": "out" }))
        .node("math", "math-op", json!({ "operator": op }))
        .node("a", "number-literal", json!({ "value": a }))
        .node("b", "number-literal", json!({ "value": b }))
        .then("start", "set")
        .wire("math", "value", "set", "value")
        .wire("a", "value", "math", "a")
        .wire("b", "value", "math", "b")
        .build()
}

#[tokio::test]
async fn test_math_op() {
    let cases = [
        ("+", json!(2), json!(3), json!(5)),
        ("-", json!(2), json!(3), json!(-1)),
        ("*", json!(2.5), json!(2), json!(5)),
        ("/", json!(1), json!(4), json!(0.25)),
        ("/", json!(7), json!(0), json!(0)),
        ("^", json!(7), json!(2), json!(0)),
    ];
    for (op, a, b, expected) in cases {
        let (rt, _) = runtime(&math_app(op, a, b));
        rt.start().await;
        assert_eq!(rt.variable("out"), Some(expected), "operator {}", op);
    }
}

#[tokio::test]
async fn test_concat_and_compare() {
    let app = AppBuilder::new()
        .node("start", "app-start", json!({}))
        .node("set", "set-variable", json!({ "varName": "greeting" }))
        .node("set2", "set-variable", json!({ "varName": "same" }))
        .node("cat", "concat", json!({}))
        .node("a", "string-literal", json!({ "value": "Hi " }))
        .node("b", "string-literal", json!({ "value": "there" }))
        .node("cmp", "compare", json!({ "operator": "==" }))
        .node("three", "string-literal", json!({ "value": "3" }))
        .node("num", "number-literal", json!({ "value": 3 }))
        .then("start", "set")
        .then("set", "set2")
        .wire("cat", "value", "set", "value")
        .wire("a", "value", "cat", "a")
        .wire("b", "value", "cat", "b")
        .wire("cmp", "result", "set2", "value")
        .wire("three", "value", "cmp", "a")
        .wire("num", "value", "cmp", "b")
        .build();
    let (rt, _) = runtime(&app);
    rt.start().await;
    assert_eq!(rt.variable("greeting"), Some(json!("Hi there")));
    assert_eq!(rt.variable("same"), Some(json!(true)));
}

#[tokio::test]
async fn test_data_pins_are_evaluated_per_consumer() {
    let app = AppBuilder::new()
        .node("start", "app-start", json!({}))
        .node("roll", "random-number", json!({ "min": 0, "max": 1e9 }))
        .node("first", "set-variable", json!({ "varName": "first" }))
        .node("second", "set-variable", json!({ "varName": "second" }))
        .then("start", "first")
        .then("first", "second")
        .wire("roll", "value", "first", "value")
        .wire("roll", "value", "second", "value")
        .build();
    let (rt, _) = runtime(&app);
    rt.start().await;

    let first = rt.variable("first").unwrap();
    let second = rt.variable("second").unwrap();
    assert!(first.is_number() && second.is_number());
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_lists() {
    let app = AppBuilder::new()
        .node("start", "app-start", json!({}))
        .node("empty", "create-list", json!({}))
        .node("add1", "list-add", json!({}))
        .node("add2", "list-add", json!({}))
        .node("rm", "list-remove", json!({}))
        .node("x", "string-literal", json!({ "value": "x" }))
        .node("y", "string-literal", json!({ "value": "y" }))
        .node("zero", "number-literal", json!({ "value": 0 }))
        .node("len", "list-length", json!({}))
        .node("get", "list-get", json!({}))
        .node("set_len", "set-variable", json!({ "varName": "len" }))
        .node("set_first", "set-variable", json!({ "varName": "first" }))
        .then("start", "add1")
        .then("add1", "add2")
        .then("add2", "rm")
        .then("rm", "set_len")
        .then("set_len", "set_first")
        .wire("empty", "value", "add1", "list")
        .wire("x", "value", "add1", "item")
        .wire("add1", "value", "add2", "list")
        .wire("y", "value", "add2", "item")
        .wire("add2", "value", "rm", "list")
        .wire("zero", "value", "rm", "index")
        .wire("add2", "value", "len", "list")
        .wire("len", "value", "set_len", "value")
        .wire("rm", "value", "get", "list")
        .wire("zero", "value", "get", "index")
        .wire("get", "value", "set_first", "value")
        .build();
    let (rt, _) = runtime(&app);
    rt.start().await;

    assert_eq!(rt.variable("len"), Some(json!(2)));
    assert_eq!(rt.variable("first"), Some(json!("y")));
    assert_eq!(
        rt.node_state("rm").and_then(|s| s.last_result),
        Some(json!(["y"]))
    );
}

fn call_app(max_depth_body: bool) -> MiniApp {
    let builder = AppBuilder::new()
        .node("start", "app-start", json!({}))
        .node("def", "function-define", json!({ "funcName": "double" }))
        .node("ret", "function-return", json!({}))
        .node("times", "math-op", json!({ "operator": "*" }))
        .node("two", "number-literal", json!({ "value": 2 }))
        .node("call", "function-call", json!({ "funcName": "double" }))
        .node("five", "number-literal", json!({ "value": 5 }))
        .node("set", "set-variable", json!({ "varName": "result" }))
        .then("start", "call")
        .then("call", "set")
        .wire("five", "value", "call", "param1")
        .wire("call", "result", "set", "value")
        .wire("def", "param1", "times", "a")
        .wire("two", "value", "times", "b")
        .wire("times", "value", "ret", "value");
    let builder = if max_depth_body {
        builder
            .node("again", "function-call", json!({ "funcName": "double" }))
            .then("def", "again")
    } else {
        builder.then("def", "ret")
    };
    builder.build()
}

#[tokio::test]
async fn test_function_call_returns_value() {
    let (rt, _) = runtime(&call_app(false));
    rt.start().await;
    assert_eq!(rt.variable("result"), Some(json!(10)));
    assert_eq!(rt.functions(), vec!["double".to_string()]);
    assert!(messages(&rt).contains(&"Function 'double' finished".to_string()));
}

#[tokio::test]
async fn test_nested_calls_keep_their_own_frames() {
    let app = AppBuilder::new()
        .node("start", "app-start", json!({}))
        // outer(p) = inner(p + 1) * 2
        .node("outer", "function-define", json!({ "funcName": "outer" }))
        .node("call_inner", "function-call", json!({ "funcName": "inner" }))
        .node("plus", "math-op", json!({ "operator": "+" }))
        .node("one", "number-literal", json!({ "value": 1 }))
        .node("times", "math-op", json!({ "operator": "*" }))
        .node("two", "number-literal", json!({ "value": 2 }))
        .node("outer_ret", "function-return", json!({}))
        .then("outer", "call_inner")
        .then("call_inner", "outer_ret")
        .wire("outer", "param1", "plus", "a")
        .wire("one", "value", "plus", "b")
        .wire("plus", "value", "call_inner", "param1")
        .wire("call_inner", "result", "times", "a")
        .wire("two", "value", "times", "b")
        .wire("times", "value", "outer_ret", "value")
        // inner(p) = p * 10
        .node("inner", "function-define", json!({ "funcName": "inner" }))
        .node("tenfold", "math-op", json!({ "operator": "*" }))
        .node("ten", "number-literal", json!({ "value": 10 }))
        .node("inner_ret", "function-return", json!({}))
        .then("inner", "inner_ret")
        .wire("inner", "param1", "tenfold", "a")
        .wire("ten", "value", "tenfold", "b")
        .wire("tenfold", "value", "inner_ret", "value")
        // result = outer(1)
        .node("call_outer", "function-call", json!({ "funcName": "outer" }))
        .node("p", "number-literal", json!({ "value": 1 }))
        .node("set", "set-variable", json!({ "varName": "result" }))
        .then("start", "call_outer")
        .then("call_outer", "set")
        .wire("p", "value", "call_outer", "param1")
        .wire("call_outer", "result", "set", "value")
        .build();
    let (rt, _) = runtime(&app);
    rt.start().await;
    assert_eq!(rt.variable("result"), Some(json!(40)));
}

#[tokio::test]
async fn test_concurrent_calls_to_one_function_keep_separate_frames() {
    let clipboard = Arc::new(GatedClipboard {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let host = HostServices::default().with_clipboard(clipboard.clone());
    // double(p) = p * 2, with a host call in the middle of the body
    let mut builder = AppBuilder::new()
        .node("def", "function-define", json!({ "funcName": "double" }))
        .node("wait", "get-clipboard", json!({}))
        .node("ret", "function-return", json!({}))
        .node("times", "math-op", json!({ "operator": "*" }))
        .node("two", "number-literal", json!({ "value": 2 }))
        .then("def", "wait")
        .then("wait", "ret")
        .wire("def", "param1", "times", "a")
        .wire("two", "value", "times", "b")
        .wire("times", "value", "ret", "value");
    for (target, param) in [("a", 3), ("b", 4)] {
        let click = format!("click_{}", target);
        let call = format!("call_{}", target);
        let arg = format!("arg_{}", target);
        let set = format!("set_{}", target);
        builder = builder
            .node(&click, "click", json!({ "targetId": target }))
            .node(&call, "function-call", json!({ "funcName": "double" }))
            .node(&arg, "number-literal", json!({ "value": param }))
            .node(&set, "set-variable", json!({ "varName": target }))
            .then(&click, &call)
            .then(&call, &set)
            .wire(&arg, "value", &call, "param1")
            .wire(&call, "result", &set, "value");
    }
    let (rt, _) = runtime_with(&builder.build(), host);
    rt.start().await;

    let first = rt.clone();
    let a = tokio::spawn(async move { first.handle_event("click", "a").await });
    clipboard.entered.notified().await;
    let second = rt.clone();
    let b = tokio::spawn(async move { second.handle_event("click", "b").await });
    clipboard.entered.notified().await;

    // Both calls are suspended inside the body
    clipboard.release.notify_waiters();
    a.await.unwrap();
    b.await.unwrap();

    assert_eq!(rt.variable("a"), Some(json!(6)));
    assert_eq!(rt.variable("b"), Some(json!(8)));
}

#[tokio::test]
async fn test_runaway_recursion_hits_depth_limit() {
    let app = call_app(true);
    let callbacks = UiStateCallbacks::new();
    let rt = Runtime::new(&app, Arc::new(callbacks), HostServices::default()).with_options(
        RuntimeOptions {
            max_call_depth: 3,
            ..RuntimeOptions::default()
        },
    );
    rt.start().await;

    let logs = messages(&rt);
    assert!(logs
        .iter()
        .any(|m| m.starts_with("Error in node function-call (again)")
            && m.ends_with("Call depth limit reached (3)")));
    assert_eq!(rt.variable("result"), Some(Value::Null));
}

#[tokio::test]
async fn test_missing_function_halts_chain() {
    let app = log_literal(
        AppBuilder::new()
            .node("start", "app-start", json!({}))
            .node("call", "function-call", json!({ "funcName": "nope" }))
            .then("start", "call"),
        "after",
        "after",
    )
    .then("call", "after")
    .build();
    let sink = Arc::new(VecEventSink::new());
    let (rt, _) = runtime(&app);
    let rt = rt.with_event_sink(sink.clone());
    rt.start().await;

    let logs = messages(&rt);
    assert!(logs.contains(&"Error in node function-call (call): Function 'nope' not found".to_string()));
    assert!(!logs.contains(&"after".to_string()));
    assert!(sink
        .events()
        .iter()
        .any(|e| matches!(e, RuntimeEvent::NodeFailed { node_id, .. } if node_id == "call")));
}

#[tokio::test]
async fn test_dangling_and_unknown_nodes_are_ignored() {
    let app = log_literal(
        AppBuilder::new()
            .node("start", "app-start", json!({}))
            .node("weird", "teleport", json!({}))
            .then("start", "ghost")
            .then("start", "weird")
            .then("weird", "never"),
        "ok",
        "ok",
    )
    .then("start", "ok")
    .wire("ghost", "value", "ok", "message")
    .build();
    let (rt, _) = runtime(&app);
    rt.start().await;
    // First wire into `message` wins, so the literal is used
    assert_eq!(messages(&rt)[1..], ["ok"]);
}

#[tokio::test]
async fn test_unwired_input_is_null() {
    let app = AppBuilder::new()
        .node("start", "app-start", json!({}))
        .node("set", "set-variable", json!({}))
        .node("alert", "show-alert", json!({}))
        .then("start", "set")
        .then("set", "alert")
        .build();
    let (rt, ui) = runtime(&app);
    rt.start().await;
    assert_eq!(rt.variable("myVar"), Some(Value::Null));
    assert_eq!(ui.snapshot().alerts, vec!["Alert".to_string()]);
}

#[tokio::test]
async fn test_ui_intents_reach_callbacks() {
    let app = AppBuilder::new()
        .node("click", "click", json!({ "targetId": "btn" }))
        .node("text", "set-text", json!({ "targetId": "label" }))
        .node("style", "set-style", json!({ "targetId": "label", "property": "color" }))
        .node("nav", "navigate-page", json!({ "pageId": "page_1" }))
        .node("input", "get-input-value", json!({ "targetId": "name" }))
        .node("red", "string-literal", json!({ "value": "red" }))
        .then("click", "text")
        .then("text", "style")
        .then("style", "nav")
        .wire("input", "value", "text", "value")
        .wire("red", "value", "style", "value")
        .build();
    let (rt, ui) = runtime(&app);
    ui.state().lock().set_input_value("name", "Ada");
    rt.start().await;

    rt.handle_event("click", "other").await;
    assert!(ui.snapshot().overrides.get("label").is_none());

    rt.handle_event("onClick", "btn").await;
    let snap = ui.snapshot();
    assert_eq!(snap.overrides["label"].text.as_deref(), Some("Ada"));
    assert_eq!(snap.overrides["label"].style["color"], "red");
    assert_eq!(snap.current_page, "page_1");
}

#[tokio::test]
async fn test_key_press_filters_and_exposes_key() {
    let app = AppBuilder::new()
        .node("any", "key-press", json!({ "key": "" }))
        .node("enter", "key-press", json!({ "key": "Enter" }))
        .node("log_any", "log", json!({}))
        .node("log_enter", "log", json!({}))
        .node("enter_lit", "string-literal", json!({ "value": "enter!" }))
        .then("any", "log_any")
        .then("enter", "log_enter")
        .wire("any", "key", "log_any", "message")
        .wire("enter_lit", "value", "log_enter", "message")
        .build();
    let (rt, _) = runtime(&app);
    rt.start().await;

    rt.handle_key_press("a").await;
    rt.handle_key_press("Enter").await;
    assert_eq!(messages(&rt)[1..], ["a", "Enter", "enter!"]);
    assert_eq!(
        rt.node_state("enter").and_then(|s| s.last_key).as_deref(),
        Some("Enter")
    );
}

#[tokio::test]
async fn test_storage_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let host = HostServices::default().with_storage(store.clone());
    let app = AppBuilder::new()
        .node("start", "app-start", json!({}))
        .node("save", "save-data", json!({ "key": "k" }))
        .node("v", "number-literal", json!({ "value": 42 }))
        .node("load", "load-data", json!({ "key": "k" }))
        .node("set_loaded", "set-variable", json!({ "varName": "loaded" }))
        .node("del", "delete-data", json!({ "key": "k" }))
        .node("set_after", "set-variable", json!({ "varName": "after" }))
        .then("start", "save")
        .then("save", "set_loaded")
        .then("set_loaded", "del")
        .then("del", "set_after")
        .wire("v", "value", "save", "value")
        .wire("load", "value", "set_loaded", "value")
        .wire("load", "value", "set_after", "value")
        .build();
    let (rt, _) = runtime_with(&app, host);
    rt.start().await;

    assert_eq!(rt.variable("loaded"), Some(json!(42)));
    assert_eq!(rt.variable("after"), Some(Value::Null));
    assert!(store.is_empty());
    assert!(messages(&rt).contains(&"Saved: miniboard-app-k".to_string()));
}

#[tokio::test]
async fn test_http_failure_takes_error_branch() {
    let app = log_literal(
        log_literal(
            AppBuilder::new()
                .node("start", "app-start", json!({}))
                .node("http", "http-request", json!({ "url": "https://example.com" }))
                .node("set_data", "set-variable", json!({ "varName": "data" }))
                .node("set_status", "set-variable", json!({ "varName": "status" }))
                .then("start", "http")
                .wire("http", "execError", "set_data", "exec")
                .then("set_data", "set_status")
                .wire("http", "data", "set_data", "value")
                .wire("http", "status", "set_status", "value"),
            "ok",
            "ok",
        )
        .then("http", "ok"),
        "failed",
        "failed",
    )
    .then("set_status", "failed")
    .build();
    let (rt, _) = runtime(&app);
    rt.start().await;

    let logs = messages(&rt);
    assert!(logs.contains(&"failed".to_string()));
    assert!(!logs.contains(&"ok".to_string()));
    assert!(logs.iter().any(|m| m.starts_with("HTTP Error:")));
    assert_eq!(rt.variable("data"), Some(Value::Null));
    assert_eq!(rt.variable("status"), Some(json!(0)));
}

#[derive(Default)]
struct FakeProxy {
    seen: Mutex<Vec<ProxyRequest>>,
}

#[async_trait]
impl HttpProxy for FakeProxy {
    async fn send(&self, request: ProxyRequest) -> HostResult<ProxyResponse> {
        self.seen.lock().push(request);
        Ok(ProxyResponse {
            status: 200,
            status_text: "OK".to_string(),
            data: json!({ "temp": 21 }),
            is_json: true,
        })
    }
}

#[tokio::test]
async fn test_http_success_stores_result() {
    let proxy = Arc::new(FakeProxy::default());
    let host = HostServices::default().with_http(proxy.clone());
    let app = AppBuilder::new()
        .node("start", "app-start", json!({}))
        .node(
            "http",
            "http-request",
            json!({
                "method": "POST",
                "url": "https://api.test/x",
                "headers": "{\"X-Key\":\"1\"}",
                "jsonPath": "",
            }),
        )
        .node("body", "string-literal", json!({ "value": "{\"a\":1}" }))
        .node("set_data", "set-variable", json!({ "varName": "data" }))
        .node("set_status", "set-variable", json!({ "varName": "status" }))
        .then("start", "http")
        .then("http", "set_data")
        .then("set_data", "set_status")
        .wire("body", "value", "http", "body")
        .wire("http", "data", "set_data", "value")
        .wire("http", "status", "set_status", "value")
        .build();
    let (rt, _) = runtime_with(&app, host);
    rt.start().await;

    assert_eq!(rt.variable("data"), Some(json!({ "temp": 21 })));
    assert_eq!(rt.variable("status"), Some(json!(200)));
    let seen = proxy.seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].url, "https://api.test/x");
    assert_eq!(seen[0].body, Some(json!({ "a": 1 })));
    assert_eq!(seen[0].headers["X-Key"], "1");
}

struct FixedDevice;

#[async_trait]
impl Geolocation for FixedDevice {
    async fn current_position(&self, _timeout: Duration) -> HostResult<GeoPosition> {
        Ok(GeoPosition {
            lat: 37.5665,
            lon: 126.978,
        })
    }
}

#[async_trait]
impl Battery for FixedDevice {
    async fn status(&self) -> HostResult<BatteryStatus> {
        Ok(BatteryStatus {
            level: 80,
            charging: true,
        })
    }
}

fn hardware_app() -> MiniApp {
    AppBuilder::new()
        .node("start", "app-start", json!({}))
        .node("gps", "get-location", json!({}))
        .node("bat", "get-battery", json!({}))
        .node("set_lon", "set-variable", json!({ "varName": "lon" }))
        .node("set_level", "set-variable", json!({ "varName": "level" }))
        .node("set_charging", "set-variable", json!({ "varName": "charging" }))
        .then("start", "gps")
        .then("gps", "bat")
        .then("bat", "set_lon")
        .then("set_lon", "set_level")
        .then("set_level", "set_charging")
        .wire("gps", "lon", "set_lon", "value")
        .wire("bat", "level", "set_level", "value")
        .wire("bat", "charging", "set_charging", "value")
        .build()
}

#[tokio::test]
async fn test_hardware_nodes_store_readings() {
    let device = Arc::new(FixedDevice);
    let host = HostServices::default()
        .with_geolocation(device.clone())
        .with_battery(device);
    let (rt, _) = runtime_with(&hardware_app(), host);
    rt.start().await;

    assert_eq!(rt.variable("lon"), Some(json!(126.978)));
    assert_eq!(rt.variable("level"), Some(json!(80)));
    assert_eq!(rt.variable("charging"), Some(json!(true)));
    assert!(messages(&rt).contains(&"Battery: 80% (charging)".to_string()));
}

#[tokio::test]
async fn test_hardware_failures_are_soft() {
    let (rt, _) = runtime(&hardware_app());
    rt.start().await;

    assert_eq!(rt.variable("lon"), Some(json!(0)));
    assert_eq!(rt.variable("level"), Some(json!(0)));
    assert_eq!(rt.variable("charging"), Some(json!(false)));
    let logs = messages(&rt);
    assert!(logs.contains(&"GPS access failed".to_string()));
    assert!(logs.contains(&"Battery info unavailable".to_string()));
}

struct AskingNotifier {
    answer: NotificationPermission,
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Notifier for AskingNotifier {
    async fn permission(&self) -> HostResult<NotificationPermission> {
        Ok(NotificationPermission::Default)
    }

    async fn request_permission(&self) -> HostResult<NotificationPermission> {
        Ok(self.answer)
    }

    async fn notify(&self, title: &str, body: &str) -> HostResult<()> {
        self.sent.lock().push((title.to_string(), body.to_string()));
        Ok(())
    }
}

#[tokio::test]
async fn test_notification_asks_for_permission() {
    for (answer, delivered) in [
        (NotificationPermission::Granted, 1),
        (NotificationPermission::Denied, 0),
    ] {
        let notifier = Arc::new(AskingNotifier {
            answer,
            sent: Mutex::new(Vec::new()),
        });
        let host = HostServices::default().with_notifier(notifier.clone());
        let app = AppBuilder::new()
            .node("start", "app-start", json!({}))
            .node("notify", "send-notification", json!({ "title": "Hey" }))
            .node("body", "string-literal", json!({ "value": "there" }))
            .then("start", "notify")
            .wire("body", "value", "notify", "body")
            .build();
        let (rt, _) = runtime_with(&app, host);
        rt.start().await;

        let sent = notifier.sent.lock();
        assert_eq!(sent.len(), delivered);
        if delivered == 1 {
            assert_eq!(sent[0], ("Hey".to_string(), "there".to_string()));
        }
        assert!(messages(&rt).contains(&"Notification sent: Hey".to_string()));
    }
}

struct EchoChat;

#[async_trait]
impl ChatService for EchoChat {
    async fn chat(&self, prompt: &str) -> HostResult<String> {
        if prompt.ends_with("silence") {
            Ok(String::new())
        } else {
            Ok(format!("echo: {}", prompt))
        }
    }
}

fn chat_app(prompt: &str) -> MiniApp {
    AppBuilder::new()
        .node("start", "app-start", json!({}))
        .node("chat", "gemini-chat", json!({ "template": "Be brief." }))
        .node("prompt", "string-literal", json!({ "value": prompt }))
        .node("set", "set-variable", json!({ "varName": "reply" }))
        .then("start", "chat")
        .then("chat", "set")
        .wire("prompt", "value", "chat", "prompt")
        .wire("chat", "response", "set", "value")
        .build()
}

#[tokio::test]
async fn test_gemini_chat_response_pin() {
    let host = HostServices::default().with_chat(Arc::new(EchoChat));
    let (rt, _) = runtime_with(&chat_app("hello"), host.clone());
    rt.start().await;
    assert_eq!(rt.variable("reply"), Some(json!("echo: Be brief.\n\nhello")));

    let (rt, _) = runtime_with(&chat_app("silence"), host);
    rt.start().await;
    assert_eq!(rt.variable("reply"), Some(json!("[No response]")));

    let (rt, _) = runtime(&chat_app("hello"));
    rt.start().await;
    assert_eq!(rt.variable("reply"), Some(json!("[Chat service unavailable]")));
}

struct GatedClipboard {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl Clipboard for GatedClipboard {
    async fn read_text(&self) -> HostResult<String> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("late".to_string())
    }

    async fn write_text(&self, _text: &str) -> HostResult<()> {
        Err(HostError::failed("read-only"))
    }
}

#[tokio::test]
async fn test_stop_discards_in_flight_chain() {
    let clipboard = Arc::new(GatedClipboard {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let host = HostServices::default().with_clipboard(clipboard.clone());
    let app = AppBuilder::new()
        .node("start", "app-start", json!({}))
        .node("clip", "get-clipboard", json!({}))
        .node("text", "set-text", json!({ "targetId": "label" }))
        .then("start", "clip")
        .then("clip", "text")
        .wire("clip", "value", "text", "value")
        .build();
    let (rt, ui) = runtime_with(&app, host);

    let running = rt.clone();
    let task = tokio::spawn(async move { running.start().await });
    clipboard.entered.notified().await;

    rt.stop();
    clipboard.release.notify_one();
    task.await.unwrap();

    assert_eq!(rt.state(), RunState::Stopped);
    assert_eq!(rt.epoch(), 1);
    assert!(ui.snapshot().overrides.is_empty());
    assert!(rt.node_state("clip").is_none());
}

/// Storage whose reads block until released
struct GatedStore {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl KeyValueStore for GatedStore {
    async fn get(&self, _key: &str) -> HostResult<Option<Value>> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(Some(json!("late")))
    }

    async fn set(&self, _key: &str, _value: Value) -> HostResult<()> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> HostResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_stale_chain_writes_no_state() {
    let store = Arc::new(GatedStore {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let host = HostServices::default().with_storage(store.clone());
    let app = log_literal(
        AppBuilder::new()
            .node("start", "app-start", json!({}))
            .node("init", "set-variable", json!({ "varName": "x" }))
            .node("kept", "string-literal", json!({ "value": "kept" }))
            .then("start", "init")
            .wire("kept", "value", "init", "value")
            // click "save": x = load-data
            .node("save", "click", json!({ "targetId": "save" }))
            .node("overwrite", "set-variable", json!({ "varName": "x" }))
            .node("load", "load-data", json!({ "key": "k" }))
            .then("save", "overwrite")
            .wire("load", "value", "overwrite", "value")
            // click "push": list-add with a loaded item
            .node("push", "click", json!({ "targetId": "push" }))
            .node("add", "list-add", json!({}))
            .node("load2", "load-data", json!({ "key": "k" }))
            .then("push", "add")
            .wire("load2", "value", "add", "item"),
        "after",
        "after",
    )
    .then("overwrite", "after")
    .build();
    let (rt, _) = runtime_with(&app, host);
    rt.start().await;
    assert_eq!(rt.variable("x"), Some(json!("kept")));

    let saving = rt.clone();
    let save_task = tokio::spawn(async move { saving.handle_event("click", "save").await });
    store.entered.notified().await;
    let pushing = rt.clone();
    let push_task = tokio::spawn(async move { pushing.handle_event("click", "push").await });
    store.entered.notified().await;

    rt.stop();
    store.release.notify_waiters();
    save_task.await.unwrap();
    push_task.await.unwrap();

    assert_eq!(rt.variable("x"), Some(json!("kept")));
    assert!(rt.node_state("add").is_none());
    assert!(!messages(&rt).contains(&"after".to_string()));
}

#[tokio::test]
async fn test_events_ignored_after_stop() {
    let app = log_literal(
        AppBuilder::new().node("click", "click", json!({ "targetId": "btn" })),
        "clicked",
        "clicked",
    )
    .then("click", "clicked")
    .build();
    let (rt, _) = runtime(&app);
    rt.start().await;
    rt.handle_event("click", "btn").await;
    rt.stop();
    rt.handle_event("click", "btn").await;

    let logs = messages(&rt);
    assert_eq!(logs.iter().filter(|m| *m == "clicked").count(), 1);
    assert_eq!(logs.last().map(String::as_str), Some("Runtime stopped"));
}

fn timer_app(props: Value) -> MiniApp {
    log_literal(
        log_literal(
            AppBuilder::new()
                .node("start", "app-start", json!({}))
                .node("timer", "timer", props),
            "started",
            "started",
        )
        .then("start", "started"),
        "tick",
        "tick",
    )
    .then("timer", "tick")
    .build()
}

fn ticks(rt: &Runtime) -> usize {
    messages(rt).iter().filter(|m| *m == "tick").count()
}

#[tokio::test(start_paused = true)]
async fn test_repeating_timer_ticks_until_stop() {
    let (rt, _) = runtime(&timer_app(json!({ "interval": 1000 })));
    rt.start().await;
    assert_eq!(ticks(&rt), 0);

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(ticks(&rt), 3);
    assert_eq!(messages(&rt)[1], "started");

    rt.stop();
    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(ticks(&rt), 3);
}

#[tokio::test(start_paused = true)]
async fn test_one_shot_timer_and_default_interval() {
    let (rt, _) = runtime(&timer_app(json!({ "repeat": false })));
    rt.start().await;

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert_eq!(ticks(&rt), 0);
    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(ticks(&rt), 1);
}

#[tokio::test(start_paused = true)]
async fn test_oversized_timer_interval_uses_default() {
    let (rt, _) = runtime(&timer_app(json!({ "interval": 1e300 })));
    rt.start().await;

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(ticks(&rt), 2);
}

#[test]
fn test_timer_interval_bounds() {
    let timer =
        |interval: Value| NodeInstance::new("t", "timer").with_property("interval", interval);
    assert_eq!(timer_interval_ms(&timer(json!(250)), 1000), 250);
    assert_eq!(timer_interval_ms(&timer(json!("500")), 1000), 500);
    assert_eq!(timer_interval_ms(&timer(json!(0)), 1000), 1000);
    assert_eq!(timer_interval_ms(&timer(json!(-5)), 1000), 1000);
    assert_eq!(timer_interval_ms(&timer(json!("soon")), 1000), 1000);
    assert_eq!(timer_interval_ms(&timer(json!(1e300)), 1000), 1000);
    assert_eq!(timer_interval_ms(&NodeInstance::new("t", "timer"), 750), 750);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_runtime_cancels_timers() {
    let (rt, _) = runtime(&timer_app(json!({ "interval": 100 })));
    rt.start().await;
    let weak = Arc::downgrade(&rt.inner);
    drop(rt);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(weak.upgrade().is_none());
}

#[tokio::test]
async fn test_events_are_reported() {
    let app = log_literal(
        AppBuilder::new().node("start", "app-start", json!({})),
        "hi",
        "hi",
    )
    .then("start", "hi")
    .build();
    let sink = Arc::new(VecEventSink::new());
    let (rt, _) = runtime(&app);
    let rt = rt.with_event_sink(sink.clone());
    rt.start().await;
    rt.stop();

    let events = sink.events();
    assert!(matches!(events.first(), Some(RuntimeEvent::Started { epoch: 0, .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, RuntimeEvent::NodeStarted { node_id, .. } if node_id == "hi")));
    assert!(matches!(events.last(), Some(RuntimeEvent::Stopped { epoch: 1, .. })));
}
