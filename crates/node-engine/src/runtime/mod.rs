//! Mini-app execution runtime
//!
//! The runtime owns a private working copy of a document's nodes and
//! connections and interprets them:
//!
//! - **Exec pins** are pushed: a trigger walks the wires leaving its exec
//!   output, running each target node in connection order and awaiting it
//!   fully before the next.
//! - **Data pins** are pulled: when a node needs an input it evaluates the
//!   source node on demand, recursively. Nothing is cached.
//!
//! Every chain carries an [`ExecContext`] holding the run epoch and its own
//! call stack. `stop()` advances the epoch, so chains still in flight from
//! the previous run discard their results at the next check. Variable and
//! scratch-state writes are refused for a stale context.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use node_engine::{HostServices, Runtime, UiStateCallbacks};
//!
//! let callbacks = UiStateCallbacks::new();
//! let runtime = Runtime::new(&app, Arc::new(callbacks.clone()), HostServices::default());
//! runtime.start().await;
//! runtime.handle_event("click", "ui_button_1").await;
//! runtime.stop();
//! ```

mod evaluate;
mod execute;
mod nodes;
pub mod state;
pub mod value;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::descriptor::pins;
use crate::events::{EventSink, NullEventSink, RuntimeEvent};
use crate::host::{HostServices, UiCallbacks};
use crate::kind::NodeKind;
use crate::registry::NodeRegistry;
use crate::types::{Connection, MiniApp, NodeInstance};

pub use state::{CallFrame, ExecContext, NodeRuntimeState};

/// Tunables for a runtime instance
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeOptions {
    /// Deepest allowed nesting of function calls on one chain
    pub max_call_depth: usize,
    /// Interval used by timer nodes with a missing or zero `interval`
    pub default_timer_interval_ms: u64,
    pub geolocation_timeout_ms: u64,
    /// Prefix applied to storage node keys
    pub storage_namespace: String,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            max_call_depth: 64,
            default_timer_interval_ms: 1000,
            geolocation_timeout_ms: 10_000,
            storage_namespace: "miniboard-app-".to_string(),
        }
    }
}

/// Lifecycle of a runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Constructed,
    Started,
    Stopped,
}

/// One line of the runtime log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub time: DateTime<Utc>,
    pub message: String,
}

/// Handle to a running mini-app
///
/// Cheap to clone; all clones drive the same runtime.
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

pub(crate) struct RuntimeInner {
    app_id: String,
    /// Node ids in document order
    order: Vec<String>,
    nodes: HashMap<String, NodeInstance>,
    /// Parsed once; unknown types are absent
    kinds: HashMap<String, NodeKind>,
    connections: Vec<Connection>,
    /// Function name to define-node id
    functions: HashMap<String, String>,

    variables: Mutex<HashMap<String, Value>>,
    states: Mutex<HashMap<String, NodeRuntimeState>>,
    logs: Mutex<Vec<LogEntry>>,
    timers: Mutex<Vec<JoinHandle<()>>>,
    epoch: AtomicU64,
    run_state: Mutex<RunState>,

    callbacks: Arc<dyn UiCallbacks>,
    host: HostServices,
    events: Arc<dyn EventSink>,
    registry: Option<Arc<NodeRegistry>>,
    options: RuntimeOptions,
}

impl Runtime {
    /// Build a runtime over a private copy of `app`'s nodes and connections
    pub fn new(app: &MiniApp, callbacks: Arc<dyn UiCallbacks>, host: HostServices) -> Self {
        let mut order = Vec::with_capacity(app.nodes.len());
        let mut nodes = HashMap::with_capacity(app.nodes.len());
        let mut kinds = HashMap::new();
        let mut functions = HashMap::new();

        for node in &app.nodes {
            match NodeKind::from_type_name(&node.node_type) {
                Some(kind) => {
                    kinds.insert(node.id.clone(), kind);
                    if kind == NodeKind::FunctionDefine {
                        let name = node.str_property_or("funcName", "myFunction").to_string();
                        if let Some(previous) = functions.insert(name.clone(), node.id.clone()) {
                            log::warn!(
                                "Function '{}' is defined more than once; '{}' replaces '{}'",
                                name,
                                node.id,
                                previous
                            );
                        }
                    }
                }
                None => log::debug!("Node '{}' has unknown type '{}'", node.id, node.node_type),
            }
            order.push(node.id.clone());
            nodes.insert(node.id.clone(), node.clone());
        }

        Self {
            inner: Arc::new(RuntimeInner {
                app_id: app.id.clone(),
                order,
                nodes,
                kinds,
                connections: app.connections.clone(),
                functions,
                variables: Mutex::new(HashMap::new()),
                states: Mutex::new(HashMap::new()),
                logs: Mutex::new(Vec::new()),
                timers: Mutex::new(Vec::new()),
                epoch: AtomicU64::new(0),
                run_state: Mutex::new(RunState::Constructed),
                callbacks,
                host,
                events: Arc::new(NullEventSink),
                registry: None,
                options: RuntimeOptions::default(),
            }),
        }
    }

    fn configure(mut self, what: &str, apply: impl FnOnce(&mut RuntimeInner)) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => apply(inner),
            None => log::warn!("Ignoring {} for a runtime that is already shared", what),
        }
        self
    }

    pub fn with_options(self, options: RuntimeOptions) -> Self {
        self.configure("options", |inner| inner.options = options)
    }

    pub fn with_event_sink(self, events: Arc<dyn EventSink>) -> Self {
        self.configure("event sink", |inner| inner.events = events)
    }

    /// Attach a registry; used for node labels in diagnostics
    pub fn with_registry(self, registry: Arc<NodeRegistry>) -> Self {
        self.configure("registry", |inner| inner.registry = Some(registry))
    }

    /// Run every app-start chain to completion, then arm the timers
    pub async fn start(&self) {
        let epoch = {
            let mut state = self.inner.run_state.lock();
            if *state == RunState::Started {
                log::warn!("Runtime for app '{}' is already started", self.inner.app_id);
                return;
            }
            *state = RunState::Started;
            self.inner.epoch.load(Ordering::SeqCst)
        };

        self.inner.logs.lock().clear();
        self.inner.emit(RuntimeEvent::Started {
            app_id: self.inner.app_id.clone(),
            epoch,
        });
        self.inner.log("Runtime started");

        let ctx = ExecContext::new(epoch);
        for id in self.inner.nodes_of_kind(NodeKind::AppStart) {
            self.inner.execute_from_pin(&id, pins::EXEC, &ctx).await;
        }

        if !self.inner.is_current(&ctx) {
            return;
        }
        for id in self.inner.nodes_of_kind(NodeKind::Timer) {
            self.arm_timer(id, epoch);
        }
    }

    fn arm_timer(&self, node_id: String, epoch: u64) {
        let Some(node) = self.inner.nodes.get(&node_id) else {
            return;
        };
        let interval_ms = timer_interval_ms(node, self.inner.options.default_timer_interval_ms);
        let repeat = node.property("repeat") != Some(&Value::Bool(false));
        let period = Duration::from_millis(interval_ms);
        log::debug!(
            "Arming timer '{}' every {} ms (repeat: {})",
            node_id,
            interval_ms,
            repeat
        );

        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            if repeat {
                let mut ticker =
                    tokio::time::interval_at(tokio::time::Instant::now() + period, period);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    if !fire_timer(&weak, &node_id, epoch) {
                        break;
                    }
                }
            } else {
                tokio::time::sleep(period).await;
                fire_timer(&weak, &node_id, epoch);
            }
        });
        self.inner.timers.lock().push(handle);
    }

    /// Cancel timers and invalidate every in-flight chain
    pub fn stop(&self) {
        for handle in self.inner.timers.lock().drain(..) {
            handle.abort();
        }
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        *self.inner.run_state.lock() = RunState::Stopped;
        self.inner.log("Runtime stopped");
        self.inner.emit(RuntimeEvent::Stopped {
            app_id: self.inner.app_id.clone(),
            epoch,
        });
    }

    /// Fire every node of `event_type` whose `targetId` equals `target_id`
    ///
    /// `event_type` may be a canonical or legacy id (`click` / `onClick`).
    /// Ignored once the runtime is stopped.
    pub async fn handle_event(&self, event_type: &str, target_id: &str) {
        let Some(kind) = NodeKind::from_type_name(event_type) else {
            log::debug!("Ignoring unknown event type '{}'", event_type);
            return;
        };
        let Some(ctx) = self.inner.live_context() else {
            log::debug!("Ignoring '{}' event on stopped runtime", event_type);
            return;
        };

        let targets: Vec<String> = self
            .inner
            .nodes_of_kind(kind)
            .into_iter()
            .filter(|id| {
                self.inner
                    .nodes
                    .get(id)
                    .and_then(|n| n.property("targetId"))
                    .and_then(Value::as_str)
                    == Some(target_id)
            })
            .collect();

        for id in targets {
            self.inner.execute_from_pin(&id, pins::EXEC, &ctx).await;
        }
    }

    /// Fire key-press nodes whose `key` is empty or equal to `key`
    pub async fn handle_key_press(&self, key: &str) {
        let Some(ctx) = self.inner.live_context() else {
            return;
        };

        let targets: Vec<String> = self
            .inner
            .nodes_of_kind(NodeKind::KeyPress)
            .into_iter()
            .filter(|id| {
                self.inner
                    .nodes
                    .get(id)
                    .map(|n| n.str_property("key").is_none_or(|k| k == key))
                    .unwrap_or(false)
            })
            .collect();

        for id in targets {
            self.inner
                .update_state(&ctx, &id, |s| s.last_key = Some(key.to_string()));
            self.inner.execute_from_pin(&id, pins::EXEC, &ctx).await;
        }
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.inner.logs.lock().clone()
    }

    pub fn variable(&self, name: &str) -> Option<Value> {
        self.inner.variables.lock().get(name).cloned()
    }

    pub fn variables(&self) -> HashMap<String, Value> {
        self.inner.variables.lock().clone()
    }

    pub fn node_state(&self, node_id: &str) -> Option<NodeRuntimeState> {
        self.inner.states.lock().get(node_id).cloned()
    }

    pub fn state(&self) -> RunState {
        *self.inner.run_state.lock()
    }

    pub fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::SeqCst)
    }

    /// Names of the user-defined functions in the document
    pub fn functions(&self) -> Vec<String> {
        let mut names: Vec<_> = self.inner.functions.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Longest delay a timer node may ask for (the largest delay a browser timer honors)
const MAX_TIMER_INTERVAL_MS: u64 = i32::MAX as u64;

/// Interval of a timer node in milliseconds
///
/// Missing, zero or negative intervals use `default_ms`; so do intervals past
/// [`MAX_TIMER_INTERVAL_MS`], which would overflow the clock.
fn timer_interval_ms(node: &NodeInstance, default_ms: u64) -> u64 {
    let Some(requested) = node.property("interval").map(value::to_number) else {
        return default_ms;
    };
    if requested.is_nan() || requested < 1.0 {
        return default_ms;
    }
    if requested > MAX_TIMER_INTERVAL_MS as f64 {
        log::warn!(
            "Timer '{}' interval {} ms is too large; using {} ms",
            node.id,
            requested,
            default_ms
        );
        return default_ms;
    }
    requested as u64
}

/// Run one timer tick on its own task; false once the runtime is gone or restarted
fn fire_timer(weak: &Weak<RuntimeInner>, node_id: &str, epoch: u64) -> bool {
    let Some(inner) = weak.upgrade() else {
        return false;
    };
    if inner.epoch.load(Ordering::SeqCst) != epoch {
        return false;
    }
    let node_id = node_id.to_string();
    tokio::spawn(async move {
        let ctx = ExecContext::new(epoch);
        inner.execute_from_pin(&node_id, pins::EXEC, &ctx).await;
    });
    true
}

impl RuntimeInner {
    pub(crate) fn log(&self, message: impl Into<String>) {
        let message = message.into();
        self.logs.lock().push(LogEntry {
            time: Utc::now(),
            message: message.clone(),
        });
        self.callbacks.log(&message);
        self.emit(RuntimeEvent::log(message));
    }

    pub(crate) fn emit(&self, event: RuntimeEvent) {
        if let Err(e) = self.events.send(event) {
            log::debug!("Dropped runtime event: {}", e);
        }
    }

    pub(crate) fn is_current(&self, ctx: &ExecContext) -> bool {
        self.epoch.load(Ordering::SeqCst) == ctx.epoch
    }

    /// UI callbacks, or `None` when the chain belongs to an older run
    pub(crate) fn ui(&self, ctx: &ExecContext) -> Option<&dyn UiCallbacks> {
        if self.is_current(ctx) {
            Some(self.callbacks.as_ref())
        } else {
            None
        }
    }

    /// Context for a new chain, unless the runtime is stopped
    fn live_context(&self) -> Option<ExecContext> {
        if *self.run_state.lock() == RunState::Stopped {
            return None;
        }
        Some(ExecContext::new(self.epoch.load(Ordering::SeqCst)))
    }

    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| self.kinds.get(*id) == Some(&kind))
            .cloned()
            .collect()
    }

    /// Write a node's scratch state; dropped when `ctx` belongs to an older run
    pub(crate) fn update_state(
        &self,
        ctx: &ExecContext,
        node_id: &str,
        f: impl FnOnce(&mut NodeRuntimeState),
    ) -> bool {
        let mut states = self.states.lock();
        if !self.is_current(ctx) {
            log::debug!("Discarding stale state write for node '{}'", node_id);
            return false;
        }
        f(states.entry(node_id.to_string()).or_default());
        true
    }

    /// Store a variable; dropped when `ctx` belongs to an older run
    pub(crate) fn set_variable(&self, ctx: &ExecContext, name: &str, value: Value) -> bool {
        let mut variables = self.variables.lock();
        if !self.is_current(ctx) {
            log::debug!("Discarding stale write to variable '{}'", name);
            return false;
        }
        variables.insert(name.to_string(), value);
        true
    }

    pub(crate) fn read_state<T>(&self, node_id: &str, f: impl FnOnce(&NodeRuntimeState) -> T) -> T {
        let states = self.states.lock();
        match states.get(node_id) {
            Some(state) => f(state),
            None => f(&NodeRuntimeState::default()),
        }
    }

    pub(crate) fn storage_key(&self, node: &NodeInstance) -> String {
        format!(
            "{}{}",
            self.options.storage_namespace,
            node.str_property_or("key", "myKey")
        )
    }

    pub(crate) fn node_label<'a>(&'a self, node: &'a NodeInstance) -> &'a str {
        self.registry
            .as_ref()
            .and_then(|r| r.lookup(&node.node_type))
            .map(|def| def.label.as_str())
            .unwrap_or(node.node_type.as_str())
    }
}

impl Drop for RuntimeInner {
    fn drop(&mut self) {
        for handle in self.timers.get_mut().drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests;
