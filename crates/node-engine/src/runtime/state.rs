//! Per-node scratch state and per-chain execution context

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use crate::host::{BatteryStatus, GeoPosition};

/// Transient state an action writes and its own data pins read back
///
/// Lives in the runtime's arena keyed by node id, never in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRuntimeState {
    /// list-add / list-remove / get-clipboard / http-request / function-call
    pub last_result: Option<Value>,
    /// HTTP status of the last request, 0 after a failure
    pub last_status: Option<u16>,
    pub location: Option<GeoPosition>,
    pub battery: Option<BatteryStatus>,
    /// Current for-loop index
    pub loop_index: Option<f64>,
    /// Key that last fired a key-press node
    pub last_key: Option<String>,
}

/// One active user-function call
#[derive(Debug)]
pub struct CallFrame {
    pub function: String,
    pub params: [Value; 2],
    return_value: Mutex<Option<Value>>,
}

impl CallFrame {
    pub fn new(function: impl Into<String>, params: [Value; 2]) -> Self {
        Self {
            function: function.into(),
            params,
            return_value: Mutex::new(None),
        }
    }

    pub fn set_return(&self, value: Value) {
        *self.return_value.lock() = Some(value);
    }

    pub fn take_return(&self) -> Option<Value> {
        self.return_value.lock().take()
    }

    /// Parameter by pin id (`param1` / `param2`)
    pub fn param(&self, pin_id: &str) -> Value {
        match pin_id {
            crate::descriptor::pins::PARAM1 => self.params[0].clone(),
            crate::descriptor::pins::PARAM2 => self.params[1].clone(),
            _ => Value::Null,
        }
    }
}

/// State carried along one exec chain
///
/// Cloned when a chain enters a function so each chain owns its call stack.
#[derive(Debug, Clone)]
pub struct ExecContext {
    /// Run epoch the chain was started in
    pub epoch: u64,
    pub frames: Vec<Arc<CallFrame>>,
}

impl ExecContext {
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            frames: Vec::new(),
        }
    }

    /// Context for running a function body with `frame` on top
    pub fn with_frame(&self, frame: Arc<CallFrame>) -> Self {
        let mut frames = self.frames.clone();
        frames.push(frame);
        Self {
            epoch: self.epoch,
            frames,
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn current_frame(&self) -> Option<&Arc<CallFrame>> {
        self.frames.last()
    }

    /// Innermost frame of a call to `function`
    pub fn frame_for(&self, function: &str) -> Option<&Arc<CallFrame>> {
        self.frames.iter().rev().find(|f| f.function == function)
    }
}
