use serde_json::Value;

use crate::descriptor::pins;
use crate::kind::NodeKind;
use crate::runtime::RuntimeInner;
use crate::types::NodeInstance;

impl RuntimeInner {
    /// Only key-press exposes data: the key that fired it
    pub(crate) fn eval_event(&self, node: &NodeInstance, kind: NodeKind, pin_id: &str) -> Value {
        match (kind, pin_id) {
            (NodeKind::KeyPress, pins::KEY) => Value::String(
                self.read_state(&node.id, |s| s.last_key.clone())
                    .unwrap_or_default(),
            ),
            _ => Value::Null,
        }
    }
}
