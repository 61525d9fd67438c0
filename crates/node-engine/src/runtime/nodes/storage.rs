use serde_json::Value;

use crate::descriptor::pins;
use crate::error::Result;
use crate::kind::NodeKind;
use crate::runtime::execute::Next;
use crate::runtime::state::ExecContext;
use crate::runtime::RuntimeInner;
use crate::types::NodeInstance;

impl RuntimeInner {
    /// Storage failures are logged and the chain continues
    pub(crate) async fn exec_storage(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        ctx: &ExecContext,
    ) -> Result<Next> {
        match kind {
            NodeKind::SaveData => {
                let value = self.resolve_input(&node.id, pins::VALUE, ctx).await;
                let key = self.storage_key(node);
                let outcome = self.host.storage.set(&key, value).await;
                if !self.is_current(ctx) {
                    return Ok(None);
                }
                match outcome {
                    Ok(()) => self.log(format!("Saved: {}", key)),
                    Err(e) => self.log(format!("Save failed: {}", e)),
                }
                Ok(Some(pins::EXEC))
            }
            NodeKind::DeleteData => {
                let key = self.storage_key(node);
                let outcome = self.host.storage.remove(&key).await;
                if !self.is_current(ctx) {
                    return Ok(None);
                }
                match outcome {
                    Ok(()) => self.log(format!("Deleted: {}", key)),
                    Err(e) => self.log(format!("Delete failed: {}", e)),
                }
                Ok(Some(pins::EXEC))
            }
            // load-data is data-only
            _ => Ok(None),
        }
    }

    pub(crate) async fn eval_storage(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        ctx: &ExecContext,
    ) -> Value {
        if kind != NodeKind::LoadData {
            return Value::Null;
        }
        let key = self.storage_key(node);
        let loaded = self.host.storage.get(&key).await;
        if !self.is_current(ctx) {
            return Value::Null;
        }
        match loaded {
            Ok(value) => value.unwrap_or(Value::Null),
            Err(e) => {
                log::debug!("load-data '{}' failed: {}", key, e);
                Value::Null
            }
        }
    }
}
