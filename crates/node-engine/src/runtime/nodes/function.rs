use std::sync::Arc;

use serde_json::Value;

use crate::descriptor::pins;
use crate::error::{NodeEngineError, Result};
use crate::kind::NodeKind;
use crate::runtime::execute::Next;
use crate::runtime::state::{CallFrame, ExecContext};
use crate::runtime::RuntimeInner;
use crate::types::NodeInstance;

fn function_name(node: &NodeInstance) -> &str {
    node.str_property_or("funcName", "myFunction")
}

impl RuntimeInner {
    pub(crate) async fn exec_function(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        ctx: &ExecContext,
    ) -> Result<Next> {
        match kind {
            // Entry of the function body
            NodeKind::FunctionDefine => Ok(Some(pins::EXEC)),
            NodeKind::FunctionReturn => {
                let value = self.resolve_input(&node.id, pins::VALUE, ctx).await;
                if !self.is_current(ctx) {
                    return Ok(None);
                }
                match ctx.current_frame() {
                    Some(frame) => frame.set_return(value),
                    None => log::debug!("function-return '{}' reached outside a call", node.id),
                }
                Ok(None)
            }
            NodeKind::FunctionCall => {
                let name = function_name(node);
                let define_id = self
                    .functions
                    .get(name)
                    .ok_or_else(|| NodeEngineError::FunctionNotFound(name.to_string()))?;
                if ctx.depth() >= self.options.max_call_depth {
                    return Err(NodeEngineError::CallDepthExceeded(self.options.max_call_depth));
                }

                let param1 = self.resolve_input(&node.id, pins::PARAM1, ctx).await;
                let param2 = self.resolve_input(&node.id, pins::PARAM2, ctx).await;
                if !self.is_current(ctx) {
                    return Ok(None);
                }
                let frame = Arc::new(CallFrame::new(name, [param1, param2]));
                let body_ctx = ctx.with_frame(frame.clone());

                self.execute_node(define_id, &body_ctx).await;
                if !self.is_current(ctx) {
                    return Ok(None);
                }

                let result = frame.take_return().unwrap_or(Value::Null);
                self.update_state(ctx, &node.id, |s| s.last_result = Some(result));
                self.log(format!("Function '{}' finished", name));
                Ok(Some(pins::EXEC))
            }
            _ => Ok(None),
        }
    }

    pub(crate) fn eval_function(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        pin_id: &str,
        ctx: &ExecContext,
    ) -> Value {
        match kind {
            NodeKind::FunctionDefine => ctx
                .frame_for(function_name(node))
                .map(|frame| frame.param(pin_id))
                .unwrap_or(Value::Null),
            NodeKind::FunctionCall => self
                .read_state(&node.id, |s| s.last_result.clone())
                .unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}
