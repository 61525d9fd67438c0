//! Data-pin resolution

use futures_util::future::{BoxFuture, FutureExt};
use serde_json::Value;

use super::state::ExecContext;
use super::RuntimeInner;
use crate::descriptor::NodeCategory;
use crate::error::Result;
use crate::kind::NodeKind;
use crate::types::NodeInstance;

impl RuntimeInner {
    /// Value arriving at an input pin
    ///
    /// `Null` when the pin is unwired or its source node is missing.
    pub(crate) fn resolve_input<'a>(
        &'a self,
        node_id: &'a str,
        pin_id: &'a str,
        ctx: &'a ExecContext,
    ) -> BoxFuture<'a, Value> {
        async move {
            let Some(conn) = self
                .connections
                .iter()
                .find(|c| c.to.node_id == node_id && c.to.pin_id == pin_id)
            else {
                return Value::Null;
            };
            let Some(source) = self.nodes.get(&conn.from.node_id) else {
                return Value::Null;
            };
            self.evaluate(source, &conn.from.pin_id, ctx).await
        }
        .boxed()
    }

    /// Compute one output pin of a node
    pub(crate) fn evaluate<'a>(
        &'a self,
        node: &'a NodeInstance,
        pin_id: &'a str,
        ctx: &'a ExecContext,
    ) -> BoxFuture<'a, Value> {
        async move {
            let Some(kind) = self.kinds.get(&node.id).copied() else {
                return Value::Null;
            };
            match self.eval_node(node, kind, pin_id, ctx).await {
                Ok(value) => value,
                Err(e) => {
                    self.log(format!("Evaluation error: {}", e));
                    Value::Null
                }
            }
        }
        .boxed()
    }

    async fn eval_node(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        pin_id: &str,
        ctx: &ExecContext,
    ) -> Result<Value> {
        match kind.category() {
            NodeCategory::Event => Ok(self.eval_event(node, kind, pin_id)),
            NodeCategory::Action => Ok(Value::Null),
            NodeCategory::Data => self.eval_data(node, kind, ctx).await,
            NodeCategory::Logic => self.eval_logic(node, kind, ctx).await,
            NodeCategory::Function => Ok(self.eval_function(node, kind, pin_id, ctx)),
            NodeCategory::Storage => Ok(self.eval_storage(node, kind, ctx).await),
            NodeCategory::Hardware => Ok(self.eval_hardware(node, kind, pin_id)),
            NodeCategory::Api => Ok(self.eval_api(node, kind, pin_id, ctx).await),
        }
    }

    /// Resolve an input and read it as a number
    pub(crate) async fn resolve_number(
        &self,
        node_id: &str,
        pin_id: &str,
        ctx: &ExecContext,
    ) -> f64 {
        super::value::to_number(&self.resolve_input(node_id, pin_id, ctx).await)
    }
}
