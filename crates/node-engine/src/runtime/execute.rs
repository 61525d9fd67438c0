//! Exec-pin traversal

use futures_util::future::{BoxFuture, FutureExt};

use super::state::ExecContext;
use super::RuntimeInner;
use crate::descriptor::NodeCategory;
use crate::error::Result;
use crate::events::RuntimeEvent;
use crate::kind::NodeKind;
use crate::types::NodeInstance;

/// Exec output a handler continues through, or `None` to end the chain
pub(crate) type Next = Option<&'static str>;

impl RuntimeInner {
    /// Run every node wired to `(node_id, pin_id)`, one after another
    pub(crate) fn execute_from_pin<'a>(
        &'a self,
        node_id: &'a str,
        pin_id: &'a str,
        ctx: &'a ExecContext,
    ) -> BoxFuture<'a, ()> {
        async move {
            let targets: Vec<&str> = self
                .connections
                .iter()
                .filter(|c| c.from.node_id == node_id && c.from.pin_id == pin_id)
                .map(|c| c.to.node_id.as_str())
                .collect();

            for target in targets {
                if !self.is_current(ctx) {
                    return;
                }
                self.execute_node(target, ctx).await;
            }
        }
        .boxed()
    }

    /// Run one node; failures are logged and end this chain only
    pub(crate) fn execute_node<'a>(
        &'a self,
        node_id: &'a str,
        ctx: &'a ExecContext,
    ) -> BoxFuture<'a, ()> {
        async move {
            if !self.is_current(ctx) {
                return;
            }
            // Dangling wires and unknown types are silently skipped
            let Some(node) = self.nodes.get(node_id) else {
                return;
            };
            let Some(kind) = self.kinds.get(node_id).copied() else {
                return;
            };

            log::trace!("[{}] {} ({})", kind.category(), self.node_label(node), node.id);
            self.emit(RuntimeEvent::NodeStarted {
                node_id: node.id.clone(),
                node_type: node.node_type.clone(),
            });

            match self.run_node(node, kind, ctx).await {
                Ok(Some(pin)) => self.execute_from_pin(&node.id, pin, ctx).await,
                Ok(None) => {}
                Err(e) => {
                    self.log(format!("Error in node {} ({}): {}", node.node_type, node.id, e));
                    self.emit(RuntimeEvent::node_failed(&node.id, &node.node_type, &e));
                }
            }
        }
        .boxed()
    }

    async fn run_node(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        ctx: &ExecContext,
    ) -> Result<Next> {
        match kind.category() {
            // Triggers only start chains; reaching one by wire does nothing
            NodeCategory::Event => Ok(None),
            NodeCategory::Action => self.exec_action(node, kind, ctx).await,
            NodeCategory::Data => self.exec_data(node, kind, ctx).await,
            NodeCategory::Logic => self.exec_logic(node, kind, ctx).await,
            NodeCategory::Function => self.exec_function(node, kind, ctx).await,
            NodeCategory::Storage => self.exec_storage(node, kind, ctx).await,
            NodeCategory::Hardware => self.exec_hardware(node, kind, ctx).await,
            NodeCategory::Api => self.exec_api(node, kind, ctx).await,
        }
    }
}
