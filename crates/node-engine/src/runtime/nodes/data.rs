use serde_json::Value;

use crate::descriptor::pins;
use crate::error::Result;
use crate::kind::NodeKind;
use crate::runtime::execute::Next;
use crate::runtime::state::ExecContext;
use crate::runtime::value::{number_value, to_display_string, to_number};
use crate::runtime::RuntimeInner;
use crate::types::NodeInstance;

/// Array input, or an empty list for anything else
fn as_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Index usable on a list of `len` items (fractions truncate)
fn list_index(index: f64, len: usize) -> Option<usize> {
    if index.is_nan() || index < 0.0 || index >= len as f64 {
        None
    } else {
        Some(index.trunc() as usize)
    }
}

impl RuntimeInner {
    /// list-add / list-remove compute a new list and keep it as their result
    pub(crate) async fn exec_data(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        ctx: &ExecContext,
    ) -> Result<Next> {
        let result = match kind {
            NodeKind::ListAdd => {
                let mut list = as_list(self.resolve_input(&node.id, pins::LIST, ctx).await);
                let item = self.resolve_input(&node.id, pins::ITEM, ctx).await;
                list.push(item);
                list
            }
            NodeKind::ListRemove => {
                let mut list = as_list(self.resolve_input(&node.id, pins::LIST, ctx).await);
                let index = self.resolve_number(&node.id, pins::INDEX, ctx).await;
                if let Some(i) = list_index(index, list.len()) {
                    list.remove(i);
                }
                list
            }
            // Pure data nodes have no exec pins
            _ => return Ok(None),
        };

        if !self.update_state(ctx, &node.id, |s| s.last_result = Some(Value::Array(result))) {
            return Ok(None);
        }
        Ok(Some(pins::EXEC))
    }

    pub(crate) async fn eval_data(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        ctx: &ExecContext,
    ) -> Result<Value> {
        let value = match kind {
            NodeKind::StringLiteral => node
                .property("value")
                .cloned()
                .unwrap_or_else(|| Value::String(String::new())),
            NodeKind::NumberLiteral => {
                number_value(node.property("value").map(to_number).unwrap_or(0.0))
            }
            NodeKind::GetVariable => {
                let name = node.str_property_or("varName", "myVar");
                let stored = self.variables.lock().get(name).cloned();
                stored.unwrap_or(Value::Null)
            }
            NodeKind::GetInputValue => {
                let target_id = node.str_property_or("targetId", "");
                Value::String(self.callbacks.get_input_value(target_id))
            }
            NodeKind::Concat => {
                let a = self.resolve_input(&node.id, pins::A, ctx).await;
                let b = self.resolve_input(&node.id, pins::B, ctx).await;
                Value::String(to_display_string(&a) + &to_display_string(&b))
            }
            NodeKind::MathOp => {
                let a = self.resolve_number(&node.id, pins::A, ctx).await;
                let b = self.resolve_number(&node.id, pins::B, ctx).await;
                let result = match node.str_property_or("operator", "+") {
                    "+" => a + b,
                    "-" => a - b,
                    "*" => a * b,
                    "/" if b != 0.0 => a / b,
                    "/" => 0.0,
                    other => {
                        log::debug!("Unknown math operator '{}' on node '{}'", other, node.id);
                        0.0
                    }
                };
                number_value(result)
            }
            NodeKind::CreateList => Value::Array(Vec::new()),
            NodeKind::ListAdd | NodeKind::ListRemove => self
                .read_state(&node.id, |s| s.last_result.clone())
                .unwrap_or_else(|| Value::Array(Vec::new())),
            NodeKind::ListGet => {
                let list = self.resolve_input(&node.id, pins::LIST, ctx).await;
                let index = self.resolve_number(&node.id, pins::INDEX, ctx).await;
                match list {
                    Value::Array(items) => list_index(index, items.len())
                        .filter(|_| index.fract() == 0.0)
                        .and_then(|i| items.into_iter().nth(i))
                        .unwrap_or(Value::Null),
                    _ => Value::Null,
                }
            }
            NodeKind::ListLength => match self.resolve_input(&node.id, pins::LIST, ctx).await {
                Value::Array(items) => Value::from(items.len()),
                _ => Value::from(0),
            },
            NodeKind::ToNumber => {
                let n = to_number(&self.resolve_input(&node.id, pins::VALUE, ctx).await);
                if n.is_nan() {
                    Value::from(0)
                } else {
                    number_value(n)
                }
            }
            NodeKind::ToString => Value::String(to_display_string(
                &self.resolve_input(&node.id, pins::VALUE, ctx).await,
            )),
            NodeKind::RandomNumber => {
                let min = node.property("min").map(to_number).unwrap_or(0.0);
                let max = node.property("max").map(to_number).unwrap_or(100.0);
                let integer = node.property("integer") != Some(&Value::Bool(false));
                let roll = rand::random::<f64>() * (max - min) + min;
                number_value(if integer { roll.floor() } else { roll })
            }
            _ => Value::Null,
        };
        Ok(value)
    }
}
