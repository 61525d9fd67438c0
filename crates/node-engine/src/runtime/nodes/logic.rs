use std::cmp::Ordering;

use serde_json::Value;

use crate::descriptor::pins;
use crate::error::Result;
use crate::kind::NodeKind;
use crate::runtime::execute::Next;
use crate::runtime::state::ExecContext;
use crate::runtime::value::{compare, loose_eq, to_number, truthy};
use crate::runtime::RuntimeInner;
use crate::types::NodeInstance;

const DEFAULT_MAX_ITERATIONS: f64 = 1000.0;

impl RuntimeInner {
    pub(crate) async fn exec_logic(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        ctx: &ExecContext,
    ) -> Result<Next> {
        match kind {
            NodeKind::IfCondition => {
                let condition = self.resolve_input(&node.id, pins::CONDITION, ctx).await;
                Ok(Some(if truthy(&condition) {
                    pins::TRUE
                } else {
                    pins::FALSE
                }))
            }
            NodeKind::ForLoop => {
                let start = self.resolve_number(&node.id, pins::START, ctx).await;
                let end = self.resolve_number(&node.id, pins::END, ctx).await;
                let mut i = start;
                while i < end {
                    self.update_state(ctx, &node.id, |s| s.loop_index = Some(i));
                    self.execute_from_pin(&node.id, pins::LOOP, ctx).await;
                    if !self.is_current(ctx) {
                        return Ok(None);
                    }
                    i += 1.0;
                }
                Ok(Some(pins::DONE))
            }
            NodeKind::WhileLoop => {
                let max = match node.property("maxIterations").map(to_number) {
                    Some(n) if n != 0.0 && !n.is_nan() => n,
                    _ => DEFAULT_MAX_ITERATIONS,
                };
                let mut count = 0.0;
                while count < max {
                    let condition = self.resolve_input(&node.id, pins::CONDITION, ctx).await;
                    if !truthy(&condition) {
                        break;
                    }
                    self.execute_from_pin(&node.id, pins::LOOP, ctx).await;
                    if !self.is_current(ctx) {
                        return Ok(None);
                    }
                    count += 1.0;
                }
                if count >= max {
                    log::warn!("While loop '{}' hit its iteration cap ({})", node.id, max);
                    self.log(format!("While loop reached max iterations ({})", max));
                }
                Ok(Some(pins::DONE))
            }
            _ => Ok(None),
        }
    }

    pub(crate) async fn eval_logic(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        ctx: &ExecContext,
    ) -> Result<Value> {
        let value = match kind {
            NodeKind::Compare => {
                let a = self.resolve_input(&node.id, pins::A, ctx).await;
                let b = self.resolve_input(&node.id, pins::B, ctx).await;
                let ord = compare(&a, &b);
                let result = match node.str_property_or("operator", "==") {
                    "==" => loose_eq(&a, &b),
                    "!=" => !loose_eq(&a, &b),
                    ">" => ord == Some(Ordering::Greater),
                    "<" => ord == Some(Ordering::Less),
                    ">=" => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
                    "<=" => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
                    _ => false,
                };
                Value::Bool(result)
            }
            NodeKind::Not => {
                let value = self.resolve_input(&node.id, pins::VALUE, ctx).await;
                Value::Bool(!truthy(&value))
            }
            NodeKind::AndOr => {
                let a = self.resolve_input(&node.id, pins::A, ctx).await;
                let b = self.resolve_input(&node.id, pins::B, ctx).await;
                // Short-circuit operators yield an operand, not a bool
                if node.str_property_or("operator", "AND") == "AND" {
                    if truthy(&a) {
                        b
                    } else {
                        a
                    }
                } else if truthy(&a) {
                    a
                } else {
                    b
                }
            }
            NodeKind::ForLoop => {
                let index = self.read_state(&node.id, |s| s.loop_index).unwrap_or(0.0);
                crate::runtime::value::number_value(index)
            }
            _ => Value::Null,
        };
        Ok(value)
    }
}
