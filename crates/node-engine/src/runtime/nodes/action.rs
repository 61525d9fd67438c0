use crate::descriptor::pins;
use crate::error::Result;
use crate::events::{RuntimeEvent, UiIntent};
use crate::kind::NodeKind;
use crate::runtime::execute::Next;
use crate::runtime::state::ExecContext;
use crate::runtime::value::to_display_string;
use crate::runtime::RuntimeInner;
use crate::types::{NodeInstance, DEFAULT_PAGE_ID};

impl RuntimeInner {
    pub(crate) async fn exec_action(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        ctx: &ExecContext,
    ) -> Result<Next> {
        match kind {
            NodeKind::SetText => {
                let value = self.resolve_input(&node.id, pins::VALUE, ctx).await;
                let target_id = node.str_property_or("targetId", "");
                let text = to_display_string(&value);
                if let Some(ui) = self.ui(ctx) {
                    ui.set_text(target_id, &text);
                    self.emit(RuntimeEvent::Ui(UiIntent::SetText {
                        target_id: target_id.to_string(),
                        text,
                    }));
                }
            }
            NodeKind::SetStyle => {
                let value = self.resolve_input(&node.id, pins::VALUE, ctx).await;
                let target_id = node.str_property_or("targetId", "");
                let property = node.str_property_or("property", "color");
                let value = to_display_string(&value);
                if let Some(ui) = self.ui(ctx) {
                    ui.set_style(target_id, property, &value);
                    self.emit(RuntimeEvent::Ui(UiIntent::SetStyle {
                        target_id: target_id.to_string(),
                        property: property.to_string(),
                        value,
                    }));
                }
            }
            NodeKind::ShowAlert => {
                let message = self.resolve_input(&node.id, pins::MESSAGE, ctx).await;
                let message = if message.is_null() {
                    "Alert".to_string()
                } else {
                    to_display_string(&message)
                };
                if let Some(ui) = self.ui(ctx) {
                    ui.alert(&message);
                    self.emit(RuntimeEvent::Ui(UiIntent::Alert { message }));
                }
            }
            NodeKind::Log => {
                let message = self.resolve_input(&node.id, pins::MESSAGE, ctx).await;
                if !self.is_current(ctx) {
                    return Ok(None);
                }
                self.log(to_display_string(&message));
            }
            NodeKind::SetVariable => {
                let value = self.resolve_input(&node.id, pins::VALUE, ctx).await;
                let name = node.str_property_or("varName", "myVar");
                if !self.set_variable(ctx, name, value) {
                    return Ok(None);
                }
            }
            NodeKind::NavigatePage => {
                let page_id = node.str_property_or("pageId", DEFAULT_PAGE_ID);
                self.log(format!("Navigate to page: {}", page_id));
                if let Some(ui) = self.ui(ctx) {
                    ui.navigate_page(page_id);
                    self.emit(RuntimeEvent::Ui(UiIntent::NavigatePage {
                        page_id: page_id.to_string(),
                    }));
                }
            }
            _ => return Ok(None),
        }
        Ok(Some(pins::EXEC))
    }
}
