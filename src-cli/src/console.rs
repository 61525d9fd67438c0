//! UI callbacks that render to the terminal

use node_engine::{UiCallbacks, UiStateCallbacks};

/// Prints UI intents and runtime log lines while keeping a [`UiState`](node_engine::UiState)
#[derive(Debug, Clone, Default)]
pub struct ConsoleCallbacks {
    ui: UiStateCallbacks,
}

impl ConsoleCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&self) -> &UiStateCallbacks {
        &self.ui
    }
}

impl UiCallbacks for ConsoleCallbacks {
    fn set_text(&self, target_id: &str, text: &str) {
        println!("  [ui] {} text = {:?}", target_id, text);
        self.ui.set_text(target_id, text);
    }

    fn set_style(&self, target_id: &str, property: &str, value: &str) {
        println!("  [ui] {} {} = {:?}", target_id, property, value);
        self.ui.set_style(target_id, property, value);
    }

    fn alert(&self, message: &str) {
        println!("  [alert] {}", message);
        self.ui.alert(message);
    }

    fn log(&self, message: &str) {
        println!("{} {}", chrono::Local::now().format("%H:%M:%S%.3f"), message);
    }

    fn get_input_value(&self, target_id: &str) -> String {
        self.ui.get_input_value(target_id)
    }

    fn navigate_page(&self, page_id: &str) {
        println!("  [ui] page -> {}", page_id);
        self.ui.navigate_page(page_id);
    }
}
