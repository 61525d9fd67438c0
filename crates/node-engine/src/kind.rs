//! Closed set of node behaviors
//!
//! Every node instance's `type` string is parsed once into a [`NodeKind`].
//! The runtime dispatches on this enum; strings that do not parse are
//! unknown types and have no behavior.

use crate::descriptor::NodeCategory;

/// Built-in node behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Event
    AppStart,
    Click,
    KeyPress,
    Timer,
    // Action
    SetText,
    SetStyle,
    ShowAlert,
    Log,
    SetVariable,
    NavigatePage,
    // Data
    StringLiteral,
    NumberLiteral,
    GetVariable,
    Concat,
    MathOp,
    GetInputValue,
    CreateList,
    ListAdd,
    ListGet,
    ListRemove,
    ListLength,
    ToNumber,
    ToString,
    RandomNumber,
    // Logic
    IfCondition,
    Compare,
    Not,
    ForLoop,
    WhileLoop,
    AndOr,
    // Function
    FunctionDefine,
    FunctionReturn,
    FunctionCall,
    // Storage
    SaveData,
    LoadData,
    DeleteData,
    // Hardware
    GetClipboard,
    SetClipboard,
    GetLocation,
    GetBattery,
    SendNotification,
    // Api
    GeminiChat,
    HttpRequest,
}

/// (kind, canonical id, legacy camelCase id)
const NAMES: [(NodeKind, &str, &str); 43] = [
    (NodeKind::AppStart, "app-start", "onAppStart"),
    (NodeKind::Click, "click", "onClick"),
    (NodeKind::KeyPress, "key-press", "onKeyPress"),
    (NodeKind::Timer, "timer", "onTimer"),
    (NodeKind::SetText, "set-text", "setText"),
    (NodeKind::SetStyle, "set-style", "setStyle"),
    (NodeKind::ShowAlert, "show-alert", "showAlert"),
    (NodeKind::Log, "log", "log"),
    (NodeKind::SetVariable, "set-variable", "setVariable"),
    (NodeKind::NavigatePage, "navigate-page", "navigatePage"),
    (NodeKind::StringLiteral, "string-literal", "stringLiteral"),
    (NodeKind::NumberLiteral, "number-literal", "numberLiteral"),
    (NodeKind::GetVariable, "get-variable", "getVariable"),
    (NodeKind::Concat, "concat", "concat"),
    (NodeKind::MathOp, "math-op", "mathOp"),
    (NodeKind::GetInputValue, "get-input-value", "getInputValue"),
    (NodeKind::CreateList, "create-list", "createList"),
    (NodeKind::ListAdd, "list-add", "listAdd"),
    (NodeKind::ListGet, "list-get", "listGet"),
    (NodeKind::ListRemove, "list-remove", "listRemove"),
    (NodeKind::ListLength, "list-length", "listLength"),
    (NodeKind::ToNumber, "to-number", "toNumber"),
    (NodeKind::ToString, "to-string", "toString"),
    (NodeKind::RandomNumber, "random-number", "randomNumber"),
    (NodeKind::IfCondition, "if-condition", "ifCondition"),
    (NodeKind::Compare, "compare", "compare"),
    (NodeKind::Not, "not", "not"),
    (NodeKind::ForLoop, "for-loop", "forLoop"),
    (NodeKind::WhileLoop, "while-loop", "whileLoop"),
    (NodeKind::AndOr, "and-or", "andOr"),
    (NodeKind::FunctionDefine, "function-define", "functionDefine"),
    (NodeKind::FunctionReturn, "function-return", "functionReturn"),
    (NodeKind::FunctionCall, "function-call", "functionCall"),
    (NodeKind::SaveData, "save-data", "saveData"),
    (NodeKind::LoadData, "load-data", "loadData"),
    (NodeKind::DeleteData, "delete-data", "deleteData"),
    (NodeKind::GetClipboard, "get-clipboard", "getClipboard"),
    (NodeKind::SetClipboard, "set-clipboard", "setClipboard"),
    (NodeKind::GetLocation, "get-location", "getLocation"),
    (NodeKind::GetBattery, "get-battery", "getBattery"),
    (NodeKind::SendNotification, "send-notification", "sendNotification"),
    (NodeKind::GeminiChat, "gemini-chat", "geminiChat"),
    (NodeKind::HttpRequest, "http-request", "httpRequest"),
];

impl NodeKind {
    /// Parse a node `type` string, accepting both kebab-case and legacy camelCase ids
    pub fn from_type_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(_, kebab, camel)| *kebab == name || *camel == name)
            .map(|(kind, _, _)| *kind)
    }

    /// Canonical kebab-case type id
    pub fn type_name(&self) -> &'static str {
        NAMES
            .iter()
            .find(|(kind, _, _)| kind == self)
            .map(|(_, kebab, _)| *kebab)
            .unwrap_or("unknown")
    }

    /// Every built-in kind, in catalog order
    pub fn all() -> impl Iterator<Item = NodeKind> {
        NAMES.iter().map(|(kind, _, _)| *kind)
    }

    pub fn category(&self) -> NodeCategory {
        use NodeKind::*;
        match self {
            AppStart | Click | KeyPress | Timer => NodeCategory::Event,
            SetText | SetStyle | ShowAlert | Log | SetVariable | NavigatePage => {
                NodeCategory::Action
            }
            StringLiteral | NumberLiteral | GetVariable | Concat | MathOp | GetInputValue
            | CreateList | ListAdd | ListGet | ListRemove | ListLength | ToNumber | ToString
            | RandomNumber => NodeCategory::Data,
            IfCondition | Compare | Not | ForLoop | WhileLoop | AndOr => NodeCategory::Logic,
            FunctionDefine | FunctionReturn | FunctionCall => NodeCategory::Function,
            SaveData | LoadData | DeleteData => NodeCategory::Storage,
            GetClipboard | SetClipboard | GetLocation | GetBattery | SendNotification => {
                NodeCategory::Hardware
            }
            GeminiChat | HttpRequest => NodeCategory::Api,
        }
    }

    /// Whether the runtime starts chains from this node rather than reaching it by wire
    pub fn is_trigger(&self) -> bool {
        self.category() == NodeCategory::Event
    }
}

/// Map a type string to its canonical id, leaving unknown names untouched
pub fn canonical_type_name(name: &str) -> &str {
    match NodeKind::from_type_name(name) {
        Some(kind) => kind.type_name(),
        None => name,
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}
