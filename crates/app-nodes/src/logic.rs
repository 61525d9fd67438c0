//! Logic nodes

use node_engine::{
    pins, NodeCategory, NodeDescriptor, NodeTypeDefinition, PinDef, PinType, PropertySchema,
};

/// Continues through `true` or `false` depending on `condition`
pub struct IfConditionNode;

impl NodeDescriptor for IfConditionNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("if-condition", NodeCategory::Logic, "If")
            .description("Branches on a condition")
            .input(PinDef::exec())
            .input(PinDef::new(pins::CONDITION, "Condition", PinType::Boolean))
            .output(PinDef::exec_named(pins::TRUE, "True"))
            .output(PinDef::exec_named(pins::FALSE, "False"))
    }
}

inventory::submit!(node_engine::DescriptorFn(IfConditionNode::descriptor));

/// Loose comparison of two values
pub struct CompareNode;

impl NodeDescriptor for CompareNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("compare", NodeCategory::Logic, "Compare")
            .description("Compares two values")
            .input(PinDef::new(pins::A, "A", PinType::Any))
            .input(PinDef::new(pins::B, "B", PinType::Any))
            .output(PinDef::new(pins::RESULT, "Result", PinType::Boolean))
            .property(
                "operator",
                PropertySchema::select("Operator", "==", &["==", "!=", ">", "<", ">=", "<="]),
            )
    }
}

inventory::submit!(node_engine::DescriptorFn(CompareNode::descriptor));

pub struct NotNode;

impl NodeDescriptor for NotNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("not", NodeCategory::Logic, "NOT")
            .description("Inverts a boolean")
            .input(PinDef::new(pins::VALUE, "Value", PinType::Boolean))
            .output(PinDef::new(pins::RESULT, "Result", PinType::Boolean))
    }
}

inventory::submit!(node_engine::DescriptorFn(NotNode::descriptor));

/// Runs `loop` once per index in `[start, end)`, then `done`
pub struct ForLoopNode;

impl NodeDescriptor for ForLoopNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("for-loop", NodeCategory::Logic, "For Loop")
            .description("Repeats a fixed number of times")
            .input(PinDef::exec())
            .input(PinDef::new(pins::START, "Start", PinType::Number))
            .input(PinDef::new(pins::END, "End", PinType::Number))
            .output(PinDef::exec_named(pins::LOOP, "Loop"))
            .output(PinDef::exec_named(pins::DONE, "Done"))
            .output(PinDef::new(pins::INDEX, "Index", PinType::Number))
    }
}

inventory::submit!(node_engine::DescriptorFn(ForLoopNode::descriptor));

/// Runs `loop` while `condition` holds, capped at `maxIterations`
pub struct WhileLoopNode;

impl NodeDescriptor for WhileLoopNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("while-loop", NodeCategory::Logic, "While Loop")
            .description("Repeats while a condition is true")
            .input(PinDef::exec())
            .input(PinDef::new(pins::CONDITION, "Condition", PinType::Boolean))
            .output(PinDef::exec_named(pins::LOOP, "Loop"))
            .output(PinDef::exec_named(pins::DONE, "Done"))
            .property("maxIterations", PropertySchema::number("Max Iterations", 1000))
    }
}

inventory::submit!(node_engine::DescriptorFn(WhileLoopNode::descriptor));

pub struct AndOrNode;

impl NodeDescriptor for AndOrNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("and-or", NodeCategory::Logic, "AND / OR")
            .description("Combines two conditions")
            .input(PinDef::new(pins::A, "A", PinType::Boolean))
            .input(PinDef::new(pins::B, "B", PinType::Boolean))
            .output(PinDef::new(pins::RESULT, "Result", PinType::Boolean))
            .property("operator", PropertySchema::select("Operator", "AND", &["AND", "OR"]))
    }
}

inventory::submit!(node_engine::DescriptorFn(AndOrNode::descriptor));
