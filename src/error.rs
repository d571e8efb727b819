use crate::tree::arena::NodeId;

/// Errors rejected at the layout entry point, before any split is computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("container triangle has a non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    #[error("node {node:?} '{name}' has invalid weight {weight}")]
    InvalidWeight {
        node: NodeId,
        name: String,
        weight: f64,
    },

    #[error("node {node:?} '{name}' has weight {weight} but its children sum to {children_sum}")]
    WeightSumMismatch {
        node: NodeId,
        name: String,
        weight: f64,
        children_sum: f64,
    },

    #[error("node {0:?} is not part of the tree")]
    UnknownNode(NodeId),

    #[error("tree is deeper than the configured limit of {max_depth} levels")]
    TooDeep { max_depth: u16 },
}

/// Errors while reading `path weight` records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("line {line}: expected `<path> <weight>`, got {content:?}")]
    Malformed { line: usize, content: String },

    #[error("line {line}: weight {value:?} is not a finite non-negative number")]
    BadWeight { line: usize, value: String },

    #[error("line {line}: empty path")]
    EmptyPath { line: usize },
}
