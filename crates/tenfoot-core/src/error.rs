use crate::NodeId;

/// Contract and invariant failures raised by the tree, focus and list code.
///
/// Navigation misses are not errors: they surface as `None` and are logged.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("node {node:?} is not a child of {parent:?}")]
    WrongParent { node: NodeId, parent: NodeId },

    #[error("node {0:?} does not exist in this tree")]
    StaleNode(NodeId),

    #[error("node {0:?} already has a parent; detach it first")]
    AlreadyAttached(NodeId),

    #[error("template error: {0}")]
    Template(String),

    #[error("item template has zero extent along the scroll axis")]
    ZeroLineSize,

    #[error("node {0:?} does not host a list engine")]
    NoEngine(NodeId),

    #[error("invariant violated: {0}")]
    Invariant(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
