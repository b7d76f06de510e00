// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas error type.

use nodecanvas_graph::{ConnectionError, GraphError};
use thiserror::Error;

/// Errors from canvas operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanvasError {
    /// The graph model rejected a mutation
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The graph model rejected a connection
    #[error("Cannot connect: {0}")]
    Connection(#[from] ConnectionError),

    /// The active network is the root
    #[error("Active network has no parent")]
    NoParentNetwork,

    /// The operation needs exactly one selected node
    #[error("Exactly one node must be selected, found {0}")]
    NeedsSingleSelection(usize),

    /// No port choice is waiting for an answer
    #[error("No port choice is pending")]
    NoPendingChoice,

    /// Clipboard contents could not be converted to text
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// The chosen index is not one of the offered ports
    #[error("Port choice {index} is out of range, {len} ports offered")]
    ChoiceOutOfRange {
        /// Requested index
        index: usize,
        /// Number of offered ports
        len: usize,
    },
}

/// Result type for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;
