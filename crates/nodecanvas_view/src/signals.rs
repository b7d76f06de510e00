// SPDX-License-Identifier: MIT OR Apache-2.0
//! Notifications from the canvas to its host.
//!
//! Selection, repaint and error listeners are registered separately so a host
//! only subscribes to what it draws or reports.

use crate::error::CanvasError;
use nodecanvas_graph::NodeId;
use std::fmt;

/// Part of the canvas that needs to be drawn again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepaintRequest {
    /// A single node view
    Node(NodeId),
    /// The layer that draws connections
    ConnectionLayer,
    /// Everything
    Network,
}

type SelectionListener = Box<dyn FnMut(&[NodeId])>;
type RepaintListener = Box<dyn FnMut(RepaintRequest)>;
type ErrorListener = Box<dyn FnMut(&CanvasError)>;

/// Listener registry
#[derive(Default)]
pub struct CanvasSignals {
    selection: Vec<SelectionListener>,
    repaint: Vec<RepaintListener>,
    error: Vec<ErrorListener>,
}

impl CanvasSignals {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for selection changes; the listener receives the new selection
    pub fn on_selection_changed(&mut self, listener: impl FnMut(&[NodeId]) + 'static) {
        self.selection.push(Box::new(listener));
    }

    /// Listen for repaint requests
    pub fn on_repaint(&mut self, listener: impl FnMut(RepaintRequest) + 'static) {
        self.repaint.push(Box::new(listener));
    }

    /// Listen for rejected operations
    pub fn on_error(&mut self, listener: impl FnMut(&CanvasError) + 'static) {
        self.error.push(Box::new(listener));
    }

    pub(crate) fn emit_selection_changed(&mut self, selection: &[NodeId]) {
        tracing::debug!("Selection changed: {} node(s)", selection.len());
        for listener in &mut self.selection {
            listener(selection);
        }
    }

    pub(crate) fn emit_repaint(&mut self, request: RepaintRequest) {
        for listener in &mut self.repaint {
            listener(request);
        }
    }

    pub(crate) fn emit_error(&mut self, error: &CanvasError) {
        for listener in &mut self.error {
            listener(error);
        }
    }
}

impl fmt::Debug for CanvasSignals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasSignals")
            .field("selection", &self.selection.len())
            .field("repaint", &self.repaint.len())
            .field("error", &self.error.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_listeners_are_independent() {
        let mut signals = CanvasSignals::new();
        let repaints = Rc::new(RefCell::new(Vec::new()));
        let selections = Rc::new(RefCell::new(0));

        let sink = repaints.clone();
        signals.on_repaint(move |request| sink.borrow_mut().push(request));
        let count = selections.clone();
        signals.on_selection_changed(move |_| *count.borrow_mut() += 1);

        signals.emit_repaint(RepaintRequest::ConnectionLayer);
        signals.emit_repaint(RepaintRequest::Network);

        assert_eq!(
            *repaints.borrow(),
            vec![RepaintRequest::ConnectionLayer, RepaintRequest::Network]
        );
        assert_eq!(*selections.borrow(), 0);
    }

    #[test]
    fn test_error_listener_receives_error() {
        let mut signals = CanvasSignals::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        signals.on_error(move |error| sink.borrow_mut().push(error.clone()));

        signals.emit_error(&CanvasError::NoParentNetwork);
        assert_eq!(*seen.borrow(), vec![CanvasError::NoParentNetwork]);
    }
}
