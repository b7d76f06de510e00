// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas commands and the menus built from them.
//!
//! A command is a plain value carrying the arguments it acts on. Menus are
//! lists of labelled commands; running one goes through
//! [`crate::NetworkCanvas::execute`].

use nodecanvas_graph::NodeId;

/// An action the canvas can perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasCommand {
    /// Connect an output to a named input port
    Connect {
        /// Node whose output is connected
        output: NodeId,
        /// Node receiving the connection
        input: NodeId,
        /// Input port label
        port: String,
    },
    /// Make a node the rendered child of its network
    SetRendered(NodeId),
    /// Ask the host for a new name
    Rename(NodeId),
    /// Remove a node
    Delete(NodeId),
    /// Open a node as the active network
    EditChildren(NodeId),
    /// Open the parent of the active network
    GoUp,
    /// Reset pan and zoom
    ResetView,
}

/// What the host should do after a command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Nothing further
    Done,
    /// Prompt for a new name and pass it to `rename_node`
    PromptRename {
        /// Node to rename
        node: NodeId,
        /// Name shown in the prompt
        current_name: String,
    },
}

/// A labelled command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Text shown to the user
    pub label: String,
    /// Command run when picked
    pub command: CanvasCommand,
    /// Keyboard shortcut hint
    pub shortcut: Option<&'static str>,
}

impl MenuItem {
    /// Create an item without a shortcut
    pub fn new(label: impl Into<String>, command: CanvasCommand) -> Self {
        Self {
            label: label.into(),
            command,
            shortcut: None,
        }
    }

    /// Set the shortcut hint
    pub fn with_shortcut(mut self, shortcut: &'static str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }
}

/// Context menu of a node
pub fn node_menu(node: NodeId) -> Vec<MenuItem> {
    vec![
        MenuItem::new("Set Rendered", CanvasCommand::SetRendered(node)),
        MenuItem::new("Rename", CanvasCommand::Rename(node)),
        MenuItem::new("Delete", CanvasCommand::Delete(node)).with_shortcut("Backspace"),
        MenuItem::new("Edit Children", CanvasCommand::EditChildren(node)).with_shortcut("Enter"),
    ]
}

/// Context menu of the empty canvas
pub fn network_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new("Reset View", CanvasCommand::ResetView),
        MenuItem::new("Go Up", CanvasCommand::GoUp).with_shortcut("U"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_menu_carries_node() {
        let node = NodeId::new();
        let menu = node_menu(node);
        let labels: Vec<&str> = menu.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, ["Set Rendered", "Rename", "Delete", "Edit Children"]);
        assert_eq!(menu[2].command, CanvasCommand::Delete(node));
        assert_eq!(menu[3].shortcut, Some("Enter"));
    }

    #[test]
    fn test_network_menu() {
        let menu = network_menu();
        assert_eq!(menu[0].command, CanvasCommand::ResetView);
        assert_eq!(menu[1].command, CanvasCommand::GoUp);
    }
}
