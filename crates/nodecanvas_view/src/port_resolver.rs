// SPDX-License-Identifier: MIT OR Apache-2.0
//! Choosing the input port of a new connection.
//!
//! A resolver lists the target's input ports an output may connect to, in
//! the target's declared order. Zero candidates means nothing happens, one is
//! connected directly and several are offered to the user as a
//! [`PortChoice`].

use crate::commands::{CanvasCommand, MenuItem};
use nodecanvas_graph::{Node, NodeId, Port};

/// Lists candidate input ports for a connection
pub trait PortResolver {
    /// Candidate ports of `input` for the output of `output`, in declared order
    fn compatible_ports<'a>(&self, output: &Node, input: &'a Node) -> Vec<&'a Port>;
}

/// Offers every input port regardless of type
#[derive(Debug, Clone, Copy, Default)]
pub struct AllInputs;

impl PortResolver for AllInputs {
    fn compatible_ports<'a>(&self, _output: &Node, input: &'a Node) -> Vec<&'a Port> {
        input.inputs.iter().collect()
    }
}

/// Offers the input ports whose type accepts the output's type
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeChecked;

impl PortResolver for TypeChecked {
    fn compatible_ports<'a>(&self, output: &Node, input: &'a Node) -> Vec<&'a Port> {
        input
            .inputs
            .iter()
            .filter(|port| port.accepts(&output.output_type))
            .collect()
    }
}

/// Pending choice between several candidate ports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortChoice {
    /// Node whose output is connected
    pub output: NodeId,
    /// Node receiving the connection
    pub input: NodeId,
    /// One connect command per candidate port, in declared order
    pub options: Vec<MenuItem>,
}

impl PortChoice {
    /// Labels of the offered ports
    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|item| item.label.as_str()).collect()
    }

    /// Command for the option at `index`
    pub fn command(&self, index: usize) -> Option<&CanvasCommand> {
        self.options.get(index).map(|item| &item.command)
    }

    /// Number of options
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Check if there is nothing to choose from
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Result of resolving the ports for a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortResolution {
    /// No port accepts the connection
    NoPort,
    /// Exactly one port does
    Single(String),
    /// The user has to pick one
    Choose(PortChoice),
}

/// Resolve the candidate ports for connecting `output` into `input`
pub fn resolve(resolver: &dyn PortResolver, output: &Node, input: &Node) -> PortResolution {
    let ports = resolver.compatible_ports(output, input);
    match ports.as_slice() {
        [] => PortResolution::NoPort,
        [port] => PortResolution::Single(port.label.clone()),
        _ => PortResolution::Choose(PortChoice {
            output: output.id,
            input: input.id,
            options: ports
                .iter()
                .map(|port| {
                    MenuItem::new(
                        port.label.clone(),
                        CanvasCommand::Connect {
                            output: output.id,
                            input: input.id,
                            port: port.label.clone(),
                        },
                    )
                })
                .collect(),
        }),
    }
}
