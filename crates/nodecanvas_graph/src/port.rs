// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input ports and the type tags that flow through them.

use serde::{Deserialize, Serialize};

/// Data type tag carried by a node output or accepted by an input port
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// Accepts or produces anything
    #[default]
    Any,
    /// Vector geometry
    Geometry,
    /// Floating point value
    Float,
    /// Integer value
    Int,
    /// Boolean value
    Bool,
    /// 2D point
    Point,
    /// Color (RGBA)
    Color,
    /// String value
    String,
    /// Library-defined type
    Custom(String),
}

impl PortType {
    /// Check if a value of this type can feed a port of `other` type
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        if matches!(self, Self::Any) || matches!(other, Self::Any) {
            return true;
        }

        if self == other {
            return true;
        }

        // Implicit conversions
        matches!(
            (self, other),
            (Self::Int, Self::Float)
                | (Self::Float, Self::Int)
                | (Self::Int | Self::Float, Self::String)
                | (Self::Float, Self::Point)
        )
    }
}

/// An input port on a node
///
/// Ports are identified by their label, which is unique within the node.
/// The port's index in its node's input list decides both its layout slot
/// and its place in the connection disambiguation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Port label
    pub label: String,
    /// Accepted type
    pub port_type: PortType,
}

impl Port {
    /// Create a new port accepting the given type
    pub fn new(label: impl Into<String>, port_type: PortType) -> Self {
        Self {
            label: label.into(),
            port_type,
        }
    }

    /// Create a port that accepts any type
    pub fn any(label: impl Into<String>) -> Self {
        Self::new(label, PortType::Any)
    }

    /// Check if an output of `output_type` may be connected to this port
    pub fn accepts(&self, output_type: &PortType) -> bool {
        output_type.can_connect_to(&self.port_type)
    }
}
