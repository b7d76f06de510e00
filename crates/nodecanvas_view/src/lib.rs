// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interactive canvas for node networks.
//!
//! This crate keeps a visual presentation of a graph model's active network
//! in sync with the model while handling pointer interaction:
//! - Single, batch and rubber-band selection
//! - Multi-node dragging with drift-free grid snapping
//! - Connection creation with port disambiguation
//! - Clipboard, navigation between networks and context menus
//!
//! ## Architecture
//!
//! [`NetworkCanvas`] owns the model, a [`ViewState`] with one [`NodeView`]
//! per child of the active network, and a [`DragController`] for the current
//! gesture. Gestures mutate the model; the model queues notifications that
//! [`SyncAdapter`] applies back to the views. The host listens through
//! [`CanvasSignals`] and can draw everything with [`CanvasUi`].

pub mod assets;
pub mod camera;
pub mod canvas;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod node_view;
pub mod port_resolver;
pub mod signals;
pub mod sync;
pub mod ui;
pub mod view_state;

pub use assets::{asset_table, AssetTable, IconAsset};
pub use camera::Camera;
pub use canvas::{EventOutcome, NetworkCanvas};
pub use clipboard::Clipboard;
pub use commands::{network_menu, node_menu, CanvasCommand, CommandOutcome, MenuItem};
pub use config::{CanvasConfig, ConfigError};
pub use drag::{
    CanvasEvent, DragController, DragState, GestureOutcome, KeyCommand, PointerButton,
};
pub use error::CanvasError;
pub use geometry::snap;
pub use node_view::{NodeIcon, NodeView};
pub use port_resolver::{AllInputs, PortChoice, PortResolution, PortResolver, TypeChecked};
pub use signals::{CanvasSignals, RepaintRequest};
pub use sync::SyncAdapter;
pub use ui::{translate_input, CanvasUi, FrameInput};
pub use view_state::ViewState;
