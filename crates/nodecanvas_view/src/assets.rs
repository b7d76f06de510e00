// SPDX-License-Identifier: MIT OR Apache-2.0
//! Process-wide icon table.
//!
//! Decoding images is the host's job; the canvas only needs stable handles
//! to refer to them. The table is built once, either explicitly with
//! [`install`] at startup or lazily with the built-in entries on first use,
//! and is read-only afterwards.

use indexmap::IndexMap;
use std::sync::OnceLock;

/// Name of the fallback icon
pub const GENERIC_ICON: &str = "generic";

/// Built-in overlays drawn around every node
pub const BUILTIN_ICONS: &[&str] = &[
    GENERIC_ICON,
    "node-mask",
    "node-glow",
    "node-connection-glow",
    "node-in-port",
    "node-out-port",
    "node-error",
    "node-rendered",
    "node-codechanged",
    "node-rim",
];

static ASSET_TABLE: OnceLock<AssetTable> = OnceLock::new();

/// Handle to an image owned by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconAsset {
    /// Lookup name
    pub name: String,
    /// Pixel size
    pub size: [u32; 2],
}

/// Read-only table of icons by name
#[derive(Debug, Clone)]
pub struct AssetTable {
    icons: IndexMap<String, IconAsset>,
}

impl AssetTable {
    /// Create a table holding only the built-in icons
    pub fn builtin() -> Self {
        let icons = BUILTIN_ICONS
            .iter()
            .map(|name| {
                let asset = IconAsset {
                    name: (*name).to_string(),
                    size: [70, 70],
                };
                ((*name).to_string(), asset)
            })
            .collect();
        Self { icons }
    }

    /// Add or replace an icon
    pub fn with_icon(mut self, name: impl Into<String>, size: [u32; 2]) -> Self {
        let name = name.into();
        self.icons.insert(name.clone(), IconAsset { name, size });
        self
    }

    /// Look up an icon by name
    pub fn lookup(&self, name: &str) -> Option<&IconAsset> {
        self.icons.get(name)
    }

    /// Get the generic fallback icon
    pub fn generic(&self) -> &IconAsset {
        self.icons.get(GENERIC_ICON).unwrap_or(&FALLBACK)
    }

    /// Resolve a node's image, falling back to the generic icon
    pub fn icon_for(&self, image: Option<&str>) -> &IconAsset {
        match image {
            Some(name) if !name.is_empty() => self.lookup(name).unwrap_or_else(|| {
                tracing::debug!("No icon named {:?}, using generic", name);
                self.generic()
            }),
            _ => self.generic(),
        }
    }

    /// Get the number of icons
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl Default for AssetTable {
    fn default() -> Self {
        Self::builtin()
    }
}

static FALLBACK: IconAsset = IconAsset {
    name: String::new(),
    size: [0, 0],
};

/// Install the process-wide table
///
/// Fails, handing the table back, if a table was already installed or
/// lazily created.
pub fn install(table: AssetTable) -> Result<(), AssetTable> {
    ASSET_TABLE.set(table)
}

/// Get the process-wide table, creating the built-in one if needed
pub fn asset_table() -> &'static AssetTable {
    ASSET_TABLE.get_or_init(AssetTable::builtin)
}
