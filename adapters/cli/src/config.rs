//! Board configuration loaded from TOML files and merged with command-line flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use flow_board_core::{BoardSize, TileCoord};
use serde::Deserialize;

const DEFAULT_COLUMNS: u32 = 11;
const DEFAULT_ROWS: u32 = 11;

/// Board size and initial edits applied before rendering.
///
/// ```toml
/// columns = 9
/// rows = 7
/// destinations = [{ column = 0, row = 0 }]
/// walls = [{ column = 4, row = 3 }]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BoardConfig {
    /// Number of tile columns; defaults to eleven.
    pub(crate) columns: Option<u32>,
    /// Number of tile rows; defaults to eleven.
    pub(crate) rows: Option<u32>,
    /// Tiles toggled as destinations, in order.
    pub(crate) destinations: Vec<TileCoord>,
    /// Tiles toggled as walls, in order, after the destinations.
    pub(crate) walls: Vec<TileCoord>,
}

impl BoardConfig {
    /// Loads a configuration file from disk.
    pub(crate) fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read board config at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to parse board config at {}", path.display()))
    }

    /// Parses a configuration from TOML text.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid board config toml")
    }

    /// Layers `overrides` on top of this configuration.
    ///
    /// Dimensions from `overrides` win when present; edits are appended.
    #[must_use]
    pub(crate) fn merge(mut self, overrides: BoardConfig) -> Self {
        self.columns = overrides.columns.or(self.columns);
        self.rows = overrides.rows.or(self.rows);
        self.destinations.extend(overrides.destinations);
        self.walls.extend(overrides.walls);
        self
    }

    /// Validated board size, falling back to the defaults for missing axes.
    pub(crate) fn board_size(&self) -> Result<BoardSize> {
        let columns = self.columns.unwrap_or(DEFAULT_COLUMNS);
        let rows = self.rows.unwrap_or(DEFAULT_ROWS);
        BoardSize::new(columns, rows).with_context(|| format!("invalid board size {columns}x{rows}"))
    }
}
