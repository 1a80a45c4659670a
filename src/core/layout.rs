//! Text grid layouts
//!
//! A layout is a list of rows where `.` is walkable and `#` is blocked.
//! Row 0 is grid y = 0. Layouts can be stored in RON or JSON next to level
//! data and stamped onto a [`NavGrid`] whenever obstacles are rebuilt.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::NavGrid;

const WALKABLE: char = '.';
const BLOCKED: char = '#';

/// Walkability layout described as text rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    /// One string per grid row
    pub rows: Vec<String>,
}

impl GridLayout {
    /// Parse a layout from multi-line text (blank lines and surrounding whitespace are ignored)
    ///
    /// # Errors
    ///
    /// Returns an error for rows of different lengths or unknown tile characters
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let rows: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        let layout = Self { rows };
        layout.check()?;
        Ok(layout)
    }

    /// Capture the walkability of a grid
    #[must_use]
    pub fn from_grid(grid: &NavGrid) -> Self {
        let rows = (0..grid.height() as i32)
            .map(|y| {
                (0..grid.width() as i32)
                    .map(|x| if grid.is_walkable(x, y) { WALKABLE } else { BLOCKED })
                    .collect::<String>()
            })
            .collect();
        Self { rows }
    }

    /// Width in tiles
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.chars().count())
    }

    /// Height in tiles
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    fn check(&self) -> Result<(), LayoutError> {
        let width = self.width();
        for (y, row) in self.rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(LayoutError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            if let Some((x, tile)) = row
                .chars()
                .enumerate()
                .find(|&(_, c)| c != WALKABLE && c != BLOCKED)
            {
                return Err(LayoutError::UnknownTile { row: y, col: x, tile });
            }
        }
        Ok(())
    }

    /// Build a new grid with this layout
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is malformed
    pub fn to_grid(&self, tile_size: f32) -> Result<NavGrid, LayoutError> {
        let mut grid = NavGrid::new(self.width(), self.height(), tile_size);
        self.apply(&mut grid)?;
        Ok(grid)
    }

    /// Stamp this layout onto an existing grid of the same size
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is malformed or its size differs from the grid
    pub fn apply(&self, grid: &mut NavGrid) -> Result<(), LayoutError> {
        self.check()?;
        if self.width() != grid.width() || self.height() != grid.height() {
            return Err(LayoutError::SizeMismatch {
                layout: (self.width(), self.height()),
                grid: (grid.width(), grid.height()),
            });
        }

        for (y, row) in self.rows.iter().enumerate() {
            for (x, tile) in row.chars().enumerate() {
                grid.set_walkable(x as i32, y as i32, tile == WALKABLE);
            }
        }

        log::debug!(
            "Applied {}x{} layout, {} walkable tiles",
            self.width(),
            self.height(),
            grid.walkable_count()
        );
        Ok(())
    }

    /// Save the layout to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| LayoutError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| LayoutError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a layout from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or is malformed
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let content = fs::read_to_string(path).map_err(|e| LayoutError::IoError(e.to_string()))?;
        let layout: Self =
            ron::from_str(&content).map_err(|e| LayoutError::DeserializeError(e.to_string()))?;
        layout.check()?;
        Ok(layout)
    }

    /// Save the layout to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| LayoutError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a layout from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or is malformed
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let content = fs::read_to_string(path).map_err(|e| LayoutError::IoError(e.to_string()))?;
        let layout: Self = serde_json::from_str(&content)
            .map_err(|e| LayoutError::DeserializeError(e.to_string()))?;
        layout.check()?;
        Ok(layout)
    }
}

/// Errors that can occur while reading a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// File system error
    IoError(String),
    /// Error serializing data
    SerializeError(String),
    /// Error deserializing data
    DeserializeError(String),
    /// A row whose length differs from the first row
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character that is neither `.` nor `#`
    UnknownTile { row: usize, col: usize, tile: char },
    /// Layout and grid dimensions differ
    SizeMismatch {
        layout: (usize, usize),
        grid: (usize, usize),
    },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialize error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialize error: {e}"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "Row {row} has {found} tiles, expected {expected}"),
            Self::UnknownTile { row, col, tile } => {
                write!(f, "Unknown tile {tile:?} at row {row}, column {col}")
            }
            Self::SizeMismatch { layout, grid } => write!(
                f,
                "Layout is {}x{} but grid is {}x{}",
                layout.0, layout.1, grid.0, grid.1
            ),
        }
    }
}

impl std::error::Error for LayoutError {}
