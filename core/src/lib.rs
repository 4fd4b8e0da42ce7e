#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Flow Board engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired board edits, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing the
//! outcome. Read access to the computed flow field goes through
//! [`FlowFieldView`] snapshots.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards the current board and builds a fresh one with the provided size.
    ConfigureBoard {
        /// Dimensions of the replacement board.
        size: BoardSize,
    },
    /// Flips the tile between empty ground and a destination.
    ToggleDestination {
        /// Tile targeted by the edit.
        tile: TileCoord,
    },
    /// Flips the tile between empty ground and a wall.
    ToggleWall {
        /// Tile targeted by the edit.
        tile: TileCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a board was built and seeded with its initial destination.
    BoardConfigured {
        /// Dimensions of the new board.
        size: BoardSize,
        /// Tile chosen as the sole initial destination.
        destination: TileCoord,
    },
    /// Confirms that a tile became a destination.
    DestinationAdded {
        /// Tile that became a destination.
        tile: TileCoord,
    },
    /// Confirms that a destination reverted to empty ground.
    DestinationRemoved {
        /// Tile that stopped being a destination.
        tile: TileCoord,
    },
    /// Confirms that a wall was placed on a tile.
    WallPlaced {
        /// Tile now covered by the wall.
        tile: TileCoord,
    },
    /// Confirms that a wall was removed from a tile.
    WallRemoved {
        /// Tile that reverted to empty ground.
        tile: TileCoord,
    },
    /// Reports that an edit was refused and the board left untouched.
    ToggleRejected {
        /// Tile targeted by the refused edit.
        tile: TileCoord,
        /// Specific reason the edit was refused.
        reason: ToggleRejection,
    },
    /// Reports that the flow field was rebuilt after a committed edit.
    FlowFieldRecomputed {
        /// Aggregate figures describing the rebuilt field.
        summary: FlowFieldSummary,
    },
}

/// Location of a single tile expressed as column and row coordinates.
///
/// Columns grow toward the east and rows grow toward the north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Dimensions of a board measured in whole tiles.
///
/// Both axes are strictly positive and the tile count fits in a `u32`, so a
/// value of this type always describes a board that can be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoardSize", into = "RawBoardSize")]
pub struct BoardSize {
    columns: u32,
    rows: u32,
}

impl BoardSize {
    /// Validates and creates a new board size.
    pub const fn new(columns: u32, rows: u32) -> Result<Self, BoardSizeError> {
        if columns == 0 {
            return Err(BoardSizeError::ZeroColumns);
        }
        if rows == 0 {
            return Err(BoardSizeError::ZeroRows);
        }
        let tiles = columns as u64 * rows as u64;
        if tiles >= u32::MAX as u64 {
            return Err(BoardSizeError::TooLarge { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of tiles on the board.
    #[must_use]
    pub const fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Reports whether the coordinate lies on the board.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.column() < self.columns && tile.row() < self.rows
    }

    /// Row-major storage index of the coordinate, if it lies on the board.
    #[must_use]
    pub fn index_of(&self, tile: TileCoord) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }
        let row = usize::try_from(tile.row()).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Coordinate stored at the provided row-major index.
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Option<TileCoord> {
        if index >= self.tile_count() {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(TileCoord::new(column, row))
    }
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawBoardSize {
    columns: u32,
    rows: u32,
}

impl TryFrom<RawBoardSize> for BoardSize {
    type Error = BoardSizeError;

    fn try_from(raw: RawBoardSize) -> Result<Self, Self::Error> {
        Self::new(raw.columns, raw.rows)
    }
}

impl From<BoardSize> for RawBoardSize {
    fn from(size: BoardSize) -> Self {
        Self {
            columns: size.columns,
            rows: size.rows,
        }
    }
}

/// Reasons a board size fails validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum BoardSizeError {
    /// The board must contain at least one column.
    #[error("board must have at least one column")]
    ZeroColumns,
    /// The board must contain at least one row.
    #[error("board must have at least one row")]
    ZeroRows,
    /// The tile count does not fit the flat tile index space.
    #[error("board of {columns}x{rows} tiles is too large")]
    TooLarge {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}

/// Cardinal directions linking neighboring tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward increasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward decreasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Stable slot used when storing per-direction data in arrays.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Direction leading from `from` to the orthogonally adjacent `to`.
    #[must_use]
    pub fn between(from: TileCoord, to: TileCoord) -> Option<Self> {
        if from.manhattan_distance(to) != 1 {
            return None;
        }

        if to.column() > from.column() {
            Some(Self::East)
        } else if to.column() < from.column() {
            Some(Self::West)
        } else if to.row() > from.row() {
            Some(Self::North)
        } else {
            Some(Self::South)
        }
    }
}

/// Kinds of content a tile may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileContentKind {
    /// Open ground that paths may cross.
    Empty,
    /// Root of the flow field; every path ends on one of these.
    Destination,
    /// Obstacle that blocks paths and never receives a direction.
    Wall,
}

impl TileContentKind {
    /// Reports whether the content prevents paths from crossing the tile.
    #[must_use]
    pub const fn blocks_path(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Handle identifying a content instance issued by a content source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(u32);

impl ContentId {
    /// Creates a new content identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Content instance placed on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileContent {
    id: ContentId,
    kind: TileContentKind,
}

impl TileContent {
    /// Creates a content handle of the provided kind.
    #[must_use]
    pub const fn new(id: ContentId, kind: TileContentKind) -> Self {
        Self { id, kind }
    }

    /// Identifier assigned by the issuing content source.
    #[must_use]
    pub const fn id(&self) -> ContentId {
        self.id
    }

    /// Kind of content carried by the handle.
    #[must_use]
    pub const fn kind(&self) -> TileContentKind {
        self.kind
    }
}

/// Reasons a tile edit may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum ToggleRejection {
    /// The coordinate lies outside the board.
    #[error("tile lies outside the board")]
    OutOfBounds,
    /// The tile carries content the edit cannot replace.
    #[error("tile is occupied by other content")]
    Occupied,
    /// Removing the destination would leave the board without any.
    #[error("the last destination cannot be removed")]
    LastDestination,
    /// Placing the wall would cut some tile off from every destination.
    #[error("the wall would strand part of the board")]
    WouldStrand,
}

/// Aggregate figures describing a successfully rebuilt flow field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowFieldSummary {
    /// Number of destination tiles seeding the search.
    pub destinations: u32,
    /// Number of tiles that received a path, destinations included.
    pub reached: u32,
    /// Largest hop distance found on the board.
    pub max_distance: u32,
}

/// Flow state captured for a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileFlow {
    /// Content kind carried by the tile.
    pub content: TileContentKind,
    /// Hop distance to the nearest destination, if the tile has a path.
    pub distance: Option<u32>,
    /// Direction of the neighbor one hop closer to a destination.
    pub next_hop: Option<Direction>,
}

impl TileFlow {
    /// Flow of an empty tile that no destination reaches.
    pub const UNREACHED: Self = Self {
        content: TileContentKind::Empty,
        distance: None,
        next_hop: None,
    };

    /// Reports whether the tile is connected to a destination.
    #[must_use]
    pub const fn has_path(&self) -> bool {
        self.distance.is_some()
    }
}

/// Read-only snapshot of the flow field covering the whole board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowFieldView {
    size: BoardSize,
    tiles: Vec<TileFlow>,
}

impl FlowFieldView {
    /// Creates a view from row-major tile flows.
    ///
    /// Returns `None` when the number of flows does not match the board size.
    #[must_use]
    pub fn new(size: BoardSize, tiles: Vec<TileFlow>) -> Option<Self> {
        (tiles.len() == size.tile_count()).then_some(Self { size, tiles })
    }

    /// Creates a view by capturing `flow` for every tile in row-major order.
    #[must_use]
    pub fn from_fn(size: BoardSize, flow: impl FnMut(TileCoord) -> TileFlow) -> Self {
        let tiles = (0..size.rows())
            .flat_map(|row| (0..size.columns()).map(move |column| TileCoord::new(column, row)))
            .map(flow)
            .collect();
        Self { size, tiles }
    }

    /// Dimensions of the captured board.
    #[must_use]
    pub const fn size(&self) -> BoardSize {
        self.size
    }

    /// Flow state captured for the tile, if it lies on the board.
    #[must_use]
    pub fn tile(&self, tile: TileCoord) -> Option<&TileFlow> {
        self.size
            .index_of(tile)
            .and_then(|index| self.tiles.get(index))
    }

    /// Iterator over every tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &TileFlow)> {
        let size = self.size;
        self.tiles.iter().enumerate().filter_map(move |(index, flow)| {
            size.coord_of(index).map(|coord| (coord, flow))
        })
    }
}
