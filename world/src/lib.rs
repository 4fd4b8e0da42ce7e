#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Flow Board.
//!
//! The [`World`] owns a rectangular arena of tiles and keeps a breadth-first
//! flow field over it: every tile that is not a wall knows its hop distance
//! to the nearest destination and which neighbor to step onto next. Edits go
//! through [`apply`] (or the matching methods on [`World`]) and are either
//! committed together with a rebuilt field or rolled back entirely.

mod content;
mod picking;
mod tile;

use std::collections::VecDeque;

use flow_board_core::{
    BoardSize, Command, Event, FlowFieldSummary, TileContentKind, TileCoord, ToggleRejection,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub use content::{ContentFactory, ContentSource};
pub use picking::{tile_at_ray, tile_center, Ray};

use tile::{Tile, TileArena};

const DEFAULT_BOARD_SIZE: BoardSize = match BoardSize::new(11, 11) {
    Ok(size) => size,
    Err(_) => panic!("default board size must be valid"),
};

/// Reasons a flow field rebuild cannot be committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum FlowFieldError {
    /// No tile is a destination, so the search has no roots.
    #[error("the board has no destination")]
    NoDestinations,
    /// A tile that paths may cross is cut off from every destination.
    #[error("tile ({}, {}) cannot reach any destination", .tile.column(), .tile.row())]
    Stranded {
        /// First unreachable tile in storage order.
        tile: TileCoord,
    },
}

impl FlowFieldError {
    fn rejection(self) -> ToggleRejection {
        match self {
            Self::NoDestinations => ToggleRejection::LastDestination,
            Self::Stranded { .. } => ToggleRejection::WouldStrand,
        }
    }
}

/// Represents the authoritative board and its flow field.
#[derive(Debug)]
pub struct World<S = ContentFactory> {
    size: BoardSize,
    tiles: TileArena,
    frontier: VecDeque<usize>,
    content_source: S,
    summary: FlowFieldSummary,
}

impl World<ContentFactory> {
    /// Creates a board of the provided size backed by the default content factory.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self::with_content_source(size, ContentFactory::new())
    }
}

impl Default for World<ContentFactory> {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}

impl<S: ContentSource> World<S> {
    /// Creates a board whose tile content is issued by `content_source`.
    ///
    /// Every tile starts empty except the center tile, which becomes the sole
    /// destination, and the flow field is computed before returning.
    #[must_use]
    pub fn with_content_source(size: BoardSize, content_source: S) -> Self {
        let mut world = Self {
            size,
            tiles: TileArena::default(),
            frontier: VecDeque::new(),
            content_source,
            summary: FlowFieldSummary {
                destinations: 0,
                reached: 0,
                max_distance: 0,
            },
        };
        let _ = world.initialize(size);
        world
    }

    /// Dimensions of the board.
    #[must_use]
    pub const fn size(&self) -> BoardSize {
        self.size
    }

    /// Content source backing the tiles.
    #[must_use]
    pub const fn content_source(&self) -> &S {
        &self.content_source
    }

    /// Figures describing the most recently committed flow field.
    #[must_use]
    pub const fn summary(&self) -> FlowFieldSummary {
        self.summary
    }

    /// Discards every tile and rebuilds the board with the provided size.
    ///
    /// Returns the tile chosen as the initial destination.
    pub fn resize(&mut self, size: BoardSize) -> TileCoord {
        self.initialize(size)
    }

    fn initialize(&mut self, size: BoardSize) -> TileCoord {
        self.release_tiles();
        self.size = size;

        let columns = size.columns();
        let width = columns as usize;
        let mut tiles = TileArena::with_capacity(size.tile_count());
        for row in 0..size.rows() {
            for column in 0..columns {
                let content = self.content_source.get(TileContentKind::Empty);
                let index = tiles.push(Tile::new(TileCoord::new(column, row), content));
                if column > 0 {
                    tiles.make_east_west_neighbors(index, index - 1);
                }
                if row > 0 {
                    tiles.make_north_south_neighbors(index, index - width);
                }
            }
        }
        self.tiles = tiles;

        let destination_index = self.tiles.len() / 2;
        self.replace_content(destination_index, TileContentKind::Destination);
        let destination = self
            .tiles
            .get(destination_index)
            .map(Tile::coord)
            .unwrap_or(TileCoord::new(0, 0));

        info!(
            columns = size.columns(),
            rows = size.rows(),
            destination.column = destination.column(),
            destination.row = destination.row(),
            "configured board"
        );

        if let Err(error) = self.recompute_flow_field() {
            error!(%error, "freshly configured board has no valid flow field");
        }
        destination
    }

    fn release_tiles(&mut self) {
        let mut tiles = std::mem::take(&mut self.tiles);
        for tile in tiles.drain() {
            self.content_source.reclaim(tile.content());
        }
        self.frontier.clear();
    }

    fn replace_content(&mut self, index: usize, kind: TileContentKind) {
        let content = self.content_source.get(kind);
        match self.tiles.get_mut(index) {
            Some(tile) => {
                let previous = tile.replace_content(content);
                self.content_source.reclaim(previous);
            }
            None => self.content_source.reclaim(content),
        }
    }

    /// Rebuilds distances and next hops for every tile.
    ///
    /// Destinations seed a first-in first-out frontier; each dequeued tile
    /// offers its neighbors in its own expansion order, and every neighbor
    /// reached for the first time joins the frontier. The field is rejected
    /// when there is no destination or when a non-wall tile stays unreached.
    /// A rejected field leaves path state partially written, so callers
    /// restore the previous content and recompute again.
    pub fn recompute_flow_field(&mut self) -> Result<FlowFieldSummary, FlowFieldError> {
        self.frontier.clear();

        for (index, tile) in self.tiles.iter_mut().enumerate() {
            if tile.content().kind() == TileContentKind::Destination {
                tile.become_destination();
                self.frontier.push_back(index);
            } else {
                tile.clear_path();
            }
        }

        if self.frontier.is_empty() {
            return Err(FlowFieldError::NoDestinations);
        }
        let destinations = self.frontier.len();

        while let Some(index) = self.frontier.pop_front() {
            let Some(order) = self.tiles.get(index).map(Tile::expansion_order) else {
                continue;
            };
            for direction in order {
                if let Some(reached) = self.tiles.grow_path(index, direction) {
                    self.frontier.push_back(reached);
                }
            }
        }

        if let Some(stranded) = self
            .tiles
            .iter()
            .find(|tile| !tile.has_path() && !tile.content().kind().blocks_path())
        {
            return Err(FlowFieldError::Stranded {
                tile: stranded.coord(),
            });
        }

        let mut reached = 0_u32;
        let mut max_distance = 0_u32;
        for tile in self.tiles.iter_mut() {
            tile.show_path();
            if let Some(distance) = tile.distance() {
                reached += 1;
                max_distance = max_distance.max(distance);
            }
        }

        self.summary = FlowFieldSummary {
            destinations: u32::try_from(destinations).unwrap_or(u32::MAX),
            reached,
            max_distance,
        };
        debug!(
            destinations = self.summary.destinations,
            reached, max_distance, "recomputed flow field"
        );
        Ok(self.summary)
    }

    /// Flips the tile between empty ground and a destination.
    ///
    /// Returns the tile's new content kind. Removing a destination is rolled
    /// back when the remaining field would be invalid, which always happens
    /// for the last destination.
    pub fn toggle_destination(
        &mut self,
        tile: TileCoord,
    ) -> Result<TileContentKind, ToggleRejection> {
        let index = self.index_of(tile)?;
        match self.kind_at(index) {
            TileContentKind::Destination => {
                self.replace_content(index, TileContentKind::Empty);
                if let Err(error) = self.recompute_flow_field() {
                    self.replace_content(index, TileContentKind::Destination);
                    self.restore_flow_field();
                    return Err(error.rejection());
                }
                Ok(TileContentKind::Empty)
            }
            TileContentKind::Empty => {
                self.replace_content(index, TileContentKind::Destination);
                self.restore_flow_field();
                Ok(TileContentKind::Destination)
            }
            TileContentKind::Wall => Err(ToggleRejection::Occupied),
        }
    }

    /// Flips the tile between empty ground and a wall.
    ///
    /// Returns the tile's new content kind. Either edit is rolled back when
    /// it would leave an open tile cut off from every destination; removing
    /// a wall boxed in by other walls opens such a tile.
    pub fn toggle_wall(&mut self, tile: TileCoord) -> Result<TileContentKind, ToggleRejection> {
        let index = self.index_of(tile)?;
        match self.kind_at(index) {
            TileContentKind::Wall => {
                self.replace_content(index, TileContentKind::Empty);
                if let Err(error) = self.recompute_flow_field() {
                    self.replace_content(index, TileContentKind::Wall);
                    self.restore_flow_field();
                    return Err(error.rejection());
                }
                Ok(TileContentKind::Empty)
            }
            TileContentKind::Empty => {
                self.replace_content(index, TileContentKind::Wall);
                if let Err(error) = self.recompute_flow_field() {
                    self.replace_content(index, TileContentKind::Empty);
                    self.restore_flow_field();
                    return Err(error.rejection());
                }
                Ok(TileContentKind::Wall)
            }
            TileContentKind::Destination => Err(ToggleRejection::Occupied),
        }
    }

    /// Tile struck by the world-space ray, if it lands on the board.
    #[must_use]
    pub fn tile_at_ray(&self, ray: &Ray) -> Option<TileCoord> {
        tile_at_ray(self.size, ray)
    }

    fn restore_flow_field(&mut self) {
        if let Err(error) = self.recompute_flow_field() {
            error!(%error, "previously valid board failed to rebuild its flow field");
        }
    }

    fn index_of(&self, tile: TileCoord) -> Result<usize, ToggleRejection> {
        self.size
            .index_of(tile)
            .filter(|index| *index < self.tiles.len())
            .ok_or(ToggleRejection::OutOfBounds)
    }

    fn kind_at(&self, index: usize) -> TileContentKind {
        self.tiles
            .get(index)
            .map_or(TileContentKind::Empty, |tile| tile.content().kind())
    }

    fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.size
            .index_of(coord)
            .and_then(|index| self.tiles.get(index))
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply<S: ContentSource>(world: &mut World<S>, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard { size } => {
            let destination = world.resize(size);
            out_events.push(Event::BoardConfigured { size, destination });
            out_events.push(Event::FlowFieldRecomputed {
                summary: world.summary(),
            });
        }
        Command::ToggleDestination { tile } => match world.toggle_destination(tile) {
            Ok(TileContentKind::Destination) => {
                out_events.push(Event::DestinationAdded { tile });
                out_events.push(Event::FlowFieldRecomputed {
                    summary: world.summary(),
                });
            }
            Ok(_) => {
                out_events.push(Event::DestinationRemoved { tile });
                out_events.push(Event::FlowFieldRecomputed {
                    summary: world.summary(),
                });
            }
            Err(reason) => reject(tile, reason, out_events),
        },
        Command::ToggleWall { tile } => match world.toggle_wall(tile) {
            Ok(TileContentKind::Wall) => {
                out_events.push(Event::WallPlaced { tile });
                out_events.push(Event::FlowFieldRecomputed {
                    summary: world.summary(),
                });
            }
            Ok(_) => {
                out_events.push(Event::WallRemoved { tile });
                out_events.push(Event::FlowFieldRecomputed {
                    summary: world.summary(),
                });
            }
            Err(reason) => reject(tile, reason, out_events),
        },
    }
}

fn reject(tile: TileCoord, reason: ToggleRejection, out_events: &mut Vec<Event>) {
    warn!(
        column = tile.column(),
        row = tile.row(),
        %reason,
        "rejected board edit"
    );
    out_events.push(Event::ToggleRejected { tile, reason });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use flow_board_core::{
        BoardSize, Direction, FlowFieldSummary, FlowFieldView, TileContent, TileContentKind,
        TileCoord, TileFlow,
    };

    use super::{tile::Tile, ContentSource, Ray, World};

    /// Dimensions of the board.
    #[must_use]
    pub fn size<S: ContentSource>(world: &World<S>) -> BoardSize {
        world.size()
    }

    /// Figures describing the most recently committed flow field.
    #[must_use]
    pub fn summary<S: ContentSource>(world: &World<S>) -> FlowFieldSummary {
        world.summary()
    }

    /// Captures the flow state of every tile in row-major order.
    #[must_use]
    pub fn flow_field<S: ContentSource>(world: &World<S>) -> FlowFieldView {
        FlowFieldView::from_fn(world.size, |coord| {
            world.tile(coord).map_or(TileFlow::UNREACHED, flow_of)
        })
    }

    /// Flow state of a single tile, if it lies on the board.
    #[must_use]
    pub fn tile_flow<S: ContentSource>(world: &World<S>, tile: TileCoord) -> Option<TileFlow> {
        world.tile(tile).map(flow_of)
    }

    /// Content handle placed on the tile, if it lies on the board.
    #[must_use]
    pub fn content<S: ContentSource>(world: &World<S>, tile: TileCoord) -> Option<TileContent> {
        world.tile(tile).map(Tile::content)
    }

    /// Every destination tile in row-major order.
    #[must_use]
    pub fn destinations<S: ContentSource>(world: &World<S>) -> Vec<TileCoord> {
        world
            .tiles
            .iter()
            .filter(|tile| tile.content().kind() == TileContentKind::Destination)
            .map(Tile::coord)
            .collect()
    }

    /// Neighbor linked to the tile in the provided direction.
    #[must_use]
    pub fn neighbor<S: ContentSource>(
        world: &World<S>,
        tile: TileCoord,
        direction: Direction,
    ) -> Option<TileCoord> {
        let index = world.tile(tile)?.neighbor(direction)?;
        world.tiles.get(index).map(Tile::coord)
    }

    /// Reports whether the tile expands its neighbors in the alternative order.
    #[must_use]
    pub fn is_alternative<S: ContentSource>(world: &World<S>, tile: TileCoord) -> Option<bool> {
        world.tile(tile).map(Tile::is_alternative)
    }

    /// Tile one hop closer to a destination, if the tile has one.
    #[must_use]
    pub fn next_tile_on_path<S: ContentSource>(
        world: &World<S>,
        tile: TileCoord,
    ) -> Option<TileCoord> {
        let index = world.tile(tile)?.next_hop()?;
        world.tiles.get(index).map(Tile::coord)
    }

    /// Tiles visited when following next hops from `start` to a destination.
    ///
    /// The path begins with `start` and ends on a destination. It is empty
    /// when `start` lies off the board or has no path.
    #[must_use]
    pub fn path_from<S: ContentSource>(world: &World<S>, start: TileCoord) -> Vec<TileCoord> {
        let Some(tile) = world.tile(start) else {
            return Vec::new();
        };
        if !tile.has_path() {
            return Vec::new();
        }

        let mut path = vec![start];
        let mut current = start;
        while let Some(next) = next_tile_on_path(world, current) {
            path.push(next);
            current = next;
        }
        path
    }

    /// Tile struck by the world-space ray, if it lands on the board.
    #[must_use]
    pub fn tile_at_ray<S: ContentSource>(world: &World<S>, ray: &Ray) -> Option<TileCoord> {
        world.tile_at_ray(ray)
    }

    fn flow_of(tile: &Tile) -> TileFlow {
        TileFlow {
            content: tile.content().kind(),
            distance: tile.distance(),
            next_hop: tile.indicator(),
        }
    }
}
