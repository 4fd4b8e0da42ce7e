//! Tile arena and the single-step expansion primitive driven by the flow field search.

use flow_board_core::{Direction, TileContent, TileCoord};

const UNREACHED: u32 = u32::MAX;

/// Neighbor expansion orders indexed by the tile's alternative flag.
///
/// Both orders reach the same hop distances; they only differ in which of
/// several equally short routes a tile ends up pointing along.
const EXPANSION_ORDERS: [[Direction; 4]; 2] = [
    [
        Direction::West,
        Direction::East,
        Direction::South,
        Direction::North,
    ],
    [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ],
];

/// Single board tile with its links, content and path state.
#[derive(Clone, Debug)]
pub(crate) struct Tile {
    coord: TileCoord,
    links: [Option<usize>; 4],
    distance: u32,
    next_hop: Option<usize>,
    alternative: bool,
    content: TileContent,
    indicator: Option<Direction>,
}

impl Tile {
    /// Creates an unlinked tile with no path.
    pub(crate) fn new(coord: TileCoord, content: TileContent) -> Self {
        let even_column = coord.column() & 1 == 0;
        let even_row = coord.row() & 1 == 0;
        Self {
            coord,
            links: [None; 4],
            distance: UNREACHED,
            next_hop: None,
            alternative: even_column ^ even_row,
            content,
            indicator: None,
        }
    }

    pub(crate) fn coord(&self) -> TileCoord {
        self.coord
    }

    pub(crate) fn content(&self) -> TileContent {
        self.content
    }

    /// Swaps the tile content, returning the previous handle.
    pub(crate) fn replace_content(&mut self, content: TileContent) -> TileContent {
        std::mem::replace(&mut self.content, content)
    }

    pub(crate) fn neighbor(&self, direction: Direction) -> Option<usize> {
        self.links[direction.slot()]
    }

    pub(crate) fn is_alternative(&self) -> bool {
        self.alternative
    }

    /// Order in which the tile offers its neighbors to the frontier.
    pub(crate) fn expansion_order(&self) -> [Direction; 4] {
        EXPANSION_ORDERS[usize::from(self.alternative)]
    }

    pub(crate) fn clear_path(&mut self) {
        self.distance = UNREACHED;
        self.next_hop = None;
    }

    pub(crate) fn become_destination(&mut self) {
        self.distance = 0;
        self.next_hop = None;
    }

    pub(crate) fn has_path(&self) -> bool {
        self.distance != UNREACHED
    }

    pub(crate) fn distance(&self) -> Option<u32> {
        self.has_path().then_some(self.distance)
    }

    pub(crate) fn next_hop(&self) -> Option<usize> {
        self.next_hop
    }

    pub(crate) fn indicator(&self) -> Option<Direction> {
        self.indicator
    }

    /// Points the direction indicator at the next tile on the path.
    ///
    /// Destinations and tiles without a path carry no indicator.
    pub(crate) fn show_path(&mut self) {
        self.indicator = match self.next_hop {
            Some(hop) if self.distance != 0 => Direction::ALL
                .into_iter()
                .find(|direction| self.neighbor(*direction) == Some(hop)),
            _ => None,
        };
    }
}

/// Arena owning every tile of a board, linked through storage indices.
#[derive(Clone, Debug, Default)]
pub(crate) struct TileArena {
    tiles: Vec<Tile>,
}

impl TileArena {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            tiles: Vec::with_capacity(capacity),
        }
    }

    /// Appends a tile and returns its storage index.
    pub(crate) fn push(&mut self, tile: Tile) -> usize {
        self.tiles.push(tile);
        self.tiles.len() - 1
    }

    pub(crate) fn len(&self) -> usize {
        self.tiles.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(index)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    /// Removes every tile, yielding them in storage order.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = Tile> + '_ {
        self.tiles.drain(..)
    }

    /// Links two horizontally adjacent tiles. Each pair is wired exactly once.
    pub(crate) fn make_east_west_neighbors(&mut self, east: usize, west: usize) {
        self.link(west, Direction::East, east);
    }

    /// Links two vertically adjacent tiles. Each pair is wired exactly once.
    pub(crate) fn make_north_south_neighbors(&mut self, north: usize, south: usize) {
        self.link(south, Direction::North, north);
    }

    fn link(&mut self, from: usize, direction: Direction, to: usize) {
        if let Some(tile) = self.tiles.get_mut(from) {
            debug_assert!(tile.links[direction.slot()].is_none(), "tile linked twice");
            tile.links[direction.slot()] = Some(to);
        }
        if let Some(tile) = self.tiles.get_mut(to) {
            let back = direction.opposite();
            debug_assert!(tile.links[back.slot()].is_none(), "tile linked twice");
            tile.links[back.slot()] = Some(from);
        }
    }

    /// Extends the path of `from` onto `neighbor`.
    ///
    /// Returns the neighbor when it received its first path during this
    /// search, and `None` without touching anything when `from` has no path,
    /// the neighbor is missing, already reached, or blocks paths.
    pub(crate) fn grow_path_to(&mut self, from: usize, neighbor: Option<usize>) -> Option<usize> {
        let source = self.tiles.get(from)?;
        if !source.has_path() {
            return None;
        }
        let next_distance = source.distance + 1;

        let neighbor_index = neighbor?;
        let target = self.tiles.get_mut(neighbor_index)?;
        if target.has_path() || target.content.kind().blocks_path() {
            return None;
        }

        target.distance = next_distance;
        target.next_hop = Some(from);
        Some(neighbor_index)
    }

    pub(crate) fn grow_path_north(&mut self, from: usize) -> Option<usize> {
        let neighbor = self.tiles.get(from)?.neighbor(Direction::North);
        self.grow_path_to(from, neighbor)
    }

    pub(crate) fn grow_path_east(&mut self, from: usize) -> Option<usize> {
        let neighbor = self.tiles.get(from)?.neighbor(Direction::East);
        self.grow_path_to(from, neighbor)
    }

    pub(crate) fn grow_path_south(&mut self, from: usize) -> Option<usize> {
        let neighbor = self.tiles.get(from)?.neighbor(Direction::South);
        self.grow_path_to(from, neighbor)
    }

    pub(crate) fn grow_path_west(&mut self, from: usize) -> Option<usize> {
        let neighbor = self.tiles.get(from)?.neighbor(Direction::West);
        self.grow_path_to(from, neighbor)
    }

    pub(crate) fn grow_path(&mut self, from: usize, direction: Direction) -> Option<usize> {
        match direction {
            Direction::North => self.grow_path_north(from),
            Direction::East => self.grow_path_east(from),
            Direction::South => self.grow_path_south(from),
            Direction::West => self.grow_path_west(from),
        }
    }
}
