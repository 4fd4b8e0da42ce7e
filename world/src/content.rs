//! Content sources that issue the handles placed on tiles.

use flow_board_core::{ContentId, TileContent, TileContentKind};

/// Capability that hands out tile content and takes it back when replaced.
///
/// The world requests a fresh handle every time a tile changes content and
/// returns the displaced handle through [`ContentSource::reclaim`], so
/// implementations can pool or despawn whatever visuals back a handle.
pub trait ContentSource {
    /// Issues a new content handle of the requested kind.
    fn get(&mut self, kind: TileContentKind) -> TileContent;

    /// Accepts a handle that is no longer placed on any tile.
    fn reclaim(&mut self, _content: TileContent) {}
}

impl<S: ContentSource + ?Sized> ContentSource for Box<S> {
    fn get(&mut self, kind: TileContentKind) -> TileContent {
        (**self).get(kind)
    }

    fn reclaim(&mut self, content: TileContent) {
        (**self).reclaim(content);
    }
}

/// Default content source issuing sequential identifiers.
///
/// Tracks how many handles of each kind are currently placed, which makes
/// leaks visible to callers and tests.
#[derive(Clone, Debug, Default)]
pub struct ContentFactory {
    next_id: u32,
    live: [usize; 3],
}

impl ContentFactory {
    /// Creates an empty factory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            live: [0; 3],
        }
    }

    /// Number of issued handles of the kind that have not been reclaimed.
    #[must_use]
    pub fn live(&self, kind: TileContentKind) -> usize {
        self.live[slot(kind)]
    }

    /// Total number of handles issued since the factory was created.
    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.next_id
    }
}

impl ContentSource for ContentFactory {
    fn get(&mut self, kind: TileContentKind) -> TileContent {
        let id = ContentId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.live[slot(kind)] += 1;
        TileContent::new(id, kind)
    }

    fn reclaim(&mut self, content: TileContent) {
        let live = &mut self.live[slot(content.kind())];
        *live = live.saturating_sub(1);
    }
}

const fn slot(kind: TileContentKind) -> usize {
    match kind {
        TileContentKind::Empty => 0,
        TileContentKind::Destination => 1,
        TileContentKind::Wall => 2,
    }
}
