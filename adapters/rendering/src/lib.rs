#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Flow Board adapters.
//!
//! Adapters turn a [`FlowFieldView`] into a [`Scene`] describing the ground
//! color of every tile and the arrow hovering above it, then hand the scene
//! to a [`RenderingBackend`].

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use flow_board_core::{BoardSize, Direction, FlowFieldView, TileContentKind, TileCoord};
use flow_board_world::tile_center;
use glam::{EulerRot, Quat, Vec3};

/// Height above the ground at which arrows are drawn.
const ARROW_ELEVATION: f32 = 0.001;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Ground color used for tiles carrying the provided content.
    #[must_use]
    pub const fn for_content(kind: TileContentKind) -> Self {
        match kind {
            TileContentKind::Empty => Self::from_rgb_u8(0x6b, 0x8e, 0x23),
            TileContentKind::Destination => Self::from_rgb_u8(0xff, 0xc1, 0x07),
            TileContentKind::Wall => Self::from_rgb_u8(0x5d, 0x5d, 0x5d),
        }
    }
}

/// Arrow drawn above a tile, pointing toward its next hop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowPresentation {
    /// Direction the arrow points in.
    pub direction: Direction,
    /// World-space anchor of the arrow.
    pub position: Vec3,
}

impl ArrowPresentation {
    /// Yaw around the vertical axis, with north at zero and east at ninety degrees.
    #[must_use]
    pub const fn yaw_degrees(&self) -> f32 {
        match self.direction {
            Direction::North => 0.0,
            Direction::East => 90.0,
            Direction::South => 180.0,
            Direction::West => 270.0,
        }
    }

    /// Orientation of a flat arrow mesh lying on the ground and turned to its yaw.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw_degrees().to_radians(),
            90_f32.to_radians(),
            0.0,
        )
    }
}

/// Presentation of a single tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Board coordinate of the tile.
    pub tile: TileCoord,
    /// Content kind that decides the ground color.
    pub content: TileContentKind,
    /// Ground color.
    pub color: Color,
    /// Hop distance to the nearest destination, if reachable.
    pub distance: Option<u32>,
    /// Arrow shown above the tile; hidden for destinations, walls and unreachable tiles.
    pub arrow: Option<ArrowPresentation>,
}

/// Everything a backend needs to draw one frame of the board.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Dimensions of the board.
    pub size: BoardSize,
    /// Tiles in row-major order.
    pub tiles: Vec<TilePresentation>,
}

impl Scene {
    /// Builds a scene from a flow field snapshot.
    #[must_use]
    pub fn from_flow_field(view: &FlowFieldView) -> Self {
        let size = view.size();
        let tiles = view
            .iter()
            .map(|(tile, flow)| TilePresentation {
                tile,
                content: flow.content,
                color: Color::for_content(flow.content),
                distance: flow.distance,
                arrow: flow.next_hop.map(|direction| ArrowPresentation {
                    direction,
                    position: tile_center(size, tile) + Vec3::Y * ARROW_ELEVATION,
                }),
            })
            .collect();
        Self { size, tiles }
    }

    /// Presentation of the tile, if it lies on the board.
    #[must_use]
    pub fn tile(&self, tile: TileCoord) -> Option<&TilePresentation> {
        self.size
            .index_of(tile)
            .and_then(|index| self.tiles.get(index))
    }
}

/// Rendering backend capable of presenting Flow Board scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Layout used when drawing the board as text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TextMode {
    /// One glyph per tile showing the arrow direction.
    #[default]
    Arrows,
    /// Right-aligned hop distances.
    Distances,
}

/// Renders the scene as text, northmost row first.
///
/// In arrow mode destinations are drawn as `@`, walls as `#`, unreachable
/// tiles as `?`, and every other tile as the arrow pointing to its next hop.
#[must_use]
pub fn render_text(scene: &Scene, mode: TextMode) -> String {
    let columns = scene.size.columns();
    let width = match mode {
        TextMode::Arrows => 1,
        TextMode::Distances => scene
            .tiles
            .iter()
            .filter_map(|tile| tile.distance)
            .max()
            .map_or(1, |max| max.to_string().len()),
    };

    let mut output = String::new();
    for row in (0..scene.size.rows()).rev() {
        let cells: Vec<String> = (0..columns)
            .filter_map(|column| scene.tile(TileCoord::new(column, row)))
            .map(|tile| format!("{:>width$}", glyph(tile, mode)))
            .collect();
        let separator = match mode {
            TextMode::Arrows => "",
            TextMode::Distances => " ",
        };
        output.push_str(&cells.join(separator));
        output.push('\n');
    }
    output
}

fn glyph(tile: &TilePresentation, mode: TextMode) -> String {
    match (tile.content, mode) {
        (TileContentKind::Wall, _) => "#".to_owned(),
        (_, TextMode::Distances) => tile
            .distance
            .map_or_else(|| "?".to_owned(), |distance| distance.to_string()),
        (TileContentKind::Destination, TextMode::Arrows) => "@".to_owned(),
        (TileContentKind::Empty, TextMode::Arrows) => match tile.arrow.map(|arrow| arrow.direction)
        {
            Some(Direction::North) => "^".to_owned(),
            Some(Direction::East) => ">".to_owned(),
            Some(Direction::South) => "v".to_owned(),
            Some(Direction::West) => "<".to_owned(),
            None => "?".to_owned(),
        },
    }
}

/// Backend that writes text renderings of each frame to a writer.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
    mode: TextMode,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing frames in the provided mode.
    #[must_use]
    pub const fn new(writer: W, mode: TextMode) -> Self {
        Self { writer, mode }
    }

    /// Consumes the backend, returning the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.writer
            .write_all(render_text(scene, self.mode).as_bytes())
            .context("failed to write text frame")?;
        self.writer.flush().context("failed to flush text frame")
    }
}
