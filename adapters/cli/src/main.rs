#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that builds a Flow Board, applies edits and prints the flow field.

mod config;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flow_board_core::{Command, TileCoord};
use flow_board_rendering::{RenderingBackend, Scene, TextBackend, TextMode};
use flow_board_system_editor::{EditFeedback, Editor, EditorInput};
use flow_board_world::{self as world, query, Ray, World};
use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::BoardConfig;

const DEFAULT_LOG_FILTER: &str = "warn,flow_board_world=info";

/// Command-line arguments accepted by the `flow-board` binary.
#[derive(Debug, Parser)]
#[command(name = "flow-board", about = "Builds a flow field and prints it as text")]
struct CliArgs {
    /// TOML file describing the board size and initial edits.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of tile columns, overriding the config file.
    #[arg(long)]
    columns: Option<u32>,
    /// Number of tile rows, overriding the config file.
    #[arg(long)]
    rows: Option<u32>,
    /// Toggles a destination at `COLUMN,ROW`. May be repeated.
    #[arg(long = "destination", value_name = "COLUMN,ROW", value_parser = parse_tile)]
    destinations: Vec<TileCoord>,
    /// Toggles a wall at `COLUMN,ROW`. May be repeated.
    #[arg(long = "wall", value_name = "COLUMN,ROW", value_parser = parse_tile)]
    walls: Vec<TileCoord>,
    /// Clicks the board along a ray `OX,OY,OZ:DX,DY,DZ`, toggling a wall. May be repeated.
    #[arg(long = "pick", value_name = "RAY", value_parser = parse_ray)]
    wall_picks: Vec<Ray>,
    /// Clicks the board along a ray with the destination modifier held. May be repeated.
    #[arg(long = "pick-destination", value_name = "RAY", value_parser = parse_ray)]
    destination_picks: Vec<Ray>,
    /// Text layout used for the printed board.
    #[arg(long, value_enum, default_value_t = ModeArg::Arrows)]
    mode: ModeArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Arrows,
    Distances,
}

impl From<ModeArg> for TextMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Arrows => TextMode::Arrows,
            ModeArg::Distances => TextMode::Distances,
        }
    }
}

impl CliArgs {
    fn board_config(&self) -> Result<BoardConfig> {
        let file = match &self.config {
            Some(path) => BoardConfig::load(path)?,
            None => BoardConfig::default(),
        };
        Ok(file.merge(BoardConfig {
            columns: self.columns,
            rows: self.rows,
            destinations: self.destinations.clone(),
            walls: self.walls.clone(),
        }))
    }
}

/// Entry point for the Flow Board command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let config = args.board_config()?;
    let size = config.board_size()?;

    let mut world = World::new(size);
    let mut events = Vec::new();

    for tile in &config.destinations {
        world::apply(
            &mut world,
            Command::ToggleDestination { tile: *tile },
            &mut events,
        );
    }
    for tile in &config.walls {
        world::apply(&mut world, Command::ToggleWall { tile: *tile }, &mut events);
    }

    let mut editor = Editor::new();
    let picks = args
        .wall_picks
        .iter()
        .map(|ray| (false, *ray))
        .chain(args.destination_picks.iter().map(|ray| (true, *ray)));
    for (destination_modifier, ray) in picks {
        let mut commands = Vec::new();
        editor.handle(
            &events,
            EditorInput::new(true, destination_modifier, Some(ray)),
            |ray| query::tile_at_ray(&world, ray),
            &mut commands,
        );
        events.clear();
        if commands.is_empty() {
            info!(origin = ?ray.origin(), direction = ?ray.direction(), "pick missed the board");
        }
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }
    editor.handle(&events, EditorInput::default(), |_| None, &mut Vec::new());
    report_feedback(editor.feedback());

    let scene = Scene::from_flow_field(&query::flow_field(&world));
    TextBackend::new(io::stdout(), args.mode.into())
        .present(&scene)
        .context("failed to print board")?;

    let summary = query::summary(&world);
    println!(
        "destinations: {}  reached: {}/{}  longest path: {}",
        summary.destinations,
        summary.reached,
        size.tile_count(),
        summary.max_distance
    );
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn report_feedback(feedback: Option<EditFeedback>) {
    match feedback {
        Some(EditFeedback::Committed { tile }) => {
            info!(column = tile.column(), row = tile.row(), "last pick committed");
        }
        Some(EditFeedback::Rejected { tile, reason }) => {
            info!(column = tile.column(), row = tile.row(), %reason, "last pick rejected");
        }
        None => {}
    }
}

fn parse_tile(value: &str) -> Result<TileCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected COLUMN,ROW but got `{value}`"))?;
    let column = column
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid column `{column}`: {error}"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid row `{row}`: {error}"))?;
    Ok(TileCoord::new(column, row))
}

fn parse_ray(value: &str) -> Result<Ray, String> {
    let (origin, direction) = value
        .split_once(':')
        .ok_or_else(|| format!("expected OX,OY,OZ:DX,DY,DZ but got `{value}`"))?;
    Ok(Ray::new(parse_vec3(origin)?, parse_vec3(direction)?))
}

fn parse_vec3(value: &str) -> Result<Vec3, String> {
    let components = value
        .split(',')
        .map(|component| {
            component
                .trim()
                .parse::<f32>()
                .map_err(|error| format!("invalid component `{component}`: {error}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match components.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected three components but got `{value}`")),
    }
}
