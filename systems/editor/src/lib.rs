#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure editing system that turns picked tiles into board edit commands.

use flow_board_core::{Command, Event, TileCoord, ToggleRejection};
use flow_board_world::Ray;

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct EditorInput {
    /// Indicates whether the player clicked the board on this frame.
    pub primary_action: bool,
    /// Indicates whether the destination modifier was held during the click.
    pub destination_modifier: bool,
    /// Ray cast from the camera through the cursor, if the cursor is over the view.
    pub cursor_ray: Option<Ray>,
}

impl EditorInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        primary_action: bool,
        destination_modifier: bool,
        cursor_ray: Option<Ray>,
    ) -> Self {
        Self {
            primary_action,
            destination_modifier,
            cursor_ray,
        }
    }
}

/// Outcome of the most recent edit, kept for presentation feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditFeedback {
    /// The last edit was committed.
    Committed {
        /// Tile changed by the edit.
        tile: TileCoord,
    },
    /// The last edit was refused by the world.
    Rejected {
        /// Tile targeted by the edit.
        tile: TileCoord,
        /// Reason reported by the world.
        reason: ToggleRejection,
    },
}

/// Editing system that translates picks and clicks into toggle commands.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    feedback: Option<EditFeedback>,
}

impl Editor {
    /// Creates a new editor system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { feedback: None }
    }

    /// Outcome of the most recent edit observed in the event stream.
    #[must_use]
    pub const fn feedback(&self) -> Option<EditFeedback> {
        self.feedback
    }

    /// Consumes world events and adapter-derived input to emit edit commands.
    ///
    /// The `pick` closure should mirror the semantics of the world's
    /// `query::tile_at_ray` helper so the system can identify the clicked tile.
    /// A plain click toggles a wall; a click with the destination modifier
    /// toggles a destination.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: EditorInput,
        mut pick: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(&Ray) -> Option<TileCoord>,
    {
        for event in events {
            match *event {
                Event::BoardConfigured { .. } => self.feedback = None,
                Event::DestinationAdded { tile }
                | Event::DestinationRemoved { tile }
                | Event::WallPlaced { tile }
                | Event::WallRemoved { tile } => {
                    self.feedback = Some(EditFeedback::Committed { tile });
                }
                Event::ToggleRejected { tile, reason } => {
                    self.feedback = Some(EditFeedback::Rejected { tile, reason });
                }
                Event::FlowFieldRecomputed { .. } => {}
            }
        }

        if !input.primary_action {
            return;
        }

        let Some(ray) = input.cursor_ray else {
            return;
        };
        let Some(tile) = pick(&ray) else {
            return;
        };

        if input.destination_modifier {
            out.push(Command::ToggleDestination { tile });
        } else {
            out.push(Command::ToggleWall { tile });
        }
    }
}
