use flow_board_core::{
    BoardSize, Command, Direction, Event, FlowFieldView, TileContentKind, TileCoord,
    ToggleRejection,
};
use flow_board_world::{self as world, query, World};

fn board(columns: u32, rows: u32) -> World {
    World::new(BoardSize::new(columns, rows).expect("valid board size"))
}

fn neighbor_coord(tile: TileCoord, direction: Direction) -> TileCoord {
    match direction {
        Direction::North => TileCoord::new(tile.column(), tile.row() + 1),
        Direction::East => TileCoord::new(tile.column() + 1, tile.row()),
        Direction::South => TileCoord::new(tile.column(), tile.row() - 1),
        Direction::West => TileCoord::new(tile.column() - 1, tile.row()),
    }
}

fn assert_valid_field(view: &FlowFieldView) {
    for (coord, flow) in view.iter() {
        match flow.content {
            TileContentKind::Wall => {
                assert!(!flow.has_path(), "wall at {coord:?} must not carry a path");
                assert_eq!(flow.next_hop, None);
            }
            TileContentKind::Destination => {
                assert_eq!(flow.distance, Some(0), "destination at {coord:?}");
                assert_eq!(flow.next_hop, None, "destination at {coord:?}");
            }
            TileContentKind::Empty => {
                let distance = flow.distance.expect("every open tile must be reachable");
                let direction = flow.next_hop.expect("open tiles point somewhere");
                let parent = view
                    .tile(neighbor_coord(coord, direction))
                    .expect("next hop lies on the board");
                assert_eq!(
                    parent.distance.map(|d| d + 1),
                    Some(distance),
                    "tile {coord:?} must be one hop further than its next hop",
                );
            }
        }
    }
}

#[test]
fn three_by_three_scenario() {
    let world = board(3, 3);
    let view = query::flow_field(&world);
    let center = TileCoord::new(1, 1);

    assert_eq!(query::destinations(&world), vec![center]);
    for (coord, flow) in view.iter() {
        assert!(flow.has_path(), "tile {coord:?} must be reachable");
        assert_eq!(flow.distance, Some(coord.manhattan_distance(center)));
    }

    for corner in [
        TileCoord::new(0, 0),
        TileCoord::new(2, 0),
        TileCoord::new(0, 2),
        TileCoord::new(2, 2),
    ] {
        let next = query::next_tile_on_path(&world, corner).expect("corner has a next hop");
        assert_eq!(
            query::tile_flow(&world, next).and_then(|flow| flow.distance),
            Some(1),
            "corner {corner:?} must point at a distance-one neighbor",
        );
        assert_eq!(corner.manhattan_distance(next), 1);
    }
}

#[test]
fn five_by_five_distances_grow_from_center() {
    let world = board(5, 5);
    let view = query::flow_field(&world);
    let center = TileCoord::new(2, 2);

    assert_eq!(query::destinations(&world), vec![center]);
    for direction in Direction::ALL {
        let adjacent = neighbor_coord(center, direction);
        assert_eq!(view.tile(adjacent).and_then(|flow| flow.distance), Some(1));
    }
    for corner in [
        TileCoord::new(0, 0),
        TileCoord::new(4, 0),
        TileCoord::new(0, 4),
        TileCoord::new(4, 4),
    ] {
        assert_eq!(view.tile(corner).and_then(|flow| flow.distance), Some(4));
    }
    assert_eq!(world.summary().max_distance, 4);
    assert_valid_field(&view);
}

#[test]
fn neighbor_wiring_matches_board_edges() {
    let world = board(3, 3);
    let linked = |tile: TileCoord| -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| query::neighbor(&world, tile, *direction).is_some())
            .collect()
    };

    assert_eq!(linked(TileCoord::new(1, 1)).len(), 4);
    assert_eq!(
        linked(TileCoord::new(0, 0)),
        vec![Direction::North, Direction::East]
    );
    assert_eq!(
        linked(TileCoord::new(2, 2)),
        vec![Direction::South, Direction::West]
    );
    assert_eq!(
        query::neighbor(&world, TileCoord::new(0, 0), Direction::North),
        Some(TileCoord::new(0, 1))
    );
    assert_eq!(
        query::neighbor(&world, TileCoord::new(0, 0), Direction::East),
        Some(TileCoord::new(1, 0))
    );
}

#[test]
fn alternative_pattern_is_a_checkerboard() {
    let world = board(4, 4);
    for row in 0..4 {
        for column in 0..4 {
            let expected = (column + row) % 2 == 1;
            assert_eq!(
                query::is_alternative(&world, TileCoord::new(column, row)),
                Some(expected),
                "tile ({column}, {row})",
            );
        }
    }
}

#[test]
fn alternating_order_varies_tie_breaks() {
    let world = board(7, 7);
    let view = query::flow_field(&world);
    let mut directions = std::collections::HashSet::new();
    for (coord, flow) in view.iter() {
        if coord.column() != 3 && coord.row() != 3 {
            if let Some(direction) = flow.next_hop {
                let _ = directions.insert(direction);
            }
        }
    }
    assert_eq!(
        directions.len(),
        4,
        "off-axis tiles should not all funnel along a single axis"
    );
}

#[test]
fn recompute_is_idempotent() {
    let mut world = board(6, 5);
    let _ = world.toggle_destination(TileCoord::new(0, 0));
    let _ = world.toggle_wall(TileCoord::new(3, 3));
    let before = query::flow_field(&world);

    let first = world.recompute_flow_field().expect("valid field");
    let second = world.recompute_flow_field().expect("valid field");

    assert_eq!(first, second);
    assert_eq!(query::flow_field(&world), before);
}

#[test]
fn removing_last_destination_rolls_back() {
    let mut world = board(3, 3);
    let center = TileCoord::new(1, 1);
    let before = query::flow_field(&world);

    assert_eq!(
        world.toggle_destination(center),
        Err(ToggleRejection::LastDestination)
    );
    assert_eq!(query::destinations(&world), vec![center]);
    assert_eq!(query::flow_field(&world), before);
}

#[test]
fn removing_one_of_two_destinations_commits() {
    let mut world = board(5, 1);
    let corner = TileCoord::new(0, 0);

    assert_eq!(
        world.toggle_destination(corner),
        Ok(TileContentKind::Destination)
    );
    assert_eq!(
        query::tile_flow(&world, TileCoord::new(1, 0)).and_then(|flow| flow.distance),
        Some(1)
    );

    assert_eq!(world.toggle_destination(corner), Ok(TileContentKind::Empty));
    assert_eq!(query::destinations(&world), vec![TileCoord::new(2, 0)]);
    assert_eq!(
        query::tile_flow(&world, corner).and_then(|flow| flow.distance),
        Some(2)
    );
}

#[test]
fn multiple_destinations_split_the_field() {
    let mut world = board(9, 1);
    let _ = world.toggle_destination(TileCoord::new(0, 0));
    let _ = world.toggle_destination(TileCoord::new(8, 0));
    let view = query::flow_field(&world);

    assert_eq!(
        view.tile(TileCoord::new(1, 0)).and_then(|flow| flow.next_hop),
        Some(Direction::West)
    );
    assert_eq!(
        view.tile(TileCoord::new(7, 0)).and_then(|flow| flow.next_hop),
        Some(Direction::East)
    );
    assert_eq!(world.summary().destinations, 3);
    assert_eq!(world.summary().max_distance, 2);
    assert_valid_field(&view);
}

#[test]
fn walls_divert_paths() {
    let mut world = board(5, 5);
    let wall = TileCoord::new(2, 1);

    assert_eq!(world.toggle_wall(wall), Ok(TileContentKind::Wall));
    let view = query::flow_field(&world);
    assert!(!view.tile(wall).expect("wall tile").has_path());
    assert_eq!(
        view.tile(TileCoord::new(2, 0)).and_then(|flow| flow.distance),
        Some(4),
        "the tile behind the wall must walk around it",
    );
    assert_valid_field(&view);

    assert_eq!(world.toggle_wall(wall), Ok(TileContentKind::Empty));
    assert_eq!(
        query::tile_flow(&world, TileCoord::new(2, 0)).and_then(|flow| flow.distance),
        Some(2)
    );
}

#[test]
fn stranding_walls_are_rejected() {
    let mut world = board(3, 3);
    assert_eq!(world.toggle_wall(TileCoord::new(1, 0)), Ok(TileContentKind::Wall));
    let before = query::flow_field(&world);

    assert_eq!(
        world.toggle_wall(TileCoord::new(0, 1)),
        Err(ToggleRejection::WouldStrand),
        "walling (0, 1) would cut off corner (0, 0)",
    );
    assert_eq!(query::flow_field(&world), before);
    assert_eq!(
        query::content(&world, TileCoord::new(0, 1)).map(|content| content.kind()),
        Some(TileContentKind::Empty)
    );
}

#[test]
fn enclosed_wall_cannot_be_removed() {
    let mut world = board(3, 3);
    let corner = TileCoord::new(0, 0);
    assert_eq!(world.toggle_wall(corner), Ok(TileContentKind::Wall));
    assert_eq!(world.toggle_wall(TileCoord::new(1, 0)), Ok(TileContentKind::Wall));
    assert_eq!(world.toggle_wall(TileCoord::new(0, 1)), Ok(TileContentKind::Wall));
    let before = query::flow_field(&world);
    let summary = query::summary(&world);

    assert_eq!(
        world.toggle_wall(corner),
        Err(ToggleRejection::WouldStrand),
        "opening the corner would leave it boxed in by walls",
    );
    assert_eq!(query::flow_field(&world), before);
    assert_eq!(query::summary(&world), summary);
    assert_eq!(
        query::content(&world, corner).map(|content| content.kind()),
        Some(TileContentKind::Wall)
    );

    assert_eq!(
        world.toggle_wall(TileCoord::new(2, 2)),
        Ok(TileContentKind::Wall),
        "unrelated edits still commit after the rejected removal",
    );
    assert_valid_field(&query::flow_field(&world));

    assert_eq!(world.toggle_wall(TileCoord::new(1, 0)), Ok(TileContentKind::Empty));
    assert_eq!(world.toggle_wall(corner), Ok(TileContentKind::Empty));
    assert_valid_field(&query::flow_field(&world));
}

#[test]
fn occupied_tiles_reject_the_other_toggle() {
    let mut world = board(3, 3);
    assert_eq!(
        world.toggle_wall(TileCoord::new(1, 1)),
        Err(ToggleRejection::Occupied)
    );

    let _ = world.toggle_wall(TileCoord::new(0, 0));
    assert_eq!(
        world.toggle_destination(TileCoord::new(0, 0)),
        Err(ToggleRejection::Occupied)
    );
}

#[test]
fn enclosed_destination_cannot_be_removed() {
    let mut world = board(5, 5);
    let corner = TileCoord::new(0, 0);
    let _ = world.toggle_destination(corner);
    assert_eq!(world.toggle_wall(TileCoord::new(1, 0)), Ok(TileContentKind::Wall));
    assert_eq!(world.toggle_wall(TileCoord::new(0, 1)), Ok(TileContentKind::Wall));

    assert_eq!(
        world.toggle_destination(corner),
        Err(ToggleRejection::WouldStrand)
    );
    assert!(query::destinations(&world).contains(&corner));
}

#[test]
fn paths_end_on_destinations() {
    let mut world = board(6, 4);
    let _ = world.toggle_wall(TileCoord::new(2, 2));
    let _ = world.toggle_wall(TileCoord::new(3, 2));
    let destinations = query::destinations(&world);

    let start = TileCoord::new(5, 3);
    let path = query::path_from(&world, start);
    let distance = query::tile_flow(&world, start).and_then(|flow| flow.distance);

    assert_eq!(path.first(), Some(&start));
    assert!(destinations.contains(path.last().expect("non-empty path")));
    assert_eq!(Some(path.len() as u32 - 1), distance);
    for step in path.windows(2) {
        assert_eq!(step[0].manhattan_distance(step[1]), 1);
    }
    assert!(query::path_from(&world, TileCoord::new(2, 2)).is_empty());
    assert!(query::path_from(&world, TileCoord::new(9, 9)).is_empty());
}

#[test]
fn content_handles_are_returned_to_the_source() {
    let mut world = board(4, 4);
    let _ = world.toggle_wall(TileCoord::new(0, 0));
    let _ = world.toggle_wall(TileCoord::new(0, 0));
    assert_eq!(
        world.toggle_destination(TileCoord::new(3, 3)),
        Ok(TileContentKind::Destination)
    );
    assert_eq!(
        world.toggle_destination(TileCoord::new(0, 2)),
        Ok(TileContentKind::Empty)
    );
    assert_eq!(
        world.toggle_destination(TileCoord::new(3, 3)),
        Err(ToggleRejection::LastDestination)
    );

    let factory = world.content_source();
    assert_eq!(factory.live(TileContentKind::Wall), 0);
    assert_eq!(factory.live(TileContentKind::Destination), 1);
    assert_eq!(factory.live(TileContentKind::Empty), 15);
}

#[test]
fn apply_broadcasts_committed_and_rejected_edits() {
    let mut world = board(3, 3);
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::ToggleDestination {
            tile: TileCoord::new(0, 0),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::ToggleWall {
            tile: TileCoord::new(1, 1),
        },
        &mut events,
    );

    assert_eq!(events.len(), 3);
    assert_eq!(
        events[0],
        Event::DestinationAdded {
            tile: TileCoord::new(0, 0)
        }
    );
    assert!(matches!(
        events[1],
        Event::FlowFieldRecomputed { summary } if summary.destinations == 2
    ));
    assert_eq!(
        events[2],
        Event::ToggleRejected {
            tile: TileCoord::new(1, 1),
            reason: ToggleRejection::Occupied,
        }
    );
}

#[test]
fn configure_board_reinitializes_everything() {
    let mut world = board(3, 3);
    let _ = world.toggle_wall(TileCoord::new(0, 0));
    let mut events = Vec::new();
    let size = BoardSize::new(4, 2).expect("valid board size");

    world::apply(&mut world, Command::ConfigureBoard { size }, &mut events);

    assert_eq!(
        events[0],
        Event::BoardConfigured {
            size,
            destination: TileCoord::new(0, 1),
        }
    );
    assert_eq!(query::size(&world), size);
    assert_eq!(query::destinations(&world), vec![TileCoord::new(0, 1)]);
    assert_eq!(
        query::content(&world, TileCoord::new(0, 0)).map(|content| content.kind()),
        Some(TileContentKind::Empty)
    );
    assert_valid_field(&query::flow_field(&world));
}

#[test]
fn random_edit_sequences_keep_the_field_valid() {
    let mut world = board(8, 6);
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    for _ in 0..400 {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let column = ((state >> 33) % 8) as u32;
        let row = ((state >> 17) % 6) as u32;
        let tile = TileCoord::new(column, row);
        if state & 1 == 0 {
            let _ = world.toggle_wall(tile);
        } else {
            let _ = world.toggle_destination(tile);
        }

        assert!(!query::destinations(&world).is_empty());
        assert_valid_field(&query::flow_field(&world));
    }
}
