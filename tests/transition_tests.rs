mod common;

use bloxorz::transition::{apply_triggers, check_auto_merge, compute_raw_displacement, validate};
use bloxorz::{step, Action, BlockState, BridgeSnapshot, Orientation, Rejected};
use common::{board, p, reachable_states};

#[test]
fn test_standing_left_lays_down() {
    let board = board("ggg ooo PPP");
    let start = board.initial_state().clone();
    assert_eq!(start.cells, [p(2, 0), p(2, 0)]);

    let next = step(&board, &start, Action::Left).unwrap();
    assert_eq!(next.cells, [p(0, 0), p(1, 0)]);
    assert_eq!(next.orientation(), Orientation::LayingX);
    assert!(!next.is_goal(&board));
}

#[test]
fn test_roll_past_edge_is_rejected() {
    let board = board("ggg ooo PPP");
    let laying = step(&board, board.initial_state(), Action::Left).unwrap();
    assert_eq!(step(&board, &laying, Action::Left), Err(Rejected::OutOfBounds));
}

#[test]
fn test_roll_onto_goal_merges() {
    let board = board("ggg ooo ooo PPP");
    let laying = step(&board, board.initial_state(), Action::Left).unwrap();
    assert_eq!(laying.cells, [p(1, 0), p(2, 0)]);

    let standing = step(&board, &laying, Action::Left).unwrap();
    assert_eq!(standing.cells, [p(0, 0), p(0, 0)]);
    assert_eq!(standing.orientation(), Orientation::Standing);
    assert!(standing.is_goal(&board));
}

#[test]
fn test_laying_on_goal_is_not_a_win() {
    let board = board("PPP ooo ggg ggg");
    let laying = step(&board, board.initial_state(), Action::Right).unwrap();
    assert_eq!(laying.cells, [p(1, 0), p(2, 0)]);
    assert!(!laying.is_goal(&board));
}

#[test]
fn test_every_direction_from_standing() {
    let board = board("--- --- ooo --- ---\n--- --- ooo --- ---\nooo ooo PPP ooo ooo\n--- --- ooo --- ---\n--- --- ooo --- ---");
    let start = board.initial_state();

    assert_eq!(step(&board, start, Action::Up).unwrap().cells, [p(2, 0), p(2, 1)]);
    assert_eq!(step(&board, start, Action::Down).unwrap().cells, [p(2, 3), p(2, 4)]);
    assert_eq!(step(&board, start, Action::Left).unwrap().cells, [p(0, 2), p(1, 2)]);
    assert_eq!(step(&board, start, Action::Right).unwrap().cells, [p(3, 2), p(4, 2)]);
}

#[test]
fn test_hole_rejects_move() {
    let board = board("PPP --- ooo");
    assert_eq!(step(&board, board.initial_state(), Action::Right), Err(Rejected::NoFloor));
}

#[test]
fn test_swap_requires_detached_block() {
    let board = board("ooo PPP ooo");
    assert_eq!(step(&board, board.initial_state(), Action::Swap), Err(Rejected::SwapNotDetached));
    assert_eq!(compute_raw_displacement([p(1, 0), p(1, 0)], Action::Swap), Err(Rejected::SwapNotDetached));
}

#[test]
fn test_heavy_switch_toggles_bridge_when_standing() {
    let board = board("S11 ooo ooo PPP\nooo ooo ooo b01");
    let start = board.initial_state().clone();
    assert!(!start.bridges.is_on(1, 0));

    let s1 = step(&board, &start, Action::Left).unwrap();
    assert_eq!(s1.cells, [p(1, 0), p(2, 0)]);
    assert!(!s1.bridges.is_on(1, 0));

    let s2 = step(&board, &s1, Action::Left).unwrap();
    assert_eq!(s2.cells, [p(0, 0), p(0, 0)]);
    assert!(s2.bridges.is_on(1, 0));

    let s3 = step(&board, &s2, Action::Right).unwrap();
    assert_eq!(s3.cells, [p(1, 0), p(2, 0)]);
    assert!(s3.bridges.is_on(1, 0));

    let s4 = step(&board, &s3, Action::Left).unwrap();
    assert_eq!(s4.cells, [p(0, 0), p(0, 0)]);
    assert!(!s4.bridges.is_on(1, 0));
}

#[test]
fn test_soft_switch_pressed_by_laying_block() {
    let board = board("PPP ooo s01 ooo\n--- b01 --- ---");
    let next = step(&board, board.initial_state(), Action::Right).unwrap();
    assert_eq!(next.cells, [p(1, 0), p(2, 0)]);
    assert!(next.bridges.is_on(1, 0));
}

#[test]
fn test_heavy_switch_ignores_laying_block() {
    let board = board("PPP ooo S01 ooo\n--- b01 --- ---");
    let laying = step(&board, board.initial_state(), Action::Right).unwrap();
    assert!(!laying.bridges.is_on(1, 0));

    let standing = step(&board, &laying, Action::Right).unwrap();
    assert_eq!(standing.cells, [p(3, 0), p(3, 0)]);
    assert!(!standing.bridges.is_on(1, 0));
}

#[test]
fn test_bridge_state_decides_traversal() {
    let board = board("PPP ooo\n--- b01\n--- b01");
    let snapshot = board.initial_state().bridges.clone();
    assert!(!board.is_traversable_floor(1, 1, &snapshot));

    let on = board.apply_bridge_effect(&snapshot, 1, bloxorz::tile::SwitchMode::TurnOn);
    assert!(board.is_traversable_floor(1, 1, &on));
    assert!(board.is_traversable_floor(1, 2, &on));
    assert_eq!(on.bridge(1), &[true, true]);
    // the input snapshot is untouched
    assert_eq!(snapshot.bridge(1), &[false, false]);
}

#[test]
fn test_teleporter_splits_block() {
    let board = board("PPP ooo ooo t1t --- t10 ooo ooo\n--- --- --- --- --- --- --- t11");
    let s1 = step(&board, board.initial_state(), Action::Right).unwrap();
    assert_eq!(s1.cells, [p(1, 0), p(2, 0)]);

    let s2 = step(&board, &s1, Action::Right).unwrap();
    assert_eq!(s2.cells, [p(5, 0), p(7, 1)]);
    assert_eq!(s2.orientation(), Orientation::Detached);

    let s3 = step(&board, &s2, Action::Right).unwrap();
    assert_eq!(s3.cells, [p(6, 0), p(7, 1)]);

    let s4 = step(&board, &s3, Action::Right).unwrap();
    assert_eq!(s4.cells, [p(7, 0), p(7, 1)]);
    assert_eq!(s4.orientation(), Orientation::LayingY);
}

#[test]
fn test_swap_changes_controlled_cube() {
    let board = board("PPP ooo ooo t1t --- t10 ooo ooo\n--- --- --- --- --- --- --- t11");
    let mut state = board.initial_state().clone();
    for action in [Action::Right, Action::Right] {
        state = step(&board, &state, action).unwrap();
    }
    assert_eq!(state.cells, [p(5, 0), p(7, 1)]);

    let swapped = step(&board, &state, Action::Swap).unwrap();
    assert_eq!(swapped.cells, [p(7, 1), p(5, 0)]);
    assert_eq!(swapped.bridges, state.bridges);

    let moved = step(&board, &swapped, Action::Up).unwrap();
    assert_eq!(moved.cells, [p(7, 0), p(5, 0)]);
}

#[test]
fn test_detached_block_presses_only_controlled_cell() {
    let board = board(
        "PPP ooo ooo t1t --- t10 ooo s01\n\
         --- --- --- --- --- --- --- ---\n\
         b01 --- --- --- --- --- --- t11s01",
    );
    let mut state = board.initial_state().clone();
    for action in [Action::Right, Action::Right] {
        state = step(&board, &state, action).unwrap();
    }
    // second half landed on the soft switch without pressing it
    assert_eq!(state.cells, [p(5, 0), p(7, 2)]);
    assert!(!state.bridges.is_on(1, 0));

    let s1 = step(&board, &state, Action::Right).unwrap();
    assert_eq!(s1.cells, [p(6, 0), p(7, 2)]);
    assert!(!s1.bridges.is_on(1, 0));

    let s2 = step(&board, &s1, Action::Right).unwrap();
    assert_eq!(s2.cells, [p(7, 0), p(7, 2)]);
    assert_eq!(s2.orientation(), Orientation::Detached);
    assert!(s2.bridges.is_on(1, 0));
}

#[test]
fn test_stacked_teleport_and_switch_both_fire() {
    let board = board("PPP ooo ooo t1tS11 --- t10 ooo\nb01 --- --- --- --- --- t11");
    let laying = step(&board, board.initial_state(), Action::Right).unwrap();
    let split = step(&board, &laying, Action::Right).unwrap();

    assert_eq!(split.cells, [p(5, 0), p(6, 1)]);
    assert!(split.bridges.is_on(1, 0));
}

#[test]
fn test_teleport_onto_raised_bridge_is_rejected() {
    let board = board("PPP ooo ooo t1t --- b01t10 ooo\n--- --- --- --- --- --- t11");
    let laying = step(&board, board.initial_state(), Action::Right).unwrap();
    assert_eq!(step(&board, &laying, Action::Right), Err(Rejected::NoFloor));
}

#[test]
fn test_teleport_onto_bridge_lowered_by_same_cell() {
    let board = board("PPP ooo ooo t1tS01 --- b01t10 ooo\n--- --- --- --- --- --- t11");
    let laying = step(&board, board.initial_state(), Action::Right).unwrap();
    let split = step(&board, &laying, Action::Right).unwrap();

    assert_eq!(split.cells, [p(5, 0), p(6, 1)]);
    assert!(board.is_traversable_floor(5, 0, &split.bridges));
}

#[test]
fn test_soft_floor_holds_laying_block() {
    let board = board("PPP ooo iii ooo");
    let laying = step(&board, board.initial_state(), Action::Right).unwrap();
    assert_eq!(laying.cells, [p(1, 0), p(2, 0)]);

    let standing = step(&board, &laying, Action::Right).unwrap();
    assert_eq!(standing.cells, [p(3, 0), p(3, 0)]);
}

#[test]
fn test_soft_floor_breaks_under_standing_block() {
    let board = board("PPP ooo ooo iii");
    let laying = step(&board, board.initial_state(), Action::Right).unwrap();
    assert_eq!(step(&board, &laying, Action::Right), Err(Rejected::SoftFloorBroke));
}

#[test]
fn test_auto_merge_orders_laying_cells() {
    assert_eq!(check_auto_merge([p(2, 0), p(1, 0)]), [p(1, 0), p(2, 0)]);
    assert_eq!(check_auto_merge([p(0, 3), p(0, 2)]), [p(0, 2), p(0, 3)]);
    assert_eq!(check_auto_merge([p(1, 0), p(2, 0)]), [p(1, 0), p(2, 0)]);
    // detached cells keep their order
    assert_eq!(check_auto_merge([p(4, 0), p(1, 0)]), [p(4, 0), p(1, 0)]);
}

#[test]
fn test_validate_and_triggers_are_separate() {
    let board = board("PPP ooo s01 ooo\n--- b01 --- ---");
    let snapshot = board.initial_state().bridges.clone();
    let cells = [p(1, 0), p(2, 0)];

    assert_eq!(validate(&board, &cells, &snapshot), Ok(()));
    assert_eq!(validate(&board, &[p(1, 1), p(1, 1)], &snapshot), Err(Rejected::NoFloor));

    let (after, bridges) = apply_triggers(&board, cells, snapshot.clone());
    assert!(!snapshot.is_on(1, 0));
    assert_eq!(after, cells);
    assert!(bridges.is_on(1, 0));
}

#[test]
fn test_step_is_pure() {
    let board = board("S11 ooo ooo PPP\nooo ooo ooo b01");
    let start = board.initial_state().clone();
    let a = step(&board, &start, Action::Left).unwrap();
    let b = step(&board, &start, Action::Left).unwrap();
    assert_eq!(a, b);
    assert_eq!(&start, board.initial_state());
}

#[test]
fn test_every_reachable_state_is_valid() {
    let levels = [
        "PPP ooo ooo iii\n--- ooo ooo ooo",
        "S11 ooo ooo PPP\nooo ooo ooo b01",
        "PPP ooo ooo t1t --- t10 ooo ooo\n--- --- --- --- --- --- --- t11",
        "PPP ooo s01 ooo\n--- b01 --- ggg",
        "PPP ooo ooo t1t --- b01t10 ooo\n--- --- --- --- --- --- t11",
        "PPP ooo ooo t1tS11 --- b01t10 ooo\n--- --- --- --- --- iii t11",
    ];

    for text in levels {
        let board = board(text);
        for state in reachable_states(&board) {
            for cell in state.cells {
                assert!(board.is_in_bounds(cell.x, cell.y), "{:?} out of bounds in\n{}", cell, text);
                assert!(board.is_traversable_floor(cell.x, cell.y, &state.bridges), "{:?} off floor in\n{}", cell, text);
            }
            if state.orientation() == Orientation::Standing {
                let at = state.cells[0];
                assert!(!board.is_soft_floor(at.x, at.y), "standing on soft floor at {:?}", at);
            }
        }
    }
}

#[test]
fn test_states_with_different_bridges_are_distinct() {
    let board = board("S11 ooo ooo PPP\nooo ooo ooo b01");
    let off = board.initial_state().bridges.clone();
    let on = board.apply_bridge_effect(&off, 1, bloxorz::tile::SwitchMode::TurnOn);

    let a = BlockState::standing(p(0, 0), off.clone());
    let b = BlockState::standing(p(0, 0), on);
    assert_ne!(a, b);
    assert_eq!(a, BlockState::new([p(0, 0), p(0, 0)], off));
    assert_ne!(BlockState::new([p(1, 0), p(2, 0)], BridgeSnapshot::new()), BlockState::new([p(2, 0), p(1, 0)], BridgeSnapshot::new()));
}
