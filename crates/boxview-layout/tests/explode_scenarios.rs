#![forbid(unsafe_code)]

//! End-to-end explode/unexplode scenarios against an in-memory viewer.
//!
//! Run:
//!   cargo test -p boxview-layout --test explode_scenarios

use std::cell::RefCell;
use std::rc::Rc;

use boxview_harness::{CellContent, GridSnapshot, TestViewer};
use boxview_layout::{
    ExplodeConfig, ExplodeRegistry, GridError, IgnoreReason, ImageGrid, Transition,
};
use boxview_runtime::MementoCmd;

/// A fresh viewer with test logging installed.
fn new_viewer(rows: usize, cols: usize, displays: usize) -> TestViewer {
    boxview_core::logging::init_test_logging();
    TestViewer::new(rows, cols, displays)
}

fn sets(names: &[&str]) -> Vec<Option<String>> {
    names.iter().map(|n| Some((*n).to_string())).collect()
}

// ============================================================================
// Explode
// ============================================================================

#[test]
fn explodes_two_most_recent_of_three() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1, 2]).unwrap();
    assert!(viewer.is_enabled());

    let outcome = viewer.toggle().unwrap();

    assert_eq!(outcome, Transition::Exploded { cells: 2 });
    assert_eq!(viewer.grid.borrow().layout(), (1, 2));
    assert_eq!(viewer.display_sets(), sets(&["s1", "s2"]));
    assert!(viewer.is_checked());
    assert!(viewer.state_is_consistent());

    let history = viewer.history.borrow();
    assert_eq!(history.undo_depth(), 1);
    assert_eq!(history.labels().first().copied(), Some("Explode"));
}

#[test]
fn explode_keeps_touch_order_left_to_right() {
    let viewer = new_viewer(2, 2, 4);
    viewer.touch_all(&[0, 1, 2]).unwrap();

    assert_eq!(viewer.toggle().unwrap(), Transition::Exploded { cells: 3 });
    assert_eq!(viewer.display_sets(), sets(&["s0", "s1", "s2"]));
}

#[test]
fn retouching_moves_cell_to_the_end() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1, 2, 0]).unwrap();

    viewer.toggle().unwrap();
    assert_eq!(viewer.display_sets(), sets(&["s2", "s0"]));
}

#[test]
fn output_is_bounded_by_history() {
    let viewer = new_viewer(2, 3, 4);
    viewer.touch_all(&[4, 5]).unwrap();

    assert_eq!(viewer.toggle().unwrap(), Transition::Exploded { cells: 2 });
    assert_eq!(viewer.display_sets(), sets(&["s4", "s5"]));
}

#[test]
fn explode_selects_default_cell_and_redraws() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 3]).unwrap();
    let redraws = viewer.grid.borrow().redraw_count();

    viewer.toggle().unwrap();

    let grid = viewer.grid.borrow();
    assert_eq!(grid.selected_cell(), grid.cells().first().copied());
    assert_eq!(grid.redraw_count(), redraws + 1);
}

#[test]
fn ineligible_history_entries_are_skipped() {
    let viewer = new_viewer(2, 2, 3);
    viewer.touch_all(&[0, 1, 2]).unwrap();
    let first = viewer.cell(0);
    viewer.grid.borrow_mut().clear_content(first).unwrap();

    assert_eq!(viewer.toggle().unwrap(), Transition::Exploded { cells: 2 });
    assert_eq!(viewer.display_sets(), sets(&["s1", "s2"]));
}

#[test]
fn touches_while_exploded_are_not_remembered() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    viewer.toggle().unwrap();

    viewer.touch(1).unwrap();
    let controller = viewer.controller.borrow();
    assert_eq!(controller.recency().len(), 2);
    assert!(controller.recency().iter().all(|cell| cell != viewer.cell(1)));
}

// ============================================================================
// Unexplode
// ============================================================================

#[test]
fn toggle_twice_restores_layout() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1, 2]).unwrap();
    let original = viewer.grid.borrow().create_snapshot();

    viewer.toggle().unwrap();
    assert_eq!(viewer.toggle().unwrap(), Transition::Unexploded);

    assert_eq!(viewer.grid.borrow().create_snapshot(), original);
    assert!(!viewer.is_checked());
    assert!(viewer.state_is_consistent());
    assert_eq!(viewer.history.borrow().labels(), vec!["Explode", "Explode"]);
}

#[test]
fn round_trip_keeps_every_display_set() {
    let viewer = new_viewer(3, 3, 3);
    viewer.touch_all(&[8, 0, 4]).unwrap();
    let before = viewer.display_sets();

    viewer.toggle().unwrap();
    viewer.toggle().unwrap();

    assert_eq!(viewer.display_sets(), before);
    assert_eq!(viewer.grid.borrow().layout(), (3, 3));
}

#[test]
fn content_changed_while_exploded_is_carried_home() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1, 2]).unwrap();
    viewer.toggle().unwrap();

    // Second exploded cell stands in for cell 2.
    let stand_in = viewer.cell(1);
    viewer
        .grid
        .borrow_mut()
        .set_display_set(stand_in, Some("mr-9"))
        .unwrap();

    assert_eq!(viewer.toggle().unwrap(), Transition::Unexploded);
    assert_eq!(viewer.display_sets(), sets(&["s0", "s1", "mr-9", "s3"]));
}

#[test]
fn history_survives_a_round_trip() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    viewer.toggle().unwrap();
    viewer.toggle().unwrap();

    assert_eq!(viewer.controller.borrow().recency().len(), 2);
    assert_eq!(viewer.toggle().unwrap(), Transition::Exploded { cells: 2 });
}

#[test]
fn invalidated_layout_cancels_instead_of_restoring() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    viewer.toggle().unwrap();

    let selected = viewer.grid.borrow().selected_cell().unwrap();
    viewer.grid.borrow_mut().clear_content(selected).unwrap();

    assert_eq!(viewer.toggle().unwrap(), Transition::Cancelled);
    assert!(!viewer.is_checked());
    assert!(viewer.state_is_consistent());
    assert_eq!(viewer.grid.borrow().layout(), (1, 2));
    assert_eq!(viewer.history.borrow().undo_depth(), 1);
}

#[test]
fn can_unexplode_cancels_invalidated_layout() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    viewer.toggle().unwrap();
    assert!(viewer.controller.borrow_mut().can_unexplode());

    let selected = viewer.grid.borrow().selected_cell().unwrap();
    viewer.grid.borrow_mut().clear_content(selected).unwrap();

    assert!(!viewer.controller.borrow_mut().can_unexplode());
    assert!(!viewer.is_checked());
    assert!(viewer.state_is_consistent());
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn external_reshape_cancels_explode_mode() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    viewer.toggle().unwrap();

    let notified = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&notified);
    let _sub = viewer
        .controller
        .borrow()
        .checked()
        .subscribe(move |checked| sink.borrow_mut().push(*checked));

    viewer.grid.borrow_mut().reshape(3, 3).unwrap();

    assert!(!viewer.is_checked());
    assert!(viewer.controller.borrow().identity().is_empty());
    assert!(viewer.state_is_consistent());
    assert_eq!(*notified.borrow(), vec![false]);
    assert_eq!(viewer.grid.borrow().layout(), (3, 3));
}

#[test]
fn stale_history_after_external_reshape_is_dropped() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    viewer.grid.borrow_mut().reshape(2, 2).unwrap();

    for index in 0..4 {
        let cell = viewer.cell(index);
        viewer
            .grid
            .borrow_mut()
            .load(cell, CellContent::showing("ct", "ct-1"))
            .unwrap();
    }
    viewer.touch(3).unwrap();

    assert_eq!(viewer.toggle().unwrap(), Transition::Exploded { cells: 1 });
}

// ============================================================================
// Enablement
// ============================================================================

#[test]
fn locked_grid_disables_toggle() {
    let viewer = new_viewer(2, 2, 2);
    viewer.grid.borrow_mut().set_locked(true);
    viewer.touch_all(&[0, 1, 2]).unwrap();
    let original = viewer.grid.borrow().create_snapshot();

    assert!(!viewer.is_enabled());
    assert_eq!(
        viewer.toggle().unwrap(),
        Transition::Ignored(IgnoreReason::Disabled)
    );
    assert_eq!(viewer.grid.borrow().create_snapshot(), original);
    assert_eq!(viewer.history.borrow().undo_depth(), 0);
}

#[test]
fn single_cell_grid_is_disabled() {
    let viewer = new_viewer(1, 1, 2);
    viewer.touch(0).unwrap();
    assert!(!viewer.is_enabled());
}

#[test]
fn tile_without_image_disables_until_image_arrives() {
    let viewer = new_viewer(2, 2, 2);
    let cell = viewer.cell(1);
    viewer.grid.borrow_mut().set_image(cell, None).unwrap();
    viewer.touch(1).unwrap();
    assert!(!viewer.is_enabled());
    assert!(viewer.controller.borrow().recency().is_empty());

    viewer.grid.borrow_mut().set_image(cell, Some("s1-2")).unwrap();
    assert!(viewer.is_enabled());
    assert_eq!(
        viewer.toggle().unwrap(),
        Transition::Ignored(IgnoreReason::EmptyHistory)
    );
}

#[test]
fn always_enabled_while_exploded() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    viewer.toggle().unwrap();

    let cell = viewer.cell(0);
    viewer.grid.borrow_mut().set_image(cell, None).unwrap();
    assert!(viewer.is_enabled());
}

#[test]
fn no_displays_is_a_no_op() {
    let viewer = new_viewer(2, 2, 0);
    viewer.touch_all(&[0, 1]).unwrap();
    let original = viewer.grid.borrow().create_snapshot();

    assert_eq!(
        viewer.toggle().unwrap(),
        Transition::Ignored(IgnoreReason::NoDisplays)
    );
    assert_eq!(viewer.grid.borrow().create_snapshot(), original);
    assert!(viewer.state_is_consistent());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn failed_explode_releases_gate_and_stays_unexploded() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    viewer.grid.borrow_mut().fail_next_cell_apply();

    let err = viewer.toggle().unwrap_err();

    assert!(matches!(err, GridError::SnapshotRejected(_)));
    assert!(!viewer.controller.borrow().gate().is_suppressed());
    assert!(!viewer.is_checked());
    assert!(viewer.state_is_consistent());
    assert_eq!(viewer.history.borrow().undo_depth(), 0);

    // The listener still hears the grid.
    let cell = viewer.cell(0);
    viewer
        .grid
        .borrow_mut()
        .load(cell, CellContent::showing("ct", "ct-1"))
        .unwrap();
    viewer.touch(0).unwrap();
    assert!(viewer.controller.borrow().recency().contains(cell));
}

#[test]
fn failed_unexplode_drops_explode_mode() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    viewer.toggle().unwrap();
    viewer.grid.borrow_mut().fail_next_cell_apply();

    assert!(viewer.toggle().is_err());
    assert!(!viewer.controller.borrow().gate().is_suppressed());
    assert!(!viewer.is_checked());
    assert!(viewer.state_is_consistent());
}

// ============================================================================
// Undo / redo
// ============================================================================

#[test]
fn undoing_explode_restores_grid_and_cancels() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1, 2]).unwrap();
    let original = viewer.grid.borrow().create_snapshot();
    viewer.toggle().unwrap();
    let exploded = viewer.grid.borrow().create_snapshot();

    assert_eq!(viewer.undo(), Some(Ok("Explode".to_string())));
    assert_eq!(viewer.grid.borrow().create_snapshot(), original);
    assert!(!viewer.is_checked());
    assert!(viewer.state_is_consistent());

    assert_eq!(viewer.redo(), Some(Ok("Explode".to_string())));
    assert_eq!(viewer.grid.borrow().create_snapshot(), exploded);
    assert!(!viewer.is_checked());
}

#[test]
fn explode_command_carries_both_layouts() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    let original = viewer.grid.borrow().create_snapshot();
    viewer.toggle().unwrap();
    let exploded = viewer.grid.borrow().create_snapshot();

    let history = viewer.history.borrow();
    let memento = history
        .last()
        .and_then(|cmd| cmd.as_any().downcast_ref::<MementoCmd<GridSnapshot>>())
        .expect("explode records a memento");
    assert_eq!(memento.label(), "Explode");
    assert_eq!(memento.begin_snapshot(), &original);
    assert_eq!(memento.end_snapshot(), Some(&exploded));
}

#[test]
fn undoing_unexplode_brings_back_exploded_layout() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    viewer.toggle().unwrap();
    let exploded = viewer.grid.borrow().create_snapshot();
    viewer.toggle().unwrap();

    assert!(viewer.undo().is_some());
    assert_eq!(viewer.grid.borrow().create_snapshot(), exploded);
    assert!(viewer.state_is_consistent());
}

// ============================================================================
// Entry points
// ============================================================================

#[test]
fn set_checked_only_acts_on_change() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    let mut controller = viewer.controller.borrow_mut();

    assert_eq!(
        controller.set_checked(false).unwrap(),
        Transition::Ignored(IgnoreReason::Unchanged)
    );
    assert!(controller.set_checked(true).unwrap().changed());
    assert_eq!(
        controller.set_checked(true).unwrap(),
        Transition::Ignored(IgnoreReason::Unchanged)
    );
    assert_eq!(controller.set_checked(false).unwrap(), Transition::Unexploded);
}

#[test]
fn double_click_only_unexplodes() {
    let viewer = new_viewer(2, 2, 2);
    viewer.touch_all(&[0, 1]).unwrap();
    let mut controller = viewer.controller.borrow_mut();

    assert!(!controller.handle_activation(2).unwrap());
    assert!(!controller.is_checked());

    controller.toggle_explode().unwrap();
    assert!(!controller.handle_activation(1).unwrap());
    assert!(controller.is_checked());
    assert!(controller.handle_activation(2).unwrap());
    assert!(!controller.is_checked());
}

#[test]
fn registry_tracks_explode_state() {
    let viewer = new_viewer(2, 2, 2);
    let mut registry = ExplodeRegistry::new();
    assert!(viewer.register(&mut registry));
    assert!(!viewer.register(&mut registry));
    viewer.touch_all(&[0, 1]).unwrap();

    assert!(!registry.is_exploded(viewer.id));
    viewer.toggle().unwrap();
    assert!(registry.is_exploded(viewer.id));
    viewer.grid.borrow_mut().reshape(2, 2).unwrap();
    assert!(!registry.is_exploded(viewer.id));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_changes_label_threshold_and_capacity() {
    let config = ExplodeConfig {
        command_label: "Spread".into(),
        min_cells_to_enable: 4,
        recency_capacity: 2,
    };
    let viewer = TestViewer::with_config(2, 2, 4, config);
    viewer.touch_all(&[0, 1, 2]).unwrap();
    assert_eq!(viewer.controller.borrow().recency().len(), 2);

    assert_eq!(viewer.toggle().unwrap(), Transition::Exploded { cells: 2 });
    assert_eq!(
        viewer.history.borrow().labels().first().copied(),
        Some("Spread")
    );

    let small = TestViewer::with_config(
        1,
        3,
        4,
        ExplodeConfig {
            min_cells_to_enable: 4,
            ..ExplodeConfig::default()
        },
    );
    small.touch(0).unwrap();
    assert!(!small.is_enabled());
}
