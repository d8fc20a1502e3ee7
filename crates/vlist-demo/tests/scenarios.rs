#![forbid(unsafe_code)]

//! End-to-end scenarios driving the list screen through the simulator.

use proptest::prelude::*;
use vlist_core::{FilterType, ShuffleSeed, ViewState, derive};
use vlist_demo::app::{AppConfig, ListApp, Msg, RecomputePolicy};
use vlist_demo::cli::{Command, Opts};
use vlist_runtime::{CmdRecord, Event, KeyCode, ProgramSimulator};

const WIDTH: u16 = 80;
const HEIGHT: u16 = 24;
/// Terminal lines left for list rows after the header and status line.
const BODY_LINES: u32 = 20;

fn seeded(policy: RecomputePolicy) -> AppConfig {
    AppConfig {
        seed: ShuffleSeed::Fixed(7),
        policy,
        ..AppConfig::default()
    }
}

fn sim(config: AppConfig) -> ProgramSimulator<ListApp> {
    let mut sim = ProgramSimulator::new(ListApp::new(config));
    sim.init();
    sim.capture_frame(WIDTH, HEIGHT);
    sim
}

fn assert_window_in_bounds(sim: &ProgramSimulator<ListApp>) {
    let app = sim.model();
    let window = app.window();
    assert!(window.rendered.end <= app.row_count(), "{window:?}");
    assert!(window.rendered.start <= window.visible.start);
    assert!(window.visible.end <= window.rendered.end);
}

#[test]
fn shuffled_store_holds_every_id_once() {
    let sim = sim(seeded(RecomputePolicy::default()));
    let mut ids: Vec<u32> = sim.model().items().iter().map(|item| item.id).collect();
    assert_eq!(ids.len(), 1000);
    assert_ne!(ids, (1..=1000).collect::<Vec<_>>());
    ids.sort_unstable();
    assert_eq!(ids, (1..=1000).collect::<Vec<_>>());
}

#[test]
fn same_seed_same_order() {
    let a = ListApp::new(seeded(RecomputePolicy::default()));
    let b = ListApp::new(seeded(RecomputePolicy::default()));
    assert_eq!(a.items(), b.items());
}

#[test]
fn odd_and_sorted_lists_odd_ids_ascending() {
    let mut sim = sim(seeded(RecomputePolicy::default()));
    sim.inject_events(&[Event::char('o'), Event::char('s')]);

    let app = sim.model();
    assert_eq!(app.view_state(), ViewState::new(FilterType::Odd, true));
    let ids: Vec<u32> = app.visible().iter().map(|item| item.id).collect();
    assert_eq!(ids, (1..=999).step_by(2).collect::<Vec<_>>());
    assert_eq!(app.row_count(), 500);
    assert_eq!(app.total_height(), 500 * 60);

    let frame = sim.capture_frame(WIDTH, HEIGHT);
    assert!(frame.line(0).starts_with("[x] sort   [ ] clear cache   ( ) all  (*) odd"));
    assert!(frame.line(3).starts_with("item 1"));
    assert!(frame.line(4).starts_with("item 3"));
}

#[test]
fn unsorted_filter_keeps_store_order() {
    let mut sim = sim(seeded(RecomputePolicy::default()));
    sim.inject_event(Event::char('e'));
    let app = sim.model();
    let expected = derive(app.items(), FilterType::Even, false);
    assert_eq!(app.visible(), expected.as_slice());
}

#[test]
fn commits_run_as_a_continuation() {
    let mut sim = sim(seeded(RecomputePolicy::default()));
    sim.clear_command_log();
    sim.inject_event(Event::char('s'));
    assert_eq!(sim.command_log(), &[CmdRecord::Msg, CmdRecord::None]);

    // Re-selecting the active filter commits nothing.
    sim.clear_command_log();
    sim.inject_event(Event::char('a'));
    assert_eq!(sim.command_log(), &[CmdRecord::None]);
}

#[test]
fn row_count_policy_recomputes_when_the_count_moves() {
    let mut sim = sim(seeded(RecomputePolicy::RowCountChange));
    sim.inject_event(Event::char('s'));
    assert_eq!(sim.model().recompute_count(), 0);
    sim.inject_event(Event::char('o'));
    assert_eq!(sim.model().recompute_count(), 1);
    sim.inject_event(Event::char('e'));
    assert_eq!(sim.model().recompute_count(), 1);
    sim.inject_event(Event::char('a'));
    assert_eq!(sim.model().recompute_count(), 2);
}

#[test]
fn every_change_policy_recomputes_each_commit() {
    let mut sim = sim(seeded(RecomputePolicy::EveryChange));
    sim.inject_events(&[Event::char('s'), Event::char('s'), Event::char('o')]);
    assert_eq!(sim.model().recompute_count(), 3);
}

#[test]
fn clear_cache_toggle_recomputes_once_per_toggle() {
    let mut sim = sim(seeded(RecomputePolicy::ClearCacheOnly));

    // Filtering changes the row count, which recomputes under every policy.
    sim.inject_event(Event::char('e'));
    assert_eq!(sim.model().recompute_count(), 1);
    assert_eq!(sim.model().row_count(), 500);
    sim.inject_event(Event::char('s'));
    assert_eq!(sim.model().recompute_count(), 1);

    sim.inject_event(Event::char('c'));
    assert!(sim.model().clear_cache());
    assert_eq!(sim.model().recompute_count(), 2);
    sim.capture_frame(WIDTH, HEIGHT);
    assert_window_in_bounds(&sim);

    // While checked, every commit recomputes, even when the count holds.
    sim.inject_event(Event::char('s'));
    assert_eq!(sim.model().recompute_count(), 3);
    sim.inject_event(Event::char('a'));
    assert_eq!(sim.model().recompute_count(), 4);
    assert_eq!(sim.model().row_count(), 1000);

    sim.inject_event(Event::char('c'));
    assert!(!sim.model().clear_cache());
    assert_eq!(sim.model().recompute_count(), 5);

    sim.inject_event(Event::char('s'));
    assert_eq!(sim.model().recompute_count(), 5);
    sim.inject_event(Event::char('o'));
    assert_eq!(sim.model().recompute_count(), 6);
    let frame = sim.capture_frame(WIDTH, HEIGHT);
    assert!(frame.line(0).starts_with("[x] sort   [ ] clear cache"));
    assert_window_in_bounds(&sim);
}

#[test]
fn checked_clear_cache_rederives_instead_of_reusing() {
    let mut sim = sim(seeded(RecomputePolicy::default()));
    sim.inject_events(&[Event::char('o'), Event::char('a')]);
    let hits_before = sim.model().cache().hits();

    sim.inject_events(&[Event::char('c'), Event::char('o'), Event::char('a')]);
    assert_eq!(sim.model().cache().hits(), hits_before);
    assert_eq!(sim.model().visible().len(), 1000);
}

#[test]
fn overscan_widens_the_window() {
    let mut sim = sim(seeded(RecomputePolicy::default()));
    assert_eq!(sim.model().window().rendered, 0..(BODY_LINES as usize + 10));

    sim.send(Msg::ScrollLines(100));
    assert_eq!(sim.model().scroll_offset(), 6000);
    sim.capture_frame(WIDTH, HEIGHT);
    let window = sim.model().window();
    assert_eq!(window.visible, 100..120);
    assert_eq!(window.rendered, 90..130);

    sim.inject_event(Event::key(KeyCode::Home));
    sim.capture_frame(WIDTH, HEIGHT);
    assert_eq!(sim.model().window().rendered.start, 0);
}

#[test]
fn shrinking_the_list_clamps_the_scroll() {
    let mut sim = sim(seeded(RecomputePolicy::default()));
    sim.inject_event(Event::key(KeyCode::End));
    assert_eq!(sim.model().scroll_offset(), 1000 * 60 - BODY_LINES * 60);

    sim.inject_event(Event::char('o'));
    sim.capture_frame(WIDTH, HEIGHT);
    let app = sim.model();
    assert_eq!(app.scroll_offset(), 500 * 60 - BODY_LINES * 60);
    assert_eq!(app.window().rendered.end, 500);
    assert_window_in_bounds(&sim);
}

#[test]
fn largest_accepted_row_height_renders() {
    let Ok(Command::Run(opts)) = Opts::parse_from(["--row-height=10000", "--seed=3"], |_| None)
    else {
        panic!("expected Run");
    };
    let mut sim = ProgramSimulator::new(ListApp::new(opts.app_config()));
    sim.init();
    sim.capture_frame(WIDTH, 70);
    sim.inject_event(Event::key(KeyCode::End));
    let frame = sim.capture_frame(WIDTH, 70).clone();

    let app = sim.model();
    assert_eq!(app.total_height(), 10_000_000);
    assert_eq!(app.window().rendered.end, 1000);
    assert!(frame.line(68).starts_with("item "));
}

#[test]
fn empty_list_renders_nothing() {
    let config = AppConfig {
        item_count: 0,
        ..seeded(RecomputePolicy::default())
    };
    let mut sim = sim(config);
    sim.inject_events(&[Event::char('o'), Event::key(KeyCode::PageDown)]);
    let frame = sim.capture_frame(WIDTH, HEIGHT).clone();

    let app = sim.model();
    assert_eq!(app.total_height(), 0);
    assert!(app.window().is_empty());
    assert_eq!(app.scroll_offset(), 0);
    assert_eq!(frame.line(3), "");
    assert_eq!(
        frame.line(HEIGHT - 1),
        "rows none of 0  height 0  recomputes 0  policy row-count"
    );
}

#[test]
fn quit_stops_the_program() {
    let mut sim = sim(seeded(RecomputePolicy::default()));
    sim.inject_events(&[Event::char('q'), Event::char('s')]);
    assert!(!sim.is_running());
    assert!(!sim.model().view_state().sorted);
}

fn key_strategy() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['s', 'c', 'a', 'o', 'e', 'j', 'k'])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn visible_items_always_match_the_view_state(
        keys in prop::collection::vec(key_strategy(), 0..24),
        policy in prop::sample::select(vec![
            RecomputePolicy::RowCountChange,
            RecomputePolicy::EveryChange,
            RecomputePolicy::ClearCacheOnly,
        ]),
    ) {
        let config = AppConfig { item_count: 120, ..seeded(policy) };
        let mut sim = sim(config);
        for key in keys {
            sim.inject_event(Event::char(key));
            sim.capture_frame(WIDTH, HEIGHT);

            let app = sim.model();
            let state = app.view_state();
            let expected = derive(app.items(), state.filter, state.sorted);
            prop_assert_eq!(app.visible(), expected.as_slice());
            prop_assert_eq!(app.row_count(), expected.len());
            prop_assert_eq!(app.total_height(), expected.len() as u32 * 60);
            prop_assert!(app.window().rendered.end <= app.row_count());
        }
    }
}
