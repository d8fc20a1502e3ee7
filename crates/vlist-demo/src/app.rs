#![forbid(unsafe_code)]

//! The list screen.
//!
//! [`ListApp`] owns the item store, the observable view state, and the
//! windowed list. Input messages write to the [`ViewStore`]; a subscription
//! on the store flags the commit, and `update` answers with a
//! [`Msg::StateCommitted`] continuation. The continuation re-derives the
//! visible items first and only then consults the [`RecomputePolicy`], so a
//! row-height recompute always sees the new row count.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

use vlist_core::{
    DEFAULT_ITEM_COUNT, FilterType, Item, ItemStore, ShuffleSeed, Subscription, ViewCache,
    ViewState, ViewStore,
};
use vlist_runtime::{Cmd, Event, KeyCode, KeyEventKind, Model, Wheel};
use vlist_widgets::{
    DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT, Frame, Paragraph, Rect, RowWindow, StatefulWidget,
    VirtualList, VirtualListState, Widget, WindowedList,
};

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: i64 = 3;

/// Rows taken by the controls above the list.
const HEADER_ROWS: u16 = 3;

/// When a committed view-state change recomputes row heights.
///
/// A commit that changes the visible row count always recomputes, and so
/// does toggling "clear cache" (exactly once per toggle). The policies only
/// differ on commits that keep the row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecomputePolicy {
    /// Recompute only when the visible row count changed.
    #[default]
    RowCountChange,
    /// Recompute on every committed change.
    EveryChange,
    /// Also recompute on every commit while "clear cache" is checked.
    ClearCacheOnly,
}

impl RecomputePolicy {
    /// Whether a commit should recompute row heights.
    #[must_use]
    pub fn recompute_on_commit(self, row_count_changed: bool, clear_cache: bool) -> bool {
        row_count_changed
            || match self {
                Self::RowCountChange => false,
                Self::EveryChange => true,
                Self::ClearCacheOnly => clear_cache,
            }
    }

    /// Name used on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RowCountChange => "row-count",
            Self::EveryChange => "every-change",
            Self::ClearCacheOnly => "clear-cache",
        }
    }
}

impl fmt::Display for RecomputePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized recompute policy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePolicyError(pub String);

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown recompute policy '{}' (expected row-count, every-change, or clear-cache)",
            self.0
        )
    }
}

impl std::error::Error for ParsePolicyError {}

impl FromStr for RecomputePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "row-count" => Ok(Self::RowCountChange),
            "every-change" => Ok(Self::EveryChange),
            "clear-cache" => Ok(Self::ClearCacheOnly),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Everything needed to build a [`ListApp`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub item_count: usize,
    pub seed: ShuffleSeed,
    pub row_height: u32,
    pub overscan: usize,
    pub initial: ViewState,
    pub policy: RecomputePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            item_count: DEFAULT_ITEM_COUNT,
            seed: ShuffleSeed::Entropy,
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            initial: ViewState::default(),
            policy: RecomputePolicy::default(),
        }
    }
}

/// Messages handled by [`ListApp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    ToggleSorted,
    ToggleClearCache,
    SetFilter(FilterType),
    CycleFilter,
    ScrollLines(i64),
    PageUp,
    PageDown,
    ScrollTop,
    ScrollBottom,
    /// The view state changed; re-derive and apply the recompute policy.
    StateCommitted,
    /// Invalidate row heights once.
    RecomputeRowHeights,
    Quit,
    Noop,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(k) if k.kind == KeyEventKind::Release => Msg::Noop,
            Event::Key(k) if k.ctrl() && k.is_char('c') => Msg::Quit,
            Event::Key(k) => match k.code {
                KeyCode::Char('q') | KeyCode::Escape => Msg::Quit,
                KeyCode::Char('s') => Msg::ToggleSorted,
                KeyCode::Char('c') => Msg::ToggleClearCache,
                KeyCode::Char('a') | KeyCode::Char('1') => Msg::SetFilter(FilterType::All),
                KeyCode::Char('o') | KeyCode::Char('2') => Msg::SetFilter(FilterType::Odd),
                KeyCode::Char('e') | KeyCode::Char('3') => Msg::SetFilter(FilterType::Even),
                KeyCode::Tab => Msg::CycleFilter,
                KeyCode::Up | KeyCode::Char('k') => Msg::ScrollLines(-1),
                KeyCode::Down | KeyCode::Char('j') => Msg::ScrollLines(1),
                KeyCode::PageUp => Msg::PageUp,
                KeyCode::PageDown => Msg::PageDown,
                KeyCode::Home => Msg::ScrollTop,
                KeyCode::End => Msg::ScrollBottom,
                _ => Msg::Noop,
            },
            Event::Wheel(Wheel::Up) => Msg::ScrollLines(-WHEEL_LINES),
            Event::Wheel(Wheel::Down) => Msg::ScrollLines(WHEEL_LINES),
            Event::Resize { .. } => Msg::Noop,
        }
    }
}

/// The windowed item list screen.
pub struct ListApp {
    store: ItemStore,
    view: ViewStore,
    cache: ViewCache,
    visible: Arc<[Item]>,
    /// Rendering advances the window, and `view` only has `&self`.
    list: RefCell<VirtualListState>,
    clear_cache: bool,
    policy: RecomputePolicy,
    committed: Rc<Cell<bool>>,
    _commits: Subscription,
}

impl ListApp {
    /// Build the store, derive the initial view, and size the list.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let store = ItemStore::initialize(config.item_count, config.seed);
        Self::with_store(store, config)
    }

    /// Like [`new`](Self::new) but over an existing store.
    #[must_use]
    pub fn with_store(store: ItemStore, config: AppConfig) -> Self {
        let view = ViewStore::new(config.initial);
        let mut cache = ViewCache::new(store.shared());
        let visible = cache.get(view.state());

        let committed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&committed);
        let commits = view.subscribe(move |_| flag.set(true));

        let list = WindowedList::new(visible.len(), config.row_height)
            .with_overscan(config.overscan);

        Self {
            store,
            view,
            cache,
            visible,
            list: RefCell::new(VirtualListState::new(list)),
            clear_cache: false,
            policy: config.policy,
            committed,
            _commits: commits,
        }
    }

    /// Source items in store order.
    pub fn items(&self) -> &[Item] {
        self.store.items()
    }

    /// Currently visible items.
    pub fn visible(&self) -> &[Item] {
        &self.visible
    }

    /// Current view state.
    pub fn view_state(&self) -> ViewState {
        self.view.state()
    }

    /// Whether "clear cache" is checked.
    pub fn clear_cache(&self) -> bool {
        self.clear_cache
    }

    /// Active recompute policy.
    pub fn policy(&self) -> RecomputePolicy {
        self.policy
    }

    /// Times row heights have been recomputed.
    pub fn recompute_count(&self) -> u64 {
        self.list.borrow().list.recompute_count()
    }

    /// Row count the windowed list currently lays out.
    pub fn row_count(&self) -> usize {
        self.list.borrow().list.row_count()
    }

    /// Total scrollable height in layout units.
    pub fn total_height(&self) -> u32 {
        self.list.borrow().list.total_height()
    }

    /// Window produced by the last render.
    pub fn window(&self) -> RowWindow {
        self.list.borrow().list.window().clone()
    }

    /// Current scroll offset in layout units.
    pub fn scroll_offset(&self) -> u32 {
        self.list.borrow().scroll.offset()
    }

    /// Memoized derivations.
    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }

    /// Continuation to run if the last write committed a change.
    fn after_write(&self) -> Cmd<Msg> {
        if self.committed.replace(false) {
            Cmd::msg(Msg::StateCommitted)
        } else {
            Cmd::none()
        }
    }

    fn on_commit(&mut self) {
        let state = self.view.state();
        if self.clear_cache {
            self.cache.invalidate();
        }
        let previous = self.visible.len();
        self.visible = self.cache.get(state);
        let row_count = self.visible.len();

        let list = &mut self.list.get_mut().list;
        list.set_row_count(row_count);
        if self
            .policy
            .recompute_on_commit(previous != row_count, self.clear_cache)
        {
            list.recompute_row_heights();
        }
        tracing::debug!(
            filter = state.filter.as_str(),
            sorted = state.sorted,
            previous,
            row_count,
            recomputes = list.recompute_count(),
            "visible items updated"
        );
    }

    fn header_lines(&self) -> Paragraph {
        let state = self.view.state();
        let check = |on: bool| if on { "[x]" } else { "[ ]" };
        let radios: Vec<String> = FilterType::ALL
            .iter()
            .map(|&f| {
                let dot = if f == state.filter { "(*)" } else { "( )" };
                format!("{dot} {f}")
            })
            .collect();
        Paragraph::new(format!(
            "{} sort   {} clear cache   {}",
            check(state.sorted),
            check(self.clear_cache),
            radios.join("  ")
        ))
        .line("s sort  c clear cache  a/o/e filter  Tab cycle  arrows/PgUp/PgDn scroll  q quit")
    }

    fn status_line(&self) -> String {
        let list = self.list.borrow();
        let window = list.list.window();
        let range = if window.is_empty() {
            "none".to_string()
        } else {
            format!("{}-{}", window.rendered.start, window.rendered.end - 1)
        };
        format!(
            "rows {range} of {}  height {}  recomputes {}  policy {}",
            list.list.row_count(),
            list.list.total_height(),
            list.list.recompute_count(),
            self.policy
        )
    }
}

impl Model for ListApp {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::ToggleSorted => {
                self.view.toggle_sorted();
                self.after_write()
            }
            Msg::SetFilter(filter) => {
                self.view.set_filter(filter);
                self.after_write()
            }
            Msg::CycleFilter => {
                let next = self.view.state().filter.next();
                self.view.set_filter(next);
                self.after_write()
            }
            Msg::ToggleClearCache => {
                self.clear_cache = !self.clear_cache;
                self.cache.invalidate();
                tracing::info!(clear_cache = self.clear_cache, "clear cache toggled");
                Cmd::msg(Msg::RecomputeRowHeights)
            }
            Msg::StateCommitted => {
                self.on_commit();
                Cmd::none()
            }
            Msg::RecomputeRowHeights => {
                self.list.get_mut().list.recompute_row_heights();
                Cmd::none()
            }
            Msg::ScrollLines(lines) => {
                self.list.get_mut().scroll_lines(lines);
                Cmd::none()
            }
            Msg::PageUp => {
                self.list.get_mut().scroll.page_up();
                Cmd::none()
            }
            Msg::PageDown => {
                self.list.get_mut().scroll.page_down();
                Cmd::none()
            }
            Msg::ScrollTop => {
                self.list.get_mut().scroll.scroll_to_top();
                Cmd::none()
            }
            Msg::ScrollBottom => {
                self.list.get_mut().scroll.scroll_to_bottom();
                Cmd::none()
            }
            Msg::Quit => Cmd::quit(),
            Msg::Noop => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let (header, rest) = area.split_top(HEADER_ROWS);
        let (body, status) = rest.split_bottom(1);

        let (controls, rule) = header.split_bottom(1);
        self.header_lines().render(controls, frame);
        draw_rule(frame, rule);

        {
            let mut list = self.list.borrow_mut();
            VirtualList::new(&self.visible).render(body, frame, &mut list);
        }

        Paragraph::new(self.status_line()).render(status, frame);
    }
}

fn draw_rule(frame: &mut Frame, area: Rect) {
    for x in area.x..area.right() {
        frame.set(x, area.y, '─');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vlist_runtime::{KeyEvent, Modifiers};

    fn app(policy: RecomputePolicy) -> ListApp {
        ListApp::new(AppConfig {
            seed: ShuffleSeed::Fixed(7),
            policy,
            ..AppConfig::default()
        })
    }

    #[test]
    fn keys_map_to_messages() {
        assert_eq!(Msg::from(Event::char('s')), Msg::ToggleSorted);
        assert_eq!(Msg::from(Event::char('c')), Msg::ToggleClearCache);
        assert_eq!(Msg::from(Event::char('2')), Msg::SetFilter(FilterType::Odd));
        assert_eq!(Msg::from(Event::char('e')), Msg::SetFilter(FilterType::Even));
        assert_eq!(Msg::from(Event::key(KeyCode::Tab)), Msg::CycleFilter);
        assert_eq!(Msg::from(Event::key(KeyCode::Escape)), Msg::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert_eq!(Msg::from(Event::Key(ctrl_c)), Msg::Quit);
        let release = KeyEvent::new(KeyCode::Char('s')).with_kind(KeyEventKind::Release);
        assert_eq!(Msg::from(Event::Key(release)), Msg::Noop);
        assert_eq!(Msg::from(Event::Wheel(Wheel::Down)), Msg::ScrollLines(WHEEL_LINES));
        assert_eq!(Msg::from(Event::Wheel(Wheel::Up)), Msg::ScrollLines(-WHEEL_LINES));
    }

    #[test]
    fn policy_names_round_trip() {
        for policy in [
            RecomputePolicy::RowCountChange,
            RecomputePolicy::EveryChange,
            RecomputePolicy::ClearCacheOnly,
        ] {
            assert_eq!(policy.as_str().parse::<RecomputePolicy>(), Ok(policy));
        }
        assert!("sometimes".parse::<RecomputePolicy>().is_err());
    }

    #[test]
    fn policy_decisions() {
        use RecomputePolicy::*;
        assert!(RowCountChange.recompute_on_commit(true, false));
        assert!(!RowCountChange.recompute_on_commit(false, true));
        assert!(EveryChange.recompute_on_commit(false, false));
        assert!(ClearCacheOnly.recompute_on_commit(false, true));
        assert!(!ClearCacheOnly.recompute_on_commit(false, false));
        for policy in [RowCountChange, EveryChange, ClearCacheOnly] {
            assert!(policy.recompute_on_commit(true, false), "{policy}");
        }
    }

    #[test]
    fn starts_unfiltered_and_unsorted() {
        let app = app(RecomputePolicy::default());
        assert_eq!(app.view_state(), ViewState::default());
        assert_eq!(app.visible().len(), 1000);
        assert_eq!(app.visible(), app.items());
        assert_eq!(app.row_count(), 1000);
        assert_eq!(app.total_height(), 60_000);
    }

    #[test]
    fn unchanged_write_returns_no_continuation() {
        let mut app = app(RecomputePolicy::default());
        assert!(matches!(app.update(Msg::SetFilter(FilterType::All)), Cmd::None));
        assert!(matches!(
            app.update(Msg::SetFilter(FilterType::Odd)),
            Cmd::Msg(Msg::StateCommitted)
        ));
    }

    #[test]
    fn sort_toggle_keeps_row_count_under_default_policy() {
        let mut app = app(RecomputePolicy::RowCountChange);
        let cmd = app.update(Msg::ToggleSorted);
        assert!(matches!(cmd, Cmd::Msg(Msg::StateCommitted)));
        app.update(Msg::StateCommitted);
        assert_eq!(app.recompute_count(), 0);
        assert_eq!(app.visible()[0].id, 1);
    }

    #[test]
    fn clear_cache_only_policy_waits_for_checkbox() {
        let mut app = app(RecomputePolicy::ClearCacheOnly);
        app.update(Msg::SetFilter(FilterType::Even));
        app.update(Msg::StateCommitted);
        assert_eq!(app.recompute_count(), 1);
        assert_eq!(app.row_count(), 500);

        // Same row count, box unchecked.
        app.update(Msg::ToggleSorted);
        app.update(Msg::StateCommitted);
        assert_eq!(app.recompute_count(), 1);

        assert!(matches!(
            app.update(Msg::ToggleClearCache),
            Cmd::Msg(Msg::RecomputeRowHeights)
        ));
        app.update(Msg::RecomputeRowHeights);
        assert_eq!(app.recompute_count(), 2);

        app.update(Msg::ToggleSorted);
        app.update(Msg::StateCommitted);
        assert_eq!(app.recompute_count(), 3);
    }

    #[test]
    fn checked_clear_cache_rederives_every_commit() {
        let mut app = app(RecomputePolicy::default());
        app.update(Msg::ToggleClearCache);
        let misses = app.cache().misses();
        app.update(Msg::SetFilter(FilterType::Odd));
        app.update(Msg::StateCommitted);
        app.update(Msg::SetFilter(FilterType::All));
        app.update(Msg::StateCommitted);
        assert_eq!(app.cache().misses(), misses + 2);
        assert_eq!(app.cache().hits(), 0);
    }

    #[test]
    fn view_draws_controls_list_and_status() {
        let mut app = ListApp::with_store(
            ItemStore::from_items((1..=50).map(Item::numbered).collect()),
            AppConfig::default(),
        );
        app.update(Msg::ToggleSorted);
        app.update(Msg::StateCommitted);

        let mut frame = Frame::new(100, 10);
        app.view(&mut frame);
        let lines = frame.lines();
        assert!(lines[0].starts_with("[x] sort   [ ] clear cache   (*) all  ( ) odd  ( ) even"));
        assert!(lines[2].starts_with('─'));
        assert!(lines[3].starts_with("item 1"));
        assert!(lines[8].starts_with("item 6"));
        assert_eq!(
            lines[9],
            "rows 0-15 of 50  height 3000  recomputes 0  policy row-count"
        );
    }
}
