use std::time::{Duration, Instant};
use tokio::sync::{mpsc::UnboundedSender, watch};

use crate::api::SEARCH_LIMIT;
use crate::config::Config;
use crate::favorites::{FavoritesStore, KvStore};
use crate::fetcher::{FetchRequest, Query};
use crate::loader::{LoadState, Loader, Ticket};
use crate::router::{self, Route};
use crate::stats::{self, CatalogSummary, CategoryCounts, GENERATIONS};
use crate::theme::ColorScheme;
use crate::types::{AppEvent, Category, Creature, LoaderSlot, Payload};
use crate::view::{parse_filter, sort_creatures, CatalogView, SortKey, ViewFilter};

/// Number of records the types screen counts categories over.
pub const CENSUS_LIMIT: u32 = 500;

pub type Favorites = FavoritesStore<Box<dyn KvStore + Send>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Search,
    ConfirmClear,
}

/// Start a load for `param`, or re-run it when the parameter is unchanged
/// (entering a screen always refreshes its data).
fn start<P: Clone + PartialEq, T: Default>(loader: &mut Loader<P, T>, param: P) -> Option<Ticket> {
    loader.request(param).or_else(|| loader.refetch())
}

pub struct App {
    quit: bool,
    route: Route,
    history: Vec<Route>,
    fetch_tx: UnboundedSender<FetchRequest>,

    fps: u32,
    theme: ColorScheme,
    home_limit: u32,
    generation_cap: u32,

    catalog: Loader<u32, Vec<Creature>>,
    census: Loader<u32, Vec<Creature>>,
    generation: Loader<u32, Vec<Creature>>,
    categories: Loader<(), Vec<Category>>,
    members: Loader<String, Vec<Creature>>,
    favorite_records: Loader<Vec<u32>, Vec<Creature>>,
    search: Loader<String, Vec<Creature>>,
    detail: Loader<String, Option<Creature>>,

    home: CatalogView,
    members_sort: SortKey,
    favorites_sort: SortKey,
    selection: usize,

    input_mode: InputMode,
    filter_input: String,
    search_input: String,
    search_selection: usize,

    favorites: Favorites,
    favorites_rx: watch::Receiver<Vec<u32>>,

    toast_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(cfg: &Config, favorites: Favorites, fetch_tx: UnboundedSender<FetchRequest>) -> Self {
        let favorites_rx = favorites.subscribe();
        Self {
            quit: false,
            route: Route::Home,
            history: Vec::new(),
            fetch_tx,
            fps: cfg.render_fps,
            theme: cfg.theme.colors(),
            home_limit: cfg.home_limit,
            generation_cap: cfg.generation_cap,
            catalog: Loader::new(),
            census: Loader::new(),
            generation: Loader::new(),
            categories: Loader::new(),
            members: Loader::new(),
            favorite_records: Loader::new(),
            search: Loader::new(),
            detail: Loader::new(),
            home: CatalogView::new(cfg.page_size),
            members_sort: SortKey::default(),
            favorites_sort: SortKey::default(),
            selection: 0,
            input_mode: InputMode::Normal,
            filter_input: String::new(),
            search_input: String::new(),
            search_selection: 0,
            favorites,
            favorites_rx,
            toast_message: None,
        }
    }

    /// Open the first screen, from a deep link when one is given.
    pub fn start(&mut self, link: Option<&str>) {
        if let Some(raw) = link {
            match router::parse(raw) {
                Some(route) => self.route = route,
                None => {
                    log::warn!("[app] unknown route {raw:?}, opening home");
                    self.show_toast(format!("Unknown route: {raw}"));
                }
            }
        }
        log::info!("[app] starting at {}", self.route.to_link());
        self.enter_screen();
    }

    // ----- getters -----
    pub fn fps(&self) -> u32 {
        self.fps
    }
    pub fn quit_flag(&self) -> bool {
        self.quit
    }
    pub fn route(&self) -> &Route {
        &self.route
    }
    pub fn theme(&self) -> &ColorScheme {
        &self.theme
    }
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }
    pub fn selection(&self) -> usize {
        self.selection
    }
    pub fn filter_input(&self) -> &str {
        &self.filter_input
    }
    pub fn home_filter(&self) -> &ViewFilter {
        self.home.filter()
    }
    pub fn home_view(&self) -> &CatalogView {
        &self.home
    }
    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }
    pub fn detail(&self) -> &Loader<String, Option<Creature>> {
        &self.detail
    }
    pub fn categories(&self) -> &[Category] {
        self.categories.data()
    }
    pub fn search_input(&self) -> &str {
        &self.search_input
    }
    pub fn search_results(&self) -> &[Creature] {
        self.search.data()
    }
    pub fn search_selection(&self) -> usize {
        self.search_selection
    }
    pub fn search_loading(&self) -> bool {
        self.search.is_loading()
    }
    pub fn search_error(&self) -> Option<&str> {
        self.search.error()
    }

    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Show a toast notification for 2 seconds
    pub fn show_toast(&mut self, msg: String) {
        self.toast_message = Some((msg, Instant::now()));
    }

    pub fn toast_message(&self) -> Option<&str> {
        const TOAST_DURATION: Duration = Duration::from_secs(2);
        self.toast_message.as_ref().and_then(|(msg, time)| {
            if time.elapsed() < TOAST_DURATION {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    // ----- derived views -----

    /// Sort key shown for the current screen.
    pub fn sort_key(&self) -> SortKey {
        match self.route {
            Route::TypeDetail { .. } => self.members_sort,
            Route::Favorites => self.favorites_sort,
            _ => self.home.sort_key(),
        }
    }

    /// Creature list of the current screen, in display order.
    pub fn screen_creatures(&self) -> Vec<&Creature> {
        match self.route {
            Route::Home => self.home.displayed(),
            Route::TypeDetail { .. } => {
                let mut list: Vec<&Creature> = self.members.data().iter().collect();
                sort_creatures(&mut list, self.members_sort);
                list
            }
            Route::Favorites => {
                let mut list: Vec<&Creature> = self.favorite_records.data().iter().collect();
                sort_creatures(&mut list, self.favorites_sort);
                list
            }
            Route::Types | Route::Creature { .. } => Vec::new(),
        }
    }

    pub fn selected_creature(&self) -> Option<&Creature> {
        self.screen_creatures().get(self.selection).copied()
    }

    /// Number of records matching the home filter (all pages).
    pub fn home_matches(&self) -> usize {
        self.home.filtered().len()
    }

    pub fn home_summary(&self) -> CatalogSummary {
        stats::summary(self.catalog.data(), self.categories.data())
    }

    pub fn home_counts(&self) -> CategoryCounts {
        stats::category_counts(self.catalog.data(), self.categories.data())
    }

    pub fn type_counts(&self) -> CategoryCounts {
        stats::category_counts(self.census.data(), self.categories.data())
    }

    fn list_len(&self) -> usize {
        match self.route {
            Route::Types => self.categories.data().len(),
            Route::Creature { .. } => 0,
            _ => self.screen_creatures().len(),
        }
    }

    pub fn screen_loading(&self) -> bool {
        match self.route {
            Route::Home => {
                self.catalog.is_loading() || self.generation.is_loading() || self.categories.is_loading()
            }
            Route::Types => self.census.is_loading() || self.categories.is_loading(),
            Route::TypeDetail { .. } => self.members.is_loading(),
            Route::Favorites => self.favorite_records.is_loading(),
            Route::Creature { .. } => self.detail.is_loading(),
        }
    }

    /// First error among the current screen's loaders.
    pub fn screen_error(&self) -> Option<&str> {
        match self.route {
            Route::Home => self
                .catalog
                .error()
                .or_else(|| self.generation.error())
                .or_else(|| self.categories.error()),
            Route::Types => self.census.error().or_else(|| self.categories.error()),
            Route::TypeDetail { .. } => self.members.error(),
            Route::Favorites => self.favorite_records.error(),
            Route::Creature { .. } => self.detail.error(),
        }
    }

    // ----- navigation -----

    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        log::debug!("[app] {} -> {}", self.route.to_link(), route.to_link());
        self.leave_screen();
        let prev = std::mem::replace(&mut self.route, route);
        self.history.push(prev);
        self.enter_screen();
    }

    pub fn back(&mut self) {
        if let Some(prev) = self.history.pop() {
            self.leave_screen();
            self.route = prev;
            self.enter_screen();
        }
    }

    fn dispatch(&self, slot: LoaderSlot, ticket: Option<Ticket>, query: Query) {
        let Some(ticket) = ticket else { return };
        if self.fetch_tx.send(FetchRequest { slot, ticket, query }).is_err() {
            log::warn!("[app] fetcher gone, dropping {slot:?} request");
        }
    }

    fn enter_screen(&mut self) {
        self.selection = 0;
        match self.route.clone() {
            Route::Home => {
                let t = start(&mut self.catalog, self.home_limit);
                self.dispatch(LoaderSlot::Catalog, t, Query::All { limit: Some(self.home_limit) });
                self.load_categories();
                if let Some(g) = self.home.filter().generation {
                    let t = start(&mut self.generation, g);
                    self.dispatch_generation(t, g);
                }
            }
            Route::Types => {
                let t = start(&mut self.census, CENSUS_LIMIT);
                self.dispatch(LoaderSlot::Census, t, Query::All { limit: Some(CENSUS_LIMIT) });
                self.load_categories();
            }
            Route::TypeDetail { name } => {
                let t = start(&mut self.members, name.clone());
                self.dispatch(LoaderSlot::CategoryMembers, t, Query::ByCategory(name));
            }
            Route::Favorites => {
                let ids = self.favorites.list().to_vec();
                self.load_favorites(ids, true);
            }
            Route::Creature { name } => {
                let t = start(&mut self.detail, name.clone());
                self.dispatch(LoaderSlot::Detail, t, Query::ByName(name));
            }
        }
    }

    // Unmount: no completion for the screen being left may apply.
    fn leave_screen(&mut self) {
        match self.route {
            Route::Home => {
                self.catalog.cancel();
                self.generation.cancel();
                self.categories.cancel();
            }
            Route::Types => {
                self.census.cancel();
                self.categories.cancel();
            }
            Route::TypeDetail { .. } => self.members.cancel(),
            Route::Favorites => self.favorite_records.cancel(),
            Route::Creature { .. } => self.detail.cancel(),
        }
        if self.input_mode != InputMode::Normal {
            self.input_mode = InputMode::Normal;
        }
    }

    fn load_categories(&mut self) {
        let t = start(&mut self.categories, ());
        self.dispatch(LoaderSlot::Categories, t, Query::Categories);
    }

    fn dispatch_generation(&self, ticket: Option<Ticket>, generation: u32) {
        self.dispatch(
            LoaderSlot::Generation,
            ticket,
            Query::ByGeneration {
                generation,
                cap: self.generation_cap,
            },
        );
    }

    fn load_favorites(&mut self, ids: Vec<u32>, force: bool) {
        if ids.is_empty() {
            self.favorite_records.reset();
            return;
        }
        let t = if force {
            start(&mut self.favorite_records, ids.clone())
        } else {
            self.favorite_records.request(ids.clone())
        };
        self.dispatch(LoaderSlot::Favorites, t, Query::ManyById(ids));
    }

    /// Re-run every load of the current screen.
    pub fn retry(&mut self) {
        log::info!("[app] retry {}", self.route.to_link());
        match self.route.clone() {
            Route::Home => {
                let t = self.catalog.refetch();
                self.dispatch(LoaderSlot::Catalog, t, Query::All { limit: Some(self.home_limit) });
                let t = self.categories.refetch();
                self.dispatch(LoaderSlot::Categories, t, Query::Categories);
                if let Some(&g) = self.generation.param() {
                    let t = self.generation.refetch();
                    self.dispatch_generation(t, g);
                }
            }
            Route::Types => {
                let t = self.census.refetch();
                self.dispatch(LoaderSlot::Census, t, Query::All { limit: Some(CENSUS_LIMIT) });
                let t = self.categories.refetch();
                self.dispatch(LoaderSlot::Categories, t, Query::Categories);
            }
            Route::TypeDetail { name } => {
                let t = self.members.refetch();
                self.dispatch(LoaderSlot::CategoryMembers, t, Query::ByCategory(name));
            }
            Route::Favorites => {
                if let Some(ids) = self.favorite_records.param().cloned() {
                    let t = self.favorite_records.refetch();
                    self.dispatch(LoaderSlot::Favorites, t, Query::ManyById(ids));
                }
            }
            Route::Creature { name } => {
                let t = self.detail.refetch();
                self.dispatch(LoaderSlot::Detail, t, Query::ByName(name));
            }
        }
    }

    // ----- events -----

    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Quit => self.quit = true,
            AppEvent::Loaded { slot, ticket, result } => {
                let applied = match slot {
                    LoaderSlot::Catalog => {
                        let ok = self.catalog.complete(ticket, result.map(Payload::into_creatures));
                        if ok && self.home.filter().generation.is_none() {
                            self.refresh_home_base();
                        }
                        ok
                    }
                    LoaderSlot::Generation => {
                        let ok = self.generation.complete(ticket, result.map(Payload::into_creatures));
                        if ok && self.home.filter().generation.is_some() {
                            self.refresh_home_base();
                        }
                        ok
                    }
                    LoaderSlot::Census => self.census.complete(ticket, result.map(Payload::into_creatures)),
                    LoaderSlot::Categories => {
                        self.categories.complete(ticket, result.map(Payload::into_categories))
                    }
                    LoaderSlot::CategoryMembers => {
                        self.members.complete(ticket, result.map(Payload::into_creatures))
                    }
                    LoaderSlot::Favorites => {
                        self.favorite_records.complete(ticket, result.map(Payload::into_creatures))
                    }
                    LoaderSlot::Search => {
                        let ok = self.search.complete(ticket, result.map(Payload::into_creatures));
                        if ok {
                            self.search_selection = 0;
                        }
                        ok
                    }
                    LoaderSlot::Detail => self.detail.complete(ticket, result.map(Payload::into_creature)),
                };
                if applied {
                    self.clamp_selection();
                }
            }
        }
    }

    /// Pick up favorites changes published by the store.
    pub fn sync_favorites(&mut self) {
        if !self.favorites_rx.has_changed().unwrap_or(false) {
            return;
        }
        let ids = self.favorites_rx.borrow_and_update().clone();
        if self.route == Route::Favorites {
            self.load_favorites(ids, false);
            self.clamp_selection();
        }
    }

    fn refresh_home_base(&mut self) {
        let base = if self.home.filter().generation.is_some() {
            self.generation.data().clone()
        } else {
            self.catalog.data().clone()
        };
        self.home.set_base(base);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.list_len();
        if self.selection >= len {
            self.selection = len.saturating_sub(1);
        }
    }

    // ----- list navigation -----

    pub fn up(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.selection + 1 < self.list_len() {
            self.selection += 1;
        }
    }

    /// Open the selected row: a category on the types screen, a creature
    /// elsewhere.
    pub fn enter(&mut self) {
        let next = match self.route {
            Route::Types => self
                .categories
                .data()
                .get(self.selection)
                .map(|c| Route::TypeDetail { name: c.name.clone() }),
            Route::Creature { .. } => None,
            _ => self
                .selected_creature()
                .map(|c| Route::Creature { name: c.name.clone() }),
        };
        if let Some(route) = next {
            self.navigate(route);
        }
    }

    pub fn load_more(&mut self) {
        if self.route == Route::Home {
            self.home.load_more();
        }
    }

    pub fn cycle_sort(&mut self) {
        let key = match self.route {
            Route::Home => {
                let key = self.home.sort_key().cycle(false);
                self.home.set_sort(key);
                key
            }
            Route::TypeDetail { .. } => {
                self.members_sort = self.members_sort.cycle(false);
                self.members_sort
            }
            Route::Favorites => {
                self.favorites_sort = self.favorites_sort.cycle(true);
                self.favorites_sort
            }
            _ => return,
        };
        self.selection = 0;
        self.show_toast(format!("Sorted by {}", key.label()));
    }

    // ----- favorites -----

    /// Toggle the favorite flag of a creature shown on the current screen.
    pub fn toggle_favorite_selected(&mut self) {
        let target = match &self.route {
            Route::Creature { .. } => self.detail.data().as_ref(),
            _ => self.selected_creature(),
        }
        .map(|c| (c.pokedex_id, c.name.clone()));
        let Some((id, name)) = target else { return };

        match self.favorites.toggle(id) {
            Ok(true) => self.show_toast(format!("★ {name} added to favorites")),
            Ok(false) => self.show_toast(format!("{name} removed from favorites")),
            Err(e) => log::error!("[favorites] could not save #{id}: {e}"),
        }
        self.sync_favorites();
    }

    pub fn request_clear_favorites(&mut self) {
        if self.route == Route::Favorites && self.favorites.count() > 0 {
            self.input_mode = InputMode::ConfirmClear;
        }
    }

    pub fn confirm_clear_favorites(&mut self) {
        self.input_mode = InputMode::Normal;
        match self.favorites.clear() {
            Ok(()) => self.show_toast("Favorites cleared".to_string()),
            Err(e) => log::error!("[favorites] could not clear: {e}"),
        }
        self.sync_favorites();
    }

    pub fn cancel_clear_favorites(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    // ----- home filter -----

    pub fn start_filter(&mut self) {
        if self.route == Route::Home {
            self.filter_input = self.home.filter().to_query();
            self.input_mode = InputMode::Filter;
        }
    }

    pub fn filter_add_char(&mut self, ch: char) {
        self.filter_input.push(ch);
    }

    pub fn filter_backspace(&mut self) {
        self.filter_input.pop();
    }

    pub fn apply_filter(&mut self) {
        self.input_mode = InputMode::Normal;
        let filter = parse_filter(&self.filter_input);
        self.set_home_filter(filter);
    }

    pub fn cancel_filter(&mut self) {
        self.input_mode = InputMode::Normal;
        self.filter_input = self.home.filter().to_query();
    }

    pub fn clear_filter(&mut self) {
        self.input_mode = InputMode::Normal;
        if self.route != Route::Home {
            return;
        }
        self.set_home_filter(ViewFilter::default());
    }

    /// Step the category criterion through the loaded category list, then
    /// back to "all".
    pub fn cycle_category(&mut self) {
        if self.route != Route::Home {
            return;
        }
        let names: Vec<&str> = self.categories.data().iter().map(|c| c.name.as_str()).collect();
        let current = self.home.filter().category.as_deref();
        let next = match current.and_then(|c| names.iter().position(|n| n.eq_ignore_ascii_case(c))) {
            Some(i) => names.get(i + 1).map(|n| n.to_string()),
            None if current.is_none() => names.first().map(|n| n.to_string()),
            None => None,
        };
        let filter = ViewFilter {
            category: next,
            ..self.home.filter().clone()
        };
        self.set_home_filter(filter);
    }

    /// Step the generation criterion 1..=9, then back to "all".
    pub fn cycle_generation(&mut self) {
        if self.route != Route::Home {
            return;
        }
        let next = match self.home.filter().generation {
            None => GENERATIONS.first().map(|(g, _)| *g),
            Some(g) => GENERATIONS.iter().map(|(n, _)| *n).find(|&n| n > g),
        };
        let filter = ViewFilter {
            generation: next,
            ..self.home.filter().clone()
        };
        self.set_home_filter(filter);
    }

    fn set_home_filter(&mut self, filter: ViewFilter) {
        match filter.generation {
            Some(g) => {
                let t = self.generation.request(g);
                self.dispatch_generation(t, g);
            }
            None => self.generation.reset(),
        }
        self.filter_input = filter.to_query();
        self.home.set_filter(filter);
        self.selection = 0;
        self.refresh_home_base();
    }

    // ----- search overlay -----

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_input.clear();
        self.search_selection = 0;
    }

    pub fn search_add_char(&mut self, ch: char) {
        self.search_input.push(ch);
    }

    pub fn search_backspace(&mut self) {
        self.search_input.pop();
    }

    /// Run the typed query; when it already produced results, open the
    /// highlighted one instead.
    pub fn search_submit(&mut self) {
        let query = self.search_input.trim().to_string();
        if query.is_empty() {
            self.search.reset();
            return;
        }
        let settled = self.search.param() == Some(&query) && self.search.state() == LoadState::Success;
        if settled {
            if let Some(c) = self.search.data().get(self.search_selection) {
                let route = Route::Creature { name: c.name.clone() };
                self.close_search();
                self.navigate(route);
            }
            return;
        }
        // same query after a failure or a cancel: run it again
        let t = self.search.request(query.clone()).or_else(|| {
            if self.search.is_loading() {
                None
            } else {
                self.search.refetch()
            }
        });
        self.dispatch(
            LoaderSlot::Search,
            t,
            Query::Search {
                query,
                limit: SEARCH_LIMIT,
            },
        );
    }

    pub fn search_up(&mut self) {
        self.search_selection = self.search_selection.saturating_sub(1);
    }

    pub fn search_down(&mut self) {
        if self.search_selection + 1 < self.search.data().len() {
            self.search_selection += 1;
        }
    }

    pub fn close_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search.cancel();
    }
}
