//! Filter, sort and "load more" pagination over an in-memory creature list.
//!
//! The displayed subset is a pure function of (base list, filter, sort key,
//! page). Changing the filter or the base list sends the page back to 1.

use crate::types::Creature;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub category: Option<String>,
    pub generation: Option<u32>,
}

impl ViewFilter {
    pub fn is_empty(&self) -> bool {
        self.category_criterion().is_none() && self.generation.is_none()
    }

    fn category_criterion(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn matches(&self, creature: &Creature) -> bool {
        if let Some(category) = self.category_criterion() {
            if !creature.has_category(category) {
                return false;
            }
        }
        if let Some(g) = self.generation {
            if creature.generation != g {
                return false;
            }
        }
        true
    }

    /// Render back into the filter bar syntax.
    pub fn to_query(&self) -> String {
        let mut parts = Vec::new();
        if let Some(c) = self.category_criterion() {
            parts.push(format!("type:{c}"));
        }
        if let Some(g) = self.generation {
            parts.push(format!("gen:{g}"));
        }
        parts.join(" ")
    }
}

/// Compile a filter bar query.
///
/// `type:<name>` (alias `category:`) and `gen:<n>` (alias `generation:`) set a
/// criterion; a bare number is a generation and a bare word a category. Later
/// tokens win. `all` clears the criterion it is given to.
pub fn parse_filter(q: &str) -> ViewFilter {
    let mut f = ViewFilter::default();
    for tok in q.split_whitespace() {
        let mut it = tok.splitn(2, ':');
        match (it.next(), it.next()) {
            (Some(k), Some(v)) => match &*k.to_lowercase() {
                "type" | "category" | "cat" => set_category(&mut f, v),
                "gen" | "generation" | "g" => set_generation(&mut f, v),
                _ => {}
            },
            (Some(bare), None) => {
                if bare.chars().all(|c| c.is_ascii_digit()) {
                    set_generation(&mut f, bare);
                } else {
                    set_category(&mut f, bare);
                }
            }
            _ => {}
        }
    }
    f
}

fn set_category(f: &mut ViewFilter, v: &str) {
    f.category = match v.trim() {
        "" => None,
        s if s.eq_ignore_ascii_case("all") => None,
        s => Some(s.to_string()),
    };
}

fn set_generation(f: &mut ViewFilter, v: &str) {
    if v.eq_ignore_ascii_case("all") {
        f.generation = None;
    } else if let Ok(g) = v.trim().parse::<u32>() {
        f.generation = Some(g);
    }
}

pub fn apply_filter<'a>(list: &'a [Creature], filter: &ViewFilter) -> Vec<&'a Creature> {
    list.iter().filter(|c| filter.matches(c)).collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Category,
    TotalStats,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Id => "number",
            SortKey::Name => "name",
            SortKey::Category => "type",
            SortKey::TotalStats => "total stats",
        }
    }

    /// Next key for the sort toggle. `with_category` includes the type key
    /// (favorites screen only).
    pub fn cycle(self, with_category: bool) -> SortKey {
        match self {
            SortKey::Id => SortKey::Name,
            SortKey::Name if with_category => SortKey::Category,
            SortKey::Name | SortKey::Category => SortKey::TotalStats,
            SortKey::TotalStats => SortKey::Id,
        }
    }
}

/// Stable sort in place.
pub fn sort_creatures(list: &mut [&Creature], key: SortKey) {
    match key {
        SortKey::Id => list.sort_by_key(|c| c.pokedex_id),
        SortKey::Name => list.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::Category => list.sort_by(|a, b| {
            a.primary_category()
                .unwrap_or("")
                .cmp(b.primary_category().unwrap_or(""))
        }),
        SortKey::TotalStats => list.sort_by(|a, b| b.total_stats().cmp(&a.total_stats())),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn visible(&self, len: usize) -> usize {
        self.page.saturating_mul(self.page_size).min(len)
    }

    pub fn has_more(&self, len: usize) -> bool {
        self.visible(len) < len
    }

    pub fn load_more(&mut self) {
        self.page += 1;
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}

/// Base list plus filter, sort key and pager.
#[derive(Clone, Debug, Default)]
pub struct CatalogView {
    base: Vec<Creature>,
    filter: ViewFilter,
    sort: SortKey,
    pager: Pager,
}

impl CatalogView {
    pub fn new(page_size: usize) -> Self {
        Self {
            pager: Pager::new(page_size),
            ..Self::default()
        }
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }
    pub fn sort_key(&self) -> SortKey {
        self.sort
    }
    pub fn pager(&self) -> &Pager {
        &self.pager
    }
    pub fn base(&self) -> &[Creature] {
        &self.base
    }

    pub fn set_base(&mut self, base: Vec<Creature>) {
        self.base = base;
        self.pager.reset();
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        self.filter = filter;
        self.pager.reset();
    }

    pub fn set_sort(&mut self, key: SortKey) {
        self.sort = key;
    }

    pub fn load_more(&mut self) {
        if self.has_more() {
            self.pager.load_more();
        }
    }

    /// Filtered and sorted list, before pagination.
    pub fn filtered(&self) -> Vec<&Creature> {
        let mut list = apply_filter(&self.base, &self.filter);
        sort_creatures(&mut list, self.sort);
        list
    }

    pub fn displayed(&self) -> Vec<&Creature> {
        let mut list = self.filtered();
        let n = self.pager.visible(list.len());
        list.truncate(n);
        list
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.filtered().len())
    }
}
