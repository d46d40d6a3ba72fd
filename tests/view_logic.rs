//! Filter, sort and pagination properties over a synthetic catalog

use dexterm::types::{CategoryTag, Creature, StatBlock};
use dexterm::view::{apply_filter, sort_creatures, CatalogView, SortKey, ViewFilter};

const CATEGORIES: [&str; 4] = ["Feu", "Eau", "Plante", "Vol"];

fn creature(id: u32) -> Creature {
    let first = CATEGORIES[(id % 4) as usize];
    let mut categories = vec![CategoryTag {
        name: first.to_string(),
        image: String::new(),
    }];
    if id % 5 == 0 {
        categories.push(CategoryTag {
            name: "Vol".to_string(),
            image: String::new(),
        });
    }
    Creature {
        id,
        pokedex_id: id,
        name: format!("{}mon", (b'a' + (id * 7 % 26) as u8) as char),
        image: String::new(),
        sprite: String::new(),
        slug: String::new(),
        stats: StatBlock {
            hp: (id * 37) % 120,
            attack: (id * 11) % 90,
            defense: 40,
            special_attack: 50,
            special_defense: 50,
            speed: (id * 13) % 100,
        },
        categories,
        generation: 1 + id % 3,
        resistances: Vec::new(),
        evolutions: Vec::new(),
        pre_evolution: None,
    }
}

fn catalog() -> Vec<Creature> {
    (1..=60).map(creature).collect()
}

#[test]
fn filtered_records_match_every_criterion() {
    let list = catalog();
    let filters = [
        ViewFilter::default(),
        ViewFilter { category: Some("vol".into()), generation: None },
        ViewFilter { category: None, generation: Some(2) },
        ViewFilter { category: Some("Feu".into()), generation: Some(3) },
    ];
    for filter in &filters {
        let out = apply_filter(&list, filter);
        for c in &out {
            if let Some(cat) = &filter.category {
                assert!(c.categories.iter().any(|t| t.name.eq_ignore_ascii_case(cat)));
            }
            if let Some(g) = filter.generation {
                assert_eq!(c.generation, g);
            }
        }
        // nothing matching was dropped
        let expected = list.iter().filter(|c| filter.matches(c)).count();
        assert_eq!(out.len(), expected);
    }
}

#[test]
fn empty_filter_is_identity_and_filtering_is_idempotent() {
    let list = catalog();
    let all = apply_filter(&list, &ViewFilter::default());
    assert_eq!(all.len(), list.len());

    let filter = ViewFilter { category: Some("Eau".into()), generation: Some(1) };
    let once: Vec<Creature> = apply_filter(&list, &filter).into_iter().cloned().collect();
    let twice = apply_filter(&once, &filter);
    assert_eq!(twice.len(), once.len());
}

#[test]
fn total_stats_sort_is_descending_and_stable() {
    let list = catalog();
    let mut refs: Vec<&Creature> = list.iter().collect();
    sort_creatures(&mut refs, SortKey::TotalStats);
    for pair in refs.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(a.total_stats() >= b.total_stats());
        if a.total_stats() == b.total_stats() {
            assert!(a.pokedex_id < b.pokedex_id);
        }
    }
}

#[test]
fn name_and_id_sorts_order_ascending() {
    let list = catalog();
    let mut refs: Vec<&Creature> = list.iter().rev().collect();
    sort_creatures(&mut refs, SortKey::Id);
    assert!(refs.windows(2).all(|p| p[0].pokedex_id < p[1].pokedex_id));
    sort_creatures(&mut refs, SortKey::Name);
    assert!(refs.windows(2).all(|p| p[0].name <= p[1].name));
}

#[test]
fn pages_grow_as_stable_prefixes() {
    let mut view = CatalogView::new(20);
    view.set_base(catalog());
    view.set_sort(SortKey::TotalStats);

    let page1: Vec<u32> = view.displayed().iter().map(|c| c.pokedex_id).collect();
    assert_eq!(page1.len(), 20);
    view.load_more();
    let page2: Vec<u32> = view.displayed().iter().map(|c| c.pokedex_id).collect();
    assert_eq!(page2.len(), 40);
    assert_eq!(&page2[..20], &page1[..]);

    view.load_more();
    assert_eq!(view.displayed().len(), 60);
    assert!(!view.has_more());
    view.load_more();
    assert_eq!(view.pager().page(), 3);
}

#[test]
fn filter_or_base_change_resets_to_first_page() {
    let mut view = CatalogView::new(10);
    view.set_base(catalog());
    view.load_more();
    assert_eq!(view.displayed().len(), 20);

    view.set_filter(ViewFilter { category: None, generation: Some(1) });
    assert_eq!(view.pager().page(), 1);
    assert_eq!(view.displayed().len(), 10);
    assert_eq!(view.filtered().len(), 20);

    view.load_more();
    view.set_base(catalog().into_iter().take(15).collect());
    assert_eq!(view.pager().page(), 1);
    assert_eq!(view.displayed().len(), 5);
}
