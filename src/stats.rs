//! Aggregate numbers for the home and types screens.

use crate::types::{Category, Creature};

/// Shown when no creature has been loaded yet.
pub const DEFAULT_GENERATIONS: u32 = 9;

pub const GENERATIONS: [(u32, &str); 9] = [
    (1, "Kanto"),
    (2, "Johto"),
    (3, "Hoenn"),
    (4, "Sinnoh"),
    (5, "Unova"),
    (6, "Kalos"),
    (7, "Alola"),
    (8, "Galar"),
    (9, "Paldea"),
];

pub fn generation_label(g: u32) -> Option<&'static str> {
    GENERATIONS.iter().find(|(n, _)| *n == g).map(|(_, l)| *l)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogSummary {
    pub creatures: usize,
    pub categories: usize,
    pub generations: u32,
}

pub fn summary(creatures: &[Creature], categories: &[Category]) -> CatalogSummary {
    CatalogSummary {
        creatures: creatures.len(),
        categories: categories.len(),
        generations: creatures
            .iter()
            .map(|c| c.generation)
            .max()
            .unwrap_or(DEFAULT_GENERATIONS),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub rows: Vec<CategoryCount>,
}

impl CategoryCounts {
    pub fn max(&self) -> usize {
        self.rows.iter().map(|r| r.count).max().unwrap_or(0)
    }

    /// Rounded mean count per category, 0 when there are no categories.
    pub fn average(&self) -> usize {
        if self.rows.is_empty() {
            return 0;
        }
        let sum: usize = self.rows.iter().map(|r| r.count).sum();
        let n = self.rows.len();
        (sum + n / 2) / n
    }

    /// `n` most populated categories, ties kept in category order.
    pub fn top(&self, n: usize) -> Vec<&CategoryCount> {
        let mut rows: Vec<&CategoryCount> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows.truncate(n);
        rows
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.rows.iter().find(|r| r.name == name).map(|r| r.count)
    }
}

/// Per-category record counts (exact name match), in category order.
pub fn category_counts(creatures: &[Creature], categories: &[Category]) -> CategoryCounts {
    let rows = categories
        .iter()
        .map(|cat| CategoryCount {
            name: cat.name.clone(),
            count: creatures
                .iter()
                .filter(|c| c.categories.iter().any(|t| t.name == cat.name))
                .count(),
        })
        .collect();
    CategoryCounts { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategoryTag, StatBlock};

    fn creature(id: u32, tags: &[&str], generation: u32) -> Creature {
        Creature {
            id,
            pokedex_id: id,
            name: format!("c{id}"),
            image: String::new(),
            sprite: String::new(),
            slug: String::new(),
            stats: StatBlock::default(),
            categories: tags
                .iter()
                .map(|t| CategoryTag {
                    name: t.to_string(),
                    image: String::new(),
                })
                .collect(),
            generation,
            resistances: Vec::new(),
            evolutions: Vec::new(),
            pre_evolution: None,
        }
    }

    fn category(id: u32, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            image: String::new(),
            english_name: None,
        }
    }

    #[test]
    fn summary_defaults_to_nine_generations() {
        let s = summary(&[], &[category(1, "Feu")]);
        assert_eq!(s.creatures, 0);
        assert_eq!(s.categories, 1);
        assert_eq!(s.generations, DEFAULT_GENERATIONS);

        let s = summary(&[creature(1, &["Feu"], 1), creature(2, &["Eau"], 4)], &[]);
        assert_eq!(s.generations, 4);
    }

    #[test]
    fn counts_max_average_and_top() {
        let creatures = vec![
            creature(1, &["Feu"], 1),
            creature(2, &["Feu", "Vol"], 1),
            creature(3, &["Eau"], 1),
            creature(4, &["Feu"], 2),
        ];
        let categories = vec![category(1, "Eau"), category(2, "Feu"), category(3, "Vol"), category(4, "Sol")];
        let counts = category_counts(&creatures, &categories);

        assert_eq!(counts.get("Feu"), Some(3));
        assert_eq!(counts.get("Sol"), Some(0));
        assert_eq!(counts.max(), 3);
        // (1 + 3 + 1 + 0) / 4 = 1.25
        assert_eq!(counts.average(), 1);
        let top: Vec<&str> = counts.top(2).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(top, vec!["Feu", "Eau"]);
    }

    #[test]
    fn generation_labels() {
        assert_eq!(generation_label(1), Some("Kanto"));
        assert_eq!(generation_label(9), Some("Paldea"));
        assert_eq!(generation_label(10), None);
    }
}
