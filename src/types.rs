use serde::{Deserialize, Serialize};

use crate::api::FetchError;
use crate::loader::Ticket;

/// Six-field base stat block as served by the catalog API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    #[serde(rename = "HP")]
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl StatBlock {
    /// Sum of the six values, widened so no payload can overflow it.
    pub fn total(&self) -> u64 {
        self.entries().iter().map(|(_, v)| u64::from(*v)).sum()
    }

    /// Labelled values in display order.
    pub fn entries(&self) -> [(&'static str, u32); 6] {
        [
            ("HP", self.hp),
            ("Attack", self.attack),
            ("Defense", self.defense),
            ("Sp. Atk", self.special_attack),
            ("Sp. Def", self.special_defense),
            ("Speed", self.speed),
        ]
    }
}

/// Category tag carried by a creature (`apiTypes` entries).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTag {
    pub name: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionRef {
    pub name: String,
    #[serde(rename = "pokedexId")]
    pub pokedex_id: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resistance {
    pub name: String,
    pub damage_multiplier: f64,
    pub damage_relation: String,
}

/// One catalog record. Unknown fields in the payload are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    #[serde(rename = "pokedexId")]
    pub pokedex_id: u32,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub sprite: String,
    #[serde(default)]
    pub slug: String,
    pub stats: StatBlock,
    #[serde(rename = "apiTypes", default)]
    pub categories: Vec<CategoryTag>,
    #[serde(rename = "apiGeneration")]
    pub generation: u32,
    #[serde(rename = "apiResistances", default)]
    pub resistances: Vec<Resistance>,
    #[serde(rename = "apiEvolutions", default)]
    pub evolutions: Vec<EvolutionRef>,
    #[serde(rename = "apiPreEvolution", default, deserialize_with = "pre_evolution")]
    pub pre_evolution: Option<EvolutionRef>,
}

// The API sends `"none"` instead of null for creatures without a pre-evolution.
fn pre_evolution<'de, D>(de: D) -> Result<Option<EvolutionRef>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(de)?;
    Ok(raw.and_then(|v| serde_json::from_value(v).ok()))
}

impl Creature {
    pub fn total_stats(&self) -> u64 {
        self.stats.total()
    }

    pub fn has_category(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.categories.iter().any(|c| c.name.to_lowercase() == wanted)
    }

    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(|c| c.name.as_str())
    }

    /// A well-formed record carries at least one category.
    pub fn is_well_formed(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// Category entry from `GET /types`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "englishName", default)]
    pub english_name: Option<String>,
}

/// Which loader a completed fetch belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderSlot {
    Catalog,
    Census,
    Generation,
    Categories,
    CategoryMembers,
    Favorites,
    Search,
    Detail,
}

#[derive(Debug)]
pub enum Payload {
    Creatures(Vec<Creature>),
    Creature(Option<Creature>),
    Categories(Vec<Category>),
}

// A slot always receives the payload shape its query produces; the fallbacks
// below only matter if a request was routed to the wrong slot.
impl Payload {
    pub fn into_creatures(self) -> Vec<Creature> {
        match self {
            Payload::Creatures(list) => list,
            Payload::Creature(one) => one.into_iter().collect(),
            Payload::Categories(_) => Vec::new(),
        }
    }

    pub fn into_creature(self) -> Option<Creature> {
        match self {
            Payload::Creature(one) => one,
            Payload::Creatures(list) => list.into_iter().next(),
            Payload::Categories(_) => None,
        }
    }

    pub fn into_categories(self) -> Vec<Category> {
        match self {
            Payload::Categories(list) => list,
            _ => Vec::new(),
        }
    }
}

#[derive(Debug)]
pub enum AppEvent {
    Loaded {
        slot: LoaderSlot,
        ticket: Ticket,
        result: Result<Payload, FetchError>,
    },
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_does_not_overflow_on_huge_stats() {
        let stats = StatBlock {
            hp: u32::MAX,
            attack: 1,
            ..StatBlock::default()
        };
        assert_eq!(stats.total(), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn pre_evolution_none_string_is_absent() {
        let raw = r#"{"id":1,"pokedexId":1,"name":"Bulbizarre",
            "stats":{"HP":45,"attack":49,"defense":49,"special_attack":65,"special_defense":65,"speed":45},
            "apiTypes":[{"name":"Plante","image":""}],"apiGeneration":1,"apiPreEvolution":"none"}"#;
        let c: Creature = serde_json::from_str(raw).unwrap();
        assert!(c.pre_evolution.is_none());
        assert_eq!(c.total_stats(), 318);
    }
}
