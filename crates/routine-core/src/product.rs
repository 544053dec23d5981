use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::ProductId;

/// Time-of-day bucket of the routine.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Am, Slot::Pm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }

    /// Exact catalog tag (`"AM"` / `"PM"`). Catalog data is matched strictly.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "AM" => Some(Self::Am),
            "PM" => Some(Self::Pm),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parse for user input (`am`, `PM`, `morning`, ...).
impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "am" | "morning" => Ok(Self::Am),
            "pm" | "evening" | "night" => Ok(Self::Pm),
            other => Err(format!("unknown slot: {other}")),
        }
    }
}

/// A catalog product. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub key_ingredients: Vec<String>,
    #[serde(default, deserialize_with = "known_slots")]
    pub steps: BTreeSet<Slot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Product {
    pub fn used_in(&self, slot: Slot) -> bool {
        self.steps.contains(&slot)
    }

    /// Lowercased `name brand ingredient...` text used by free-text search.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(2 + self.key_ingredients.len());
        parts.push(&self.name);
        parts.push(&self.brand);
        parts.extend(self.key_ingredients.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }
}

// Unknown step tags are dropped rather than failing the whole catalog.
fn known_slots<'de, D>(deserializer: D) -> Result<BTreeSet<Slot>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw.iter().filter_map(|tag| Slot::from_tag(tag)).collect())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_record() {
        let json = r#"{
            "id": "sk-spf50",
            "name": "UV Perfect SPF 50",
            "brand": "L'Oréal Paris",
            "category": "skincare",
            "concerns": ["sun protection", "dullness"],
            "keyIngredients": ["Mexoryl SX", "Vitamin E"],
            "steps": ["AM"],
            "notes": "Apply last in the morning."
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.id.as_str(), "sk-spf50");
        assert_eq!(p.key_ingredients, vec!["Mexoryl SX", "Vitamin E"]);
        assert!(p.used_in(Slot::Am));
        assert!(!p.used_in(Slot::Pm));
        assert_eq!(p.notes.as_deref(), Some("Apply last in the morning."));
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let p: Product =
            serde_json::from_str(r#"{"id": "x", "name": "X", "brand": "B", "category": "c"}"#).unwrap();
        assert!(p.concerns.is_empty());
        assert!(p.key_ingredients.is_empty());
        assert!(p.steps.is_empty());
        assert!(p.notes.is_none());
    }

    #[test]
    fn unknown_and_null_steps_are_ignored() {
        let p: Product = serde_json::from_str(
            r#"{"id": "x", "name": "X", "steps": ["AM", "noon", "PM", "AM"]}"#,
        )
        .unwrap();
        assert_eq!(p.steps.iter().copied().collect::<Vec<_>>(), vec![Slot::Am, Slot::Pm]);

        let p: Product = serde_json::from_str(r#"{"id": "x", "name": "X", "steps": null}"#).unwrap();
        assert!(p.steps.is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let p = fixtures::product("a", "skincare", &["acne"], &[Slot::Pm]);
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("keyIngredients").is_some());
        assert_eq!(v["steps"], serde_json::json!(["PM"]));
        assert!(v.get("notes").is_none());
    }

    #[test]
    fn slot_parsing() {
        assert_eq!("am".parse::<Slot>().unwrap(), Slot::Am);
        assert_eq!(" Evening ".parse::<Slot>().unwrap(), Slot::Pm);
        assert!("noon".parse::<Slot>().is_err());
        assert_eq!(Slot::from_tag("am"), None);
        assert_eq!(Slot::Pm.to_string(), "PM");
    }

    #[test]
    fn search_text_joins_name_brand_ingredients() {
        let mut p = fixtures::product("a", "skincare", &[], &[]);
        p.name = "Revitalift Serum".into();
        p.brand = "L'Oréal".into();
        p.key_ingredients = vec!["Hyaluronic Acid".into()];
        assert_eq!(p.search_text(), "revitalift serum l'oréal hyaluronic acid");
    }
}
