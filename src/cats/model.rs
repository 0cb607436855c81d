use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "mongo")]
use mongodb::bson::oid::ObjectId;

/// One document of the cats collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cat {
    #[cfg(feature = "mongo")]
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub age: i32,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Cat {
    /// A cat not yet stored; the store assigns its id.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, age: i32, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            #[cfg(feature = "mongo")]
            id: None,
            name: name.into(),
            age,
            features: features.into_iter().map(Into::into).collect(),
        }
    }

    /// Add `feature` unless it is already present. Returns whether it was added.
    pub fn add_feature(&mut self, feature: &str) -> bool {
        if self.features.iter().any(|f| f == feature) {
            return false;
        }
        self.features.push(feature.to_string());
        true
    }

    fn id_text(&self) -> String {
        #[cfg(feature = "mongo")]
        {
            if let Some(id) = &self.id {
                return id.to_hex();
            }
        }
        "None".to_string()
    }
}

/// One-line summary used by the console.
impl fmt::Display for Cat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (age={}) | features: [{}] | _id={}",
            self.name,
            self.age,
            self.features.join(", "),
            self.id_text()
        )
    }
}

/// The three documents seeded into an empty collection.
#[must_use]
pub fn sample_cats() -> Vec<Cat> {
    vec![
        Cat::new("barsik", 3, ["ходить в капці", "дає себе гладити", "рудий"]),
        Cat::new("Lama", 2, ["ходить в лоток", "не дає себе гладити", "сірий"]),
        Cat::new("Liza", 4, ["ходить в лоток", "дає себе гладити", "білий"]),
    ]
}
