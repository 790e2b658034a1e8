//! The fixed taxonomy that every location in the feed is reconciled onto.
//!
//! The registry is compiled in and never mutated at runtime. Renderers use
//! the color and marker icon for each category, and the filter bar matches on
//! the numeric-string id.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// One of the seven marker categories. Discriminants match the external id
/// scheme used by the feed, which skips 7 and 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Category {
    #[default]
    #[strum(serialize = "Tourist Attractions")]
    TouristAttractions = 1,
    Activity = 2,
    Hotels = 3,
    Restaurant = 4,
    Beaches = 5,
    Hospitals = 6,
    #[strum(serialize = "Naha Airport")]
    NahaAirport = 9,
}

/// The categories shown when a user has not picked their own set. The app has
/// always shipped with Restaurants off by default.
pub const DEFAULT_SELECTED: [Category; 6] = [
    Category::TouristAttractions,
    Category::Activity,
    Category::Hotels,
    Category::Beaches,
    Category::Hospitals,
    Category::NahaAirport,
];

const MARKER_BASE: &str =
    "https://raw.githubusercontent.com/pointhi/leaflet-color-markers/master/img";

impl Category {
    /// Look up a category from its external id ("1", "2", ... "9"). The
    /// lookup is an exact string match; anything else, including padded or
    /// zero-prefixed numerals, yields `None`, and callers that must always
    /// produce a category fall back to [Category::default].
    pub fn from_id(id: &str) -> Option<Self> {
        Self::iter().find(|c| c.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::TouristAttractions => "1",
            Self::Activity => "2",
            Self::Hotels => "3",
            Self::Restaurant => "4",
            Self::Beaches => "5",
            Self::Hospitals => "6",
            Self::NahaAirport => "9",
        }
    }

    /// Display name, e.g. "Tourist Attractions"
    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::TouristAttractions => "#ff0000",
            Self::Activity => "#00ff00",
            Self::Hotels => "#e3f26f",
            Self::Restaurant => "#ff9933",
            Self::Beaches => "#00ffff",
            Self::Hospitals => "#ffffff",
            Self::NahaAirport => "#8000ff",
        }
    }

    pub fn marker_url(&self) -> String {
        let color = match self {
            Self::TouristAttractions => "red",
            Self::Activity => "green",
            Self::Hotels => "gold",
            Self::Restaurant => "orange",
            Self::Beaches => "blue",
            Self::Hospitals => "grey",
            Self::NahaAirport => "violet",
        };
        format!("{MARKER_BASE}/marker-icon-2x-{color}.png")
    }

    pub fn info(&self) -> CategoryInfo {
        CategoryInfo {
            id: self.id(),
            name: self.name(),
            color: self.color(),
            marker_url: self.marker_url(),
        }
    }
}

/// The registry entry for a category, in the shape consumed by renderers.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub name: String,
    pub color: &'static str,
    pub marker_url: String,
}

// Categories travel over the wire as their external id string.
impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Self::from_id(&id)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown category id '{id}'")))
    }
}

/// Parse a comma-joined id list (the storage format for a user's selected
/// categories), silently dropping ids that are no longer in the registry.
pub fn parse_id_list(list: &str) -> Vec<Category> {
    list.split(',')
        .filter_map(|id| Category::from_id(id))
        .collect()
}

pub fn join_id_list(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.id())
        .collect::<Vec<_>>()
        .join(",")
}
