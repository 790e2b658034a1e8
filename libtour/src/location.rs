//! The location normalizer: turns raw feed features of uncertain shape into
//! canonical, display-ready [Location] records.
//!
//! The feed has passed through several upstream data-entry conventions over
//! the years, so the raw contract is deliberately loose: the category may be
//! a string, a number, nested under `original_data`, or missing entirely, and
//! the photo may live under any of four field names. Normalization is total
//! and side-effect-free; it degrades to defaults instead of rejecting a
//! record, preferring always-displayable data over strict validation.

use crate::category::Category;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The loosely-typed properties bag of a raw feed feature. Identifier-like
/// fields are kept as raw JSON values because some upstream sources emit them
/// as numbers.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawProperties {
    pub id: Option<Value>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub map_id: Option<Value>,
    pub pin_id: Option<Value>,
    pub category: Option<Value>,
    pub category_id: Option<Value>,
    pub original_data: Option<OriginalData>,
    pub photo_url: Option<String>,
    pub pic: Option<String>,
    pub image_url: Option<String>,
    pub image: Option<String>,
}

/// The untouched source record that some feed entries carry along.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginalData {
    pub category: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawGeometry {
    pub coordinates: Vec<f64>,
}

/// A single feature from the feed, prior to normalization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawFeature {
    pub geometry: RawGeometry,
    pub properties: RawProperties,
}

/// The FeatureCollection-shaped document served by the feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<RawFeature>,
}

impl FeatureCollection {
    pub fn normalize_all(&self) -> Vec<Location> {
        self.features.iter().map(normalize).collect()
    }
}

/// The canonical record consumed by rendering, search and favorites.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Location {
    pub id: String,
    /// (longitude, latitude), WGS84
    pub coordinates: (f64, f64),
    pub title: String,
    pub description: String,
    pub address: String,
    pub category_id: String,
    /// human-readable name for `category_id`
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_id: Option<String>,
}

impl Location {
    pub fn category_kind(&self) -> Category {
        Category::from_id(&self.category_id).unwrap_or_default()
    }

    /// Case-insensitive substring match over the displayable text fields,
    /// the behavior the search box expects.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.address.to_lowercase().contains(&query)
    }
}

/// String-coerce a raw JSON value the way loosely-typed feeds require:
/// strings pass through, numbers become their decimal form, everything else
/// counts as absent.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RawProperties {
    /// Resolve the category. The candidate value is `original_data.category`
    /// when present, otherwise `category` — the nested value is never skipped
    /// in favor of the direct one, so an unrecognized nested value means the
    /// default category even when `category` would have resolved.
    ///
    /// A candidate that fails to resolve is then checked against
    /// `category_id`, which keeps normalization idempotent: records already
    /// in canonical shape hold the display name in `category` and the
    /// resolved id in `category_id`.
    pub fn resolve_category(&self) -> Category {
        self.explicit_category().unwrap_or_default()
    }

    /// Like [resolve_category](Self::resolve_category), but reports `None`
    /// instead of applying the fallback when nothing resolves.
    pub fn explicit_category(&self) -> Option<Category> {
        self.original_data
            .as_ref()
            .and_then(|o| o.category.as_ref())
            .or(self.category.as_ref())
            .and_then(coerce_string)
            .and_then(|id| Category::from_id(&id))
            .or_else(|| self.canonical_id())
    }

    fn canonical_id(&self) -> Option<Category> {
        self.category_id
            .as_ref()
            .and_then(coerce_string)
            .and_then(|id| Category::from_id(&id))
    }

    /// The first category value present in the record, valid or not. Used by
    /// the audit tooling to report what failed to resolve.
    pub fn raw_category_value(&self) -> Option<String> {
        [
            self.original_data.as_ref().and_then(|o| o.category.as_ref()),
            self.category.as_ref(),
            self.category_id.as_ref(),
        ]
        .into_iter()
        .flatten()
        .find_map(coerce_string)
    }

    /// Probe the four photo conventions in priority order. Empty strings
    /// count as absent, matching the old falsy-chain behavior.
    pub fn resolve_photo(&self) -> Option<String> {
        [&self.photo_url, &self.pic, &self.image_url, &self.image]
            .into_iter()
            .flatten()
            .find(|url| !url.is_empty())
            .cloned()
    }
}

/// Produce the canonical [Location] for a raw feature. Total: every input
/// yields a best-effort record, never an error.
pub fn normalize(feature: &RawFeature) -> Location {
    let props = &feature.properties;
    let category = props.resolve_category();
    let mut coords = feature.geometry.coordinates.iter().copied();
    let longitude = coords.next().unwrap_or_default();
    let latitude = coords.next().unwrap_or_default();

    Location {
        id: props.id.as_ref().and_then(coerce_string).unwrap_or_default(),
        coordinates: (longitude, latitude),
        title: props.title.clone().unwrap_or_default(),
        description: props.description.clone().unwrap_or_default(),
        address: props.address.clone().unwrap_or_default(),
        category_id: category.id().to_string(),
        category: category.name(),
        pic: props.resolve_photo(),
        map_id: props.map_id.as_ref().and_then(coerce_string),
        pin_id: props.pin_id.as_ref().and_then(coerce_string),
    }
}
