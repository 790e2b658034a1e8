use libtour::{
    category::Category,
    favorite::Favorite,
    location::{Location, RawFeature},
};
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct LocationRow {
    id: String,
    title: String,
    category: String,
    address: String,
    #[tabled(display("tabled::derive::display::option", ""))]
    pin_id: Option<String>,
}

impl From<Location> for LocationRow {
    fn from(loc: Location) -> Self {
        Self {
            id: loc.id,
            title: loc.title,
            category: loc.category,
            address: loc.address,
            pin_id: loc.pin_id,
        }
    }
}

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct CategoryRow {
    id: &'static str,
    name: String,
    color: &'static str,
    marker_url: String,
}

impl From<Category> for CategoryRow {
    fn from(category: Category) -> Self {
        let info = category.info();
        Self {
            id: info.id,
            name: info.name,
            color: info.color,
            marker_url: info.marker_url,
        }
    }
}

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct AuditRow {
    id: String,
    title: String,
    #[tabled(display("tabled::derive::display::option", ""))]
    raw_category: Option<String>,
    fallback: String,
}

impl AuditRow {
    pub(crate) fn new(feature: &RawFeature) -> Self {
        let props = &feature.properties;
        Self {
            id: props
                .id
                .as_ref()
                .map(|v| v.to_string().trim_matches('"').to_string())
                .unwrap_or_default(),
            title: props.title.clone().unwrap_or_default(),
            raw_category: props.raw_category_value(),
            fallback: props.resolve_category().name(),
        }
    }
}

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct FavoriteRow {
    id: i64,
    pin_id: String,
}

impl From<Favorite> for FavoriteRow {
    fn from(favorite: Favorite) -> Self {
        Self {
            id: favorite.id,
            pin_id: favorite.pin_id,
        }
    }
}
