//! This is a library that provides the data model for an interactive tourist
//! map: a fixed category taxonomy, a normalizer that reconciles heterogeneous
//! location feeds onto that taxonomy, a client for the hosted OAuth identity
//! provider, and persistence for per-user state (favorites, travel logs, map
//! settings).

use serde::{Deserialize, Deserializer};
use std::str::FromStr;

pub mod auth;
pub mod category;
pub mod database;
pub mod error;
pub mod favorite;
pub mod feed;
pub mod location;
pub mod travellog;
pub mod user;

pub use database::Database;
pub use error::Error;
pub use error::Result;

pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s)
            .map_err(serde::de::Error::custom)
            .map(Some),
    }
}
