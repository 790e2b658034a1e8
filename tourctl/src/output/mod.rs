//! Utilities for printing command results
use crate::table::TourctlTable;
use clap::ValueEnum;
use serde::Serialize;
use tabled::{Table, Tabled};

pub(crate) mod rows;

/// Data format for printing command results
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub(crate) enum OutputFormat {
    /// Human readable table of data
    Table,
    /// JSON-formatted objects
    Json,
}

/// Serialize a sequence of objects into the given data format
pub(crate) fn format_seq<I>(items: I, fmt: OutputFormat) -> anyhow::Result<String>
where
    I: IntoIterator,
    <I as IntoIterator>::Item: Tabled + Serialize + 'static,
{
    let iter = items.into_iter();
    match fmt {
        OutputFormat::Table => {
            let mut table = Table::new(iter);
            let n = table.count_rows().saturating_sub(1);
            Ok(format!("{}\n{} records found", table.styled(), n))
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(&iter.collect::<Vec<_>>()).map_err(|e| e.into())
        }
    }
}
