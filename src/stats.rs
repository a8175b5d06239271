// src/stats.rs

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;

use crate::process::Record;

/// Person counts keyed by zip code. Values stay untyped text, exactly as
/// they appear in the source rows.
pub type ZipCounts = IndexMap<String, String>;
/// Zip-code counts grouped by age.
pub type AgeGroups = IndexMap<String, ZipCounts>;
/// Age groups grouped by city code.
pub type CityGroups = IndexMap<String, AgeGroups>;

/// Population statistics nested year → city → age → zip code → persons.
///
/// Every level is an insertion-ordered map, so keys come out in the order
/// they were first seen in the input.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Statistics {
    pub by_year: IndexMap<String, CityGroups>,
}

/// Fold records into the nested mapping.
///
/// Grouping is keyed per nesting level: every record lands in the group
/// for its own (year, city, age) triple no matter which keys changed
/// since the previous record, so input sorted by (year, city, age) comes
/// out grouped in source order, and unsorted input still groups
/// correctly. A zip code repeated within one group keeps the last count
/// seen.
pub fn aggregate<I>(records: I) -> Statistics
where
    I: IntoIterator<Item = Record>,
{
    let mut stats = Statistics::default();
    for r in records {
        stats
            .by_year
            .entry(r.year)
            .or_default()
            .entry(r.city)
            .or_default()
            .entry(r.age)
            .or_default()
            .insert(r.zip_code, r.persons);
    }
    stats
}

/// Render the statistics as pretty-printed JSON, key order preserved.
pub fn render_json(stats: &Statistics) -> Result<String> {
    serde_json::to_string_pretty(stats).context("serializing statistics to JSON")
}
