//! Aggregations over the enriched table. `None` values are excluded from every
//! aggregate, and empty inputs yield `None` rather than NaN.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CdfPoint {
    pub value: f64,
    pub cumulative_share: f64,
}

pub fn count_distinct<'a, I>(ids: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter().collect::<HashSet<_>>().len()
}

pub fn median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut values: Vec<f64> = values.into_iter().flatten().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Step points of the empirical CDF: one point per distinct value, carrying the
/// share of values less than or equal to it.
pub fn empirical_cdf<I>(values: I) -> Vec<CdfPoint>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut values: Vec<f64> = values.into_iter().flatten().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return Vec::new();
    }
    values.sort_by(f64::total_cmp);
    let total = values.len() as f64;

    let mut points: Vec<CdfPoint> = Vec::new();
    for (idx, value) in values.iter().enumerate() {
        let cumulative_share = (idx + 1) as f64 / total;
        match points.last_mut() {
            Some(last) if last.value == *value => last.cumulative_share = cumulative_share,
            _ => points.push(CdfPoint {
                value: *value,
                cumulative_share,
            }),
        }
    }
    points
}

/// Share of items matching `predicate`; `None` for an empty input.
pub fn share<T, I, F>(items: I, mut predicate: F) -> Option<f64>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> bool,
{
    let mut total = 0usize;
    let mut matched = 0usize;
    for item in items {
        total += 1;
        if predicate(&item) {
            matched += 1;
        }
    }
    if total == 0 {
        None
    } else {
        Some(matched as f64 / total as f64)
    }
}

pub fn count_by<T, K, I, F>(items: I, mut key: F) -> BTreeMap<K, usize>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(key(&item)).or_insert(0) += 1;
    }
    counts
}
