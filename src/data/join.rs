//! Region Aligner Module
//! Translates region vocabularies and inner-joins two frames on the result.

use crate::config::RegionMapping;
use crate::data::processor::{DataProcessor, ProcessorError};
use log::{debug, warn};
use polars::prelude::*;
use std::collections::HashMap;

/// Column holding the translated region name.
pub const MAPPED_REGION: &str = "Mapped_Region";

/// Suffixes appended to column names present on both sides of a join.
#[derive(Debug, Clone, Copy)]
pub struct JoinSuffixes<'a> {
    pub left: &'a str,
    pub right: &'a str,
}

impl<'a> JoinSuffixes<'a> {
    pub fn new(left: &'a str, right: &'a str) -> Self {
        Self { left, right }
    }
}

pub struct RegionAligner;

impl RegionAligner {
    /// Add `target_col` holding `mapping[source_col]`, null where unmapped.
    pub fn add_mapped_column(
        df: &DataFrame,
        source_col: &str,
        mapping: &RegionMapping,
        target_col: &str,
    ) -> Result<DataFrame, ProcessorError> {
        let sources = DataProcessor::text_column(df, source_col)?;

        let mut unmapped: Vec<&str> = Vec::new();
        let mapped: Vec<Option<&str>> = sources
            .into_iter()
            .map(|source| {
                let target = source.and_then(|s| mapping.get(s));
                if let (Some(s), None) = (source, target) {
                    if !unmapped.contains(&s) {
                        unmapped.push(s);
                    }
                }
                target
            })
            .collect();

        for region in unmapped {
            warn!("No mapping entry for region '{}', its rows will not be joined", region);
        }

        let mut out = df.clone();
        out.with_column(Column::new(target_col.into(), mapped))?;
        Ok(out)
    }

    /// Inner join on `left[left_on] == right[right_on]`.
    ///
    /// Rows come out in left order, then right order within one key. Null keys
    /// never match. Every column name found on both sides gets its side's
    /// suffix, key columns included.
    pub fn inner_join(
        left: &DataFrame,
        right: &DataFrame,
        left_on: &str,
        right_on: &str,
        suffixes: JoinSuffixes,
    ) -> Result<DataFrame, ProcessorError> {
        let left_keys = DataProcessor::text_column(left, left_on)?;
        let right_keys = DataProcessor::text_column(right, right_on)?;

        let mut index: HashMap<&str, Vec<IdxSize>> = HashMap::new();
        for (row, key) in right_keys.into_iter().enumerate() {
            if let Some(key) = key {
                index.entry(key).or_default().push(row as IdxSize);
            }
        }

        let mut left_idx: Vec<IdxSize> = Vec::new();
        let mut right_idx: Vec<IdxSize> = Vec::new();
        let mut unmatched: Vec<&str> = Vec::new();
        for (row, key) in left_keys.into_iter().enumerate() {
            let Some(key) = key else {
                continue;
            };
            match index.get(key) {
                Some(partners) => {
                    for &partner in partners {
                        left_idx.push(row as IdxSize);
                        right_idx.push(partner);
                    }
                }
                None if !unmatched.contains(&key) => unmatched.push(key),
                None => {}
            }
        }

        for key in unmatched {
            warn!("No '{}' row matches '{}', dropped from the join", right_on, key);
        }

        let mut left_part = left.take(&IdxCa::from_vec("left".into(), left_idx))?;
        let mut right_part = right.take(&IdxCa::from_vec("right".into(), right_idx))?;

        let overlap: Vec<String> = left_part
            .get_column_names()
            .iter()
            .filter(|name| right_part.get_column_index(name.as_str()).is_some())
            .map(|name| name.to_string())
            .collect();
        for name in &overlap {
            left_part.rename(name, format!("{}{}", name, suffixes.left).into())?;
            right_part.rename(name, format!("{}{}", name, suffixes.right).into())?;
        }

        debug!(
            "Joined {} rows on '{}' = '{}' ({} overlapping columns)",
            left_part.height(),
            left_on,
            right_on,
            overlap.len()
        );
        Ok(left_part.hstack(right_part.get_columns())?)
    }

    /// Map `source_col` through `mapping`, then inner-join on the mapped name.
    pub fn align_and_join(
        left: &DataFrame,
        right: &DataFrame,
        source_col: &str,
        mapping: &RegionMapping,
        right_on: &str,
        suffixes: JoinSuffixes,
    ) -> Result<DataFrame, ProcessorError> {
        let aligned = Self::add_mapped_column(left, source_col, mapping, MAPPED_REGION)?;
        Self::inner_join(&aligned, right, MAPPED_REGION, right_on, suffixes)
    }
}
