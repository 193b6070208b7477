//! Data Processor Module
//! Column renames, derived columns, allow-list filtering and per-group maxima.

use log::debug;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
}

/// Row selection: a categorical allow-list plus an optional exact period.
#[derive(Debug, Clone, Copy)]
pub struct RowFilter<'a> {
    column: &'a str,
    allow: &'a HashSet<String>,
    period: Option<(&'a str, i64)>,
}

impl<'a> RowFilter<'a> {
    pub fn new(column: &'a str, allow: &'a HashSet<String>) -> Self {
        Self {
            column,
            allow,
            period: None,
        }
    }

    /// Additionally require `column == value`.
    pub fn with_period(mut self, column: &'a str, value: i64) -> Self {
        self.period = Some((column, value));
        self
    }
}

/// Handles the table transformations behind every chart.
pub struct DataProcessor;

impl DataProcessor {
    /// Rename columns. Old names that are absent are skipped.
    pub fn rename_columns(
        df: &DataFrame,
        renames: &[(&str, &str)],
    ) -> Result<DataFrame, ProcessorError> {
        let mut out = df.clone();
        for &(old, new) in renames {
            if out.get_column_index(old).is_none() {
                debug!("Column '{}' not present, rename skipped", old);
                continue;
            }
            out.rename(old, new.into())?;
        }
        Ok(out)
    }

    /// Add `target` computed element-wise from `source`. Nulls stay null.
    pub fn derive_column(
        df: &DataFrame,
        source: &str,
        target: &str,
        transform: impl Fn(f64) -> f64,
    ) -> Result<DataFrame, ProcessorError> {
        let values = Self::float_column(df, source)?;
        let derived: Vec<Option<f64>> = values.into_iter().map(|v| v.map(&transform)).collect();

        let mut out = df.clone();
        out.with_column(Column::new(target.into(), derived))?;
        Ok(out)
    }

    /// Keep rows whose category is allowed (and whose period matches, if set).
    ///
    /// Row order is preserved; no match gives an empty frame.
    pub fn filter_rows(df: &DataFrame, filter: &RowFilter) -> Result<DataFrame, ProcessorError> {
        let categories = Self::text_column(df, filter.column)?;
        let mut keep: Vec<bool> = categories
            .into_iter()
            .map(|v| v.is_some_and(|s| filter.allow.contains(s)))
            .collect();

        if let Some((period_col, value)) = filter.period {
            let periods = Self::int_column(df, period_col)?;
            for (flag, period) in keep.iter_mut().zip(periods.into_iter()) {
                *flag = *flag && period == Some(value);
            }
        }

        let mask = BooleanChunked::from_slice("mask".into(), &keep);
        let filtered = df.filter(&mask)?;
        debug!(
            "Filter on '{}' kept {} of {} rows",
            filter.column,
            filtered.height(),
            df.height()
        );
        Ok(filtered)
    }

    /// One row per `(group_cols[0], group_cols[1])` pair: the row holding the
    /// largest `metric`.
    ///
    /// The first row wins on ties. Groups keep their first-appearance order.
    /// Null and NaN metrics are ignored, so a group with no defined metric
    /// produces no row. Rows with a null key are not grouped.
    pub fn select_leading(
        df: &DataFrame,
        group_cols: [&str; 2],
        metric: &str,
    ) -> Result<DataFrame, ProcessorError> {
        let first = Self::text_column(df, group_cols[0])?;
        let second = Self::text_column(df, group_cols[1])?;
        let values = Self::float_column(df, metric)?;

        let mut slots: HashMap<(&str, &str), usize> = HashMap::new();
        let mut best: Vec<Option<(IdxSize, f64)>> = Vec::new();

        let rows = first.into_iter().zip(second.into_iter()).zip(values.into_iter());
        for (row, ((a, b), value)) in rows.enumerate() {
            let (Some(a), Some(b)) = (a, b) else {
                continue;
            };
            let slot = *slots.entry((a, b)).or_insert_with(|| {
                best.push(None);
                best.len() - 1
            });

            let Some(value) = value.filter(|v| !v.is_nan()) else {
                continue;
            };
            match best[slot] {
                Some((_, current)) if value <= current => {}
                _ => best[slot] = Some((row as IdxSize, value)),
            }
        }

        let indices: Vec<IdxSize> = best.into_iter().flatten().map(|(row, _)| row).collect();
        debug!(
            "Selected {} leading rows from {} groups",
            indices.len(),
            slots.len()
        );
        let idx = IdxCa::from_vec("idx".into(), indices);
        Ok(df.take(&idx)?)
    }

    pub(crate) fn text_column(df: &DataFrame, name: &str) -> Result<StringChunked, ProcessorError> {
        let column = df
            .column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))?;
        Ok(column.cast(&DataType::String)?.str()?.clone())
    }

    pub(crate) fn float_column(
        df: &DataFrame,
        name: &str,
    ) -> Result<Float64Chunked, ProcessorError> {
        let column = df
            .column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))?;
        Ok(column.cast(&DataType::Float64)?.f64()?.clone())
    }

    pub(crate) fn int_column(df: &DataFrame, name: &str) -> Result<Int64Chunked, ProcessorError> {
        let column = df
            .column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))?;
        Ok(column.cast(&DataType::Int64)?.i64()?.clone())
    }
}
