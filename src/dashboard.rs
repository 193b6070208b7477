//! Dashboard Module
//! Owns the configuration and dataset cache, and prepares views on demand.

use crate::charts::{pipeline, ChartData, ChartKind};
use crate::config::DashboardConfig;
use crate::data::{Dataset, DatasetCache, LoaderError, ProcessorError};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("Processing failed: {0}")]
    Process(#[from] ProcessorError),
}

/// Prepares chart data lazily; each source file is read at most once.
pub struct Dashboard {
    config: DashboardConfig,
    cache: DatasetCache,
}

impl Dashboard {
    pub fn new(data_dir: impl Into<PathBuf>, config: DashboardConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(data_dir),
        }
    }

    pub fn is_loaded(&self, dataset: Dataset) -> bool {
        self.cache.is_loaded(dataset)
    }

    /// Run the pipeline behind one view.
    pub fn prepare(&mut self, kind: ChartKind) -> Result<ChartData, PipelineError> {
        let start = Instant::now();
        debug!("Preparing '{}' from {:?}", kind.label(), kind.datasets());
        let table = match kind {
            ChartKind::MortalityRates => {
                pipeline::mortality_rates(&self.cache.get(Dataset::ChildMortalityAfrica)?)?
            }
            ChartKind::InfantDeaths => {
                pipeline::infant_deaths(&self.cache.get(Dataset::InfantDeathsAfrica)?)?
            }
            ChartKind::MortalityMap => {
                let df = self.cache.get(Dataset::ChildMortality)?;
                pipeline::mortality_map(&df, &self.config)?
            }
            ChartKind::LeadingCauses => {
                let df = self.cache.get(Dataset::CausesOfDeath)?;
                pipeline::leading_causes(&df, &self.config)?
            }
            ChartKind::AttendanceVsMortality => {
                let births = self.cache.get(Dataset::BirthsAttended)?;
                let mortality = self.cache.get(Dataset::ChildMortality)?;
                pipeline::attendance_vs_mortality(&births, &mortality, &self.config)?
            }
        };

        let chart = ChartData::from_table(kind, table)?;
        info!(
            "Prepared '{}' ({} items) in {:?}",
            kind.label(),
            chart.len(),
            start.elapsed()
        );
        Ok(chart)
    }

    /// Prepare every view in sidebar order, stopping at the first failure.
    pub fn prepare_all(&mut self) -> Result<Vec<ChartData>, PipelineError> {
        ChartKind::ALL
            .iter()
            .map(|&kind| self.prepare(kind))
            .collect()
    }
}
