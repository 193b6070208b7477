//! Chart Pipelines
//! Pure functions from loaded datasets to the tables each chart displays.

use crate::config::DashboardConfig;
use crate::data::{
    DataProcessor, Dataset, JoinSuffixes, ProcessorError, RegionAligner, RowFilter, MAPPED_REGION,
};
use log::debug;
use polars::prelude::*;
use std::collections::HashSet;

pub const MORTALITY_RATE: &str = "Under-five mortality rate";
pub const MORTALITY_RATE_PER_100: &str = "Under-five mortality rate (per 100 live births)";
pub const MAP_RATE: &str = "Mortality Rate";
pub const DEATHS: &str = "Deaths";
pub const DEATHS_MILLIONS: &str = "Deaths (millions)";
pub const ATTENDED: &str = "Births attended by skilled health staff (% of total)";
pub const CAUSE_VALUE: &str = "FactValueNumeric";

const DEATHS_PER_MILLION: f64 = 1e6;

/// The five views offered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    MortalityRates,
    InfantDeaths,
    MortalityMap,
    LeadingCauses,
    AttendanceVsMortality,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::MortalityRates,
        ChartKind::InfantDeaths,
        ChartKind::MortalityMap,
        ChartKind::LeadingCauses,
        ChartKind::AttendanceVsMortality,
    ];

    /// Sidebar option text.
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::MortalityRates => "Child and Infant Mortality Rates",
            ChartKind::InfantDeaths => "Infant Deaths",
            ChartKind::MortalityMap => "Under-Five Mortality Map",
            ChartKind::LeadingCauses => "Leading Causes of Death",
            ChartKind::AttendanceVsMortality => "Healthcare Attendance vs Mortality Rate",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::MortalityRates => {
                "Trends in Child and Infant Mortality Rates in Africa (1932–2022)"
            }
            ChartKind::InfantDeaths => "Infant Deaths in Africa (1950–2023)",
            ChartKind::MortalityMap => "Under-Five Mortality Rates in Africa (2022)",
            ChartKind::LeadingCauses => "Leading Causes of Death in African Countries (2017)",
            ChartKind::AttendanceVsMortality => {
                "Healthcare Attendance vs Under-five Mortality Rate (2019)"
            }
        }
    }

    pub fn x_label(self) -> &'static str {
        match self {
            ChartKind::MortalityRates | ChartKind::InfantDeaths => "Year",
            ChartKind::MortalityMap => "Deaths per 100 live births",
            ChartKind::LeadingCauses => "Country",
            ChartKind::AttendanceVsMortality => {
                "Percentage of Births Attended by Skilled Health Staff"
            }
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            ChartKind::MortalityRates => "Deaths per 100 live births",
            ChartKind::InfantDeaths => "Deaths (in millions)",
            ChartKind::MortalityMap => "Country",
            ChartKind::LeadingCauses => "Percentage of Deaths Due to Cause (%)",
            ChartKind::AttendanceVsMortality => "Under-five Mortality Rate (per 1,000 live births)",
        }
    }

    /// Source files the view's pipeline reads.
    pub fn datasets(self) -> &'static [Dataset] {
        match self {
            ChartKind::MortalityRates => &[Dataset::ChildMortalityAfrica],
            ChartKind::InfantDeaths => &[Dataset::InfantDeathsAfrica],
            ChartKind::MortalityMap => &[Dataset::ChildMortality],
            ChartKind::LeadingCauses => &[Dataset::CausesOfDeath],
            ChartKind::AttendanceVsMortality => &[Dataset::BirthsAttended, Dataset::ChildMortality],
        }
    }
}

/// Mortality trend: rename the rate to a self-describing column.
pub fn mortality_rates(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
    DataProcessor::rename_columns(df, &[(MORTALITY_RATE, MORTALITY_RATE_PER_100)])
}

/// Infant deaths with a derived count in millions.
pub fn infant_deaths(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
    DataProcessor::derive_column(df, DEATHS, DEATHS_MILLIONS, |deaths| {
        deaths / DEATHS_PER_MILLION
    })
}

/// African countries in the map year, rate renamed to `Mortality Rate`.
pub fn mortality_map(df: &DataFrame, config: &DashboardConfig) -> Result<DataFrame, ProcessorError> {
    let filter =
        RowFilter::new("Entity", &config.african_countries).with_period("Year", config.map_year);
    let filtered = DataProcessor::filter_rows(df, &filter)?;
    DataProcessor::rename_columns(&filtered, &[(MORTALITY_RATE, MAP_RATE)])
}

/// Leading cause per country and age group for the configured period.
pub fn leading_causes(df: &DataFrame, config: &DashboardConfig) -> Result<DataFrame, ProcessorError> {
    let by_country = DataProcessor::filter_rows(
        df,
        &RowFilter::new("Location", &config.cause_locations)
            .with_period("Period", config.causes_period),
    )?;
    let by_age = DataProcessor::filter_rows(&by_country, &RowFilter::new("Dim1", &config.age_groups))?;
    DataProcessor::select_leading(&by_age, ["Location", "Dim1"], CAUSE_VALUE)
}

/// Births attended joined with under-five mortality on the SDG region name.
pub fn attendance_vs_mortality(
    births: &DataFrame,
    mortality: &DataFrame,
    config: &DashboardConfig,
) -> Result<DataFrame, ProcessorError> {
    let year = config.comparison_year;
    let sources = config.region_mapping.sources();
    let targets = config.region_mapping.targets();

    let births_year =
        DataProcessor::filter_rows(births, &RowFilter::new("Entity", &sources).with_period("Year", year))?;
    let mortality_year = DataProcessor::filter_rows(
        mortality,
        &RowFilter::new("Entity", &targets).with_period("Year", year),
    )?;

    RegionAligner::align_and_join(
        &births_year,
        &mortality_year,
        "Entity",
        &config.region_mapping,
        "Entity",
        JoinSuffixes::new("_births", "_mortality"),
    )
}

/// One bar of the leading-causes chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CauseBar {
    pub location: String,
    pub age_group: String,
    pub cause: String,
    pub value: f64,
}

/// One point of the attendance scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPoint {
    pub region: String,
    pub attended: f64,
    pub mortality: f64,
}

/// Plot-ready values for a view.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSeries {
    /// (Year, value) pairs in row order.
    Line(Vec<[f64; 2]>),
    /// Country and rate, highest rate first.
    Ranking(Vec<(String, f64)>),
    Causes(Vec<CauseBar>),
    Scatter(Vec<RegionPoint>),
}

/// A prepared view: the final table plus what the plot needs from it.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub kind: ChartKind,
    pub table: DataFrame,
    pub series: ChartSeries,
}

impl ChartData {
    /// Extract the plotted columns from a pipeline's output table.
    /// Rows with a null in any plotted column are left out of the series.
    pub fn from_table(kind: ChartKind, table: DataFrame) -> Result<Self, ProcessorError> {
        let series = match kind {
            ChartKind::MortalityRates => line_points(&table, "Year", MORTALITY_RATE_PER_100)?,
            ChartKind::InfantDeaths => line_points(&table, "Year", DEATHS_MILLIONS)?,
            ChartKind::MortalityMap => {
                let countries = DataProcessor::text_column(&table, "Entity")?;
                let rates = DataProcessor::float_column(&table, MAP_RATE)?;
                let mut ranking: Vec<(String, f64)> = countries
                    .into_iter()
                    .zip(rates.into_iter())
                    .filter_map(|(c, r)| Some((c?.to_string(), r?)))
                    .collect();
                ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                ChartSeries::Ranking(ranking)
            }
            ChartKind::LeadingCauses => {
                let locations = DataProcessor::text_column(&table, "Location")?;
                let ages = DataProcessor::text_column(&table, "Dim1")?;
                let causes = DataProcessor::text_column(&table, "Dim2")?;
                let values = DataProcessor::float_column(&table, CAUSE_VALUE)?;
                let bars = locations
                    .into_iter()
                    .zip(ages.into_iter())
                    .zip(causes.into_iter())
                    .zip(values.into_iter())
                    .filter_map(|(((l, a), c), v)| {
                        Some(CauseBar {
                            location: l?.to_string(),
                            age_group: a?.to_string(),
                            cause: c?.to_string(),
                            value: v?,
                        })
                    })
                    .collect();
                ChartSeries::Causes(bars)
            }
            ChartKind::AttendanceVsMortality => {
                let regions = DataProcessor::text_column(&table, MAPPED_REGION)?;
                let attended = DataProcessor::float_column(&table, ATTENDED)?;
                let mortality = DataProcessor::float_column(&table, MORTALITY_RATE)?;
                let points = regions
                    .into_iter()
                    .zip(attended.into_iter())
                    .zip(mortality.into_iter())
                    .filter_map(|((r, a), m)| {
                        Some(RegionPoint {
                            region: r?.to_string(),
                            attended: a?,
                            mortality: m?,
                        })
                    })
                    .collect();
                ChartSeries::Scatter(points)
            }
        };

        debug!("Prepared '{}' from {} rows", kind.label(), table.height());
        Ok(Self {
            kind,
            table,
            series,
        })
    }

    /// Number of plotted items.
    pub fn len(&self) -> usize {
        match &self.series {
            ChartSeries::Line(points) => points.len(),
            ChartSeries::Ranking(rows) => rows.len(),
            ChartSeries::Causes(bars) => bars.len(),
            ChartSeries::Scatter(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Distinct values in first-appearance order.
pub fn ordered_unique<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

fn line_points(table: &DataFrame, x: &str, y: &str) -> Result<ChartSeries, ProcessorError> {
    let xs = DataProcessor::float_column(table, x)?;
    let ys = DataProcessor::float_column(table, y)?;
    let points = xs
        .into_iter()
        .zip(ys.into_iter())
        .filter_map(|(x, y)| Some([x?, y?]))
        .collect();
    Ok(ChartSeries::Line(points))
}
