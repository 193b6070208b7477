//! CSV Data Loader Module
//! Loads the dashboard datasets with Polars and caches each file once.

use log::{debug, info};
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {0}")]
    NotFound(PathBuf),
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
}

/// Value type a required column is coerced to after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
}

impl ColumnKind {
    fn dtype(self) -> DataType {
        match self {
            ColumnKind::Text => DataType::String,
            ColumnKind::Integer => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
        }
    }
}

/// The five source files the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    ChildMortalityAfrica,
    InfantDeathsAfrica,
    ChildMortality,
    CausesOfDeath,
    BirthsAttended,
}

impl Dataset {
    pub const ALL: [Dataset; 5] = [
        Dataset::ChildMortalityAfrica,
        Dataset::InfantDeathsAfrica,
        Dataset::ChildMortality,
        Dataset::CausesOfDeath,
        Dataset::BirthsAttended,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::ChildMortalityAfrica => "child-mortality-africa.csv",
            Dataset::InfantDeathsAfrica => "infant-deaths-africa.csv",
            Dataset::ChildMortality => "child-mortality.csv",
            Dataset::CausesOfDeath => "causes-of-death.csv",
            Dataset::BirthsAttended => "births-attended.csv",
        }
    }

    /// Columns the chart pipelines reference, with their expected types.
    pub fn required_columns(self) -> &'static [(&'static str, ColumnKind)] {
        match self {
            Dataset::ChildMortalityAfrica | Dataset::ChildMortality => &[
                ("Entity", ColumnKind::Text),
                ("Year", ColumnKind::Integer),
                ("Under-five mortality rate", ColumnKind::Float),
            ],
            Dataset::InfantDeathsAfrica => &[
                ("Entity", ColumnKind::Text),
                ("Year", ColumnKind::Integer),
                ("Deaths", ColumnKind::Integer),
            ],
            Dataset::CausesOfDeath => &[
                ("Location", ColumnKind::Text),
                ("Period", ColumnKind::Integer),
                ("Dim1", ColumnKind::Text),
                ("Dim2", ColumnKind::Text),
                ("FactValueNumeric", ColumnKind::Float),
            ],
            Dataset::BirthsAttended => &[
                ("Entity", ColumnKind::Text),
                ("Year", ColumnKind::Integer),
                (
                    "Births attended by skilled health staff (% of total)",
                    ColumnKind::Float,
                ),
            ],
        }
    }
}

/// Read a CSV file into a DataFrame, keeping column names and row order.
pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    if !path.is_file() {
        return Err(LoaderError::NotFound(path.to_path_buf()));
    }
    File::open(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .finish()
        .and_then(|lazy| lazy.collect())
        .map_err(|source| LoaderError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        "Loaded {} rows, {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Load one of the named datasets and coerce its required columns.
pub fn load_dataset(path: &Path, dataset: Dataset) -> Result<DataFrame, LoaderError> {
    let mut df = load_csv(path)?;

    for &(name, kind) in dataset.required_columns() {
        let column = df.column(name).map_err(|_| LoaderError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })?;
        let coerced = column
            .as_materialized_series()
            .strict_cast(&kind.dtype())
            .map_err(|source| LoaderError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        df.with_column(coerced).map_err(|source| LoaderError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(df)
}

/// Loads each dataset from the data directory at most once.
pub struct DatasetCache {
    data_dir: PathBuf,
    frames: HashMap<Dataset, DataFrame>,
}

impl DatasetCache {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            frames: HashMap::new(),
        }
    }

    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(dataset.file_name())
    }

    /// Get a dataset, reading it from disk on first use.
    pub fn get(&mut self, dataset: Dataset) -> Result<DataFrame, LoaderError> {
        if let Some(df) = self.frames.get(&dataset) {
            debug!("Cache hit for {}", dataset.file_name());
            return Ok(df.clone());
        }

        let df = load_dataset(&self.path_for(dataset), dataset)?;
        self.frames.insert(dataset, df.clone());
        Ok(df)
    }

    pub fn is_loaded(&self, dataset: Dataset) -> bool {
        self.frames.contains_key(&dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn load_csv_preserves_columns_and_order() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "child-mortality.csv",
            "Entity,Code,Year,Under-five mortality rate\n\
             Kenya,KEN,2021,3.9\n\
             Chad,TCD,2022,10.1\n\
             Kenya,KEN,2022,3.7\n",
        );

        let df = load_csv(&path).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, ["Entity", "Code", "Year", "Under-five mortality rate"]);

        let entities: Vec<Option<&str>> = df.column("Entity").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(entities, [Some("Kenya"), Some("Chad"), Some("Kenya")]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn missing_required_column_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "infant-deaths-africa.csv", "Entity,Year\nAfrica,1950\n");

        let err = load_dataset(&path, Dataset::InfantDeathsAfrica).unwrap_err();
        match err {
            LoaderError::MissingColumn { column, .. } => assert_eq!(column, "Deaths"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn uncoercible_year_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "child-mortality.csv",
            "Entity,Year,Under-five mortality rate\nKenya,last year,3.7\n",
        );

        let err = load_dataset(&path, Dataset::ChildMortality).unwrap_err();
        assert!(matches!(err, LoaderError::Parse { .. }));
    }

    #[test]
    fn row_with_extra_field_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "child-mortality.csv",
            "Entity,Year,Under-five mortality rate\n\
             Kenya,2022,3.7\n\
             Chad,2022,10.1,EXTRA\n",
        );

        let err = load_dataset(&path, Dataset::ChildMortality).unwrap_err();
        assert!(matches!(err, LoaderError::Parse { .. }));
    }

    #[test]
    fn short_row_is_padded_with_nulls() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "child-mortality.csv",
            "Entity,Year,Under-five mortality rate\nKenya,2022,3.7\nChad,2022\n",
        );

        let df = load_dataset(&path, Dataset::ChildMortality).unwrap();
        assert_eq!(df.shape(), (2, 3));
        let rates: Vec<Option<f64>> = df
            .column("Under-five mortality rate")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(rates, [Some(3.7), None]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_an_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = write(&dir, "child-mortality.csv", "Entity,Year\nKenya,2022\n");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
        if File::open(&path).is_ok() {
            // Running as root; permissions are not enforced.
            return;
        }

        let err = load_csv(&path).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn required_columns_are_coerced() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "infant-deaths-africa.csv",
            "Entity,Year,Deaths\nAfrica,1950,2000000\n",
        );

        let df = load_dataset(&path, Dataset::InfantDeathsAfrica).unwrap();
        assert_eq!(df.column("Year").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("Deaths").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("Entity").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn cache_reads_each_file_once() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "infant-deaths-africa.csv",
            "Entity,Year,Deaths\nAfrica,1950,2000000\n",
        );

        let mut cache = DatasetCache::new(dir.path());
        assert!(!cache.is_loaded(Dataset::InfantDeathsAfrica));
        let first = cache.get(Dataset::InfantDeathsAfrica).unwrap();
        assert!(cache.is_loaded(Dataset::InfantDeathsAfrica));

        // A second read would fail now that the file is gone.
        fs::remove_file(&path).unwrap();
        let second = cache.get(Dataset::InfantDeathsAfrica).unwrap();
        assert!(first.equals_missing(&second));
    }

    #[test]
    fn dataset_file_names_are_fixed() {
        let names: Vec<&str> = Dataset::ALL.iter().map(|d| d.file_name()).collect();
        assert_eq!(
            names,
            [
                "child-mortality-africa.csv",
                "infant-deaths-africa.csv",
                "child-mortality.csv",
                "causes-of-death.csv",
                "births-attended.csv",
            ]
        );
    }
}
