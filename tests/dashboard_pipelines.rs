use mortality_dashboard::charts::{ChartSeries, RegionPoint};
use mortality_dashboard::data::{Dataset, LoaderError};
use mortality_dashboard::{ChartKind, Dashboard, DashboardConfig, PipelineError};
use std::fs;
use tempfile::TempDir;

const CHILD_MORTALITY_AFRICA: &str = "\
Entity,Code,Year,Under-five mortality rate
Africa,,1932,40.2
Africa,,1933,39.9
Africa,,2022,6.7
";

const INFANT_DEATHS_AFRICA: &str = "\
Entity,Code,Year,Deaths
Africa,,1950,2000000
Africa,,1951,2500000
";

const CHILD_MORTALITY: &str = "\
Entity,Code,Year,Under-five mortality rate
Kenya,KEN,2021,3.9
Kenya,KEN,2022,3.7
France,FRA,2022,0.4
Europe (SDG),,2019,0.5
Sub-Saharan Africa (SDG),,2019,7.4
Southern Asia (SDG),,2018,4.1
";

const CAUSES_OF_DEATH: &str = "\
Location,Period,Dim1,Dim2,FactValueNumeric
Kenya,2017,0-27 days,Prematurity,30.5
Kenya,2017,0-27 days,Birth asphyxia,30.5
Kenya,2017,0-27 days,Sepsis,12.0
Kenya,2017,1-9 months,Malaria,18.0
Kenya,2017,1-9 months,Pneumonia,21.0
Kenya,2016,1-9 months,Malaria,90.0
France,2017,0-27 days,Prematurity,40.0
";

const BIRTHS_ATTENDED: &str = "\
Entity,Code,Year,Births attended by skilled health staff (% of total)
Europe and Central Asia (WB),,2019,99.1
North America (WB),,2019,99.0
Sub-Saharan Africa (WB),,2019,63.5
South Asia (WB),,2019,80.2
World,OWID_WRL,2019,81.0
";

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let files = [
        (Dataset::ChildMortalityAfrica, CHILD_MORTALITY_AFRICA),
        (Dataset::InfantDeathsAfrica, INFANT_DEATHS_AFRICA),
        (Dataset::ChildMortality, CHILD_MORTALITY),
        (Dataset::CausesOfDeath, CAUSES_OF_DEATH),
        (Dataset::BirthsAttended, BIRTHS_ATTENDED),
    ];
    for (dataset, body) in files {
        fs::write(dir.path().join(dataset.file_name()), body).unwrap();
    }
    dir
}

fn dashboard(dir: &TempDir) -> Dashboard {
    Dashboard::new(dir.path(), DashboardConfig::builtin().unwrap())
}

#[test]
fn map_shows_only_kenya_2022() {
    let dir = data_dir();
    let mut dashboard = dashboard(&dir);

    let chart = dashboard.prepare(ChartKind::MortalityMap).unwrap();
    assert_eq!(chart.table.height(), 1);
    assert_eq!(chart.series, ChartSeries::Ranking(vec![("Kenya".to_string(), 3.7)]));
}

#[test]
fn regions_without_mortality_partner_are_dropped() {
    let dir = data_dir();
    let mut dashboard = dashboard(&dir);

    let chart = dashboard.prepare(ChartKind::AttendanceVsMortality).unwrap();
    match chart.series {
        ChartSeries::Scatter(points) => {
            assert_eq!(
                points,
                [
                    RegionPoint {
                        region: "Europe (SDG)".into(),
                        attended: 99.1,
                        mortality: 0.5,
                    },
                    RegionPoint {
                        region: "Sub-Saharan Africa (SDG)".into(),
                        attended: 63.5,
                        mortality: 7.4,
                    },
                ]
            );
            assert!(points.iter().all(|p| p.region != "Northern America (SDG)"));
        }
        other => panic!("unexpected series: {other:?}"),
    }
    assert!(chart.table.column("Entity_births").is_ok());
    assert!(chart.table.column("Entity_mortality").is_ok());
}

#[test]
fn leading_causes_break_ties_by_row_order() {
    let dir = data_dir();
    let mut dashboard = dashboard(&dir);

    let chart = dashboard.prepare(ChartKind::LeadingCauses).unwrap();
    match chart.series {
        ChartSeries::Causes(bars) => {
            let picked: Vec<(&str, &str)> = bars
                .iter()
                .map(|b| (b.age_group.as_str(), b.cause.as_str()))
                .collect();
            assert_eq!(picked, [("0-27 days", "Prematurity"), ("1-9 months", "Pneumonia")]);
        }
        other => panic!("unexpected series: {other:?}"),
    }
}

#[test]
fn line_charts_follow_row_order() {
    let dir = data_dir();
    let mut dashboard = dashboard(&dir);

    let rates = dashboard.prepare(ChartKind::MortalityRates).unwrap();
    assert_eq!(
        rates.series,
        ChartSeries::Line(vec![[1932.0, 40.2], [1933.0, 39.9], [2022.0, 6.7]])
    );

    let deaths = dashboard.prepare(ChartKind::InfantDeaths).unwrap();
    assert_eq!(deaths.series, ChartSeries::Line(vec![[1950.0, 2.0], [1951.0, 2.5]]));
}

#[test]
fn views_load_only_the_files_they_need() {
    let dir = data_dir();
    for kind in ChartKind::ALL {
        let mut dashboard = dashboard(&dir);
        dashboard.prepare(kind).unwrap();
        for dataset in Dataset::ALL {
            assert_eq!(
                dashboard.is_loaded(dataset),
                kind.datasets().contains(&dataset),
                "{:?} while preparing {:?}",
                dataset,
                kind
            );
        }
    }
}

#[test]
fn shared_file_is_read_once_across_views() {
    let dir = data_dir();
    let mut dashboard = dashboard(&dir);

    dashboard.prepare(ChartKind::MortalityMap).unwrap();
    fs::remove_file(dir.path().join(Dataset::ChildMortality.file_name())).unwrap();

    // child-mortality.csv is served from the cache.
    let chart = dashboard.prepare(ChartKind::AttendanceVsMortality).unwrap();
    assert_eq!(chart.len(), 2);
}

#[test]
fn prepare_all_covers_every_view() {
    let dir = data_dir();
    let mut dashboard = dashboard(&dir);

    let charts = dashboard.prepare_all().unwrap();
    let kinds: Vec<ChartKind> = charts.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, ChartKind::ALL);
}

#[test]
fn missing_file_fails_fast() {
    let dir = data_dir();
    fs::remove_file(dir.path().join(Dataset::CausesOfDeath.file_name())).unwrap();
    let mut dashboard = dashboard(&dir);

    let err = dashboard.prepare_all().unwrap_err();
    assert!(matches!(err, PipelineError::Load(LoaderError::NotFound(_))));

    // Views that do not need the file still work.
    assert!(dashboard.prepare(ChartKind::MortalityMap).is_ok());
}
