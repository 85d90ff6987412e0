#![expect(clippy::unwrap_used)]
use super::plan::{CORRELATION_NAME, MISSINGNESS_NAME};
use super::*;
use crate::analyser::{Dataset, load_csv_bytes};
use anyhow::Result;

const SALES_CSV: &str = "date,amount,region
2024-01-01,10.5,North
2024-01-02,,South
2024-01-03,7.25,North
";

fn csv(text: &str) -> Dataset {
    load_csv_bytes(text.as_bytes()).unwrap()
}

fn plan(dataset: &Dataset, settings: &ChartSettings) -> Vec<ExhibitPlan> {
    plan_exhibits(dataset, &dataset.classify(), settings)
}

fn names(plans: &[ExhibitPlan]) -> Vec<&str> {
    plans.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn test_sales_scenario_plan() {
    let plans = plan(&csv(SALES_CSV), &ChartSettings::default());
    assert_eq!(
        names(&plans),
        vec![
            MISSINGNESS_NAME,
            "hist_amount",
            "countplot_region",
            "time_series_amount"
        ]
    );

    assert_eq!(
        plans[0].kind,
        ExhibitKind::Missingness {
            columns: vec![("amount".to_owned(), 1)]
        }
    );
    assert_eq!(
        plans[3].kind,
        ExhibitKind::Temporal {
            date_column: "date".to_owned(),
            value_column: "amount".to_owned()
        }
    );
    assert_eq!(plans[3].title, "amount over Time");
}

#[test]
fn test_empty_dataset_plans_nothing() {
    let plans = plan(&csv("alpha,beta\n"), &ChartSettings::default());
    assert!(plans.is_empty());
}

#[test]
fn test_correlation_needs_two_numeric_columns() {
    let dataset = csv("a,b,c\n1,2,x\n2,5,y\n3,4,x\n");
    let plans = plan(&dataset, &ChartSettings::default());
    assert_eq!(plans.first().map(|p| p.name.as_str()), Some(CORRELATION_NAME));
    assert_eq!(
        plans[0].kind,
        ExhibitKind::Correlation {
            columns: vec!["a".to_owned(), "b".to_owned()]
        }
    );
    assert!(!names(&plans).contains(&MISSINGNESS_NAME));

    let single = plan(&csv("a,c\n1,x\n2,y\n"), &ChartSettings::default());
    assert!(!names(&single).contains(&CORRELATION_NAME));
}

#[test]
fn test_density_depends_on_row_count() {
    let dataset = csv("v\n1\n2\n3\n4\n");

    let small = ChartSettings {
        density_row_limit: 4,
        large_dataset_bins: 50,
    };
    assert_eq!(
        plan(&dataset, &small)[0].kind,
        ExhibitKind::Distribution {
            column: "v".to_owned(),
            binning: Binning::Auto,
            density: true
        }
    );

    let large = ChartSettings {
        density_row_limit: 3,
        large_dataset_bins: 50,
    };
    assert_eq!(
        plan(&dataset, &large)[0].kind,
        ExhibitKind::Distribution {
            column: "v".to_owned(),
            binning: Binning::Fixed(50),
            density: false
        }
    );
}

#[test]
fn test_single_temporal_exhibit() {
    let dataset = csv("d1,x,d2,y\n2024-01-01,1,2024-02-01,5\n2024-01-02,2,2024-02-02,6\n");
    let plans = plan(&dataset, &ChartSettings::default());
    let temporal: Vec<&ExhibitPlan> = plans
        .iter()
        .filter(|p| matches!(p.kind, ExhibitKind::Temporal { .. }))
        .collect();
    assert_eq!(temporal.len(), 1);
    assert_eq!(
        temporal[0].kind,
        ExhibitKind::Temporal {
            date_column: "d1".to_owned(),
            value_column: "x".to_owned()
        }
    );
    assert_eq!(plans.last().map(|p| p.name.as_str()), Some("time_series_x"));
}

#[test]
fn test_exhibit_order_follows_kind_then_column() {
    let dataset = csv("c1,n1,c2,n2\na,1,x,4\nb,2,y,5\n");
    let plans = plan(&dataset, &ChartSettings::default());
    assert_eq!(
        names(&plans),
        vec![
            CORRELATION_NAME,
            "hist_n1",
            "hist_n2",
            "countplot_c1",
            "countplot_c2"
        ]
    );
}

#[test]
fn test_artifact_names_are_sanitized_and_unique() {
    let dataset = csv("unit price,unit/price,unit_price\n1,2,3\n4,5,6\n");
    let plans = plan(&dataset, &ChartSettings::default());
    let hist: Vec<&str> = names(&plans)
        .into_iter()
        .filter(|n| n.starts_with("hist_"))
        .collect();
    assert_eq!(
        hist,
        vec!["hist_unit_price", "hist_unit_price_1", "hist_unit_price_2"]
    );
    assert!(plans.iter().all(|p| p.file_name().ends_with(".png")));
}

#[test]
fn test_rendering_writes_or_skips_every_plan() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let dataset = csv("date,amount,cost,region
2024-01-01,10.5,3,North
2024-01-02,,4,South
2024-01-03,7.25,-1,North
");
    let classification = dataset.classify();
    let plans = plan_exhibits(&dataset, &classification, &ChartSettings::default());
    let output = generate_visualizations(
        &dataset,
        &classification,
        &ChartSettings::default(),
        dir.path(),
    )?;

    assert_eq!(output.artifacts.len() + output.skipped.len(), plans.len());
    for artifact in &output.artifacts {
        assert!(artifact.path.exists());
        assert_eq!(artifact.path, dir.path().join(artifact.file_name()));
        assert!(artifact.png.starts_with(b"\x89PNG"));
    }

    // artifacts keep plan order
    let rendered: Vec<&str> = output.artifacts.iter().map(|a| a.name.as_str()).collect();
    let expected: Vec<&str> = names(&plans)
        .into_iter()
        .filter(|n| rendered.contains(n))
        .collect();
    assert_eq!(rendered, expected);
    Ok(())
}

#[test]
fn test_rendering_creates_output_dir() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let nested = dir.path().join("plots").join("run");
    let dataset = csv("v\n1\n2\n");
    let output = render_exhibits(&dataset, &[], &nested)?;
    assert!(nested.is_dir());
    assert!(output.artifacts.is_empty());
    Ok(())
}

#[test]
fn test_failed_exhibit_does_not_stop_the_rest() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let dataset = csv("amount,region\n10.5,North\n4,South\n7.25,North\n");
    let plans = vec![
        ExhibitPlan {
            name: "hist_nope".to_owned(),
            title: "Distribution of nope".to_owned(),
            kind: ExhibitKind::Distribution {
                column: "nope".to_owned(),
                binning: Binning::Auto,
                density: true,
            },
        },
        ExhibitPlan {
            name: "hist_amount".to_owned(),
            title: "Distribution of amount".to_owned(),
            kind: ExhibitKind::Distribution {
                column: "amount".to_owned(),
                binning: Binning::Auto,
                density: true,
            },
        },
    ];

    let output = render_exhibits(&dataset, &plans, dir.path())?;

    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].name, "hist_nope");
    assert!(output.skipped[0].reason.contains("hist_nope"));
    assert!(!dir.path().join("hist_nope.png").exists());

    assert_eq!(output.artifacts.len(), 1);
    assert_eq!(output.artifacts[0].name, "hist_amount");
    assert!(dir.path().join("hist_amount.png").is_file());
    Ok(())
}
