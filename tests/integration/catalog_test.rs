//! Catalog queries run against the SQLite fixture, one test per shape.

use pretty_assertions::assert_eq;
use quake_glance::db::{TabularResult, Value};
use quake_glance::present::RenderInstruction;

use super::common::{fixture_dashboard, sample_quakes, Quake};

async fn table_for(quakes: &[Quake], label: &str) -> TabularResult {
    let dashboard = fixture_dashboard(quakes).await;
    match dashboard.run(label).await.unwrap() {
        RenderInstruction::ShowTable { result, .. } => result,
        other => panic!("{label}: expected a table, got {other:?}"),
    }
}

fn column(result: &TabularResult, name: &str) -> Vec<Value> {
    result.column_values(name).into_iter().cloned().collect()
}

fn strings(result: &TabularResult, name: &str) -> Vec<String> {
    result
        .column_values(name)
        .into_iter()
        .map(|v| v.to_display_string())
        .collect()
}

fn floats(result: &TabularResult, name: &str) -> Vec<f64> {
    result
        .column_values(name)
        .into_iter()
        .map(|v| v.as_f64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_every_entry_runs_on_sample_data() {
    let dashboard = fixture_dashboard(&sample_quakes()).await;
    for label in dashboard.labels() {
        let instruction = dashboard.run(label).await.unwrap();
        let RenderInstruction::ShowTable { result, .. } = &instruction else {
            panic!("{label}: expected a table, got {instruction:?}");
        };
        let limit = dashboard.catalog().get(label).unwrap().row_limit();
        if let Some(limit) = limit {
            assert!(result.row_count <= limit, "{label} exceeded its limit");
        }
    }
}

#[tokio::test]
async fn test_empty_dataset_gives_empty_notice_everywhere() {
    let dashboard = fixture_dashboard(&[]).await;
    for label in dashboard.labels() {
        assert_eq!(
            dashboard.run(label).await.unwrap(),
            RenderInstruction::ShowEmptyNotice,
            "{label}"
        );
    }
}

#[tokio::test]
async fn test_top_n_orders_by_magnitude() {
    let quakes = vec![
        Quake::new("a", "Chile", 9.1, 25.0, "2016-03-01 10:00:00"),
        Quake::new("b", "Japan", 7.2, 35.0, "2017-03-15 04:30:00"),
        Quake::new("c", "Fiji", 5.0, 600.0, "2017-07-04 22:15:00"),
        Quake::new("d", "Alaska", 8.8, 40.0, "2018-11-30 17:29:00"),
    ];
    let result = table_for(&quakes, "1. Top 10 Strongest Earthquakes").await;

    assert_eq!(floats(&result, "mag"), vec![9.1, 8.8, 7.2, 5.0]);
    assert!(result.row_count <= 10);
    assert_eq!(result.column_names(), vec!["place", "mag", "time"]);
    assert_eq!(
        result.get(0, "time"),
        Some(&Value::from("2016-03-01 10:00:00"))
    );
}

#[tokio::test]
async fn test_top_n_caps_at_ten_rows() {
    let quakes: Vec<Quake> = (0..12)
        .map(|i| {
            Quake::new(
                &format!("q{i}"),
                "Tonga",
                4.0 + i as f64 / 10.0,
                100.0 + i as f64,
                "2019-05-05 05:05:05",
            )
        })
        .collect();
    let result = table_for(&quakes, "2. Top 10 Deepest Earthquakes").await;
    assert_eq!(result.row_count, 10);
    assert_eq!(result.get(0, "depth_km"), Some(&Value::Float(111.0)));
}

#[tokio::test]
async fn test_filtered_top_n() {
    let result = table_for(
        &sample_quakes(),
        "3. Shallow & Powerful (Depth < 50km, Mag > 7.5)",
    )
    .await;
    assert_eq!(strings(&result, "place"), vec!["Chile", "Alaska"]);
    assert_eq!(floats(&result, "mag"), vec![9.1, 8.8]);
}

#[tokio::test]
async fn test_grouped_aggregate_one_row_per_category() {
    let result = table_for(&sample_quakes(), "5. Avg Magnitude per Type").await;
    assert_eq!(strings(&result, "mag_type"), vec!["mb", "mww"]);

    let averages = floats(&result, "avg_mag");
    assert!((averages[0] - 5.55).abs() < 1e-9);
    assert!((averages[1] - 7.925).abs() < 1e-9);
}

#[tokio::test]
async fn test_grouped_aggregate_excludes_null_category() {
    let result = table_for(&sample_quakes(), "20. Count by alert color").await;
    assert_eq!(
        strings(&result, "alert"),
        vec!["green", "orange", "red", "yellow"]
    );
    assert_eq!(
        column(&result, "quakes"),
        vec![Value::Int(1), Value::Int(1), Value::Int(1), Value::Int(1)]
    );
}

#[tokio::test]
async fn test_date_parts_group_by_calendar_field() {
    let quakes = sample_quakes();

    let year = table_for(&quakes, "6. Year with most earthquakes").await;
    assert_eq!(year.get(0, "yr"), Some(&Value::Int(2017)));
    assert_eq!(year.get(0, "quakes"), Some(&Value::Int(3)));

    let month = table_for(&quakes, "7. Month with most earthquakes").await;
    assert_eq!(month.get(0, "mon"), Some(&Value::Int(3)));

    let weekday = table_for(&quakes, "8. Day of week with most earthquakes").await;
    assert_eq!(weekday.get(0, "day_of_week"), Some(&Value::Int(2)));

    let hours = table_for(&quakes, "9. Earthquakes per Hour of Day").await;
    assert_eq!(
        column(&hours, "hour_of_day"),
        [4, 8, 10, 12, 17, 22].map(Value::Int).to_vec()
    );
}

#[tokio::test]
async fn test_grouped_ranked() {
    let result = table_for(&sample_quakes(), "24. 3 Most active regions (Freq + Mag)").await;
    assert_eq!(strings(&result, "place"), vec!["Chile", "Fiji", "Alaska"]);
    assert_eq!(
        column(&result, "freq"),
        vec![Value::Int(2), Value::Int(2), Value::Int(1)]
    );
}

#[tokio::test]
async fn test_recent_ranking_respects_since_year() {
    let quakes = vec![
        Quake::new("old", "Sumatra", 9.0, 30.0, "2004-12-26 00:58:53"),
        Quake::new("new", "Turkey", 7.8, 10.0, "2023-02-06 01:17:00"),
    ];
    let result = table_for(&quakes, "21. Top 5 countries by avg mag (since 2015)").await;
    assert_eq!(strings(&result, "place"), vec!["Turkey"]);
}

#[tokio::test]
async fn test_period_growth() {
    let result = table_for(&sample_quakes(), "23. Year-over-Year Growth Rate").await;

    assert_eq!(
        column(&result, "yr"),
        vec![Value::Int(2016), Value::Int(2017), Value::Int(2018)]
    );
    assert_eq!(
        column(&result, "previous_total"),
        vec![Value::Null, Value::Int(1), Value::Int(3)]
    );

    let growth = column(&result, "growth_pct");
    assert_eq!(growth[0], Value::Null);
    assert_eq!(growth[1], Value::Float(200.0));
    let decline = growth[2].as_f64().unwrap();
    assert!((decline - (-100.0 / 3.0)).abs() < 1e-9);
}

#[tokio::test]
async fn test_grouped_having() {
    let result = table_for(
        &sample_quakes(),
        "22. Countries with Shallow & Deep quakes in same month",
    )
    .await;

    assert_eq!(result.row_count, 1);
    assert_eq!(result.get(0, "place"), Some(&Value::from("Fiji")));
    assert_eq!(result.get(0, "yr"), Some(&Value::Int(2017)));
    assert_eq!(result.get(0, "mon"), Some(&Value::Int(7)));
    assert_eq!(result.get(0, "min_depth_km"), Some(&Value::Float(45.0)));
    assert_eq!(result.get(0, "max_depth_km"), Some(&Value::Float(600.0)));
}

#[tokio::test]
async fn test_conditional_ratio_with_zero_denominator() {
    let result = table_for(
        &sample_quakes(),
        "26. Highest ratio of shallow to deep quakes",
    )
    .await;

    assert_eq!(
        strings(&result, "place"),
        vec!["Chile", "Fiji", "Alaska", "Japan"]
    );
    assert_eq!(
        column(&result, "ratio"),
        vec![
            Value::Float(1.0),
            Value::Float(1.0),
            Value::Null,
            Value::Null
        ]
    );
    assert_eq!(
        column(&result, "deep"),
        vec![Value::Int(1), Value::Int(1), Value::Int(0), Value::Int(0)]
    );
}

#[tokio::test]
async fn test_reliability_filter() {
    let result = table_for(
        &sample_quakes(),
        "28. Events with lowest reliability (High Gap/RMS)",
    )
    .await;
    assert_eq!(strings(&result, "id"), vec!["q3"]);
}

#[tokio::test]
async fn test_equator_band() {
    let result = table_for(&sample_quakes(), "25. Avg depth within 5 degrees of Equator").await;
    assert_eq!(strings(&result, "place"), vec!["Fiji", "Chile"]);
    assert_eq!(floats(&result, "avg_depth_km"), vec![322.5, 25.0]);
}
