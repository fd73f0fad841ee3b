//! Catalog runs against PostgreSQL.
//!
//! Skipped unless DATABASE_URL points at a PostgreSQL server.

use std::sync::Arc;

use quake_glance::app::Dashboard;
use quake_glance::config::{ConnectionConfig, DatasetConfig};
use quake_glance::db::{DatabaseBackend, DatabaseClient, PostgresClient, Value};
use quake_glance::present::RenderInstruction;

const TABLE: &str = "quake_glance_fixture";

async fn get_test_client() -> Option<PostgresClient> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    if config.backend != DatabaseBackend::Postgres {
        return None;
    }
    PostgresClient::connect(&config).await.ok()
}

/// A dashboard over a temporary table that lives as long as the connection.
async fn fixture_dashboard() -> Option<Dashboard> {
    let client = get_test_client().await?;

    client
        .execute_query(&format!(
            "CREATE TEMP TABLE {TABLE} (
                id TEXT PRIMARY KEY, place TEXT, mag NUMERIC(3,1), mag_type TEXT,
                depth_km NUMERIC, time TIMESTAMP, sig BIGINT, alert TEXT, net TEXT,
                nst INTEGER, gap DOUBLE PRECISION, rms DOUBLE PRECISION, tsunami INTEGER,
                status TEXT, type TEXT, types TEXT, latitude DOUBLE PRECISION
            )"
        ))
        .await
        .unwrap();
    client
        .execute_query(&format!(
            "INSERT INTO {TABLE} VALUES
             ('q1', 'Chile', 9.1, 'mww', 25, '2016-03-01 10:00:00', 1500, 'red', 'us', 250, 30, 0.5, 1, 'reviewed', 'earthquake', 'origin', -3),
             ('q2', 'Fiji', 5.0, 'mb', 600, '2017-07-04 22:15:00', 400, NULL, 'us', 50, 200, 1.2, 0, 'reviewed', 'earthquake', 'origin', -4.5),
             ('q3', 'Fiji', 6.1, 'mb', 45, '2017-07-20 08:00:00', 100, NULL, 'us', 50, 30, 0.5, 0, 'reviewed', 'earthquake', 'origin', -4)"
        ))
        .await
        .unwrap();

    let dataset = DatasetConfig {
        table: TABLE.to_string(),
        ..DatasetConfig::default()
    };
    Some(Dashboard::with_client(Arc::new(client), &dataset).unwrap())
}

#[tokio::test]
async fn test_every_entry_runs_on_postgres() {
    let Some(dashboard) = fixture_dashboard().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    for label in dashboard.labels() {
        let instruction = dashboard.run(label).await.unwrap();
        assert!(!instruction.is_error(), "{label}: {instruction:?}");
    }
    assert_eq!(dashboard.total_count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_date_parts_on_postgres() {
    let Some(dashboard) = fixture_dashboard().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let instruction = dashboard.run("6. Year with most earthquakes").await.unwrap();
    let RenderInstruction::ShowTable { result, .. } = instruction else {
        panic!("expected a table");
    };
    assert_eq!(result.get(0, "yr"), Some(&Value::Int(2017)));
    assert_eq!(result.get(0, "quakes"), Some(&Value::Int(2)));
}

#[tokio::test]
async fn test_zero_denominator_is_null_on_postgres() {
    let Some(dashboard) = fixture_dashboard().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let instruction = dashboard
        .run("26. Highest ratio of shallow to deep quakes")
        .await
        .unwrap();
    let result = instruction.result().unwrap();
    assert_eq!(result.get(0, "place"), Some(&Value::from("Fiji")));
    assert_eq!(result.get(0, "ratio"), Some(&Value::Float(1.0)));
    assert_eq!(result.get(1, "place"), Some(&Value::from("Chile")));
    assert_eq!(result.get(1, "ratio"), Some(&Value::Null));
}

#[tokio::test]
async fn test_numeric_and_bigint_columns_decode_as_numbers() {
    let Some(dashboard) = fixture_dashboard().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let strongest = dashboard
        .run("1. Top 10 Strongest Earthquakes")
        .await
        .unwrap();
    let result = strongest.result().unwrap();
    assert_eq!(result.get(0, "place"), Some(&Value::from("Chile")));
    assert_eq!(result.get(0, "mag"), Some(&Value::Float(9.1)));

    let deepest = dashboard.run("2. Top 10 Deepest Earthquakes").await.unwrap();
    assert_eq!(
        deepest.result().unwrap().get(0, "depth_km"),
        Some(&Value::Float(600.0))
    );

    let impact = dashboard
        .run("12. Total impact (sig) per continent")
        .await
        .unwrap();
    let result = impact.result().unwrap();
    assert_eq!(result.get(0, "place"), Some(&Value::from("Chile")));
    assert_eq!(result.get(0, "total_sig"), Some(&Value::Float(1500.0)));
    assert_eq!(result.get(1, "place"), Some(&Value::from("Fiji")));
    assert_eq!(result.get(1, "total_sig"), Some(&Value::Float(500.0)));
}
