//! Dashboard behaviour over a real SQLite connection.

use std::sync::Arc;

use quake_glance::app::Dashboard;
use quake_glance::config::{ConnectionConfig, DatasetConfig};
use quake_glance::connection::ConnectionProvider;
use quake_glance::error::GlanceError;
use quake_glance::present::RenderInstruction;
use quake_glance::query::{ExecutionOutcome, FailureKind};

use super::common::{fixture_client, fixture_dashboard, sample_quakes};

#[tokio::test]
async fn test_unknown_label_is_rejected() {
    let dashboard = fixture_dashboard(&sample_quakes()).await;
    let err = dashboard.run("4. Something that was never on the menu").await;
    assert!(matches!(err, Err(GlanceError::UnknownLabel(_))));
}

#[tokio::test]
async fn test_run_selector_accepts_menu_number() {
    let dashboard = fixture_dashboard(&sample_quakes()).await;
    let by_number = dashboard.run_selector("10").await.unwrap();
    let by_label = dashboard
        .run("10. Most active reporting network")
        .await
        .unwrap();
    let (by_number, by_label) = (by_number.result().unwrap(), by_label.result().unwrap());
    assert_eq!(by_number.columns, by_label.columns);
    assert_eq!(by_number.rows, by_label.rows);
}

#[tokio::test]
async fn test_chart_hint_follows_label() {
    let dashboard = fixture_dashboard(&sample_quakes()).await;
    for label in dashboard.labels() {
        let instruction = dashboard.run(label).await.unwrap();
        let lowered = label.to_lowercase();
        let wants_chart = lowered.contains("avg") || lowered.contains("count");
        assert_eq!(
            instruction.chart().is_some(),
            wants_chart,
            "{label}: unexpected chart hint"
        );
    }
}

#[tokio::test]
async fn test_total_count() {
    let dashboard = fixture_dashboard(&sample_quakes()).await;
    assert_eq!(dashboard.total_count().await.unwrap(), 6);

    let empty = fixture_dashboard(&[]).await;
    assert_eq!(empty.total_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_sql_fails_without_panicking() {
    let dashboard = fixture_dashboard(&sample_quakes()).await;
    let outcome = dashboard.execute_sql("SELEC place FROM earthquakes").await;
    match outcome {
        ExecutionOutcome::Failure { kind, message } => {
            assert_eq!(kind, FailureKind::QueryExecution);
            assert!(!message.is_empty());
        }
        other => panic!("expected a failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_table_shows_error() {
    let client = fixture_client(&[]).await;
    let dataset = DatasetConfig {
        table: "no_such_table".to_string(),
        ..DatasetConfig::default()
    };
    let dashboard = Dashboard::with_client(Arc::new(client), &dataset).unwrap();

    let instruction = dashboard.run("1. Top 10 Strongest Earthquakes").await.unwrap();
    assert!(instruction.is_error());
    assert!(instruction
        .message()
        .unwrap()
        .contains("no such table: no_such_table"));
}

#[tokio::test]
async fn test_writes_are_refused() {
    let dashboard = fixture_dashboard(&sample_quakes()).await;

    let outcome = dashboard.execute_sql("DELETE FROM earthquakes").await;
    assert!(outcome.is_failure());

    // Nothing was deleted.
    assert_eq!(dashboard.total_count().await.unwrap(), 6);
}

#[tokio::test]
async fn test_provider_returns_one_shared_handle() {
    let config = ConnectionConfig::from_connection_string("sqlite::memory:").unwrap();
    let provider = ConnectionProvider::new(config);
    assert!(!provider.is_connected());

    let first = provider.get_connection().await.unwrap();
    let second = provider.get_connection().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(provider.is_connected());

    provider.close().await.unwrap();
}

#[tokio::test]
async fn test_unconfigured_dashboard_fails_fast() {
    let result = Dashboard::connect(None, &DatasetConfig::default());
    assert!(matches!(result, Err(GlanceError::Connection(_))));
}

#[tokio::test]
async fn test_unreachable_database_shows_connection_error() {
    let config = ConnectionConfig::from_connection_string(
        "sqlite:///definitely/not/a/real/dir/quakes.db",
    )
    .unwrap();
    let dashboard = Dashboard::connect(Some(config), &DatasetConfig::default()).unwrap();

    let instruction = dashboard.run("1. Top 10 Strongest Earthquakes").await.unwrap();
    match instruction {
        RenderInstruction::ShowError(message) => {
            assert!(message.starts_with("could not connect:"), "{message}")
        }
        other => panic!("expected an error, got {other:?}"),
    }
}
