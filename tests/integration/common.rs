//! Shared fixture: an in-memory SQLite earthquake table.

use std::path::Path;
use std::sync::Arc;

use quake_glance::app::Dashboard;
use quake_glance::config::DatasetConfig;
use quake_glance::db::SqliteClient;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

pub const CREATE_TABLE: &str = "CREATE TABLE earthquakes (
    id TEXT PRIMARY KEY,
    place TEXT,
    mag REAL,
    mag_type TEXT,
    depth_km REAL,
    time TEXT,
    sig INTEGER,
    alert TEXT,
    net TEXT,
    nst INTEGER,
    gap REAL,
    rms REAL,
    tsunami INTEGER,
    status TEXT,
    type TEXT,
    types TEXT,
    latitude REAL
)";

/// One seismic event row.
#[derive(Debug, Clone)]
pub struct Quake {
    pub id: String,
    pub place: String,
    pub mag: f64,
    pub mag_type: String,
    pub depth_km: f64,
    pub time: String,
    pub sig: i64,
    pub alert: Option<String>,
    pub net: String,
    pub nst: Option<i64>,
    pub gap: Option<f64>,
    pub rms: Option<f64>,
    pub tsunami: i64,
    pub status: String,
    pub kind: String,
    pub types: String,
    pub latitude: f64,
}

impl Quake {
    /// An event with unremarkable defaults for everything but the given fields.
    pub fn new(id: &str, place: &str, mag: f64, depth_km: f64, time: &str) -> Self {
        Self {
            id: id.to_string(),
            place: place.to_string(),
            mag,
            mag_type: "mww".to_string(),
            depth_km,
            time: time.to_string(),
            sig: 100,
            alert: None,
            net: "us".to_string(),
            nst: Some(50),
            gap: Some(30.0),
            rms: Some(0.5),
            tsunami: 0,
            status: "reviewed".to_string(),
            kind: "earthquake".to_string(),
            types: "origin,phase-data".to_string(),
            latitude: 20.0,
        }
    }

    pub fn mag_type(mut self, mag_type: &str) -> Self {
        self.mag_type = mag_type.to_string();
        self
    }

    pub fn sig(mut self, sig: i64) -> Self {
        self.sig = sig;
        self
    }

    pub fn alert(mut self, alert: &str) -> Self {
        self.alert = Some(alert.to_string());
        self
    }

    pub fn tsunami(mut self) -> Self {
        self.tsunami = 1;
        self
    }

    pub fn nst(mut self, nst: i64) -> Self {
        self.nst = Some(nst);
        self
    }

    pub fn gap_rms(mut self, gap: f64, rms: f64) -> Self {
        self.gap = Some(gap);
        self.rms = Some(rms);
        self
    }

    pub fn latitude(mut self, latitude: f64) -> Self {
        self.latitude = latitude;
        self
    }
}

/// Creates the table and inserts `quakes` into a fresh in-memory database.
pub async fn fixture_client(quakes: &[Quake]) -> SqliteClient {
    let client = SqliteClient::in_memory().await.unwrap();
    populate(client.pool(), quakes).await;
    client
}

/// Writes the table holding `quakes` to a new database file at `path`.
pub async fn fixture_file(path: &Path, quakes: &[Quake]) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await.unwrap();
    populate(&pool, quakes).await;
    pool.close().await;
}

async fn populate(pool: &SqlitePool, quakes: &[Quake]) {
    sqlx::query(CREATE_TABLE).execute(pool).await.unwrap();

    for q in quakes {
        sqlx::query(
            "INSERT INTO earthquakes (id, place, mag, mag_type, depth_km, time, sig, alert, net, \
             nst, gap, rms, tsunami, status, type, types, latitude) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&q.id)
        .bind(&q.place)
        .bind(q.mag)
        .bind(&q.mag_type)
        .bind(q.depth_km)
        .bind(&q.time)
        .bind(q.sig)
        .bind(&q.alert)
        .bind(&q.net)
        .bind(q.nst)
        .bind(q.gap)
        .bind(q.rms)
        .bind(q.tsunami)
        .bind(&q.status)
        .bind(&q.kind)
        .bind(&q.types)
        .bind(q.latitude)
        .execute(pool)
        .await
        .unwrap();
    }
}

/// A dashboard over a fixture holding `quakes`.
pub async fn fixture_dashboard(quakes: &[Quake]) -> Dashboard {
    let client = fixture_client(quakes).await;
    Dashboard::with_client(Arc::new(client), &DatasetConfig::default()).unwrap()
}

/// A small but varied dataset that gives every catalog entry some rows.
pub fn sample_quakes() -> Vec<Quake> {
    vec![
        Quake::new("q1", "Chile", 9.1, 25.0, "2016-03-01 10:00:00")
            .sig(1500)
            .alert("red")
            .tsunami()
            .nst(250)
            .latitude(-3.0),
        Quake::new("q2", "Japan", 7.2, 35.0, "2017-03-15 04:30:00")
            .sig(900)
            .alert("orange")
            .tsunami(),
        Quake::new("q3", "Fiji", 5.0, 600.0, "2017-07-04 22:15:00")
            .mag_type("mb")
            .sig(400)
            .alert("green")
            .gap_rms(200.0, 1.2)
            .latitude(-4.5),
        Quake::new("q4", "Alaska", 8.8, 40.0, "2018-11-30 17:29:00")
            .sig(1200)
            .alert("yellow")
            .nst(150),
        Quake::new("q5", "Fiji", 6.1, 45.0, "2017-07-20 08:00:00")
            .mag_type("mb")
            .latitude(-4.0),
        Quake::new("q6", "Chile", 6.6, 80.0, "2018-01-10 12:00:00"),
    ]
}
