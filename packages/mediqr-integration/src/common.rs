#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use mediqr::clock::FixedClock;
use mediqr::config::ApiConfig;
use mediqr::model::{Gender, NewMedicalRecord, NewPatient, PatientStatus, RecordType};
use mediqr::store::{SledStore, Store};
use mediqr::{Api, Database, Session};
use std::path::Path;
use std::sync::{Arc, Once};
use std::time::Duration;
use tracing_subscriber::{filter::Directive, EnvFilter, FmtSubscriber};

pub const LATENCY: Duration = Duration::from_millis(500);

static INIT: Once = Once::new();

pub fn trace() {
    INIT.call_once(|| {
        let log_level: Directive = tracing::Level::DEBUG.into();

        let filter = EnvFilter::from_default_env().add_directive(log_level.to_owned());

        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_test_writer()
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");
    });
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(now()))
}

pub fn sled_store(path: &Path) -> Arc<dyn Store> {
    Arc::new(SledStore::open(path).unwrap())
}

/// Wire a store into the same stack the binary builds
pub async fn front_desk(store: Arc<dyn Store>, clock: Arc<FixedClock>) -> (Api, Session) {
    let database = Database::open(store.clone(), clock);
    let api = Api::new(database, &ApiConfig::with_latency(LATENCY));
    let session = Session::bootstrap(Arc::new(api.clone()), store).await;
    (api, session)
}

pub fn patient(name: &str) -> NewPatient {
    NewPatient {
        name: name.to_string(),
        gender: Gender::Female,
        contact: "555-0100".to_string(),
        address: "1 Harbour Rd".to_string(),
        status: PatientStatus::Active,
        ..NewPatient::default()
    }
}

pub fn record(patient_id: &str, record_type: RecordType, title: &str) -> NewMedicalRecord {
    NewMedicalRecord {
        patient_id: patient_id.to_string(),
        record_type,
        title: title.to_string(),
        details: format!("{title} notes"),
        doctor_name: "Dr. Smith".to_string(),
    }
}
