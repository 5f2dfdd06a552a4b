use crate::clock::FixedClock;
use crate::config::MEDIQR_PREFIX;
use crate::database::Database;
use crate::model::{Gender, NewMedicalRecord, NewPatient, PatientStatus, RecordType};
use crate::store::{MemoryStore, Store, APPOINTMENTS_KEY, PATIENTS_KEY, RECORDS_KEY};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
/// This module contains test helpers
use temp_env;
use tracing_subscriber::fmt::MakeWriter;

/// Runs a function with all MEDIQR_ environment variables unset
pub(crate) fn with_no_mediqr_vars<F: FnOnce() -> R, R>(f: F) -> R {
    let prefix = format!("{MEDIQR_PREFIX}_");
    let vars = std::env::vars()
        .map(|(k, _v)| k)
        .filter(|k| k.starts_with(&prefix))
        .collect::<Vec<_>>();

    temp_env::with_vars_unset(&vars, f)
}

pub(crate) fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub(crate) fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(at(2024, 3, 1, 12, 0)))
}

/// A memory store whose collections exist but are empty, so nothing gets seeded
pub(crate) fn empty_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for key in [PATIENTS_KEY, RECORDS_KEY, APPOINTMENTS_KEY] {
        store.save(key, b"[]").unwrap();
    }
    store
}

pub(crate) fn empty_database(clock: Arc<FixedClock>) -> (Database, Arc<MemoryStore>) {
    let store = empty_store();
    let database = Database::open(store.clone(), clock);
    (database, store)
}

pub(crate) fn new_patient(name: &str) -> NewPatient {
    NewPatient {
        name: name.to_string(),
        dob: NaiveDate::from_ymd_opt(1990, 1, 1),
        gender: Gender::Female,
        contact: "555".to_string(),
        address: "x".to_string(),
        status: PatientStatus::Active,
        ..NewPatient::default()
    }
}

pub(crate) fn new_record(patient_id: &str, title: &str) -> NewMedicalRecord {
    NewMedicalRecord {
        patient_id: patient_id.to_string(),
        record_type: RecordType::Consultation,
        title: title.to_string(),
        details: "Routine".to_string(),
        doctor_name: "Dr. Smith".to_string(),
    }
}

// Mock Writer for flexibly testing the logging behaviour, copy-pasted from
// tracing_subscriber's internal test code (with JSON functionality deleted).
// https://github.com/tokio-rs/tracing/blob/b02a700ba6850ad813f77e65144114f866074a8f/tracing-subscriber/src/fmt/mod.rs#L1247-L1314
pub(crate) struct MockWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MockWriter {
    pub(crate) fn new(buf: Arc<Mutex<Vec<u8>>>) -> Self {
        Self { buf }
    }

    pub(crate) fn map_error<Guard>(err: TryLockError<Guard>) -> io::Error {
        match err {
            TryLockError::WouldBlock => io::Error::from(io::ErrorKind::WouldBlock),
            TryLockError::Poisoned(_) => io::Error::from(io::ErrorKind::Other),
        }
    }

    pub(crate) fn buf(&self) -> io::Result<MutexGuard<'_, Vec<u8>>> {
        self.buf.try_lock().map_err(Self::map_error)
    }
}

impl io::Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buf()?.flush()
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockMakeWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MockMakeWriter {
    pub(crate) fn get_string(&self) -> String {
        let mut buf = self.buf.lock().expect("lock shouldn't be poisoned");
        let string = std::str::from_utf8(&buf[..])
            .expect("formatter should not have produced invalid utf-8")
            .to_owned();
        buf.clear();
        string
    }
}

impl<'a> MakeWriter<'a> for MockMakeWriter {
    type Writer = MockWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MockWriter::new(self.buf.clone())
    }
}
