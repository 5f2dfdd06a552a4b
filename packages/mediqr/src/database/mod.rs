//! Typed access to the patient, medical record and appointment collections.
//!
//! [`Database`] is the single writer of the three collections. Every mutation is applied to the
//! in-memory collections first and then persisted to the [`Store`]. A failed write is logged and
//! the in-memory state remains authoritative for the rest of the session.
//!
//! A collection that could not be read in full is never written back, so unreadable entries
//! stay in the store until they are repaired.

mod ids;
mod seed;

pub use ids::{next_id, PATIENT_PREFIX, RECORD_PREFIX};

use crate::clock::{local_day_bounds, Clock};
use crate::error::{Error, StoreError};
use crate::log::{DATABASE, STORE};
use crate::model::{
    Appointment, MedicalRecord, NewMedicalRecord, NewPatient, Patient, PatientUpdate,
};
use crate::qr::QrPayload;
use crate::store::{Store, APPOINTMENTS_KEY, PATIENTS_KEY, RECORDS_KEY};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub struct Database {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    patients: Vec<Patient>,
    records: Vec<MedicalRecord>,
    appointments: Vec<Appointment>,
    /// Keys whose stored blob was not read in full
    unreadable: Vec<&'static str>,
}

impl Database {
    ///
    /// Load all collections from the store.
    ///
    /// A collection that has never been written is seeded and persisted immediately.
    /// A collection that cannot be read or parsed starts empty for this session.
    ///
    pub fn open(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        let mut unreadable = Vec::new();

        let patients = load_collection(store.as_ref(), PATIENTS_KEY, seed::patients)
            .into_items(PATIENTS_KEY, &mut unreadable);
        let records = load_collection(store.as_ref(), RECORDS_KEY, seed::records)
            .into_items(RECORDS_KEY, &mut unreadable);
        let now = clock.now();
        let appointments =
            load_collection(store.as_ref(), APPOINTMENTS_KEY, || seed::appointments(now))
                .into_items(APPOINTMENTS_KEY, &mut unreadable);

        info!(
            target: DATABASE,
            msg = "Database loaded",
            patients = patients.len(),
            records = records.len(),
            appointments = appointments.len()
        );

        Database {
            store,
            clock,
            patients,
            records,
            appointments,
            unreadable,
        }
    }

    /// All patients in insertion order
    pub fn list_patients(&self) -> Vec<Patient> {
        self.patients.clone()
    }

    pub fn get_patient(&self, id: &str) -> Option<Patient> {
        self.patients.iter().find(|p| p.id == id).cloned()
    }

    pub fn create_patient(&mut self, new: NewPatient) -> Patient {
        let now = self.clock.now();
        let id = next_id(PATIENT_PREFIX, self.patients.iter().map(|p| p.id.as_str()));
        let qr_code_data = QrPayload::for_patient(&id, &new.name).to_string();

        let NewPatient {
            name,
            dob,
            gender,
            contact,
            address,
            status,
            id_proof_type,
            id_proof_number,
            insurance_provider,
            insurance_policy_number,
        } = new;

        let patient = Patient {
            id,
            name,
            dob,
            gender,
            contact,
            address,
            status,
            created_at: now,
            updated_at: now,
            qr_code_data,
            id_proof_type,
            id_proof_number,
            insurance_provider,
            insurance_policy_number,
        };

        self.patients.push(patient.clone());
        self.save_patients();

        info!(target: DATABASE, msg = "Patient created", id = patient.id);
        patient
    }

    ///
    /// Merge `update` over the patient and refresh `updated_at`.
    /// `id`, `created_at` and `qr_code_data` are never changed.
    ///
    /// Returns `None` if the id is unknown.
    ///
    pub fn update_patient(&mut self, id: &str, update: PatientUpdate) -> Option<Patient> {
        let now = self.clock.now();

        let patient = self.patients.iter_mut().find(|p| p.id == id)?;
        patient.apply(update);
        patient.updated_at = now;
        let updated = patient.clone();

        self.save_patients();

        info!(target: DATABASE, msg = "Patient updated", id);
        Some(updated)
    }

    ///
    /// Remove the patient together with every record and appointment that references it.
    ///
    /// All three collections are edited before anything is persisted, so no observer can see
    /// a record that points at a removed patient. Returns `false` if the id is unknown.
    ///
    pub fn delete_patient(&mut self, id: &str) -> bool {
        let before = self.patients.len();
        self.patients.retain(|p| p.id != id);

        if self.patients.len() == before {
            debug!(target: DATABASE, msg = "Delete of unknown patient", id);
            return false;
        }

        let records_before = self.records.len();
        let appointments_before = self.appointments.len();
        self.records.retain(|r| r.patient_id != id);
        self.appointments.retain(|a| a.patient_id != id);

        self.save_patients();
        self.save_records();
        self.save_appointments();

        info!(
            target: DATABASE,
            msg = "Patient deleted",
            id,
            records = records_before - self.records.len(),
            appointments = appointments_before - self.appointments.len()
        );
        true
    }

    /// All medical records in insertion order
    pub fn list_all_records(&self) -> Vec<MedicalRecord> {
        self.records.clone()
    }

    /// Records for one patient, newest first
    pub fn list_records_for_patient(&self, patient_id: &str) -> Vec<MedicalRecord> {
        let mut records = self
            .records
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect::<Vec<_>>();

        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    ///
    /// Add a record dated now.
    ///
    /// The owning patient is not required to exist. An unknown `patient_id` is accepted and
    /// logged; the record is removed by the next cascade delete of that id.
    ///
    pub fn create_medical_record(&mut self, new: NewMedicalRecord) -> MedicalRecord {
        if !self.patients.iter().any(|p| p.id == new.patient_id) {
            warn!(
                target: DATABASE,
                msg = "Medical record references an unknown patient",
                patient_id = new.patient_id
            );
        }

        let id = next_id(RECORD_PREFIX, self.records.iter().map(|r| r.id.as_str()));

        let record = MedicalRecord {
            id,
            patient_id: new.patient_id,
            date: self.clock.now(),
            record_type: new.record_type,
            title: new.title,
            details: new.details,
            doctor_name: new.doctor_name,
        };

        self.records.push(record.clone());
        self.save_records();

        info!(
            target: DATABASE,
            msg = "Medical record created",
            id = record.id,
            patient_id = record.patient_id
        );
        record
    }

    pub fn delete_medical_record(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);

        if self.records.len() == before {
            return false;
        }

        self.save_records();
        info!(target: DATABASE, msg = "Medical record deleted", id);
        true
    }

    /// Appointments falling within the clock's current local calendar day
    pub fn list_appointments_for_today(&self) -> Vec<Appointment> {
        let (start, end) = local_day_bounds(self.clock.today());

        self.appointments
            .iter()
            .filter(|a| a.date >= start && a.date < end)
            .cloned()
            .collect()
    }

    pub fn flush(&self) -> Result<(), Error> {
        self.store.flush()?;
        Ok(())
    }

    fn save_patients(&self) {
        self.save(PATIENTS_KEY, &self.patients);
    }

    fn save_records(&self) {
        self.save(RECORDS_KEY, &self.records);
    }

    fn save_appointments(&self) {
        self.save(APPOINTMENTS_KEY, &self.appointments);
    }

    fn save<T: Serialize>(&self, key: &str, items: &[T]) {
        if self.unreadable.iter().any(|k| *k == key) {
            error!(
                target: STORE,
                msg = "Not saving collection over unreadable stored data",
                key,
                count = items.len()
            );
            return;
        }
        persist(self.store.as_ref(), key, items);
    }
}

/// Outcome of reading one collection from the store
enum Loaded<T> {
    Complete(Vec<T>),
    /// Some or all of the stored data could not be read
    Partial(Vec<T>),
}

impl<T> Loaded<T> {
    fn into_items(self, key: &'static str, unreadable: &mut Vec<&'static str>) -> Vec<T> {
        match self {
            Loaded::Complete(items) => items,
            Loaded::Partial(items) => {
                unreadable.push(key);
                items
            }
        }
    }
}

///
/// Read a collection, seeding it if it has never been written.
///
/// Entries are decoded one by one; an entry that does not decode is logged and skipped.
///
fn load_collection<T, F>(store: &dyn Store, key: &str, seed: F) -> Loaded<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    match store.load(key) {
        Ok(Some(bytes)) => match serde_json::from_slice::<Vec<serde_json::Value>>(&bytes) {
            Ok(values) => decode_entries(key, values),
            Err(err) => {
                error!(
                    target: STORE,
                    msg = "Could not parse collection",
                    key,
                    error = err.to_string()
                );
                Loaded::Partial(Vec::new())
            }
        },
        Ok(None) => {
            let items = seed();
            persist(store, key, &items);
            info!(target: STORE, msg = "Seeded collection", key, count = items.len());
            Loaded::Complete(items)
        }
        Err(err) => {
            error!(
                target: STORE,
                msg = "Could not load collection",
                key,
                error = err.to_string()
            );
            Loaded::Partial(Vec::new())
        }
    }
}

fn decode_entries<T: DeserializeOwned>(key: &str, values: Vec<serde_json::Value>) -> Loaded<T> {
    let total = values.len();
    let mut items = Vec::with_capacity(total);

    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(item) => items.push(item),
            Err(err) => {
                warn!(
                    target: STORE,
                    msg = "Skipping unreadable entry",
                    key,
                    index,
                    error = err.to_string()
                );
            }
        }
    }

    if items.len() == total {
        Loaded::Complete(items)
    } else {
        Loaded::Partial(items)
    }
}

fn persist<T: Serialize>(store: &dyn Store, key: &str, items: &[T]) {
    let result = serde_json::to_vec(items)
        .map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })
        .and_then(|bytes| store.save(key, &bytes));

    if let Err(err) = result {
        error!(
            target: STORE,
            msg = "Could not save collection",
            key,
            error = err.to_string()
        );
    }
}
