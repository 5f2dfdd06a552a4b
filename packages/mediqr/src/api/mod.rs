use crate::config::ApiConfig;
use crate::database::Database;
use crate::error::Error;
use crate::log::API;
use crate::model::{
    Appointment, MedicalRecord, NewMedicalRecord, NewPatient, Patient, PatientUpdate,
};
use crate::services::RecordsService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::trace;

///
/// Asynchronous facade over the [`Database`].
///
/// Every call waits out the configured latency before running the underlying
/// operation to completion under a single lock, so two calls never interleave
/// their effects.
///
#[derive(Clone, Debug)]
pub struct Api {
    database: Arc<Mutex<Database>>,
    latency: Duration,
}

impl Api {
    pub fn new(database: Database, config: &ApiConfig) -> Self {
        Api {
            database: Arc::new(Mutex::new(database)),
            latency: config.latency(),
        }
    }

    /// Flush the underlying store. Called once at shutdown.
    pub async fn flush(&self) -> Result<(), Error> {
        self.database.lock().await.flush()
    }

    async fn delay(&self, operation: &'static str) {
        trace!(target: API, msg = "Simulating latency", operation, latency_ms = self.latency.as_millis() as u64);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait::async_trait]
impl RecordsService for Api {
    async fn list_patients(&self) -> Result<Vec<Patient>, Error> {
        self.delay("list_patients").await;
        Ok(self.database.lock().await.list_patients())
    }

    async fn get_patient(&self, id: &str) -> Result<Option<Patient>, Error> {
        self.delay("get_patient").await;
        Ok(self.database.lock().await.get_patient(id))
    }

    async fn create_patient(&self, new: NewPatient) -> Result<Patient, Error> {
        self.delay("create_patient").await;
        Ok(self.database.lock().await.create_patient(new))
    }

    async fn update_patient(
        &self,
        id: &str,
        update: PatientUpdate,
    ) -> Result<Option<Patient>, Error> {
        self.delay("update_patient").await;
        Ok(self.database.lock().await.update_patient(id, update))
    }

    async fn delete_patient(&self, id: &str) -> Result<bool, Error> {
        self.delay("delete_patient").await;
        Ok(self.database.lock().await.delete_patient(id))
    }

    async fn list_all_records(&self) -> Result<Vec<MedicalRecord>, Error> {
        self.delay("list_all_records").await;
        Ok(self.database.lock().await.list_all_records())
    }

    async fn list_records_for_patient(
        &self,
        patient_id: &str,
    ) -> Result<Vec<MedicalRecord>, Error> {
        self.delay("list_records_for_patient").await;
        Ok(self.database.lock().await.list_records_for_patient(patient_id))
    }

    async fn create_medical_record(&self, new: NewMedicalRecord) -> Result<MedicalRecord, Error> {
        self.delay("create_medical_record").await;
        Ok(self.database.lock().await.create_medical_record(new))
    }

    async fn delete_medical_record(&self, id: &str) -> Result<bool, Error> {
        self.delay("delete_medical_record").await;
        Ok(self.database.lock().await.delete_medical_record(id))
    }

    async fn list_appointments_for_today(&self) -> Result<Vec<Appointment>, Error> {
        self.delay("list_appointments_for_today").await;
        Ok(self.database.lock().await.list_appointments_for_today())
    }
}
