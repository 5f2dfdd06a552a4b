use crate::error::Error;
use crate::model::{
    Appointment, MedicalRecord, NewMedicalRecord, NewPatient, Patient, PatientUpdate,
};

/// The asynchronous patient records surface consumed by sessions and QR lookups
#[async_trait::async_trait]
pub trait RecordsService: Send + Sync {
    /// All patients, in insertion order
    async fn list_patients(&self) -> Result<Vec<Patient>, Error>;

    async fn get_patient(&self, id: &str) -> Result<Option<Patient>, Error>;

    /// Register a patient, assigning id, timestamps and QR payload
    async fn create_patient(&self, new: NewPatient) -> Result<Patient, Error>;

    /// Merge a partial update. `None` when no patient has the id.
    async fn update_patient(
        &self,
        id: &str,
        update: PatientUpdate,
    ) -> Result<Option<Patient>, Error>;

    /// Remove a patient along with their records and appointments
    async fn delete_patient(&self, id: &str) -> Result<bool, Error>;

    async fn list_all_records(&self) -> Result<Vec<MedicalRecord>, Error>;

    /// Records for one patient, newest first
    async fn list_records_for_patient(&self, patient_id: &str)
        -> Result<Vec<MedicalRecord>, Error>;

    async fn create_medical_record(&self, new: NewMedicalRecord) -> Result<MedicalRecord, Error>;

    async fn delete_medical_record(&self, id: &str) -> Result<bool, Error>;

    /// Appointments falling on the current local calendar day
    async fn list_appointments_for_today(&self) -> Result<Vec<Appointment>, Error>;
}
