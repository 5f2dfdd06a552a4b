mod appointment;
mod patient;
mod record;
mod user;

pub use appointment::Appointment;
pub use patient::{Gender, IdProofType, NewPatient, Patient, PatientStatus, PatientUpdate};
pub use record::{MedicalRecord, NewMedicalRecord, RecordType};
pub use user::{Role, User};
