use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled visit. Appointments are only ever seeded or removed with their patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub date: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub doctor_name: String,
}
