use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A dated clinical note that belongs to exactly one patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    /// `rec` followed by a zero-padded ordinal, e.g. `rec001`
    pub id: String,
    pub patient_id: String,
    /// Assigned by the database when the record is created
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub title: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub doctor_name: String,
}

/// Fields supplied when adding a record. There is deliberately no `date`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewMedicalRecord {
    pub patient_id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub title: String,
    pub details: String,
    pub doctor_name: String,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum RecordType {
    #[default]
    Consultation,
    #[serde(rename = "Lab Report")]
    LabReport,
    Prescription,
    Note,
}

impl RecordType {
    pub fn label(&self) -> &'static str {
        match self {
            RecordType::Consultation => "Consultation",
            RecordType::LabReport => "Lab Report",
            RecordType::Prescription => "Prescription",
            RecordType::Note => "Note",
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}
