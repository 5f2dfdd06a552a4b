use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

/// A registered patient.
///
/// Identity (`id`, `created_at`, `qr_code_data`) is assigned once by the
/// [`Database`](crate::database::Database) at creation and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// `p` followed by a zero-padded ordinal, e.g. `p001`
    pub id: String,
    pub name: String,
    /// Date of birth (YYYY-MM-DD)
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    pub gender: Gender,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
    pub status: PatientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Payload rendered into the patient's QR card, see [`QrPayload`](crate::qr::QrPayload)
    pub qr_code_data: String,

    #[serde(
        default,
        deserialize_with = "id_proof_type_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id_proof_type: Option<IdProofType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_proof_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_policy_number: Option<String>,
}

/// Fields supplied when registering a patient.
///
/// Nothing here is validated by the data access layer: partially populated
/// input is stored as given.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPatient {
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: Gender,
    pub contact: String,
    pub address: String,
    pub status: PatientStatus,
    #[serde(deserialize_with = "id_proof_type_or_none")]
    pub id_proof_type: Option<IdProofType>,
    pub id_proof_number: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_policy_number: Option<String>,
}

/// A partial update. `None` leaves the existing value untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub status: Option<PatientStatus>,
    #[serde(deserialize_with = "id_proof_type_or_none")]
    pub id_proof_type: Option<IdProofType>,
    pub id_proof_number: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_policy_number: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum PatientStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum IdProofType {
    Aadhaar,
    #[serde(rename = "PAN Card")]
    PanCard,
    Passport,
    #[serde(rename = "Voter ID")]
    VoterId,
    #[serde(rename = "Driving License")]
    DrivingLicense,
}

/// An empty or unrecognised ID proof type reads as no ID proof type
fn id_proof_type_or_none<'de, D>(deserializer: D) -> Result<Option<IdProofType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

impl Patient {
    pub fn is_active(&self) -> bool {
        self.status == PatientStatus::Active
    }

    /// Merge `update` over this patient. Identity fields and timestamps are left alone.
    pub(crate) fn apply(&mut self, update: PatientUpdate) {
        let PatientUpdate {
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
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if dob.is_some() {
            self.dob = dob;
        }
        if let Some(gender) = gender {
            self.gender = gender;
        }
        if let Some(contact) = contact {
            self.contact = contact;
        }
        if let Some(address) = address {
            self.address = address;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if id_proof_type.is_some() {
            self.id_proof_type = id_proof_type;
        }
        if id_proof_number.is_some() {
            self.id_proof_number = id_proof_number;
        }
        if insurance_provider.is_some() {
            self.insurance_provider = insurance_provider;
        }
        if insurance_policy_number.is_some() {
            self.insurance_policy_number = insurance_policy_number;
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        f.pad(s)
    }
}

impl Display for PatientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PatientStatus::Active => "Active",
            PatientStatus::Inactive => "Inactive",
        };
        f.pad(s)
    }
}

impl Display for IdProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IdProofType::Aadhaar => "Aadhaar",
            IdProofType::PanCard => "PAN Card",
            IdProofType::Passport => "Passport",
            IdProofType::VoterId => "Voter ID",
            IdProofType::DrivingLicense => "Driving License",
        };
        f.pad(s)
    }
}
