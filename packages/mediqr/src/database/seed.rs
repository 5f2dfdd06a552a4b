use crate::model::{
    Appointment, Gender, IdProofType, MedicalRecord, Patient, PatientStatus, RecordType,
};
use crate::clock::next_local_day;
use crate::qr::QrPayload;
use chrono::{DateTime, NaiveDate, Utc};

fn timestamp(s: &str) -> DateTime<Utc> {
    s.parse().unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn patient(
    id: &str,
    name: &str,
    dob: (i32, u32, u32),
    gender: Gender,
    contact: &str,
    address: &str,
    status: PatientStatus,
    created_at: &str,
    id_proof: (IdProofType, &str),
    insurance: (&str, &str),
) -> Patient {
    let created_at = timestamp(created_at);
    Patient {
        id: id.to_string(),
        name: name.to_string(),
        dob: NaiveDate::from_ymd_opt(dob.0, dob.1, dob.2),
        gender,
        contact: contact.to_string(),
        address: address.to_string(),
        status,
        created_at,
        updated_at: created_at,
        qr_code_data: QrPayload::for_patient(id, name).to_string(),
        id_proof_type: Some(id_proof.0),
        id_proof_number: Some(id_proof.1.to_string()),
        insurance_provider: Some(insurance.0.to_string()),
        insurance_policy_number: Some(insurance.1.to_string()),
    }
}

pub fn patients() -> Vec<Patient> {
    vec![
        patient(
            "p001",
            "John Doe",
            (1985, 5, 20),
            Gender::Male,
            "123-456-7890",
            "123 Main St, Anytown, USA",
            PatientStatus::Active,
            "2023-01-15T09:00:00Z",
            (IdProofType::Aadhaar, "1234 5678 9012"),
            ("MediCare Plus", "MCP987654321"),
        ),
        patient(
            "p002",
            "Jane Smith",
            (1992, 8, 12),
            Gender::Female,
            "987-654-3210",
            "456 Oak Ave, Anytown, USA",
            PatientStatus::Active,
            "2023-02-20T14:30:00Z",
            (IdProofType::Passport, "A1B23C45D"),
            ("Global Health", "GH123456789"),
        ),
        patient(
            "p003",
            "Peter Jones",
            (1978, 11, 3),
            Gender::Male,
            "555-123-4567",
            "789 Pine Ln, Anytown, USA",
            PatientStatus::Inactive,
            "2023-03-10T11:00:00Z",
            (IdProofType::DrivingLicense, "DL-XYZ-9876"),
            ("SafeGuard Insurance", "SGI-555-1234"),
        ),
    ]
}

pub fn records() -> Vec<MedicalRecord> {
    let record = |id: &str, patient_id: &str, date: &str, record_type, title: &str, details: &str| {
        MedicalRecord {
            id: id.to_string(),
            patient_id: patient_id.to_string(),
            date: timestamp(date),
            record_type,
            title: title.to_string(),
            details: details.to_string(),
            doctor_name: "Dr. Smith".to_string(),
        }
    };

    vec![
        record(
            "rec001",
            "p001",
            "2023-10-26T10:00:00Z",
            RecordType::Consultation,
            "Annual Check-up",
            "Patient is in good health. Advised to continue regular exercise and balanced diet.",
        ),
        record(
            "rec002",
            "p001",
            "2023-11-15T14:00:00Z",
            RecordType::LabReport,
            "Blood Test Results",
            "Cholesterol levels are slightly elevated. All other markers are within normal range.",
        ),
        record(
            "rec003",
            "p002",
            "2023-12-01T09:30:00Z",
            RecordType::Prescription,
            "Allergy Medication",
            "Prescribed Loratadine 10mg, once daily for seasonal allergies.",
        ),
    ]
}

/// Two appointments at `now` and one at the same time on the next local calendar day
pub fn appointments(now: DateTime<Utc>) -> Vec<Appointment> {
    let tomorrow = next_local_day(now);

    let appointment = |id: &str, patient_id: &str, date, title: &str, doctor_name: &str| Appointment {
        id: id.to_string(),
        patient_id: patient_id.to_string(),
        date,
        title: title.to_string(),
        doctor_name: doctor_name.to_string(),
    };

    vec![
        appointment("app001", "p001", now, "Follow-up Consultation", "Dr. Smith"),
        appointment("app002", "p002", now, "Annual Physical Exam", "Dr. Smith"),
        appointment("app003", "p001", tomorrow, "Dental Check-up", "Dr. Jones"),
    ]
}
