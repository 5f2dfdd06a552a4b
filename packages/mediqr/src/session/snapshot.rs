use crate::model::{Appointment, MedicalRecord, Patient};
use clap::ValueEnum;

const RECENT_ACTIVITY_LIMIT: usize = 4;
const UNKNOWN_PATIENT: &str = "Unknown Patient";

///
/// Read-only copy of the three collections taken by the last successful refresh.
///
/// `appointments` only holds the appointments for the day the refresh ran.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub patients: Vec<Patient>,
    pub records: Vec<MedicalRecord>,
    pub appointments: Vec<Appointment>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum RecordSort {
    /// Newest first
    #[default]
    DateDesc,
    /// Oldest first
    DateAsc,
    /// By record type, newest first within a type
    Type,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_patients: usize,
    pub active_patients: usize,
    pub total_records: usize,
    pub appointments_today: usize,
}

/// A recent record together with the name of the patient it belongs to
#[derive(Clone, Debug, PartialEq)]
pub struct Activity {
    pub record: MedicalRecord,
    pub patient_name: String,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty() && self.records.is_empty() && self.appointments.is_empty()
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Case-insensitive match on name or id. An empty term matches everyone.
    pub fn search_patients(&self, term: &str) -> Vec<&Patient> {
        let term = term.to_lowercase();
        self.patients
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&term) || p.id.to_lowercase().contains(&term))
            .collect()
    }

    pub fn records_for(&self, patient_id: &str, sort: RecordSort) -> Vec<&MedicalRecord> {
        let mut records = self
            .records
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .collect::<Vec<_>>();

        match sort {
            RecordSort::DateDesc => records.sort_by(|a, b| b.date.cmp(&a.date)),
            RecordSort::DateAsc => records.sort_by(|a, b| a.date.cmp(&b.date)),
            RecordSort::Type => records.sort_by(|a, b| {
                a.record_type
                    .label()
                    .cmp(b.record_type.label())
                    .then_with(|| b.date.cmp(&a.date))
            }),
        }

        records
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total_patients: self.patients.len(),
            active_patients: self.patients.iter().filter(|p| p.is_active()).count(),
            total_records: self.records.len(),
            appointments_today: self.appointments.len(),
        }
    }

    /// The newest records across all patients
    pub fn recent_activity(&self) -> Vec<Activity> {
        let mut records = self.records.iter().collect::<Vec<_>>();
        records.sort_by(|a, b| b.date.cmp(&a.date));

        records
            .into_iter()
            .take(RECENT_ACTIVITY_LIMIT)
            .map(|record| Activity {
                record: record.clone(),
                patient_name: self
                    .patient(&record.patient_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| UNKNOWN_PATIENT.to_string()),
            })
            .collect()
    }
}
