use crate::config::{LogConfig, LogFormat, LogLevel, QrConfig, DEFAULT_CONFIG_FILE_PATH};
use crate::error::Error;
use crate::log::{DEVELOPMENT, QR};
use crate::model::{
    Gender, IdProofType, MedicalRecord, NewMedicalRecord, NewPatient, Patient, PatientStatus,
    PatientUpdate, RecordType, Role,
};
use crate::qr::{self, QrDecoder, QrImage, QrPayload};
use crate::services::RecordsService;
use crate::session::{RecordSort, Session};
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Clone, Debug, Parser)]
#[command(version, about, verbatim_doc_comment)]
///
/// MediQR
///
/// Front-desk patient records with QR code lookup.
///
pub struct Args {
    /// Optional path to a MediQR configuration file.
    ///
    /// Default is "mediqr.toml".
    /// Configuration is loaded from this file, if present.
    /// Environment variables are used instead of the file or to override any values defined in the file.
    #[arg(short = 'p', long, default_value = DEFAULT_CONFIG_FILE_PATH, verbatim_doc_comment, global = true)]
    pub config_file_path: String,

    ///
    /// Optional log level.
    ///
    #[arg(short, long, value_enum, default_value_t = LogConfig::default_log_level(), env = "MEDIQR_LOG__LEVEL", global = true)]
    pub log_level: LogLevel,

    ///
    /// Optional log format. Default level is "pretty" if running in a terminal session, otherwise "structured".
    ///
    #[arg(short='f', long, value_enum, default_value_t = LogConfig::default_log_format(), env = "MEDIQR_LOG__FORMAT", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Start a session
    Login {
        #[arg(value_enum)]
        role: Role,
    },
    /// End the current session
    Logout,
    /// Show the logged in user
    Whoami,
    /// Counts, today's appointments and recent activity
    Dashboard,
    /// List patients
    Patients {
        /// Filter by name or id
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a patient and their medical records
    Show {
        id: String,
        #[arg(short, long, value_enum, default_value_t = RecordSort::DateDesc)]
        sort: RecordSort,
    },
    /// Register a new patient
    AddPatient(PatientFields),
    /// Change some of a patient's details
    UpdatePatient {
        id: String,
        #[command(flatten)]
        fields: PatientChanges,
    },
    /// Delete a patient with all their records and appointments
    DeletePatient { id: String },
    /// Add a medical record to a patient
    AddRecord(RecordFields),
    DeleteRecord { id: String },
    /// Look up a patient by id or by decoded QR text
    Lookup { query: String },
    /// Decode a QR code image and show the patient
    Scan { image: PathBuf },
}

#[derive(Clone, Debug, ClapArgs)]
pub struct PatientFields {
    #[arg(long)]
    pub name: String,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    pub dob: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t = Gender::Other)]
    pub gender: Gender,
    #[arg(long, default_value = "")]
    pub contact: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, value_enum, default_value_t = PatientStatus::Active)]
    pub status: PatientStatus,
    #[arg(long, value_enum)]
    pub id_proof_type: Option<IdProofType>,
    #[arg(long)]
    pub id_proof_number: Option<String>,
    #[arg(long)]
    pub insurance_provider: Option<String>,
    #[arg(long)]
    pub insurance_policy_number: Option<String>,
}

#[derive(Clone, Debug, ClapArgs)]
pub struct PatientChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub dob: Option<NaiveDate>,
    #[arg(long, value_enum)]
    pub gender: Option<Gender>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long, value_enum)]
    pub status: Option<PatientStatus>,
    #[arg(long, value_enum)]
    pub id_proof_type: Option<IdProofType>,
    #[arg(long)]
    pub id_proof_number: Option<String>,
    #[arg(long)]
    pub insurance_provider: Option<String>,
    #[arg(long)]
    pub insurance_policy_number: Option<String>,
}

#[derive(Clone, Debug, ClapArgs)]
pub struct RecordFields {
    #[arg(long)]
    pub patient_id: String,
    #[arg(long = "type", value_enum, default_value_t = RecordType::Consultation)]
    pub record_type: RecordType,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub details: String,
    /// Defaults to the logged in user's name
    #[arg(long)]
    pub doctor_name: Option<String>,
}

impl From<PatientFields> for NewPatient {
    fn from(fields: PatientFields) -> Self {
        NewPatient {
            name: fields.name,
            dob: fields.dob,
            gender: fields.gender,
            contact: fields.contact,
            address: fields.address,
            status: fields.status,
            id_proof_type: fields.id_proof_type,
            id_proof_number: fields.id_proof_number,
            insurance_provider: fields.insurance_provider,
            insurance_policy_number: fields.insurance_policy_number,
        }
    }
}

impl From<PatientChanges> for PatientUpdate {
    fn from(changes: PatientChanges) -> Self {
        PatientUpdate {
            name: changes.name,
            dob: changes.dob,
            gender: changes.gender,
            contact: changes.contact,
            address: changes.address,
            status: changes.status,
            id_proof_type: changes.id_proof_type,
            id_proof_number: changes.id_proof_number,
            insurance_provider: changes.insurance_provider,
            insurance_policy_number: changes.insurance_policy_number,
        }
    }
}

///
/// Runs the command specified on the command line against the session.
/// Output is written to stdout, followed by any notices the session raised.
///
pub async fn run(
    command: Commands,
    session: &mut Session,
    service: &dyn RecordsService,
    decoder: &dyn QrDecoder,
    qr_config: &QrConfig,
) -> Result<(), Error> {
    debug!(target: DEVELOPMENT, ?command);

    let result = execute(command, session, service, decoder, qr_config).await;

    for notice in session.take_notices() {
        println!("{notice}");
    }

    result
}

async fn execute(
    command: Commands,
    session: &mut Session,
    service: &dyn RecordsService,
    decoder: &dyn QrDecoder,
    qr_config: &QrConfig,
) -> Result<(), Error> {
    match command {
        Commands::Login { role } => {
            session.login(role).await;
        }
        Commands::Logout => session.logout(),
        Commands::Whoami => match session.user() {
            Some(user) => println!("{} ({}, {})", user.name, user.id, user.role),
            None => println!("Not logged in"),
        },
        Commands::Dashboard => {
            require_login(session)?;
            dashboard(session);
        }
        Commands::Patients { search } => {
            require_login(session)?;
            let snapshot = session.snapshot();
            let patients = snapshot.search_patients(search.as_deref().unwrap_or_default());
            if patients.is_empty() {
                println!("No patients found.");
            }
            for patient in patients {
                println!(
                    "{:<6} {:<24} {:<8} {}",
                    patient.id, patient.name, patient.status, patient.contact
                );
            }
        }
        Commands::Show { id, sort } => {
            require_login(session)?;
            let patient = session.lookup_patient(&id).await?;
            print_patient(&patient);
            print_card_image(qr_config, &patient);

            let snapshot = session.snapshot();
            let records = snapshot.records_for(&patient.id, sort);
            println!();
            println!("Medical records: {}", records.len());
            for record in records {
                print_record(record);
            }
        }
        Commands::AddPatient(fields) => {
            let patient = session.add_patient(fields.into()).await?;
            println!("Patient created: {}", patient.id);
            println!("QR code data: {}", patient.qr_code_data);
            print_card_image(qr_config, &patient);
        }
        Commands::UpdatePatient { id, fields } => {
            let patient = session.edit_patient(&id, fields.into()).await?;
            print_patient(&patient);
        }
        Commands::DeletePatient { id } => {
            if session.remove_patient(&id).await? {
                println!("Patient {id} deleted.");
            } else {
                return Err(Error::PatientNotFound { id });
            }
        }
        Commands::AddRecord(fields) => {
            let doctor_name = match fields.doctor_name {
                Some(name) => name,
                None => session.user().map(|u| u.name.clone()).unwrap_or_default(),
            };
            let record = session
                .add_record(NewMedicalRecord {
                    patient_id: fields.patient_id,
                    record_type: fields.record_type,
                    title: fields.title,
                    details: fields.details,
                    doctor_name,
                })
                .await?;
            println!("Record created: {}", record.id);
        }
        Commands::DeleteRecord { id } => {
            if session.remove_record(&id).await? {
                println!("Record {id} deleted.");
            } else {
                println!("No record with ID \"{id}\".");
            }
        }
        Commands::Lookup { query } => {
            let patient = match QrPayload::parse(&query) {
                Ok(payload) => qr::find_patient(service, payload).await?,
                Err(_) => session.lookup_patient(&query).await?,
            };
            print_patient(&patient);
        }
        Commands::Scan { image } => {
            let bytes = tokio::fs::read(&image).await?;
            let file_name = image
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "qr.png".to_string());

            let patient = qr::scan_patient(decoder, service, QrImage { file_name, bytes }).await?;
            print_patient(&patient);
        }
    }

    Ok(())
}

fn require_login(session: &Session) -> Result<(), Error> {
    if session.is_logged_in() {
        Ok(())
    } else {
        Err(Error::NotLoggedIn)
    }
}

fn dashboard(session: &Session) {
    let snapshot = session.snapshot();
    let stats = snapshot.stats();

    if let Some(user) = session.user() {
        println!("Welcome, {}!", user.name);
    }
    println!("Total patients:     {}", stats.total_patients);
    println!("Active patients:    {}", stats.active_patients);
    println!("Medical records:    {}", stats.total_records);
    println!("Appointments today: {}", stats.appointments_today);

    println!();
    println!("Today's appointments:");
    for appointment in &snapshot.appointments {
        let patient = snapshot
            .patient(&appointment.patient_id)
            .map(|p| p.name.as_str())
            .unwrap_or("Unknown Patient");
        println!(
            "  {} {:<24} {} ({})",
            appointment.date.with_timezone(&chrono::Local).format("%H:%M"),
            appointment.title,
            patient,
            appointment.doctor_name
        );
    }

    println!();
    println!("Recent activity:");
    for activity in snapshot.recent_activity() {
        println!(
            "  {} {:<12} {} - {}",
            activity.record.date.format("%Y-%m-%d"),
            activity.record.record_type,
            activity.record.title,
            activity.patient_name
        );
    }
}

fn print_patient(patient: &Patient) {
    println!("{} {}", patient.id, patient.name);
    if let Some(dob) = patient.dob {
        println!("  Date of birth: {dob}");
    }
    println!("  Gender:        {}", patient.gender);
    println!("  Status:        {}", patient.status);
    println!("  Contact:       {}", patient.contact);
    println!("  Address:       {}", patient.address);
    if let Some(proof) = patient.id_proof_type {
        println!(
            "  ID proof:      {proof} {}",
            patient.id_proof_number.as_deref().unwrap_or_default()
        );
    }
    if let Some(provider) = &patient.insurance_provider {
        println!(
            "  Insurance:     {provider} {}",
            patient.insurance_policy_number.as_deref().unwrap_or_default()
        );
    }
    println!("  QR code data:  {}", patient.qr_code_data);
}

/// Stored QR text goes into the image address unchanged
fn print_card_image(config: &QrConfig, patient: &Patient) {
    match qr::image_url(&config.create_endpoint, config.card_size, &patient.qr_code_data) {
        Ok(url) => println!("  QR code image: {url}"),
        Err(err) => warn!(
            target: QR,
            msg = "Could not build QR code image address",
            error = err.to_string()
        ),
    }
}

fn print_record(record: &MedicalRecord) {
    println!(
        "  {} {} {:<12} {} ({})",
        record.id,
        record.date.format("%Y-%m-%d %H:%M"),
        record.record_type,
        record.title,
        record.doctor_name
    );
    if !record.details.is_empty() {
        println!("      {}", record.details);
    }
}
