//! The front-desk session: who is logged in and what they currently see.

mod notice;
mod snapshot;

pub use notice::{Notice, NoticeKind};
pub use snapshot::{Activity, RecordSort, Snapshot, Stats};

use crate::error::Error;
use crate::log::SESSION;
use crate::model::{
    MedicalRecord, NewMedicalRecord, NewPatient, Patient, PatientUpdate, Role, User,
};
use crate::services::RecordsService;
use crate::store::{Store, USER_KEY};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const LOGGED_OUT: &str = "You have been logged out.";
const REFRESH_FAILED: &str = "Failed to load application data.";

///
/// Session state over a [`RecordsService`].
///
/// Logged out until [`Session::login`] or a persisted identity is found by [`Session::bootstrap`].
/// While logged in, [`Session::refresh`] replaces the [`Snapshot`] as a whole or not at all.
///
pub struct Session {
    service: Arc<dyn RecordsService>,
    store: Arc<dyn Store>,
    user: Option<User>,
    snapshot: ArcSwap<Snapshot>,
    notices: Vec<Notice>,
}

impl Session {
    pub fn new(service: Arc<dyn RecordsService>, store: Arc<dyn Store>) -> Self {
        Session {
            service,
            store,
            user: None,
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
            notices: Vec::new(),
        }
    }

    ///
    /// Restore the session identity persisted by a previous login.
    ///
    /// A missing or unreadable identity leaves the session logged out.
    ///
    pub async fn bootstrap(service: Arc<dyn RecordsService>, store: Arc<dyn Store>) -> Self {
        let mut session = Session::new(service, store);

        let user = match session.store.load(USER_KEY) {
            Ok(Some(bytes)) => match serde_json::from_slice::<User>(&bytes) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(target: SESSION, msg = "Ignoring unreadable session identity", error = err.to_string());
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(target: SESSION, msg = "Could not read session identity", error = err.to_string());
                None
            }
        };

        if let Some(user) = user {
            info!(target: SESSION, msg = "Session restored", user = user.id, role = %user.role);
            session.user = Some(user);
            session.refresh().await;
        } else {
            debug!(target: SESSION, msg = "No active session");
        }

        session
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// The collections as of the last successful refresh
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    /// Drain the notices raised since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub async fn login(&mut self, role: Role) -> User {
        let user = User::for_role(role);

        match serde_json::to_vec(&user) {
            Ok(bytes) => {
                if let Err(err) = self.store.save(USER_KEY, &bytes) {
                    error!(target: SESSION, msg = "Could not persist session identity", error = err.to_string());
                }
            }
            Err(err) => {
                error!(target: SESSION, msg = "Could not encode session identity", error = err.to_string());
            }
        }

        info!(target: SESSION, msg = "Logged in", user = user.id, role = %user.role);
        self.notices
            .push(Notice::success(format!("Welcome, {}!", user.name)));
        self.user = Some(user.clone());

        self.refresh().await;
        user
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.store.remove(USER_KEY) {
            error!(target: SESSION, msg = "Could not clear session identity", error = err.to_string());
        }

        if let Some(user) = self.user.take() {
            info!(target: SESSION, msg = "Logged out", user = user.id);
        }

        self.snapshot.store(Arc::new(Snapshot::default()));
        self.notices.push(Notice::success(LOGGED_OUT));
    }

    ///
    /// Reload all three collections concurrently.
    ///
    /// Does nothing while logged out. On any failure the previous snapshot is kept
    /// and an error notice is raised. Returns true when the snapshot was replaced.
    ///
    pub async fn refresh(&mut self) -> bool {
        if self.user.is_none() {
            return false;
        }

        let service = self.service.as_ref();
        let loaded = tokio::try_join!(
            service.list_patients(),
            service.list_all_records(),
            service.list_appointments_for_today()
        );

        match loaded {
            Ok((patients, records, appointments)) => {
                debug!(
                    target: SESSION,
                    msg = "Refreshed",
                    patients = patients.len(),
                    records = records.len(),
                    appointments = appointments.len()
                );
                self.snapshot.store(Arc::new(Snapshot {
                    patients,
                    records,
                    appointments,
                }));
                true
            }
            Err(err) => {
                error!(target: SESSION, msg = "Failed to refresh application data", error = err.to_string());
                self.notices.push(Notice::error(REFRESH_FAILED));
                false
            }
        }
    }

    ///
    /// Find a patient by id, trying the snapshot before asking the service.
    ///
    pub async fn lookup_patient(&self, id: &str) -> Result<Patient, Error> {
        let id = id.trim();

        if let Some(patient) = self.snapshot.load().patient(id) {
            return Ok(patient.clone());
        }

        self.service
            .get_patient(id)
            .await?
            .ok_or_else(|| Error::PatientNotFound { id: id.to_string() })
    }

    pub async fn add_patient(&mut self, new: NewPatient) -> Result<Patient, Error> {
        self.require_writer()?;
        let patient = self.service.create_patient(new).await?;
        self.refresh().await;
        Ok(patient)
    }

    pub async fn edit_patient(&mut self, id: &str, update: PatientUpdate) -> Result<Patient, Error> {
        self.require_writer()?;
        let patient = self
            .service
            .update_patient(id, update)
            .await?
            .ok_or_else(|| Error::PatientNotFound { id: id.to_string() })?;
        self.refresh().await;
        Ok(patient)
    }

    pub async fn remove_patient(&mut self, id: &str) -> Result<bool, Error> {
        self.require_writer()?;
        let removed = self.service.delete_patient(id).await?;
        if removed {
            self.refresh().await;
        }
        Ok(removed)
    }

    pub async fn add_record(&mut self, new: NewMedicalRecord) -> Result<MedicalRecord, Error> {
        self.require_writer()?;
        let record = self.service.create_medical_record(new).await?;
        self.refresh().await;
        Ok(record)
    }

    pub async fn remove_record(&mut self, id: &str) -> Result<bool, Error> {
        self.require_writer()?;
        let removed = self.service.delete_medical_record(id).await?;
        if removed {
            self.refresh().await;
        }
        Ok(removed)
    }

    fn require_writer(&self) -> Result<&User, Error> {
        match &self.user {
            None => Err(Error::NotLoggedIn),
            Some(user) if !user.can_write() => {
                warn!(target: SESSION, msg = "Write refused", user = user.id, role = %user.role);
                Err(Error::ReadOnlyRole { role: user.role })
            }
            Some(user) => Ok(user),
        }
    }
}
