use crate::model::Role;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("Patient with ID \"{id}\" not found.")]
    PatientNotFound { id: String },

    #[error(transparent)]
    Qr(#[from] QrError),

    #[error("Role {role} has read-only access")]
    ReadOnlyRole { role: Role },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value {value} for field {name} in configuration file or environment")]
    InvalidParameter { name: String, value: String },

    #[error("Missing field {name} from configuration file or environment")]
    MissingParameter { name: String },

    #[error(transparent)]
    FileOrEnvironment(#[from] config::ConfigError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not encode {key}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage quota exceeded writing {key}: {size} bytes exceeds {quota} bytes")]
    QuotaExceeded {
        key: String,
        size: usize,
        quota: usize,
    },

    #[error(transparent)]
    Sled(#[from] sled::Error),
}

#[derive(Error, Debug)]
pub enum QrError {
    #[error("{message}")]
    Decode { message: String },

    #[error("Invalid QR service endpoint {endpoint}")]
    Endpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("QR decoding service returned an unexpected response")]
    MalformedResponse,

    #[error("Invalid QR code data. Patient ID not found.")]
    MissingPatientId,

    #[error("Could not decode QR code from the image.")]
    Undecodable,

    #[error("QR decoding service is unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.into())
    }
}

impl From<sled::Error> for Error {
    fn from(e: sled::Error) -> Self {
        Error::Store(e.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Qr(e.into())
    }
}
