//! Patient QR codes: the payload format, the remote decoder and the lookup flows built on them.

mod client;
mod payload;

pub use client::{decoded_text, DecodeResult, QrDecoder, QrImage, QrServerClient, Symbol};
pub use payload::{image_url, QrPayload};

use crate::error::Error;
use crate::log::QR;
use crate::model::Patient;
use crate::services::RecordsService;
use tracing::{debug, info};

///
/// Resolve decoded QR text to a patient.
///
/// Only the `patient_id` is trusted; a `name` in the payload is ignored.
///
pub async fn lookup_payload(service: &dyn RecordsService, text: &str) -> Result<Patient, Error> {
    find_patient(service, QrPayload::parse(text)?).await
}

/// The patient a parsed payload points at
pub async fn find_patient(
    service: &dyn RecordsService,
    payload: QrPayload,
) -> Result<Patient, Error> {
    debug!(target: QR, msg = "Looking up patient", patient_id = payload.patient_id);

    service
        .get_patient(&payload.patient_id)
        .await?
        .ok_or(Error::PatientNotFound {
            id: payload.patient_id,
        })
}

/// Decode an uploaded image and resolve it to a patient
pub async fn scan_patient(
    decoder: &dyn QrDecoder,
    service: &dyn RecordsService,
    image: QrImage,
) -> Result<Patient, Error> {
    let text = decoder.decode(image).await?;
    let patient = lookup_payload(service, &text).await?;
    info!(target: QR, msg = "Patient found", id = patient.id);
    Ok(patient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Api;
    use crate::config::ApiConfig;
    use crate::error::QrError;
    use crate::test_helpers::{empty_database, fixed_clock, new_patient};
    use std::time::Duration;

    struct StaticDecoder(Option<&'static str>);

    #[async_trait::async_trait]
    impl QrDecoder for StaticDecoder {
        async fn decode(&self, _image: QrImage) -> Result<String, Error> {
            match self.0 {
                Some(text) => Ok(text.to_string()),
                None => Err(QrError::Undecodable.into()),
            }
        }
    }

    fn image() -> QrImage {
        QrImage {
            file_name: "card.png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    fn api_with_patient() -> Api {
        let (mut database, _store) = empty_database(fixed_clock());
        database.create_patient(new_patient("John Doe"));
        Api::new(database, &ApiConfig::with_latency(Duration::ZERO))
    }

    #[tokio::test]
    async fn scans_card_to_patient() {
        let api = api_with_patient();
        let decoder = StaticDecoder(Some("patient_id=p001&name=JohnDoe"));

        let patient = scan_patient(&decoder, &api, image()).await.unwrap();

        assert_eq!(patient.id, "p001");
        assert_eq!(patient.name, "John Doe");
    }

    #[tokio::test]
    async fn name_in_payload_is_not_trusted() {
        let api = api_with_patient();

        let patient = lookup_payload(&api, "patient_id=p001&name=Somebody")
            .await
            .unwrap();

        assert_eq!(patient.name, "John Doe");
    }

    #[tokio::test]
    async fn parsed_payload_resolves_by_patient_id() {
        let api = api_with_patient();
        let payload = QrPayload::parse("?patient_id=p001").unwrap();

        let patient = find_patient(&api, payload).await.unwrap();

        assert_eq!(patient.id, "p001");

        let missing = QrPayload::for_patient("p002", "John Doe");
        assert!(matches!(
            find_patient(&api, missing).await,
            Err(Error::PatientNotFound { id }) if id == "p002"
        ));
    }

    #[tokio::test]
    async fn unknown_patient() {
        let api = api_with_patient();

        let err = lookup_payload(&api, "patient_id=p404").await.unwrap_err();

        assert!(matches!(&err, Error::PatientNotFound { id } if id == "p404"));
        assert_eq!(err.to_string(), "Patient with ID \"p404\" not found.");
    }

    #[tokio::test]
    async fn payload_without_patient_id() {
        let api = api_with_patient();
        let decoder = StaticDecoder(Some("hello world"));

        let err = scan_patient(&decoder, &api, image()).await.unwrap_err();

        assert!(matches!(err, Error::Qr(QrError::MissingPatientId)));
    }

    #[tokio::test]
    async fn undecodable_image() {
        let api = api_with_patient();
        let decoder = StaticDecoder(None);

        let err = scan_patient(&decoder, &api, image()).await.unwrap_err();

        assert_eq!(err.to_string(), "Could not decode QR code from the image.");
    }
}
