use crate::error::QrError;
use std::fmt::Display;
use url::Url;

const PATIENT_ID: &str = "patient_id";
const NAME: &str = "name";

/// The text carried by a patient's QR code: `patient_id=<id>&name=<name>`.
#[derive(Clone, Debug, PartialEq)]
pub struct QrPayload {
    pub patient_id: String,
    pub name: Option<String>,
}

impl QrPayload {
    /// Payload for a patient card. Whitespace is stripped from the name.
    pub fn for_patient(id: &str, name: &str) -> Self {
        QrPayload {
            patient_id: id.to_string(),
            name: Some(name.chars().filter(|c| !c.is_whitespace()).collect()),
        }
    }

    /// Parse decoded QR text as a form-urlencoded query string
    pub fn parse(text: &str) -> Result<Self, QrError> {
        let text = text.trim();
        let text = text.strip_prefix('?').unwrap_or(text);

        let mut patient_id = None;
        let mut name = None;

        for (key, value) in url::form_urlencoded::parse(text.as_bytes()) {
            match key.as_ref() {
                PATIENT_ID if patient_id.is_none() => patient_id = Some(value.into_owned()),
                NAME if name.is_none() => name = Some(value.into_owned()),
                _ => {}
            }
        }

        match patient_id {
            Some(patient_id) if !patient_id.is_empty() => Ok(QrPayload { patient_id, name }),
            _ => Err(QrError::MissingPatientId),
        }
    }

    /// Address of a `size`x`size` image of this payload rendered by the QR service at `endpoint`
    pub fn image_url(&self, endpoint: &str, size: u32) -> Result<Url, QrError> {
        image_url(endpoint, size, &self.to_string())
    }
}

///
/// Address of an image of `data` rendered as a QR code.
///
/// `data` is carried form-urlencoded in the `data` query parameter.
///
pub fn image_url(endpoint: &str, size: u32, data: &str) -> Result<Url, QrError> {
    let mut url = Url::parse(endpoint).map_err(|source| QrError::Endpoint {
        endpoint: endpoint.to_string(),
        source,
    })?;

    url.query_pairs_mut()
        .append_pair("size", &format!("{size}x{size}"))
        .append_pair("data", data);

    Ok(url)
}

impl Display for QrPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{PATIENT_ID}={}", self.patient_id)?;
        if let Some(name) = &self.name {
            write!(f, "&{NAME}={name}")?;
        }
        Ok(())
    }
}
