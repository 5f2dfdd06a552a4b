use crate::config::QrConfig;
use crate::error::{Error, QrError};
use crate::log::QR;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, warn};

/// An image submitted for decoding
#[derive(Clone, Debug)]
pub struct QrImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Turns an image of a QR code into the text it carries
#[async_trait::async_trait]
pub trait QrDecoder: Send + Sync {
    async fn decode(&self, image: QrImage) -> Result<String, Error>;
}

///
/// Client for the qrserver.com `read-qr-code` endpoint.
///
/// The image is posted as the multipart field `file`. Failures are reported, never retried.
///
#[derive(Clone, Debug)]
pub struct QrServerClient {
    client: reqwest::Client,
    endpoint: String,
}

/// One entry of the endpoint's response array
#[derive(Debug, Deserialize)]
pub struct DecodeResult {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub symbol: Vec<Symbol>,
}

#[derive(Debug, Deserialize)]
pub struct Symbol {
    #[serde(default)]
    pub seq: Option<u32>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl QrServerClient {
    pub fn new(config: &QrConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(QrServerClient {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait::async_trait]
impl QrDecoder for QrServerClient {
    async fn decode(&self, image: QrImage) -> Result<String, Error> {
        debug!(target: QR, msg = "Decoding image", file_name = image.file_name, bytes = image.bytes.len());

        let part = Part::bytes(image.bytes).file_name(image.file_name);
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(QrError::Unreachable)?;

        let results: Vec<DecodeResult> = response.json().await.map_err(|err| {
            warn!(target: QR, msg = "Unexpected response from QR service", error = err.to_string());
            QrError::MalformedResponse
        })?;

        Ok(decoded_text(&results)?)
    }
}

///
/// Extract the payload of the first symbol.
///
/// Data wins over an error message; a symbol with neither could not be decoded.
///
pub fn decoded_text(results: &[DecodeResult]) -> Result<String, QrError> {
    let symbol = results
        .first()
        .and_then(|result| result.symbol.first())
        .ok_or(QrError::MalformedResponse)?;

    match (&symbol.data, &symbol.error) {
        (Some(data), _) if !data.is_empty() => Ok(data.to_owned()),
        (_, Some(message)) if !message.is_empty() => Err(QrError::Decode {
            message: message.to_owned(),
        }),
        _ => Err(QrError::Undecodable),
    }
}
