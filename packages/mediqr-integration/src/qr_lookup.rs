#[cfg(test)]
mod tests {
    use crate::common::{clock, front_desk, patient};
    use mediqr::error::{Error, QrError};
    use mediqr::model::Role;
    use mediqr::qr::{self, QrDecoder, QrImage};
    use mediqr::store::MemoryStore;
    use std::sync::Arc;

    /// Decodes every image to the text it was built with
    struct EchoDecoder;

    #[async_trait::async_trait]
    impl QrDecoder for EchoDecoder {
        async fn decode(&self, image: QrImage) -> Result<String, Error> {
            String::from_utf8(image.bytes).map_err(|_| QrError::Undecodable.into())
        }
    }

    fn card(text: &str) -> QrImage {
        QrImage {
            file_name: "card.png".to_string(),
            bytes: text.as_bytes().to_vec(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn printed_card_scans_back_to_its_patient() {
        let (api, mut session) = front_desk(Arc::new(MemoryStore::new()), clock()).await;
        session.login(Role::Doctor).await;

        let ann = session.add_patient(patient("Ann Marie Lee")).await.unwrap();
        assert_eq!(ann.qr_code_data, "patient_id=p004&name=AnnMarieLee");

        let scanned = qr::scan_patient(&EchoDecoder, &api, card(&ann.qr_code_data))
            .await
            .unwrap();

        assert_eq!(scanned, ann);
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_cards_resolve() {
        let (api, _session) = front_desk(Arc::new(MemoryStore::new()), clock()).await;

        let jane = qr::lookup_payload(&api, "patient_id=p002&name=JaneSmith")
            .await
            .unwrap();

        assert_eq!(jane.name, "Jane Smith");
    }

    #[tokio::test(start_paused = true)]
    async fn deleted_patient_card_is_reported() {
        let (api, mut session) = front_desk(Arc::new(MemoryStore::new()), clock()).await;
        session.login(Role::Doctor).await;
        let card_text = session.lookup_patient("p003").await.unwrap().qr_code_data;

        session.remove_patient("p003").await.unwrap();

        let err = qr::scan_patient(&EchoDecoder, &api, card(&card_text))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Patient with ID \"p003\" not found.");
    }

    #[tokio::test(start_paused = true)]
    async fn unrelated_qr_code_is_rejected() {
        let (api, _session) = front_desk(Arc::new(MemoryStore::new()), clock()).await;

        let err = qr::scan_patient(&EchoDecoder, &api, card("https://example.com/menu"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid QR code data. Patient ID not found.");
    }
}
