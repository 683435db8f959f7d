/// Most screenshots accepted in a single submission.
pub const MAX_BATCH: usize = 4;

#[derive(Debug, PartialEq, Eq)]
pub enum AdmissionError {
    EmptyBatch,
    /// The team already holds `cap` records, nothing more may be created.
    CapReached { cap: i64 },
    /// The batch would push the team past the cap, no partial admission.
    NotEnoughSlots { remaining: i64 },
    BatchTooLarge { got: usize },
    NotAnImage { index: usize },
}

impl AdmissionError {
    pub fn message(&self) -> String {
        match self {
            Self::EmptyBatch => "No screenshots in upload".to_string(),
            Self::CapReached { cap } => format!(
                "You have reached the maximum number of matches ({}) for this tournament",
                cap
            ),
            Self::NotEnoughSlots { remaining } => format!(
                "You can only upload {} more screenshot{} for this tournament",
                remaining,
                if *remaining == 1 { "" } else { "s" }
            ),
            Self::BatchTooLarge { .. } => {
                format!("You can only upload up to {} screenshots at once", MAX_BATCH)
            }
            Self::NotAnImage { index } => {
                format!("Screenshot {}: please upload only image files", index + 1)
            }
        }
    }
}

/// Gate run before any item of a batch is processed. `existing` is the
/// team's record count across the whole tournament, not per day. Checked
/// under no lock, two racing submissions can both pass (see DESIGN.md).
pub fn admit_batch(
    existing: i64,
    cap: i64,
    screenshots: &[crate::UploadedScreenshot],
) -> Result<(), AdmissionError> {
    if screenshots.is_empty() {
        return Err(AdmissionError::EmptyBatch);
    }

    if existing >= cap {
        return Err(AdmissionError::CapReached { cap });
    }

    if existing + screenshots.len() as i64 > cap {
        return Err(AdmissionError::NotEnoughSlots {
            remaining: cap - existing,
        });
    }

    if screenshots.len() > MAX_BATCH {
        return Err(AdmissionError::BatchTooLarge {
            got: screenshots.len(),
        });
    }

    for (index, screenshot) in screenshots.iter().enumerate() {
        let image_mime = screenshot
            .content_type
            .as_deref()
            .map(|c| c.starts_with("image/"))
            .unwrap_or(false);

        if !image_mime || image::guess_format(&screenshot.bytes).is_err() {
            return Err(AdmissionError::NotAnImage { index });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{admit_batch, AdmissionError, MAX_BATCH};
    use crate::UploadedScreenshot;

    static PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png(name: &str) -> UploadedScreenshot {
        UploadedScreenshot {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: axum::body::Bytes::copy_from_slice(&PNG_SIGNATURE),
        }
    }

    #[test]
    fn admits_within_cap() {
        let batch = vec![png("1.png"), png("2.png")];

        assert_eq!(admit_batch(4, 6, &batch), Ok(()));
    }

    #[test]
    fn rejects_when_cap_reached() {
        let batch = vec![png("1.png")];

        assert_eq!(
            admit_batch(6, 6, &batch),
            Err(AdmissionError::CapReached { cap: 6 })
        );
    }

    #[test]
    fn whole_batch_rejected_when_over_remaining() {
        // 5 of 6 used, a batch of 2 must not be partially admitted
        let batch = vec![png("1.png"), png("2.png")];
        let result = admit_batch(5, 6, &batch);

        assert_eq!(result, Err(AdmissionError::NotEnoughSlots { remaining: 1 }));

        let message = result.unwrap_err().message();
        assert!(message.contains("1 more screenshot "));
    }

    #[test]
    fn rejects_oversized_batches() {
        let batch: Vec<_> = (0..5).map(|i| png(&format!("{}.png", i))).collect();

        assert_eq!(
            admit_batch(0, 20, &batch),
            Err(AdmissionError::BatchTooLarge { got: MAX_BATCH + 1 })
        );
    }

    #[test]
    fn rejects_non_image_items_before_processing() {
        let mut batch = vec![png("1.png")];
        batch.push(UploadedScreenshot {
            file_name: "results.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: axum::body::Bytes::from_static(b"placement: 1"),
        });

        assert_eq!(
            admit_batch(0, 6, &batch),
            Err(AdmissionError::NotAnImage { index: 1 })
        );
    }

    #[test]
    fn rejects_mislabeled_content() {
        let batch = vec![UploadedScreenshot {
            file_name: "fake.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: axum::body::Bytes::from_static(b"not really an image"),
        }];

        assert_eq!(
            admit_batch(0, 6, &batch),
            Err(AdmissionError::NotAnImage { index: 0 })
        );
    }

    #[test]
    fn empty_batches_are_rejected() {
        assert_eq!(admit_batch(0, 6, &[]), Err(AdmissionError::EmptyBatch));
    }
}
