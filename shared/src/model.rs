use serde::Deserialize;
use serde_json::Value;

use crate::error::SelectError;

/// One label entry as the analyzer writes it. Older analyzer runs used
/// `desc`, newer ones `description`; both are accepted, `desc` wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLabel {
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// The analysis record as served by the single-slot result endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnalysis {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default, rename = "processedAt")]
    pub processed_at: Option<String>,
    #[serde(default)]
    pub labels: Option<Vec<RawLabel>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub desc: String,
    pub score: f64,
}

/// UI-facing projection of an analysis record. `labels` is always present
/// (possibly empty) and `metadata` keeps its display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedResult {
    pub labels: Vec<Label>,
    pub metadata: Vec<(String, String)>,
    pub raw: Value,
}

/// Body of a successful upload call.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default, rename = "fileId")]
    pub file_id: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
}

impl UploadResponse {
    /// The identifier used to correlate the later poll result. The endpoint
    /// historically returned it under `file`; `fileId` takes precedence.
    pub fn correlation_id(&self) -> Option<&str> {
        self.file_id
            .as_deref()
            .or(self.file.as_deref())
            .filter(|id| !id.is_empty())
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Gate for every acquisition path; runs before any network call.
pub fn validate_selection(mime: &str, name: &str) -> Result<(), SelectError> {
    if is_image_mime(mime) {
        Ok(())
    } else {
        Err(SelectError::NotAnImage(name.to_string()))
    }
}

/// File size for the preview card, one-decimal KB.
pub fn size_kb(bytes: f64) -> String {
    format!("{:.1} KB", bytes / 1024.0)
}

/// Projects a raw analysis record into the shape the views consume. The
/// untouched value is kept for the raw-JSON tab. "File ID" falls back to the
/// session's correlation id when the record carries none.
pub fn normalize(raw: &Value, fallback_id: Option<&str>) -> NormalizedResult {
    let parsed: RawAnalysis = serde_json::from_value(raw.clone()).unwrap_or_default();

    let labels = parsed
        .labels
        .unwrap_or_default()
        .into_iter()
        .map(|l| Label {
            desc: l.desc.or(l.description).unwrap_or_default(),
            score: l.score.unwrap_or(0.0),
        })
        .collect();

    let file_id = parsed
        .id
        .or_else(|| fallback_id.map(str::to_owned))
        .unwrap_or_default();
    let metadata = vec![
        ("File ID".to_string(), file_id),
        ("File name".to_string(), parsed.name.unwrap_or_default()),
        ("Bucket".to_string(), parsed.bucket.unwrap_or_default()),
        (
            "Processed at".to_string(),
            parsed.processed_at.unwrap_or_default(),
        ),
    ];

    NormalizedResult {
        labels,
        metadata,
        raw: raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_maps_description_and_file_id() {
        let raw = json!({"id": "A", "labels": [{"description": "cat", "score": 0.9}]});
        let result = normalize(&raw, None);

        assert_eq!(
            result.labels,
            vec![Label {
                desc: "cat".to_string(),
                score: 0.9
            }]
        );
        assert_eq!(result.metadata[0], ("File ID".to_string(), "A".to_string()));
        assert_eq!(result.raw, raw);
    }

    #[test]
    fn normalize_prefers_desc_over_description_and_defaults_score() {
        let raw = json!({"labels": [{"desc": "dog", "description": "ignored"}]});
        let result = normalize(&raw, None);

        assert_eq!(result.labels.len(), 1);
        assert_eq!(result.labels[0].desc, "dog");
        assert_eq!(result.labels[0].score, 0.0);
    }

    #[test]
    fn normalize_falls_back_to_session_id_and_keeps_metadata_order() {
        let raw = json!({
            "name": "photo.png",
            "bucket": "uploads",
            "processedAt": "2024-01-01T00:00:00Z"
        });
        let result = normalize(&raw, Some("fallback-7"));

        let keys: Vec<&str> = result.metadata.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["File ID", "File name", "Bucket", "Processed at"]);
        assert_eq!(result.metadata[0].1, "fallback-7");
        assert_eq!(result.metadata[1].1, "photo.png");
        assert_eq!(result.metadata[2].1, "uploads");
        assert_eq!(result.metadata[3].1, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn normalize_without_labels_yields_empty_vec() {
        let result = normalize(&json!({"id": "B"}), None);
        assert!(result.labels.is_empty());
    }

    #[test]
    fn upload_response_prefers_file_id_over_file() {
        let body: UploadResponse =
            serde_json::from_value(json!({"fileId": "abc", "file": "def"})).unwrap();
        assert_eq!(body.correlation_id(), Some("abc"));

        let body: UploadResponse = serde_json::from_value(json!({"file": "def"})).unwrap();
        assert_eq!(body.correlation_id(), Some("def"));

        let body: UploadResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.correlation_id(), None);

        let body: UploadResponse = serde_json::from_value(json!({"fileId": ""})).unwrap();
        assert_eq!(body.correlation_id(), None);
    }

    #[test]
    fn image_mime_check() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("image/svg+xml"));
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime(""));
    }

    #[test]
    fn non_image_selection_is_rejected_with_the_filename() {
        assert_eq!(
            validate_selection("application/pdf", "report.pdf"),
            Err(SelectError::NotAnImage("report.pdf".to_string()))
        );
        assert_eq!(validate_selection("image/jpeg", "photo.jpg"), Ok(()));
    }

    #[test]
    fn size_kb_rounds_to_one_decimal() {
        assert_eq!(size_kb(1024.0), "1.0 KB");
        assert_eq!(size_kb(1536.0), "1.5 KB");
        assert_eq!(size_kb(100.0), "0.1 KB");
    }
}
