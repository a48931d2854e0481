//! Import/export document format
//!
//! Two shapes are accepted:
//! - legacy: `{"Title": "lyrics", ...}`, the song store on its own
//! - bundle: `{"songs": {...}, "order": [...]}`, both stores
//!
//! A legacy import rebuilds the order fresh with every song visible. A bundle
//! import replaces both stores as given.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::library::Library;
use crate::models::{OrderEntry, SongBook};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransferDocument {
    Bundle {
        songs: SongBook,
        order: Vec<OrderEntry>,
    },
    Legacy(SongBook),
}

/// Shape written by an export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Bundle,
    Legacy,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bundle" => Ok(ExportFormat::Bundle),
            "legacy" => Ok(ExportFormat::Legacy),
            other => Err(Error::InvalidPayload(format!("unknown export format: {}", other))),
        }
    }
}

impl TransferDocument {
    /// Parse an import file in either shape
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|_| {
            Error::InvalidPayload(
                "expected {\"title\": \"lyrics\"} or {\"songs\": {...}, \"order\": [...]}".to_string(),
            )
        })
    }

    /// Library this document describes
    pub fn into_library(self) -> Library {
        match self {
            TransferDocument::Bundle { songs, order } => Library::new(songs, order),
            TransferDocument::Legacy(songs) => Library::reconciled(songs, Vec::new()),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_document_rebuilds_visible_order() {
        let doc = TransferDocument::parse(r#"{"Song B":"b","Song A":"a"}"#).unwrap();
        assert!(matches!(doc, TransferDocument::Legacy(_)));

        let library = doc.into_library();

        assert_eq!(
            library.order,
            vec![OrderEntry::visible("Song B"), OrderEntry::visible("Song A")]
        );
    }

    #[test]
    fn test_bundle_document_keeps_order_as_given() {
        let text = r#"{
            "songs": {"A": "a", "B": "b"},
            "order": [{"title": "B", "hidden": true}, {"title": "Orphan", "hidden": false}]
        }"#;

        let library = TransferDocument::parse(text).unwrap().into_library();

        assert_eq!(library.songs.len(), 2);
        assert_eq!(
            library.order,
            vec![OrderEntry::hidden("B"), OrderEntry::visible("Orphan")]
        );
    }

    #[test]
    fn test_legacy_songs_titled_songs_and_order() {
        // Titles that collide with the bundle keys are still legacy documents
        let doc = TransferDocument::parse(r#"{"songs":"la la","order":"do re mi"}"#).unwrap();

        let library = doc.into_library();

        assert_eq!(library.songs.get("songs"), Some("la la"));
        assert_eq!(library.songs.get("order"), Some("do re mi"));
    }

    #[test]
    fn test_unrecognised_shape_is_invalid_payload() {
        for text in ["[1,2,3]", r#"{"A": 1}"#, "nonsense"] {
            assert!(
                matches!(TransferDocument::parse(text), Err(Error::InvalidPayload(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("legacy".parse::<ExportFormat>().unwrap(), ExportFormat::Legacy);
        assert_eq!("bundle".parse::<ExportFormat>().unwrap(), ExportFormat::Bundle);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_legacy_export_shape() {
        let songs: SongBook = [("A", "a")].into_iter().collect();
        let text = serde_json::to_string(&TransferDocument::Legacy(songs)).unwrap();
        assert_eq!(text, r#"{"A":"a"}"#);
    }
}
