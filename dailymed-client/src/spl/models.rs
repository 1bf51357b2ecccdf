use serde::{Deserialize, Serialize};

/// One search match from the DailyMed SPL index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplEntry {
    /// Unique identifier of the SPL document version
    pub setid: String,
    /// Label title as shown by DailyMed, e.g. "IBUPROFEN tablet"
    pub title: String,
    /// Version counter of the label document
    pub spl_version: Option<u32>,
    /// Publication date as reported by the service, e.g. "Feb 02, 2021"
    pub published_date: Option<String>,
}

/// A downloaded SPL XML document.
///
/// Holds the raw body exactly as returned by the service; it is written to
/// disk unmodified and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDocument {
    /// Set id the document was fetched for
    pub setid: String,
    /// Raw XML body
    pub content: Vec<u8>,
}

impl LabelDocument {
    /// Filename the document is saved under.
    pub fn file_name(&self) -> String {
        format!("{}.xml", self.setid)
    }
}
