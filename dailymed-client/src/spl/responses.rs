use serde::{Deserialize, Serialize};

use crate::spl::models::SplEntry;

/// One page of the `spls.json` index.
///
/// A missing `data` field is a malformed response; everything in `metadata`
/// is treated as optional because the service omits fields on edge pages.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SplListResponse {
    #[serde(default)]
    pub metadata: SplListMetadata,
    pub data: Vec<SplEntryData>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct SplListMetadata {
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub elements_per_page: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub next_page: Option<u64>,
    #[serde(default)]
    pub next_page_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SplEntryData {
    pub setid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub spl_version: Option<u32>,
    #[serde(default)]
    pub published_date: Option<String>,
}

impl From<SplEntryData> for SplEntry {
    fn from(data: SplEntryData) -> Self {
        SplEntry {
            setid: data.setid,
            title: data.title,
            spl_version: data.spl_version,
            published_date: data.published_date,
        }
    }
}
