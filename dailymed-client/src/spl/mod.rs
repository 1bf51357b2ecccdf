//! DailyMed SPL service layer: search (`spls.json`) and label download
//! (`labelxml.cfm`).

mod client;
mod models;
pub(crate) mod responses;

pub use client::DailyMedClient;
pub use models::{LabelDocument, SplEntry};
