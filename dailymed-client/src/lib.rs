//! # DailyMed Client
//!
//! A Rust client library for the DailyMed web service, which publishes FDA
//! Structured Product Labeling (SPL) documents for marketed drugs. This
//! crate provides drug name search, label XML download, and a sequential
//! batch downloader that mirrors labels into a local directory.
//!
//! ## Features
//!
//! - **Drug Search**: Resolve free-text drug names to SPL set ids
//! - **Label Download**: Fetch the raw SPL XML for any set id
//! - **Batch Downloads**: Two-level resolve/fetch loop with per-item error
//!   isolation and a structured report
//! - **Async Support**: Built on tokio; requests are strictly sequential
//! - **Error Handling**: Operation-scoped error types with transparent
//!   retry of transient failures
//!
//! ## Quick Start
//!
//! ### Searching for Labels
//!
//! ```no_run
//! use dailymed_client::DailyMedClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DailyMedClient::new();
//!
//!     let entries = client.search_labels("ibuprofen", 3).await?;
//!     for entry in entries {
//!         println!("{}: {}", entry.setid, entry.title);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Downloading Labels in Batch
//!
//! ```no_run
//! use dailymed_client::{BatchDownloader, DailyMedClient, DrugQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DailyMedClient::new();
//!     let downloader = BatchDownloader::new(client, "dailymed_xmls");
//!
//!     let report = downloader
//!         .run(&[
//!             DrugQuery::new("ibuprofen", 3),
//!             DrugQuery::new("metformin", 3),
//!         ])
//!         .await?;
//!
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod retry;
pub mod spl;

// Re-export main types for convenience
pub use batch::{
    BatchDownloader, BatchReport, DEFAULT_DRUG_NAMES, DEFAULT_LIMIT, DrugQuery, DrugResolver,
    FailedDownload, LabelFetcher, QueryReport, ReportedError, effective_queries,
};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{DailyMedError, Result, TransportError};
pub use retry::{RetryConfig, RetryableError};
pub use spl::{DailyMedClient, LabelDocument, SplEntry};
