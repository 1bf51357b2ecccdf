//! Batch download of drug labels.
//!
//! [`BatchDownloader`] resolves each drug name to set ids, fetches every
//! label, and writes it under the save directory as `<setid>.xml`. Failures
//! on one identifier or one query are recorded in the returned
//! [`BatchReport`] and never abort the rest of the batch; the only fatal
//! error is a save directory that cannot be created.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs;
use tracing::{error, info};

use crate::error::{DailyMedError, Result};
use crate::spl::LabelDocument;

/// Drug names used when a batch is started without any queries.
pub const DEFAULT_DRUG_NAMES: &[&str] = &[
    "ibuprofen",
    "acetaminophen",
    "naproxen",
    "aspirin",
    "amoxicillin",
    "prednisone",
    "metformin",
    "simvastatin",
    "atorvastatin",
    "levothyroxine",
    "losartan",
    "sertraline",
    "omeprazole",
    "lisinopril",
    "gabapentin",
    "hydrochlorothiazide",
];

/// Labels downloaded per drug when no limit is given.
pub const DEFAULT_LIMIT: usize = 3;

/// Resolves a free-text drug name to an ordered list of set ids.
///
/// Implementations return at most `limit` identifiers in the relevance
/// order reported by the service; an empty result is not an error.
#[async_trait]
pub trait DrugResolver: Send + Sync {
    async fn resolve(&self, name: &str, limit: usize) -> Result<Vec<String>>;
}

/// Fetches the SPL XML document for one set id.
#[async_trait]
pub trait LabelFetcher: Send + Sync {
    async fn fetch(&self, setid: &str) -> Result<LabelDocument>;
}

/// One drug name to search plus the per-drug download cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrugQuery {
    pub name: String,
    pub limit: usize,
}

impl DrugQuery {
    pub fn new(name: impl Into<String>, limit: usize) -> Self {
        Self {
            name: name.into(),
            limit,
        }
    }
}

/// Error kind and message as recorded in a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportedError {
    pub kind: String,
    pub message: String,
}

impl ReportedError {
    fn from_error(error: &DailyMedError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// A per-identifier failure.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDownload {
    pub setid: String,
    #[serde(flatten)]
    pub error: ReportedError,
}

/// Outcome of a single drug query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub name: String,
    /// Set ids the batch attempted to download, in resolver order
    pub attempted: Vec<String>,
    /// Set ids written to disk
    pub saved: Vec<String>,
    pub failed: Vec<FailedDownload>,
    /// Set when the name lookup itself failed and no downloads were attempted
    pub lookup_error: Option<ReportedError>,
}

impl QueryReport {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attempted: Vec::new(),
            saved: Vec::new(),
            failed: Vec::new(),
            lookup_error: None,
        }
    }
}

/// Report of one batch run, built as an explicit accumulator and returned
/// to the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub queries: Vec<QueryReport>,
}

impl BatchReport {
    /// Total number of download attempts across all queries.
    pub fn total_attempted(&self) -> usize {
        self.queries.iter().map(|query| query.attempted.len()).sum()
    }

    /// Total number of labels written to disk.
    pub fn total_saved(&self) -> usize {
        self.queries.iter().map(|query| query.saved.len()).sum()
    }

    /// Total number of failed downloads (lookup failures not included).
    pub fn total_failed(&self) -> usize {
        self.queries.iter().map(|query| query.failed.len()).sum()
    }

    /// Set ids of every failed download, in batch order.
    pub fn failed_setids(&self) -> Vec<&str> {
        self.queries
            .iter()
            .flat_map(|query| query.failed.iter().map(|failed| failed.setid.as_str()))
            .collect()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for query in &self.queries {
            if let Some(lookup_error) = &query.lookup_error {
                writeln!(
                    f,
                    "{}: lookup failed ({}: {})",
                    query.name, lookup_error.kind, lookup_error.message
                )?;
            } else if query.attempted.is_empty() {
                writeln!(f, "{}: no matches", query.name)?;
            } else {
                writeln!(
                    f,
                    "{}: {} saved, {} failed ({} attempted)",
                    query.name,
                    query.saved.len(),
                    query.failed.len(),
                    query.attempted.len()
                )?;
            }
        }
        write!(
            f,
            "total: {} labels saved, {} failed across {} drugs",
            self.total_saved(),
            self.total_failed(),
            self.queries.len()
        )
    }
}

/// Queries a batch actually runs: the caller's, or the built-in default
/// list when none were supplied.
pub fn effective_queries(queries: &[DrugQuery]) -> Vec<DrugQuery> {
    if queries.is_empty() {
        DEFAULT_DRUG_NAMES
            .iter()
            .map(|name| DrugQuery::new(*name, DEFAULT_LIMIT))
            .collect()
    } else {
        queries.to_vec()
    }
}

/// Sequential downloader driving resolve, fetch, and save for a set of
/// queries.
///
/// # Example
///
/// ```no_run
/// use dailymed_client::{BatchDownloader, DailyMedClient, DrugQuery};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = DailyMedClient::new();
///     let downloader = BatchDownloader::new(client, "dailymed_xmls");
///     let report = downloader
///         .run(&[DrugQuery::new("ibuprofen", 3)])
///         .await?;
///     println!("{report}");
///     Ok(())
/// }
/// ```
pub struct BatchDownloader<S> {
    source: S,
    save_dir: PathBuf,
}

impl<S> BatchDownloader<S>
where
    S: DrugResolver + LabelFetcher,
{
    pub fn new(source: S, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            save_dir: save_dir.into(),
        }
    }

    /// Run the batch, one query and one identifier at a time.
    ///
    /// Existing files are overwritten, so re-running the same batch is
    /// idempotent. Returns an error only when the save directory cannot be
    /// created; everything after that point is recorded in the report.
    pub async fn run(&self, queries: &[DrugQuery]) -> Result<BatchReport> {
        fs::create_dir_all(&self.save_dir)
            .await
            .map_err(|source| DailyMedError::FilesystemError {
                path: self.save_dir.clone(),
                source,
            })?;

        let queries = effective_queries(queries);
        let mut report = BatchReport::default();

        for query in &queries {
            report.queries.push(self.run_query(query).await);
        }

        info!(
            saved = report.total_saved(),
            failed = report.total_failed(),
            "Batch completed"
        );
        Ok(report)
    }

    async fn run_query(&self, query: &DrugQuery) -> QueryReport {
        info!(drug_name = %query.name, limit = query.limit, "Processing drug");
        let mut outcome = QueryReport::new(&query.name);

        let setids = match self.source.resolve(&query.name, query.limit).await {
            Ok(setids) => setids,
            Err(err) => {
                error!(drug_name = %query.name, error = %err, "Drug lookup failed");
                outcome.lookup_error = Some(ReportedError::from_error(&err));
                return outcome;
            }
        };

        if setids.is_empty() {
            info!(drug_name = %query.name, "No matching labels found");
            return outcome;
        }

        // The per-query cap holds for any resolver implementation.
        for setid in setids.into_iter().take(query.limit) {
            outcome.attempted.push(setid.clone());
            match self.download_one(&setid).await {
                Ok(()) => outcome.saved.push(setid),
                Err(err) => {
                    error!(setid = %setid, error = %err, "Label download failed");
                    outcome.failed.push(FailedDownload {
                        setid,
                        error: ReportedError::from_error(&err),
                    });
                }
            }
        }

        outcome
    }

    async fn download_one(&self, setid: &str) -> Result<()> {
        let document = self.source.fetch(setid).await?;
        let path = self.save_dir.join(document.file_name());

        fs::write(&path, &document.content)
            .await
            .map_err(|source| DailyMedError::FilesystemError {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), bytes = document.content.len(), "Saved label");
        Ok(())
    }
}
