use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::batch::{DrugResolver, LabelFetcher};
use crate::config::ClientConfig;
use crate::error::{DailyMedError, Result, TransportError};
use crate::retry::with_retry;
use crate::spl::models::{LabelDocument, SplEntry};
use crate::spl::responses::SplListResponse;

/// Largest page size the `spls.json` endpoint accepts.
const MAX_PAGE_SIZE: usize = 100;

/// Client for the DailyMed SPL web service
#[derive(Clone)]
pub struct DailyMedClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl DailyMedClient {
    /// Create a new client with default configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use dailymed_client::DailyMedClient;
    ///
    /// let client = DailyMedClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new client with custom configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use dailymed_client::{ClientConfig, DailyMedClient};
    ///
    /// let config = ClientConfig::new().with_timeout(Duration::from_secs(10));
    /// let client = DailyMedClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let base_url = config.effective_base_url().to_string();

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.effective_user_agent())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            config,
        }
    }

    /// Create a new client from a pre-built `reqwest` client and default
    /// configuration.
    pub fn with_client(client: Client) -> Self {
        let config = ClientConfig::new();
        let base_url = config.effective_base_url().to_string();

        Self {
            client,
            base_url,
            config,
        }
    }

    /// Search drug labels by name.
    ///
    /// Matches are returned in the relevance order reported by the service,
    /// truncated to the first `limit` entries. Pagination is followed
    /// transparently when one page is not enough to satisfy `limit`.
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// * `DailyMedError::InvalidQuery` - empty name or zero limit
    /// * `DailyMedError::LookupError` - request failed or non-success status
    /// * `DailyMedError::ParseError` - response body was not the expected structure
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dailymed_client::DailyMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = DailyMedClient::new();
    ///     let entries = client.search_labels("ibuprofen", 3).await?;
    ///     for entry in entries {
    ///         println!("{}: {}", entry.setid, entry.title);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(drug_name = %name, limit = limit))]
    pub async fn search_labels(&self, name: &str, limit: usize) -> Result<Vec<SplEntry>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DailyMedError::InvalidQuery(
                "drug name must not be empty".to_string(),
            ));
        }
        if limit == 0 {
            return Err(DailyMedError::InvalidQuery(
                "limit must be at least 1".to_string(),
            ));
        }

        let page_size = limit.min(MAX_PAGE_SIZE);
        let mut entries: Vec<SplEntry> = Vec::new();
        let mut page = 1usize;

        loop {
            let url = format!(
                "{}/services/v2/spls.json?drug_name={}&pagesize={}&page={}",
                self.base_url,
                urlencoding::encode(name),
                page_size,
                page
            );

            debug!(page = page, "Making SPL search request");
            let response = with_retry(
                || async {
                    let response =
                        self.client.get(&url).send().await.map_err(|err| {
                            DailyMedError::LookupError {
                                source: TransportError::Request(err),
                            }
                        })?;

                    // 5xx and 429 are transient; report them through the
                    // retry layer instead of failing outright.
                    if response.status().is_server_error() || response.status().as_u16() == 429 {
                        return Err(DailyMedError::LookupError {
                            source: TransportError::Status {
                                status: response.status().as_u16(),
                                message: response
                                    .status()
                                    .canonical_reason()
                                    .unwrap_or("Unknown error")
                                    .to_string(),
                            },
                        });
                    }

                    Ok(response)
                },
                &self.config.retry_config,
                "DailyMed search request",
            )
            .await?;

            if !response.status().is_success() {
                warn!(status = %response.status(), "Search request failed");
                return Err(DailyMedError::LookupError {
                    source: TransportError::Status {
                        status: response.status().as_u16(),
                        message: response
                            .status()
                            .canonical_reason()
                            .unwrap_or("Unknown error")
                            .to_string(),
                    },
                });
            }

            let body = response
                .text()
                .await
                .map_err(|err| DailyMedError::LookupError {
                    source: TransportError::Request(err),
                })?;
            let result: SplListResponse = serde_json::from_str(&body)?;

            let page_len = result.data.len();
            for entry in result.data {
                if entry.setid.trim().is_empty() {
                    warn!(title = %entry.title, "Skipping search match without a set id");
                    continue;
                }
                entries.push(entry.into());
                if entries.len() == limit {
                    break;
                }
            }

            if entries.len() >= limit {
                break;
            }
            if page_len == 0 || result.metadata.next_page_url.is_none() {
                break;
            }
            page += 1;
        }

        info!(matches = entries.len(), "Search completed");
        Ok(entries)
    }

    /// Resolve a drug name to the set ids of its matching labels.
    ///
    /// Shorthand for [`search_labels`](Self::search_labels) when only the
    /// identifiers are needed.
    pub async fn resolve_setids(&self, name: &str, limit: usize) -> Result<Vec<String>> {
        let entries = self.search_labels(name, limit).await?;
        Ok(entries.into_iter().map(|entry| entry.setid).collect())
    }

    /// Download the SPL XML document for one set id.
    ///
    /// The body is returned exactly as served; no validation beyond a
    /// non-empty check is performed.
    ///
    /// # Errors
    ///
    /// * `DailyMedError::InvalidSetId` - blank set id
    /// * `DailyMedError::FetchError` - request failed or non-success status
    /// * `DailyMedError::EmptyDocumentError` - service returned an empty body
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dailymed_client::DailyMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = DailyMedClient::new();
    ///     let document = client
    ///         .fetch_label("11111111-2222-3333-4444-555555555555")
    ///         .await?;
    ///     println!("{} bytes", document.content.len());
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(setid = %setid))]
    pub async fn fetch_label(&self, setid: &str) -> Result<LabelDocument> {
        let setid = setid.trim();
        if setid.is_empty() {
            return Err(DailyMedError::InvalidSetId {
                setid: setid.to_string(),
            });
        }

        let url = format!(
            "{}/downloads/labelxml.cfm?setid={}",
            self.base_url,
            urlencoding::encode(setid)
        );

        debug!("Making label download request");
        let response = with_retry(
            || async {
                let response =
                    self.client.get(&url).send().await.map_err(|err| {
                        DailyMedError::FetchError {
                            setid: setid.to_string(),
                            source: TransportError::Request(err),
                        }
                    })?;

                if response.status().is_server_error() || response.status().as_u16() == 429 {
                    return Err(DailyMedError::FetchError {
                        setid: setid.to_string(),
                        source: TransportError::Status {
                            status: response.status().as_u16(),
                            message: response
                                .status()
                                .canonical_reason()
                                .unwrap_or("Unknown error")
                                .to_string(),
                        },
                    });
                }

                Ok(response)
            },
            &self.config.retry_config,
            "DailyMed label request",
        )
        .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Label request failed");
            return Err(DailyMedError::FetchError {
                setid: setid.to_string(),
                source: TransportError::Status {
                    status: response.status().as_u16(),
                    message: response
                        .status()
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string(),
                },
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|err| DailyMedError::FetchError {
                setid: setid.to_string(),
                source: TransportError::Request(err),
            })?;

        if content.is_empty() {
            warn!("Label document body was empty");
            return Err(DailyMedError::EmptyDocumentError {
                setid: setid.to_string(),
            });
        }

        info!(bytes = content.len(), "Fetched label document");
        Ok(LabelDocument {
            setid: setid.to_string(),
            content: content.to_vec(),
        })
    }
}

impl Default for DailyMedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DrugResolver for DailyMedClient {
    async fn resolve(&self, name: &str, limit: usize) -> Result<Vec<String>> {
        self.resolve_setids(name, limit).await
    }
}

#[async_trait]
impl LabelFetcher for DailyMedClient {
    async fn fetch(&self, setid: &str) -> Result<LabelDocument> {
        self.fetch_label(setid).await
    }
}
