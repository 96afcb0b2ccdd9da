//! Schema retrieval.
//!
//! `Fetcher` is the transport seam. The state machine never calls it
//! directly: `fetch_schema` turns a `SchemaRequest` into a `SchemaResponse`
//! that the caller hands back to `SelectionMachine::complete_schema_fetch`.
//! `load_field_options` does both steps for callers that can hold the
//! machine across the fetch.

use crate::error::{DatasetFetchError, FetchError};
use crate::selection::{Effect, SchemaRequest, SchemaResponse, SelectionMachine};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Raw text behind `locator`.
    async fn fetch_text(&self, locator: &str) -> Result<String, FetchError>;
}

/// Resolves locators as paths relative to `root`.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl Fetcher for FsFetcher {
    async fn fetch_text(&self, locator: &str) -> Result<String, FetchError> {
        let path = self.root.join(locator.trim_start_matches("./"));
        debug!(path = %path.display(), "reading schema");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io {
                locator: path.display().to_string(),
                source,
            })
    }
}

/// Run the fetch for one request. Never fails; the outcome travels in the response.
pub async fn fetch_schema<F>(fetcher: &F, request: &SchemaRequest) -> SchemaResponse
where
    F: Fetcher + ?Sized,
{
    SchemaResponse {
        ticket: request.ticket,
        outcome: fetcher.fetch_text(&request.schema_location).await,
    }
}

/// Fetch the schema for `request` and apply it to `machine`.
///
/// Same contract as `SelectionMachine::complete_schema_fetch`: `Ok(None)` when
/// a newer dataset choice superseded the request.
pub async fn load_field_options<F>(
    machine: &mut SelectionMachine,
    fetcher: &F,
    request: SchemaRequest,
) -> Result<Option<Vec<Effect>>, DatasetFetchError>
where
    F: Fetcher + ?Sized,
{
    let response = fetch_schema(fetcher, &request).await;
    machine.complete_schema_fetch(response)
}
