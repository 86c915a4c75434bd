//! Live adapter for the `RecordStore` port using the Airtable REST API.

use std::future::Future;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::RecordSettings;
use crate::domain::project::fields::PROJECT_ID;
use crate::domain::Record;
use crate::ports::records::{RecordFuture, RecordStore};

/// Failures talking to the record API.
#[derive(Debug, Error)]
pub enum AirtableError {
    /// The HTTP request could not be completed.
    #[error("record API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("record API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the API error body, or the raw body.
        message: String,
    },

    /// The configured API root cannot be used to build record URLs.
    #[error("invalid record API URL {url:?}: {reason}")]
    InvalidUrl {
        /// Configured API root.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The response body was not the expected JSON.
    #[error("failed to parse record API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One page of a list response.
#[derive(Deserialize)]
struct ListPage {
    records: Vec<Record>,
    #[serde(default)]
    offset: Option<String>,
}

/// Error body returned by the API.
#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Error detail; the API sends either a bare string or an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Code(String),
    Described { message: String },
}

/// Record store backed by an Airtable-compatible REST API.
pub struct AirtableRecordStore {
    client: Client,
    settings: RecordSettings,
}

impl AirtableRecordStore {
    /// Creates a store for the configured base.
    #[must_use]
    pub fn new(settings: RecordSettings) -> Self {
        Self { client: Client::new(), settings }
    }

    /// `{api_url}/{base}/{table}[/{record_id}]`, each segment percent-encoded.
    fn record_url(&self, table: &str, record_id: Option<&str>) -> Result<Url, AirtableError> {
        let api_url = &self.settings.api_url;
        let invalid = |reason: String| AirtableError::InvalidUrl { url: api_url.clone(), reason };
        let mut url = Url::parse(api_url).map_err(|e| invalid(e.to_string()))?;
        {
            let mut segments =
                url.path_segments_mut().map_err(|()| invalid("cannot be a base URL".to_string()))?;
            segments.pop_if_empty().push(&self.settings.base_id).push(table);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn fetch_one(&self, table: String, record_id: String) -> Result<Option<Record>, AirtableError> {
        let url = self.record_url(&table, Some(&record_id))?;
        debug!(table = %table, record = %record_id, "fetching record");
        let response = self.client.get(url).bearer_auth(&self.settings.api_key).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = read_success(response).await?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn fetch_all(&self, table: String, formula: Option<String>) -> Result<Vec<Record>, AirtableError> {
        let url = self.record_url(&table, None)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let mut query: Vec<(&str, &str)> = Vec::new();
            if let Some(formula) = formula.as_deref() {
                query.push(("filterByFormula", formula));
            }
            if let Some(offset) = offset.as_deref() {
                query.push(("offset", offset));
            }
            let response = self
                .client
                .get(url.clone())
                .bearer_auth(&self.settings.api_key)
                .query(&query)
                .send()
                .await?;
            let body = read_success(response).await?;
            let page: ListPage = serde_json::from_str(&body)?;
            records.extend(page.records);
            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }
        debug!(table = %table, count = records.len(), "listed records");
        Ok(records)
    }
}

impl RecordStore for AirtableRecordStore {
    fn get_project(&self, record_id: &str) -> RecordFuture<'_, Option<Record>> {
        let table = self.settings.tables.projects.clone();
        let record_id = record_id.to_string();
        boxed(self.fetch_one(table, record_id))
    }

    fn list_projects(&self) -> RecordFuture<'_, Vec<Record>> {
        let table = self.settings.tables.projects.clone();
        boxed(self.fetch_all(table, None))
    }

    fn list_task_groups(&self, project_id: &str) -> RecordFuture<'_, Vec<Record>> {
        let table = self.settings.tables.task_groups.clone();
        let formula = project_filter(project_id);
        boxed(self.fetch_all(table, Some(formula)))
    }

    fn list_tasks(&self, project_id: &str) -> RecordFuture<'_, Vec<Record>> {
        let table = self.settings.tables.tasks.clone();
        let formula = project_filter(project_id);
        boxed(self.fetch_all(table, Some(formula)))
    }
}

fn boxed<'a, T, F>(future: F) -> RecordFuture<'a, T>
where
    F: Future<Output = Result<T, AirtableError>> + Send + 'a,
{
    Box::pin(async move {
        future.await.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
    })
}

async fn read_success(response: reqwest::Response) -> Result<String, AirtableError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| match e.error {
            ErrorDetail::Code(code) => code,
            ErrorDetail::Described { message } => message,
        })
        .unwrap_or(body);
    Err(AirtableError::Api { status: status.as_u16(), message })
}

/// Formula selecting records whose project identifier equals `project_id`.
fn project_filter(project_id: &str) -> String {
    let escaped = project_id.replace('\\', "\\\\").replace('\'', "\\'");
    format!("{{{PROJECT_ID}}} = '{escaped}'")
}
