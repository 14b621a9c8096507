//! Request and response payloads for the backend HTTP surface.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Body of `POST /templates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub content: String,
    pub subject: String,
}

/// Response of `POST /upload/csv`: the collaborator-parsed column set plus
/// the decoded recipient rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvUploadResponse {
    pub columns: Vec<String>,
    pub preview: Vec<HashMap<String, String>>,
}

/// Body of `POST /google-sheets/connect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetConnectRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
}

impl SheetConnectRequest {
    pub fn new(source: String) -> Self {
        Self {
            kind: "google_sheet".into(),
            source,
        }
    }
}

/// Response of `POST /google-sheets/connect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetConnectResponse {
    pub columns: Vec<String>,
    pub preview: Vec<HashMap<String, String>>,
    pub total_recipients: u64,
}

/// One addressee of a send job, carrying its full source row for token
/// substitution on the sending side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub data: HashMap<String, String>,
}

/// Body of `POST /jobs`: the template to send, every recipient row, and the
/// pacing the dispatcher must apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub template_id: String,
    pub recipients: Vec<Recipient>,
    pub throttle_rate: u32,
    pub pause_seconds: u32,
}

/// Response of `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCreated {
    #[serde(rename = "jobId")]
    pub job_id: String,
}

/// Response of `GET /jobs/{id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub status: String,
    #[serde(default)]
    pub detail: Option<String>,
}
