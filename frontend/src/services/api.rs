//! HTTP client for the backend endpoints.
//!
//! Every call is bounded by a timeout and resolves to the shared error
//! taxonomy. Calls attach the session API key as `X-API-Key` when one is
//! configured; an invalid or missing key simply surfaces as the backend's
//! rejection. No call is retried here.

use std::future::Future;
use std::pin::pin;

use futures_util::future::{select, Either};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use web_sys::FormData;

use common::error::{Error, Result};
use common::model::analytics::HourlyBucket;
use common::model::template::TemplateRecord;
use common::requests::{
    CreateJobRequest, CreateTemplateRequest, CsvUploadResponse, JobCreated, JobStatusReport,
    SheetConnectRequest, SheetConnectResponse,
};

const REQUEST_TIMEOUT_MS: u32 = 10_000;

/// Uploads a recipient file for parsing, returning the decoded columns and
/// rows.
pub async fn upload_csv(api_key: &str, file: &web_sys::File) -> Result<CsvUploadResponse> {
    let form = FormData::new()
        .map_err(|_| Error::Transport("could not build the upload form".into()))?;
    form.append_with_blob("file", file)
        .map_err(|_| Error::Transport("could not attach the file".into()))?;
    let request = with_key(Request::post("/upload/csv"), api_key)
        .body(form)
        .map_err(|err| Error::Transport(err.to_string()))?;
    bounded(send_json(request)).await
}

/// Connects a linked spreadsheet. All failures on this path mean the remote
/// source could not be reached or read.
pub async fn connect_sheet(api_key: &str, locator: &str) -> Result<SheetConnectResponse> {
    let request = with_key(Request::post("/google-sheets/connect"), api_key)
        .json(&SheetConnectRequest::new(locator.to_string()))
        .map_err(|err| Error::Transport(err.to_string()))?;
    bounded(send_json(request)).await.map_err(|err| match err {
        Error::Transport(message) => Error::SourceUnavailable(message),
        other => other,
    })
}

pub async fn create_template(
    api_key: &str,
    request: &CreateTemplateRequest,
) -> Result<TemplateRecord> {
    let request = with_key(Request::post("/templates"), api_key)
        .json(request)
        .map_err(|err| Error::Transport(err.to_string()))?;
    bounded(send_json(request)).await
}

pub async fn list_templates(api_key: &str) -> Result<Vec<TemplateRecord>> {
    bounded(send_builder(with_key(Request::get("/templates"), api_key))).await
}

pub async fn create_job(api_key: &str, request: &CreateJobRequest) -> Result<JobCreated> {
    let request = with_key(Request::post("/jobs"), api_key)
        .json(request)
        .map_err(|err| Error::Transport(err.to_string()))?;
    bounded(send_json(request)).await
}

pub async fn job_status(api_key: &str, job_id: &str) -> Result<JobStatusReport> {
    let builder = with_key(Request::get(&format!("/jobs/{job_id}/status")), api_key);
    bounded(send_builder(builder)).await
}

pub async fn hourly_analytics(api_key: &str, hours: u32) -> Result<Vec<HourlyBucket>> {
    let builder = with_key(
        Request::get(&format!("/analytics/hourly?hours={hours}")),
        api_key,
    );
    bounded(send_builder(builder)).await
}

fn with_key(builder: RequestBuilder, api_key: &str) -> RequestBuilder {
    if api_key.is_empty() {
        builder
    } else {
        builder.header("X-API-Key", api_key)
    }
}

async fn send_builder<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
    let response = builder
        .send()
        .await
        .map_err(|err| Error::Transport(err.to_string()))?;
    decode(response).await
}

async fn send_json<T: DeserializeOwned>(request: Request) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|err| Error::Transport(err.to_string()))?;
    decode(response).await
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let body = body.trim();
        return Err(if body.is_empty() {
            Error::Transport(format!("backend returned status {status}"))
        } else {
            Error::Transport(format!("backend returned status {status}: {body}"))
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|err| Error::Transport(format!("unreadable response: {err}")))
}

/// Races a request against the per-call timeout.
async fn bounded<T>(request: impl Future<Output = Result<T>>) -> Result<T> {
    let request = pin!(request);
    let limit = pin!(TimeoutFuture::new(REQUEST_TIMEOUT_MS));
    match select(request, limit).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(Error::Transport(format!(
            "no response within {}ms",
            REQUEST_TIMEOUT_MS
        ))),
    }
}
