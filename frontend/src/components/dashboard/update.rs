//! Update function for the dashboard component.
//!
//! Follows an Elm-style architecture: the current `DashboardState`, the
//! component `Context`, and a `Msg` come in; the state is mutated through
//! the operations in `crate::state` and a `bool` says whether to re-render.
//! All side effects (HTTP calls, poll scheduling) are spawned from here and
//! report back as further messages, so each message is applied to the shared
//! state atomically and in order.

use gloo_console::warn;
use gloo_file::futures::read_as_text;
use gloo_file::Blob;
use gloo_timers::future::TimeoutFuture;
use js_sys::Date;
use uuid::Uuid;
use yew::platform::spawn_local;
use yew::prelude::*;

use common::error::{Error, Result};
use common::jobs::{CampaignJob, CampaignStatus};
use common::model::datasource::DataSource;
use common::requests::CreateTemplateRequest;

use crate::services::api;
use crate::state::settings::DispatchSettings;
use crate::state::{datasource, dispatch, DashboardState};

use super::messages::Msg;
use super::DashboardComponent;

/// Interval between analytics report polls.
const POLL_INTERVAL_MS: u32 = 5_000;
/// Interval between job status polls while a job is non-terminal.
const JOB_POLL_INTERVAL_MS: u32 = 2_000;
/// Reporting window requested from the hourly analytics endpoint.
const REPORT_WINDOW_HOURS: u32 = 24;

pub fn update(
    state: &mut DashboardState,
    ctx: &Context<DashboardComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::SetTab(tab) => {
            state.active_tab = tab;
            true
        }

        Msg::FileSelected(file) => {
            state.busy = true;
            state.error = None;
            let api_key = state.api_key.clone();
            let name = file.name();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = ingest_file(&api_key, &file).await;
                link.send_message(Msg::SourceIngested {
                    name,
                    total: None,
                    result,
                });
            });
            true
        }

        Msg::UpdateSheetUrl(value) => {
            state.sheet_url = value;
            true
        }

        Msg::ConnectSheet => {
            state.error = None;
            let locator = state.sheet_url.trim().to_string();
            if let Err(err) = datasource::validate_sheet_locator(&locator) {
                state.error = Some(err.to_string());
                return true;
            }
            state.busy = true;
            let api_key = state.api_key.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let (total, result) = match ingest_sheet(&api_key, &locator).await {
                    Ok((source, total)) => (Some(total), Ok(source)),
                    Err(err) => (None, Err(err)),
                };
                link.send_message(Msg::SourceIngested {
                    name: locator,
                    total,
                    result,
                });
            });
            true
        }

        Msg::SourceIngested {
            name,
            total,
            result,
        } => {
            state.busy = false;
            match result {
                Ok(source) => {
                    state.notice = Some(format!(
                        "Connected \"{}\": {} recipients, {} columns",
                        name,
                        total.unwrap_or(source.len() as u64),
                        source.columns.len()
                    ));
                    // The previous source, whatever its shape, is gone.
                    state.source = Some(source);
                    state.source_name = Some(name);
                    state.source_total = total;
                }
                Err(err) => state.error = Some(err.to_string()),
            }
            true
        }

        Msg::UpdateTemplateText(text) => {
            state.template.set_text(text);
            true
        }

        Msg::InsertField(field) => {
            state.template.insert_field(&field);
            true
        }

        Msg::SaveTemplate => {
            state.error = None;
            if state.template.is_empty() {
                state.error = Some(Error::Validation("template required".into()).to_string());
                return true;
            }
            state.busy = true;
            let api_key = state.api_key.clone();
            let request = template_request(state.template.text());
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::TemplateSaved(
                    api::create_template(&api_key, &request).await,
                ));
            });
            true
        }

        Msg::TemplateSaved(result) => {
            state.busy = false;
            match result {
                Ok(record) => {
                    state.template.mark_saved(record.id.clone());
                    state.notice = Some(format!("Template saved as \"{}\"", record.name));
                    state.templates.push(record);
                }
                Err(err) => state.error = Some(err.to_string()),
            }
            true
        }

        Msg::TemplatesLoaded(result) => match result {
            Ok(templates) => {
                state.templates = templates;
                true
            }
            Err(err) => {
                warn!(format!("could not load saved templates: {err}"));
                false
            }
        },

        Msg::LoadTemplate(id) => {
            let Some(record) = state.templates.iter().find(|t| t.id == id).cloned() else {
                return false;
            };
            state.template.set_text(record.content);
            state.template.mark_saved(record.id);
            true
        }

        Msg::UpdateApiKey(value) => {
            state.api_key = value;
            true
        }

        Msg::UpdateRateInput(value) => {
            state.rate_input = value;
            true
        }

        Msg::UpdatePauseInput(value) => {
            state.pause_input = value;
            true
        }

        Msg::ApplySettings => {
            state.error = None;
            match state
                .settings
                .apply_inputs(&state.rate_input, &state.pause_input)
            {
                Ok(()) => {
                    state.rate_input = state.settings.rate_per_hour.to_string();
                    state.pause_input = state.settings.pause_seconds.to_string();
                    state.notice = Some(format!(
                        "Sending limits saved: {} emails/hour, {}s pause",
                        state.settings.rate_per_hour, state.settings.pause_seconds
                    ));
                }
                Err(err) => state.error = Some(err.to_string()),
            }
            true
        }

        Msg::StartCampaign => {
            state.error = None;
            if let Err(err) = dispatch::check_preconditions(
                &state.template,
                state.source.as_ref(),
                state.job.as_ref(),
            ) {
                state.error = Some(err.to_string());
                return true;
            }
            let Some(source) = state.source.clone() else {
                return true;
            };
            state.busy = true;
            let api_key = state.api_key.clone();
            let template_id = state.template.saved_id_if_clean();
            let text = state.template.text().to_string();
            let settings = state.settings;
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::CampaignSubmitted(
                    submit_campaign(&api_key, template_id, &text, &source, &settings).await,
                ));
            });
            true
        }

        Msg::CampaignSubmitted(result) => {
            state.busy = false;
            match result {
                Ok(job_id) => {
                    state.notice = Some(format!("Campaign submitted (job {job_id})"));
                    state.job = Some(CampaignJob::new(job_id, Date::now()));
                    state.active_tab = "analytics";
                    ctx.link().send_message(Msg::PollJobStatus);
                }
                // No job exists after a failed submission; the user may
                // simply try again.
                Err(err) => state.error = Some(err.to_string()),
            }
            true
        }

        Msg::PollJobStatus => {
            let Some(job) = &state.job else { return false };
            if job.status.is_terminal() {
                return false;
            }
            let api_key = state.api_key.clone();
            let job_id = job.id.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                TimeoutFuture::new(JOB_POLL_INTERVAL_MS).await;
                link.send_message(Msg::JobReport(api::job_status(&api_key, &job_id).await));
            });
            false
        }

        Msg::JobReport(result) => match result {
            Ok(report) => {
                let Some(job) = state.job.as_mut() else {
                    return false;
                };
                let mut changed = false;
                if let Some(next) = CampaignStatus::from_report(&report.status) {
                    changed = job.advance(next);
                }
                if job.status.is_terminal() {
                    if changed {
                        state.notice = Some(match report.detail {
                            Some(detail) => detail,
                            None => format!("Campaign {}", job.status.label()),
                        });
                    }
                } else {
                    ctx.link().send_message(Msg::PollJobStatus);
                }
                changed
            }
            Err(err) => {
                warn!(format!("job status poll failed: {err}"));
                if state.job.as_ref().is_some_and(|j| !j.status.is_terminal()) {
                    ctx.link().send_message(Msg::PollJobStatus);
                }
                false
            }
        },

        Msg::PollAnalytics => {
            let api_key = state.api_key.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::ReportFetched(
                    api::hourly_analytics(&api_key, REPORT_WINDOW_HOURS).await,
                ));
            });
            false
        }

        Msg::ReportFetched(result) => {
            let render = match result {
                Ok(buckets) => {
                    state.analytics.apply_report(&buckets);
                    true
                }
                Err(err) => {
                    // Logged and skipped: the snapshot on screen stays put
                    // and the next interval simply tries again.
                    warn!(format!("analytics poll failed: {err}"));
                    false
                }
            };
            // The next poll is armed only once this one has resolved, so
            // report reads never overlap.
            let link = ctx.link().clone();
            spawn_local(async move {
                TimeoutFuture::new(POLL_INTERVAL_MS).await;
                link.send_message(Msg::PollAnalytics);
            });
            render
        }

        Msg::PushReceived(message) => {
            state.push_live = true;
            state.analytics.apply_push(message);
            true
        }

        Msg::PushClosed(reason) => {
            state.push_live = false;
            match reason {
                Some(reason) => warn!(format!("push channel closed: {reason}")),
                None => warn!("push channel closed"),
            }
            true
        }

        Msg::DismissBanners => {
            state.error = None;
            state.notice = None;
            true
        }
    }
}

/// Reads and pre-checks the chosen file, then hands it to the upload
/// endpoint and normalizes what comes back.
async fn ingest_file(api_key: &str, file: &web_sys::File) -> Result<DataSource> {
    let text = read_as_text(&Blob::from(file.clone()))
        .await
        .map_err(|err| Error::Parse(format!("could not read the file: {err}")))?;
    datasource::header_fields(&text)?;
    let parsed = api::upload_csv(api_key, file).await?;
    DataSource::from_parts(parsed.columns, parsed.preview)
}

async fn ingest_sheet(api_key: &str, locator: &str) -> Result<(DataSource, u64)> {
    let parsed = api::connect_sheet(api_key, locator).await?;
    let source = DataSource::from_parts(parsed.columns, parsed.preview)?;
    Ok((source, parsed.total_recipients))
}

/// Saves the template when needed, then submits the job. A failure at
/// either step surfaces unchanged and leaves no job behind.
async fn submit_campaign(
    api_key: &str,
    template_id: Option<String>,
    text: &str,
    source: &DataSource,
    settings: &DispatchSettings,
) -> Result<String> {
    let template_id = match template_id {
        Some(id) => id,
        None => api::create_template(api_key, &template_request(text)).await?.id,
    };
    let request = dispatch::job_request(template_id, source, settings);
    Ok(api::create_job(api_key, &request).await?.job_id)
}

fn template_request(text: &str) -> CreateTemplateRequest {
    CreateTemplateRequest {
        name: format!("campaign-{}", Uuid::new_v4()),
        subject: subject_line(text),
        content: text.to_string(),
    }
}

/// First non-blank line of the template, capped for use as a subject.
fn subject_line(text: &str) -> String {
    let line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
        .trim();
    let subject: String = line.chars().take(80).collect();
    if subject.is_empty() {
        "Campaign".into()
    } else {
        subject
    }
}
