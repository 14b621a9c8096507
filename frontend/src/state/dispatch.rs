//! Pre-flight checks and payload assembly for starting a campaign.
//!
//! The invariant enforced here: at most one non-terminal job per session.
//! Everything else is input validation, checked in a fixed order so the
//! user always sees the first applicable problem.

use common::error::{Error, Result};
use common::jobs::CampaignJob;
use common::model::datasource::DataSource;
use common::requests::{CreateJobRequest, Recipient};

use super::settings::DispatchSettings;
use super::template::TemplateDraft;

/// Validates a campaign start request against the session state.
///
/// Check order: template text present, recipients present, every referenced
/// field resolvable, no job already in flight. The first failure wins.
pub fn check_preconditions(
    template: &TemplateDraft,
    source: Option<&DataSource>,
    job: Option<&CampaignJob>,
) -> Result<()> {
    if template.is_empty() {
        return Err(Error::Validation("template required".into()));
    }

    let source = source.ok_or_else(|| Error::Validation("recipients required".into()))?;
    if source.is_empty() {
        return Err(Error::Validation("recipients required".into()));
    }

    let missing = template.missing_fields(source);
    if !missing.is_empty() {
        let fields: Vec<&str> = missing.iter().map(String::as_str).collect();
        return Err(Error::Validation(format!(
            "unknown fields: {}",
            fields.join(", ")
        )));
    }

    if job.is_some_and(|job| !job.status.is_terminal()) {
        return Err(Error::Conflict("campaign already running".into()));
    }

    Ok(())
}

/// Builds the submission payload for a validated campaign.
pub fn job_request(
    template_id: String,
    source: &DataSource,
    settings: &DispatchSettings,
) -> CreateJobRequest {
    CreateJobRequest {
        template_id,
        recipients: recipients_from_source(source),
        throttle_rate: settings.rate_per_hour,
        pause_seconds: settings.pause_seconds,
    }
}

/// Turns source rows into addressees. The address is taken from the first
/// column named `email` (case-insensitive); rows without one are still
/// submitted with an empty address and left for the dispatcher to report.
fn recipients_from_source(source: &DataSource) -> Vec<Recipient> {
    let email_column = source
        .columns
        .iter()
        .find(|column| column.eq_ignore_ascii_case("email"));

    source
        .rows
        .iter()
        .map(|row| Recipient {
            email: email_column
                .and_then(|column| row.get(column))
                .cloned()
                .unwrap_or_default(),
            data: row.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use common::jobs::CampaignStatus;

    use super::*;

    fn source(columns: &[&str], rows: &[&[(&str, &str)]]) -> DataSource {
        DataSource::from_parts(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|pairs| {
                    pairs
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect::<HashMap<_, _>>()
                })
                .collect(),
        )
        .unwrap()
    }

    fn draft(text: &str) -> TemplateDraft {
        let mut draft = TemplateDraft::default();
        draft.set_text(text.into());
        draft
    }

    #[test]
    fn valid_session_passes_and_builds_a_submission() {
        let source = source(&["Email", "Name"], &[&[("Email", "a@x.com"), ("Name", "Alice")]]);
        let template = draft("Hello {Name}");

        check_preconditions(&template, Some(&source), None).unwrap();

        let settings = DispatchSettings::default();
        let request = job_request("t1".into(), &source, &settings);
        assert_eq!(request.template_id, "t1");
        assert_eq!(request.throttle_rate, 100);
        assert_eq!(request.pause_seconds, 5);
        assert_eq!(request.recipients.len(), 1);
        assert_eq!(request.recipients[0].email, "a@x.com");
        assert_eq!(request.recipients[0].data["Name"], "Alice");
    }

    #[test]
    fn empty_template_is_reported_first() {
        let err = check_preconditions(&TemplateDraft::default(), None, None).unwrap_err();
        assert_eq!(err, Error::Validation("template required".into()));
    }

    #[test]
    fn missing_or_empty_source_is_reported_second() {
        let template = draft("Hello");
        let err = check_preconditions(&template, None, None).unwrap_err();
        assert_eq!(err, Error::Validation("recipients required".into()));

        let empty = source(&["Email"], &[]);
        let err = check_preconditions(&template, Some(&empty), None).unwrap_err();
        assert_eq!(err, Error::Validation("recipients required".into()));
    }

    #[test]
    fn unknown_fields_are_named() {
        let source = source(&["Email", "Name"], &[&[("Email", "a@x.com")]]);
        let template = draft("Hello {Name} of {Company}, meet {Owner}");
        let err = check_preconditions(&template, Some(&source), None).unwrap_err();
        assert_eq!(err, Error::Validation("unknown fields: Company, Owner".into()));
    }

    #[test]
    fn second_start_while_in_flight_is_a_conflict() {
        let source = source(&["Email"], &[&[("Email", "a@x.com")]]);
        let template = draft("Hi");

        for status in [CampaignStatus::Submitted, CampaignStatus::Running] {
            let mut job = CampaignJob::new("j1".into(), 0.0);
            if status == CampaignStatus::Running {
                job.advance(status);
            }
            let err = check_preconditions(&template, Some(&source), Some(&job)).unwrap_err();
            assert_eq!(err, Error::Conflict("campaign already running".into()));
        }
    }

    #[test]
    fn terminal_job_does_not_block_a_new_start() {
        let source = source(&["Email"], &[&[("Email", "a@x.com")]]);
        let template = draft("Hi");

        let mut job = CampaignJob::new("j1".into(), 0.0);
        job.advance(CampaignStatus::Completed);
        check_preconditions(&template, Some(&source), Some(&job)).unwrap();
    }

    #[test]
    fn email_column_is_found_case_insensitively() {
        let source = source(&["EMAIL", "Name"], &[&[("EMAIL", "b@x.com"), ("Name", "Bo")]]);
        let request = job_request("t1".into(), &source, &DispatchSettings::default());
        assert_eq!(request.recipients[0].email, "b@x.com");
    }

    #[test]
    fn rows_without_an_email_column_submit_empty_addresses() {
        let source = source(&["Name"], &[&[("Name", "Alice")]]);
        let request = job_request("t1".into(), &source, &DispatchSettings::default());
        assert_eq!(request.recipients[0].email, "");
        assert_eq!(request.recipients[0].data["Name"], "Alice");
    }
}
