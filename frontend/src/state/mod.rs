//! Session state and the operations that mutate it.
//!
//! One `DashboardState` value is owned by the dashboard component and passed
//! by reference into the operations below; the view only ever reads it.
//! Every mutation goes through these modules, which keep the invariants:
//! data sources are replaced wholesale, at most one non-terminal job exists,
//! and analytics updates are applied atomically per message.

pub mod analytics;
pub mod datasource;
pub mod dispatch;
pub mod settings;
pub mod template;

use common::jobs::CampaignJob;
use common::model::datasource::DataSource;
use common::model::template::TemplateRecord;

use self::analytics::AnalyticsView;
use self::settings::DispatchSettings;
use self::template::TemplateDraft;

/// Everything the session tracks, in one place.
pub struct DashboardState {
    pub active_tab: &'static str,

    /// The connected recipient table, if any. Replaced as a unit on each
    /// successful ingestion.
    pub source: Option<DataSource>,
    pub source_name: Option<String>,
    /// Total recipients reported by a linked sheet; `None` for uploads,
    /// where the row count is authoritative.
    pub source_total: Option<u64>,
    pub sheet_url: String,

    pub template: TemplateDraft,
    pub templates: Vec<TemplateRecord>,

    pub settings: DispatchSettings,
    pub rate_input: String,
    pub pause_input: String,
    pub api_key: String,

    /// The single job this session may have in flight.
    pub job: Option<CampaignJob>,

    pub analytics: AnalyticsView,
    /// False once the push socket has closed; the pull channel keeps the
    /// view current on its own from then on.
    pub push_live: bool,

    pub busy: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        let settings = DispatchSettings::default();
        Self {
            active_tab: "upload",
            source: None,
            source_name: None,
            source_total: None,
            sheet_url: String::new(),
            template: TemplateDraft::default(),
            templates: Vec::new(),
            rate_input: settings.rate_per_hour.to_string(),
            pause_input: settings.pause_seconds.to_string(),
            settings,
            api_key: String::new(),
            job: None,
            analytics: AnalyticsView::default(),
            push_live: false,
            busy: false,
            error: None,
            notice: None,
        }
    }

    /// Recipient count for display: a linked sheet may hold more rows than
    /// the preview the client received.
    pub fn recipient_count(&self) -> Option<u64> {
        self.source
            .as_ref()
            .map(|source| self.source_total.unwrap_or(source.len() as u64))
    }
}
