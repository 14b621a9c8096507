use common::error::Error;
use common::model::analytics::{HourlyBucket, PushMessage};
use common::model::datasource::DataSource;
use common::model::template::TemplateRecord;
use common::requests::JobStatusReport;

pub enum Msg {
    SetTab(&'static str),

    FileSelected(web_sys::File),
    UpdateSheetUrl(String),
    ConnectSheet,
    SourceIngested {
        name: String,
        total: Option<u64>,
        result: Result<DataSource, Error>,
    },

    UpdateTemplateText(String),
    InsertField(String),
    SaveTemplate,
    TemplateSaved(Result<TemplateRecord, Error>),
    TemplatesLoaded(Result<Vec<TemplateRecord>, Error>),
    LoadTemplate(String),

    UpdateApiKey(String),
    UpdateRateInput(String),
    UpdatePauseInput(String),
    ApplySettings,

    StartCampaign,
    CampaignSubmitted(Result<String, Error>),
    PollJobStatus,
    JobReport(Result<JobStatusReport, Error>),

    PollAnalytics,
    ReportFetched(Result<Vec<HourlyBucket>, Error>),
    PushReceived(PushMessage),
    PushClosed(Option<String>),

    DismissBanners,
}
