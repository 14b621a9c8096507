//! View rendering for the campaign dashboard.
//!
//! Four tabs mirror the campaign workflow: connect recipient data, compose
//! the template, tune the sending limits, watch delivery. Everything here
//! is a pure read of `DashboardState`; interaction flows back as messages.

use num_format::{Locale, ToFormattedString};
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::html::Scope;
use yew::prelude::*;

use common::model::datasource::DataSource;

use crate::state::DashboardState;

use super::messages::Msg;
use super::DashboardComponent;

const PREVIEW_ROWS: usize = 5;

pub fn view(state: &DashboardState, ctx: &Context<DashboardComponent>) -> Html {
    let link = ctx.link();
    html! {
        <div class="dashboard-root">
            <h1 class="dashboard-title">{"Email Campaign Dashboard"}</h1>
            { build_banners(state, link) }
            { build_tab_bar(state, link) }
            {
                match state.active_tab {
                    "template" => build_template_tab(state, link),
                    "settings" => build_settings_tab(state, link),
                    "analytics" => build_analytics_tab(state),
                    _ => build_upload_tab(state, link),
                }
            }
        </div>
    }
}

fn build_banners(state: &DashboardState, link: &Scope<DashboardComponent>) -> Html {
    let banner = |class: &'static str, text: String| {
        html! {
            <div class={classes!("banner", class)} onclick={link.callback(|_| Msg::DismissBanners)}>
                { text }
            </div>
        }
    };
    html! {
        <>
            { for state.error.clone().map(|text| banner("banner-error", text)) }
            { for state.notice.clone().map(|text| banner("banner-notice", text)) }
        </>
    }
}

fn build_tab_bar(state: &DashboardState, link: &Scope<DashboardComponent>) -> Html {
    let tab = |id: &'static str, label: &'static str| {
        let active = if state.active_tab == id { "active" } else { "" };
        html! {
            <button
                class={classes!("tab-btn", active)}
                onclick={link.callback(move |_| Msg::SetTab(id))}
            >
                { label }
            </button>
        }
    };
    html! {
        <div class="tab-bar">
            { tab("upload", "Data Upload") }
            { tab("template", "Email Template") }
            { tab("settings", "Settings") }
            { tab("analytics", "Analytics") }
        </div>
    }
}

fn build_upload_tab(state: &DashboardState, link: &Scope<DashboardComponent>) -> Html {
    let on_file = link.batch_callback(|e: Event| {
        let file = e
            .target()
            .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            .and_then(|input| {
                let file = input.files().and_then(|files| files.get(0));
                // Reset so selecting the same file again re-ingests it.
                input.set_value("");
                file
            });
        file.map(Msg::FileSelected)
    });

    html! {
        <div class="panel">
            <section>
                <h3>{"CSV Upload"}</h3>
                <input type="file" accept=".csv" onchange={on_file} disabled={state.busy} />
            </section>
            <section>
                <h3>{"Google Sheets"}</h3>
                <input
                    type="text"
                    placeholder="Enter a Google Sheets URL"
                    value={state.sheet_url.clone()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::UpdateSheetUrl(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                />
                <button
                    onclick={link.callback(|_| Msg::ConnectSheet)}
                    disabled={state.busy}
                >
                    {"Connect"}
                </button>
            </section>
            { build_source_summary(state) }
        </div>
    }
}

fn build_source_summary(state: &DashboardState) -> Html {
    let Some(source) = &state.source else {
        return html! { <p class="hint">{"No recipient data connected yet."}</p> };
    };
    let name = state.source_name.clone().unwrap_or_default();
    let count = state.recipient_count().unwrap_or(0);
    html! {
        <section>
            <h3>{"Preview"}</h3>
            <p>{ format!("{}: {} recipients", name, count) }</p>
            { build_preview_table(source) }
        </section>
    }
}

fn build_preview_table(source: &DataSource) -> Html {
    let header: Html = source
        .columns
        .iter()
        .map(|column| html! { <th>{ column.clone() }</th> })
        .collect();
    let rows: Html = source
        .rows
        .iter()
        .take(PREVIEW_ROWS)
        .map(|row| {
            let cells: Html = source
                .columns
                .iter()
                .map(|column| html! { <td>{ row.get(column).cloned().unwrap_or_default() }</td> })
                .collect();
            html! { <tr>{ cells }</tr> }
        })
        .collect();
    html! {
        <table class="preview-table">
            <thead><tr>{ header }</tr></thead>
            <tbody>{ rows }</tbody>
        </table>
    }
}

fn build_template_tab(state: &DashboardState, link: &Scope<DashboardComponent>) -> Html {
    let fields: Html = match &state.source {
        Some(source) => source
            .columns
            .iter()
            .map(|field| {
                let insert = field.clone();
                html! {
                    <button
                        class="field-btn"
                        onclick={link.callback(move |_| Msg::InsertField(insert.clone()))}
                    >
                        { field.clone() }
                    </button>
                }
            })
            .collect(),
        None => html! { <span class="hint">{"Connect a data source to see its fields."}</span> },
    };

    let saved: Html = state
        .templates
        .iter()
        .map(|record| {
            let id = record.id.clone();
            html! {
                <button
                    class="template-btn"
                    onclick={link.callback(move |_| Msg::LoadTemplate(id.clone()))}
                >
                    { record.name.clone() }
                </button>
            }
        })
        .collect();

    html! {
        <div class="panel">
            <section>
                <h3>{"Available Fields"}</h3>
                <div class="field-list">{ fields }</div>
            </section>
            {
                if state.templates.is_empty() {
                    html! {}
                } else {
                    html! {
                        <section>
                            <h3>{"Saved Templates"}</h3>
                            <div class="template-list">{ saved }</div>
                        </section>
                    }
                }
            }
            <section>
                <h3>
                    {"Template Content"}
                    { for state.template.is_dirty().then(|| html! {
                        <span class="dirty-dot" title="Unsaved changes" />
                    }) }
                </h3>
                <textarea
                    class="template-input"
                    value={state.template.text().to_string()}
                    placeholder="Write the message here. Use {field_name} to insert recipient data."
                    oninput={link.callback(|e: InputEvent| {
                        Msg::UpdateTemplateText(
                            e.target_unchecked_into::<HtmlTextAreaElement>().value(),
                        )
                    })}
                />
            </section>
            { build_render_preview(state) }
            <div class="actions">
                <button onclick={link.callback(|_| Msg::SaveTemplate)} disabled={state.busy}>
                    {"Save Template"}
                </button>
                <button
                    class="primary"
                    onclick={link.callback(|_| Msg::StartCampaign)}
                    disabled={state.busy}
                >
                    {"Start Campaign"}
                </button>
            </div>
        </div>
    }
}

fn build_render_preview(state: &DashboardState) -> Html {
    let rendered = state
        .source
        .as_ref()
        .and_then(|source| source.rows.first())
        .filter(|_| !state.template.is_empty())
        .map(|row| state.template.render(row));
    match rendered {
        Some(text) => html! {
            <section>
                <h3>{"Preview (first recipient)"}</h3>
                <pre class="render-preview">{ text }</pre>
            </section>
        },
        None => html! {},
    }
}

fn build_settings_tab(state: &DashboardState, link: &Scope<DashboardComponent>) -> Html {
    html! {
        <div class="panel">
            <section>
                <h3>{"API Configuration"}</h3>
                <input
                    type="password"
                    placeholder="API Key"
                    value={state.api_key.clone()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::UpdateApiKey(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                />
            </section>
            <section>
                <h3>{"Sending Limits"}</h3>
                <label>
                    {"Emails per hour"}
                    <input
                        type="number"
                        value={state.rate_input.clone()}
                        oninput={link.callback(|e: InputEvent| {
                            Msg::UpdateRateInput(
                                e.target_unchecked_into::<HtmlInputElement>().value(),
                            )
                        })}
                    />
                </label>
                <label>
                    {"Pause between sends (seconds)"}
                    <input
                        type="number"
                        value={state.pause_input.clone()}
                        oninput={link.callback(|e: InputEvent| {
                            Msg::UpdatePauseInput(
                                e.target_unchecked_into::<HtmlInputElement>().value(),
                            )
                        })}
                    />
                </label>
            </section>
            <button onclick={link.callback(|_| Msg::ApplySettings)}>{"Save Settings"}</button>
        </div>
    }
}

fn build_analytics_tab(state: &DashboardState) -> Html {
    let snapshot = state.analytics.snapshot();
    let feed = if state.push_live {
        "live updates"
    } else {
        "polling only"
    };

    let activity: Html = state
        .analytics
        .activity()
        .iter()
        .map(|entry| {
            html! {
                <tr>
                    <td>{ entry.time.clone() }</td>
                    <td>{ entry.email.clone() }</td>
                    <td><span class={classes!("status", entry.status.label())}>{ entry.status.label() }</span></td>
                    <td>{ entry.details.clone() }</td>
                </tr>
            }
        })
        .collect();

    html! {
        <div class="panel">
            <div class="feed-state">{ feed }</div>
            <div class="metric-grid">
                { metric_card("Total Sent", snapshot.total) }
                { metric_card("Pending", snapshot.pending) }
                { metric_card("Delivered", snapshot.delivered) }
                { metric_card("Failed", snapshot.failed) }
            </div>
            { build_job_card(state) }
            <section>
                <h3>{"Recent Activity"}</h3>
                {
                    if state.analytics.activity().is_empty() {
                        html! { <p class="hint">{"No delivery events yet."}</p> }
                    } else {
                        html! {
                            <table class="activity-table">
                                <thead>
                                    <tr>
                                        <th>{"Time"}</th>
                                        <th>{"Email"}</th>
                                        <th>{"Status"}</th>
                                        <th>{"Details"}</th>
                                    </tr>
                                </thead>
                                <tbody>{ activity }</tbody>
                            </table>
                        }
                    }
                }
            </section>
        </div>
    }
}

fn metric_card(title: &'static str, value: u64) -> Html {
    html! {
        <div class="metric-card">
            <div class="metric-title">{ title }</div>
            <div class="metric-value">{ value.to_formatted_string(&Locale::en) }</div>
        </div>
    }
}

fn build_job_card(state: &DashboardState) -> Html {
    let Some(job) = &state.job else {
        return html! {};
    };
    html! {
        <div class="job-card">
            <span>{ format!("Campaign job {}", job.id) }</span>
            <span class={classes!("status", job.status.label())}>{ job.status.label() }</span>
        </div>
    }
}
