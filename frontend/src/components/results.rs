use super::super::{Model, Msg, StatusKind, Tab};
use shared::NormalizedResult;
use yew::prelude::*;

/// How many label chips the summary shows before the full table takes over.
const SUMMARY_LABEL_CAP: usize = 6;

pub fn render_status(model: &Model) -> Html {
    let Some(status) = &model.status else {
        return html! { <div class="status"></div> };
    };

    let kind_class = match status.kind {
        StatusKind::Ok => Some("ok"),
        StatusKind::Error => Some("error"),
        StatusKind::Info => None,
    };

    html! {
        <div id="status" class={classes!("status", kind_class)}>{ &status.text }</div>
    }
}

pub fn render_results(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(result) = &model.result else {
        return html! {};
    };

    html! {
        <div class="results">
            { render_tab_bar(model, ctx) }
            {
                match model.active_tab {
                    Tab::Summary => render_summary(result),
                    Tab::Details => render_details(result),
                    Tab::RawJson => render_raw(result),
                }
            }
        </div>
    }
}

fn render_tab_bar(model: &Model, ctx: &Context<Model>) -> Html {
    let tab_button = |tab: Tab, title: &'static str| {
        let active = model.active_tab == tab;
        html! {
            <button
                class={classes!("tab", active.then_some("active"))}
                onclick={ctx.link().callback(move |_| Msg::SelectTab(tab))}
            >
                { title }
            </button>
        }
    };

    html! {
        <div class="tabs">
            { tab_button(Tab::Summary, "Summary") }
            { tab_button(Tab::Details, "Details") }
            { tab_button(Tab::RawJson, "Raw JSON") }
        </div>
    }
}

fn render_summary(result: &NormalizedResult) -> Html {
    html! {
        <div class="tab-panel" id="tab-summary">
            <div id="summary-labels" class="chips">
                { for result.labels.iter().take(SUMMARY_LABEL_CAP).map(|label| html! {
                    <div class="chip">
                        { format!("{} ({:.0}%)", label.desc, label.score * 100.0) }
                    </div>
                }) }
            </div>
        </div>
    }
}

fn render_details(result: &NormalizedResult) -> Html {
    html! {
        <div class="tab-panel" id="tab-details">
            <table id="metadata-table">
                <thead>
                    <tr><th>{"Field"}</th><th>{"Value"}</th></tr>
                </thead>
                <tbody>
                    { for result.metadata.iter().map(|(key, value)| html! {
                        <tr><td>{ key }</td><td>{ value }</td></tr>
                    }) }
                </tbody>
            </table>

            <table id="vision-table">
                <thead>
                    <tr><th>{"Label"}</th><th>{"Score"}</th></tr>
                </thead>
                <tbody>
                    { for result.labels.iter().map(|label| html! {
                        <tr>
                            <td>{ &label.desc }</td>
                            <td>{ format!("{:.1}%", label.score * 100.0) }</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}

fn render_raw(result: &NormalizedResult) -> Html {
    html! {
        <div class="tab-panel" id="tab-raw">
            <pre id="raw-json">
                { serde_json::to_string_pretty(&result.raw).unwrap_or_default() }
            </pre>
        </div>
    }
}
