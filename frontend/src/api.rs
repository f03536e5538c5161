use gloo_console::{error, log};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;
use shared::{Correlator, PollError, Probe, Step, UploadError, UploadResponse};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::html::Scope;

use crate::{Model, Msg};

/// Same base endpoint for both calls: POST uploads the raw bytes, GET returns
/// the latest analysis record (not scoped to a request).
pub const UPLOAD_API_URL: &str = "/api/analysis";

/// Sends the selected file's bytes and reports the correlation id (or the
/// failure) back to the component.
pub fn upload_file(link: Scope<Model>, file: gloo_file::File) {
    spawn_local(async move {
        let outcome = send_upload(&file).await;
        link.send_message(Msg::UploadFinished(outcome));
    });
}

async fn send_upload(file: &gloo_file::File) -> Result<String, UploadError> {
    let mime = file.raw_mime_type();
    let content_type = if mime.is_empty() {
        "application/octet-stream".to_string()
    } else {
        mime
    };
    let encoded_name = String::from(js_sys::encode_uri_component(&file.name()));
    let blob: web_sys::Blob = <gloo_file::File as AsRef<web_sys::Blob>>::as_ref(file).clone();

    let request = Request::post(UPLOAD_API_URL)
        .header("Content-Type", &content_type)
        .header("X-File-Name", &encoded_name)
        .body(blob)
        .map_err(|e| UploadError::Network(e.to_string()))?;

    let response = request
        .send()
        .await
        .map_err(|e| UploadError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(UploadError::Status(response.status()));
    }

    let body: UploadResponse = response
        .json()
        .await
        .map_err(|e| UploadError::Decode(e.to_string()))?;

    body.correlation_id()
        .map(str::to_owned)
        .ok_or(UploadError::MissingId)
}

/// Drives the correlator against the result endpoint: one GET per attempt,
/// fixed delay in between. The loop exits early when `current_epoch` moves
/// past its own epoch, i.e. when a newer upload supersedes it.
pub fn start_poll(
    link: Scope<Model>,
    current_epoch: Rc<Cell<u64>>,
    epoch: u64,
    mut correlator: Correlator,
    delay_ms: u32,
) {
    spawn_local(async move {
        log!(format!(
            "Starting polling for result… expecting {}",
            correlator.expected_id()
        ));

        loop {
            if current_epoch.get() != epoch {
                log!("Poll loop superseded by a newer upload, stopping");
                return;
            }

            let probe = probe_endpoint().await;
            log_probe(&probe, correlator.attempts() + 1, correlator.expected_id());

            match correlator.observe(probe) {
                Step::Matched(raw) => {
                    link.send_message(Msg::PollResolved(epoch, Ok(raw)));
                    return;
                }
                Step::Exhausted => {
                    link.send_message(Msg::PollResolved(epoch, Err(PollError::TimedOut)));
                    return;
                }
                Step::Retry => TimeoutFuture::new(delay_ms).await,
            }
        }
    });
}

async fn probe_endpoint() -> Probe {
    let response = match Request::get(UPLOAD_API_URL).send().await {
        Ok(response) => response,
        Err(e) => return Probe::Transport(e.to_string()),
    };

    match response.status() {
        404 => Probe::NotFound,
        _ if response.ok() => match response.json::<Value>().await {
            Ok(value) => Probe::Record(value),
            Err(e) => Probe::Transport(e.to_string()),
        },
        other => Probe::Status(other),
    }
}

fn log_probe(probe: &Probe, attempt: u32, expected_id: &str) {
    match probe {
        Probe::NotFound => log!(format!("Attempt {attempt}: no result yet (404)")),
        Probe::Status(code) => log!(format!("Attempt {attempt}: status {code}")),
        Probe::Transport(msg) => error!(format!("Polling error on attempt {attempt}: {msg}")),
        Probe::Record(value) => match value.get("id").and_then(Value::as_str) {
            None => log!(format!("Attempt {attempt}: record has no id, keep polling")),
            Some(id) if id != expected_id => log!(format!(
                "Attempt {attempt}: got id={id} but expected {expected_id}; keep polling"
            )),
            Some(_) => {}
        },
    }
}
