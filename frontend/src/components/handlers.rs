use super::super::{FileData, Model, Msg, Status};
use super::utils::first_file;
use crate::api;
use gloo_file::{File as GlooFile, ObjectUrl};
use serde_json::Value;
use shared::{Correlator, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_DELAY_MS, PollError, UploadError};
use std::rc::Rc;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

/// Central validation point for every acquisition path (picker, drop, paste).
/// Non-image files are rejected here, before any network call.
pub fn handle_file_chosen(model: &mut Model, file: GlooFile) -> bool {
    if let Err(err) = shared::validate_selection(&file.raw_mime_type(), &file.name()) {
        log::warn!("{err}");
        model.status = Some(Status::error("Please select an image file."));
        return true;
    }

    let preview_url = ObjectUrl::from(file.clone());
    model.selected = Some(FileData { file, preview_url });
    model.session.select_file();
    model.current_epoch.set(model.session.epoch());
    model.status = Some(Status::ok("Image ready to upload."));
    true
}

pub fn handle_analyze(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(selected) = &model.selected else {
        return false;
    };
    if !model.session.begin_upload() {
        return false;
    }

    // Clear previous results before the new run.
    model.result = None;
    model.status = Some(Status::info("Uploading image…"));
    api::upload_file(ctx.link().clone(), selected.file.clone());
    true
}

pub fn handle_upload_finished(
    model: &mut Model,
    ctx: &Context<Model>,
    outcome: Result<String, UploadError>,
) -> bool {
    match outcome {
        Err(err) => {
            model.session.upload_failed();
            model.status = Some(Status::error(format!("Upload error: {err}")));
        }
        Ok(id) => {
            log::info!("Uploaded file: {id}");
            let epoch = model.session.upload_succeeded(&id);
            model.current_epoch.set(epoch);
            model.status = Some(Status::ok("Image uploaded! Waiting for the analyzer…"));
            start_poll(model, ctx, id, epoch);
        }
    }
    true
}

fn start_poll(model: &mut Model, ctx: &Context<Model>, id: String, epoch: u64) {
    match model.session.begin_poll() {
        Err(err) => model.status = Some(Status::error(err.to_string())),
        // A sequence for this epoch is already running.
        Ok(false) => {}
        Ok(true) => match Correlator::new(id, DEFAULT_MAX_ATTEMPTS) {
            Err(err) => model.status = Some(Status::error(err.to_string())),
            Ok(correlator) => api::start_poll(
                ctx.link().clone(),
                Rc::clone(&model.current_epoch),
                epoch,
                correlator,
                DEFAULT_POLL_DELAY_MS,
            ),
        },
    }
}

pub fn handle_poll_resolved(
    model: &mut Model,
    epoch: u64,
    outcome: Result<Value, PollError>,
) -> bool {
    match outcome {
        Ok(raw) => {
            if !model.session.poll_matched(epoch) {
                log::info!("Discarding poll result from a superseded upload");
                return false;
            }
            model.result = Some(shared::normalize(&raw, model.session.expected_id()));
            model.status = Some(Status::ok("Analysis complete!"));
        }
        Err(err) => {
            if !model.session.poll_exhausted(epoch) {
                return false;
            }
            model.status = Some(Status::error(err.to_string()));
        }
    }
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(file) = event
        .data_transfer()
        .and_then(|dt| dt.files())
        .and_then(|list| first_file(&list))
    {
        ctx.link().send_message(Msg::FileChosen(file));
    }

    true
}

pub fn handle_paste(_model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if let Some(file) = event
        .clipboard_data()
        .and_then(|dt| dt.files())
        .and_then(|list| first_file(&list))
    {
        event.prevent_default();
        ctx.link().send_message(Msg::FileChosen(file));
        return true;
    }
    false
}

pub fn handle_toggle_theme(model: &mut Model) -> bool {
    let body = web_sys::window().unwrap().document().unwrap().body().unwrap();

    if model.theme == "light" {
        model.theme = "dark".to_string();
        body.class_list().add_1("dark-mode").unwrap();
    } else {
        model.theme = "light".to_string();
        body.class_list().remove_1("dark-mode").unwrap();
    }

    true
}
