use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use serde_json::Value;
use shared::{NormalizedResult, PollError, Session, UploadError};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

mod api;
mod components;

use components::{handlers, header, preview, results, theme_toggle, upload_section};

// Models
#[derive(Clone)]
pub struct FileData {
    pub file: GlooFile,
    pub preview_url: ObjectUrl,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Summary,
    Details,
    RawJson,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Ok,
    Error,
}

pub struct Status {
    pub text: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Ok,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

// Yew msg components
pub enum Msg {
    // Input events
    FileChosen(GlooFile),
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
    SetDragging(bool),

    // Upload & poll lifecycle
    Analyze,
    UploadFinished(Result<String, UploadError>),
    PollResolved(u64, Result<Value, PollError>),

    // UI states
    SelectTab(Tab),
    ToggleTheme,
}

// Main component
pub struct Model {
    pub session: Session,
    pub selected: Option<FileData>,
    pub result: Option<NormalizedResult>,
    pub status: Option<Status>,
    pub active_tab: Tab,
    pub is_dragging: bool,
    pub theme: String,
    /// Mirror of `session.epoch()` shared with running poll loops so a
    /// superseded loop can stop at its next wakeup.
    pub current_epoch: Rc<Cell<u64>>,
    paste_listener: Option<EventListener>,
}

// Yew component implementation
impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self {
            session: Session::new(),
            selected: None,
            result: None,
            status: None,
            active_tab: Tab::Summary,
            is_dragging: false,
            theme: "light".to_string(),
            current_epoch: Rc::new(Cell::new(0)),
            paste_listener: None,
        };

        let link = ctx.link().clone();
        let window = web_sys::window().expect("no global `window` exists");
        let listener = EventListener::new(&window, "paste", move |event| {
            if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                link.send_message(Msg::HandlePaste(clipboard_event.clone()));
            }
        });
        model.paste_listener = Some(listener);

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Input events
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, file),
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            // Upload & poll lifecycle
            Msg::Analyze => handlers::handle_analyze(self, ctx),
            Msg::UploadFinished(outcome) => handlers::handle_upload_finished(self, ctx, outcome),
            Msg::PollResolved(epoch, outcome) => {
                handlers::handle_poll_resolved(self, epoch, outcome)
            }

            // UI states
            Msg::SelectTab(tab) => {
                self.active_tab = tab;
                true
            }
            Msg::ToggleTheme => handlers::handle_toggle_theme(self),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { header::render_header() }
                { theme_toggle::render_theme_toggle(&self.theme, ctx.link()) }

                <main class="main-content">
                    { upload_section::render_upload_section(self, ctx) }
                    { preview::render_preview(self) }
                    { results::render_status(self) }
                    { results::render_results(self, ctx) }
                </main>

                <footer class="app-footer">
                    <p>{"Image Label Analysis | Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
