use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::input::EmailEditor;
use crate::keybinds::Keybinds;
use crate::ui::layout::{DragTarget, LayoutState};
use crate::ui::panel::PanelType;
use crate::Config;
use anyhow::Result;
use chrono::Utc;
use draftai_api::{GenerationClient, GenerationRequest, Tone, ToneSelection};
use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::Frame;
use std::collections::VecDeque;
use std::future::Future;
use tokio::sync::mpsc;

mod actions;
mod effects;
mod input;
mod render;
mod state;
mod types;

pub use state::{App, COPIED_DURATION, HISTORY_LIMIT, TONE_CHOICES};
pub use types::{AppAsyncEvent, ErrorReport, Focus, ReplyRecord};

pub const EMPTY_CONTENT_MESSAGE: &str = "Please provide email content.";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate reply. Please try again.";
pub const COPY_FAILED_MESSAGE: &str = "Could not copy the reply.";

impl App {
    pub fn report_error(&mut self, summary: &str, detail: impl std::fmt::Display) {
        let detail = detail.to_string();
        tracing::warn!("{summary}: {detail}");
        self.last_error = Some(ErrorReport {
            summary: summary.to_string(),
            detail: (!detail.is_empty()).then_some(detail),
        });
    }

    pub(super) fn clear_error(&mut self) {
        self.last_error = None;
        self.show_error_details = false;
    }

    pub(super) fn spawn_app_task<F>(&self, future: F)
    where
        F: Future<Output = AppAsyncEvent> + Send + 'static,
    {
        if let Some(tx) = self.app_async_tx.clone() {
            tokio::spawn(async move {
                let event = future.await;
                let _ = tx.send(event);
            });
        }
    }
}
