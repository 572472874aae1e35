use super::*;
use std::time::Instant;

impl App {
    pub(super) fn submit(&mut self) {
        if self.is_loading {
            tracing::debug!("Submit ignored; a reply is already being generated");
            return;
        }

        let request = match GenerationRequest::new(self.editor.text(), self.tone) {
            Ok(request) => request,
            Err(e) => {
                self.report_error(EMPTY_CONTENT_MESSAGE, e);
                return;
            }
        };

        let Some(client) = self.client.clone() else {
            self.report_error(
                GENERATION_FAILED_MESSAGE,
                format!("No usable API address ({})", self.config.api.base_url),
            );
            return;
        };

        self.clear_error();
        self.reply = None;
        self.reply_scroll = 0;
        self.copied_at = None;
        self.is_loading = true;
        self.loading_start_time = Some(Instant::now());
        self.request_id += 1;

        let request_id = self.request_id;
        let tone = self.tone;
        tracing::info!(request_id, tone = %tone.label(), "Generating reply");
        self.spawn_app_task(async move {
            let result = client.generate(&request).await;
            AppAsyncEvent::ReplyGenerated {
                request_id,
                tone,
                result,
            }
        });
    }

    /// Clears the form. A request still in flight is abandoned; its result
    /// will not match the new request id.
    pub(super) fn reset(&mut self) {
        self.editor.clear();
        self.reply = None;
        self.reply_scroll = 0;
        self.copied_at = None;
        if self.is_loading {
            self.request_id += 1;
            self.is_loading = false;
            self.loading_start_time = None;
        }
        self.clear_error();
    }

    pub(super) fn select_tone(&mut self, idx: usize) {
        if let Some(tone) = TONE_CHOICES.get(idx) {
            self.tone = *tone;
            self.tone_cursor = idx;
        }
    }

    pub(super) fn cycle_tone(&mut self) {
        let next = (self.tone_cursor + 1) % TONE_CHOICES.len();
        self.select_tone(next);
    }

    pub(super) fn show_history_entry(&mut self, idx: usize) {
        if let Some(record) = self.history.get(idx) {
            self.reply = Some(record.text.clone());
            self.reply_scroll = 0;
            self.copied_at = None;
        }
    }

    /// Copies the shown reply and starts the "Copied!" confirmation.
    pub(super) fn copy_reply(&mut self) {
        let Some(text) = self.reply.clone() else {
            return;
        };

        if self.clipboard.is_none() {
            match SystemClipboard::new() {
                Ok(clipboard) => self.clipboard = Some(Box::new(clipboard)),
                Err(e) => {
                    self.report_error(COPY_FAILED_MESSAGE, e);
                    return;
                }
            }
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            return;
        };

        match clipboard.set_text(&text) {
            Ok(()) => {
                tracing::debug!(chars = text.len(), "Reply copied to clipboard");
                self.copied_at = Some(Instant::now());
            }
            Err(e) => self.report_error(COPY_FAILED_MESSAGE, e),
        }
    }

    pub(super) fn copy_confirmed(&self) -> bool {
        self.copied_at
            .is_some_and(|at| at.elapsed() < COPIED_DURATION)
    }

    pub(super) fn scroll_reply(&mut self, delta: i16) {
        self.reply_scroll = if delta < 0 {
            self.reply_scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.reply_scroll.saturating_add(delta.unsigned_abs())
        };
    }
}
