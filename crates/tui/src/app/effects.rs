use super::*;

impl App {
    pub fn process_async_events(&mut self) {
        if self.copied_at.is_some() && !self.copy_confirmed() {
            self.copied_at = None;
        }

        let mut async_events = Vec::new();
        if let Some(ref mut rx) = self.app_async_rx {
            while let Ok(event) = rx.try_recv() {
                async_events.push(event);
            }
        }

        for event in async_events {
            match event {
                AppAsyncEvent::ReplyGenerated {
                    request_id,
                    tone,
                    result,
                } => {
                    if request_id != self.request_id || !self.is_loading {
                        tracing::debug!(request_id, "Dropping result of an abandoned request");
                        continue;
                    }
                    self.is_loading = false;
                    self.loading_start_time = None;

                    match result {
                        Ok(reply) => {
                            let text = reply.display_text();
                            tracing::info!(request_id, chars = text.len(), "Reply generated");
                            self.history.push_front(ReplyRecord {
                                tone,
                                text: text.clone(),
                                timestamp: Utc::now(),
                            });
                            self.history.truncate(HISTORY_LIMIT);
                            self.reply = Some(text);
                            self.reply_scroll = 0;
                            self.clear_error();
                        }
                        Err(e) => {
                            let detail = format!("{}\n\n{}", e.user_message(), e);
                            self.report_error(GENERATION_FAILED_MESSAGE, detail);
                        }
                    }
                }
            }
        }
    }
}
