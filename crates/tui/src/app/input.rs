use super::*;

impl App {
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            Event::Paste(text) => {
                if !self.show_help && !self.show_error_details {
                    self.focus = Focus::Compose;
                    self.editor.insert_str(&text);
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if key.code == KeyCode::Char('q') && ctrl {
            return Ok(true);
        }

        if key.code == KeyCode::F(1) || key.code == KeyCode::Char('?') && self.focus != Focus::Compose
        {
            self.show_help = !self.show_help;
            return Ok(false);
        }

        if self.show_help {
            if key.code == KeyCode::Esc {
                self.show_help = false;
            }
            return Ok(false);
        }

        if self.show_error_details {
            match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::F(2) | KeyCode::Char('E') => {
                    self.show_error_details = false;
                }
                _ => {}
            }
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('s') if ctrl => {
                self.submit();
                return Ok(false);
            }
            KeyCode::Char('r') if ctrl => {
                self.reset();
                return Ok(false);
            }
            KeyCode::Char('t') if ctrl => {
                self.cycle_tone();
                return Ok(false);
            }
            KeyCode::Char('y') if ctrl => {
                self.copy_reply();
                return Ok(false);
            }
            KeyCode::F(2) => {
                if self.last_error.is_some() {
                    self.show_error_details = true;
                }
                return Ok(false);
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Ok(false);
            }
            _ => {}
        }

        match self.focus {
            Focus::Compose => self.handle_compose_key(key),
            Focus::Tones => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.tone_cursor = self.tone_cursor.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.tone_cursor = (self.tone_cursor + 1).min(TONE_CHOICES.len() - 1);
                }
                KeyCode::Enter | KeyCode::Char(' ') => self.select_tone(self.tone_cursor),
                KeyCode::Char('E') if self.last_error.is_some() => self.show_error_details = true,
                KeyCode::Esc => self.focus = Focus::Compose,
                _ => {}
            },
            Focus::Reply => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.scroll_reply(-1),
                KeyCode::Down | KeyCode::Char('j') => self.scroll_reply(1),
                KeyCode::PageUp => self.scroll_reply(-10),
                KeyCode::PageDown => self.scroll_reply(10),
                KeyCode::Char('E') if self.last_error.is_some() => self.show_error_details = true,
                KeyCode::Esc => self.focus = Focus::Compose,
                _ => {}
            },
        }

        Ok(false)
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.editor.handle_char(c);
            }
            KeyCode::Enter => self.editor.newline(),
            KeyCode::Backspace => self.editor.handle_backspace(),
            KeyCode::Delete => self.editor.handle_delete(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_line_start(),
            KeyCode::End => self.editor.move_line_end(),
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<bool> {
        if self.show_help || self.show_error_details {
            return Ok(false);
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.last_mouse_pos = (mouse.column, mouse.row);

                if let Some(target) = self.hit_test(mouse.column, mouse.row) {
                    match target {
                        HitTarget::SplitDivider => self.drag_target = Some(DragTarget::Split),
                        HitTarget::Compose => self.focus = Focus::Compose,
                        HitTarget::Reply => self.focus = Focus::Reply,
                        HitTarget::Tone(idx) => {
                            self.focus = Focus::Tones;
                            self.select_tone(idx);
                        }
                        HitTarget::HistoryEntry(idx) => self.show_history_entry(idx),
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(target) = self.drag_target {
                    let delta = (i32::from(mouse.column) - i32::from(self.last_mouse_pos.0))
                        .clamp(i32::from(i16::MIN), i32::from(i16::MAX))
                        as i16;
                    self.layout.handle_drag(target, delta);
                    self.last_mouse_pos = (mouse.column, mouse.row);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_target = None;
            }
            MouseEventKind::ScrollDown => self.scroll_reply(1),
            MouseEventKind::ScrollUp => self.scroll_reply(-1),
            _ => {}
        }
        Ok(false)
    }

    fn hit_test(&self, col: u16, row: u16) -> Option<HitTarget> {
        if self.layout.is_split_divider(col, row) {
            return Some(HitTarget::SplitDivider);
        }

        for panel in self.layout.get_panels() {
            if Self::rect_contains(panel.rect, col, row) {
                return match panel.panel_type {
                    PanelType::Compose => Some(HitTarget::Compose),
                    PanelType::Reply => Some(HitTarget::Reply),
                    PanelType::Tones => Self::hit_row(panel.rect, row, TONE_CHOICES.len())
                        .map(HitTarget::Tone),
                    PanelType::History => Self::hit_row(panel.rect, row, self.history.len())
                        .map(HitTarget::HistoryEntry),
                    PanelType::Topbar | PanelType::StatusBar => None,
                };
            }
        }

        None
    }

    /// Index of the bordered list row under `row`, if any.
    fn hit_row(rect: Rect, row: u16, len: usize) -> Option<usize> {
        let first = rect.y + 1;
        if row < first {
            return None;
        }
        let idx = (row - first) as usize;
        (idx < len && row < rect.y + rect.height.saturating_sub(1)).then_some(idx)
    }

    fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
        col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
    }
}

#[derive(Debug, Clone, Copy)]
enum HitTarget {
    SplitDivider,
    Compose,
    Reply,
    Tone(usize),
    HistoryEntry(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();
    }

    fn laid_out() -> App {
        let mut app = App::default();
        app.layout.calculate_layout(Rect::new(0, 0, 140, 40));
        app
    }

    #[test]
    fn clicking_a_tone_row_selects_it() {
        let mut app = laid_out();
        let tones = app.layout.get_rect(PanelType::Tones).unwrap();

        click(&mut app, tones.x + 3, tones.y + 3);

        assert_eq!(app.tone, ToneSelection::Fixed(Tone::Casual));
        assert_eq!(app.focus, Focus::Tones);
    }

    #[test]
    fn dragging_the_divider_resizes_compose() {
        let mut app = laid_out();
        click(&mut app, 60, 10);
        assert_eq!(app.drag_target, Some(DragTarget::Split));

        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            column: 70,
            row: 10,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();
        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column: 70,
            row: 10,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();

        assert_eq!(app.layout.compose_width(), 70);
        assert_eq!(app.drag_target, None);
    }

    #[test]
    fn clicking_history_restores_that_reply() {
        let mut app = laid_out();
        for text in ["older", "newer"] {
            app.history.push_front(ReplyRecord {
                tone: ToneSelection::Auto,
                text: text.to_string(),
                timestamp: Utc::now(),
            });
        }
        let history = app.layout.get_rect(PanelType::History).unwrap();

        click(&mut app, history.x + 2, history.y + 2);
        assert_eq!(app.reply.as_deref(), Some("older"));

        click(&mut app, history.x + 2, history.y + 5);
        assert_eq!(app.reply.as_deref(), Some("older"));
    }

    #[test]
    fn reply_scroll_stops_at_both_ends() {
        let mut app = App::default();
        app.reply = Some("short".to_string());
        app.scroll_reply(-10);
        assert_eq!(app.reply_scroll, 0);

        app.reply_scroll = u16::MAX - 5;
        app.scroll_reply(10);
        assert_eq!(app.reply_scroll, u16::MAX);

        app.reply_scroll = 40_000;
        app.scroll_reply(-10);
        assert_eq!(app.reply_scroll, 39_990);
    }

    #[test]
    fn paste_goes_into_the_editor() {
        let mut app = App::default();
        app.focus = Focus::Reply;
        app.handle_event(Event::Paste("Hi,\r\nAre you free?".to_string()))
            .unwrap();
        assert_eq!(app.focus, Focus::Compose);
        assert_eq!(app.editor.text(), "Hi,\nAre you free?");
    }
}
