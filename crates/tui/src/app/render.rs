use super::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        self.layout.calculate_layout(area);
        let panels = self.layout.get_panels().to_vec();

        for panel in panels {
            match panel.panel_type {
                PanelType::Topbar => self.render_topbar(frame, panel.rect),
                PanelType::Compose => self.render_compose(frame, panel.rect),
                PanelType::Tones => self.render_tones(frame, panel.rect),
                PanelType::Reply => self.render_reply(frame, panel.rect),
                PanelType::History => self.render_history(frame, panel.rect),
                PanelType::StatusBar => self.render_status_bar(frame, panel.rect),
            }
        }

        if self.show_help {
            self.render_help(frame, area);
        } else if self.show_error_details {
            self.render_error_details(frame, area);
        }
    }

    fn border_style(&self, focus: Focus) -> Style {
        if self.focus == focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    }

    fn render_topbar(&self, frame: &mut Frame, area: Rect) {
        let text = format!(
            " ✉ Draft AI   tone: {}   api: {}   [Tab] focus   [F1] help",
            self.tone.label(),
            self.config.api.base_url,
        );
        frame.render_widget(
            Paragraph::new(text).style(Style::default().add_modifier(Modifier::BOLD)),
            area,
        );
    }

    fn render_compose(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Email to reply to ")
            .border_style(self.border_style(Focus::Compose));

        let inner_height = area.height.saturating_sub(2);
        let (line, col) = self.editor.cursor_line_col();
        let line = u16::try_from(line).unwrap_or(u16::MAX);
        let col = u16::try_from(col).unwrap_or(u16::MAX);
        let scroll = line.saturating_sub(inner_height.saturating_sub(1));

        if self.editor.text().is_empty() && self.focus != Focus::Compose {
            frame.render_widget(
                Paragraph::new("Paste the email you received here...")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                area,
            );
            return;
        }

        frame.render_widget(
            Paragraph::new(self.editor.text())
                .block(block)
                .scroll((scroll, 0)),
            area,
        );

        if self.focus == Focus::Compose && !self.show_help && !self.show_error_details {
            let x = area
                .x
                .saturating_add(1)
                .saturating_add(col)
                .min(area.x.saturating_add(area.width.saturating_sub(2)));
            let y = area.y.saturating_add(1).saturating_add(line - scroll);
            frame.set_cursor_position((x, y));
        }
    }

    fn render_tones(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = TONE_CHOICES
            .iter()
            .enumerate()
            .map(|(i, tone)| {
                let marker = if *tone == self.tone { "(•)" } else { "( )" };
                let style = if i == self.tone_cursor && self.focus == Focus::Tones {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{} {}", marker, tone.label())).style(style)
            })
            .collect();

        frame.render_widget(
            List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Tone ")
                    .border_style(self.border_style(Focus::Tones)),
            ),
            area,
        );
    }

    fn render_reply(&self, frame: &mut Frame, area: Rect) {
        let title = if self.copy_confirmed() {
            " Generated reply (Copied!) "
        } else {
            " Generated reply "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(self.border_style(Focus::Reply));

        let paragraph = if let (true, Some(start_time)) = (self.is_loading, self.loading_start_time)
        {
            let elapsed = start_time.elapsed().as_secs();
            Paragraph::new(format!("Generating reply... ({}s)", elapsed)).centered()
        } else if let Some(ref reply) = self.reply {
            Paragraph::new(reply.as_str())
                .wrap(Wrap { trim: false })
                .scroll((self.reply_scroll, 0))
        } else {
            Paragraph::new("Press Ctrl+S to generate a reply.")
                .style(Style::default().fg(Color::DarkGray))
        };

        frame.render_widget(paragraph.block(block), area);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .history
            .iter()
            .map(|record| {
                let time = record.timestamp.format("%H:%M").to_string();
                let prefix = format!("{} {:<12} ", time, record.tone.label());
                let preview: String = record
                    .text
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .chars()
                    .take(width.saturating_sub(prefix.chars().count()))
                    .collect();
                ListItem::new(format!("{prefix}{preview}"))
            })
            .collect();

        let title = format!(" History ({}/{}) ", self.history.len(), HISTORY_LIMIT);
        frame.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
            area,
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let (text, style) = match self.last_error {
            Some(ref error) => {
                let hint = if error.detail.is_some() {
                    "   [F2] details"
                } else {
                    ""
                };
                (
                    format!(" ⚠ {}{}", error.summary, hint),
                    Style::default().fg(Color::Red),
                )
            }
            None if self.is_loading => (" Generating...".to_string(), Style::default()),
            None if self.copy_confirmed() => {
                (" ✓ Copied!".to_string(), Style::default().fg(Color::Green))
            }
            None => (
                " [Ctrl+S] generate   [Ctrl+Y] copy   [Ctrl+R] reset   [Ctrl+T] tone   [Ctrl+Q] quit"
                    .to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        };
        frame.render_widget(Paragraph::new(text).style(style), area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help_text = self.keybinds.help_text();
        let popup_area = self.centered_rect(60, 80, area);

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(help_text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help - Press F1 or Esc to close "),
            ),
            popup_area,
        );
    }

    fn render_error_details(&self, frame: &mut Frame, area: Rect) {
        let popup_area = self.centered_rect(60, 30, area);
        let details = self
            .last_error
            .as_ref()
            .and_then(|e| e.detail.as_deref())
            .unwrap_or("No error details available.");
        let text = format!("{}\n\n[Esc] or [Enter] to close", details);

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(text).wrap(Wrap { trim: false }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Error Details "),
            ),
            popup_area,
        );
    }

    fn centered_rect(&self, percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        use ratatui::layout::{Constraint, Direction, Layout};

        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}
