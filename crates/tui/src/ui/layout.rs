use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::panel::{Panel, PanelType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragTarget {
    Split,
}

const MIN_COMPOSE_WIDTH: u16 = 30;
const MAX_COMPOSE_WIDTH: u16 = 120;
const MIN_REPLY_WIDTH: u16 = 30;
const TOPBAR_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;
const HISTORY_HEIGHT: u16 = 8;

pub struct LayoutState {
    compose_width: u16,
    tones_height: u16,
    cached_panels: Vec<Panel>,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new(4)
    }
}

impl LayoutState {
    /// `tone_count` sizes the tone picker so every choice is visible.
    pub fn new(tone_count: usize) -> Self {
        Self {
            compose_width: 60,
            tones_height: tone_count as u16 + 2,
            cached_panels: Vec::new(),
        }
    }

    pub fn compose_width(&self) -> u16 {
        self.compose_width
    }

    pub fn calculate_layout(&mut self, area: Rect) -> &[Panel] {
        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TOPBAR_HEIGHT),
                Constraint::Min(1),
                Constraint::Length(STATUS_HEIGHT),
            ])
            .split(area);

        let content_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(self.compose_width),
                Constraint::Min(MIN_REPLY_WIDTH),
            ])
            .split(main_layout[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(self.tones_height)])
            .split(content_layout[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(HISTORY_HEIGHT)])
            .split(content_layout[1]);

        self.cached_panels = vec![
            Panel {
                panel_type: PanelType::Topbar,
                rect: main_layout[0],
            },
            Panel {
                panel_type: PanelType::Compose,
                rect: left[0],
            },
            Panel {
                panel_type: PanelType::Tones,
                rect: left[1],
            },
            Panel {
                panel_type: PanelType::Reply,
                rect: right[0],
            },
            Panel {
                panel_type: PanelType::History,
                rect: right[1],
            },
            Panel {
                panel_type: PanelType::StatusBar,
                rect: main_layout[2],
            },
        ];

        &self.cached_panels
    }

    pub fn get_panels(&self) -> &[Panel] {
        &self.cached_panels
    }

    pub fn get_rect(&self, panel_type: PanelType) -> Option<Rect> {
        self.cached_panels
            .iter()
            .find(|p| p.panel_type == panel_type)
            .map(|p| p.rect)
    }

    pub fn handle_drag(&mut self, target: DragTarget, delta: i16) {
        match target {
            DragTarget::Split => {
                self.compose_width = (self.compose_width as i16 + delta)
                    .clamp(MIN_COMPOSE_WIDTH as i16, MAX_COMPOSE_WIDTH as i16)
                    as u16;
            }
        }
    }

    /// True on the border column between the compose and reply sides.
    pub fn is_split_divider(&self, col: u16, row: u16) -> bool {
        let Some(compose) = self.get_rect(PanelType::Compose) else {
            return false;
        };
        let Some(tones) = self.get_rect(PanelType::Tones) else {
            return false;
        };
        let divider = compose.x + compose.width;
        let in_rows = row >= compose.y && row < tones.y + tones.height;
        in_rows && (col == divider || col + 1 == divider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_tile_the_screen() {
        let mut layout = LayoutState::new(4);
        let panels = layout.calculate_layout(Rect::new(0, 0, 140, 40)).to_vec();

        assert_eq!(panels.len(), 6);
        let compose = layout.get_rect(PanelType::Compose).unwrap();
        let tones = layout.get_rect(PanelType::Tones).unwrap();
        let reply = layout.get_rect(PanelType::Reply).unwrap();
        assert_eq!(compose.width, 60);
        assert_eq!(tones.height, 6);
        assert_eq!(reply.x, 60);
        assert_eq!(reply.width, 80);
    }

    #[test]
    fn drag_is_clamped() {
        let mut layout = LayoutState::default();
        layout.handle_drag(DragTarget::Split, -100);
        assert_eq!(layout.compose_width(), MIN_COMPOSE_WIDTH);
        layout.handle_drag(DragTarget::Split, 500);
        assert_eq!(layout.compose_width(), MAX_COMPOSE_WIDTH);
        layout.handle_drag(DragTarget::Split, -10);
        assert_eq!(layout.compose_width(), MAX_COMPOSE_WIDTH - 10);
    }

    #[test]
    fn divider_hit_test_follows_split() {
        let mut layout = LayoutState::default();
        layout.calculate_layout(Rect::new(0, 0, 140, 40));
        assert!(layout.is_split_divider(60, 10));
        assert!(layout.is_split_divider(59, 10));
        assert!(!layout.is_split_divider(30, 10));
        assert!(!layout.is_split_divider(60, 0));
        assert!(!layout.is_split_divider(60, 39));
    }
}
