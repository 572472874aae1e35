use crate::geometry::MenuPosition;
use draftai_api::Tone;
use std::time::Duration;

/// How long the menu stays displayed (transparent) after it starts hiding.
pub const FADE_DURATION: Duration = Duration::from_millis(200);

/// Identifies one fade-out. A fade only completes if the menu has not been
/// reopened or faded again since the ticket was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPhase {
    Hidden,
    Open,
    Fading(FadeTicket),
}

#[derive(Debug, Clone)]
pub struct ToneMenu {
    tones: &'static [Tone],
    active: Tone,
    phase: MenuPhase,
    position: Option<MenuPosition>,
    next_ticket: u64,
}

impl ToneMenu {
    pub fn new(tones: &'static [Tone], active: Tone) -> Self {
        Self {
            tones,
            active,
            phase: MenuPhase::Hidden,
            position: None,
            next_ticket: 0,
        }
    }

    pub fn tones(&self) -> &'static [Tone] {
        self.tones
    }

    pub fn active(&self) -> Tone {
        self.active
    }

    pub fn phase(&self) -> MenuPhase {
        self.phase
    }

    pub fn position(&self) -> Option<MenuPosition> {
        self.position
    }

    /// Fully visible. A menu that is fading counts as closed.
    pub fn is_open(&self) -> bool {
        self.phase == MenuPhase::Open
    }

    /// Still occupies layout (open or mid-fade).
    pub fn is_displayed(&self) -> bool {
        self.phase != MenuPhase::Hidden
    }

    pub fn opacity(&self) -> f64 {
        if self.is_open() {
            1.0
        } else {
            0.0
        }
    }

    pub fn open(&mut self, position: MenuPosition) {
        self.position = Some(position);
        self.phase = MenuPhase::Open;
    }

    pub fn reposition(&mut self, position: MenuPosition) {
        if self.is_displayed() {
            self.position = Some(position);
        }
    }

    pub fn hide_now(&mut self) {
        self.phase = MenuPhase::Hidden;
    }

    /// Starts hiding the menu. Returns the ticket to pass to
    /// [`ToneMenu::finish_fade`] once [`FADE_DURATION`] has elapsed.
    pub fn fade_out(&mut self) -> Option<FadeTicket> {
        if !self.is_open() {
            return None;
        }
        let ticket = FadeTicket(self.next_ticket);
        self.next_ticket += 1;
        self.phase = MenuPhase::Fading(ticket);
        Some(ticket)
    }

    pub fn finish_fade(&mut self, ticket: FadeTicket) -> bool {
        if self.phase == MenuPhase::Fading(ticket) {
            self.phase = MenuPhase::Hidden;
            true
        } else {
            false
        }
    }

    /// Marks `tone` active. Tones outside this menu's palette are ignored.
    pub fn select(&mut self, tone: Tone) -> bool {
        if self.tones.contains(&tone) {
            self.active = tone;
            true
        } else {
            false
        }
    }
}
