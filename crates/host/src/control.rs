use crate::geometry::MenuPosition;
use crate::menu::ToneMenu;
use draftai_api::Tone;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub const PRIMARY_LABEL: &str = "AI Reply";
pub const BUSY_LABEL: &str = "Drafting...";
pub const DEFAULT_TONE: Tone = Tone::Professional;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub u64);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State of one injected "AI Reply" control: its tone menu and whether a
/// reply is being drafted.
#[derive(Debug)]
pub struct ReplyControl {
    id: ControlId,
    menu: ToneMenu,
    busy: bool,
}

pub type ControlHandle = Rc<RefCell<ReplyControl>>;

impl ReplyControl {
    pub fn new(id: ControlId) -> Self {
        Self {
            id,
            menu: ToneMenu::new(&Tone::EXTENSION, DEFAULT_TONE),
            busy: false,
        }
    }

    pub fn into_handle(self) -> ControlHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn tone(&self) -> Tone {
        self.menu.active()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn menu(&self) -> &ToneMenu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut ToneMenu {
        &mut self.menu
    }

    pub fn view(&self) -> ControlView {
        ControlView {
            label: if self.busy { BUSY_LABEL } else { PRIMARY_LABEL },
            busy: self.busy,
            menu_displayed: self.menu.is_displayed(),
            menu_opacity: self.menu.opacity(),
            menu_position: self.menu.position(),
            tones: self.menu.tones(),
            active_tone: self.menu.active(),
        }
    }
}

/// Everything a document backend needs to draw a control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlView {
    pub label: &'static str,
    pub busy: bool,
    pub menu_displayed: bool,
    pub menu_opacity: f64,
    pub menu_position: Option<MenuPosition>,
    pub tones: &'static [Tone],
    pub active_tone: Tone,
}

/// Holds a control in its busy state; dropping the guard makes it idle again.
#[derive(Debug)]
pub struct BusyGuard {
    control: ControlHandle,
}

impl BusyGuard {
    /// Returns `None` when the control is already busy.
    pub fn acquire(control: &ControlHandle) -> Option<Self> {
        let mut state = control.borrow_mut();
        if state.busy {
            return None;
        }
        state.busy = true;
        Some(Self {
            control: Rc::clone(control),
        })
    }

    pub fn control_id(&self) -> ControlId {
        self.control.borrow().id
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.control.borrow_mut().busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_guard_is_exclusive_and_released_on_drop() {
        let control = ReplyControl::new(ControlId(1)).into_handle();

        let guard = BusyGuard::acquire(&control).expect("idle control");
        assert!(control.borrow().is_busy());
        assert_eq!(control.borrow().view().label, BUSY_LABEL);
        assert!(BusyGuard::acquire(&control).is_none());

        drop(guard);
        assert!(!control.borrow().is_busy());
        assert_eq!(control.borrow().view().label, PRIMARY_LABEL);
    }

    #[test]
    fn new_controls_default_to_professional() {
        let control = ReplyControl::new(ControlId(7));
        assert_eq!(control.tone(), Tone::Professional);
        assert_eq!(control.view().tones, &Tone::EXTENSION);
        assert!(!control.view().menu_displayed);
    }
}
