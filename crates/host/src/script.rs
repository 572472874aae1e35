use crate::control::{BusyGuard, ControlHandle, ControlId, ReplyControl};
use crate::dom::{ControlElements, HostDocument};
use crate::geometry::place_menu;
use crate::menu::FadeTicket;
use crate::page::{extract_email_content, insert_reply, Delivery};
use crate::reply::{CompletedReply, PendingReply, ReplyError};
use crate::selectors::{CONTROL_SELECTOR, TOOLBAR_SELECTOR};
use draftai_api::{GenerationRequest, Tone, ToneSelection};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    AnchorAbsent,
    AlreadyMounted,
    Mounted(ControlId),
    MountFailed,
}

struct Mounted<E> {
    handle: ControlHandle,
    elements: ControlElements<E>,
}

/// The extension's state on one webmail page: the document, every control
/// mounted into it, and which control currently owns the open tone menu.
pub struct ContentScript<D: HostDocument> {
    document: D,
    controls: Vec<Mounted<D::Element>>,
    open_menu: Option<ControlId>,
    next_id: u64,
}

impl<D: HostDocument> ContentScript<D> {
    pub fn new(document: D) -> Self {
        Self {
            document,
            controls: Vec::new(),
            open_menu: None,
            next_id: 1,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn control_ids(&self) -> Vec<ControlId> {
        self.controls.iter().map(|m| m.handle.borrow().id()).collect()
    }

    pub fn control(&self, id: ControlId) -> Option<ControlHandle> {
        self.find(id).map(|m| m.handle.clone())
    }

    pub fn elements(&self, id: ControlId) -> Option<&ControlElements<D::Element>> {
        self.find(id).map(|m| &m.elements)
    }

    pub fn open_menu(&self) -> Option<ControlId> {
        self.open_menu
    }

    /// One injector pass. Mounts a control into the toolbar unless the
    /// toolbar is missing or already holds one.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(toolbar) = self.document.query_selector(TOOLBAR_SELECTOR) else {
            return TickOutcome::AnchorAbsent;
        };

        if self
            .document
            .query_selector_within(&toolbar, CONTROL_SELECTOR)
            .is_some()
        {
            return TickOutcome::AlreadyMounted;
        }

        self.prune_detached();

        let id = ControlId(self.next_id);
        self.next_id += 1;
        let control = ReplyControl::new(id);
        let view = control.view();

        match self.document.mount_control(&toolbar, &view) {
            Ok(elements) => {
                debug!(control = %id, "Mounted reply control");
                self.controls.push(Mounted {
                    handle: control.into_handle(),
                    elements,
                });
                TickOutcome::Mounted(id)
            }
            Err(e) => {
                warn!("Failed to mount reply control: {}", e);
                TickOutcome::MountFailed
            }
        }
    }

    /// Forgets controls whose toolbar the page has thrown away.
    fn prune_detached(&mut self) {
        let (alive, stale): (Vec<_>, Vec<_>) = self
            .controls
            .drain(..)
            .partition(|m| self.document.is_connected(&m.elements.container));
        self.controls = alive;

        for mounted in stale {
            let id = mounted.handle.borrow().id();
            debug!(control = %id, "Dropping detached reply control");
            if self.open_menu == Some(id) {
                self.open_menu = None;
            }
            self.document.remove_control(&mounted.elements);
        }
    }

    /// Dropdown click. Closes whichever menu is open; opens this control's
    /// menu unless it was the open one.
    pub fn toggle_menu(&mut self, id: ControlId) {
        let Some(handle) = self.control(id) else {
            return;
        };
        let was_open = handle.borrow().menu().is_open();

        if let Some(owner) = self.open_menu.take() {
            if let Some(previous) = self.control(owner) {
                previous.borrow_mut().menu_mut().hide_now();
                self.refresh(owner);
            }
        }
        if was_open {
            handle.borrow_mut().menu_mut().hide_now();
            self.refresh(id);
            return;
        }

        // A hidden menu measures zero, so place it once it is displayed.
        let Some(provisional) = self.menu_position(id) else {
            return;
        };
        handle.borrow_mut().menu_mut().open(provisional);
        self.open_menu = Some(id);
        self.refresh(id);

        if let Some(position) = self.menu_position(id) {
            if position != provisional {
                handle.borrow_mut().menu_mut().reposition(position);
                self.refresh(id);
            }
        }
    }

    /// Menu item click: record the tone and start hiding the menu.
    pub fn select_tone(&mut self, id: ControlId, tone: Tone) -> Option<FadeTicket> {
        let handle = self.control(id)?;
        let ticket = {
            let mut control = handle.borrow_mut();
            control.menu_mut().select(tone);
            control.menu_mut().fade_out()
        };
        if self.open_menu == Some(id) {
            self.open_menu = None;
        }
        self.refresh(id);
        ticket
    }

    /// Click anywhere else on the page: fade the open menu.
    pub fn dismiss_menus(&mut self) -> Vec<(ControlId, FadeTicket)> {
        let Some(owner) = self.open_menu.take() else {
            return Vec::new();
        };
        let Some(handle) = self.control(owner) else {
            return Vec::new();
        };
        let ticket = handle.borrow_mut().menu_mut().fade_out();
        self.refresh(owner);
        ticket.map(|t| vec![(owner, t)]).unwrap_or_default()
    }

    /// Called once [`FADE_DURATION`](crate::menu::FADE_DURATION) has passed.
    pub fn finish_fade(&mut self, id: ControlId, ticket: FadeTicket) {
        let Some(handle) = self.control(id) else {
            return;
        };
        let hidden = handle.borrow_mut().menu_mut().finish_fade(ticket);
        if hidden {
            self.refresh(id);
        }
    }

    /// Viewport resize: keep the open menu next to its anchor.
    pub fn on_resize(&mut self) {
        let Some(owner) = self.open_menu else {
            return;
        };
        let Some(position) = self.menu_position(owner) else {
            return;
        };
        if let Some(handle) = self.control(owner) {
            handle.borrow_mut().menu_mut().reposition(position);
            self.refresh(owner);
        }
    }

    /// Pushes the control's current state into the document.
    pub fn refresh(&mut self, id: ControlId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let view = self.controls[index].handle.borrow().view();
        if let Err(e) = self
            .document
            .render_control(&self.controls[index].elements, &view)
        {
            warn!(control = %id, "Failed to render reply control: {}", e);
        }
    }

    /// Primary button click, synchronous half: mark the control busy and
    /// build the request from the open thread.
    pub fn begin_reply(&mut self, id: ControlId) -> Result<PendingReply, ReplyError> {
        let handle = self.control(id).ok_or(ReplyError::UnknownControl(id))?;
        let guard = BusyGuard::acquire(&handle).ok_or(ReplyError::Busy(id))?;
        self.refresh(id);

        let content = extract_email_content(&self.document).ok_or(ReplyError::MissingContent)?;
        let tone = handle.borrow().tone();
        let request = GenerationRequest::new(content, ToneSelection::Fixed(tone))?;

        Ok(PendingReply::new(guard, request))
    }

    /// Inserts a generated reply into the compose box and releases the control.
    pub fn deliver(&mut self, completed: CompletedReply) -> Delivery {
        let (guard, reply) = completed.into_parts();
        let id = guard.control_id();
        let delivery = insert_reply(&mut self.document, reply.text());
        drop(guard);
        self.refresh(id);
        delivery
    }

    fn menu_position(&self, id: ControlId) -> Option<crate::geometry::MenuPosition> {
        let elements = &self.find(id)?.elements;
        let anchor = self.document.bounding_rect(&elements.dropdown);
        let menu_height = self.document.bounding_rect(&elements.menu).height;
        Some(place_menu(anchor, menu_height, self.document.viewport()))
    }

    fn find(&self, id: ControlId) -> Option<&Mounted<D::Element>> {
        self.index_of(id).map(|i| &self.controls[i])
    }

    fn index_of(&self, id: ControlId) -> Option<usize> {
        self.controls
            .iter()
            .position(|m| m.handle.borrow().id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Viewport};
    use crate::memory::{MemoryDocument, NodeId};

    fn page_with_toolbar() -> (ContentScript<MemoryDocument>, NodeId) {
        let mut doc = MemoryDocument::new(Viewport::new(1280.0, 800.0));
        let toolbar = add_toolbar(&mut doc, Rect::new(300.0, 120.0, 600.0, 36.0));
        (ContentScript::new(doc), toolbar)
    }

    fn add_toolbar(doc: &mut MemoryDocument, rect: Rect) -> NodeId {
        let body = doc.body();
        let toolbar = doc.create_element("div");
        doc.add_class(toolbar, "btC");
        doc.set_rect(toolbar, rect);
        let send = doc.create_element("div");
        doc.set_text(send, "Send");
        doc.append_child(toolbar, send);
        doc.append_child(body, toolbar);
        toolbar
    }

    fn mounted(outcome: TickOutcome) -> ControlId {
        match outcome {
            TickOutcome::Mounted(id) => id,
            other => panic!("expected a mount, got {other:?}"),
        }
    }

    #[test]
    fn absent_toolbar_leaves_document_untouched() {
        let mut script = ContentScript::new(MemoryDocument::new(Viewport::new(1280.0, 800.0)));
        let before = script.document().mutation_count();

        for _ in 0..5 {
            assert_eq!(script.tick(), TickOutcome::AnchorAbsent);
        }

        assert_eq!(script.document().mutation_count(), before);
        assert!(script.control_ids().is_empty());
    }

    #[test]
    fn mounts_once_as_first_child() {
        let (mut script, toolbar) = page_with_toolbar();

        let id = mounted(script.tick());
        let container = script.elements(id).unwrap().container;
        assert_eq!(script.document().children(toolbar)[0], container);

        let before = script.document().mutation_count();
        assert_eq!(script.tick(), TickOutcome::AlreadyMounted);
        assert_eq!(script.tick(), TickOutcome::AlreadyMounted);
        assert_eq!(script.document().mutation_count(), before);
        assert_eq!(
            script.document().query_selector_all(CONTROL_SELECTOR).len(),
            1
        );
    }

    #[test]
    fn replaced_toolbar_gets_a_fresh_control() {
        let (mut script, toolbar) = page_with_toolbar();
        let first = mounted(script.tick());

        script.document_mut().remove(toolbar);
        assert_eq!(script.tick(), TickOutcome::AnchorAbsent);

        add_toolbar(
            script.document_mut(),
            Rect::new(300.0, 120.0, 600.0, 36.0),
        );
        let second = mounted(script.tick());

        assert_ne!(first, second);
        assert_eq!(script.control_ids(), vec![second]);
        assert_eq!(script.document().query_selector_all(".ai-tone-menu").len(), 1);
    }

    #[test]
    fn opening_one_menu_closes_the_other() {
        let mut doc = MemoryDocument::new(Viewport::new(1280.0, 800.0));
        add_toolbar(&mut doc, Rect::new(300.0, 120.0, 600.0, 36.0));
        let mut script = ContentScript::new(doc);
        let a = mounted(script.tick());

        // A second conversation pane renders its own toolbar.
        let body = script.document().body();
        let first = script.document().children(body)[0];
        script.document_mut().remove(first);
        add_toolbar(
            script.document_mut(),
            Rect::new(300.0, 500.0, 600.0, 36.0),
        );
        script.document_mut().append_child(body, first);
        let b = mounted(script.tick());

        script.toggle_menu(b);
        assert_eq!(script.open_menu(), Some(b));

        script.toggle_menu(a);
        assert_eq!(script.open_menu(), Some(a));
        let a_open = script.control(a).unwrap().borrow().menu().is_open();
        let b_open = script.control(b).unwrap().borrow().menu().is_displayed();
        assert!(a_open);
        assert!(!b_open);
    }

    #[test]
    fn toggling_the_open_menu_closes_it() {
        let (mut script, _) = page_with_toolbar();
        let id = mounted(script.tick());

        script.toggle_menu(id);
        let container = script.elements(id).unwrap().container;
        assert!(script.document().control_view(container).unwrap().menu_displayed);

        script.toggle_menu(id);
        assert_eq!(script.open_menu(), None);
        assert!(!script.document().control_view(container).unwrap().menu_displayed);
    }

    #[test]
    fn selecting_a_tone_marks_it_active_and_fades() {
        let (mut script, _) = page_with_toolbar();
        let id = mounted(script.tick());

        script.toggle_menu(id);
        let ticket = script.select_tone(id, Tone::Concise).expect("menu was open");

        let elements = script.elements(id).unwrap().clone();
        let doc = script.document();
        for (tone, item) in &elements.items {
            assert_eq!(doc.has_class(*item, "active"), *tone == Tone::Concise);
        }
        assert_eq!(doc.style(elements.menu, "opacity"), Some("0"));
        assert_eq!(doc.style(elements.menu, "display"), Some("block"));

        script.finish_fade(id, ticket);
        assert_eq!(
            script.document().style(elements.menu, "display"),
            Some("none")
        );
        assert_eq!(script.control(id).unwrap().borrow().tone(), Tone::Concise);
    }

    #[test]
    fn document_click_fades_the_open_menu() {
        let (mut script, _) = page_with_toolbar();
        let id = mounted(script.tick());
        assert!(script.dismiss_menus().is_empty());

        script.toggle_menu(id);
        let fades = script.dismiss_menus();
        assert_eq!(fades.len(), 1);
        assert_eq!(script.open_menu(), None);

        let (owner, ticket) = fades[0];
        script.finish_fade(owner, ticket);
        assert!(!script.control(id).unwrap().borrow().menu().is_displayed());
    }

    #[test]
    fn menu_near_the_bottom_uses_its_rendered_height() {
        let mut doc = MemoryDocument::new(Viewport::new(1280.0, 900.0));
        add_toolbar(&mut doc, Rect::new(0.0, 694.0, 600.0, 36.0));
        let mut script = ContentScript::new(doc);
        let id = mounted(script.tick());

        script.toggle_menu(id);

        let menu = script.elements(id).unwrap().menu;
        let rendered = script.document().bounding_rect(&menu);
        assert_eq!(rendered.height, 164.0);
        let position = script.control(id).unwrap().borrow().menu().position().unwrap();
        assert_eq!(position.top, 694.0 - 164.0 - 8.0);
        assert_eq!(rendered.top, position.top);
    }

    #[test]
    fn resize_keeps_menu_on_screen() {
        let mut doc = MemoryDocument::new(Viewport::new(1280.0, 900.0));
        add_toolbar(&mut doc, Rect::new(0.0, 600.0, 600.0, 36.0));
        let mut script = ContentScript::new(doc);
        let id = mounted(script.tick());

        script.toggle_menu(id);
        let opened = script.control(id).unwrap().borrow().menu().position().unwrap();
        assert!(opened.top > 600.0);

        script.document_mut().resize(Viewport::new(400.0, 700.0));
        script.on_resize();

        let resized = script.control(id).unwrap().borrow().menu().position().unwrap();
        assert!(resized.left >= 0.0);
        assert!(resized.top < 600.0, "menu should flip above its anchor");
    }
}
