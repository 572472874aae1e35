//! Drives the injector on a fixed interval. The webmail page renders its
//! toolbars whenever it likes and offers no event for it, so we look again
//! every tick.
//!
//! [`poll_once`] and [`complete_fade`] are the steps every driver runs; the
//! browser schedules them with timers, native builds with tokio.

use crate::control::ControlId;
use crate::dom::HostDocument;
use crate::menu::FadeTicket;
use crate::script::{ContentScript, TickOutcome};
use std::cell::RefCell;
use std::time::Duration;
use tracing::debug;

pub const POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// One injector pass. The borrow ends before this returns.
pub fn poll_once<D: HostDocument>(script: &RefCell<ContentScript<D>>) -> TickOutcome {
    let outcome = script.borrow_mut().tick();
    if let TickOutcome::Mounted(id) = outcome {
        debug!(control = %id, "Injector mounted a control");
    }
    outcome
}

/// Hides the menu if `ticket` is still the latest fade.
pub fn complete_fade<D: HostDocument>(
    script: &RefCell<ContentScript<D>>,
    id: ControlId,
    ticket: FadeTicket,
) {
    script.borrow_mut().finish_fade(id, ticket);
}

/// Ticks the injector forever. Only the unloading of the page stops it.
#[cfg(any(test, not(target_arch = "wasm32")))]
pub async fn run_injector<D: HostDocument>(script: &RefCell<ContentScript<D>>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        poll_once(script);
    }
}

/// Completes a menu fade after [`FADE_DURATION`](crate::menu::FADE_DURATION).
#[cfg(any(test, not(target_arch = "wasm32")))]
pub async fn hide_after_fade<D: HostDocument>(
    script: &RefCell<ContentScript<D>>,
    id: ControlId,
    ticket: FadeTicket,
) {
    tokio::time::sleep(crate::menu::FADE_DURATION).await;
    complete_fade(script, id, ticket);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Viewport};
    use crate::memory::MemoryDocument;
    use crate::selectors::CONTROL_SELECTOR;
    use draftai_api::Tone;

    fn empty_page() -> RefCell<ContentScript<MemoryDocument>> {
        RefCell::new(ContentScript::new(MemoryDocument::new(Viewport::new(
            1024.0, 768.0,
        ))))
    }

    #[tokio::test]
    async fn injector_mounts_once_toolbar_appears() {
        let script = empty_page();

        let _ = tokio::time::timeout(
            Duration::from_millis(40),
            run_injector(&script, Duration::from_millis(5)),
        )
        .await;
        assert!(script.borrow().control_ids().is_empty());
        assert_eq!(script.borrow().document().mutation_count(), 0);

        {
            let mut guard = script.borrow_mut();
            let doc = guard.document_mut();
            let body = doc.body();
            let toolbar = doc.create_element("div");
            doc.add_class(toolbar, "btC");
            doc.set_rect(toolbar, Rect::new(100.0, 100.0, 500.0, 36.0));
            doc.append_child(body, toolbar);
        }

        let _ = tokio::time::timeout(
            Duration::from_millis(60),
            run_injector(&script, Duration::from_millis(5)),
        )
        .await;

        let script = script.borrow();
        assert_eq!(script.control_ids().len(), 1);
        assert_eq!(
            script.document().query_selector_all(CONTROL_SELECTOR).len(),
            1
        );
    }

    fn add_toolbar(script: &RefCell<ContentScript<MemoryDocument>>) {
        let mut guard = script.borrow_mut();
        let doc = guard.document_mut();
        let body = doc.body();
        let toolbar = doc.create_element("div");
        doc.add_class(toolbar, "btC");
        doc.append_child(body, toolbar);
    }

    #[test]
    fn each_pass_mounts_at_most_once() {
        let script = empty_page();
        assert_eq!(poll_once(&script), TickOutcome::AnchorAbsent);

        add_toolbar(&script);
        assert!(matches!(poll_once(&script), TickOutcome::Mounted(_)));
        assert_eq!(poll_once(&script), TickOutcome::AlreadyMounted);
        assert!(script.try_borrow_mut().is_ok());
    }

    #[test]
    fn superseded_fade_does_not_hide_reopened_menu() {
        let script = empty_page();
        add_toolbar(&script);
        let TickOutcome::Mounted(id) = poll_once(&script) else {
            panic!("expected a mount");
        };

        script.borrow_mut().toggle_menu(id);
        let stale = script
            .borrow_mut()
            .select_tone(id, Tone::Concise)
            .expect("menu was open");
        script.borrow_mut().toggle_menu(id);

        complete_fade(&script, id, stale);
        let control = script.borrow().control(id).expect("still mounted");
        assert!(control.borrow().menu().is_open());
    }

    #[tokio::test]
    async fn fade_completes_after_delay() {
        let script = empty_page();
        {
            let mut guard = script.borrow_mut();
            let doc = guard.document_mut();
            let body = doc.body();
            let toolbar = doc.create_element("div");
            doc.add_class(toolbar, "btC");
            doc.append_child(body, toolbar);
        }
        let id = match script.borrow_mut().tick() {
            TickOutcome::Mounted(id) => id,
            other => panic!("expected a mount, got {other:?}"),
        };

        script.borrow_mut().toggle_menu(id);
        let ticket = script
            .borrow_mut()
            .select_tone(id, Tone::Kind)
            .expect("menu was open");
        let displayed = |s: &RefCell<ContentScript<MemoryDocument>>| {
            let Some(control) = s.borrow().control(id) else {
                return false;
            };
            let shown = control.borrow().menu().is_displayed();
            shown
        };
        assert!(displayed(&script));

        hide_after_fade(&script, id, ticket).await;
        assert!(!displayed(&script));
    }
}
