use crate::dom::HostDocument;
use crate::selectors::{COMPOSE_SELECTOR, CONTENT_SELECTORS};
use tracing::{debug, warn};

/// Where a generated reply ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Inserted,
    NoComposeRegion,
    InsertFailed,
}

/// Text of the open thread, taken from the first content selector that
/// matches. `None` when nothing matches or the match is blank.
pub fn extract_email_content<D: HostDocument>(document: &D) -> Option<String> {
    for selector in CONTENT_SELECTORS {
        if let Some(element) = document.query_selector(selector) {
            let text = document.inner_text(&element).trim().to_string();
            debug!(selector, chars = text.len(), "Found email content");
            return (!text.is_empty()).then_some(text);
        }
    }
    None
}

/// Focuses the compose box and inserts `text` at its caret. A missing compose
/// box is not an error; the reply is simply dropped.
pub fn insert_reply<D: HostDocument>(document: &mut D, text: &str) -> Delivery {
    let Some(compose) = document.query_selector(COMPOSE_SELECTOR) else {
        debug!("No compose region; generated reply not inserted");
        return Delivery::NoComposeRegion;
    };

    document.focus(&compose);
    match document.insert_text(&compose, text) {
        Ok(()) => Delivery::Inserted,
        Err(e) => {
            warn!("Failed to insert reply: {}", e);
            Delivery::InsertFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Viewport;
    use crate::memory::MemoryDocument;

    fn document() -> MemoryDocument {
        MemoryDocument::new(Viewport::new(1280.0, 800.0))
    }

    #[test]
    fn first_matching_selector_wins() {
        let mut doc = document();
        let body = doc.body();
        let quote = doc.create_element("div");
        doc.add_class(quote, "gmail_quote");
        doc.set_text(quote, "quoted text");
        doc.append_child(body, quote);
        let message = doc.create_element("div");
        doc.add_class(message, "a3s");
        doc.add_class(message, "aiL");
        doc.set_text(message, "  Are we still on for lunch?  ");
        doc.append_child(body, message);

        assert_eq!(
            extract_email_content(&doc).as_deref(),
            Some("Are we still on for lunch?")
        );
    }

    #[test]
    fn missing_content_yields_none() {
        let mut doc = document();
        let body = doc.body();
        let other = doc.create_element("div");
        doc.add_class(other, "unrelated");
        doc.set_text(other, "sidebar");
        doc.append_child(body, other);

        assert_eq!(extract_email_content(&doc), None);
    }

    #[test]
    fn inserts_at_caret_without_replacing() {
        let mut doc = document();
        let body = doc.body();
        let compose = doc.create_element("div");
        doc.set_attribute(compose, "role", "textbox");
        doc.set_attribute(compose, "g_editable", "true");
        doc.set_text(compose, "Hi Sam,\n\nBest, Kim");
        doc.set_caret(compose, 8);
        doc.append_child(body, compose);

        assert_eq!(insert_reply(&mut doc, "\nSounds good."), Delivery::Inserted);
        assert_eq!(doc.text(compose), "Hi Sam,\n\nSounds good.\nBest, Kim");
        assert_eq!(doc.focused(), Some(compose));
    }

    #[test]
    fn missing_compose_region_is_tolerated() {
        let mut doc = document();
        assert_eq!(insert_reply(&mut doc, "hello"), Delivery::NoComposeRegion);
    }
}
