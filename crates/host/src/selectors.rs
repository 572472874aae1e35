//! Selectors for the webmail page and class names of the injected markup.

pub const TOOLBAR_SELECTOR: &str = ".btC";

/// Probed in order; the first element that exists supplies the thread text.
pub const CONTENT_SELECTORS: [&str; 4] = [
    ".h7",
    ".a3s.aiL",
    ".gmail_quote",
    "[role=\"presentation\"]",
];

pub const COMPOSE_SELECTOR: &str = "[role=\"textbox\"][g_editable=\"true\"]";

pub const CONTAINER_CLASS: &str = "ai-reply-container";
pub const CONTROL_SELECTOR: &str = ".ai-reply-container";
pub const PRIMARY_CLASS: &str = "ai-main-btn";
pub const DROPDOWN_CLASS: &str = "ai-dropdown-btn";
pub const MENU_CLASS: &str = "ai-tone-menu";
pub const MENU_ITEM_CLASS: &str = "ai-menu-item";
pub const ACTIVE_CLASS: &str = "active";
pub const TONE_ATTRIBUTE: &str = "data-tone";
