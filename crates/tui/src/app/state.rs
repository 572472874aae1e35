use super::*;
use std::time::{Duration, Instant};

/// Tone choices offered by the picker, in display order.
pub const TONE_CHOICES: [ToneSelection; 4] = [
    ToneSelection::Auto,
    ToneSelection::Fixed(Tone::Professional),
    ToneSelection::Fixed(Tone::Casual),
    ToneSelection::Fixed(Tone::Friendly),
];

pub const HISTORY_LIMIT: usize = 20;

/// How long the "Copied!" confirmation stays up.
pub const COPIED_DURATION: Duration = Duration::from_secs(2);

pub struct App {
    pub should_quit: bool,
    pub config: Config,
    pub client: Option<GenerationClient>,
    pub layout: LayoutState,
    pub editor: EmailEditor,
    pub keybinds: Keybinds,
    pub focus: Focus,
    pub tone: ToneSelection,
    pub tone_cursor: usize,
    pub reply: Option<String>,
    pub reply_scroll: u16,
    /// Opened on first copy; headless sessions may have none.
    pub clipboard: Option<Box<dyn ClipboardSink>>,
    pub copied_at: Option<Instant>,
    pub history: VecDeque<ReplyRecord>,
    pub is_loading: bool,
    pub loading_start_time: Option<Instant>,
    pub request_id: u64,
    pub show_help: bool,
    pub last_error: Option<ErrorReport>,
    pub show_error_details: bool,
    pub drag_target: Option<DragTarget>,
    pub last_mouse_pos: (u16, u16),
    pub app_async_tx: Option<mpsc::UnboundedSender<AppAsyncEvent>>,
    pub app_async_rx: Option<mpsc::UnboundedReceiver<AppAsyncEvent>>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl App {
    pub fn new(config: Config) -> Self {
        let (app_async_tx, app_async_rx) = mpsc::unbounded_channel();
        let tone = config.default_tone();
        let tone_cursor = TONE_CHOICES.iter().position(|t| *t == tone).unwrap_or(0);

        let mut app = Self {
            should_quit: false,
            client: None,
            layout: LayoutState::new(TONE_CHOICES.len()),
            editor: EmailEditor::new(),
            keybinds: Keybinds,
            focus: Focus::Compose,
            tone,
            tone_cursor,
            reply: None,
            reply_scroll: 0,
            clipboard: None,
            copied_at: None,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            is_loading: false,
            loading_start_time: None,
            request_id: 0,
            show_help: false,
            last_error: None,
            show_error_details: false,
            drag_target: None,
            last_mouse_pos: (0, 0),
            app_async_tx: Some(app_async_tx),
            app_async_rx: Some(app_async_rx),
            config,
        };

        match app.config.build_client() {
            Ok(client) => app.client = Some(client),
            Err(e) => app.report_error("Invalid API address", e),
        }
        app
    }
}
