/// Multi-line text buffer for the email being replied to. The cursor is a
/// char index, so multi-byte text never splits.
#[derive(Debug, Default, Clone)]
pub struct EmailEditor {
    buffer: String,
    cursor: usize,
}

impl EmailEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn newline(&mut self) {
        self.handle_char('\n');
    }

    /// Pasted text arrives in one piece; terminals send `\r` for line breaks.
    pub fn insert_str(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let at = self.byte_offset(self.cursor);
        self.buffer.insert_str(at, &normalized);
        self.cursor += normalized.chars().count();
    }

    pub fn handle_backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.buffer.remove(at);
    }

    pub fn handle_delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.buffer.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_line_start(&mut self) {
        let (_, col) = self.cursor_line_col();
        self.cursor -= col;
    }

    pub fn move_line_end(&mut self) {
        let rest = self.buffer.chars().skip(self.cursor).take_while(|&c| c != '\n');
        self.cursor += rest.count();
    }

    pub fn move_up(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line > 0 {
            self.cursor = self.index_of(line - 1, col);
        }
    }

    pub fn move_down(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line + 1 < self.buffer.split('\n').count() {
            self.cursor = self.index_of(line + 1, col);
        }
    }

    /// Zero-based line and column of the cursor.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for c in self.buffer.chars().take(self.cursor) {
            if c == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    fn index_of(&self, line: usize, col: usize) -> usize {
        let mut idx = 0;
        for (n, text) in self.buffer.split('\n').enumerate() {
            let len = text.chars().count();
            if n == line {
                return idx + col.min(len);
            }
            idx += len + 1;
        }
        self.char_len()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}
