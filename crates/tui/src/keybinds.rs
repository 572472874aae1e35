pub struct Keybinds;

impl Default for Keybinds {
    fn default() -> Self {
        Self
    }
}

impl Keybinds {
    pub fn help_text(&self) -> String {
        r#"Keyboard Shortcuts:

Compose:
  Type / paste  Edit the email you are replying to
  Enter         New line
  Arrows        Move the cursor
  Home / End    Start / end of line

Reply:
  Ctrl + S      Generate reply
  Ctrl + Y      Copy reply to clipboard
  Ctrl + R      Reset form
  Ctrl + T      Cycle tone

Panels:
  Tab           Next panel
  ↑ / ↓         Pick a tone / scroll the reply
  Enter         Apply highlighted tone

General:
  F1 or ?       Toggle this help (? outside the editor)
  F2 or E       Show latest error details
  Ctrl + Q      Quit

Mouse:
  Click         Focus a panel, pick a tone or a past reply
  Scroll        Scroll the reply
  Click + drag  Resize panels
"#
        .to_string()
    }
}
