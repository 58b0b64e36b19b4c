use retroscene_frame::TextSource;

/// Fixed text, shown as-is every frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticText(pub String);

impl TextSource for StaticText {
    fn current_text(&mut self, _time: f64) -> String {
        self.0.clone()
    }
}

const PROMPT: &str = "> ";
const CURSOR: char = '_';
/// Cursor toggles this many times per second.
const BLINK_RATE: f64 = 2.0;

/// A tiny terminal: banner, scrollback of entered lines, and an input line
/// with a blinking cursor.
#[derive(Debug, Clone)]
pub struct TerminalText {
    banner: Vec<String>,
    history: Vec<String>,
    input: String,
    max_lines: usize,
}

impl TerminalText {
    pub const DEFAULT_MAX_LINES: usize = 24;

    pub fn new(banner: Vec<String>) -> Self {
        Self {
            banner,
            history: Vec::new(),
            input: String::new(),
            max_lines: Self::DEFAULT_MAX_LINES,
        }
    }

    /// Total visible lines, banner and input line included.
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines.max(1);
        self
    }

    /// Control characters are ignored.
    pub fn push_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.input.push(ch);
        }
    }

    pub fn push_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.push_char(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Commit the input line to the scrollback.
    pub fn newline(&mut self) {
        let line = format!("{PROMPT}{}", std::mem::take(&mut self.input));
        self.history.push(line);
        let excess = self.history.len().saturating_sub(self.max_lines);
        self.history.drain(..excess);
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor_visible(time: f64) -> bool {
        (time * BLINK_RATE).rem_euclid(2.0) < 1.0
    }

    fn render(&self, cursor: bool) -> String {
        let input_line = format!(
            "{PROMPT}{}{}",
            self.input,
            if cursor { CURSOR } else { ' ' }
        );
        let mut lines: Vec<&str> = self.banner.iter().map(String::as_str).collect();
        lines.extend(self.history.iter().map(String::as_str));
        lines.push(&input_line);

        let skip = lines.len().saturating_sub(self.max_lines);
        lines[skip..].join("\n")
    }
}

impl TextSource for TerminalText {
    fn current_text(&mut self, time: f64) -> String {
        self.render(Self::cursor_visible(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal() -> TerminalText {
        TerminalText::new(vec!["BOOT OK".into(), "READY.".into()])
    }

    #[test]
    fn static_text_ignores_time() {
        let mut text = StaticText("HELLO".into());
        assert_eq!(text.current_text(0.0), text.current_text(99.0));
    }

    #[test]
    fn banner_then_prompt() {
        let mut term = terminal();
        assert_eq!(term.current_text(0.0), "BOOT OK\nREADY.\n> _");
    }

    #[test]
    fn cursor_blinks_twice_per_second() {
        assert!(TerminalText::cursor_visible(0.0));
        assert!(TerminalText::cursor_visible(0.4));
        assert!(!TerminalText::cursor_visible(0.6));
        assert!(TerminalText::cursor_visible(1.1));
        let mut term = terminal();
        assert!(term.current_text(0.75).ends_with(">  "));
    }

    #[test]
    fn typing_and_backspace_edit_input() {
        let mut term = terminal();
        term.push_str("LIST");
        term.backspace();
        term.push_char('\u{8}');
        assert_eq!(term.input(), "LIS");
        assert!(term.current_text(0.0).ends_with("> LIS_"));
    }

    #[test]
    fn newline_moves_input_to_history() {
        let mut term = terminal();
        term.push_str("RUN");
        term.newline();
        assert_eq!(term.input(), "");
        assert_eq!(term.current_text(0.0), "BOOT OK\nREADY.\n> RUN\n> _");
    }

    #[test]
    fn scrollback_keeps_last_lines() {
        let mut term = terminal().with_max_lines(3);
        for i in 0..5 {
            term.push_str(&i.to_string());
            term.newline();
        }
        assert_eq!(term.current_text(0.0), "> 3\n> 4\n> _");
    }

    #[test]
    fn terminal_works_as_trait_object() {
        let mut source: Box<dyn TextSource> = Box::new(terminal());
        assert!(source.current_text(0.0).contains("READY."));
    }
}
