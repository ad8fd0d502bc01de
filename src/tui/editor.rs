use crate::models::Splice;

/// Single text field with a character-offset cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.text
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len_chars());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len_chars();
    }

    pub fn apply(&mut self, splice: Splice) {
        self.text = splice.content;
        self.cursor = splice.cursor.min(self.len_chars());
    }

    /// Text with a visible caret at the cursor, for rendering.
    pub fn with_caret(&self, caret: char) -> String {
        let at = self.byte_index(self.cursor);
        let mut shown = String::with_capacity(self.text.len() + caret.len_utf8());
        shown.push_str(&self.text[..at]);
        shown.push(caret);
        shown.push_str(&self.text[at..]);
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> TextBuffer {
        let mut buffer = TextBuffer::default();
        s.chars().for_each(|c| buffer.insert(c));
        buffer
    }

    #[test]
    fn typing_in_the_middle() {
        let mut buffer = typed("AC");
        buffer.move_left();
        buffer.insert('B');
        assert_eq!(buffer.text(), "ABC");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn backspace_handles_multibyte() {
        let mut buffer = typed("naïve");
        buffer.move_left();
        buffer.move_left();
        buffer.backspace();
        assert_eq!(buffer.text(), "nave");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut buffer = typed("ab");
        buffer.move_right();
        assert_eq!(buffer.cursor(), 2);
        buffer.move_home();
        buffer.move_left();
        buffer.backspace();
        assert_eq!(buffer.cursor(), 0);
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn applying_a_splice_moves_cursor_after_markup() {
        let mut buffer = typed("AB");
        buffer.move_left();
        buffer.apply(crate::media::splice_image(buffer.text(), buffer.cursor(), "u"));
        buffer.insert('!');
        assert_eq!(buffer.text(), "A\n\n![Image](u)\n\n!B");
    }

    #[test]
    fn caret_rendering() {
        let mut buffer = typed("ab");
        buffer.move_left();
        assert_eq!(buffer.with_caret('|'), "a|b");
    }
}
