//! Character cursor over a command's argument body.
//!
//! The scanner never moves backwards, so [`Scanner::position`] at the time
//! of an error always names the character the parser stopped at.

use crate::error::ValueError;

/// Characters that open (and close) a quoted value.
pub const QUOTES: [char; 3] = ['"', '\'', '`'];

const ESCAPE: char = '\\';
const SEPARATOR: char = ' ';

/// Forward-only cursor over an immutable input string.
///
/// # Examples
///
/// ```
/// use chat_command_parser::Scanner;
///
/// let mut scanner = Scanner::new(r#""multi word" next"#);
/// assert_eq!(scanner.read_quoted_or_word().unwrap(), "multi word");
/// scanner.skip_spaces();
/// assert_eq!(scanner.position(), 13);
/// assert_eq!(scanner.read_word(), "next");
/// assert!(scanner.is_end());
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    /// Byte offset into `input`.
    offset: usize,
    /// Characters consumed so far.
    position: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the first character of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            position: 0,
        }
    }

    /// Returns `true` once every character has been consumed.
    pub fn is_end(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Returns the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.input[self.offset..].chars().next()
    }

    /// Consumes and returns the next character, or `None` at end of input.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        self.position += 1;
        Some(ch)
    }

    /// Zero-based count of characters consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    /// Consumes a run of separator spaces.
    pub fn skip_spaces(&mut self) {
        while self.peek() == Some(SEPARATOR) {
            self.advance();
        }
    }

    /// Reads up to the next unescaped space or the end of input.
    ///
    /// The delimiting space is consumed but not returned. A backslash
    /// directly before a space keeps the space in the word and is dropped;
    /// every other backslash is kept as typed. The result may be empty.
    pub fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(ch) = self.advance() {
            match ch {
                SEPARATOR => break,
                ESCAPE if self.peek() == Some(SEPARATOR) => {
                    self.advance();
                    word.push(SEPARATOR);
                }
                other => word.push(other),
            }
        }
        word
    }

    /// Reads a quoted string if the next character is a quote, otherwise a
    /// word.
    ///
    /// Inside quotes a backslash escapes the next character (including the
    /// quote itself) and is dropped. Running out of input before the closing
    /// quote fails with [`ValueError::UnterminatedQuote`].
    pub fn read_quoted_or_word(&mut self) -> Result<String, ValueError> {
        let Some(delim) = self.peek().filter(|ch| QUOTES.contains(ch)) else {
            return Ok(self.read_word());
        };
        self.advance();

        let mut result = String::new();
        loop {
            match self.advance() {
                None => return Err(ValueError::UnterminatedQuote),
                Some(ch) if ch == delim => return Ok(result),
                Some(ESCAPE) => match self.advance() {
                    Some(escaped) => result.push(escaped),
                    None => return Err(ValueError::UnterminatedQuote),
                },
                Some(ch) => result.push(ch),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_advance() {
        let mut scanner = Scanner::new("ab");
        assert_eq!(scanner.peek(), Some('a'));
        assert_eq!(scanner.advance(), Some('a'));
        assert_eq!(scanner.advance(), Some('b'));
        assert!(scanner.is_end());
        assert_eq!(scanner.peek(), None);
        assert_eq!(scanner.advance(), None);
        assert_eq!(scanner.position(), 2);
    }

    #[test]
    fn test_empty_input_is_end() {
        let scanner = Scanner::new("");
        assert!(scanner.is_end());
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_read_word_consumes_delimiter() {
        let mut scanner = Scanner::new("hello world");
        assert_eq!(scanner.read_word(), "hello");
        assert_eq!(scanner.position(), 6);
        assert_eq!(scanner.rest(), "world");
        assert_eq!(scanner.read_word(), "world");
        assert!(scanner.is_end());
    }

    #[test]
    fn test_read_word_empty_on_consecutive_spaces() {
        let mut scanner = Scanner::new("a  b");
        assert_eq!(scanner.read_word(), "a");
        assert_eq!(scanner.read_word(), "");
        assert_eq!(scanner.read_word(), "b");
    }

    #[test]
    fn test_read_word_escaped_space() {
        let mut scanner = Scanner::new(r"hello\ world next");
        assert_eq!(scanner.read_word(), "hello world");
        assert_eq!(scanner.position(), 13);
        assert_eq!(scanner.read_word(), "next");
    }

    #[test]
    fn test_read_word_keeps_other_backslashes() {
        for word in [r"C:\Users\me", r"¯\_(ツ)_/¯", r"\n", r"a\\b"] {
            let mut scanner = Scanner::new(word);
            assert_eq!(scanner.read_word(), word);
            assert!(scanner.is_end());
        }
    }

    #[test]
    fn test_read_word_keeps_trailing_backslash() {
        let mut scanner = Scanner::new(r"path\");
        assert_eq!(scanner.read_word(), r"path\");
    }

    #[test]
    fn test_read_quoted_each_quote_style() {
        for quoted in [r#""a b""#, "'a b'", "`a b`"] {
            let mut scanner = Scanner::new(quoted);
            assert_eq!(scanner.read_quoted_or_word().unwrap(), "a b");
            assert!(scanner.is_end());
        }
    }

    #[test]
    fn test_read_quoted_other_quotes_are_literal() {
        let mut scanner = Scanner::new(r#""it's `fine`""#);
        assert_eq!(scanner.read_quoted_or_word().unwrap(), "it's `fine`");
    }

    #[test]
    fn test_read_quoted_escapes() {
        let mut scanner = Scanner::new(r#""say \"hi\" \\o/""#);
        assert_eq!(scanner.read_quoted_or_word().unwrap(), r#"say "hi" \o/"#);
    }

    #[test]
    fn test_read_quoted_leaves_following_text() {
        let mut scanner = Scanner::new(r#""abc" -u"#);
        assert_eq!(scanner.read_quoted_or_word().unwrap(), "abc");
        assert_eq!(scanner.rest(), " -u");
    }

    #[test]
    fn test_read_quoted_unterminated() {
        let mut scanner = Scanner::new("\"hello");
        assert_eq!(
            scanner.read_quoted_or_word(),
            Err(ValueError::UnterminatedQuote)
        );
        assert!(scanner.is_end());
    }

    #[test]
    fn test_read_quoted_escaped_closing_quote_is_unterminated() {
        let mut scanner = Scanner::new(r#""abc\""#);
        assert_eq!(
            scanner.read_quoted_or_word(),
            Err(ValueError::UnterminatedQuote)
        );
    }

    #[test]
    fn test_read_quoted_empty_string() {
        let mut scanner = Scanner::new("''");
        assert_eq!(scanner.read_quoted_or_word().unwrap(), "");
    }

    #[test]
    fn test_read_quoted_falls_back_to_word() {
        let mut scanner = Scanner::new("plain text");
        assert_eq!(scanner.read_quoted_or_word().unwrap(), "plain");
    }

    #[test]
    fn test_position_counts_characters() {
        let mut scanner = Scanner::new("héllo x");
        scanner.read_word();
        assert_eq!(scanner.position(), 6);
        assert_eq!(scanner.peek(), Some('x'));
    }

    #[test]
    fn test_escape_round_trip() {
        let originals = ["plain", r#"with "quotes""#, r"back\slash", r#"mixed \" both"#];
        for original in originals {
            let encoded: String = original
                .chars()
                .flat_map(|ch| match ch {
                    '"' | '\\' => vec!['\\', ch],
                    other => vec![other],
                })
                .collect();
            let input = format!("\"{encoded}\"");
            let mut scanner = Scanner::new(&input);
            assert_eq!(scanner.read_quoted_or_word().unwrap(), original);
        }
    }
}
