//! Label text helpers.
//!
//! Node labels and the diagram caption are emitted as Graphviz HTML-like
//! labels, so user text must be escaped and line breaks are `<br/>` elements.

/// Words per line in node labels.
pub const NODE_WORDS_PER_LINE: usize = 3;

/// Words per line in the diagram caption.
pub const CAPTION_WORDS_PER_LINE: usize = 10;

/// Line break element used inside HTML-like labels.
pub const LINE_BREAK: &str = "<br/>";

/// Escapes text for use inside an HTML-like label.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Joins the words of `text` with soft line breaks.
///
/// A break follows the word at index `i` when `i % words_per_line == 0`,
/// except after the very first word when `words_per_line > 5`. Breaks only
/// ever sit between two words. Words are HTML-escaped.
///
/// ```
/// # use annograph_core::text::wrap_words;
/// assert_eq!(wrap_words("a b c d e", 3), "a<br/>b c d<br/>e");
/// assert_eq!(wrap_words("one", 3), "one");
/// ```
pub fn wrap_words(text: &str, words_per_line: usize) -> String {
    let mut wrapped = String::with_capacity(text.len());
    let mut words = text.split_whitespace().enumerate().peekable();

    while let Some((index, word)) = words.next() {
        wrapped.push_str(&escape_html(word));
        if words.peek().is_none() {
            break;
        }
        let is_break = words_per_line > 0
            && index % words_per_line == 0
            && !(index == 0 && words_per_line > 5);
        wrapped.push_str(if is_break { LINE_BREAK } else { " " });
    }

    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c > \"d\""), "a &lt; b &amp; c &gt; &quot;d&quot;");
        assert_eq!(escape_html("сервер"), "сервер");
    }

    #[test]
    fn test_wrap_node_label() {
        assert_eq!(wrap_words("блок питания", 3), "блок<br/>питания");
        assert_eq!(
            wrap_words("a b c d e f g h", 3),
            "a<br/>b c d<br/>e f g<br/>h"
        );
    }

    #[test]
    fn test_wrap_caption_skips_first_break() {
        let text = (0..12).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        assert_eq!(
            wrap_words(&text, 10),
            "w0 w1 w2 w3 w4 w5 w6 w7 w8 w9 w10<br/>w11"
        );
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        assert_eq!(wrap_words("  a \n b  ", 10), "a b");
        assert_eq!(wrap_words("", 3), "");
    }

    #[test]
    fn test_wrap_zero_never_breaks() {
        assert_eq!(wrap_words("a b c", 0), "a b c");
    }

    #[test]
    fn test_wrap_escapes_words() {
        assert_eq!(wrap_words("R&D <lab>", 10), "R&amp;D &lt;lab&gt;");
    }
}
