//! Shared blank handling and fixed-width wrapping.
//!
//! Model collections store blanks freely (placeholder rows in a form). Every
//! consumer that decides what is "filled in" goes through [`is_blank`] so the
//! registry, the document renderer, and the tabular exporter agree.

/// Returns `true` when `s` is empty or whitespace only.
#[must_use]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Iterate the non-blank entries of `items`, keeping their original index.
pub fn non_blank<'a, I, S>(items: I) -> impl Iterator<Item = (usize, &'a str)>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + 'a + ?Sized,
{
    items
        .into_iter()
        .map(<S as AsRef<str>>::as_ref)
        .enumerate()
        .filter(|(_, s)| !is_blank(s))
}

/// Wrap `text` into lines of at most `width` characters.
///
/// Words longer than `width` are split hard. Explicit newlines are kept as
/// paragraph breaks. Always returns at least one line so callers can size
/// blocks for empty values.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word: &str = word;
            let mut word_len = word.chars().count();

            while word_len > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let split_at = word
                    .char_indices()
                    .nth(width)
                    .map_or(word.len(), |(idx, _)| idx);
                lines.push(word[..split_at].to_string());
                word = &word[split_at..];
                word_len -= width;
            }

            if word_len == 0 {
                continue;
            }

            if current_len == 0 {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                current_len = word_len;
            }
        }

        if current_len > 0 || paragraph.trim().is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   \t\n"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn non_blank_keeps_indices() {
        let items = vec![String::new(), "a".to_string(), "  ".to_string(), "b".to_string()];
        let kept: Vec<_> = non_blank(&items).collect();
        assert_eq!(kept, vec![(1, "a"), (3, "b")]);
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(
            lines,
            vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn wrap_splits_long_words() {
        let lines = wrap("abcdefghijkl xy", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "kl xy"]);
    }

    #[test]
    fn wrap_counts_chars_not_bytes() {
        let lines = wrap("Mesin → kondisi", 7);
        assert_eq!(lines, vec!["Mesin →", "kondisi"]);
    }

    #[test]
    fn wrap_keeps_paragraph_breaks() {
        let lines = wrap("one\n\ntwo", 20);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn wrap_empty_yields_one_line() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }
}
