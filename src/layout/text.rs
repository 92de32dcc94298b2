/// Estimated rendered line count of `text` at `chars_per_line` characters per line.
/// Blank text occupies no lines.
pub(crate) fn estimate_line_count(text: &str, chars_per_line: usize) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    split_lines(text)
        .iter()
        .map(|line| wrap_line(line, chars_per_line).len())
        .sum()
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    let current = text
        .replace("<br/>", "\n")
        .replace("<br>", "\n")
        .replace("\\n", "\n");
    current
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

/// Greedy word wrap by character count. Words longer than a line are split.
pub(crate) fn wrap_line(line: &str, chars_per_line: usize) -> Vec<String> {
    let limit = chars_per_line.max(1);
    if line.chars().count() <= limit {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let current_len = current.chars().count();
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len <= limit {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }
        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(limit).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current = piece;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_handles_br_tags() {
        assert_eq!(split_lines("a<br/>b"), vec!["a", "b"]);
        assert_eq!(split_lines("a<br>b"), vec!["a", "b"]);
        assert_eq!(split_lines("a\\nb"), vec!["a", "b"]);
    }

    #[test]
    fn split_lines_trims_whitespace() {
        assert_eq!(split_lines("  hello  \n  world  "), vec!["hello", "world"]);
    }

    #[test]
    fn wrap_line_does_not_wrap_short_text() {
        assert_eq!(wrap_line("short", 90), vec!["short"]);
    }

    #[test]
    fn wrap_line_breaks_on_words() {
        let result = wrap_line("the quick brown fox jumps", 10);
        assert_eq!(result, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn wrap_line_splits_overlong_words() {
        let result = wrap_line("abcdefghijkl xy", 5);
        assert_eq!(result, vec!["abcde", "fghij", "kl xy"]);
    }

    #[test]
    fn blank_description_has_no_lines() {
        assert_eq!(estimate_line_count("", 90), 0);
        assert_eq!(estimate_line_count("   ", 90), 0);
    }

    #[test]
    fn line_count_grows_with_text() {
        let short = estimate_line_count("Hub and spoke network", 90);
        let long = estimate_line_count(&"Hub and spoke network ".repeat(20), 90);
        assert_eq!(short, 1);
        assert!(long >= 5, "expected at least five lines, got {long}");
        assert_eq!(estimate_line_count("one\ntwo", 90), 2);
    }
}
