//! Input preprocessing utilities

/// Join lines ending with a backslash.
///
/// Each joined line leaves an empty line behind, so line numbers in parse
/// errors still match the file on disk.
pub(super) fn preprocess_escaped_newlines(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut buffer = String::new();
    let mut swallowed = 0usize;

    for line in input.lines() {
        let trimmed = line.trim_end();
        if let Some(stripped) = trimmed.strip_suffix('\\') {
            buffer.push_str(stripped);
            buffer.push(' ');
            swallowed += 1;
        } else {
            buffer.push_str(trimmed);
            result.push_str(buffer.trim_end());
            result.push('\n');
            for _ in 0..swallowed {
                result.push('\n');
            }
            buffer.clear();
            swallowed = 0;
        }
    }
    if !buffer.is_empty() {
        result.push_str(buffer.trim_end());
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_continued_lines() {
        assert_eq!(
            preprocess_escaped_newlines("echo a \\\n  b\necho c"),
            "echo a    b\n\necho c\n"
        );
    }

    #[test]
    fn test_dangling_backslash_at_end() {
        assert_eq!(preprocess_escaped_newlines("echo a \\"), "echo a\n");
    }

    #[test]
    fn test_line_count_preserved() {
        let input = "a \\\nb \\\nc\nd";
        assert_eq!(preprocess_escaped_newlines(input).lines().count(), 4);
    }
}
