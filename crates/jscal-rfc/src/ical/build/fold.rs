//! Content line folding (RFC 5545 §3.1).

/// Maximum line length in octets, excluding CRLF.
const MAX_LINE_OCTETS: usize = 75;

/// Folds a content line at 75 octets and terminates it with CRLF.
///
/// Continuation lines start with a single space, which counts towards
/// their limit. Multi-byte characters are never split.
#[must_use]
pub fn fold_line(line: &str) -> String {
    let mut result = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3 + 2);
    let mut used = 0;

    for c in line.chars() {
        let width = c.len_utf8();
        if used + width > MAX_LINE_OCTETS {
            result.push_str("\r\n ");
            used = 1;
        }
        result.push(c);
        used += width;
    }

    result.push_str("\r\n");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(folded: &str) -> Vec<&str> {
        folded.split("\r\n").filter(|s| !s.is_empty()).collect()
    }

    #[test]
    fn short_line_untouched() {
        assert_eq!(fold_line("SUMMARY:Short"), "SUMMARY:Short\r\n");
        let exact = "X".repeat(75);
        assert_eq!(fold_line(&exact), format!("{exact}\r\n"));
    }

    #[test]
    fn long_line_boundaries() {
        let line = "A".repeat(80);
        let folded = fold_line(&line);
        let parts = segments(&folded);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 75);
        assert_eq!(parts[1].len(), 6);
        assert_eq!(folded.replace("\r\n ", "").trim_end(), line);
    }

    #[test]
    fn never_splits_utf8() {
        let line = format!("{}日本語", "A".repeat(73));
        let folded = fold_line(&line);
        assert!(segments(&folded).iter().all(|s| s.len() <= 75));
        assert_eq!(folded.replace("\r\n ", "").trim_end(), line);
    }
}
