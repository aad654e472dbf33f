/// Line-break marker used inside markdown table cells.
pub const LINE_BREAK: &str = "<br />";

/// Make an evidence message safe for a single markdown table cell.
///
/// Angle brackets become `_`, and every line ending (`\n`, `\r\n` or a bare
/// `\r`) becomes one [`LINE_BREAK`]. Already-sanitized text is returned
/// unchanged, so a literal `<br />` in the input is kept as a line break.
pub fn sanitize_message(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix(LINE_BREAK) {
            out.push_str(LINE_BREAK);
            rest = tail;
            continue;
        }

        let mut chars = rest.chars();
        let Some(c) = chars.next() else { break };
        match c {
            '<' | '>' => out.push('_'),
            '\r' => {
                out.push_str(LINE_BREAK);
                if chars.as_str().starts_with('\n') {
                    chars.next();
                }
            }
            '\n' => out.push_str(LINE_BREAK),
            other => out.push(other),
        }
        rest = chars.as_str();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_angle_brackets() {
        assert_eq!(sanitize_message("Vec<u8> -> ok"), "Vec_u8_ -_ ok");
    }

    #[test]
    fn newlines_become_markers() {
        assert_eq!(sanitize_message("a\nb"), "a<br />b");
        assert_eq!(sanitize_message("a\r\nb"), "a<br />b");
        assert_eq!(sanitize_message("a\n\nb"), "a<br /><br />b");
    }

    #[test]
    fn is_idempotent() {
        let once = sanitize_message("<tag>\nline");
        assert_eq!(once, "_tag_<br />line");
        assert_eq!(sanitize_message(&once), once);
    }

    #[test]
    fn literal_line_break_marker_is_kept() {
        assert_eq!(sanitize_message("<br />alert"), "<br />alert");
        assert_eq!(sanitize_message("<br/>alert"), "_br/_alert");
        assert_eq!(sanitize_message("<br />\n<script>"), "<br /><br />_script_");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(sanitize_message("Found 3 tests"), "Found 3 tests");
        assert_eq!(sanitize_message(""), "");
    }
}
