/// Strips byte-order marks and zero-width characters, then trims.
pub(crate) fn normalize_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

/// Keeps the text part of a Jira comment cell.
///
/// Exports write comments as `<timestamp> ; <author id> ; <text>`; anything
/// that does not have that shape is returned whole.
pub(crate) fn comment_text(raw: &str) -> String {
    let mut parts = raw.splitn(3, ';');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(_), Some(text)) => text.trim().to_string(),
        _ => raw.trim().to_string(),
    }
}

pub(crate) fn is_comment_header(header: &str) -> bool {
    match header.strip_prefix("Comment") {
        Some("") => true,
        Some(suffix) => suffix
            .strip_prefix('.')
            .is_some_and(|ordinal| !ordinal.is_empty() && ordinal.chars().all(|c| c.is_ascii_digit())),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_loses_bom_and_padding() {
        assert_eq!(normalize_header("\u{feff}Issue key "), "Issue key");
    }

    #[test]
    fn comment_text_takes_everything_after_second_separator() {
        assert_eq!(
            comment_text("24/Sep/25 10:00 AM ; 5b10ac8d ; Deployed; waiting on QA"),
            "Deployed; waiting on QA"
        );
        assert_eq!(comment_text("plain note"), "plain note");
        assert_eq!(comment_text("a;b"), "a;b");
    }

    #[test]
    fn recognises_repeated_and_numbered_comment_headers() {
        assert!(is_comment_header("Comment"));
        assert!(is_comment_header("Comment.3"));
        assert!(!is_comment_header("Comments"));
        assert!(!is_comment_header("Comment."));
        assert!(!is_comment_header("Comment.x"));
    }
}
