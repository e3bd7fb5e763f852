use std::path::Path;

/// Creates the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("create dir {} failed: {}", parent.display(), e);
            }
        }
    }
}

/// Trims a transcript and joins lines that were hard-wrapped.
///
/// A lone `\n` becomes a space; runs of two or more line breaks are kept as
/// paragraph breaks.
pub fn clean_text(s: &str) -> String {
    let s = s.replace("\r\n", "\n");
    let s = s.trim();
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == '\n' {
            let prev_break = i > 0 && chars[i - 1] == '\n';
            let next_break = chars.get(i + 1) == Some(&'\n');
            if !prev_break && !next_break {
                out.push(' ');
                continue;
            }
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_wrapped_lines() {
        assert_eq!(clean_text("  hello\nworld  \n"), "hello world");
    }

    #[test]
    fn keeps_paragraph_breaks() {
        assert_eq!(clean_text("one\ntwo\n\nthree\nfour"), "one two\n\nthree four");
        assert_eq!(clean_text("a\n\n\nb"), "a\n\n\nb");
    }

    #[test]
    fn handles_crlf_line_endings() {
        assert_eq!(clean_text("one\r\ntwo\r\n\r\nthree"), "one two\n\nthree");
    }

    #[test]
    fn ensure_parent_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a/b/c.log");
        ensure_parent_dir(&file);
        assert!(dir.path().join("a/b").is_dir());
        assert!(!file.exists());
    }
}
