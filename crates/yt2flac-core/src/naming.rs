//! Filename sanitization and size formatting

/// Sanitize a track title for use as a filename.
///
/// Characters that are unsafe on common filesystems are replaced with `_`,
/// runs of `_` are collapsed, and leading/trailing `_` and `.` are trimmed.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_underscore = false;

    for c in name.trim().chars() {
        let mapped = match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            other => other,
        };
        if mapped == '_' {
            if !last_was_underscore {
                out.push('_');
            }
            last_was_underscore = true;
        } else {
            out.push(mapped);
            last_was_underscore = false;
        }
    }

    out.trim_matches(|c| c == '_' || c == '.').to_string()
}

/// Human-readable byte size, for reporting.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TiB", size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_titles_pass_through() {
        assert_eq!(sanitize_filename("Normal Title"), "Normal Title");
        assert_eq!(sanitize_filename("  Spaces  "), "Spaces");
    }

    #[test]
    fn unsafe_characters_become_underscores() {
        assert_eq!(sanitize_filename("Title/With:Special*Chars"), "Title_With_Special_Chars");
        assert_eq!(sanitize_filename(r#"a<b>c"d\e|f"#), "a_b_c_d_e_f");
    }

    #[test]
    fn underscore_runs_collapse_and_edges_trim() {
        assert_eq!(sanitize_filename("what?!?"), "what_!");
        assert_eq!(sanitize_filename("?leading and trailing/"), "leading and trailing");
        assert_eq!(sanitize_filename("dots..."), "dots");
    }

    #[test]
    fn sizes_format_with_binary_units() {
        assert_eq!(human_size(512), "512.0 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MiB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0 GiB");
    }
}
