//! Shared utility functions.

/// Shorten `s` to at most `max_bytes` bytes for log output, cutting on a
/// UTF-8 boundary and marking the cut with `...`.
pub fn preview(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Join the first `max_items` entries of `items`, noting how many were left out.
pub fn preview_list<S: AsRef<str>>(items: &[S], max_items: usize) -> String {
    let shown: Vec<&str> = items.iter().take(max_items).map(AsRef::as_ref).collect();
    let mut out = shown.join(", ");
    if items.len() > max_items {
        out.push_str(&format!(" (+{} more)", items.len() - max_items));
    }
    out
}
