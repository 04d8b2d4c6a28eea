/// Appended to anything cut short.
pub const ELLIPSIS: &str = "...";

/// First `max_chars` characters of `text`, with [`ELLIPSIS`] appended only
/// when something was cut.
pub fn clip(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}{ELLIPSIS}", &text[..end]),
        None => text.to_string(),
    }
}

/// First `max_chars` characters of `text` followed by [`ELLIPSIS`], whether
/// or not anything was cut.
pub fn truncate_marked(text: &str, max_chars: usize) -> String {
    let end = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(i, _)| i);
    format!("{}{ELLIPSIS}", &text[..end])
}

/// Upper-cases the first letter of each whitespace-separated word.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("exactly10!", 10), "exactly10!");
        assert_eq!(clip("a longer sentence", 8), "a longer...");
        assert_eq!(clip("", 0), "");
    }

    #[test]
    fn test_clip_counts_chars_not_bytes() {
        assert_eq!(clip("café au lait", 4), "café...");
    }

    #[test]
    fn test_truncate_marked_always_appends() {
        assert_eq!(truncate_marked("short", 10), "short...");
        assert_eq!(truncate_marked("a longer sentence", 8), "a longer...");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("fire inspection  at clinic a"), "Fire Inspection At Clinic A");
        assert_eq!(title_case(""), "");
    }
}
