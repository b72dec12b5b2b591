/// Lowercases `title` and collapses every whitespace run into a single `_`.
///
/// Leading and trailing runs are kept, so `" Body type "` becomes `"_body_type_"`.
pub fn field_key_from_title(title: &str) -> String {
    let mut key = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                key.push('_');
            }
            in_whitespace = true;
        } else {
            key.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }
    key
}

/// One option per non-blank line, trimmed.
pub fn parse_option_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
