//! Small string helpers shared by the generators.

/// Python 風格的 title case："passive income" -> "Passive Income"
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Keeps at most `max` characters, never splitting a code point.
pub fn truncate_chars(input: &str, max: usize) -> &str {
    match input.char_indices().nth(max) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

pub fn word_count(input: &str) -> usize {
    input.split_whitespace().count()
}

/// 檔名用：空白換成底線、斜線換成連字號，並移除冒號與逗號
pub fn sanitize_topic(topic: &str) -> String {
    topic
        .replace(' ', "_")
        .replace('/', "-")
        .replace(':', "")
        .replace(',', "")
}
