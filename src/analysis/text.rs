//! Text shape helpers shared by the heuristics.

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of uppercase letters.
pub fn uppercase_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_uppercase()).count()
}

/// Number of lowercase letters.
pub fn lowercase_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_lowercase()).count()
}

/// Number of numeric characters.
pub fn digit_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_numeric()).count()
}

/// Length in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// True when the text has cased letters and none of them are lowercase.
pub fn is_all_caps(text: &str) -> bool {
    text.chars().any(|c| c.is_uppercase()) && !text.chars().any(|c| c.is_lowercase())
}

/// True when the first character is a lowercase letter.
pub fn starts_lowercase(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_lowercase())
}

/// True when the text ends with a period.
pub fn ends_with_period(text: &str) -> bool {
    text.ends_with('.')
}

/// True when the text ends with terminal punctuation that closes a heading.
pub fn ends_with_terminal(text: &str) -> bool {
    text.trim_end().ends_with(&['.', '!', '?', ':'][..])
}

/// True when more than half of the alphabetic characters are Latin letters.
pub fn is_latin(text: &str) -> bool {
    let mut alpha = 0usize;
    let mut latin = 0usize;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        alpha += 1;
        if is_latin_char(c) {
            latin += 1;
        }
    }
    alpha > 0 && latin > alpha / 2
}

/// Check if a letter belongs to the Latin script blocks.
fn is_latin_char(c: char) -> bool {
    let code = c as u32;

    c.is_ascii_alphabetic()
    // Latin-1 Supplement letters
    || ((0x00C0..=0x00FF).contains(&code) && code != 0x00D7 && code != 0x00F7)
    // Latin Extended-A and B
    || (0x0100..=0x024F).contains(&code)
    // IPA Extensions
    || (0x0250..=0x02AF).contains(&code)
    // Latin Extended Additional
    || (0x1E00..=0x1EFF).contains(&code)
    // Latin Extended-C, D, E
    || (0x2C60..=0x2C7F).contains(&code)
    || (0xA720..=0xA7FF).contains(&code)
    || (0xAB30..=0xAB6F).contains(&code)
    // Fullwidth Latin
    || (0xFF21..=0xFF3A).contains(&code)
    || (0xFF41..=0xFF5A).contains(&code)
}
