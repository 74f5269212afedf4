/// Typographic characters PDF extraction commonly yields, with their ASCII stand-ins.
const REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2013}', "-"),   // en dash
    ('\u{2014}', "-"),   // em dash
    ('\u{2018}', "'"),   // left single quotation mark
    ('\u{2019}', "'"),   // right single quotation mark
    ('\u{201C}', "\""),  // left double quotation mark
    ('\u{201D}', "\""),  // right double quotation mark
    ('\u{2026}', "..."), // ellipsis
];

/// Clean extracted page text.
///
/// Whitespace runs (newlines and tabs included) collapse to a single space and
/// the ends are trimmed, then the typographic punctuation in [`REPLACEMENTS`]
/// is mapped to ASCII. Nothing else is touched. The result is stable under a
/// second application.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split(is_separator_space).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        for ch in word.chars() {
            match replacement(ch) {
                Some(ascii) => out.push_str(ascii),
                None => out.push(ch),
            }
        }
    }
    out
}

/// Length of a string in characters, the unit chunk sizes and counts use.
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn replacement(ch: char) -> Option<&'static str> {
    REPLACEMENTS
        .iter()
        .find(|(from, _)| *from == ch)
        .map(|(_, to)| *to)
}

// Unicode White_Space plus the ASCII file/group/record/unit separators.
fn is_separator_space(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '\u{1C}'..='\u{1F}')
}
