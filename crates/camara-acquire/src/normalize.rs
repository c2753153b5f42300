use unicode_normalization::UnicodeNormalization;

/// NFC form, trimmed, with no trailing whitespace on any line.
///
/// The API mixes precomposed and decomposed accents (`ç`, `ã`, `é`), which
/// otherwise render inconsistently and break substring checks such as the
/// "Deputada" author test.
pub fn normalize_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();
    nfc.trim()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cleanup for free-text fields such as `ementa`: [`normalize_text`], and
/// at most one blank line between paragraphs.
pub fn clean_field(input: &str) -> String {
    let normalized = normalize_text(input);
    let mut kept: Vec<&str> = Vec::new();

    for line in normalized.lines() {
        if line.is_empty() && kept.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        kept.push(line);
    }

    kept.join("\n")
}
