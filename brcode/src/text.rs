use unicode_normalization::UnicodeNormalization;

const COMBINING_DIACRITICS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Decomposes `s` (NFD) and drops the combining diacritical marks, so
/// "José" becomes "Jose".
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !COMBINING_DIACRITICS.contains(c)).collect()
}

/// First `max` characters of `s`.
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

pub fn sanitize(s: &str, max: usize) -> String {
    truncate(&strip_diacritics(s), max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_portuguese_accents() {
        assert_eq!(strip_diacritics("José"), "Jose");
        assert_eq!(strip_diacritics("São João"), "Sao Joao");
        assert_eq!(strip_diacritics("Conceição Araújo"), "Conceicao Araujo");
        assert_eq!(strip_diacritics("Ânglo Ü"), "Anglo U");
    }

    #[test]
    fn keeps_characters_without_decomposition() {
        assert_eq!(strip_diacritics("Ørsted"), "Ørsted");
        assert_eq!(strip_diacritics("Maria Doula"), "Maria Doula");
    }

    #[test]
    fn truncates_after_stripping() {
        // "ã" is two scalars after NFD; stripping happens before counting
        assert_eq!(sanitize("Ãaaaa", 3), "Aaa");
        assert_eq!(sanitize("Sao Paulo", 15), "Sao Paulo");
        assert_eq!(sanitize("São José dos Campos", 15), "Sao Jose dos Ca");
    }
}
