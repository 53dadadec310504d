/// True when `term` occurs in `text` as a whole word or phrase: the
/// characters around the match are not alphanumeric. Both sides are expected
/// to be lowercase already.
pub fn contains_term(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    text.match_indices(term).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_whole_words_only() {
        assert!(contains_term("need an ios app", "ios"));
        assert!(!contains_term("test scenarios", "ios"));
        assert!(!contains_term("linux server", "ux"));
        assert!(contains_term("ui/ux review", "ux"));
    }

    #[test]
    fn test_matches_phrases_and_edges() {
        assert!(contains_term("landing page for a bakery", "landing page"));
        assert!(contains_term("react", "react"));
        assert!(contains_term("node.js backend", "node"));
        assert!(!contains_term("anything", ""));
    }

    #[test]
    fn test_later_occurrence_can_match() {
        assert!(contains_term("apple app", "app"));
    }
}
