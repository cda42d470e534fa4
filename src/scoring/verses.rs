/// Expand a verse-range reference like `"Mt 6:9-13"` into one reference
/// per verse (`"Mt 6:9"` through `"Mt 6:13"`, inclusive).
///
/// Anything that does not look like a range comes back unchanged as a
/// one-element vector: a single-verse reference, a malformed string, or a
/// reversed range (start > end). Never fails.
pub fn expand_verse_range(reference: &str) -> Vec<String> {
    match parse_range(reference.trim()) {
        Some((book, chapter, start, end)) if start <= end => (start..=end)
            .map(|verse| format!("{} {}:{}", book, chapter, verse))
            .collect(),
        _ => vec![reference.to_string()],
    }
}

/// Split `"<book> <chapter>:<start>-<end>"` into its parts. The book name
/// may carry a leading numeral 1-3 ("1 Pedro") and accented letters.
fn parse_range(reference: &str) -> Option<(&str, u32, u32, u32)> {
    let (book, rest) = reference.rsplit_once(' ')?;
    let book = book.trim_end();
    if !is_book_name(book) {
        return None;
    }
    let (chapter, verses) = rest.split_once(':')?;
    let (start, end) = verses.split_once('-')?;
    Some((
        book,
        parse_number(chapter)?,
        parse_number(start)?,
        parse_number(end)?,
    ))
}

fn is_book_name(book: &str) -> bool {
    let mut chars = book.chars().peekable();
    if matches!(chars.peek(), Some('1'..='3')) {
        chars.next();
        if chars.peek() == Some(&' ') {
            chars.next();
        }
    }
    let mut seen_letter = false;
    for c in chars {
        if !c.is_alphabetic() {
            return false;
        }
        seen_letter = true;
    }
    seen_letter
}

/// Strict digit parse: rejects the signs and surrounding whitespace that
/// `str::parse` would accept.
fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_range() {
        assert_eq!(
            expand_verse_range("Mt 6:9-13"),
            vec!["Mt 6:9", "Mt 6:10", "Mt 6:11", "Mt 6:12", "Mt 6:13"]
        );
    }

    #[test]
    fn test_single_verse_unchanged() {
        assert_eq!(expand_verse_range("Jo 3:16"), vec!["Jo 3:16"]);
    }

    #[test]
    fn test_reversed_range_unchanged() {
        assert_eq!(expand_verse_range("Mt 6:13-9"), vec!["Mt 6:13-9"]);
    }

    #[test]
    fn test_single_element_range() {
        assert_eq!(expand_verse_range("Sl 23:1-1"), vec!["Sl 23:1"]);
    }

    #[test]
    fn test_numbered_book() {
        assert_eq!(
            expand_verse_range("1 Pedro 3:1-2"),
            vec!["1 Pedro 3:1", "1 Pedro 3:2"]
        );
        assert_eq!(expand_verse_range("2Tm 1:7-8"), vec!["2Tm 1:7", "2Tm 1:8"]);
    }

    #[test]
    fn test_accented_book() {
        assert_eq!(
            expand_verse_range("João 3:16-17"),
            vec!["João 3:16", "João 3:17"]
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed_before_matching() {
        assert_eq!(
            expand_verse_range("  Mt 6:9-10  "),
            vec!["Mt 6:9", "Mt 6:10"]
        );
        // Non-range input comes back exactly as passed, whitespace included.
        assert_eq!(expand_verse_range(" Jo 3:16"), vec![" Jo 3:16"]);
    }

    #[test]
    fn test_malformed_inputs_unchanged() {
        for input in [
            "",
            "Mt",
            "Mt 6",
            "Mt 6:9-",
            "Mt 6:-13",
            "Mt :9-13",
            "6:9-13",
            "Mt 6:9-13-15",
            "Mt x:9-13",
            "4 Reis 1:1-2",
            "São João 3:16-17",
        ] {
            assert_eq!(expand_verse_range(input), vec![input.to_string()]);
        }
    }

    #[test]
    fn test_never_panics_on_odd_unicode() {
        for input in ["Mt 6:9–13", "Mt\u{a0}6:9-13", "✝ 1:1-2"] {
            let expanded = expand_verse_range(input);
            assert_eq!(expanded, vec![input.to_string()]);
        }
    }
}
