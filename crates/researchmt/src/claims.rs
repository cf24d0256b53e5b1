//! Splits an engine's free-text answer into discrete claims.

/// Below this many non-empty lines the answer is treated as prose.
const MIN_BULLET_LINES: usize = 3;

const BULLET_MARKERS: [char; 4] = ['-', '*', '•', '+'];

/// Extract claims from an engine response.
///
/// Bulleted answers yield one claim per non-empty line. When fewer than
/// three lines remain the whole text is split into sentences instead.
pub fn extract_claims(text: &str) -> Vec<String> {
    let lines: Vec<String> = text.lines().filter_map(clean_fragment).collect();
    if lines.len() >= MIN_BULLET_LINES {
        return lines;
    }

    split_sentences(text)
        .into_iter()
        .filter_map(clean_fragment)
        .collect()
}

/// Trim and strip one leading bullet marker. `None` for empty fragments.
fn clean_fragment(fragment: &str) -> Option<String> {
    let trimmed = fragment.trim();
    let mut chars = trimmed.chars();
    let stripped = match (chars.next(), chars.next()) {
        (Some(marker), Some(next)) if BULLET_MARKERS.contains(&marker) && next.is_whitespace() => {
            chars.as_str().trim()
        }
        (Some(marker), None) if BULLET_MARKERS.contains(&marker) => "",
        _ => trimmed,
    };
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Split after `.`, `!` or `?` when followed by whitespace. The terminator
/// stays with its sentence and the whitespace run is dropped.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(next_idx, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }
        sentences.push(&text[start..idx + c.len_utf8()]);
        start = next_idx;
        while let Some(&(ws_idx, ws)) = chars.peek() {
            if !ws.is_whitespace() {
                break;
            }
            chars.next();
            start = ws_idx + ws.len_utf8();
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulleted_lines_become_claims() {
        let text = "- Adoption is growing\n* Costs are falling\n\n• Regulation lags\n+ Talent is scarce";
        assert_eq!(
            extract_claims(text),
            vec![
                "Adoption is growing",
                "Costs are falling",
                "Regulation lags",
                "Talent is scarce"
            ]
        );
    }

    #[test]
    fn crlf_and_indented_markers_are_handled() {
        let text = "  - one claim here\r\n\t* two claim here \r\n-three stays dashed\r\n";
        assert_eq!(
            extract_claims(text),
            vec!["one claim here", "two claim here", "-three stays dashed"]
        );
    }

    #[test]
    fn two_bullet_lines_fall_back_to_sentences() {
        let text = "- Growth is strong. Margins improved!\n- Costs fell? Hiring slowed.";
        let claims = extract_claims(text);
        assert!(claims.len() >= 3);
        assert_eq!(
            claims,
            vec![
                "Growth is strong.",
                "Margins improved!",
                "Costs fell?",
                "Hiring slowed."
            ]
        );
    }

    #[test]
    fn only_leading_markers_are_stripped_from_sentences() {
        let text = "Costs fell - sharply in 2024. Demand - however - rose. - Supply lagged.";
        assert_eq!(
            extract_claims(text),
            vec!["Costs fell - sharply in 2024.", "Demand - however - rose.", "Supply lagged."]
        );
    }

    #[test]
    fn prose_paragraph_splits_into_sentences() {
        let text = "Solar is cheap. Storage is improving. Grids need upgrades. Policy is mixed.";
        let claims = extract_claims(text);
        assert_eq!(claims.len(), 4);
        assert_eq!(claims[3], "Policy is mixed.");
    }

    #[test]
    fn terminators_without_following_space_do_not_split() {
        let claims = extract_claims("Version 2.5 shipped. It costs $3.99 a month");
        assert_eq!(claims, vec!["Version 2.5 shipped.", "It costs $3.99 a month"]);
    }

    #[test]
    fn empty_text_has_no_claims() {
        assert!(extract_claims("").is_empty());
        assert!(extract_claims("  \n\n - \n").is_empty());
    }
}
