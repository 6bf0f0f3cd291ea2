//! Balanced line breaking for card labels.

/// Break `text` into lines of at most `max_width` characters.
///
/// The number of lines is fixed up front at `len / max_width + 1`, and each
/// whitespace-separated token goes into the first line that still has room
/// for it. Tokens are never split. A token that fits nowhere lands in the
/// last line when that line is still empty, otherwise it opens a new line
/// after it, so an overlong token always stands alone.
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let n_lines = text.chars().count() / max_width + 1;
    let mut lines: Vec<Vec<&str>> = vec![Vec::new(); n_lines];

    for token in text.split_whitespace() {
        let token_len = token.chars().count();
        let slot = lines
            .iter()
            .position(|line| joined_len(line) + separator(line) + token_len <= max_width);
        match slot {
            Some(idx) => lines[idx].push(token),
            None => match lines.last_mut() {
                Some(last) if last.is_empty() => last.push(token),
                _ => lines.push(vec![token]),
            },
        }
    }

    lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .map(|line| line.join(" "))
        .collect()
}

fn joined_len(line: &[&str]) -> usize {
    let chars: usize = line.iter().map(|t| t.chars().count()).sum();
    chars + line.len().saturating_sub(1)
}

fn separator(line: &[&str]) -> usize {
    if line.is_empty() { 0 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(wrap("", 24).is_empty());
        assert!(wrap("   ", 24).is_empty());
    }

    #[test]
    fn short_text_is_a_single_normalized_line() {
        assert_eq!(wrap("Daft  Punk", 24), vec!["Daft Punk"]);
        assert_eq!(wrap("exactly ten", 11), vec!["exactly ten"]);
    }

    #[test]
    fn long_text_is_spread_over_lines() {
        let lines = wrap("The Rise and Fall of Ziggy Stardust", 24);
        assert_eq!(lines, vec!["The Rise and Fall of", "Ziggy Stardust"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 24));
    }

    #[test]
    fn first_fit_backfills_earlier_lines() {
        // "ddd" still fits behind "aaaaaa" after the later lines opened.
        let lines = wrap("aaaaaa bbbbbb cccccc ddd", 10);
        assert_eq!(lines, vec!["aaaaaa ddd", "bbbbbb", "cccccc"]);
    }

    #[test]
    fn overlong_tokens_stay_whole_and_alone() {
        let lines = wrap("aaaaaaaaaaaa bbbbbbbbbbbb", 10);
        assert_eq!(lines, vec!["aaaaaaaaaaaa", "bbbbbbbbbbbb"]);
    }

    #[test]
    fn token_fitting_nowhere_opens_a_new_line() {
        // Three lines are planned; "ddddd" and "eeeee" fit none of them and
        // must not be crammed into the occupied last line.
        let lines = wrap("aaaaa bbbbb ccccc ddddd eeeee", 10);
        assert_eq!(lines, vec!["aaaaa", "bbbbb", "ccccc", "ddddd", "eeeee"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn lines_respect_width_unless_single_token() {
        let text = "Sgt. Pepper's Lonely Hearts Club Band (Remastered Supercalifragilistic)";
        for width in [5, 8, 12, 20, 24] {
            for line in wrap(text, width) {
                let fits = line.chars().count() <= width;
                assert!(fits || !line.contains(' '), "{line:?} at width {width}");
            }
        }
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(wrap("Motörhead Björk", 15), vec!["Motörhead Björk"]);
    }
}
