//! Text cleanup applied to both extraction outputs before they leave the
//! pipeline.

/// Normalize an extracted text blob into a compact, stable form.
///
/// The transform is deterministic and idempotent: whitespace runs collapse
/// (runs spanning a line break fold into a single line break, everything
/// else into a single space), periods and commas gain a trailing space where
/// one is missing, and blank lines disappear. Empty input yields an empty
/// string.
pub fn normalize(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let spaced = space_after_punctuation(&collapsed);
    tidy_lines(&spaced)
}

/// Collapse every maximal whitespace run. A run containing at least one line
/// break becomes a single `\n` (so blank lines fold into one break); a run
/// without any becomes a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if !c.is_whitespace() {
            out.push(c);
            continue;
        }

        let mut saw_break = c == '\n';
        while let Some(&next) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            saw_break |= next == '\n';
            chars.next();
        }

        out.push(if saw_break { '\n' } else { ' ' });
    }

    out
}

/// Insert a space after `.` and `,` when the following character is neither
/// spacing nor a line break. Trailing punctuation stays untouched.
fn space_after_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if (c == '.' || c == ',') && chars.peek().is_some_and(|&next| next != ' ' && next != '\n')
        {
            out.push(' ');
        }
    }

    out
}

/// Trim every line, drop the ones left empty, and rejoin with single breaks.
fn tidy_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t  "), "");
    }

    #[test]
    fn blank_lines_collapse_to_one_break() {
        assert_eq!(normalize("A\n\n\nB"), "A\nB");
        assert_eq!(normalize("A\n \t\n  \nB"), "A\nB");
    }

    #[test]
    fn whitespace_runs_collapse_to_one_space() {
        assert_eq!(normalize("A   B\tC"), "A B C");
    }

    #[test]
    fn single_line_breaks_survive() {
        assert_eq!(normalize("Hello\nWorld\n"), "Hello\nWorld");
        assert_eq!(normalize("one \n two"), "one\ntwo");
    }

    #[test]
    fn punctuation_gains_a_following_space() {
        assert_eq!(normalize("Hi.There,World"), "Hi. There, World");
        assert_eq!(normalize("already. spaced, fine"), "already. spaced, fine");
    }

    #[test]
    fn trailing_punctuation_stays_bare() {
        assert_eq!(normalize("End."), "End.");
        assert_eq!(normalize("pause,"), "pause,");
    }

    #[test]
    fn lines_are_trimmed_and_empties_dropped() {
        assert_eq!(normalize("  \n \t \n  x  \n"), "x");
    }

    #[test]
    fn idempotent_on_assorted_inputs() {
        let inputs = [
            "",
            "A\n\n\nB",
            "A   B\tC",
            "Hi.There,World",
            "a..b",
            "x ,y.\nz\n\n\nw",
            "  padded  ",
            "mixed. punctuation,with\n\nbreaks.",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(
                normalize(&once),
                once,
                "normalize should be stable for {input:?}"
            );
        }
    }

    #[test]
    fn consecutive_punctuation_spaces_each_mark() {
        assert_eq!(normalize("a..b"), "a. . b");
        assert_eq!(normalize("a.,b"), "a. , b");
    }
}
