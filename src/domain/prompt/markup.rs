//! LaTeX to plain text reduction for model selection input, plus cleanup of
//! reasoning traces in model answers

use once_cell::sync::Lazy;
use regex::Regex;

/// `%` comments up to end of line, keeping escaped `\%`
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(^|[^\\])%.*$").unwrap());

/// Environment markers such as `\begin{questions}` and `\end{questions}`
static ENVIRONMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:begin|end)\{[^}]*\}(?:\[[^\]]*\])?").unwrap());

/// Command names with an optional `*` and optional bracket argument
static COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-zA-Z]+\*?(?:\[[^\]]*\])?").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

/// Strip LaTeX markup, keeping the words inside command arguments
pub fn plain_text(tex: &str) -> String {
    let text = COMMENT.replace_all(tex, "$1");
    let text = ENVIRONMENT.replace_all(&text, " ");
    let text = COMMAND.replace_all(&text, " ");
    let text = text.replace('$', "").replace(['{', '}', '&', '~'], " ");

    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Drop a leading `<think>...</think>` block emitted by reasoning models.
///
/// An unclosed block means the answer was cut off while still thinking, so
/// nothing usable is left.
pub fn strip_reasoning(text: &str) -> &str {
    let trimmed = text.trim_start();
    match trimmed.strip_prefix(THINK_OPEN) {
        Some(rest) => match rest.find(THINK_CLOSE) {
            Some(end) => rest[end + THINK_CLOSE.len()..].trim_start(),
            None => "",
        },
        None => text,
    }
}

/// Longest prefix of `text` with at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_keeps_argument_words() {
        let tex = r"\begin{questions}
\question What is the \textbf{derivative} of $x^2$? % instructor note
\answer{$2x$}
\end{questions}";

        assert_eq!(plain_text(tex), "What is the derivative of x^2? 2x");
    }

    #[test]
    fn test_plain_text_keeps_escaped_percent() {
        assert_eq!(plain_text(r"Interest of 5\% per year"), r"Interest of 5\% per year");
    }

    #[test]
    fn test_plain_text_of_plain_input() {
        assert_eq!(plain_text("  # Derivatives\n\nThe rule  "), "# Derivatives The rule");
    }

    #[test]
    fn test_strip_reasoning() {
        assert_eq!(
            strip_reasoning("<think>\nThe material covers calculus.\n</think>\n\nmath"),
            "math"
        );
        assert_eq!(strip_reasoning("  <think>still going"), "");
        assert_eq!(strip_reasoning("programming"), "programming");
        assert_eq!(
            strip_reasoning("\\question Explain <think> tags"),
            "\\question Explain <think> tags"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let persian = "مشتق تابع";
        assert_eq!(truncate_chars(persian, 4), "مشتق");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
