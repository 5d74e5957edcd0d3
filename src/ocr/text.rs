use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A blank line (optionally holding spaces/tabs) and any blank lines after it.
const PARAGRAPH_BREAK: &str = r"\n[ \t]*\n\s*";

/// Quotes stripped from both ends of recognized text.
const QUOTES: [char; 8] = ['"', '\'', '“', '”', '‘', '’', '「', '」'];

/// Extra characters stripped from single words on top of ASCII punctuation.
const WORD_TRIM: [char; 6] = ['“', '”', '‘', '’', '，', '。'];

/// How line structure survives reflowing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reflow {
    /// Every line break becomes a single space.
    #[default]
    Collapse,
    /// Blank-line separated paragraphs are kept as `\n`-separated paragraphs.
    Paragraphs,
}

/// Joins hard-wrapped lines of one paragraph with single spaces.
fn join_lines(paragraph: &str) -> String {
    paragraph
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reflows raw multi-line OCR output into display text.
///
/// Hard wraps become spaces, the OCR-ambiguous `|` becomes `I`, and surrounding
/// whitespace and quotes are stripped. Returns `None` when nothing is left.
pub fn reflow(raw: &str, mode: Reflow) -> Result<Option<String>> {
    let breaks = Regex::new(PARAGRAPH_BREAK)?;

    // Tesseract ends pages with a form feed
    let normalized = raw.replace('\r', "").replace('\x0c', "\n");

    let paragraphs: Vec<String> = breaks
        .split(normalized.trim())
        .map(join_lines)
        .filter(|p| !p.is_empty())
        .collect();

    let separator = match mode {
        Reflow::Collapse => " ",
        Reflow::Paragraphs => "\n",
    };
    let text = paragraphs.join(separator).replace('|', "I");
    let text = text.trim_matches(|c: char| c.is_whitespace() || QUOTES.contains(&c));

    Ok((!text.is_empty()).then(|| text.to_string()))
}

/// Cleans a single recognized word: trailing and leading punctuation, quotes and
/// whitespace are removed. Returns `None` when nothing is left.
pub fn clean_word(raw: &str) -> Option<String> {
    let word = raw.trim_matches(|c: char| {
        c.is_whitespace() || c.is_ascii_punctuation() || WORD_TRIM.contains(&c)
    });
    (!word.is_empty()).then(|| word.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_wraps_become_spaces() {
        let text = reflow("hello\nworld.\nNext", Reflow::Collapse).unwrap();
        assert_eq!(text.as_deref(), Some("hello world. Next"));
    }

    #[test]
    fn test_vertical_bar_becomes_capital_i() {
        let text = reflow("| think | can\n", Reflow::Collapse).unwrap();
        assert_eq!(text.as_deref(), Some("I think I can"));
    }

    #[test]
    fn test_paragraphs_collapsed_or_kept() {
        let raw = "First para\nwraps here.\n\n  \nSecond one.\n\x0c";
        assert_eq!(
            reflow(raw, Reflow::Collapse).unwrap().as_deref(),
            Some("First para wraps here. Second one.")
        );
        assert_eq!(
            reflow(raw, Reflow::Paragraphs).unwrap().as_deref(),
            Some("First para wraps here.\nSecond one.")
        );
    }

    #[test]
    fn test_quotes_and_whitespace_stripped() {
        let text = reflow("  “Quoted text”\n\n", Reflow::Collapse).unwrap();
        assert_eq!(text.as_deref(), Some("Quoted text"));
    }

    #[test]
    fn test_empty_after_trim_is_no_text() {
        assert_eq!(reflow("", Reflow::Collapse).unwrap(), None);
        assert_eq!(reflow(" \n\x0c\n", Reflow::Collapse).unwrap(), None);
        assert_eq!(reflow("“ ”", Reflow::Collapse).unwrap(), None);
    }

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word("hello,").as_deref(), Some("hello"));
        assert_eq!(clean_word("(world)").as_deref(), Some("world"));
        assert_eq!(clean_word("“引用”。").as_deref(), Some("引用"));
        assert_eq!(clean_word("don't").as_deref(), Some("don't"));
        assert_eq!(clean_word("...").as_deref(), None);
    }
}
