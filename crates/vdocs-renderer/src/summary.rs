//! Page summary extraction.
//!
//! A summary is a one-paragraph plain-text teaser used for page descriptions.
//! The markdown is projected to plain text (block formatting such as
//! headings, code blocks, images and tables is dropped entirely) and then cut
//! at a natural boundary.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Minimum length before a sentence end may terminate the summary.
const SENTENCE_MIN_LEN: usize = 80;

/// Length after which the next word boundary terminates the summary.
const WORD_BOUNDARY_LEN: usize = 165;

/// Length at which the summary is cut without a natural boundary.
const HARD_LIMIT_LEN: usize = 180;

/// Length kept when the hard limit is reached.
const HARD_TRUNCATE_LEN: usize = 170;

/// Extract a short plain-text summary from markdown.
///
/// Returns `None` if the document has no prose (e.g. only headings and code).
#[must_use]
pub fn summarize(markdown: &str) -> Option<String> {
    let text = plain_text(markdown);
    let summary = truncate(text.trim_start());
    if summary.is_empty() {
        None
    } else {
        Some(summary)
    }
}

/// Render markdown as plain text.
///
/// Paragraphs end with a blank line, list items with a newline. Suppressed
/// blocks contribute nothing, including their nested text.
pub(crate) fn plain_text(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let mut output = String::with_capacity(markdown.len() / 2);
    let mut suppressed = 0usize;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) if is_suppressed(&tag) => suppressed += 1,
            Event::End(
                TagEnd::Heading(_)
                | TagEnd::CodeBlock
                | TagEnd::Image
                | TagEnd::Table
                | TagEnd::HtmlBlock
                | TagEnd::MetadataBlock(_),
            ) => suppressed = suppressed.saturating_sub(1),
            _ if suppressed > 0 => {}
            Event::Text(text) | Event::Code(text) => output.push_str(&text),
            Event::SoftBreak => output.push(' '),
            Event::HardBreak => output.push('\n'),
            Event::End(TagEnd::Paragraph) => output.push_str("\n\n"),
            Event::End(TagEnd::Item) if !output.ends_with('\n') => output.push('\n'),
            _ => {}
        }
    }

    output
}

fn is_suppressed(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Heading { .. }
            | Tag::CodeBlock(_)
            | Tag::Image { .. }
            | Tag::Table(_)
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_)
    )
}

/// Cut plain text at the first natural boundary.
///
/// Stops after a period followed by a space, a blank line or the end of text
/// once more than [`SENTENCE_MIN_LEN`] characters are collected, or at the
/// first whitespace once [`WORD_BOUNDARY_LEN`] characters are collected. If
/// [`HARD_LIMIT_LEN`] characters are reached first, the first
/// [`HARD_TRUNCATE_LEN`] are returned.
fn truncate(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut len = 0;

    for (i, &c) in chars.iter().enumerate() {
        if len >= HARD_LIMIT_LEN {
            return collect_trimmed(&chars[..HARD_TRUNCATE_LEN]);
        }
        if len >= WORD_BOUNDARY_LEN && c.is_whitespace() {
            break;
        }
        len += 1;
        if c == '.' && len > SENTENCE_MIN_LEN && ends_sentence(&chars[i + 1..]) {
            break;
        }
    }

    collect_trimmed(&chars[..len])
}

/// Check whether the text after a period marks a sentence end.
fn ends_sentence(rest: &[char]) -> bool {
    matches!(rest, [] | [' ', ..] | ['\n', '\n', ..] | ['\n'])
}

fn collect_trimmed(chars: &[char]) -> String {
    chars.iter().collect::<String>().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_short_text_is_returned_whole() {
        let markdown = "Deno is a simple, modern and secure runtime for JavaScript and TypeScript";

        assert_eq!(summarize(markdown).as_deref(), Some(markdown));
    }

    #[test]
    fn test_formatting_is_flattened() {
        let markdown = "Deno is **simple**, _modern_ and [secure](./permissions.md). Use `deno run`.";

        assert_eq!(
            summarize(markdown).as_deref(),
            Some("Deno is simple, modern and secure. Use deno run.")
        );
    }

    #[test]
    fn test_block_formatting_is_suppressed() {
        let markdown = "# Introduction\n\n![logo](./logo.png)\n\n```ts\nconsole.log(1);\n```\n\n---\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\nDeno is a runtime.";

        assert_eq!(summarize(markdown).as_deref(), Some("Deno is a runtime."));
    }

    #[test]
    fn test_blockquote_is_plain_text() {
        let markdown = "> Quoted &amp; decoded text";

        assert_eq!(summarize(markdown).as_deref(), Some("Quoted & decoded text"));
    }

    #[test]
    fn test_task_markers_are_suppressed() {
        let markdown = "- [x] done\n- [ ] todo";

        assert_eq!(summarize(markdown).as_deref(), Some("done\ntodo"));
    }

    #[test]
    fn test_only_headings_has_no_summary() {
        assert_eq!(summarize("# Title\n\n## Subtitle"), None);
        assert_eq!(summarize(""), None);
    }

    #[test]
    fn test_stops_at_sentence_after_minimum_length() {
        let first = "This first sentence is deliberately long enough to pass the minimum length of eighty characters.";
        let markdown = format!("{first} The second sentence is not part of the summary.");

        assert_eq!(summarize(&markdown).as_deref(), Some(first));
    }

    #[test]
    fn test_short_sentence_does_not_stop() {
        let markdown = "Short one. This continues past the first period because it is still below the limit. And then it ends.";

        assert_eq!(
            summarize(markdown).as_deref(),
            Some("Short one. This continues past the first period because it is still below the limit.")
        );
    }

    #[test]
    fn test_period_inside_word_does_not_stop() {
        let markdown = "Run the file with deno run and pass the flags that you need for the script main.ts to work as expected here";

        assert_eq!(summarize(markdown).as_deref(), Some(markdown));
    }

    #[test]
    fn test_stops_at_paragraph_end() {
        let first = "The first paragraph ends with a period and is long enough to be a complete summary.";
        let markdown = format!("{first}\n\nSecond paragraph.");

        assert_eq!(summarize(&markdown).as_deref(), Some(first));
    }

    #[test]
    fn test_stops_at_word_boundary() {
        let markdown = "word ".repeat(60);

        let summary = summarize(&markdown).unwrap();

        assert_eq!(summary.chars().count(), 169);
        assert!(summary.ends_with("word"));
    }

    #[test]
    fn test_hard_truncate_without_boundary() {
        let markdown = format!("{} {}", "a".repeat(160), "b".repeat(100));

        let summary = summarize(&markdown).unwrap();

        assert_eq!(summary.chars().count(), 170);
        assert!(summary.starts_with(&"a".repeat(160)));
        assert!(summary.ends_with(&"b".repeat(9)));
    }

    #[test]
    fn test_plain_text_paragraphs() {
        assert_eq!(plain_text("One\ntwo\n\nThree"), "One two\n\nThree\n\n");
    }
}
