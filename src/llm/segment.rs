//! Split an assistant reply into prose and fenced code segments.

use regex::Regex;
use std::sync::OnceLock;

/// Fence opener, optional language tag, newline, lazy body, fence closer.
fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(\w+)?\n(.*?)```").unwrap_or_else(|_| Regex::new("$^").unwrap())
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Text,
    Code,
}

/// One displayable piece of an assistant reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySegment {
    pub kind: SegmentKind,
    pub content: String,
    /// Tag written right after the opening fence, if any
    pub language: Option<String>,
}

impl DisplaySegment {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Text,
            content: content.into(),
            language: None,
        }
    }

    pub fn code(content: impl Into<String>, language: Option<String>) -> Self {
        Self {
            kind: SegmentKind::Code,
            content: content.into(),
            language,
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::Code
    }
}

/// Split `raw` into text and code segments in source order.
///
/// Prose between fences is trimmed and dropped when empty. Fence bodies are
/// trimmed but otherwise kept verbatim, backticks included.
pub fn segment(raw: &str) -> Vec<DisplaySegment> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for caps in fence_regex().captures_iter(raw) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        let before = raw[last_end..whole.start()].trim();
        if !before.is_empty() {
            segments.push(DisplaySegment::text(before));
        }

        let language = caps.get(1).map(|m| m.as_str().to_string());
        let body = caps.get(2).map(|m| m.as_str()).unwrap_or_default().trim();
        segments.push(DisplaySegment::code(body, language));

        last_end = whole.end();
    }

    let after = raw[last_end..].trim();
    if !after.is_empty() {
        segments.push(DisplaySegment::text(after));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_single_segment() {
        let segments = segment("  just some advice\n");
        assert_eq!(segments, vec![DisplaySegment::text("just some advice")]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(segment("").is_empty());
        assert!(segment("   \n\t ").is_empty());
    }

    #[test]
    fn test_interleaved_blocks_keep_order() {
        let raw = "Intro\n```rust\nfn a() {}\n```\nMiddle\n```\nSELECT 1;\n```\nOutro";
        let segments = segment(raw);

        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0], DisplaySegment::text("Intro"));
        assert_eq!(
            segments[1],
            DisplaySegment::code("fn a() {}", Some("rust".to_string()))
        );
        assert_eq!(segments[2], DisplaySegment::text("Middle"));
        assert_eq!(segments[3], DisplaySegment::code("SELECT 1;", None));
        assert_eq!(segments[4], DisplaySegment::text("Outro"));
    }

    #[test]
    fn test_n_blocks_give_two_n_plus_one_segments() {
        for n in 1..6 {
            let mut raw = String::new();
            for i in 0..n {
                raw.push_str(&format!("prose {i}\n```py\nprint({i})\n```\n"));
            }
            raw.push_str("done");
            let segments = segment(&raw);
            assert_eq!(segments.len(), 2 * n + 1);
            for (i, seg) in segments.iter().enumerate() {
                assert_eq!(seg.is_code(), i % 2 == 1);
            }
        }
    }

    #[test]
    fn test_adjacent_blocks_drop_empty_prose() {
        let raw = "```\none\n```\n\n```\ntwo\n```";
        let segments = segment(raw);
        assert_eq!(
            segments,
            vec![
                DisplaySegment::code("one", None),
                DisplaySegment::code("two", None)
            ]
        );
    }

    #[test]
    fn test_inline_backticks_survive_in_code() {
        let raw = "```js\nconst s = `hi ${name}`;\n```";
        let segments = segment(raw);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].content, "const s = `hi ${name}`;");
    }

    #[test]
    fn test_unclosed_fence_stays_text() {
        let raw = "Look:\n```rust\nfn broken() {";
        let segments = segment(raw);
        assert_eq!(segments, vec![DisplaySegment::text(raw.trim())]);
    }

    #[test]
    fn test_fence_without_newline_is_not_code() {
        // The opener must end its line before the body starts
        let segments = segment("use ```inline``` here");
        assert_eq!(segments, vec![DisplaySegment::text("use ```inline``` here")]);
    }
}
