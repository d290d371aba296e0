//! Lightweight text extraction for the content documents.
//!
//! The documents are simple: headings, lists, quotes and short paragraphs
//! with the occasional bold run. This covers what they use and nothing more.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid tag regex"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid entity regex")
});
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").expect("valid script regex")
});
static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|h[1-6]|li|tr|ul|ol|table|section|blockquote)>")
        .expect("valid break regex")
});
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").expect("valid list item regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Plain,
    Bold,
    Italic,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

impl Span {
    fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Bullet(Vec<Span>),
    Numbered { number: String, spans: Vec<Span> },
    Quote(Vec<Span>),
    Rule,
    Code(Vec<String>),
    Paragraph(Vec<Span>),
}

impl Block {
    /// Concatenated text of the block, without markup.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Heading { spans, .. }
            | Self::Bullet(spans)
            | Self::Numbered { spans, .. }
            | Self::Quote(spans)
            | Self::Paragraph(spans) => spans.iter().map(|s| s.text.as_str()).collect(),
            Self::Rule => String::new(),
            Self::Code(lines) => lines.join("\n"),
        }
    }
}

pub fn parse_markdown(source: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut code: Option<Vec<String>> = None;

    for raw in source.lines() {
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        if let Some(lines) = code.as_mut() {
            if trimmed.starts_with("```") {
                blocks.push(Block::Code(std::mem::take(lines)));
                code = None;
            } else {
                lines.push(line.to_string());
            }
            continue;
        }

        if trimmed.starts_with("```") {
            flush_paragraph(&mut paragraph, &mut blocks);
            code = Some(Vec::new());
            continue;
        }

        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some(block) = line_block(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(block);
        } else {
            paragraph.push(trimmed);
        }
    }

    // An unterminated fence still shows its content.
    if let Some(lines) = code {
        blocks.push(Block::Code(lines));
    }
    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn flush_paragraph(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if paragraph.is_empty() {
        return;
    }
    let text = paragraph.join(" ");
    paragraph.clear();
    let spans = parse_inline(&text);
    if !spans.is_empty() {
        blocks.push(Block::Paragraph(spans));
    }
}

fn line_block(line: &str) -> Option<Block> {
    if is_rule(line) {
        return Some(Block::Rule);
    }

    let hashes = line.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&hashes) {
        if let Some(rest) = line[hashes..].strip_prefix(' ') {
            #[allow(clippy::cast_possible_truncation)]
            return Some(Block::Heading {
                level: hashes as u8,
                spans: parse_inline(rest.trim_end_matches('#').trim()),
            });
        }
    }

    if let Some(rest) = line.strip_prefix('>') {
        return Some(Block::Quote(parse_inline(rest.trim())));
    }

    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(Block::Bullet(parse_inline(rest.trim())));
        }
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let (number, rest) = line.split_at(digits);
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(Block::Numbered {
                number: number.to_string(),
                spans: parse_inline(rest.trim()),
            });
        }
    }

    None
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|&marker| compact.chars().all(|c| c == marker))
}

/// Splits a line into styled runs: `**bold**`, `*italic*`/`_italic_` and
/// `` `code` ``. Inline HTML tags are dropped and entities decoded.
/// Unmatched markers are kept as text.
pub fn parse_inline(text: &str) -> Vec<Span> {
    let text = decode_entities(&strip_tags(text));
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = text.as_str();

    while let Some(c) = rest.chars().next() {
        let styled = match c {
            '`' => delimited(rest, "`", SpanStyle::Code),
            '*' if rest.starts_with("**") => delimited(rest, "**", SpanStyle::Bold),
            '_' if rest.starts_with("__") => delimited(rest, "__", SpanStyle::Bold),
            '*' | '_' => delimited(rest, &rest[..1], SpanStyle::Italic),
            _ => None,
        };

        if let Some((span, consumed)) = styled {
            if !plain.is_empty() {
                spans.push(Span::new(std::mem::take(&mut plain), SpanStyle::Plain));
            }
            spans.push(span);
            rest = &rest[consumed..];
        } else {
            plain.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    if !plain.is_empty() {
        spans.push(Span::new(plain, SpanStyle::Plain));
    }
    spans
}

fn delimited(text: &str, marker: &str, style: SpanStyle) -> Option<(Span, usize)> {
    let body = &text[marker.len()..];
    let end = body.find(marker)?;
    if end == 0 {
        return None;
    }
    let consumed = marker.len() * 2 + end;
    Some((Span::new(&body[..end], style), consumed))
}

pub(crate) fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Decodes the named entities the documents use plus numeric references.
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Reduces an HTML fragment to lines of text. Block-level closing tags and
/// `<br>` become line breaks, list items get a bullet, runs of blank lines
/// collapse to one.
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT_STYLE_RE.replace_all(html, "");
    let text = LIST_ITEM_RE.replace_all(&text, "• ");
    let text = BREAK_RE.replace_all(&text, "\n");
    let text = decode_entities(&strip_tags(&text));

    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && lines.last().map_or(true, |last| last.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Blocks of an HTML document: list items become bullets, every other
/// line a plain paragraph. Markdown markers in the text are not interpreted.
pub fn html_blocks(html: &str) -> Vec<Block> {
    html_to_text(html)
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_prefix("• ") {
            Some(item) => Block::Bullet(vec![Span::new(item.trim(), SpanStyle::Plain)]),
            None => Block::Paragraph(vec![Span::new(line, SpanStyle::Plain)]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span {
        Span::new(text, SpanStyle::Plain)
    }

    #[test]
    fn block_kinds() {
        let source = "# Setlist\n\n- Opening\n2. Second\n> quoted\n---\nfirst line\nsecond line\n\n```\ncode *raw*\n```";
        let blocks = parse_markdown(source);
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    spans: vec![plain("Setlist")]
                },
                Block::Bullet(vec![plain("Opening")]),
                Block::Numbered {
                    number: "2".to_string(),
                    spans: vec![plain("Second")]
                },
                Block::Quote(vec![plain("quoted")]),
                Block::Rule,
                Block::Paragraph(vec![plain("first line second line")]),
                Block::Code(vec!["code *raw*".to_string()]),
            ]
        );
    }

    #[test]
    fn hash_without_space_is_a_paragraph() {
        let blocks = parse_markdown("#hashtag");
        assert_eq!(blocks, vec![Block::Paragraph(vec![plain("#hashtag")])]);
    }

    #[test]
    fn inline_styles() {
        let spans = parse_inline("Play **loud** and `soft`, *maybe*");
        assert_eq!(
            spans,
            vec![
                plain("Play "),
                Span::new("loud", SpanStyle::Bold),
                plain(" and "),
                Span::new("soft", SpanStyle::Code),
                plain(", "),
                Span::new("maybe", SpanStyle::Italic),
            ]
        );
        assert_eq!(parse_inline("2 * 3 = 6"), vec![plain("2 * 3 = 6")]);
    }

    #[test]
    fn inline_html_is_stripped() {
        let spans = parse_inline(r#"<span class="lyric-trigger" data-lyric-file="a.md">Song A</span> &amp; more"#);
        assert_eq!(spans, vec![plain("Song A & more")]);
    }

    #[test]
    fn html_reduces_to_lines() {
        let html = "<h2>Encore</h2><ul><li>One &amp; Two</li><li>Three&#x21;</li></ul><p>End<br/>Fin</p><script>x()</script>";
        assert_eq!(html_to_text(html), "Encore\n• One & Two\n• Three!\n\nEnd\nFin");
    }

    #[test]
    fn patterns_compile() {
        for pattern in [&TAG_RE, &ENTITY_RE, &SCRIPT_STYLE_RE, &BREAK_RE, &LIST_ITEM_RE] {
            assert!(!LazyLock::force(pattern).as_str().is_empty());
        }
    }

    #[test]
    fn tags_are_stripped_in_every_block() {
        let blocks = parse_markdown("# <b>Title</b>\n\n- <i>one</i>\n\n<span>two</span>");
        let text: Vec<String> = blocks.iter().map(Block::plain_text).collect();
        assert_eq!(text, vec!["Title", "one", "two"]);
    }

    #[test]
    fn unknown_entities_are_kept() {
        assert_eq!(decode_entities("a &bogus; b &#39;"), "a &bogus; b '");
    }

    #[test]
    fn html_blocks_keep_list_items_apart() {
        let blocks = html_blocks("<h2>Encore</h2><ul><li>One *live*</li><li>Two</li></ul>");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![plain("Encore")]),
                Block::Bullet(vec![plain("One *live*")]),
                Block::Bullet(vec![plain("Two")]),
            ]
        );
    }
}
