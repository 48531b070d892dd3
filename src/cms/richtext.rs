//! Structured rich text.
//!
//! A rich-text field is a list of blocks. Text blocks carry inline spans
//! whose `start`/`end` offsets count UTF-16 code units, as the backend
//! produces them.
//!
//! ```json
//! [{ "type": "paragraph", "text": "Fast and quiet",
//!    "spans": [{ "start": 0, "end": 4, "type": "strong" }] }]
//! ```

use super::document::DocumentLink;
use quick_xml::escape::escape;
use serde::Deserialize;
use serde_json::Value;

/// Rich-text field value. Missing fields decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<Block>);

/// Block-level element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    /// Image blocks
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    /// Embed blocks
    #[serde(default)]
    pub oembed: Option<Value>,
    /// Custom label applied to the whole block
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum BlockKind {
    Heading(u8),
    Paragraph,
    Preformatted,
    ListItem,
    OrderedListItem,
    Image,
    Embed,
    Other(String),
}

impl From<String> for BlockKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "paragraph" => Self::Paragraph,
            "preformatted" => Self::Preformatted,
            "list-item" => Self::ListItem,
            "o-list-item" => Self::OrderedListItem,
            "image" => Self::Image,
            "embed" => Self::Embed,
            _ => match tag.strip_prefix("heading").and_then(|n| n.parse::<u8>().ok()) {
                Some(level @ 1..=6) => Self::Heading(level),
                _ => Self::Other(tag),
            },
        }
    }
}

/// Inline formatting over `[start, end)` of a block's text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink,
    Label,
    Other(String),
}

impl From<String> for SpanKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "strong" => Self::Strong,
            "em" => Self::Em,
            "hyperlink" => Self::Hyperlink,
            "label" => Self::Label,
            _ => Self::Other(tag),
        }
    }
}

impl RichText {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain text of all text-bearing blocks joined by `separator`.
    pub fn as_text(&self, separator: &str) -> String {
        self.0
            .iter()
            .filter(|block| !matches!(block.kind, BlockKind::Image | BlockKind::Embed))
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Serialize to HTML markup. Text is escaped; embed HTML is passed through.
    pub fn as_html(&self) -> String {
        let mut html = String::new();
        let mut open_list: Option<&'static str> = None;

        for block in &self.0 {
            let list = match block.kind {
                BlockKind::ListItem => Some("ul"),
                BlockKind::OrderedListItem => Some("ol"),
                _ => None,
            };
            if open_list != list {
                if let Some(tag) = open_list {
                    html.push_str(&format!("</{tag}>"));
                }
                if let Some(tag) = list {
                    html.push_str(&format!("<{tag}>"));
                }
                open_list = list;
            }
            write_block(&mut html, block);
        }
        if let Some(tag) = open_list {
            html.push_str(&format!("</{tag}>"));
        }
        html
    }
}

fn write_block(html: &mut String, block: &Block) {
    let class = block
        .label
        .as_deref()
        .map(|label| format!(r#" class="{}""#, escape(label)))
        .unwrap_or_default();

    match &block.kind {
        BlockKind::Heading(level) => {
            html.push_str(&format!("<h{level}{class}>"));
            write_spans(html, &block.text, &block.spans);
            html.push_str(&format!("</h{level}>"));
        }
        BlockKind::Paragraph | BlockKind::Other(_) => wrap(html, "p", &class, block),
        BlockKind::Preformatted => wrap(html, "pre", &class, block),
        BlockKind::ListItem | BlockKind::OrderedListItem => wrap(html, "li", &class, block),
        BlockKind::Image => {
            let src = block.url.as_deref().unwrap_or_default();
            let alt = block.alt.as_deref().unwrap_or_default();
            html.push_str(&format!(
                r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                escape(src),
                escape(alt)
            ));
        }
        BlockKind::Embed => {
            let oembed = block.oembed.as_ref();
            let field = |key: &str| {
                oembed
                    .and_then(|o| o.get(key))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
            };
            html.push_str(&format!(
                r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}"{class}>{}</div>"#,
                escape(field("embed_url")),
                escape(field("type")),
                escape(field("provider_name")),
                field("html")
            ));
        }
    }
}

fn wrap(html: &mut String, tag: &str, class: &str, block: &Block) {
    html.push_str(&format!("<{tag}{class}>"));
    write_spans(html, &block.text, &block.spans);
    html.push_str(&format!("</{tag}>"));
}

/// Write `text` with spans applied as nested inline elements.
///
/// Spans that overlap without nesting are closed and reopened around the
/// boundary so the markup stays well formed.
fn write_spans(html: &mut String, text: &str, spans: &[Span]) {
    let mut order: Vec<usize> = (0..spans.len())
        .filter(|&i| spans[i].end > spans[i].start)
        .collect();
    // Outer spans first: earlier start, then longer extent
    order.sort_by(|&a, &b| {
        spans[a]
            .start
            .cmp(&spans[b].start)
            .then(spans[b].end.cmp(&spans[a].end))
    });

    let mut open: Vec<usize> = Vec::new();
    let mut next = 0;
    let mut pos = 0;

    let at_boundary = |html: &mut String, pos: usize, open: &mut Vec<usize>, next: &mut usize| {
        close_ended(html, spans, open, pos);
        while *next < order.len() && spans[order[*next]].start <= pos {
            let i = order[*next];
            if spans[i].end > pos {
                open_tag(html, &spans[i]);
                open.push(i);
            }
            *next += 1;
        }
    };

    for ch in text.chars() {
        at_boundary(html, pos, &mut open, &mut next);
        match ch {
            '\n' => html.push_str("<br />"),
            _ => {
                let mut buf = [0u8; 4];
                html.push_str(&escape(&*ch.encode_utf8(&mut buf)));
            }
        }
        pos += ch.len_utf16();
    }
    close_ended(html, spans, &mut open, usize::MAX);
}

/// Close every open span ending at or before `pos`, reopening the ones
/// above it that continue.
fn close_ended(html: &mut String, spans: &[Span], open: &mut Vec<usize>, pos: usize) {
    let ends_here = |open: &[usize]| open.iter().any(|&i| spans[i].end <= pos);
    if !ends_here(open) {
        return;
    }

    let mut reopen = Vec::new();
    while let Some(i) = open.pop() {
        close_tag(html, &spans[i]);
        if spans[i].end > pos {
            reopen.push(i);
        }
        if !ends_here(open) {
            break;
        }
    }
    for i in reopen.into_iter().rev() {
        open_tag(html, &spans[i]);
        open.push(i);
    }
}

fn open_tag(html: &mut String, span: &Span) {
    match &span.kind {
        SpanKind::Strong => html.push_str("<strong>"),
        SpanKind::Em => html.push_str("<em>"),
        SpanKind::Hyperlink => {
            let data = span.data.as_ref();
            let href = data.map(hyperlink_href).unwrap_or_else(|| "#".into());
            let blank = data
                .and_then(|d| d.get("target"))
                .and_then(Value::as_str)
                .is_some_and(|t| t == "_blank");
            if blank {
                html.push_str(&format!(
                    r#"<a href="{}" target="_blank" rel="noopener">"#,
                    escape(&href)
                ));
            } else {
                html.push_str(&format!(r#"<a href="{}">"#, escape(&href)));
            }
        }
        SpanKind::Label => {
            let label = span
                .data
                .as_ref()
                .and_then(|d| d.get("label"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            html.push_str(&format!(r#"<span class="{}">"#, escape(label)));
        }
        SpanKind::Other(_) => html.push_str("<span>"),
    }
}

fn close_tag(html: &mut String, span: &Span) {
    html.push_str(match span.kind {
        SpanKind::Strong => "</strong>",
        SpanKind::Em => "</em>",
        SpanKind::Hyperlink => "</a>",
        SpanKind::Label | SpanKind::Other(_) => "</span>",
    });
}

/// Web and media links carry a `url`; document links resolve to a storefront route.
fn hyperlink_href(data: &Value) -> String {
    if let Some(url) = data.get("url").and_then(Value::as_str) {
        return url.to_string();
    }
    serde_json::from_value::<DocumentLink>(data.clone())
        .ok()
        .and_then(|link| link.href())
        .unwrap_or_else(|| "#".into())
}
