// src/notes.rs

use crate::model::{ReleaseNotes, UpdateInfo};
use pulldown_cmark::html::push_html;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_WIDTH: usize = 78;

fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

fn release_header(release: &ReleaseNotes) -> String {
    match &release.date {
        Some(date) if !date.trim().is_empty() => {
            format!("Version {} ({})", release.version, date.trim())
        }
        _ => format!("Version {}", release.version),
    }
}

fn issue_reference() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // the leading group keeps `[#1](..)`, `&#39;` and `a#1` untouched
    RE.get_or_init(|| Regex::new(r"(^|[^\w\[&/#])#([0-9]+)\b").expect("valid regex"))
}

/// Rewrites `#123` into a markdown link to the issue tracker.
pub fn link_issues<'a>(markdown: &'a str, issue_url: Option<&str>) -> Cow<'a, str> {
    let base = match issue_url.map(str::trim) {
        Some(base) if !base.is_empty() => base.trim_end_matches('/'),
        _ => return Cow::Borrowed(markdown),
    };
    issue_reference().replace_all(markdown, |caps: &Captures| {
        format!("{}[#{}]({}/{})", &caps[1], &caps[2], base, &caps[2])
    })
}

fn release_markdown<'a>(info: &UpdateInfo, release: &'a ReleaseNotes) -> Cow<'a, str> {
    link_issues(&release.notes, info.issue_url.as_deref())
}

/// Release notes of every release as wrapped plain text, for the text view.
pub fn plain_text(info: &UpdateInfo, width: usize) -> String {
    let width = width.max(8);
    let mut out: Vec<String> = Vec::new();

    for release in &info.releases {
        if !out.is_empty() {
            out.push(String::new());
        }
        out.push(release_header(release));
        let body = markdown_to_lines(&release_markdown(info, release), width);
        if !body.is_empty() {
            out.push(String::new());
            out.extend(body);
        }
    }

    out.join("\n")
}

enum ListKind {
    Bullet,
    Ordered(u64),
}

struct TextWriter {
    width: usize,
    lines: Vec<String>,
    buffer: String,
    first_prefix: String,
    rest_prefix: String,
    quote: usize,
    gap: bool,
}

impl TextWriter {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            buffer: String::new(),
            first_prefix: String::new(),
            rest_prefix: String::new(),
            quote: 0,
            gap: false,
        }
    }

    fn set_prefix(&mut self, first: String, rest: String) {
        self.first_prefix = first;
        self.rest_prefix = rest;
    }

    fn quote_prefix(&self) -> String {
        "> ".repeat(self.quote)
    }

    fn start_block(&mut self) {
        if self.gap && !self.lines.is_empty() {
            self.lines.push(self.quote_prefix().trim_end().to_string());
        }
        self.gap = false;
    }

    fn flush(&mut self) {
        let text = std::mem::take(&mut self.buffer);
        if text.trim().is_empty() {
            return;
        }
        self.start_block();
        let quote = self.quote_prefix();
        let wrapped = wrap(
            &text,
            self.width,
            &format!("{}{}", quote, self.first_prefix),
            &format!("{}{}", quote, self.rest_prefix),
        );
        self.lines.extend(wrapped);
        // continuation paragraphs of a list item hang under the marker
        self.first_prefix = self.rest_prefix.clone();
    }

    fn push_verbatim(&mut self, text: &str, indent: &str) {
        self.start_block();
        let quote = self.quote_prefix();
        for line in text.trim_end_matches('\n').lines() {
            self.lines.push(format!("{}{}{}", quote, indent, line).trim_end().to_string());
        }
    }
}

/// Greedy word wrap on display columns. Words longer than the line are
/// kept whole.
fn wrap(text: &str, width: usize, first_prefix: &str, rest_prefix: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, hard_line) in text.split('\n').enumerate() {
        let mut line = if i == 0 {
            first_prefix.to_string()
        } else {
            rest_prefix.to_string()
        };
        let mut prefix_len = line.width();
        let mut line_len = prefix_len;

        for word in hard_line.split_whitespace() {
            let word_len = word.width();
            if line_len > prefix_len && line_len + 1 + word_len > width {
                lines.push(line);
                line = rest_prefix.to_string();
                prefix_len = line.width();
                line_len = prefix_len;
            }
            if line_len > prefix_len {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

fn markdown_to_lines(markdown: &str, width: usize) -> Vec<String> {
    let mut writer = TextWriter::new(width);
    let mut lists: Vec<ListKind> = Vec::new();
    let mut links: Vec<(usize, String)> = Vec::new();
    let mut code: Option<String> = None;

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph | Tag::Heading { .. } => writer.flush(),
                Tag::List(start) => {
                    writer.flush();
                    lists.push(match start {
                        Some(n) => ListKind::Ordered(n),
                        None => ListKind::Bullet,
                    });
                }
                Tag::Item => {
                    writer.flush();
                    let indent = "  ".repeat(lists.len().saturating_sub(1));
                    let marker = match lists.last_mut() {
                        Some(ListKind::Ordered(next)) => {
                            let current = *next;
                            *next += 1;
                            format!("{}. ", current)
                        }
                        _ => "• ".to_string(),
                    };
                    let hang = " ".repeat(marker.width());
                    writer.set_prefix(format!("{}{}", indent, marker), format!("{}{}", indent, hang));
                }
                Tag::CodeBlock(_) => {
                    writer.flush();
                    code = Some(String::new());
                }
                Tag::BlockQuote(_) => {
                    writer.flush();
                    writer.start_block();
                    writer.quote += 1;
                }
                Tag::Link { dest_url, .. } => {
                    links.push((writer.buffer.len(), dest_url.into_string()));
                }
                _ => {}
            },
            Event::End(tag) => match tag {
                TagEnd::Paragraph | TagEnd::Heading(_) => {
                    writer.flush();
                    if lists.is_empty() {
                        writer.gap = true;
                    }
                }
                TagEnd::Item => writer.flush(),
                TagEnd::BlockQuote(_) => {
                    writer.flush();
                    writer.quote = writer.quote.saturating_sub(1);
                    if lists.is_empty() {
                        writer.gap = true;
                    }
                }
                TagEnd::List(_) => {
                    writer.flush();
                    lists.pop();
                    if lists.is_empty() {
                        writer.set_prefix(String::new(), String::new());
                        writer.gap = true;
                    }
                }
                TagEnd::CodeBlock => {
                    if let Some(text) = code.take() {
                        let indent = format!("{}    ", writer.rest_prefix);
                        writer.push_verbatim(&text, &indent);
                    }
                    if lists.is_empty() {
                        writer.gap = true;
                    }
                }
                TagEnd::Link => {
                    if let Some((start, url)) = links.pop() {
                        let label = writer.buffer.get(start..).unwrap_or("");
                        if !url.is_empty() && label.trim() != url {
                            writer.buffer.push_str(&format!(" <{}>", url));
                        }
                    }
                }
                _ => {}
            },
            Event::Text(text) => match code.as_mut() {
                Some(block) => block.push_str(&text),
                None => writer.buffer.push_str(&text),
            },
            Event::Code(text) => writer.buffer.push_str(&text),
            Event::SoftBreak => writer.buffer.push(' '),
            Event::HardBreak => writer.buffer.push('\n'),
            Event::TaskListMarker(done) => {
                writer.buffer.push_str(if done { "[x] " } else { "[ ] " });
            }
            Event::Rule => {
                writer.flush();
                writer.start_block();
                writer.lines.push("-".repeat(width.min(40)));
                writer.gap = true;
            }
            _ => {}
        }
    }
    writer.flush();

    while writer.lines.last().map_or(false, |l| l.is_empty()) {
        writer.lines.pop();
    }
    writer.lines
}

fn escape(text: &str) -> glib::GString {
    glib::markup_escape_text(text)
}

const STYLE: &str = "
body { font-family: sans-serif; font-size: 10pt; margin: 12px; }
h1 { font-size: 13pt; }
h2 { font-size: 11pt; border-bottom: 1px solid #ddd; }
h2 small { color: #666; font-weight: normal; }
code, pre { font-family: monospace; }
";

/// Release notes as a standalone HTML document, for the web surface.
pub fn html(info: &UpdateInfo) -> String {
    let mut doc = String::new();
    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    doc.push_str(&format!("<title>{}</title>\n", escape(&info.heading())));
    doc.push_str(&format!("<style>{}</style>\n", STYLE));
    doc.push_str("</head>\n<body>\n");
    doc.push_str(&format!("<h1>{}</h1>\n", escape(&info.heading())));

    for release in &info.releases {
        doc.push_str("<section>\n");
        match &release.date {
            Some(date) if !date.trim().is_empty() => doc.push_str(&format!(
                "<h2>Version {} <small>({})</small></h2>\n",
                escape(&release.version),
                escape(date.trim())
            )),
            _ => doc.push_str(&format!("<h2>Version {}</h2>\n", escape(&release.version))),
        }
        push_html(&mut doc, Parser::new_ext(&release_markdown(info, release), options()));
        doc.push_str("</section>\n");
    }

    doc.push_str("</body>\n</html>\n");
    doc
}
