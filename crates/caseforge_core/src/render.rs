//! crates/caseforge_core/src/render.rs
//!
//! Turns a generation result into display markup. Generator output is untrusted:
//! every piece of text is HTML-escaped before the two inline transforms
//! (`**bold**` spans and bare `*` arrows) are applied.

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::GenerationResult;
use crate::handoff::HandoffSlot;

const ARROW: &str = "\u{2192}";

/// One paragraph of the narrative. Both fields are ready-to-insert markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub heading: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQa {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedCaseStudy {
    pub blocks: Vec<Block>,
    pub qa: Vec<RenderedQa>,
}

impl RenderedCaseStudy {
    pub fn to_html(&self) -> String {
        let mut html = String::from("<article class=\"case-study\">\n");
        for block in &self.blocks {
            html.push_str("<section>\n");
            if let Some(heading) = &block.heading {
                html.push_str(&format!("<h3>{}</h3>\n", heading));
            }
            html.push_str(&format!("<p>{}</p>\n</section>\n", block.body));
        }
        if !self.qa.is_empty() {
            html.push_str("<ol class=\"questions\">\n");
            for pair in &self.qa {
                html.push_str(&format!(
                    "<li><p><strong>Q:</strong> {}</p><p><strong>A:</strong> {}</p></li>\n",
                    pair.question, pair.answer
                ));
            }
            html.push_str("</ol>\n");
        }
        html.push_str("</article>\n");
        html
    }
}

/// Renders whatever the hand-off slot holds; an empty slot renders an empty page.
pub fn render_from_slot(slot: &HandoffSlot) -> RenderedCaseStudy {
    render(&slot.read().unwrap_or_default())
}

pub fn render(result: &GenerationResult) -> RenderedCaseStudy {
    let blocks = split_paragraphs(&result.case_study)
        .into_iter()
        .map(render_block)
        .collect();

    let qa = result
        .questions_and_answers
        .iter()
        .map(|pair| RenderedQa {
            question: format_inline(&pair.question),
            answer: format_inline(&pair.answer),
        })
        .collect();

    RenderedCaseStudy { blocks, qa }
}

/// Splits on blank lines, keeping order and dropping whitespace-only blocks.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    blank_line()
        .split(text)
        .map(|p| p.trim_matches(|c| c == '\n' || c == '\r'))
        .filter(|p| !p.trim().is_empty())
        .collect()
}

/// A first line ending in ':' ("Future Goals:") becomes the block heading.
fn render_block(paragraph: &str) -> Block {
    let (first, rest) = match paragraph.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (paragraph, None),
    };

    match (first.trim_end().strip_suffix(':'), rest) {
        (Some(title), Some(rest)) if !title.trim().is_empty() => Block {
            heading: Some(format_inline(title.trim())),
            body: format_lines(rest),
        },
        _ => Block {
            heading: None,
            body: format_lines(paragraph),
        },
    }
}

fn format_lines(text: &str) -> String {
    text.lines()
        .map(|line| format_inline(line.trim_end_matches('\r')))
        .collect::<Vec<_>>()
        .join("<br>\n")
}

/// Escapes the text, then applies the bold and arrow substitutions.
pub fn format_inline(text: &str) -> String {
    let escaped = html_escape(text);
    let bolded = bold_span().replace_all(&escaped, "<strong>$1</strong>");
    bolded.replace('*', ARROW)
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn bold_span() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern compiles"))
}

fn blank_line() -> &'static Regex {
    static BLANK: OnceLock<Regex> = OnceLock::new();
    BLANK.get_or_init(|| Regex::new(r"\r?\n[ \t]*\r?\n").expect("blank-line pattern compiles"))
}
