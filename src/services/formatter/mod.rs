//! Response formatter for model text.
//!
//! Summaries and roadmaps are displayed largely as returned; this only
//! tidies the markdown noise models tend to emit.

use crate::services::ai::AiResponse;

/// Text ready for the display surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedText {
    pub body: String,
    /// The `TIPS` section of a summary, when the model produced one
    pub tips: Option<String>,
}

pub fn format_summary(response: &AiResponse) -> FormattedText {
    let body = clean_markdown(&response.raw_text);
    let tips = extract_tips(&body);
    FormattedText { body, tips }
}

/// Roadmaps pass through with light cleanup; empty text stays empty.
pub fn format_roadmap(response: &AiResponse) -> FormattedText {
    FormattedText {
        body: clean_markdown(&response.raw_text),
        tips: None,
    }
}

/// Light markdown cleanup: bullets, stray escapes, emphasis runs, blank lines.
pub fn clean_markdown(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = true;

    for line in normalized.lines() {
        let line = clean_line(line);
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        lines.push(line);
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

fn clean_line(line: &str) -> String {
    let line = strip_stray_escapes(line);
    let line = collapse_emphasis(&line);
    let line = line.trim_end();

    let indent_len = line.len() - line.trim_start().len();
    let (indent, content) = line.split_at(indent_len);

    for marker in ["--->", "-->", "->", "* ", "• "] {
        if let Some(rest) = content.strip_prefix(marker) {
            return format!("{}- {}", indent, rest.trim_start());
        }
    }

    line.to_string()
}

/// Drop backslashes that escape punctuation, keep literal `\\`.
fn strip_stray_escapes(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('\\') => {
                    out.push('\\');
                    chars.next();
                }
                Some(next) if next.is_ascii_punctuation() => {}
                Some('n') => {
                    chars.next();
                    out.push(' ');
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Runs of three or more `*` are noise; `**bold**` is left alone.
fn collapse_emphasis(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut run = 0usize;
    for c in line.chars() {
        if c == '*' {
            run += 1;
            continue;
        }
        if (1..=2).contains(&run) {
            out.push_str(&"*".repeat(run));
        }
        run = 0;
        out.push(c);
    }
    if (1..=2).contains(&run) {
        out.push_str(&"*".repeat(run));
    }
    out
}

/// Text after the last `TIPS` heading, if it is non-empty
pub fn extract_tips(text: &str) -> Option<String> {
    let idx = text.rfind("TIPS")?;
    let tips = text[idx + "TIPS".len()..]
        .trim_start_matches(|c: char| c == ':' || c == '*' || c == '#')
        .trim();
    if tips.is_empty() {
        None
    } else {
        Some(tips.to_string())
    }
}
