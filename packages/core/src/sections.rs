// ABOUTME: Splits generated markdown into ordered business plan sections
// ABOUTME: Headings (# or ##) start a new section; order follows the source text

use crate::types::BusinessPlanSection;

const PREAMBLE_TITLE: &str = "Overview";
const UNTITLED_TITLE: &str = "Business Plan";

/// Parse generated markdown into sections.
///
/// Text before the first heading becomes an "Overview" section. Text with no
/// headings at all becomes a single "Business Plan" section. Blank input
/// yields no sections.
pub fn parse_sections(markdown: &str) -> Vec<BusinessPlanSection> {
    let mut sections = Vec::new();
    let mut title: Option<String> = None;
    let mut body: Vec<&str> = Vec::new();
    let mut saw_heading = false;

    for line in markdown.lines() {
        if let Some(heading) = heading_text(line) {
            flush(&mut sections, title.take(), &body);
            body.clear();
            title = Some(heading);
            saw_heading = true;
        } else {
            body.push(line);
        }
    }
    flush(&mut sections, title, &body);

    if !saw_heading {
        if let Some(only) = sections.first_mut() {
            only.title = UNTITLED_TITLE.to_string();
        }
    }

    sections
}

fn flush(sections: &mut Vec<BusinessPlanSection>, title: Option<String>, body: &[&str]) {
    let content = body.join("\n").trim().to_string();
    match title {
        Some(title) => sections.push(BusinessPlanSection::new(title, content)),
        None if !content.is_empty() => {
            sections.push(BusinessPlanSection::new(PREAMBLE_TITLE, content))
        }
        None => {}
    }
}

/// Returns the heading text for `#` and `##` lines. Deeper headings stay in the body.
fn heading_text(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 2 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.starts_with(' ') {
        return None;
    }
    let text = rest.trim().trim_matches('*').trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
