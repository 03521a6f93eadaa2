use std::sync::LazyLock;

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

static TEXT_HEADING_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2.subHeader.jbdSh.jbdTextSh").unwrap());
static ANY_HEADING_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2.subHeader").unwrap());

const COMPANY_HEADING: &str = "Bedrijf";
const COMPANY_END_HEADING: &str = "Taken";
const APPLY_HEADING: &str = "Solliciteren";
const APPLY_END_CLASS: &str = "jbdShReg";

/// Text blocks cut out of one job-detail page.
pub struct PageSections {
    pub bedrijf: String,
    pub solliciteren: String,
    /// Remaining `(heading, text)` sections, e.g. Taken and Profiel.
    pub extras: Vec<(String, String)>,
}

/// Cut the company description and application blocks out of a job page.
/// Headings that are missing produce empty blocks, never an error.
pub fn split_page(html: &str) -> PageSections {
    let doc = Html::parse_document(html);
    let bedrijf = heading_text(&doc, COMPANY_HEADING, Some(COMPANY_END_HEADING), None);
    let solliciteren = heading_text(&doc, APPLY_HEADING, None, Some(APPLY_END_CLASS));
    let extras = leftover_sections(&doc);
    PageSections {
        bedrijf,
        solliciteren,
        extras,
    }
}

// Collect sibling text after the named heading, up to the ending heading.
// The end is an h2 carrying `end_class`, or one whose text equals `end_text`
// (empty when only a class is given, so an empty h2 also ends the block).
fn heading_text(doc: &Html, title: &str, end_text: Option<&str>, end_class: Option<&str>) -> String {
    let Some(start) = find_heading(doc, title) else {
        return String::new();
    };
    let end_text = end_text.unwrap_or("");
    sibling_text(start, |el| {
        if let Some(class) = end_class {
            if el.value().classes().any(|c| c == class) {
                return true;
            }
        }
        element_text(el) == end_text
    })
}

fn find_heading<'a>(doc: &'a Html, title: &str) -> Option<ElementRef<'a>> {
    doc.select(&TEXT_HEADING_SEL).find(|el| element_text(el) == title)
}

// Walk the siblings after `start` until an h2 satisfies `is_end`, gathering
// text along the way. Element text is appended as-is, loose text nodes only
// when non-empty after trimming.
fn sibling_text(start: ElementRef, is_end: impl Fn(&ElementRef) -> bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    for node in start.next_siblings() {
        match node.value() {
            Node::Element(_) => {
                let Some(el) = ElementRef::wrap(node) else {
                    continue;
                };
                if el.value().name() == "h2" && is_end(&el) {
                    break;
                }
                parts.push(element_text(&el));
            }
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
            _ => {}
        }
    }
    parts.join(" ").trim().to_string()
}

/// Descendant strings, each trimmed, concatenated without separators. This
/// collapses inline markup, so "Dine <b>te Brussegem</b>" reads back as
/// "Dinete Brussegem". The name cleanup downstream knows these artifacts.
fn element_text(el: &ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("")
}

// Sections other than the two we extract from, kept for the archive.
fn leftover_sections(doc: &Html) -> Vec<(String, String)> {
    doc.select(&ANY_HEADING_SEL)
        .filter_map(|el| {
            let heading = element_text(&el);
            if heading.is_empty() || heading == COMPANY_HEADING || heading == APPLY_HEADING {
                return None;
            }
            let body = sibling_text(el, |next| next.value().name() == "h2");
            Some((heading, body))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body><div class="jobDetail">
        <h1>Kok (m/v)</h1>
        <h2 class="subHeader jbdSh jbdTextSh">Bedrijf</h2>
        <p>Restaurant Ciconia is een gezellige zaak.</p>
        <p>Al twintig jaar een vaste waarde.</p>
        <h2 class="subHeader jbdSh jbdTextSh">Taken</h2>
        <p>Koken en afwerken van gerechten.</p>
        <h2 class="subHeader jbdSh jbdTextSh">Solliciteren</h2>
        <p>Mail naar info@ciconia.be</p>
        <h2 class="subHeader jbdSh jbdShReg">Gerelateerde jobs</h2>
        <p>Kelner in Gent</p>
        </div></body></html>
    "#;

    #[test]
    fn splits_both_blocks() {
        let sections = split_page(PAGE);
        assert_eq!(
            sections.bedrijf,
            "Restaurant Ciconia is een gezellige zaak. Al twintig jaar een vaste waarde."
        );
        assert_eq!(sections.solliciteren, "Mail naar info@ciconia.be");
    }

    #[test]
    fn collects_leftover_sections() {
        let sections = split_page(PAGE);
        assert!(sections
            .extras
            .iter()
            .any(|(h, t)| h == "Taken" && t == "Koken en afwerken van gerechten."));
    }

    #[test]
    fn inline_markup_collapses_without_separator() {
        let html = r#"
            <html><body>
            <h2 class="subHeader jbdSh jbdTextSh">Bedrijf</h2>
            <p>Clash Lunch &amp; Dine<b>te</b><b>Brussegem</b>staat voor huisbereide gerechten.</p>
            <h2 class="subHeader jbdSh jbdTextSh">Taken</h2>
            <p>Meedraaien in de keuken.</p>
            </body></html>
        "#;
        let sections = split_page(html);
        assert_eq!(
            sections.bedrijf,
            "Clash Lunch & DineteBrussegemstaat voor huisbereide gerechten."
        );
    }

    #[test]
    fn missing_headings_yield_empty_blocks() {
        let sections = split_page("<html><body><h1>Iets anders</h1></body></html>");
        assert_eq!(sections.bedrijf, "");
        assert_eq!(sections.solliciteren, "");
        assert!(sections.extras.is_empty());
    }

    #[test]
    fn apply_block_ends_at_related_jobs_heading() {
        let sections = split_page(PAGE);
        assert!(!sections.solliciteren.contains("Kelner"));
    }

    #[test]
    fn block_runs_to_document_end_without_end_heading() {
        let html = r#"
            <html><body>
            <h2 class="subHeader jbdSh jbdTextSh">Solliciteren</h2>
            <p>Bel ons op 0470 12 34 56</p>
            <p>of kom langs.</p>
            </body></html>
        "#;
        let sections = split_page(html);
        assert_eq!(sections.solliciteren, "Bel ons op 0470 12 34 56 of kom langs.");
    }
}
