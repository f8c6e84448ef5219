// file: src/converter/html.rs
// description: title and main-content extraction from saved textbook pages
// reference: https://docs.rs/scraper, https://docs.rs/html2md

use crate::cleaner::DocumentDeduplicator;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use scraper::{ElementRef, Html, Selector};

/// A candidate region only wins when its visible text is longer than this.
const MIN_REGION_TEXT: usize = 100;

pub const UNTITLED: &str = "Untitled";

/// Elements dropped wholesale before the content region is chosen.
const NOISE_ELEMENTS: &str = "script, style, iframe, noscript, nav, header, footer, aside";

/// Content containers tried in order before falling back to the largest div.
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role='main']",
    ".content",
    ".main-content",
    ".course-content",
    ".teorikurs-content",
    "#content",
    "#main-content",
];

lazy_static! {
    static ref NOISE: Selector = Selector::parse(NOISE_ELEMENTS).expect("NOISE selector is valid");

    static ref ANY_ELEMENT: Selector = Selector::parse("*").expect("ANY_ELEMENT selector is valid");

    static ref TITLE: Selector = Selector::parse("title").expect("TITLE selector is valid");

    static ref H1: Selector = Selector::parse("h1").expect("H1 selector is valid");

    static ref OG_TITLE: Selector =
        Selector::parse(r#"meta[property="og:title"]"#).expect("OG_TITLE selector is valid");

    static ref DIV: Selector = Selector::parse("div").expect("DIV selector is valid");

    static ref BODY: Selector = Selector::parse("body").expect("BODY selector is valid");

    static ref CONTENT_REGIONS: Vec<Selector> = CONTENT_SELECTORS
        .iter()
        .map(|selector| Selector::parse(selector).expect("content selector is valid"))
        .collect();

    /// Matched against `class` and `id` values of every element.
    static ref NOISE_ATTRIBUTE: Regex = Regex::new(
        r"(?i)nav|menu|header|footer|sidebar|ads?|social|share|comment|cookie|gdpr|consent"
    ).expect("NOISE_ATTRIBUTE regex is valid");

    static ref MARKDOWN_LINK: Regex =
        Regex::new(r"(!?)\[([^\]]*)\]\([^)]*\)").expect("MARKDOWN_LINK regex is valid");
}

/// Page title from `<title>`, the first `<h1>`, or `og:title`, in that order.
pub fn extract_title(html: &str) -> String {
    let document = Html::parse_document(html);
    let first_text = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
    };

    let og_title = document
        .select(&OG_TITLE)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(collapse_whitespace);

    [first_text(&TITLE), first_text(&H1), og_title]
        .into_iter()
        .flatten()
        .find(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Converts the main region of a page to deduplicated markdown.
pub fn extract_main_content(html: &str, deduplicator: &DocumentDeduplicator) -> String {
    let mut document = Html::parse_document(html);
    remove_noise(&mut document);

    let region = region_html(&document);
    let markdown = html2md::parse_html(&region);
    deduplicator.clean(&strip_links(&markdown))
}

/// Serialized page with noise elements and noise containers removed.
pub fn strip_noise_elements(html: &str) -> String {
    let mut document = Html::parse_document(html);
    remove_noise(&mut document);
    document.html()
}

/// Outer html of the region that [`extract_main_content`] converts.
pub fn select_region(html: &str) -> String {
    region_html(&Html::parse_document(html))
}

fn remove_noise(document: &mut Html) {
    let noise: Vec<_> = document
        .select(&NOISE)
        .chain(document.select(&ANY_ELEMENT).filter(is_noise_container))
        .map(|element| element.id())
        .collect();

    for id in noise {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Navigation, advert and consent containers, judged by class or id.
/// The document root and body are never dropped.
fn is_noise_container(element: &ElementRef) -> bool {
    let value = element.value();
    if matches!(value.name(), "html" | "body") {
        return false;
    }

    [value.attr("class"), value.attr("id")]
        .into_iter()
        .flatten()
        .any(|attribute| NOISE_ATTRIBUTE.is_match(attribute))
}

/// First content container with enough text, then the div holding the
/// most text, then body, then the whole document.
fn region_html(document: &Html) -> String {
    for selector in CONTENT_REGIONS.iter() {
        if let Some(region) = document.select(selector).next()
            && text_len(&region) > MIN_REGION_TEXT
        {
            return region.html();
        }
    }

    if let Some(div) = largest_div(document) {
        return div.html();
    }

    document
        .select(&BODY)
        .next()
        .map(|body| body.html())
        .unwrap_or_else(|| document.root_element().html())
}

/// Earliest div with the most text; ties go to the outer element.
fn largest_div(document: &Html) -> Option<ElementRef<'_>> {
    let mut best: Option<(usize, ElementRef<'_>)> = None;

    for div in document.select(&DIV) {
        let len = text_len(&div);
        if len > 0 && best.is_none_or(|(best_len, _)| len > best_len) {
            best = Some((len, div));
        }
    }

    best.map(|(_, div)| div)
}

fn text_len(element: &ElementRef) -> usize {
    element
        .text()
        .map(|text| text.trim().chars().count())
        .sum()
}

/// Replaces `[text](url)` with `text`; images are left alone.
pub fn strip_links(markdown: &str) -> String {
    MARKDOWN_LINK
        .replace_all(markdown, |caps: &Captures| {
            if &caps[1] == "!" {
                caps[0].to_string()
            } else {
                caps[2].to_string()
            }
        })
        .into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
