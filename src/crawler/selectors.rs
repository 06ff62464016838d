//! Structural selector rules for registry detail pages
//!
//! Detail pages carry no stable ids, so fields are located by markup shape
//! and by the literal text of nearby captions. Each text field has an ordered
//! list of [`TextRule`]s; the first rule that yields a value wins.
//!
//! "Text" of a caption follows the registry's markup: a span matches only when
//! it holds a single string (directly or through a single nested element), so
//! a caption wrapped around other markup is not mistaken for the label.

use scraper::{ElementRef, Html, Node, Selector};

/// Caption preceding the principal address block
pub const PRINCIPAL_ADDRESS_CAPTION: &str = "Principal Address";

/// Caption of the owners section on trademark-style pages
pub const OWNERS_CAPTION: &str = "Owners";

/// Caption preceding the annual reports table
pub const ANNUAL_REPORTS_CAPTION: &str = "Annual Reports";

/// Title attribute of the pagination link
pub const NEXT_LINK_TITLE: &str = "Next On List";

/// A rule that reads one text field from a detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    /// Second `<p>` inside `div.corporationName`
    CorporationName,

    /// The div nested in the span that follows the "Principal Address" caption
    PrincipalAddress,

    /// First div inside the `div.detailSection` holding the "Owners" caption
    OwnersSection,
}

/// Rules for the business name, in priority order
pub const NAME_RULES: &[TextRule] = &[TextRule::CorporationName];

/// Rules for the principal address, in priority order
pub const ADDRESS_RULES: &[TextRule] = &[TextRule::PrincipalAddress, TextRule::OwnersSection];

impl TextRule {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::CorporationName => "corporation-name",
            Self::PrincipalAddress => "principal-address",
            Self::OwnersSection => "owners-section",
        }
    }

    /// Applies this rule, returning None when the structure is missing
    pub fn apply(&self, document: &Html) -> Option<String> {
        match self {
            Self::CorporationName => corporation_name(document),
            Self::PrincipalAddress => principal_address(document),
            Self::OwnersSection => owners_address(document),
        }
    }
}

/// Returns the value of the first rule that matches
pub fn first_match(rules: &[TextRule], document: &Html) -> Option<String> {
    rules.iter().find_map(|rule| {
        let value = rule.apply(document);
        match &value {
            Some(_) => tracing::trace!("Selector rule '{}' matched", rule.name()),
            None => tracing::debug!("Selector rule '{}' found nothing", rule.name()),
        }
        value
    })
}

fn corporation_name(document: &Html) -> Option<String> {
    let selector = Selector::parse("div.corporationName p:nth-of-type(2)").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

fn principal_address(document: &Html) -> Option<String> {
    let caption = find_span(document, |s| s.contains(PRINCIPAL_ADDRESS_CAPTION))?;
    let value_span = next_sibling_named(caption, "span")?;
    let block = first_descendant_named(value_span, "div")?;
    non_empty(joined_strings(block))
}

fn owners_address(document: &Html) -> Option<String> {
    let caption = find_span(document, |s| s == OWNERS_CAPTION)?;
    let section = enclosing_div_with_class(caption, "detailSection")?;
    let block = first_descendant_named(section, "div")?;
    non_empty(joined_strings(block))
}

// ===== Structural helpers =====

/// Finds the first span in document order whose single string satisfies `predicate`
pub(crate) fn find_span<'a>(
    document: &'a Html,
    predicate: impl Fn(&str) -> bool,
) -> Option<ElementRef<'a>> {
    let selector = Selector::parse("span").ok()?;

    document
        .select(&selector)
        .find(|span| single_string(*span).is_some_and(|s| predicate(&s)))
}

/// Returns an element's string when it holds exactly one text node
///
/// An element whose only child is another element defers to that child.
/// Elements with several children have no single string.
pub(crate) fn single_string(element: ElementRef<'_>) -> Option<String> {
    let mut children = element.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }

    match only.value() {
        Node::Text(text) => {
            let s: &str = text;
            Some(s.to_string())
        }
        Node::Element(_) => ElementRef::wrap(only).and_then(single_string),
        _ => None,
    }
}

/// Finds the first following sibling element with the given tag name
pub(crate) fn next_sibling_named<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == tag)
}

/// Finds the first descendant element (excluding `element` itself) with the given tag name
pub(crate) fn first_descendant_named<'a>(
    element: ElementRef<'a>,
    tag: &str,
) -> Option<ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|descendant| descendant.value().name() == tag)
}

/// Finds the nearest ancestor div carrying `class`
pub(crate) fn enclosing_div_with_class<'a>(
    element: ElementRef<'a>,
    class: &str,
) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| {
            ancestor.value().name() == "div" && ancestor.value().classes().any(|c| c == class)
        })
}

/// Joins every non-blank text fragment under `element` with single spaces
pub(crate) fn joined_strings(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed text content of an element
pub(crate) fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
