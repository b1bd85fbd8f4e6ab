// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Structured-data extraction from fetched source documents.
//!
//! The verifier only depends on the [`Mf2Parser`] trait. [`HtmlMf2Parser`]
//! is the bundled implementation, built on `scraper`, covering the parts of
//! microformats2 that carry references: root and nested items, `p-`, `u-`,
//! `dt-` and `e-` properties, implied `name`/`url`, and `rel` values.
//! The value-class pattern and backcompat classes are not handled.

use crate::error::{Result, VerifyError};
use crate::mf2::{Item, Mf2Document, PropertyValue};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Failure reported by a structured-data parser.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseError(pub String);

/// HTML to microformats2 extraction.
pub trait Mf2Parser: Send + Sync {
    /// Parse `html`, resolving relative URLs against `base_url`.
    fn parse(&self, html: &str, base_url: &Url) -> std::result::Result<Mf2Document, ParseError>;
}

/// Run `parser` over `html`, mapping failures to [`VerifyError::ParseFailed`].
pub fn extract(parser: &dyn Mf2Parser, html: &str, base_url: &Url) -> Result<Mf2Document> {
    parser.parse(html, base_url).map_err(|e| {
        debug!(base = %base_url, error = %e, "Structured-data extraction failed");
        VerifyError::ParseFailed(e.0)
    })
}

/// Microformats2 parser over `scraper`'s HTML5 tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMf2Parser;

impl HtmlMf2Parser {
    pub fn new() -> Self {
        Self
    }
}

impl Mf2Parser for HtmlMf2Parser {
    fn parse(&self, html: &str, base_url: &Url) -> std::result::Result<Mf2Document, ParseError> {
        if html.trim().is_empty() {
            return Err(ParseError("empty document".to_string()));
        }

        let document = Html::parse_document(html);
        let base = document_base(&document, base_url);

        let mut items = Vec::new();
        collect_roots(document.root_element(), &base, &mut items);

        let rels = collect_rels(&document, &base)?;

        debug!(items = items.len(), rels = rels.len(), "Parsed microformats");
        Ok(Mf2Document { items, rels })
    }
}

/// Honour `<base href>` when present.
fn document_base(document: &Html, fallback: &Url) -> Url {
    let Ok(selector) = Selector::parse("base[href]") else {
        return fallback.clone();
    };
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| fallback.join(href).ok())
        .unwrap_or_else(|| fallback.clone())
}

fn collect_rels(
    document: &Html,
    base: &Url,
) -> std::result::Result<std::collections::BTreeMap<String, Vec<String>>, ParseError> {
    let selector = Selector::parse("a[rel][href], link[rel][href], area[rel][href]")
        .map_err(|e| ParseError(format!("{e:?}")))?;

    let mut rels: std::collections::BTreeMap<String, Vec<String>> = Default::default();
    for el in document.select(&selector) {
        let (Some(rel), Some(href)) = (el.value().attr("rel"), el.value().attr("href")) else {
            continue;
        };
        let url = resolve(base, href);
        for name in rel.split_whitespace() {
            let urls = rels.entry(name.to_lowercase()).or_default();
            if !urls.contains(&url) {
                urls.push(url.clone());
            }
        }
    }
    Ok(rels)
}

fn collect_roots(el: ElementRef<'_>, base: &Url, out: &mut Vec<Item>) {
    for child in el.children().filter_map(ElementRef::wrap) {
        if root_types(child).is_empty() {
            collect_roots(child, base, out);
        } else {
            out.push(parse_item(child, base));
        }
    }
}

fn root_types(el: ElementRef<'_>) -> Vec<String> {
    let mut types: Vec<String> = el
        .value()
        .classes()
        .filter(|c| is_mf2_class(c, "h-"))
        .map(str::to_string)
        .collect();
    types.sort();
    types.dedup();
    types
}

/// Property classes on `el` as `(prefix, name)` pairs.
fn property_classes(el: ElementRef<'_>) -> Vec<(&'static str, String)> {
    let mut props = Vec::new();
    for class in el.value().classes() {
        for prefix in ["p-", "u-", "dt-", "e-"] {
            if is_mf2_class(class, prefix) {
                props.push((prefix, class[prefix.len()..].to_string()));
            }
        }
    }
    props
}

/// `h-entry` yes, `h-` or `h-Entry` no.
fn is_mf2_class(class: &str, prefix: &str) -> bool {
    class.strip_prefix(prefix).is_some_and(|rest| {
        !rest.is_empty()
            && rest
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && !rest.starts_with('-')
            && !rest.ends_with('-')
    })
}

fn parse_item(el: ElementRef<'_>, base: &Url) -> Item {
    let mut item = Item::new(root_types(el));
    let mut saw = Saw::default();
    collect_properties(el, base, &mut item, &mut saw);
    apply_implied(el, base, &mut item, &saw);
    item
}

/// What explicit markup an item carried, for implied-property rules.
#[derive(Default)]
struct Saw {
    p_or_e: bool,
    u: bool,
    nested: bool,
}

fn collect_properties(el: ElementRef<'_>, base: &Url, item: &mut Item, saw: &mut Saw) {
    for child in el.children().filter_map(ElementRef::wrap) {
        let props = property_classes(child);
        let types = root_types(child);

        for (prefix, _) in &props {
            match *prefix {
                "p-" | "e-" => saw.p_or_e = true,
                "u-" => saw.u = true,
                _ => {}
            }
        }

        if !types.is_empty() {
            saw.nested = true;
            let nested = parse_item(child, base);
            if props.is_empty() {
                item.children.push(nested);
            } else {
                for (prefix, name) in &props {
                    let mut value = nested.clone();
                    value.value = nested_value(prefix, child, base, &nested);
                    item.push(name, PropertyValue::Item(value));
                }
            }
            continue;
        }

        for (prefix, name) in &props {
            let value = match *prefix {
                "u-" => match (child.value().name(), child.value().attr("alt")) {
                    ("img", Some(alt)) => PropertyValue::Image {
                        value: url_value(child, base),
                        alt: Some(alt.to_string()),
                    },
                    _ => PropertyValue::Text(url_value(child, base)),
                },
                "dt-" => PropertyValue::Text(datetime_value(child)),
                "e-" => PropertyValue::Fragment {
                    html: child.inner_html().trim().to_string(),
                    value: text_of(child),
                },
                _ => PropertyValue::Text(plain_value(child)),
            };
            item.push(name, value);
        }

        collect_properties(child, base, item, saw);
    }
}

/// The `value` of a nested item used as a property.
fn nested_value(prefix: &str, el: ElementRef<'_>, base: &Url, nested: &Item) -> Option<String> {
    match prefix {
        "u-" => nested
            .first_text("url")
            .map(str::to_string)
            .or_else(|| Some(url_value(el, base))),
        "p-" => nested
            .first_text("name")
            .map(str::to_string)
            .or_else(|| Some(plain_value(el))),
        _ => Some(text_of(el)),
    }
}

fn apply_implied(el: ElementRef<'_>, base: &Url, item: &mut Item, saw: &Saw) {
    if !item.properties.contains_key("name") && !saw.p_or_e && !saw.nested {
        let name = match el.value().name() {
            "img" | "area" => el.value().attr("alt").map(str::to_string),
            "abbr" => el.value().attr("title").map(str::to_string),
            _ => None,
        }
        .unwrap_or_else(|| text_of(el));
        item.push("name", PropertyValue::Text(name));
    }

    if !item.properties.contains_key("url") && !saw.u && !saw.nested {
        if let Some(href) = implied_url(el) {
            item.push("url", PropertyValue::Text(resolve(base, href)));
        }
    }
}

/// `a.h-x[href]`, or exactly one `a[href]` child.
fn implied_url<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    if matches!(el.value().name(), "a" | "area") {
        if let Some(href) = el.value().attr("href") {
            return Some(href);
        }
    }

    let mut links = el
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|c| matches!(c.value().name(), "a" | "area"))
        .filter_map(|c| c.value().attr("href"));
    let first = links.next()?;
    links.next().is_none().then_some(first)
}

fn plain_value(el: ElementRef<'_>) -> String {
    let attr = match el.value().name() {
        "abbr" | "link" => el.value().attr("title"),
        "data" | "input" => el.value().attr("value"),
        "img" | "area" => el.value().attr("alt"),
        _ => None,
    };
    attr.map(str::to_string).unwrap_or_else(|| text_of(el))
}

fn url_value(el: ElementRef<'_>, base: &Url) -> String {
    let attr = match el.value().name() {
        "a" | "area" | "link" => el.value().attr("href"),
        "img" | "audio" | "video" | "source" | "iframe" => el.value().attr("src"),
        "object" => el.value().attr("data"),
        "abbr" => el.value().attr("title"),
        "data" | "input" => el.value().attr("value"),
        _ => None,
    };
    match attr {
        Some(raw) => resolve(base, raw),
        None => text_of(el),
    }
}

fn datetime_value(el: ElementRef<'_>) -> String {
    let attr = match el.value().name() {
        "time" | "ins" | "del" => el.value().attr("datetime"),
        "abbr" => el.value().attr("title"),
        "data" | "input" => el.value().attr("value"),
        _ => None,
    };
    attr.map(str::to_string).unwrap_or_else(|| text_of(el))
}

/// Whitespace-collapsed text content.
fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve(base: &Url, raw: &str) -> String {
    base.join(raw.trim())
        .map(|u| u.to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}
