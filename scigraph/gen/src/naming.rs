//! Canonical identifiers.
//!
//! Every name that ends up in generated code goes through this module, so the
//! emitted symbols depend only on the document's words, never on its casing
//! or punctuation.

use heck::{ToPascalCase, ToSnakeCase};
use proc_macro2::{Ident, Span};
use scigraph_define::RestMethod;

/// Strict and reserved keywords (2024 edition).
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW: &[&str] = &["crate", "self", "super", "Self"];

/// Converts a document name to a `snake_case` identifier.
///
/// Keywords become raw identifiers (`type` → `r#type`), except those that
/// cannot be raw, which get a trailing underscore (`self` → `self_`). Returns
/// `None` if the name has no alphanumeric characters.
///
/// ## Examples
///
/// ```
/// use scigraph_gen::naming::snake_ident;
///
/// assert_eq!(snake_ident("searchSynonyms").as_deref(), Some("search_synonyms"));
/// assert_eq!(snake_ident("/vocabulary").as_deref(), Some("vocabulary"));
/// assert_eq!(snake_ident("type").as_deref(), Some("r#type"));
/// assert_eq!(snake_ident("self").as_deref(), Some("self_"));
/// assert_eq!(snake_ident("2hop").as_deref(), Some("n2hop"));
/// assert_eq!(snake_ident("--"), None);
/// ```
pub fn snake_ident(raw: &str) -> Option<String> {
    let words = words(raw)?;
    let mut ident = words.to_snake_case();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, 'n');
    }
    Some(escape_keyword(ident))
}

/// Converts a document name to a `PascalCase` identifier.
///
/// Names starting with a digit are prefixed with `V`. Returns `None` if the
/// name has no alphanumeric characters.
///
/// ## Examples
///
/// ```
/// use scigraph_gen::naming::pascal_ident;
///
/// assert_eq!(pascal_ident("graph_neighbors").as_deref(), Some("GraphNeighbors"));
/// assert_eq!(pascal_ident("INCOMING").as_deref(), Some("Incoming"));
/// assert_eq!(pascal_ident("1.0").as_deref(), Some("V10"));
/// assert_eq!(pascal_ident("self").as_deref(), Some("Self_"));
/// ```
pub fn pascal_ident(raw: &str) -> Option<String> {
    let words = words(raw)?;
    let mut ident = words.to_pascal_case();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, 'V');
    }
    if ident == "Self" {
        ident.push('_');
    }
    Some(ident)
}

/// Derives an operation name from its method and path.
///
/// Literal segments are kept, placeholders become `by_<name>` (joined with
/// `and` when adjacent).
///
/// ## Examples
///
/// ```
/// use scigraph_define::RestMethod;
/// use scigraph_gen::naming::derive_operation_name;
///
/// assert_eq!(derive_operation_name(RestMethod::Get, "/term/{id}"), "get_term_by_id");
/// assert_eq!(
///     derive_operation_name(RestMethod::Get, "/graph/reachablefrom/{id}/{depth}"),
///     "get_graph_reachablefrom_by_id_and_depth"
/// );
/// assert_eq!(derive_operation_name(RestMethod::Post, "/annotations"), "post_annotations");
/// ```
pub fn derive_operation_name(method: RestMethod, path: &str) -> String {
    let mut parts = vec![method.to_string().to_lowercase()];
    let mut previous_was_param = false;

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let mut rest = segment;
        while !rest.is_empty() {
            match (rest.find('{'), rest.find('}')) {
                (Some(open), Some(close)) if open < close => {
                    push_literal(&mut parts, &rest[..open], &mut previous_was_param);
                    let name = rest[open + 1..close].to_snake_case();
                    parts.push(if previous_was_param { "and" } else { "by" }.to_string());
                    parts.push(name);
                    previous_was_param = true;
                    rest = &rest[close + 1..];
                }
                _ => {
                    push_literal(&mut parts, rest, &mut previous_was_param);
                    rest = "";
                }
            }
        }
    }

    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn push_literal(parts: &mut Vec<String>, literal: &str, previous_was_param: &mut bool) {
    // File extensions (`.json`) carry no meaning for the name.
    let literal = literal.split('.').next().unwrap_or_default();
    let snake = literal.to_snake_case();
    if !snake.is_empty() {
        parts.push(snake);
        *previous_was_param = false;
    }
}

/// Builds an [`Ident`] from a canonical name, honouring the `r#` prefix.
pub fn ident(name: &str) -> Ident {
    match name.strip_prefix("r#") {
        Some(raw) => Ident::new_raw(raw, Span::call_site()),
        None => Ident::new(name, Span::call_site()),
    }
}

/// The identifier without any `r#` prefix, as serde sees it.
pub fn unraw(name: &str) -> &str {
    name.strip_prefix("r#").unwrap_or(name)
}

/// Returns `candidate`, or `candidate` with the smallest numeric suffix
/// (starting at 2) for which `taken` returns false.
pub fn disambiguate(candidate: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(candidate) {
        return candidate.to_string();
    }
    (2..)
        .map(|n| format!("{candidate}{n}"))
        .find(|name| !taken(name))
        .unwrap_or_else(|| candidate.to_string())
}

fn words(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn escape_keyword(ident: String) -> String {
    if NON_RAW.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}
