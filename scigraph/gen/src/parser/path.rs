//! Path template placeholders.
//!
//! Templates use `{param}` syntax. Placeholders may share a segment with
//! literal text (`/graph/{id}.json`).

/// Extracts placeholder names from a path template, in order.
///
/// ## Examples
///
/// ```
/// use scigraph_gen::parser::extract_path_params;
///
/// assert_eq!(extract_path_params("/vocabulary"), Vec::<&str>::new());
/// assert_eq!(extract_path_params("/term/{id}"), vec!["id"]);
/// assert_eq!(
///     extract_path_params("/graph/reachablefrom/{id}/{depth}.json"),
///     vec!["id", "depth"]
/// );
/// ```
pub fn extract_path_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut pos = 0;

    for (idx, c) in path.char_indices() {
        if c == '{' {
            pos = idx + 1;
        } else if c == '}' && pos > 0 {
            let param = &path[pos..idx];
            if !param.is_empty() {
                params.push(param);
            }
            pos = 0;
        }
    }

    params
}

/// Checks that braces in a template are balanced and non-nested.
///
/// Returns a description of the first problem found.
pub fn check_template(path: &str) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err(format!("path '{path}' must start with '/'"));
    }
    let mut open: Option<usize> = None;
    for (idx, c) in path.char_indices() {
        match (c, open) {
            ('{', None) => open = Some(idx),
            ('{', Some(_)) => return Err(format!("nested '{{' at byte {idx} in '{path}'")),
            ('}', Some(start)) if idx == start + 1 => {
                return Err(format!("empty placeholder at byte {start} in '{path}'"));
            }
            ('}', Some(_)) => open = None,
            ('}', None) => return Err(format!("unmatched '}}' at byte {idx} in '{path}'")),
            _ => {}
        }
    }
    match open {
        Some(start) => Err(format!("unclosed '{{' at byte {start} in '{path}'")),
        None => Ok(()),
    }
}
