//! Naming conventions for tables, foreign keys and join tables
//!
//! `CollabPost` lives in `collab_posts`, is referenced by `collab_post_id`, and
//! shares the `authors_collab_posts` join table with `Author`.

/// Convert PascalCase to snake_case, keeping acronyms together
/// Example: "CollabPost" -> "collab_post", "HTTPServer" -> "http_server"
pub fn snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// English plural of a snake_case word, covering the regular cases
///
/// Words already ending in a plural `s` are returned unchanged, so declaring
/// `has_many("comments")` and `has_many("comment")` name the same table.
/// Irregular plurals (`person`, `child`) are not handled.
pub fn pluralize(word: &str) -> String {
    if word.ends_with("us") {
        return format!("{word}es");
    }
    if word.is_empty() || (word.ends_with('s') && !word.ends_with("ss")) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if word.ends_with("ss") || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Inverse of [`pluralize`] for the same regular cases
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["sses", "xes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    // "statuses" -> "status", but "houses" -> "house"
    if let Some(stem) = word.strip_suffix("uses") {
        if stem.ends_with(|c: char| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')) {
            return format!("{stem}us");
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.ends_with(['s', 'u']) => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Table name for an entity type name: "CollabPost" -> "collab_posts"
pub fn tableize(type_name: &str) -> String {
    pluralize(&snake_case(type_name))
}

/// Foreign key column referencing an entity type: "CollabPost" -> "collab_post_id"
pub fn foreign_key(type_name: &str) -> String {
    format!("{}_id", snake_case(type_name))
}

/// Join table shared by two tables, named from both in lexical order
pub fn join_table_name(left: &str, right: &str) -> String {
    if left <= right {
        format!("{left}_{right}")
    } else {
        format!("{right}_{left}")
    }
}
