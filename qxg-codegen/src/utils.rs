use convert_case::{Case, Casing};
use proc_macro2::{Ident, Span};

/// Turns an arbitrary XML local name into a valid Rust identifier, prefixing
/// with `__` when it starts with a digit or collides with a keyword.
pub fn safe_ident(val: &str) -> (Ident, bool) {
    let mut val = val.to_case(Case::Snake);
    let mut changed = false;
    if val.starts_with(|c: char| c.is_ascii_digit()) || is_rust_keyword(&val) {
        val = format!("__{val}");
        changed = true;
    }

    (Ident::new(&val, Span::call_site()), changed)
}

/// Like [`safe_ident`] but preserves the exact casing, used for type names
/// which are already expected to be `UpperCamelCase` in the schema.
pub fn type_ident(val: &str) -> Ident {
    let val = val.to_case(Case::UpperCamel);
    if val.starts_with(|c: char| c.is_ascii_digit()) {
        Ident::new(&format!("T{val}"), Span::call_site())
    } else {
        Ident::new(&val, Span::call_site())
    }
}

fn is_rust_keyword(val: &str) -> bool {
    matches!(
        val,
        "as" | "break"
            | "const"
            | "continue"
            | "crate"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "Self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "async"
            | "await"
            | "dyn"
    )
}

/// The title-cased base name of a file path, used to default `class_name`
/// when no `qxg:config` is present.
pub fn title_case_file_stem(path: &std::path::Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Schema")
        .to_case(Case::UpperCamel)
}

/// Defaults an XML local element/attribute name to its host field name:
/// `lowerFirst(name)`.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
