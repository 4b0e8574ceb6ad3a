//! Identifiers in the generated grammar.

use crate::error::{Error, Result};
use proc_macro2::Ident;

pub const TOKEN_PREFIX: &str = "T_";
pub const PRODUCTION_PREFIX: &str = "nt_";

/// Entry rule name. Cannot clash with productions, which are all prefixed.
pub const MAIN_RULE: &str = "main";

/// Label of the operator alternation in merged operator rules.
pub const OPERATOR_LABEL: &str = "op";

/// Token name for arbitrary source text: `T_` plus an uppercase spelling
/// where every non-word character is written out (`+=` -> `T_PLUS_EQ`).
pub fn token_name(text: &str) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut word = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            word.push(c.to_ascii_uppercase());
        } else {
            if !word.is_empty() {
                segments.push(std::mem::take(&mut word));
            }
            segments.push(symbol_name(c));
        }
    }
    if !word.is_empty() {
        segments.push(word);
    }
    format!("{}{}", TOKEN_PREFIX, segments.join("_"))
}

fn symbol_name(c: char) -> String {
    let name = match c {
        '+' => "PLUS",
        '-' => "MINUS",
        '*' => "STAR",
        '/' => "SLASH",
        '\\' => "BACKSLASH",
        '%' => "PERCENT",
        '^' => "CARET",
        '=' => "EQ",
        '<' => "LT",
        '>' => "GT",
        '!' => "BANG",
        '?' => "QUESTION",
        '.' => "DOT",
        ',' => "COMMA",
        ';' => "SEMI",
        ':' => "COLON",
        '(' => "LPAREN",
        ')' => "RPAREN",
        '[' => "LBRACK",
        ']' => "RBRACK",
        '{' => "LBRACE",
        '}' => "RBRACE",
        '&' => "AMP",
        '|' => "PIPE",
        '~' => "TILDE",
        '#' => "HASH",
        '@' => "AT",
        '$' => "DOLLAR",
        '\'' => "QUOTE",
        '"' => "DQUOTE",
        '`' => "BACKTICK",
        ' ' => "SPACE",
        '\t' => "TAB",
        '\n' => "NEWLINE",
        other => return format!("U{:04X}", other as u32),
    };
    name.to_string()
}

/// Rule name for a concept: `nt_` plus the lowercased name, dots as underscores.
pub fn production_name(concept: &str) -> Result<String> {
    let name = format!(
        "{}{}",
        PRODUCTION_PREFIX,
        concept.replace('.', "_").to_lowercase()
    );
    ident(&name)?;
    Ok(name)
}

/// Parses `name` as an identifier. Rejects reserved words and anything
/// `format_ident!` would panic on.
pub fn ident(name: &str) -> Result<Ident> {
    syn::parse_str::<Ident>(name).map_err(|_| Error::InvalidIdentifier(name.to_string()))
}

/// Type name of a concept: `<package>::<concept>`, dots as `::`.
pub fn concept_type(package: &str, concept: &str) -> Result<String> {
    let path = format!("{}::{}", package, concept.replace('.', "::"));
    syn::parse_str::<syn::Path>(&path).map_err(|_| Error::InvalidIdentifier(path.clone()))?;
    Ok(path)
}

/// [`concept_type`] as a path for use in actions.
pub fn concept_path(package: &str, concept: &str) -> Result<syn::Path> {
    let path = concept_type(package, concept)?;
    syn::parse_str::<syn::Path>(&path).map_err(|_| Error::InvalidIdentifier(path))
}
