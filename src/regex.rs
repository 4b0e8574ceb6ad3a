//! Re-quoting of token regexes for the target lexer syntax.
//!
//! `aa[abc]+(bb|cc)` becomes `'aa'[abc]+('bb'|'cc')`: runs of literal
//! characters are single-quoted, character classes are copied verbatim and
//! every other special character passes through untouched. Quantifiers and
//! alternation are assumed to already mean the same thing in both syntaxes.
//!
//! Literal text is copied as is, so an unescaped `'` ends up inside the
//! quotes unchanged and closes the quoted run early in the target syntax.
//! Patterns that need a literal quote must escape it in the source regex:
//! `\'` is kept as `\'`.

use crate::error::{Error, Result};
use std::iter::Peekable;
use std::str::Chars;

const SPECIAL: &str = "[]()*+.?|";

fn is_special(c: char) -> bool {
    SPECIAL.contains(c)
}

fn is_literal_start(c: char) -> bool {
    !is_special(c) || c == '\\'
}

/// Translates a source regex into the target lexer's pattern syntax.
pub fn translate(regex: &str) -> Result<String> {
    Translator::new(regex).run()
}

struct Translator<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    out: String,
}

impl<'a> Translator<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            out: String::with_capacity(source.len() + 2),
        }
    }

    fn run(mut self) -> Result<String> {
        while let Some(&c) = self.chars.peek() {
            if is_literal_start(c) {
                self.literal_run()?;
            } else {
                let c = self.consume("special character")?;
                self.out.push(c);
                if c == '[' {
                    self.char_class()?;
                }
            }
        }
        Ok(self.out)
    }

    fn consume(&mut self, expecting: &str) -> Result<char> {
        self.chars.next().ok_or_else(|| Error::MalformedPattern {
            pattern: self.source.to_string(),
            reason: format!("unexpected end of pattern, expected {}", expecting),
        })
    }

    fn literal_run(&mut self) -> Result<()> {
        self.out.push('\'');
        while let Some(&c) = self.chars.peek() {
            if !is_literal_start(c) {
                break;
            }
            self.chars.next();
            if c == '\\' {
                let escaped = self.consume("escaped character")?;
                // Special characters need no escape inside quotes.
                if !is_special(escaped) {
                    self.out.push('\\');
                }
                self.out.push(escaped);
            } else {
                self.out.push(c);
            }
        }
        self.out.push('\'');
        Ok(())
    }

    /// Copies everything up to and including the closing `]`.
    fn char_class(&mut self) -> Result<()> {
        loop {
            let c = self.consume("`]`")?;
            self.out.push(c);
            match c {
                ']' => return Ok(()),
                '\\' => {
                    let escaped = self.consume("escaped character")?;
                    self.out.push(escaped);
                }
                _ => {}
            }
        }
    }
}

/// Encodes literal text as a regex matching exactly that text.
pub fn encode_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if is_special(c) || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// True if the regex can match unboundedly long input, i.e. it repeats
/// something with `*`, `+` or an open `{n,}` bound outside a character class.
/// Such patterns must be declared after the fixed ones.
pub fn is_cyclic(regex: &str) -> bool {
    let mut chars = regex.chars().peekable();
    let mut in_class = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '*' | '+' if !in_class => return true,
            '{' if !in_class => {
                let bound: String = chars.by_ref().take_while(|&c| c != '}').collect();
                if let Some((min, max)) = bound.split_once(',') {
                    if !min.is_empty() && min.chars().all(|c| c.is_ascii_digit()) && max.is_empty() {
                        return true;
                    }
                }
            }
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_are_quoted() {
        assert_eq!(translate("while").unwrap(), "'while'");
        assert_eq!(translate("").unwrap(), "");
    }

    #[test]
    fn test_mixed_pattern() {
        assert_eq!(
            translate("aa[abc]+(bb|cc)").unwrap(),
            "'aa'[abc]+('bb'|'cc')"
        );
    }

    #[test]
    fn test_char_class_passes_through() {
        assert_eq!(translate("[abc]+").unwrap(), "[abc]+");
        assert_eq!(translate("[a\\]b]").unwrap(), "[a\\]b]");
        assert_eq!(translate("[0-9]*\\.[0-9]+").unwrap(), "[0-9]*'.'[0-9]+");
    }

    #[test]
    fn test_escapes() {
        // escaped special: backslash dropped inside the literal run
        assert_eq!(translate("a\\+b").unwrap(), "'a+b'");
        // escaped ordinary character keeps its backslash
        assert_eq!(translate("\\n").unwrap(), "'\\n'");
        assert_eq!(translate("\\\\").unwrap(), "'\\\\'");
    }

    #[test]
    fn test_single_quote() {
        // escaped in the source: the backslash survives and the run stays closed
        assert_eq!(translate("it\\'s").unwrap(), "'it\\'s'");
        // unescaped: copied verbatim like any other literal character
        assert_eq!(translate("it's").unwrap(), "'it's'");
        assert_eq!(translate("['\"]").unwrap(), "['\"]");
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(translate("[abc"), Err(Error::MalformedPattern { .. })));
        assert!(matches!(translate("a\\"), Err(Error::MalformedPattern { .. })));
        assert!(matches!(translate("[a\\"), Err(Error::MalformedPattern { .. })));
    }

    #[test]
    fn test_encode_literal() {
        assert_eq!(encode_literal("+"), "\\+");
        assert_eq!(encode_literal("("), "\\(");
        assert_eq!(encode_literal("if"), "if");
        assert_eq!(translate(&encode_literal("(*)")).unwrap(), "'(*)'");
        assert_eq!(translate(&encode_literal("a\\b")).unwrap(), "'a\\\\b'");
    }

    #[test]
    fn test_cyclic_patterns() {
        assert!(is_cyclic("[0-9]+"));
        assert!(is_cyclic("[a-z][a-z0-9]*"));
        assert!(is_cyclic("a{2,}"));
        assert!(!is_cyclic("a{2,3}"));
        assert!(!is_cyclic("\\+"));
        assert!(!is_cyclic("[+*]"));
        assert!(!is_cyclic("while"));
        assert!(!is_cyclic("ab?"));
    }
}
