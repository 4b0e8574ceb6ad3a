//! The grammar produced by the translator, ready for a code generator.

mod part;

pub use part::*;

use std::fmt;

/// Name of the per-rule return value in generated actions.
pub const RETURN_VALUE: &str = "_retval";

/// Marker token the generated parser emits at end of input.
pub const EOF_TOKEN: &str = "EOF";

#[derive(Debug, Clone)]
pub struct Grammar {
    pub name: String,
    /// Namespace declaration placed at the top of the generated parser.
    pub header: String,
    /// Tokens in final declaration order.
    pub tokens: Vec<TokenDecl>,
    pub parser_rules: Vec<ParserRule>,
    /// Always empty; lexing is delegated to an external lexer.
    pub lexical_rules: Vec<LexicalRule>,
}

impl Grammar {
    /// Forward declarations, in emission order.
    pub fn token_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.name.as_str())
    }

    pub fn rule(&self, name: &str) -> Option<&ParserRule> {
        self.parser_rules.iter().find(|r| r.name == name)
    }

    /// The synthesized entry rule, always emitted first.
    pub fn entry_rule(&self) -> Option<&ParserRule> {
        self.parser_rules.first()
    }
}

/// A registered token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDecl {
    pub name: String,
    /// The source regex as declared (or encoded from a literal).
    pub regex: String,
    /// The regex re-quoted for the target lexer syntax.
    pub pattern: String,
}

#[derive(Debug, Clone)]
pub struct ParserRule {
    pub name: String,
    /// Return value declaration, e.g. `crate::calc::Expr _retval`.
    pub returns: String,
    /// Rooted at an [`PartKind::Alternative`] node.
    pub body: PartTree,
}

impl ParserRule {
    pub fn new(name: impl Into<String>, returns: impl Into<String>, alternatives: Vec<Part>) -> Self {
        Self {
            name: name.into(),
            returns: returns.into(),
            body: PartTree::from(Part::Alternative(AlternativePart::new(alternatives))),
        }
    }

    /// The top-level alternatives of the rule.
    pub fn alternatives(&self) -> &[PartId] {
        self.body.children(self.body.root())
    }
}

impl fmt::Display for ParserRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} returns [{}]", self.name, self.returns)?;
        for (i, alt) in self.alternatives().iter().enumerate() {
            let sep = if i == 0 { ':' } else { '|' };
            write!(f, "    {} ", sep)?;
            self.body.fmt_node(*alt, false, f)?;
            writeln!(f)?;
        }
        write!(f, "    ;")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalRule {
    pub name: String,
    pub pattern: String,
}
