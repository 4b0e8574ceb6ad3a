//! The token table built during one translation.

use crate::error::Result;
use crate::naming;
use crate::regex;
use concept_grammar_model::grammar::TokenDecl;
use indexmap::IndexMap;
use tracing::debug;

/// Tokens in first-registration order, keyed by final name.
#[derive(Debug, Default)]
pub struct TokenTable {
    entries: IndexMap<String, TokenDecl>,
    /// Declared token name -> registered name.
    declared: IndexMap<String, String>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token declared by the language under its source name.
    pub fn declare(&mut self, source_name: &str, regex: &str) -> Result<String> {
        let name = self.register(source_name, regex)?;
        self.declared.insert(source_name.to_string(), name.clone());
        Ok(name)
    }

    /// Registered name of a declared token.
    pub fn declared(&self, source_name: &str) -> Option<&str> {
        self.declared.get(source_name).map(String::as_str)
    }

    /// Resolves a token reference: a declared token by name, otherwise the
    /// text as a literal.
    pub fn token_ref(&mut self, text: &str) -> Result<String> {
        if let Some(name) = self.declared(text) {
            return Ok(name.to_string());
        }
        self.literal(text)
    }

    pub fn literal(&mut self, text: &str) -> Result<String> {
        self.register(text, &regex::encode_literal(text))
    }

    /// Adds a token and returns its final name. An identical pattern that is
    /// already registered is reused; a name taken by a different pattern gets
    /// `_` appended until it is free.
    pub fn register(&mut self, source_name: &str, regex: &str) -> Result<String> {
        if let Some(existing) = self.entries.values().find(|t| t.regex == regex) {
            return Ok(existing.name.clone());
        }

        let pattern = regex::translate(regex)?;
        let mut name = naming::token_name(source_name);
        while self.entries.contains_key(&name) {
            name.push('_');
        }
        debug!(token = %name, regex, "registered token");
        self.entries.insert(
            name.clone(),
            TokenDecl {
                name: name.clone(),
                regex: regex.to_string(),
                pattern,
            },
        );
        Ok(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declaration order for the lexer: acyclic patterns first, then cyclic
    /// ones, each group in registration order. The lexer prefers the earlier
    /// declaration on ties, so permissive patterns must not come first.
    pub fn ordered(&self) -> Vec<TokenDecl> {
        let (acyclic, cyclic): (Vec<_>, Vec<_>) = self
            .entries
            .values()
            .cloned()
            .partition(|t| !regex::is_cyclic(&t.regex));
        acyclic.into_iter().chain(cyclic).collect()
    }
}
