use super::{action, Alternative, Context};
use crate::error::{Error, Result};
use crate::naming;
use concept_grammar_model::grammar::{Associativity, Part, RulePart, SequencePart};
use concept_grammar_model::language::{
    BindingPart, BindingTarget, Concept, NotationPart, OperatorAssociativity, Type,
};
use proc_macro2::TokenStream;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Parts and constructor arguments collected for one notation.
#[derive(Default)]
struct SequenceBuilder {
    parts: Vec<Part>,
    args: Vec<TokenStream>,
    counters: HashMap<String, usize>,
}

impl SequenceBuilder {
    /// `<rule>_<n>`, numbering each referenced rule separately.
    fn label(&mut self, rule: &str) -> String {
        let n = self.counters.entry(rule.to_string()).or_insert(0);
        *n += 1;
        format!("{}_{}", rule, n)
    }
}

impl<'a> Context<'a> {
    /// One alternative per notation of `concept`.
    pub(super) fn process_concrete(&mut self, concept: &'a Concept) -> Result<Vec<Alternative>> {
        let ty = naming::concept_path(&self.language.package, &concept.name)?;
        let operator = concept.operator().copied();
        let mut alts = Vec::new();

        for notation in &concept.notations {
            let mut seq = SequenceBuilder::default();
            for part in &notation.parts {
                match part {
                    NotationPart::Token(text) => {
                        let token = self.tokens.token_ref(text)?;
                        seq.parts.push(RulePart::terminal(token).into());
                    }
                    NotationPart::Binding(binding) => self.translate_binding(binding, &mut seq)?,
                }
            }

            if seq.parts.is_empty() {
                debug!(concept = %concept.name, "skipping notation without parts");
                continue;
            }
            if let Some(factory) = notation.factory() {
                return Err(Error::unsupported(format!(
                    "factory method `{}` on concept `{}`",
                    factory.method, concept.name
                )));
            }

            let mut sequence = SequencePart::new(seq.parts)
                .with_action(action::construct(&self.options.resolver, &ty, &seq.args));
            sequence.associativity = operator.map(|op| match op.associativity {
                // Auto is not inferred
                OperatorAssociativity::Left | OperatorAssociativity::Auto => Associativity::Left,
                OperatorAssociativity::Right => Associativity::Right,
            });
            alts.push(Alternative { operator, sequence });
        }

        Ok(alts)
    }

    fn translate_binding(&mut self, binding: &BindingPart, seq: &mut SequenceBuilder) -> Result<()> {
        if let BindingTarget::Local { name, ty } = &binding.target {
            if !matches!(ty, Type::Primitive(_)) {
                return Err(Error::unsupported(format!(
                    "local variable `{}` must have a primitive type",
                    name
                )));
            }
        }

        match binding.ty() {
            Type::Reference(concept) => {
                let rule = naming::production_name(concept)?;
                let label = seq.label(&rule);
                seq.args.push(action::value_of(&label)?);
                seq.parts.push(RulePart::nonterminal(rule).labeled(label).into());
            }
            Type::Primitive(kind) => {
                let token = self.primitive_token(binding);
                match self.options.conversions.get(*kind) {
                    Some(conversion) => {
                        let label = seq.label(&token);
                        seq.args.push(conversion(action::text_of(&label)?));
                        seq.parts.push(RulePart::terminal(token).labeled(label).into());
                    }
                    None => {
                        debug!(binding = binding.name(), "no conversion, token carries no value");
                        seq.parts.push(RulePart::terminal(token).into());
                    }
                }
            }
            Type::Component(kind, element) => {
                let rule = self.list_production(binding, *kind, element)?;
                let label = seq.label(&rule);
                seq.args.push(action::value_of(&label)?);
                seq.parts.push(RulePart::nonterminal(rule).labeled(label).into());
            }
        }
        Ok(())
    }

    /// Token a primitive binding reads: its `Token` pattern, else its own name.
    fn primitive_token(&self, binding: &BindingPart) -> String {
        let source = binding.token().unwrap_or(binding.name());
        match self.tokens.declared(source) {
            Some(name) => name.to_string(),
            None => {
                let name = naming::token_name(source);
                warn!(token = %name, binding = binding.name(), "primitive binding reads an undeclared token");
                name
            }
        }
    }
}
