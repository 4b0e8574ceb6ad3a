//! Translation of a [`Language`] into a [`Grammar`].
//!
//! One run walks the concepts once, top-level concepts first, and then keeps
//! producing rules for concepts that are only reachable through a HAS-A
//! property until every referenced rule exists. All state of a run lives in a
//! [`Context`] that is dropped when the run ends.

mod action;
mod concept;
mod list;
mod notation;

pub use list::list_grammar;

use crate::conversions::{primitive_type, Conversions};
use crate::error::{Error, Result};
use crate::naming;
use crate::tokens::TokenTable;
use crate::validator;
use concept_grammar_model::analysis;
use concept_grammar_model::grammar::{
    Grammar, ParserRule, RulePart, SequencePart, EOF_TOKEN, RETURN_VALUE,
};
use concept_grammar_model::language::{
    BindingPart, BindingTarget, ComponentKind, Concept, Language, NotationPart, Operator, Type,
};
use indexmap::IndexMap;
use syn::parse_quote;
use tracing::{debug, instrument, warn};

/// Knobs of a translation run.
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    /// Name of the generated grammar.
    pub parser_name: String,
    /// Module the generated parser lives in; becomes the grammar header.
    pub parser_package: String,
    /// Function every constructed object is passed through.
    pub resolver: syn::Path,
    pub conversions: Conversions,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            parser_name: "LanguageParser".to_string(),
            parser_package: "parser".to_string(),
            resolver: parse_quote!(::concept_grammar_rt::register),
            conversions: Conversions::default(),
        }
    }
}

impl TranslatorOptions {
    pub fn parser_name(mut self, name: impl Into<String>) -> Self {
        self.parser_name = name.into();
        self
    }

    pub fn parser_package(mut self, package: impl Into<String>) -> Self {
        self.parser_package = package.into();
        self
    }

    pub fn resolver(mut self, resolver: syn::Path) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn conversions(mut self, conversions: Conversions) -> Self {
        self.conversions = conversions;
        self
    }
}

pub struct Translator<'a> {
    language: &'a Language,
    options: TranslatorOptions,
}

impl<'a> Translator<'a> {
    pub fn new(language: &'a Language) -> Self {
        Self {
            language,
            options: TranslatorOptions::default(),
        }
    }

    pub fn options(mut self, options: TranslatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates the language and translates it. Either the whole grammar is
    /// produced or the first error is returned.
    #[instrument(skip_all, fields(language = %self.language.package, parser = %self.options.parser_name))]
    pub fn translate(&self) -> Result<Grammar> {
        validator::validate(self.language)?;
        Context::new(self.language, &self.options).run()
    }
}

/// A rule under construction.
pub(crate) struct Production {
    returns: String,
    alternatives: Vec<Alternative>,
}

/// One candidate alternative, remembering the operator it was produced for.
pub(crate) struct Alternative {
    operator: Option<Operator>,
    sequence: SequencePart,
}

pub(crate) struct Context<'a> {
    language: &'a Language,
    options: &'a TranslatorOptions,
    tokens: TokenTable,
    /// Rules in creation order, keyed by name.
    productions: IndexMap<String, Production>,
}

impl<'a> Context<'a> {
    fn new(language: &'a Language, options: &'a TranslatorOptions) -> Self {
        Self {
            language,
            options,
            tokens: TokenTable::new(),
            productions: IndexMap::new(),
        }
    }

    fn run(mut self) -> Result<Grammar> {
        let language = self.language;

        for token in &language.tokens {
            self.tokens.declare(&token.name, &token.regex)?;
        }
        for concept in &language.concepts {
            for notation in &concept.notations {
                for part in &notation.parts {
                    if let NotationPart::Token(text) = part {
                        self.tokens.token_ref(text)?;
                    }
                }
            }
        }

        for concept in language.top_level_concepts() {
            self.process_top_level(concept)?;
        }

        // IS-A hoisting leaves no rule for subconcepts, but a HAS-A property may still name one.
        while let Some(concept) = self.next_unproduced_reference()? {
            debug!(concept = %concept.name, "producing rule for referenced subconcept");
            self.process_top_level(concept)?;
        }

        let main = language
            .top_level_concepts()
            .next()
            .ok_or_else(|| Error::EmptyLanguage(language.package.clone()))?;
        let mut parser_rules = vec![self.main_rule(main)?];
        parser_rules.extend(self.productions.drain(..).map(|(name, production)| {
            ParserRule::new(
                name,
                production.returns,
                production
                    .alternatives
                    .into_iter()
                    .map(|alt| alt.sequence.into())
                    .collect(),
            )
        }));

        let grammar = Grammar {
            name: self.options.parser_name.clone(),
            header: format!("use {}::*;", self.options.parser_package),
            tokens: self.tokens.ordered(),
            parser_rules,
            lexical_rules: Vec::new(),
        };

        for (rule, missing) in analysis::undefined_rules(&grammar) {
            warn!(rule = %rule, missing = %missing, "reference to undefined rule");
        }
        for rule in analysis::unreachable_rules(&grammar) {
            debug!(rule = %rule, "rule is not reachable from the entry rule");
        }
        debug!(
            rules = grammar.parser_rules.len(),
            tokens = grammar.tokens.len(),
            "translation finished"
        );
        Ok(grammar)
    }

    /// First concept named by a property binding that has no rule yet.
    fn next_unproduced_reference(&self) -> Result<Option<&'a Concept>> {
        let language = self.language;
        for concept in &language.concepts {
            for notation in &concept.notations {
                for part in &notation.parts {
                    let NotationPart::Binding(BindingPart {
                        target: BindingTarget::Property(property),
                        ..
                    }) = part
                    else {
                        continue;
                    };
                    let Some(name) = property.ty.referenced_concept() else {
                        continue;
                    };
                    if !self.productions.contains_key(&naming::production_name(name)?) {
                        return language
                            .find_concept(name)
                            .map(Some)
                            .ok_or_else(|| Error::UnknownConcept(name.to_string()));
                    }
                }
            }
        }
        Ok(None)
    }

    /// `main : nt_x EOF`, so that trailing input fails the parse.
    fn main_rule(&self, concept: &Concept) -> Result<ParserRule> {
        let rule = naming::production_name(&concept.name)?;
        let label = format!("{}_1", rule);
        let sequence = SequencePart::new(vec![
            RulePart::nonterminal(rule).labeled(label.as_str()).into(),
            RulePart::terminal(EOF_TOKEN).into(),
        ])
        .with_action(action::forward(&label)?);
        Ok(ParserRule::new(
            naming::MAIN_RULE,
            self.returns(concept)?,
            vec![sequence.into()],
        ))
    }

    fn returns(&self, concept: &Concept) -> Result<String> {
        Ok(format!(
            "{} {}",
            naming::concept_type(&self.language.package, &concept.name)?,
            RETURN_VALUE
        ))
    }

    /// Rust type a value of `ty` is stored as.
    fn type_name(&self, ty: &Type) -> Result<String> {
        Ok(match ty {
            Type::Primitive(kind) => primitive_type(*kind).to_string(),
            Type::Reference(concept) => naming::concept_type(&self.language.package, concept)?,
            Type::Component(ComponentKind::Array, inner) => {
                format!("Box<[{}]>", self.type_name(inner)?)
            }
            Type::Component(ComponentKind::List, inner) => format!("Vec<{}>", self.type_name(inner)?),
            Type::Component(ComponentKind::Set, inner) => {
                format!("std::collections::HashSet<{}>", self.type_name(inner)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concept_grammar_model::language::{Notation, PartPattern, PrimitiveKind};

    fn language() -> Language {
        Language::new("crate::ast")
            .token("NUM", "[0-9]+")
            .concept(
                Concept::new("Num").notation(Notation::new(vec![NotationPart::property(
                    "value",
                    Type::Primitive(PrimitiveKind::Integer),
                )
                .with(PartPattern::Token("NUM".to_string()))])),
            )
    }

    #[test]
    fn test_type_names() {
        let language = language();
        let options = TranslatorOptions::default();
        let ctx = Context::new(&language, &options);
        assert_eq!(
            ctx.type_name(&Type::Primitive(PrimitiveKind::Real)).unwrap(),
            "f64"
        );
        assert_eq!(
            ctx.type_name(&Type::reference("expr.Add")).unwrap(),
            "crate::ast::expr::Add"
        );
        assert_eq!(
            ctx.type_name(&Type::array_of(Type::reference("Num"))).unwrap(),
            "Box<[crate::ast::Num]>"
        );
        assert_eq!(
            ctx.type_name(&Type::set_of(Type::reference("Num"))).unwrap(),
            "std::collections::HashSet<crate::ast::Num>"
        );
    }

    #[test]
    fn test_options_shape_header_and_name() {
        let language = language();
        let grammar = Translator::new(&language)
            .options(
                TranslatorOptions::default()
                    .parser_name("NumParser")
                    .parser_package("crate::generated"),
            )
            .translate()
            .unwrap();
        assert_eq!(grammar.name, "NumParser");
        assert_eq!(grammar.header, "use crate::generated::*;");
        assert!(grammar.lexical_rules.is_empty());
    }

    #[test]
    fn test_main_rule_forwards_value() {
        let language = language();
        let grammar = Translator::new(&language).translate().unwrap();
        let main = grammar.entry_rule().unwrap();
        assert_eq!(main.name, "main");
        assert_eq!(main.returns, "crate::ast::Num _retval");
        let rendered = main.to_string().replace(' ', "");
        assert!(rendered.contains("nt_num_1=nt_numEOF"), "{}", rendered);
        assert!(rendered.contains("_retval=ctx.nt_num_1._retval.clone();"));
    }
}
