//! Grammar synthesis for concept-based language descriptions.
//!
//! A [`Language`](language::Language) (tokens, a concept hierarchy and the
//! notations of each concept) is translated into a [`Grammar`](grammar::Grammar):
//! an ordered token table plus parser rules with embedded actions, ready for a
//! parser-generator backend.
//!
//! ```
//! use concept_grammar::language::{Concept, Language, Notation, NotationPart, PartPattern, PrimitiveKind, Type};
//!
//! let language = Language::new("crate::ast").token("NUM", "[0-9]+").concept(
//!     Concept::new("Num").notation(Notation::new(vec![NotationPart::property(
//!         "value",
//!         Type::Primitive(PrimitiveKind::Integer),
//!     )
//!     .with(PartPattern::Token("NUM".into()))])),
//! );
//! let grammar = concept_grammar::translate(&language).unwrap();
//! assert_eq!(grammar.entry_rule().unwrap().name, "main");
//! ```

mod conversions;
mod error;
pub mod naming;
pub mod regex;
mod tokens;
mod translator;
mod validator;

#[cfg(feature = "testing")]
pub mod testing;

pub use concept_grammar_model::{analysis, grammar, language};
pub use conversions::{primitive_type, Conversion, Conversions};
pub use error::{Error, Result};
pub use tokens::TokenTable;
pub use translator::{list_grammar, Translator, TranslatorOptions};
pub use validator::validate;

/// Translates `language` with default options.
pub fn translate(language: &language::Language) -> Result<grammar::Grammar> {
    Translator::new(language).translate()
}
