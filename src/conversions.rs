//! Conversions from matched token text to primitive values.

use concept_grammar_model::language::PrimitiveKind;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashMap;

/// Builds the conversion expression from an expression yielding the token text.
pub type Conversion = fn(TokenStream) -> TokenStream;

/// Conversion table consulted for primitive bindings. A primitive without an
/// entry is matched but passes no value to the constructor.
#[derive(Debug, Clone)]
pub struct Conversions {
    table: HashMap<PrimitiveKind, Conversion>,
}

impl Conversions {
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    pub fn with(mut self, kind: PrimitiveKind, conversion: Conversion) -> Self {
        self.table.insert(kind, conversion);
        self
    }

    pub fn get(&self, kind: PrimitiveKind) -> Option<Conversion> {
        self.table.get(&kind).copied()
    }

    pub fn convert(&self, kind: PrimitiveKind, text: TokenStream) -> Option<TokenStream> {
        self.get(kind).map(|conv| conv(text))
    }
}

impl Default for Conversions {
    fn default() -> Self {
        Self::empty()
            .with(PrimitiveKind::Boolean, |text| {
                quote!(#text.parse::<bool>().unwrap())
            })
            .with(PrimitiveKind::Integer, |text| {
                quote!(#text.parse::<i64>().unwrap())
            })
            .with(PrimitiveKind::Real, |text| quote!(#text.parse::<f64>().unwrap()))
            .with(PrimitiveKind::String, |text| quote!(#text.to_string()))
    }
}

/// Rust type name a primitive is stored as.
pub fn primitive_type(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Boolean => "bool",
        PrimitiveKind::Integer => "i64",
        PrimitiveKind::Real => "f64",
        PrimitiveKind::String => "String",
    }
}
