//! Structural checks on a [`Language`] before it is translated.

use crate::error::{Error, Result};
use crate::naming;
use concept_grammar_model::language::{BindingPart, BindingTarget, Concept, Language, NotationPart, Type};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Rejects languages the translator cannot handle. Checks run in a fixed
/// order, so the same language always fails with the same error.
pub fn validate(language: &Language) -> Result<()> {
    if language.top_level_concepts().next().is_none() {
        return Err(Error::EmptyLanguage(language.package.clone()));
    }

    let mut rules = HashMap::new();
    for concept in &language.concepts {
        let rule = naming::production_name(&concept.name)?;
        naming::concept_type(&language.package, &concept.name)?;
        if let Some(other) = rules.insert(rule.clone(), concept.name.as_str()) {
            return Err(Error::unsupported(format!(
                "concepts `{}` and `{}` both map to rule `{}`",
                other, concept.name, rule
            )));
        }

        if let Some(parent) = &concept.parent {
            if language.find_concept(parent).is_none() {
                return Err(Error::UnknownParent {
                    concept: concept.name.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    for concept in &language.concepts {
        check_acyclic(language, concept)?;
        for property in &concept.properties {
            check_references(language, &property.ty)?;
        }
        for notation in &concept.notations {
            for part in &notation.parts {
                if let NotationPart::Binding(binding) = part {
                    check_binding(language, binding)?;
                }
            }
        }
    }

    debug!(concepts = language.concepts.len(), tokens = language.tokens.len(), "language is valid");
    Ok(())
}

fn check_acyclic(language: &Language, concept: &Concept) -> Result<()> {
    let mut seen = HashSet::new();
    let mut current = Some(concept);
    while let Some(c) = current {
        if !seen.insert(c.name.as_str()) {
            return Err(Error::InheritanceCycle(concept.name.clone()));
        }
        current = c.parent.as_deref().and_then(|p| language.find_concept(p));
    }
    Ok(())
}

fn check_references(language: &Language, ty: &Type) -> Result<()> {
    match ty {
        Type::Primitive(_) => Ok(()),
        Type::Reference(name) => language
            .find_concept(name)
            .map(|_| ())
            .ok_or_else(|| Error::UnknownConcept(name.clone())),
        Type::Component(_, inner) => check_references(language, inner),
    }
}

fn check_binding(language: &Language, binding: &BindingPart) -> Result<()> {
    let ty = binding.ty();
    check_references(language, ty)?;

    if let BindingTarget::Local { name, .. } = &binding.target {
        if !matches!(ty, Type::Primitive(_)) {
            return Err(Error::unsupported(format!(
                "local variable `{}` must have a primitive type",
                name
            )));
        }
    }

    if let Type::Component(_, inner) = ty {
        let nested = match inner.as_ref() {
            Type::Reference(_) => None,
            Type::Primitive(_) => Some("primitive"),
            Type::Component(..) => Some("component"),
        };
        if let Some(kind) = nested {
            return Err(Error::unsupported(format!(
                "`{}`: component types of {} types are not supported",
                binding.name(),
                kind
            )));
        }
    }

    if let Some(range) = binding.range() {
        if range.max.is_some_and(|max| max < range.min) {
            return Err(Error::unsupported(format!(
                "`{}`: range minimum {} exceeds maximum {:?}",
                binding.name(),
                range.min,
                range.max
            )));
        }
    }
    Ok(())
}
