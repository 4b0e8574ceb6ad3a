use super::{action, Alternative, Context, Production};
use crate::error::{Error, Result};
use crate::naming;
use concept_grammar_model::grammar::{Part, RulePart, SequencePart, RETURN_VALUE};
use concept_grammar_model::language::{BindingPart, ComponentKind, Range, Type};
use tracing::debug;

impl<'a> Context<'a> {
    /// Emits an auxiliary rule matching a list of `element` and returns its name.
    pub(super) fn list_production(
        &mut self,
        binding: &BindingPart,
        kind: ComponentKind,
        element: &Type,
    ) -> Result<String> {
        let concept = match element {
            Type::Reference(concept) => concept,
            Type::Primitive(_) => {
                return Err(Error::unsupported(format!(
                    "`{}`: component types of primitive types are not supported",
                    binding.name()
                )))
            }
            Type::Component(..) => {
                return Err(Error::unsupported(format!(
                    "`{}`: component types of component types are not supported",
                    binding.name()
                )))
            }
        };

        let element_rule = naming::production_name(concept)?;
        let mut name = format!("{}_list", element_rule);
        while self.rule_taken(&name)? {
            name.push('_');
        }

        let range = binding.range().unwrap_or_default();
        let separator = binding
            .separator()
            .map(|sep| self.tokens.token_ref(sep))
            .transpose()?;

        let sequence = list_grammar(&element_rule, range, separator.as_deref())
            .with_action(action::collect(&element_rule, kind)?);
        let list_type = Type::Component(kind, Box::new(element.clone()));
        let returns = format!("{} {}", self.type_name(&list_type)?, RETURN_VALUE);

        debug!(rule = %name, min = range.min, max = ?range.max, separator = ?separator, "list production");
        self.productions.insert(
            name.clone(),
            Production {
                returns,
                alternatives: vec![Alternative {
                    operator: None,
                    sequence,
                }],
            },
        );
        Ok(name)
    }

    /// True if `name` is already emitted or belongs to a concept of the language.
    fn rule_taken(&self, name: &str) -> Result<bool> {
        if self.productions.contains_key(name) {
            return Ok(true);
        }
        for concept in &self.language.concepts {
            if naming::production_name(&concept.name)? == name {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Grammar for `range` repetitions of `element`, optionally separated.
/// No action is attached.
pub fn list_grammar(element: &str, range: Range, separator: Option<&str>) -> SequencePart {
    let elem = || Part::from(RulePart::nonterminal(element));
    if range.max == Some(0) {
        return SequencePart::new(Vec::new());
    }

    let mut parts = Vec::new();
    match (separator, range.max) {
        (None, None) => {
            if range.min == 0 {
                parts.push(Part::zero_or_more(elem()));
            } else {
                parts.extend((1..range.min).map(|_| elem()));
                parts.push(Part::one_or_more(elem()));
            }
        }
        (None, Some(max)) => {
            parts.extend((0..range.min).map(|_| elem()));
            parts.extend((range.min..max).map(|_| Part::zero_or_one(elem())));
        }
        (Some(sep), max) => {
            let pair = || Part::from(SequencePart::new(vec![RulePart::terminal(sep).into(), elem()]));
            // the first element is matched without a separator
            let mandatory = range.min.max(1);
            parts.push(elem());
            parts.extend((1..mandatory).map(|_| pair()));
            match max {
                None => parts.push(Part::zero_or_more(pair())),
                Some(max) => parts.extend((mandatory..max).map(|_| Part::zero_or_one(pair()))),
            }
            if range.min == 0 {
                parts = vec![Part::zero_or_one(SequencePart::new(parts))];
            }
        }
    }
    SequencePart::new(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use concept_grammar_model::grammar::PartTree;

    fn render(range: Range, separator: Option<&str>) -> String {
        PartTree::from(Part::from(list_grammar("e", range, separator))).to_string()
    }

    #[test]
    fn test_unbounded_without_separator() {
        assert_eq!(render(Range::at_least(0), None), "e*");
        assert_eq!(render(Range::at_least(1), None), "e+");
        assert_eq!(render(Range::at_least(3), None), "e e e+");
    }

    #[test]
    fn test_bounded_without_separator() {
        assert_eq!(render(Range::between(1, 3), None), "e e? e?");
        assert_eq!(render(Range::between(2, 2), None), "e e");
        assert_eq!(render(Range::between(0, 2), None), "e? e?");
    }

    #[test]
    fn test_unbounded_with_separator() {
        assert_eq!(render(Range::at_least(0), Some("S")), "(e (S e)*)?");
        assert_eq!(render(Range::at_least(1), Some("S")), "e (S e)*");
        assert_eq!(render(Range::at_least(3), Some("S")), "e (S e) (S e) (S e)*");
    }

    #[test]
    fn test_bounded_with_separator() {
        assert_eq!(render(Range::between(2, 2), Some("S")), "e (S e)");
        assert_eq!(render(Range::between(0, 3), Some("S")), "(e (S e)? (S e)?)?");
        assert_eq!(render(Range::between(1, 2), Some("S")), "e (S e)?");
    }

    #[test]
    fn test_zero_max_matches_nothing() {
        assert_eq!(render(Range::between(0, 0), Some("S")), "");
        assert!(list_grammar("e", Range::between(0, 0), None).parts.is_empty());
    }

    #[test]
    fn test_separator_is_terminal() {
        let seq = list_grammar("e", Range::between(2, 2), Some("T_COMMA"));
        let Part::Sequence(pair) = &seq.parts[1] else {
            panic!("expected separator pair");
        };
        assert!(pair.parts[0].as_rule().unwrap().terminal);
        assert!(!pair.parts[1].as_rule().unwrap().terminal);
    }
}
