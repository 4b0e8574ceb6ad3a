use super::{action, Alternative, Context, Production};
use crate::error::{Error, Result};
use crate::naming;
use concept_grammar_model::grammar::{AlternativePart, Part, RulePart, SequencePart};
use concept_grammar_model::language::Concept;
use indexmap::map::Entry;
use itertools::Itertools;
use std::cmp::Reverse;
use tracing::debug;

impl<'a> Context<'a> {
    /// Emits the single rule of `concept`. An abstract concept gets the
    /// alternatives of all its concrete descendants, so no rule refers to a
    /// subconcept rule that could lead back to it.
    pub(super) fn process_top_level(&mut self, concept: &'a Concept) -> Result<()> {
        let mut candidates = Vec::new();
        if concept.is_abstract() {
            for leaf in self.leaves(concept) {
                candidates.extend(self.process_concrete(leaf)?);
            }
        } else {
            candidates = self.process_concrete(concept)?;
        }

        let (operators, remaining): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|alt| alt.operator.is_some());

        let mut alternatives = Vec::new();
        if let Some(par) = concept.parentheses() {
            alternatives.push(self.parenthesized(concept, &par.left, &par.right)?);
        }

        // Higher priority first; the target grammar prefers earlier alternatives.
        let groups = operators
            .into_iter()
            .sorted_by_key(|alt| Reverse(priority(alt)))
            .chunk_by(priority);
        for (level, group) in &groups {
            alternatives.push(merge_operator_alternatives(level, group.collect())?);
        }
        alternatives.extend(remaining);

        let name = naming::production_name(&concept.name)?;
        let returns = self.returns(concept)?;
        debug!(rule = %name, alternatives = alternatives.len(), "production");
        match self.productions.entry(name) {
            Entry::Occupied(entry) => Err(Error::unsupported(format!(
                "concept `{}` maps to rule `{}`, which already exists",
                concept.name,
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                entry.insert(Production {
                    returns,
                    alternatives,
                });
                Ok(())
            }
        }
    }

    /// Concrete descendants without subconcepts, depth first in declaration order.
    fn leaves(&self, root: &'a Concept) -> Vec<&'a Concept> {
        let language = self.language;
        let mut leaves = Vec::new();
        let mut stack = vec![root];
        while let Some(concept) = stack.pop() {
            let children: Vec<_> = language.subconcepts(&concept.name).collect();
            if children.is_empty() {
                leaves.push(concept);
            } else {
                stack.extend(children.into_iter().rev());
            }
        }
        leaves
    }

    /// `left nt_x right`, forwarding the inner value.
    fn parenthesized(&mut self, concept: &Concept, left: &str, right: &str) -> Result<Alternative> {
        let left = self.tokens.token_ref(left)?;
        let right = self.tokens.token_ref(right)?;
        let rule = naming::production_name(&concept.name)?;
        let label = format!("{}_1", rule);
        let sequence = SequencePart::new(vec![
            RulePart::terminal(left).into(),
            RulePart::nonterminal(rule).labeled(label.as_str()).into(),
            RulePart::terminal(right).into(),
        ])
        .with_action(action::forward(&label)?);
        Ok(Alternative {
            operator: None,
            sequence,
        })
    }
}

fn priority(alt: &Alternative) -> i32 {
    alt.operator.map(|op| op.priority).unwrap_or_default()
}

/// Folds operator alternatives of one priority into a single alternative
/// whose operator token is an `op=(..)` alternation, dispatching to the
/// original actions by the matched token.
fn merge_operator_alternatives(priority: i32, mut alts: Vec<Alternative>) -> Result<Alternative> {
    if alts.len() < 2 {
        return alts
            .pop()
            .ok_or_else(|| Error::unsupported("empty operator group"));
    }

    let cannot_merge = |reason: &str| {
        Error::unsupported(format!(
            "cannot merge operator alternatives of priority {}: {}",
            priority, reason
        ))
    };

    let len = alts[0].sequence.parts.len();
    if alts.iter().any(|alt| alt.sequence.parts.len() != len) {
        return Err(cannot_merge("different number of parts"));
    }

    let mut differing = None;
    for i in 0..len {
        let first = &alts[0].sequence.parts[i];
        if alts.iter().any(|alt| !alt.sequence.parts[i].same_kind(first)) {
            return Err(cannot_merge("different part kinds at the same position"));
        }
        if alts.iter().all(|alt| alt.sequence.parts[i].structure_eq(first)) {
            continue;
        }
        let all_terminals = alts
            .iter()
            .all(|alt| alt.sequence.parts[i].as_rule().is_some_and(|r| r.terminal));
        if !all_terminals {
            return Err(cannot_merge("alternatives differ in a nonterminal"));
        }
        // The `op=(..)` alternation keeps no per-token label for the actions to read.
        if alts
            .iter()
            .any(|alt| alt.sequence.parts[i].as_rule().is_some_and(|r| r.label.is_some()))
        {
            return Err(cannot_merge("the differing token is bound to a value"));
        }
        if differing.replace(i).is_some() {
            return Err(cannot_merge("alternatives differ in more than one token"));
        }
    }
    let position = differing.ok_or_else(|| cannot_merge("alternatives are identical"))?;

    let tokens: Vec<String> = alts
        .iter()
        .filter_map(|alt| alt.sequence.parts[position].as_rule())
        .map(|r| r.name.clone())
        .collect();
    if !tokens.iter().all_unique() {
        return Err(cannot_merge("an operator token is used twice"));
    }
    let actions: Vec<_> = alts
        .iter()
        .map(|alt| alt.sequence.action.clone().unwrap_or_default())
        .collect();
    let dispatch = action::dispatch(&tokens, &actions)?;
    debug!(priority, operators = ?tokens, "merged operator alternatives");

    let mut merged = alts.swap_remove(0);
    let mut op = AlternativePart::new(
        tokens
            .iter()
            .map(|token| RulePart::terminal(token.as_str()).into())
            .collect(),
    );
    op.label = Some(naming::OPERATOR_LABEL.to_string());
    merged.sequence.parts[position] = Part::from(op);
    merged.sequence.action = Some(dispatch);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TranslatorOptions;
    use concept_grammar_model::language::{
        Language, Notation, NotationPart, Operator, OperatorAssociativity,
    };
    use quote::quote;

    fn binary(op: &str, code: proc_macro2::TokenStream) -> Alternative {
        Alternative {
            operator: Some(Operator::new(1, OperatorAssociativity::Left)),
            sequence: SequencePart::new(vec![
                RulePart::nonterminal("nt_expr").labeled("nt_expr_1").into(),
                RulePart::terminal(op).into(),
                RulePart::nonterminal("nt_expr").labeled("nt_expr_2").into(),
            ])
            .with_action(code),
        }
    }

    #[test]
    fn test_single_alternative_is_unchanged() {
        let merged = merge_operator_alternatives(1, vec![binary("T_PLUS", quote!(a();))]).unwrap();
        assert_eq!(merged.sequence.parts[1].as_rule().unwrap().name, "T_PLUS");
    }

    #[test]
    fn test_merge_builds_labelled_alternation() {
        let merged = merge_operator_alternatives(
            1,
            vec![binary("T_PLUS", quote!(a();)), binary("T_MINUS", quote!(b();))],
        )
        .unwrap();
        let Part::Alternative(op) = &merged.sequence.parts[1] else {
            panic!("operator position was not merged");
        };
        assert_eq!(op.label.as_deref(), Some("op"));
        assert_eq!(op.alternatives.len(), 2);
        let action = merged.sequence.action.unwrap().to_string();
        assert!(action.contains("T_PLUS"));
        assert!(action.contains("T_MINUS"));
    }

    #[test]
    fn test_duplicate_operator_token_is_rejected() {
        let err = merge_operator_alternatives(
            1,
            vec![binary("T_PLUS", quote!(a();)), binary("T_PLUS", quote!(b();))],
        );
        assert!(matches!(err, Err(Error::UnsupportedConstruct(_))));
    }

    #[test]
    fn test_differing_nonterminal_is_rejected() {
        let mut other = binary("T_PLUS", quote!(b();));
        other.sequence.parts[2] = RulePart::nonterminal("nt_term").into();
        let err = merge_operator_alternatives(1, vec![binary("T_MINUS", quote!(a();)), other]);
        assert!(matches!(err, Err(Error::UnsupportedConstruct(msg)) if msg.contains("nonterminal")));
    }

    #[test]
    fn test_bound_differing_token_is_rejected() {
        let bound = |token: &str, label: &str| Alternative {
            operator: Some(Operator::new(1, OperatorAssociativity::Left)),
            sequence: SequencePart::new(vec![
                RulePart::terminal("T_HASH").into(),
                RulePart::terminal(token).labeled(label).into(),
            ])
            .with_action(quote!(a();)),
        };
        let err = merge_operator_alternatives(
            1,
            vec![bound("T_NUM", "T_NUM_1"), bound("T_ID", "T_ID_1")],
        );
        assert!(matches!(err, Err(Error::UnsupportedConstruct(msg)) if msg.contains("bound to a value")));
    }

    #[test]
    fn test_unequal_length_is_rejected() {
        let mut short = binary("T_MINUS", quote!(b();));
        short.sequence.parts.pop();
        let err = merge_operator_alternatives(1, vec![binary("T_PLUS", quote!(a();)), short]);
        assert!(matches!(err, Err(Error::UnsupportedConstruct(msg)) if msg.contains("number of parts")));
    }

    #[test]
    fn test_existing_rule_is_not_overwritten() {
        let language = Language::new("crate::ast")
            .concept(Concept::new("Unit").notation(Notation::new(vec![NotationPart::token("unit")])));
        let options = TranslatorOptions::default();
        let mut ctx = Context::new(&language, &options);
        let unit = &language.concepts[0];
        ctx.process_top_level(unit).unwrap();
        let err = ctx.process_top_level(unit);
        assert!(matches!(err, Err(Error::UnsupportedConstruct(msg)) if msg.contains("already exists")));
        assert_eq!(ctx.productions.len(), 1);
    }
}
