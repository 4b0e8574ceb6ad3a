#![allow(dead_code)]

use concept_grammar::grammar::Grammar;
use concept_grammar::testing::rule_shapes;
use concept_grammar::language::{
    Concept, ConceptPattern, Language, Notation, NotationPart, Operator, OperatorAssociativity,
    Parentheses, PartPattern, PrimitiveKind, Range, Type,
};

pub fn token(text: &str) -> NotationPart {
    NotationPart::token(text)
}

pub fn expr(name: &str) -> NotationPart {
    NotationPart::property(name, Type::reference("Expression"))
}

pub fn primitive(name: &str, kind: PrimitiveKind, token: &str) -> NotationPart {
    NotationPart::property(name, Type::Primitive(kind)).with(PartPattern::Token(token.to_string()))
}

pub fn binary(name: &str, op: &str, priority: i32, assoc: OperatorAssociativity) -> Concept {
    Concept::new(name)
        .extends("Expression")
        .property("left", Type::reference("Expression"))
        .property("right", Type::reference("Expression"))
        .notation(Notation::new(vec![expr("left"), token(op), expr("right")]))
        .pattern(ConceptPattern::Operator(Operator::new(priority, assoc)))
}

/// A small statement language:
///
/// ```text
/// Program    : Statement (';' Statement)*
/// Statement  : 'print' Expression | ID '=' Expression
/// Expression : '(' Expression ')' | Expression '^' Expression | ...
/// ```
pub fn calc() -> Language {
    Language::new("crate::calc")
        .token("NUM", "[0-9]+")
        .token("ID", "[a-z][a-z0-9]*")
        .concept(
            Concept::new("Program")
                .property("statements", Type::list_of(Type::reference("Statement")))
                .notation(Notation::new(vec![NotationPart::property(
                    "statements",
                    Type::list_of(Type::reference("Statement")),
                )
                .with(PartPattern::Range(Range::at_least(1)))
                .with(PartPattern::Separator(";".to_string()))])),
        )
        .concept(Concept::new("Statement"))
        .concept(
            Concept::new("Print")
                .extends("Statement")
                .property("value", Type::reference("Expression"))
                .notation(Notation::new(vec![token("print"), expr("value")])),
        )
        .concept(
            Concept::new("Assign")
                .extends("Statement")
                .property("name", Type::Primitive(PrimitiveKind::String))
                .property("value", Type::reference("Expression"))
                .notation(Notation::new(vec![
                    primitive("name", PrimitiveKind::String, "ID"),
                    token("="),
                    expr("value"),
                ])),
        )
        .concept(
            Concept::new("Expression")
                .pattern(ConceptPattern::Parentheses(Parentheses::default())),
        )
        .concept(
            Concept::new("Num")
                .extends("Expression")
                .property("value", Type::Primitive(PrimitiveKind::Integer))
                .notation(Notation::new(vec![primitive(
                    "value",
                    PrimitiveKind::Integer,
                    "NUM",
                )])),
        )
        .concept(
            Concept::new("Var")
                .extends("Expression")
                .property("name", Type::Primitive(PrimitiveKind::String))
                .notation(Notation::new(vec![primitive("name", PrimitiveKind::String, "ID")])),
        )
        .concept(binary("Add", "+", 1, OperatorAssociativity::Left))
        .concept(binary("Sub", "-", 1, OperatorAssociativity::Left))
        .concept(binary("Mul", "*", 2, OperatorAssociativity::Left))
        .concept(binary("Pow", "^", 3, OperatorAssociativity::Right))
}

pub fn rule_names(grammar: &Grammar) -> Vec<&str> {
    grammar.parser_rules.iter().map(|r| r.name.as_str()).collect()
}

/// The alternatives of `rule` in grammar notation, actions stripped.
pub fn shapes(grammar: &Grammar, rule: &str) -> Vec<String> {
    let rule = grammar
        .rule(rule)
        .unwrap_or_else(|| panic!("no rule `{}`", rule));
    rule_shapes(rule)
}

/// The action attached to the `index`-th alternative of `rule`, whitespace removed.
pub fn action(grammar: &Grammar, rule: &str, index: usize) -> String {
    let rule = grammar
        .rule(rule)
        .unwrap_or_else(|| panic!("no rule `{}`", rule));
    let line = rule
        .to_string()
        .lines()
        .nth(1 + index)
        .unwrap_or_else(|| panic!("no alternative {}", index))
        .to_string();
    let start = line.find(" {").expect("alternative has no action");
    line[start..].chars().filter(|c| !c.is_whitespace()).collect()
}
