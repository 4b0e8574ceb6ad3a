use crate::grammar::{Grammar, ParserRule};
use std::collections::{HashSet, VecDeque};

/// Nonterminal names referenced by a rule, in first-occurrence order.
pub fn referenced_rules(rule: &ParserRule) -> Vec<&str> {
    let mut seen = HashSet::new();
    rule.body
        .rule_refs()
        .filter(|r| !r.terminal)
        .map(|r| r.name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Nonterminal references that no rule defines, as `(rule, missing)` pairs.
pub fn undefined_rules(grammar: &Grammar) -> Vec<(String, String)> {
    let defined: HashSet<&str> = grammar.parser_rules.iter().map(|r| r.name.as_str()).collect();
    grammar
        .parser_rules
        .iter()
        .flat_map(|rule| {
            referenced_rules(rule)
                .into_iter()
                .filter(|name| !defined.contains(name))
                .map(|name| (rule.name.clone(), name.to_string()))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Rules not reachable from the entry rule, in declaration order.
pub fn unreachable_rules(grammar: &Grammar) -> Vec<String> {
    let Some(entry) = grammar.entry_rule() else {
        return Vec::new();
    };

    let mut used = HashSet::new();
    let mut queue = VecDeque::new();
    used.insert(entry.name.as_str());
    queue.push_back(entry);

    while let Some(rule) = queue.pop_front() {
        for callee in referenced_rules(rule) {
            if used.insert(callee) {
                if let Some(next) = grammar.rule(callee) {
                    queue.push_back(next);
                }
            }
        }
    }

    grammar
        .parser_rules
        .iter()
        .map(|r| r.name.as_str())
        .filter(|n| !used.contains(n))
        .map(str::to_string)
        .collect()
}

/// Terminal names a rule matches, in first-occurrence order.
pub fn referenced_tokens(rule: &ParserRule) -> Vec<&str> {
    let mut seen = HashSet::new();
    rule.body
        .rule_refs()
        .filter(|r| r.terminal)
        .map(|r| r.name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}
