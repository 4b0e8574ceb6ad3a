//! Property-based tests for pattern translation and token ordering.

use concept_grammar::regex::{encode_literal, is_cyclic, translate};
use concept_grammar::TokenTable;
use proptest::prelude::*;

/// Text made only of characters the translator treats as literals.
fn plain_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_]{1,20}",
        "[a-z0-9 ,;:=<>!@#%&-]{1,20}",
        "[a-zA-Z]{1,5}[{}^$~]{1,3}",
    ]
}

/// A token pattern paired with whether it is expected to be cyclic.
fn pattern_strategy() -> impl Strategy<Value = (String, bool)> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(|word| (word, false)),
        "[a-z]{1,3}".prop_map(|word| (format!("{}[0-9]+", word), true)),
        "[a-z]{1,3}".prop_map(|word| (format!("[a-z]{}*", word), true)),
        "[a-z]{1,3}".prop_map(|word| (format!("{}\\+", word), false)),
    ]
}

proptest! {
    #[test]
    fn plain_text_is_quoted_unchanged(text in plain_text_strategy()) {
        prop_assert_eq!(translate(&text).unwrap(), format!("'{}'", text));
    }

    #[test]
    fn encoded_literals_always_translate(text in "[ -~]{1,20}") {
        let expected = format!("'{}'", text.replace('\\', "\\\\"));
        prop_assert_eq!(translate(&encode_literal(&text)).unwrap(), expected);
    }

    #[test]
    fn character_classes_pass_through(class in "[a-z0-9]{1,8}", quantifier in "[*+?]?") {
        let regex = format!("[{}]{}", class, quantifier);
        prop_assert_eq!(translate(&regex).unwrap(), regex.clone());
    }

    #[test]
    fn acyclic_tokens_come_first(patterns in prop::collection::vec(pattern_strategy(), 1..12)) {
        let mut table = TokenTable::new();
        let mut registered: Vec<String> = Vec::new();
        for (i, (regex, cyclic)) in patterns.iter().enumerate() {
            prop_assert_eq!(is_cyclic(regex), *cyclic);
            table.register(&format!("t{}", i), regex).unwrap();
            if !registered.contains(regex) {
                registered.push(regex.clone());
            }
        }

        let (acyclic, cyclic): (Vec<_>, Vec<_>) =
            registered.into_iter().partition(|regex| !is_cyclic(regex));
        let expected: Vec<String> = acyclic.into_iter().chain(cyclic).collect();
        let ordered: Vec<String> = table.ordered().into_iter().map(|t| t.regex).collect();
        prop_assert_eq!(ordered, expected);
    }
}
