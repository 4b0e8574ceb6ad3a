//! Fluent assertions over translation results, for tests.

use crate::error::{Error, Result};
use concept_grammar_model::grammar::{Grammar, ParserRule};
use std::fmt::Debug;

/// Wraps a [`Result`] so tests can assert on it in one chain.
pub struct TestResult<T> {
    inner: Result<T>,
}

impl<T: Debug> TestResult<T> {
    pub fn new(result: Result<T>) -> Self {
        Self { inner: result }
    }

    /// Asserts success and returns the value.
    pub fn assert_success(self) -> T {
        match self.inner {
            Ok(val) => val,
            Err(e) => panic!(
                "\nTEST FAILED (expected success, got error):\nMessage: {}\nError:   {:?}\n",
                e, e
            ),
        }
    }

    /// Asserts success and compares the value.
    pub fn assert_success_is<E>(self, expected: E) -> T
    where
        T: PartialEq<E>,
        E: Debug,
    {
        let val = self.assert_success();
        if val != expected {
            panic!(
                "\nTEST FAILED (value mismatch):\nExpected: {:?}\nGot:      {:?}\n",
                expected, val
            );
        }
        val
    }

    /// Asserts failure and returns the error.
    pub fn assert_failure(self) -> Error {
        match self.inner {
            Ok(val) => panic!(
                "\nTEST FAILED (expected failure, got success):\nValue: {:?}\n",
                val
            ),
            Err(e) => e,
        }
    }

    /// Asserts failure with a message containing `expected_msg_part`.
    pub fn assert_failure_contains(self, expected_msg_part: &str) -> Error {
        let err = self.assert_failure();
        let actual_msg = err.to_string();
        if !actual_msg.contains(expected_msg_part) {
            panic!(
                "\nTEST FAILED (error message mismatch):\nExpected part: {:?}\nActual msg:    {:?}\n",
                expected_msg_part, actual_msg
            );
        }
        err
    }
}

impl TestResult<Grammar> {
    /// Asserts success and that the grammar has exactly these rules, in order.
    pub fn assert_rules(self, expected: &[&str]) -> Grammar {
        let grammar = self.assert_success();
        let names: Vec<&str> = grammar.parser_rules.iter().map(|r| r.name.as_str()).collect();
        if names != expected {
            panic!(
                "\nTEST FAILED (rule mismatch):\nExpected: {:?}\nGot:      {:?}\n",
                expected, names
            );
        }
        grammar
    }

    /// Asserts success and compares the alternatives of `rule`, actions left out.
    pub fn assert_rule_shapes(self, rule: &str, expected: &[&str]) -> Grammar {
        let grammar = self.assert_success();
        let Some(found) = grammar.rule(rule) else {
            panic!("\nTEST FAILED (missing rule):\nRule: {}\n", rule);
        };
        let shapes = rule_shapes(found);
        if shapes != expected {
            panic!(
                "\nTEST FAILED (shape mismatch in `{}`):\nExpected: {:?}\nGot:      {:?}\n",
                rule, expected, shapes
            );
        }
        grammar
    }
}

/// The alternatives of `rule` in grammar notation, without their actions.
pub fn rule_shapes(rule: &ParserRule) -> Vec<String> {
    rule.to_string()
        .lines()
        .skip(1)
        .map(str::trim)
        .filter_map(|line| line.strip_prefix(": ").or_else(|| line.strip_prefix("| ")))
        .map(|alt| match alt.find(" {") {
            Some(at) => alt[..at].to_string(),
            None => alt.to_string(),
        })
        .collect()
}

pub trait Testable<T> {
    fn test(self) -> TestResult<T>;
}

impl<T: Debug> Testable<T> for Result<T> {
    fn test(self) -> TestResult<T> {
        TestResult::new(self)
    }
}
