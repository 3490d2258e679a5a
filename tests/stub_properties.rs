//! Property-based tests for stub synthesis
//!
//! These tests verify invariants that should hold for all convention classes:
//! - Every field yields one constructor parameter and one property, in order
//! - One classmethod per enabled rate, each taking exactly the fields
//! - `channel_count` appears iff the class is multichannel and not fixed
//! - Rendering the same module twice gives identical text

use proptest::prelude::*;
use std::path::Path;
use ugen_stubgen::config::StubgenConfig;
use ugen_stubgen::core::stub::{ClassStub, Signature};
use ugen_stubgen::{classify, generate_module, parse_module, RateTag};

/// Words that cannot be used as field names
const RESERVED: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield", "match",
    "case", "type", "print", "exec", "self", "cls", "kwargs", "calculation_rate", "channel_count",
];

fn python_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}".prop_filter("not reserved", |s| !RESERVED.contains(&s.as_str()))
}

fn field_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(python_identifier(), 0..6).prop_map(|names| {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        unique
    })
}

#[derive(Debug, Clone)]
struct ConventionClass {
    fields: Vec<(String, bool)>,
    rates: Vec<bool>,
    is_multichannel: bool,
    fixed_channel_count: bool,
}

impl ConventionClass {
    fn source(&self) -> String {
        let mut keywords: Vec<String> = RateTag::ALL
            .iter()
            .zip(&self.rates)
            .map(|(tag, on)| format!("{}={}", tag, if *on { "True" } else { "False" }))
            .collect();
        keywords.push(format!("is_multichannel={}", py_bool(self.is_multichannel)));
        keywords.push(format!(
            "fixed_channel_count={}",
            py_bool(self.fixed_channel_count)
        ));

        let mut source = format!("@ugen({})\nclass Generated(UGen):\n", keywords.join(", "));
        if self.fields.is_empty() {
            source.push_str("    pass\n");
        }
        for (name, unexpanded) in &self.fields {
            source.push_str(&format!(
                "    {} = param(0.0, unexpanded={})\n",
                name,
                py_bool(*unexpanded)
            ));
        }
        source
    }

    fn enabled_rates(&self) -> Vec<&'static str> {
        RateTag::ALL
            .iter()
            .zip(&self.rates)
            .filter(|(_, on)| **on)
            .map(|(tag, _)| tag.as_str())
            .collect()
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }
}

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn convention_class() -> impl Strategy<Value = ConventionClass> {
    (
        field_names(),
        prop::collection::vec(any::<bool>(), 6),
        prop::collection::vec(any::<bool>(), RateTag::ALL.len()),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(names, flags, rates, is_multichannel, fixed_channel_count)| ConventionClass {
                fields: names.into_iter().zip(flags).collect(),
                rates,
                is_multichannel,
                fixed_channel_count,
            },
        )
}

fn stub_for(source: &str) -> ClassStub {
    let module = parse_module(source, Path::new("generated.py")).unwrap();
    let config = StubgenConfig::default();
    let classification = classify(&module.classes[0], &config.convention);
    assert!(classification.ambiguities.is_empty());
    classification.shape.to_stub(&config.convention)
}

fn names_after_receiver(signature: &Signature) -> Vec<&str> {
    signature
        .parameters
        .iter()
        .skip(1)
        .map(|p| p.name.as_str())
        .filter(|name| !matches!(*name, "calculation_rate" | "channel_count" | "kwargs"))
        .collect()
}

proptest! {
    /// Property: each field maps to one constructor parameter and one
    /// property with the same name, in declaration order
    #[test]
    fn prop_fields_round_trip(class in convention_class()) {
        let stub = stub_for(&class.source());

        let init = stub.constructor().unwrap();
        prop_assert_eq!(names_after_receiver(init), class.field_names());

        let properties: Vec<&str> = stub.properties().map(|p| p.name.as_str()).collect();
        prop_assert_eq!(properties, class.field_names());
    }

    /// Property: one classmethod per enabled rate tag, in canonical order,
    /// each taking exactly the field parameters
    #[test]
    fn prop_rate_methods_match_tags(class in convention_class()) {
        let stub = stub_for(&class.source());

        let methods: Vec<&Signature> = stub.class_methods().collect();
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        prop_assert_eq!(names, class.enabled_rates());

        for method in methods {
            prop_assert_eq!(names_after_receiver(method), class.field_names());
            prop_assert!(method.parameter("calculation_rate").is_none());
        }
    }

    /// Property: `channel_count` is present everywhere or nowhere, exactly
    /// when the class is multichannel without a fixed count
    #[test]
    fn prop_channel_count_is_conditional(class in convention_class()) {
        let stub = stub_for(&class.source());
        let expected = class.is_multichannel && !class.fixed_channel_count;

        let init = stub.constructor().unwrap();
        prop_assert_eq!(init.parameter("channel_count").is_some(), expected);
        for method in stub.class_methods() {
            prop_assert_eq!(method.parameter("channel_count").is_some(), expected);
        }
    }

    /// Property: rendering is deterministic
    #[test]
    fn prop_rendering_is_idempotent(class in convention_class()) {
        let source = class.source();
        let config = StubgenConfig::default();
        let first = generate_module(&source, Path::new("generated.py"), &config).unwrap();
        let second = generate_module(&source, Path::new("generated.py"), &config).unwrap();

        prop_assert_eq!(&first.content, &second.content);
        prop_assert!(first.content.ends_with('\n'));
        prop_assert!(!first.content.ends_with("\n\n"));
    }
}
