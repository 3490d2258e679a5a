//! Reads `@ugen(...)` keywords and `param(...)` field descriptors.
//!
//! Both readers are lenient: a value that is not a literal falls back to the
//! default and is reported as an [`Ambiguity`] instead of failing.

use crate::core::ast::{ClassDecl, ClassItem, Expr};
use crate::core::convention::{DecoratorMetadata, FieldDescriptor, RateTag};
use crate::errors::Ambiguity;

/// Find the convention decorator on a class: either `@name` or `@name(...)`.
pub fn find_convention_decorator<'a>(class: &'a ClassDecl, name: &str) -> Option<&'a Expr> {
    class.decorators.iter().find(|decorator| {
        decorator.as_name() == Some(name)
            || decorator
                .as_call()
                .and_then(|call| call.callee_name())
                .is_some_and(|callee| callee == name)
    })
}

/// Build the decorator metadata from its keyword arguments.
///
/// A bare `@ugen` has no keywords and yields the defaults.
pub fn extract_metadata(
    class_name: &str,
    decorator: &Expr,
    ambiguities: &mut Vec<Ambiguity>,
) -> DecoratorMetadata {
    let mut metadata = DecoratorMetadata::default();
    let Some(call) = decorator.as_call() else {
        return metadata;
    };

    for keyword in &call.keywords {
        let Some(key) = keyword.name.as_deref() else {
            continue;
        };
        let recognized = RateTag::from_keyword(key).is_some()
            || matches!(key, "is_multichannel" | "fixed_channel_count" | "channel_count");
        if !recognized {
            tracing::trace!(class_name, keyword = key, "ignoring unknown keyword");
            continue;
        }

        let Some(literal) = keyword.value.as_literal() else {
            ambiguities.push(Ambiguity::NonLiteralDecoratorKeyword {
                class: class_name.to_string(),
                keyword: key.to_string(),
            });
            continue;
        };

        match key {
            "is_multichannel" => metadata.is_multichannel = literal.is_truthy(),
            "fixed_channel_count" => metadata.fixed_channel_count = literal.is_truthy(),
            "channel_count" => {
                metadata.channel_count = literal
                    .display_value()
                    .unwrap_or_else(|| keyword.value.text.clone())
            }
            _ => {
                if let Some(tag) = RateTag::from_keyword(key) {
                    if literal.is_truthy() {
                        metadata.rates.insert(tag);
                    } else {
                        metadata.rates.remove(&tag);
                    }
                }
            }
        }
    }

    metadata
}

/// Collect field descriptors from the class body in declaration order.
///
/// Recognizes `name = f(...)`, `name: T = f(...)` and chained
/// `a = b = f(...)`, where `f` is the configured field function.
pub fn collect_fields(
    class: &ClassDecl,
    field_function: &str,
    ambiguities: &mut Vec<Ambiguity>,
) -> Vec<FieldDescriptor> {
    let mut fields = Vec::new();

    for item in &class.body {
        let ClassItem::Assignment(assignment) = item else {
            continue;
        };
        let Some(call) = assignment.value.as_ref().and_then(Expr::as_call) else {
            continue;
        };
        if call.callee_name() != Some(field_function) {
            continue;
        }

        let default = call.args.first().map(|arg| arg.text.clone());

        for target in &assignment.targets {
            let Some(name) = target.as_name() else {
                ambiguities.push(Ambiguity::UnsupportedFieldTarget {
                    class: class.name.clone(),
                    target: target.text.clone(),
                });
                continue;
            };

            let unexpanded = match call.keyword("unexpanded") {
                None => false,
                Some(value) => match value.as_literal() {
                    Some(literal) => literal.is_truthy(),
                    None => {
                        ambiguities.push(Ambiguity::NonLiteralFieldFlag {
                            class: class.name.clone(),
                            field: name.to_string(),
                        });
                        false
                    }
                },
            };

            fields.push(FieldDescriptor {
                name: name.to_string(),
                default: default.clone(),
                unexpanded,
            });
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_module;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use std::path::Path;

    fn first_class(source: &str) -> ClassDecl {
        parse_module(source, Path::new("t.py"))
            .unwrap()
            .classes
            .remove(0)
    }

    #[test]
    fn test_finds_bare_and_called_decorator() {
        let bare = first_class("@ugen\nclass A:\n    pass\n");
        assert!(find_convention_decorator(&bare, "ugen").is_some());

        let called = first_class("@dataclass\n@ugen(ar=True)\nclass A:\n    pass\n");
        assert!(find_convention_decorator(&called, "ugen").is_some());

        let dotted = first_class("@core.ugen(ar=True)\nclass A:\n    pass\n");
        assert!(find_convention_decorator(&dotted, "ugen").is_none());
    }

    #[test]
    fn test_metadata_from_keywords() {
        let class = first_class(indoc! {"
            @ugen(ar=True, kr=True, new=0, is_multichannel=True, channel_count=2, unknown=3)
            class A:
                pass
        "});
        let decorator = find_convention_decorator(&class, "ugen").unwrap();
        let mut ambiguities = Vec::new();
        let metadata = extract_metadata("A", decorator, &mut ambiguities);

        assert_eq!(
            metadata.rates,
            BTreeSet::from([RateTag::Ar, RateTag::Kr])
        );
        assert!(metadata.is_multichannel);
        assert!(!metadata.fixed_channel_count);
        assert_eq!(metadata.channel_count, "2");
        assert!(ambiguities.is_empty());
    }

    #[test]
    fn test_channel_count_renders_as_its_value() {
        let cases = [
            ("channel_count=\"2\"", "2"),
            ("channel_count=0x4", "4"),
            ("channel_count=True", "True"),
            ("channel_count=2.5", "2.5"),
        ];
        for (keyword, expected) in cases {
            let class = first_class(&format!("@ugen({keyword})\nclass A:\n    pass\n"));
            let decorator = find_convention_decorator(&class, "ugen").unwrap();
            let metadata = extract_metadata("A", decorator, &mut Vec::new());
            assert_eq!(metadata.channel_count, expected, "{keyword}");
        }
    }

    #[test]
    fn test_non_literal_keyword_falls_back() {
        let class = first_class(indoc! {"
            @ugen(ar=ENABLED, is_multichannel=True, channel_count=N)
            class A:
                pass
        "});
        let decorator = find_convention_decorator(&class, "ugen").unwrap();
        let mut ambiguities = Vec::new();
        let metadata = extract_metadata("A", decorator, &mut ambiguities);

        assert!(metadata.rates.is_empty());
        assert_eq!(metadata.channel_count, "1");
        assert_eq!(ambiguities.len(), 2);
        assert!(matches!(
            &ambiguities[0],
            Ambiguity::NonLiteralDecoratorKeyword { keyword, .. } if keyword == "ar"
        ));
    }

    #[test]
    fn test_bare_decorator_yields_defaults() {
        let class = first_class("@ugen\nclass A:\n    pass\n");
        let decorator = find_convention_decorator(&class, "ugen").unwrap();
        let metadata = extract_metadata("A", decorator, &mut Vec::new());
        assert_eq!(metadata, DecoratorMetadata::default());
    }

    #[test]
    fn test_collect_fields_in_declaration_order() {
        let class = first_class(indoc! {"
            @ugen(ar=True)
            class A:
                source = param()
                frequency: float = param(440.0)
                helper = compute(1)
                left = right = param(0, unexpanded=True)
                phase = param(0.0, unexpanded=False)

                def method(self):
                    pass
        "});
        let mut ambiguities = Vec::new();
        let fields = collect_fields(&class, "param", &mut ambiguities);

        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["source", "frequency", "left", "right", "phase"]);
        assert_eq!(fields[0].default, None);
        assert_eq!(fields[1].default.as_deref(), Some("440.0"));
        assert!(fields[2].unexpanded && fields[3].unexpanded);
        assert!(!fields[4].unexpanded);
        assert!(ambiguities.is_empty());
    }

    #[test]
    fn test_collect_fields_reports_odd_targets() {
        let class = first_class(indoc! {"
            class A:
                self.x = param()
                y = param(unexpanded=flag)
        "});
        let mut ambiguities = Vec::new();
        let fields = collect_fields(&class, "param", &mut ambiguities);

        assert_eq!(fields.len(), 1);
        assert!(!fields[0].unexpanded);
        assert_eq!(ambiguities.len(), 2);
    }

    #[test]
    fn test_zero_fields_is_valid() {
        let class = first_class("@ugen(ar=True)\nclass A:\n    pass\n");
        assert!(collect_fields(&class, "param", &mut Vec::new()).is_empty());
    }
}
