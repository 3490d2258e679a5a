//! Classification of class declarations and the two extraction paths.
//!
//! A class either follows the decorator/field-descriptor convention, in which
//! case its signatures are synthesized, or it is plain and its declared
//! signatures are reproduced. [`ClassShape`] is the tagged result of that
//! decision; [`ClassShape::to_stub`] converges both branches on
//! [`ClassStub`].

pub mod generic;
pub mod metadata;

use crate::config::ConventionConfig;
use crate::core::ast::ClassDecl;
use crate::core::convention::{DecoratorMetadata, FieldDescriptor};
use crate::core::stub::ClassStub;
use crate::errors::Ambiguity;
use crate::synthesis;

#[derive(Debug, Clone, PartialEq)]
pub enum ClassShape<'a> {
    Convention {
        class: &'a ClassDecl,
        metadata: DecoratorMetadata,
        fields: Vec<FieldDescriptor>,
    },
    Plain(&'a ClassDecl),
}

/// A classified class plus any recoverable problems met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification<'a> {
    pub shape: ClassShape<'a>,
    pub ambiguities: Vec<Ambiguity>,
}

pub fn classify<'a>(class: &'a ClassDecl, convention: &ConventionConfig) -> Classification<'a> {
    let mut ambiguities = Vec::new();
    let shape = match metadata::find_convention_decorator(class, &convention.decorator) {
        Some(decorator) => ClassShape::Convention {
            class,
            metadata: metadata::extract_metadata(&class.name, decorator, &mut ambiguities),
            fields: metadata::collect_fields(class, &convention.field_function, &mut ambiguities),
        },
        None => ClassShape::Plain(class),
    };
    Classification { shape, ambiguities }
}

impl ClassShape<'_> {
    pub fn is_convention(&self) -> bool {
        matches!(self, ClassShape::Convention { .. })
    }

    pub fn class(&self) -> &ClassDecl {
        match self {
            ClassShape::Convention { class, .. } | ClassShape::Plain(class) => class,
        }
    }

    pub fn to_stub(&self, convention: &ConventionConfig) -> ClassStub {
        match self {
            ClassShape::Convention {
                class,
                metadata,
                fields,
            } => synthesis::synthesize(&class.name, &convention.base_class, metadata, fields),
            ClassShape::Plain(class) => generic::extract_plain(class),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stub::StubOrigin;
    use crate::parser::parse_module;
    use indoc::indoc;
    use std::path::Path;

    #[test]
    fn test_classify_routes_both_paths() {
        let module = parse_module(
            indoc! {"
                @ugen(ar=True)
                class SinOsc(UGen):
                    frequency = param(440.0)

                class Envelope:
                    def __init__(self):
                        pass
            "},
            Path::new("t.py"),
        )
        .unwrap();
        let convention = ConventionConfig::default();

        let first = classify(&module.classes[0], &convention);
        assert!(first.shape.is_convention());
        assert_eq!(first.shape.to_stub(&convention).origin, StubOrigin::Synthesized);

        let second = classify(&module.classes[1], &convention);
        assert!(!second.shape.is_convention());
        assert_eq!(second.shape.class().name, "Envelope");
        assert_eq!(
            second.shape.to_stub(&convention).origin,
            StubOrigin::Introspected
        );
    }

    #[test]
    fn test_custom_convention_names() {
        let module = parse_module(
            indoc! {"
                @node(kr=True)
                class Custom:
                    level = field(1)
            "},
            Path::new("t.py"),
        )
        .unwrap();
        let convention = ConventionConfig {
            decorator: "node".into(),
            field_function: "field".into(),
            base_class: "Node".into(),
        };

        let classification = classify(&module.classes[0], &convention);
        let stub = classification.shape.to_stub(&convention);
        assert_eq!(stub.bases, vec!["Node"]);
        assert_eq!(stub.properties().count(), 1);
        assert_eq!(stub.class_methods().count(), 1);
    }
}
