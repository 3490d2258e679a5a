//! Signature synthesis for convention classes.
//!
//! None of these signatures exist in the source: they are derived from the
//! decorator metadata and the ordered field descriptors.

use crate::core::convention::{DecoratorMetadata, FieldDescriptor};
use crate::core::stub::{ClassStub, MemberStub, ParamKind, ParameterStub, Signature, StubOrigin};

pub const CALCULATION_RATE_TYPE: &str = "CalculationRateLike";
pub const SCALAR_INPUT_TYPE: &str = "UGenScalarInput";
pub const VECTOR_INPUT_TYPE: &str = "UGenVectorInput";
pub const RECURSIVE_INPUT_TYPE: &str = "UGenRecursiveInput";
pub const SCALAR_TYPE: &str = "UGenScalar";
pub const VECTOR_TYPE: &str = "UGenVector";
pub const OPERABLE_TYPE: &str = "UGenOperable";
pub const ANY_TYPE: &str = "Any";

/// Placeholder default for synthesized field parameters.
pub const REQUIRED_DEFAULT: &str = "...";

/// Build the stub for a convention class: constructor, one property per
/// field, then one classmethod per enabled rate tag.
pub fn synthesize(
    class_name: &str,
    base_class: &str,
    metadata: &DecoratorMetadata,
    fields: &[FieldDescriptor],
) -> ClassStub {
    let mut stub = ClassStub::new(class_name, StubOrigin::Synthesized)
        .with_bases(vec![base_class.to_string()]);

    stub.push(MemberStub::Constructor(constructor(metadata, fields)));
    for field in fields {
        stub.push(MemberStub::Property(property(field)));
    }
    for rate in &metadata.rates {
        stub.push(MemberStub::ClassMethod(rate_method(
            rate.as_str(),
            metadata,
            fields,
        )));
    }

    stub
}

fn constructor(metadata: &DecoratorMetadata, fields: &[FieldDescriptor]) -> Signature {
    let mut signature = Signature::new("__init__")
        .param(ParameterStub::receiver("self"))
        .param(ParameterStub::keyword_only(
            "calculation_rate",
            CALCULATION_RATE_TYPE,
        ));

    if metadata.takes_channel_count() {
        signature = signature.param(channel_count_param(metadata));
    }

    for field in fields {
        let input_type = if field.unexpanded {
            VECTOR_INPUT_TYPE
        } else {
            SCALAR_INPUT_TYPE
        };
        signature = signature.param(
            ParameterStub::keyword_only(&field.name, input_type).defaulted(REQUIRED_DEFAULT),
        );
    }

    signature
        .param(ParameterStub::new("kwargs", ParamKind::VarKeyword).annotated(ANY_TYPE))
        .returns("None")
}

fn property(field: &FieldDescriptor) -> Signature {
    let value_type = if field.unexpanded {
        VECTOR_TYPE
    } else {
        SCALAR_TYPE
    };
    Signature::new(&field.name)
        .param(ParameterStub::receiver("self"))
        .returns(value_type)
}

fn rate_method(name: &str, metadata: &DecoratorMetadata, fields: &[FieldDescriptor]) -> Signature {
    let mut signature = Signature::new(name).param(ParameterStub::receiver("cls"));

    for field in fields {
        signature = signature.param(
            ParameterStub::keyword_only(&field.name, RECURSIVE_INPUT_TYPE)
                .defaulted(REQUIRED_DEFAULT),
        );
    }

    if metadata.takes_channel_count() {
        signature = signature.param(channel_count_param(metadata));
    }

    signature.returns(OPERABLE_TYPE)
}

fn channel_count_param(metadata: &DecoratorMetadata) -> ParameterStub {
    ParameterStub::keyword_only("channel_count", "int").defaulted(&metadata.channel_count)
}
