pub mod ast;
pub mod convention;
pub mod stub;

pub use ast::{ClassDecl, ClassItem, Expr, ExprKind, FunctionDecl, Literal, Module, ParamDecl};
pub use convention::{DecoratorMetadata, FieldDescriptor, RateTag};
pub use stub::{ClassStub, MemberStub, ParamKind, ParameterStub, Signature, StubOrigin};
