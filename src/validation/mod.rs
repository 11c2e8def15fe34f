//! Structural validation of deps declarations

pub mod registry;
mod shapes;
mod sink;
mod validator;
mod violation;
mod walker;


pub use registry::{FieldLevel, FieldRule, FieldSet, Shape, field_set};
pub use sink::{ErrorSink, ValidationReport};
pub use validator::{Validator, validate_deps};
pub use violation::{ValueKind, Violation};
