mod fields;
mod validate;

pub use fields::fields_command;
pub use validate::{OutputFormat, validate_command};
