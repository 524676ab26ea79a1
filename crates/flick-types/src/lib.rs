pub mod config;
pub mod general;
pub mod validator;

pub use validator::{Validate, ValidationErrors, Validator};
