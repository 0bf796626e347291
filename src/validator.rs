//! Response validation for the payments confirm flow.
//!
//! A response is checked by a fixed list of independent assertions, and
//! identifiers found in the body are copied into a [`VariableStore`] for
//! later requests of the same suite.
pub mod assertion;
pub mod confirm;
pub mod request;
pub mod response;
pub mod variables;

pub use assertion::{Outcome, TestResult, TestRun};
pub use confirm::validate_confirm_response;
pub use request::ConfirmRequest;
pub use response::HttpResponse;
pub use variables::VariableStore;
