pub mod actions;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;
pub mod release;
pub mod repo;
pub mod result;
pub mod validator;

pub use result::Result;

#[cfg(test)]
pub mod test_helpers;
