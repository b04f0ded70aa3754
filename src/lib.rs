//! saoke reads bank-statement spreadsheets whose layout varies from bank to bank and turns them
//! into typed transactions. See `normalize` for the parsing rules.

mod backup;
mod db;
mod error;
mod utils;

pub mod args;
pub mod commands;
mod config;
pub mod model;
pub mod normalize;
pub mod template;


pub use config::Config;
pub use error::{error_type, Error, ErrorType, Result};
pub use normalize::{normalize, normalize_with, ParseError};
