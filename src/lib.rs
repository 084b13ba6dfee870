pub mod assemble;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractors;
pub mod header;
pub mod logging;
pub mod mapper;
pub mod month;
pub mod parsing;
pub mod profile;
pub mod reader;
pub mod schema;
pub mod types;
