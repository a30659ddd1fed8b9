pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod inject;
pub mod store;
pub mod vault;
