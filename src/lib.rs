pub mod chain;
pub mod cli;
pub mod codec;
pub mod config;
pub mod entitlement;
pub mod indexer;
pub mod logging;
pub mod registry;
pub mod settlement;
pub mod types;
