pub mod check;
pub mod cli;
pub mod config;
pub mod consts;
pub mod domain;
pub mod error;
pub mod render;
pub mod report;
pub mod server;
pub mod shopify;
pub mod token;
