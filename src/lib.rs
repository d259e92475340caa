//! MCP server that lets an agent work with GitHub repositories over a
//! line-delimited JSON-RPC 2.0 stdio protocol.
//!
//! Provides tools for listing and creating repositories, branches, pull
//! requests, and issues, and for reading and writing repository files.

pub mod args;
pub mod catalog;
pub mod error;
pub mod github;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;
