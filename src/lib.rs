//! zitadel-cli: automate Zitadel applications, projects and service users
//!
//! Layered like a small hexagon:
//! - `domain`: payloads, credentials, parsing rules
//! - `application`: the management API client
//! - `infrastructure`: HTTP transport and service wiring
//! - `cli`: argument parsing, command handlers and console output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
