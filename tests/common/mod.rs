//! Shared test infrastructure: definition fixtures and an in-process agent.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod agent;
pub mod fixtures;

pub use agent::TestAgent;
pub use fixtures::{DEFS, interface_table, mapping, system_mib};
