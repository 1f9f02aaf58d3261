//! Command-line support for the `snmpmap-*` binaries.

pub mod args;
pub mod tool;
