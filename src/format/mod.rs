//! Octet formatting shared by textual conventions and transport logging.
//!
//! ```
//! use snmpmap::format::hex;
//!
//! assert_eq!(hex::join(&[0x00, 0x1a, 0x2b], ':'), "00:1a:2b");
//! assert_eq!(hex::split("0:1a:2b", ':').unwrap(), [0x00, 0x1a, 0x2b]);
//! assert_eq!(hex::Bytes(&[0x30, 0x00]).to_string(), "3000");
//! ```

pub mod hex;
