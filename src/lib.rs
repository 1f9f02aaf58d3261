#![allow(clippy::result_large_err)]

//! # snmpmap
//!
//! Symbolic SNMP object names for command-line management tools.
//!
//! Definition files describe a tree of named objects with their syntax,
//! access and table indexing. Once loaded into a [`Mapping`], names such as
//! `ifDescr[3]` or `tcpConnState[10.0.0.1, 80, 10.0.0.2, 1024]` resolve to
//! request OIDs, and response bindings print back in the same form.
//!
//! ## Features
//!
//! - SNMPv1 and SNMPv2c over UDP, async on Tokio
//! - Definition file loader with typedefs, table rows and per-file cuts
//! - Multi-column table indexes, enumerations and textual conventions
//! - `snmpmap-get`, `snmpmap-set` and `snmpmap-walk` binaries (feature `cli`)
//!
//! ## Quick Start
//!
//! ```rust
//! use snmpmap::defs;
//! use snmpmap::{Mapping, Renderer, Resolver, ToolConfig, Value, VarBind, oid};
//!
//! let mut mapping = Mapping::new();
//! defs::load_str(
//!     &mut mapping,
//!     "(1 internet\n (2 mgmt\n  (1 mibII\n   (1 system\n    (3 sysUpTime TIMETICKS op_system GET)\n   )\n  )\n )\n)\n",
//!     "quickstart.def",
//!     &oid!(1, 3, 6),
//! )
//! .unwrap();
//!
//! let config = ToolConfig::default();
//! let query = Resolver::new(&mapping, &config).resolve("sysUpTime").unwrap();
//! assert_eq!(query.oid(), &oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
//!
//! let reply = Resolver::new(&mapping, &config)
//!     .resolve_response_binding(VarBind::new(query.oid().clone(), Value::TimeTicks(4200)));
//! assert_eq!(Renderer::new(&mapping, &config).line(&reply), "sysUpTime.0 = 4200");
//! ```
//!
//! Requests go through a [`Session`] over any [`Transport`]:
//!
//! ```rust,no_run
//! use snmpmap::{Pdu, Session, SessionConfig, UdpTransport, oid};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> snmpmap::Result<()> {
//!     let transport = UdpTransport::connect("192.0.2.1:161".parse().unwrap(), 10000).await?;
//!     let mut session = Session::new(transport, SessionConfig::default());
//!     let reply = session.send_request(Pdu::get(&[oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)])).await?;
//!     println!("{:?}", reply.varbinds);
//!     Ok(())
//! }
//! ```

pub mod ber;
pub mod catalog;
pub mod defs;
pub mod enums;
pub mod error;
pub mod format;
pub mod mapping;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod render;
pub mod resolve;
pub mod session;
pub mod syntax;
pub mod tc;
pub mod transport;
pub mod value;
pub mod varbind;

pub(crate) mod util;

#[cfg(feature = "cli")]
pub mod cli;

pub use catalog::{BucketKind, ObjectCatalog, ObjectDescriptor};
pub use error::{Error, ErrorStatus, OidErrorKind, Result};
pub use mapping::Mapping;
pub use message::Version;
pub use oid::Oid;
pub use pdu::{Pdu, PduType};
pub use render::Renderer;
pub use resolve::{OutputMode, QueryObject, Resolver, ToolConfig};
pub use session::{Session, SessionConfig};
pub use syntax::{Access, SyntaxKind};
pub use transport::{MockTransport, Transport, UdpTransport};
pub use value::Value;
pub use varbind::VarBind;
