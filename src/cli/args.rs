//! Command-line argument structures shared by the `snmpmap-*` tools.

use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::defs::{self, DefFiles};
use crate::error::{Error, Result};
use crate::mapping::Mapping;
use crate::message::Version;
use crate::pdu::PduType;
use crate::resolve::{OutputMode, ToolConfig};

/// Well-known SNMP port.
pub const DEFAULT_PORT: u16 = 161;

/// SNMP version for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SnmpVersion {
    /// SNMPv1
    #[value(name = "1")]
    V1,
    /// SNMPv2c (default)
    #[default]
    #[value(name = "2", alias = "2c")]
    V2c,
}

impl From<SnmpVersion> for Version {
    fn from(v: SnmpVersion) -> Self {
        match v {
            SnmpVersion::V1 => Version::V1,
            SnmpVersion::V2c => Version::V2c,
        }
    }
}

/// Output format for CLI tools.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// `name = value`.
    #[default]
    Short,
    /// Syntax names before every value.
    Verbose,
    /// Same as short.
    Tabular,
    /// Values only.
    Quiet,
}

impl From<OutputFormat> for OutputMode {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Short => OutputMode::Short,
            OutputFormat::Verbose => OutputMode::Verbose,
            OutputFormat::Tabular => OutputMode::Tabular,
            OutputFormat::Quiet => OutputMode::Quiet,
        }
    }
}

/// Common arguments shared across all CLI tools.
#[derive(Debug, Parser)]
pub struct CommonArgs {
    /// Agent as [udp::][community@]server[:port].
    #[arg(short = 's', long = "server", value_name = "SERVER", default_value = "localhost")]
    pub server: ServerSpec,

    /// SNMP version: 1 or 2.
    #[arg(short = 'v', long = "snmp-version", default_value = "2")]
    pub snmp_version: SnmpVersion,

    /// Community string, overriding the one in the server argument.
    #[arg(short = 'c', long = "community")]
    pub community: Option<String>,

    /// Request timeout in seconds.
    #[arg(short = 't', long = "timeout", default_value = "3")]
    pub timeout: u64,

    /// Retry count.
    #[arg(short = 'r', long = "retries", default_value = "3")]
    pub retries: u32,

    /// Receive buffer size in bytes.
    #[arg(
        short = 'b',
        long = "buffer-size",
        default_value = "10000",
        value_parser = clap::value_parser!(u16).range(484..)
    )]
    pub buffer_size: u16,

    /// Output format: short, verbose, tabular or quiet.
    #[arg(short = 'o', long = "output", default_value = "short")]
    pub output: OutputFormat,

    /// Numeric OIDs only; no definition files are read.
    #[arg(short = 'n', long = "numeric")]
    pub numeric: bool,

    /// Debug logging to stderr.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Trace logging to stderr (very noisy).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl CommonArgs {
    /// Install a stderr subscriber at the level selected by `-d`/`-D`.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "snmpmap=trace"
        } else if self.debug {
            "snmpmap=debug"
        } else {
            "snmpmap=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Community from `-c`, else from the server argument, else `default`.
    pub fn community_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.community
            .as_deref()
            .or(self.server.community.as_deref())
            .unwrap_or(default)
    }

    /// Tool configuration for requests of `pdu_type`.
    pub fn tool_config(&self, pdu_type: PduType) -> ToolConfig {
        ToolConfig {
            output: self.output.into(),
            numeric: self.numeric,
            pdu_type,
            ..ToolConfig::default()
        }
    }
}

/// Parsed `[trans::][community@]server[:port]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSpec {
    pub community: Option<String>,
    pub host: String,
    pub port: u16,
}

impl ServerSpec {
    /// Resolve the host to a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| Error::usage(format!("cannot resolve {}: {e}", self.host)))?
            .next()
            .ok_or_else(|| Error::usage(format!("no address for {}", self.host)))
    }
}

impl std::fmt::Display for ServerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for ServerSpec {
    type Err = Box<Error>;

    /// ```
    /// use snmpmap::cli::args::ServerSpec;
    ///
    /// let spec: ServerSpec = "udp::private@agent.example:1161".parse().unwrap();
    /// assert_eq!(spec.community.as_deref(), Some("private"));
    /// assert_eq!(spec.to_string(), "agent.example:1161");
    /// assert!("tcp::agent".parse::<ServerSpec>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let rest = match s.split_once("::") {
            Some((trans, rest)) if !trans.is_empty() && trans.chars().all(|c| c.is_ascii_alphabetic()) => {
                if trans != "udp" {
                    return Err(Error::usage(format!("unsupported transport '{trans}'")));
                }
                rest
            }
            _ => s,
        };

        let (community, rest) = match rest.split_once('@') {
            Some((community, rest)) => (Some(community.to_string()), rest),
            None => (None, rest),
        };

        let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
            let (host, tail) = bracketed
                .split_once(']')
                .ok_or_else(|| Error::usage(format!("unterminated address in '{s}'")))?;
            (host, tail.strip_prefix(':'))
        } else if rest.matches(':').count() == 1 {
            let (host, port) = rest.split_once(':').unwrap_or((rest, ""));
            (host, Some(port))
        } else {
            (rest, None)
        };

        let port = match port {
            None | Some("") | Some("snmp") => DEFAULT_PORT,
            Some(port) => port
                .parse()
                .map_err(|_| Error::usage(format!("invalid port '{port}'")))?,
        };
        let host = if host.is_empty() { "localhost" } else { host };

        Ok(Self {
            community,
            host: host.to_string(),
            port,
        })
    }
}

/// Definition file selection.
#[derive(Debug, Parser)]
pub struct MappingArgs {
    /// Include definition files: cut=<oid>,path=<dir>,file=<name>.
    #[arg(short = 'I', long = "include", value_name = "OPTIONS")]
    pub include: Vec<String>,

    /// Comma separated definition files.
    #[arg(short = 'i', long = "files", value_name = "FILELIST")]
    pub files: Vec<String>,

    /// Print the loaded definitions and exit.
    #[arg(long = "dump-defs")]
    pub dump_defs: bool,
}

impl MappingArgs {
    /// Load the selected files, or the defaults when none are given.
    ///
    /// Missing default files are skipped; in numeric mode without explicit
    /// files nothing is loaded.
    pub fn load(&self, numeric: bool) -> Result<Mapping> {
        let mut files = DefFiles::new();
        for include in &self.include {
            files.add_include(include)?;
        }
        for list in &self.files {
            files.add_list(list)?;
        }

        let mut mapping = Mapping::new();
        if files.is_empty() {
            if numeric {
                return Ok(mapping);
            }
            defs::load_all(&mut mapping, &DefFiles::defaults(), true)?;
        } else {
            defs::load_all(&mut mapping, &files, false)?;
        }
        Ok(mapping)
    }
}

/// PDU type for `snmpmap-get`.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum GetPdu {
    #[default]
    Get,
    Getnext,
    Getbulk,
}

impl From<GetPdu> for PduType {
    fn from(p: GetPdu) -> Self {
        match p {
            GetPdu::Get => PduType::GetRequest,
            GetPdu::Getnext => PduType::GetNextRequest,
            GetPdu::Getbulk => PduType::GetBulkRequest,
        }
    }
}

/// Get-specific arguments.
#[derive(Debug, Parser)]
pub struct GetArgs {
    /// Request type: get, getnext or getbulk.
    #[arg(short = 'p', long = "pdu", default_value = "get")]
    pub pdu: GetPdu,

    /// GETBULK max-repetitions.
    #[arg(short = 'M', long = "max-repetitions", default_value = "10")]
    pub max_repetitions: u32,

    /// GETBULK non-repeaters.
    #[arg(short = 'N', long = "non-repeaters", default_value = "0")]
    pub non_repeaters: u32,

    /// On an error response drop the offending binding and resend.
    #[arg(short = 'e', long = "retry-errors")]
    pub retry_errors: bool,
}

/// Set-specific arguments.
#[derive(Debug, Parser)]
pub struct SetArgs {
    /// On an error response drop the offending binding and resend.
    #[arg(short = 'e', long = "retry-errors")]
    pub retry_errors: bool,

    /// Skip syntax and access checks.
    #[arg(short = 'a', long = "ignore-errors")]
    pub ignore_errors: bool,
}
