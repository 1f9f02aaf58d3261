//! snmpmap-walk: GETNEXT walk of one subtree.

use std::process::ExitCode;

use clap::Parser;
use snmpmap::cli::args::{CommonArgs, MappingArgs};
use snmpmap::cli::tool::{self, Outcome, Tool};
use snmpmap::defs::{dump, options::default_cut};
use snmpmap::pdu::PduType;
use snmpmap::{Error, Result};

/// Walk an SNMP subtree, mib-2 by default.
#[derive(Debug, Parser)]
#[command(name = "snmpmap-walk", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    mapping: MappingArgs,

    /// Subtree root as a name or, with -n, a dotted OID.
    #[arg(value_name = "OID")]
    roots: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.common.init_tracing();

    match run(&args).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<Outcome> {
    if args.roots.len() > 1 {
        return Err(Error::Usage("Only one OID allowed".into()).boxed());
    }
    let mapping = args.mapping.load(args.common.numeric)?;
    if args.mapping.dump_defs {
        print!("{}", dump::to_string(&mapping, &default_cut()));
        return Ok(Outcome::Complete);
    }

    let config = args.common.tool_config(PduType::GetNextRequest);
    let session = tool::connect(&args.common, "public").await?;
    let mut tool = Tool::new(session, &mapping, &config, args.common.server.to_string());
    let root = args
        .roots
        .first()
        .map(|root| tool.resolver().resolve(root))
        .transpose()?;

    tool.walk(root, &mut std::io::stdout().lock(), &mut std::io::stderr().lock())
        .await
}
