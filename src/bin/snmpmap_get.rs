//! snmpmap-get: GET, GETNEXT or GETBULK by symbolic or numeric OID.

use std::process::ExitCode;

use clap::Parser;
use snmpmap::Result;
use snmpmap::cli::args::{CommonArgs, GetArgs, MappingArgs};
use snmpmap::cli::tool::{self, Outcome, Tool};
use snmpmap::defs::{dump, options::default_cut};
use snmpmap::resolve::ToolConfig;

/// Retrieve SNMP objects by name.
#[derive(Debug, Parser)]
#[command(name = "snmpmap-get", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    mapping: MappingArgs,

    #[command(flatten)]
    get: GetArgs,

    /// Objects as name[.suboid|[index]], or dotted OIDs with -n.
    #[arg(value_name = "OID")]
    oids: Vec<String>,
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
    let mapping = args.mapping.load(args.common.numeric)?;
    if args.mapping.dump_defs {
        print!("{}", dump::to_string(&mapping, &default_cut()));
        return Ok(Outcome::Complete);
    }

    let config = ToolConfig {
        retry: args.get.retry_errors,
        ..args.common.tool_config(args.get.pdu.into())
    };
    let session = tool::connect(&args.common, "public").await?;
    let mut tool = Tool::new(session, &mapping, &config, args.common.server.to_string());
    let objects = tool::resolve_all(&tool.resolver(), &args.oids)?;

    tool.get(
        objects,
        args.get.non_repeaters,
        args.get.max_repetitions,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )
    .await
}
