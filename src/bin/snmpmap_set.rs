//! snmpmap-set: SET objects given as name=value.

use std::process::ExitCode;

use clap::Parser;
use snmpmap::Result;
use snmpmap::cli::args::{CommonArgs, MappingArgs, SetArgs};
use snmpmap::cli::tool::{self, Outcome, Tool};
use snmpmap::defs::{dump, options::default_cut};
use snmpmap::pdu::PduType;
use snmpmap::resolve::ToolConfig;

/// Modify SNMP objects by name.
#[derive(Debug, Parser)]
#[command(name = "snmpmap-set", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    mapping: MappingArgs,

    #[command(flatten)]
    set: SetArgs,

    /// Assignments as name[.suboid|[index]]=[Syntax:]value, or
    /// oid=Syntax:value with -n.
    #[arg(value_name = "OID=VALUE")]
    assignments: Vec<String>,
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
        retry: args.set.retry_errors,
        ignore_errors: args.set.ignore_errors,
        ..args.common.tool_config(PduType::SetRequest)
    };
    let session = tool::connect(&args.common, "private").await?;
    let mut tool = Tool::new(session, &mapping, &config, args.common.server.to_string());
    let objects = tool::resolve_all(&tool.resolver(), &args.assignments)?;

    tool.set(objects, &mut std::io::stdout().lock(), &mut std::io::stderr().lock())
        .await
}
