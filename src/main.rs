//! Tagdoc CLI binary entry point.
//! Resolves configuration, runs the scan and writes or prints results.

use anyhow::Result;
use clap::Parser;
use tagdoc::cli::{Cli, Commands};
use tagdoc::config::{self, Effective, Overrides};
use tagdoc::models::ScanResult;
use tagdoc::report::{self, Report};
use tagdoc::utils::{error_prefix, note_prefix, ok_prefix};
use tagdoc::vcs::Git;
use tagdoc::{output, scan};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", error_prefix(), err);
        std::process::exit(2);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Generate {
            root,
            out,
            aosp,
            format,
            all,
        } => {
            let eff = config::resolve_effective(&Overrides {
                root,
                out,
                aosp,
                format,
                output: None,
                all_projects: if all { Some(true) } else { None },
            })?;
            let res = collect(&eff)?;
            let today = chrono::Local::now().date_naive();
            let doc = Report::build(&res.records).render(eff.format, today);
            report::write_report(&eff.out, &doc)?;
            println!(
                "{} Wrote {} tag records to {} ({} diagnostics)",
                ok_prefix(),
                res.records.len(),
                eff.out.display(),
                res.diagnostics.len()
            );
        }
        Commands::Scan {
            root,
            aosp,
            output,
            all,
        } => {
            let eff = config::resolve_effective(&Overrides {
                root,
                aosp,
                output,
                all_projects: if all { Some(true) } else { None },
                ..Overrides::default()
            })?;
            let res = collect(&eff)?;
            output::print_scan(&res, &report::summarize(&res.records), eff.output);
        }
    }
    Ok(())
}

fn collect(eff: &Effective) -> Result<ScanResult> {
    if !eff.config_found {
        eprintln!("{} No tagdoc.toml found; using defaults.", note_prefix());
    }
    Ok(scan::scan_workspace(eff, &Git)?)
}
