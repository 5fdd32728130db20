//! Command-line interface for the SLR(1) table generator.
//!
//! Reads a grammar file, writes the JSON table and optionally prints the
//! full construction report to stdout.

#[cfg(feature = "cli")]
mod real {
    use clap::Parser;
    use std::path::PathBuf;
    use steplr_gen::slr;

    #[derive(Parser)]
    #[command(version, about = "Generate an SLR(1) parse table from a grammar")]
    struct Args {
        /// Path to the input grammar file
        #[arg(short = 'g', long)]
        grammar: PathBuf,

        /// Path to the output JSON table
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Table name (defaults to the grammar file stem)
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Print productions, sets, states and conflicts to stdout
        #[arg(short = 'r', long)]
        report: bool,
    }

    pub fn main() -> anyhow::Result<()> {
        env_logger::init();
        let args = Args::parse();
        let build = slr::generate(&args.grammar, &args.output, args.name.as_deref())?;
        if args.report {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            slr::write_report(&mut out, &build.grammar, &build.sets, &build.automaton)?;
        }
        log::info!(
            "{:?}: {} states, {} conflicts",
            args.output,
            build.table.states.len(),
            build.conflicts().len()
        );
        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    real::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("steplr-gen disabled (compiled without `cli` feature)");
}
