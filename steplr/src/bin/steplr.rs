//! Command-line front end for the step-wise engine.
//!
//! Loads a JSON parse table, tokenizes the input with the table's terminals,
//! and steps through the parse printing the stack after every instruction.
//! `--steps` stops early and `--back` then walks back through the history,
//! which is how an interactive front end would replay a run.

#[cfg(feature = "cli")]
mod real {
    use anyhow::{Context, Result};
    use clap::Parser;
    use std::path::PathBuf;
    use std::sync::Arc;
    use steplr::{END_MARKER, ParserTable, Session, Tokenizer};

    #[derive(Parser)]
    #[command(version, about = "Step through an SLR parse")]
    struct Args {
        /// Path to the JSON parse table
        #[arg(short = 't', long)]
        table: PathBuf,

        /// Input text; the end-marker is appended when missing
        #[arg(short = 'i', long)]
        input: String,

        /// Stop after this many instructions
        #[arg(short = 's', long)]
        steps: Option<usize>,

        /// Step back this many instructions before printing the result
        #[arg(short = 'b', long, default_value_t = 0)]
        back: usize,

        /// Print the AST forest as JSON
        #[arg(long)]
        json: bool,
    }

    pub fn main() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let table = ParserTable::load(&args.table)
            .with_context(|| format!("can't load table {:?}", args.table))?;
        if let Some(name) = &table.name {
            log::info!("loaded table {:?}", name);
        }
        let tokenizer = Tokenizer::for_table(&table)?;
        let mut tokens = tokenizer.tokenize(&args.input)?;
        if tokens.last().map(|t| t.as_str()) != Some(END_MARKER) {
            tokens.push(END_MARKER.into());
        }

        let mut session = Session::new(Arc::new(table));
        session.start(tokens);

        let limit = args.steps.unwrap_or(usize::MAX);
        let mut count = 0;
        while !session.is_finished() && count < limit {
            let action = session.forward()?;
            count += 1;
            if let Some(ctx) = session.context() {
                println!("{:>4}  {:<8} {}", count, action.to_string(), ctx.dump_stack());
            }
        }

        for _ in 0..args.back {
            if !session.back()? {
                break;
            }
            count -= 1;
            if let Some(ctx) = session.context() {
                println!("{:>4}  {:<8} {}", count, "back", ctx.dump_stack());
            }
        }

        if let Some(ctx) = session.context() {
            if args.json {
                println!("{}", serde_json::to_string_pretty(ctx.forest())?);
            } else {
                for node in ctx.forest() {
                    print!("{}", node);
                }
            }
            log::info!(
                "{} shifts, {} reductions, finished: {}",
                ctx.stats().shifts,
                ctx.stats().reductions,
                ctx.is_finished()
            );
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    real::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("steplr disabled (compiled without `cli` feature)");
}
