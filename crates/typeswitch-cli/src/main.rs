//! typeswitch CLI: exhaustiveness checking for type switches over
//! enum-like Go interfaces. See `typeswitch --help` for usage.

use clap::Parser;

mod cli_args;
mod commands;
mod logging;

use cli_args::{Cli, Commands};

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();

    let formatter: Box<dyn typeswitch_output::OutputFormatter> = if cli.json {
        Box::new(typeswitch_output::json::JsonFormatter)
    } else {
        Box::new(typeswitch_output::human::HumanFormatter)
    };

    let global = commands::GlobalOptions {
        config: cli.config,
        verbose: cli.verbose,
    };
    let exit_code = match cli.command {
        Commands::Check(args) => commands::check::run(&*formatter, &global, args),
        Commands::Enums(args) => commands::enums::run(&*formatter, &global, args),
    };

    std::process::exit(exit_code);
}
