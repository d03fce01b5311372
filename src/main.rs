//! gotint - Command-line wrapper colorizing `go test` output

use clap::Parser;
use gotint::colorize::Colorizer;
use gotint::error::Result;
use gotint::runner::GoTestCommand;
use std::ffi::OsString;
use std::process;

#[derive(Parser)]
#[command(name = "gotint")]
#[command(about = "Colorized output for go test", long_about = None)]
struct Cli {
    /// Arguments forwarded verbatim to `go test`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

fn run(cli: Cli) -> Result<i32> {
    let command = GoTestCommand::new(cli.args);

    // An explicit -json means the caller wants the raw event stream.
    if command.wants_raw_json() {
        return command.run_passthrough();
    }

    let colorizer = Colorizer::with_color(console::colors_enabled());
    let outcome = command.run_colorized(colorizer, std::io::stdout())?;

    if let Some(err) = outcome.engine_error {
        eprintln!("Warning: colorize: {}", err);
        if outcome.exit_code == 0 {
            return Ok(1);
        }
    }
    Ok(outcome.exit_code)
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
