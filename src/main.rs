use clap::Parser;
use route_report::cli::Cli;
use route_report::constants;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too
            let code = if e.use_stderr() { constants::EXIT_ARGUMENT } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match cli.run() {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            if let Some(hint) = err.hint() {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(err.exit_code())
        }
    }
}
