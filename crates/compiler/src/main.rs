use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "rillc", version, about = "Compiler for the Rill language")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Print shell completion script for the given shell and exit.
    #[arg(long, value_enum, global = true)]
    completions: Option<clap_complete::Shell>,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a source file to C and link it with rill-runtime.
    Build {
        input: PathBuf,
        #[arg(short, long, default_value = "a.out")]
        output: PathBuf,
    },
    /// Run the front end only (lex, parse, analyze) and report diagnostics.
    Check { input: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "rillc", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    let result = match cli.command {
        Some(Command::Build { input, output }) => rillc::compile_file(&input, &output),
        Some(Command::Check { input }) => rillc::check_file(&input),
        None => {
            eprintln!("no subcommand given; try `rillc build <file>` or `rillc check <file>`");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
