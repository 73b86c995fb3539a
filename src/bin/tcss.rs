use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use contui::tcss::{self, Diagnostic, Lexer, loader, minify};

#[derive(Parser, Debug)]
#[command(name = "tcss")]
#[command(about = "Inspect and compact TCSS stylesheets")]
struct Cli {
    /// Append log records to this file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// Also log every lexer and parser diagnostic; requires --log
    #[arg(long, global = true, requires = "log")]
    trace: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the token stream, one token per line
    Tokens { path: PathBuf },
    /// Parse a stylesheet and print its rules
    Parse { path: PathBuf },
    /// Print the stylesheet with comments and insignificant whitespace removed
    Minify { path: PathBuf },
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("warning: {diagnostic}");
    }
}

fn run(cli: Cli) -> contui::Result<()> {
    if let Some(path) = cli.log {
        let level = if cli.trace {
            log::Level::Trace
        } else {
            log::Level::Debug
        };
        contui::init_logger_with_level(path, level)?;
    }

    match cli.command {
        Command::Tokens { path } => {
            let mut lexer = Lexer::from_path(&path)?;
            for token in lexer.process() {
                println!("{token:?}");
            }
            report(lexer.diagnostics());
        }
        Command::Parse { path } => {
            let source = loader::read_stylesheet(&path)?;
            let location = path.to_string_lossy();
            let mut parser = tcss::Parser::new(source.as_str());
            let sheet = parser.parse_stylesheet(Some(location.as_ref()));
            print!("{sheet}");
            report(parser.diagnostics());
        }
        Command::Minify { path } => {
            let source = loader::read_stylesheet(&path)?;
            println!("{}", minify::minify(&source));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
