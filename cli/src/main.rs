use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use protofile::{open_with, to_json, ParseOptions, ProtoError, ProtoFile, Strictness};

#[derive(Parser)]
#[command(name = "protofile")]
#[command(about = "Inspect the services and messages declared in a .proto file", long_about = None)]
struct Cli {
    /// Fail on unresolved types, bad field numbers and redeclarations
    #[arg(long, global = true)]
    strict: bool,

    /// Skip malformed statements instead of stopping at the first one
    #[arg(long, global = true)]
    recover: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the services, methods and messages of a `.proto` file
    Inspect {
        /// Input `.proto` file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Dump the model of a `.proto` file as JSON
    Json {
        /// Input `.proto` file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.json` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print diagnostics; exits non-zero if there are any
    Check {
        /// Input `.proto` file
        #[arg(short, long)]
        input: PathBuf,
    },
}

impl Cli {
    fn options(&self) -> ParseOptions {
        ParseOptions {
            strictness: if self.strict { Strictness::Strict } else { Strictness::Lenient },
            recover:    self.recover,
        }
    }
}

fn init_logging(verbose: bool) {
    // RUST_LOG wins over -v
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn describe(file: &ProtoFile) -> String {
    let mut out = String::new();
    if let Some(syntax) = file.syntax() {
        out.push_str(&format!("syntax {}\n", syntax));
    }
    for service in file.services() {
        out.push_str(&format!("service {}\n", service.name()));
        for method in service.methods() {
            out.push_str(&format!("  {}\n", method));
        }
    }
    for message in file.messages().values() {
        out.push_str(&format!("message {}\n", message.name()));
        for field in message.fields().values() {
            out.push_str(&format!("  {}\n", field));
        }
    }
    out
}

fn main() -> Result<ExitCode, ProtoError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let options = cli.options();
    tracing::debug!("parse options: {:?}", options);

    match &cli.command {
        Commands::Inspect { input } => {
            let (file, _diagnostics) = open_with(input, &options)?;
            print!("{}", describe(&file));
            Ok(ExitCode::SUCCESS)
        }

        Commands::Json { input, output } => {
            let (file, _diagnostics) = open_with(input, &options)?;
            let json = to_json(&file)?;
            if let Some(out_path) = output {
                fs::write(out_path, &json)?;
                println!("Wrote {} → {}", input.display(), out_path.display());
            } else {
                println!("{}", json);
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Check { input } => {
            let (_file, diagnostics) = open_with(input, &options)?;
            for diagnostic in &diagnostics {
                println!("{}: {}", input.display(), diagnostic);
            }
            if diagnostics.is_empty() {
                println!("{}: ok", input.display());
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let file = protofile::parse(
            "syntax = \"proto3\";\nmessage Id { int64 value = 1; }\nservice S {\n rpc get(Id) returns (stream Id);\n}\n",
        )
        .unwrap();
        assert_eq!(
            describe(&file),
            "syntax proto3\nservice S\n  rpc get(Id) returns (stream Id)\nmessage Id\n  int64 value = 1\n"
        );
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["protofile", "check", "--strict", "-i", "a.proto"]).unwrap();
        assert_eq!(cli.options(), ParseOptions::strict());
        assert!(matches!(cli.command, Commands::Check { .. }));
    }
}
