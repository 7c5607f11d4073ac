use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use grammarian::cli::Cli;
use grammarian::compiler::{self, CompilationStatus};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

fn run(cli: &Cli) -> Result<CompilationStatus, Box<dyn Error>> {
    let (file, source) = compiler::read_source(cli.file.as_deref())?;
    Ok(compiler::compile(&source, &file, &cli.settings()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logger = TermLogger::init(
        cli.logging_level.level_filter(),
        ConfigBuilder::new().set_time_format_custom(&[]).build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    if let Err(e) = logger {
        eprintln!("Could not set up logging: {}", e);
    }

    match run(&cli) {
        Ok(CompilationStatus::Succeed) => ExitCode::SUCCESS,
        Ok(CompilationStatus::Failed) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
