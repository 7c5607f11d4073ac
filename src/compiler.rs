/*
    Runs the front end over a source text: scanning, parsing, the sentence
    dump and finally the release of the tree.
*/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use thiserror::Error;

use crate::ast::teardown::release_program;
use crate::ast::Program;
use crate::error_handling::*;
use crate::parser::lexer::Scanner;
use crate::parser::{self, SyntacticAnalysisStatus};

pub const STDIN_NAME: &str = "<stdin>";

/// What the semantic actions leave behind for the driver.
#[derive(Debug, Default)]
pub struct CompilerState {
    pub ast: Option<Program>,
    pub succeed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    // Whether whitespace and comments show up in the scanner log
    pub log_ignored_lexemes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_ignored_lexemes: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilationStatus {
    Succeed,
    Failed,
}

#[derive(Debug, Error)]
pub enum SourceErrorType {
    // There was an issue with reading the input
    #[error("File error: {0}")]
    FileError(#[from] io::Error),
}

impl ErrorType for SourceErrorType {}

impl PartialEq for SourceErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SourceErrorType::FileError(a), SourceErrorType::FileError(b)) => a.kind() == b.kind(),
        }
    }
}

pub type SourceError = Error<SourceErrorType>;

/// Reads the program from `file`, or from stdin when there is none. Returns
/// the name to report locations with, along with the source.
pub fn read_source(file: Option<&Path>) -> Result<(PathBuf, String), SourceError> {
    let (path, source) = match file {
        Some(path) => (path.to_path_buf(), fs::read_to_string(path)),
        None => (PathBuf::from(STDIN_NAME), io::read_to_string(io::stdin())),
    };

    match source {
        Ok(source) => Ok((path, source)),
        Err(e) => Err(SourceError::new(path, 0, SourceErrorType::FileError(e))),
    }
}

/// Scans and parses `source`, keeping the resulting state around.
pub fn analyze(
    source: &str,
    file: &Path,
    settings: &Settings,
) -> (SyntacticAnalysisStatus, CompilerState) {
    let mut state = CompilerState::default();
    let scanner = Scanner::new(source, settings.log_ignored_lexemes);
    let status = parser::parse(&mut state, scanner, file);
    return (status, state);
}

pub fn compile(source: &str, file: &Path, settings: &Settings) -> CompilationStatus {
    let (status, state) = analyze(source, file, settings);

    let compilation_status = match status {
        SyntacticAnalysisStatus::Accept => {
            if let Some(program) = &state.ast {
                info!("Program:");
                for (i, sentence) in program.sentences.iter().enumerate() {
                    info!("Sentence {}: {}", i, sentence);
                }
            }
            CompilationStatus::Succeed
        }
        SyntacticAnalysisStatus::Reject => {
            error!("The syntactic-analysis phase rejects the input program.");
            CompilationStatus::Failed
        }
    };

    // A rejected program may still have been built, it is released the same
    if let Some(program) = state.ast {
        debug!("Releasing AST resources...");
        let released = release_program(program);
        debug!("Released {:?}", released);
    }

    debug!("Compilation is done.");
    return compilation_status;
}
