//! # book-rip CLI
//!
//! Command-line interface for the book ripper.
//!
//! ## Usage
//! ```bash
//! book-rip <input_directory> <output_directory>
//! book-rip ~/Scans/book ~/Books/book-pages --debug --output json
//! ```
//!
//! Exits with 1 on usage errors, failed preconditions and aborted runs.

mod cli;

use book_ripper::error::{BookRipError, ValidationError};
use std::process::ExitCode;

fn main() -> ExitCode {
    book_ripper::init_tracing();

    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(BookRipError::Validation(ValidationError::Usage { message })) => {
            println!("{}", message);
            ExitCode::from(1)
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::from(1)
        }
    }
}
