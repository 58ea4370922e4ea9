//! Result and failure documents on stdout

use crate::aws::error::find_aws_error;
use anyhow::Result;
use awsmod_common::FailureOutput;
use serde::Serialize;
use std::io::Write;

/// Build the failure document for an error chain.
///
/// `msg` is the outermost context; the rest of the chain goes to `cause`.
/// The first AWS error in the chain supplies the code and a suggestion.
pub fn failure(error: &anyhow::Error) -> FailureOutput {
    let mut out = FailureOutput::new(error.to_string());
    out.cause = error.chain().skip(1).map(|cause| cause.to_string()).collect();
    if let Some(aws) = find_aws_error(error) {
        out.error_code = aws.code().map(str::to_string);
        out.suggestion = aws.suggestion();
    }
    out
}

/// Print a document as pretty JSON followed by a newline
pub fn print_json<T: Serialize>(doc: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, doc)?;
    writeln!(stdout)?;
    Ok(())
}
