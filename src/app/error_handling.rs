//! Error handling utilities

use tracing::error;

use crate::error::ToolkitError;

/// Report a fatal error and exit with its status code
///
/// - For `ToolkitError`: shows the user message, and the developer message
///   with its cause chain in verbose mode
/// - For other errors: shows the message and, in verbose mode, the chain
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);
    eprintln!("{}", render_fatal_error(&error, verbose));
    std::process::exit(exit_code_for(&error))
}

/// Exit status for an error: the `ToolkitError` category code, 1 otherwise
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<ToolkitError>()
        .map(ToolkitError::exit_code)
        .unwrap_or(1)
}

/// Text printed to stderr for a fatal error
pub fn render_fatal_error(error: &anyhow::Error, verbose: u8) -> String {
    if let Some(toolkit_err) = error.downcast_ref::<ToolkitError>() {
        let mut out = toolkit_err.user_message();
        if verbose >= 1 {
            out.push_str("\n\nContext Chain:\n");
            out.push_str(&toolkit_err.developer_message());
        }
        return out;
    }

    let mut out = format!("Error: {error}");
    if verbose >= 1 {
        out.push_str("\n\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            out.push_str(&format!("\n  {}: {}", i, cause));
        }
    }
    out
}
