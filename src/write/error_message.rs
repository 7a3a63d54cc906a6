use crate::error::RemoteError;

pub const GENERIC_WRITE_ERROR: &str = "An unexpected error occurred. Please try again.";

const KNOWN_WRITE_ERRORS: [(&str, &str); 4] = [
    (
        "Cooldown not over",
        "Cooldown period is not over. Please wait and try again later.",
    ),
    ("transaction reverted", "Transaction was reverted."),
    (
        "Error in the called contract",
        "An error occurred while calling the contract.",
    ),
    (
        "execution_error",
        "An error occurred during the transaction execution.",
    ),
];

/// User-facing message for a failed paint submission.
#[must_use]
pub fn humanize_write_error(error: &RemoteError) -> &'static str {
    let detail = error.detail();
    KNOWN_WRITE_ERRORS
        .iter()
        .find(|(needle, _)| detail.contains(needle))
        .map_or(GENERIC_WRITE_ERROR, |(_, message)| *message)
}
