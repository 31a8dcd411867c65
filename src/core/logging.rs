//! Request-scoped logging context.
//!
//! Every inbound request gets an ID that is stored in a tokio task-local so
//! log lines emitted deep inside the pipeline can be correlated without
//! threading the ID through every call.

/// Response header carrying the request ID back to the caller.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    /// Task-local storage for the current request ID.
    pub static REQUEST_ID: String;
}

/// Get the current request ID from context, if set.
///
/// Returns an empty string if no request ID is set.
pub fn get_request_id() -> String {
    REQUEST_ID.try_with(|id| id.clone()).unwrap_or_default()
}

/// Generate a new unique request ID using UUID v4.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Accept a caller-supplied request ID if it is short printable ASCII.
pub fn sanitize_request_id(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    let valid = !trimmed.is_empty()
        && trimmed.len() <= 128
        && trimmed.chars().all(|c| c.is_ascii_graphic());
    valid.then(|| trimmed.to_string())
}
