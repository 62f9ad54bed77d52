pub mod images;
pub mod messages;
pub mod profiles;
pub mod reviews;
pub mod service_requests;

/// Returns true when the value is missing or only whitespace.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
