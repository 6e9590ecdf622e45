/// Validates an id issued by a payment provider before it is used in a
/// request path.
/// Rules:
/// - 1-64 characters
/// - Only ASCII letters, numbers and hyphens
pub fn is_valid_provider_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
