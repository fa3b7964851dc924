use crate::core::error::ValidationError;
use uuid::Uuid;

/// Parse the requested number of winners.
///
/// Must be a whole number between 1 and `max`. Requests larger than the
/// candidate pool are not an error here; the draw clamps them.
pub fn parse_draw_count(raw: &str, max: usize) -> Result<usize, ValidationError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::MissingParameter("count".to_string()));
    }

    // Parse as signed so "-3" is reported as out of range rather than malformed
    let count: i64 = raw
        .parse()
        .map_err(|_| ValidationError::InvalidFormat(format!("count must be a whole number, got '{}'", raw)))?;

    if count < 1 {
        return Err(ValidationError::OutOfRange(format!(
            "count must be at least 1, got {}",
            count
        )));
    }

    match usize::try_from(count) {
        Ok(count) if count <= max => Ok(count),
        _ => Err(ValidationError::OutOfRange(format!(
            "count must be at most {}, got {}",
            max, count
        ))),
    }
}

/// Split one line of a bulk import into `(first, last)`.
///
/// The first word is the first name, the remainder (possibly empty) is the
/// last name. Blank lines yield `None`.
pub fn parse_bulk_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match line.split_once(char::is_whitespace) {
        Some((first, rest)) => Some((first.to_string(), rest.trim().to_string())),
        None => Some((line.to_string(), String::new())),
    }
}

pub fn parse_user_id(raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw.trim())
        .map_err(|e| ValidationError::InvalidFormat(format!("user id '{}': {}", raw, e)))
}

/// Trim and check the names of a user to be created
pub fn validate_names(first: &str, last: &str) -> Result<(String, String), ValidationError> {
    let first = first.trim();
    if first.is_empty() {
        return Err(ValidationError::MissingParameter("first_name".to_string()));
    }

    Ok((first.to_string(), last.trim().to_string()))
}
