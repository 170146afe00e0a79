use serde::Serialize;

use crate::app::AppError;

/// Pretty-printed JSON for any breakdown record
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", to_json(value)?);
    Ok(())
}
