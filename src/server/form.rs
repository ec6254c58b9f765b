//! Reading the multipart forms that the client sends for writes.

use axum::extract::Multipart;

use crate::{Error, params::Params};

/// Collect every text field of `multipart`.
///
/// # Errors
/// Returns [Error::MultipartError] if the body is not a valid multipart form.
pub(crate) async fn read_form(mut multipart: Multipart) -> Result<Params, Error> {
    let mut params = Params::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|error| Error::MultipartError(error.to_string()))?;
        params.insert(name, value);
    }

    Ok(params)
}

/// The trimmed, non-empty value of `key`.
///
/// # Errors
/// Returns [Error::MissingField] if `key` is absent or blank.
pub(crate) fn required<'a>(params: &'a Params, key: &str) -> Result<&'a str, Error> {
    params
        .get(key)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::MissingField(key.to_owned()))
}

/// Parse a database ID given as `field`.
///
/// # Errors
/// Returns [Error::InvalidField] if `value` is not an integer.
pub(crate) fn parse_id(field: &str, value: &str) -> Result<i64, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidField(field.to_owned(), value.to_owned()))
}
