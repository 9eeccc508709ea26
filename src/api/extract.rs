use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

use crate::error::AppError;

const REQUIRED: &str = "This field is required.";

/// JSON body whose decode errors are reported against the offending field.
///
/// `web::Json` only knows that the body failed to parse; this keeps the path
/// to the bad value so the 400 names it.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for JsonBody<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: DeserializeOwned + 'static> FromRequest for JsonBody<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Bytes::from_request(req, payload);
        Box::pin(async move {
            let bytes = body.await?;
            Ok(JsonBody(decode(&bytes)?))
        })
    }
}

/// Decodes `bytes` as `T`, keying any failure on the field it happened at.
/// Missing fields are keyed on their own name; errors with no field path
/// (syntax, wrong top-level type) land under `body`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let path = err.path().to_string();
        let message = strip_position(&err.inner().to_string());

        match missing_field(&message) {
            Some(field) => AppError::invalid(&nested(&path, field), REQUIRED),
            None if path == "." || path.contains('?') => AppError::invalid("body", message),
            None => AppError::invalid(&path, message),
        }
    })?;
    de.end()
        .map_err(|e| AppError::invalid("body", strip_position(&e.to_string())))?;

    Ok(value)
}

/// serde_json appends " at line L column C"; callers don't need it.
fn strip_position(message: &str) -> String {
    match message.rsplit_once(" at line ") {
        Some((head, _)) => head.to_string(),
        None => message.to_string(),
    }
}

fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.strip_suffix('`'))
}

fn nested(parent: &str, field: &str) -> String {
    if parent == "." {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}
