//! Handling of the platform's `{"success": ..., "data": ...}` envelope.

use orchestrall_error::{
    OperationError, OrchestrallResult, TransportError, TransportErrorKind,
};
use serde_json::Value;

/// Opens a response envelope, yielding its `data` payload.
///
/// A `success: false` envelope becomes an [`OperationError`] carrying the
/// server's own failure report: the `error` field when present, then the
/// `message` field, then the whole body so nothing the server said is lost.
/// A body without a boolean `success` field is not an envelope at all and
/// is reported as a malformed response.
pub(crate) fn open(operation: &str, body: Value) -> OrchestrallResult<Value> {
    let success = body.get("success").and_then(Value::as_bool).ok_or_else(|| {
        TransportError::new(TransportErrorKind::Malformed(format!(
            "{operation} response has no boolean `success` field"
        )))
    })?;
    if !success {
        let message = body
            .get("error")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());
        return Err(OperationError::new(operation, message).into());
    }
    Ok(body.get("data").cloned().unwrap_or(Value::Null))
}
