//! JSON wire format of the remote arithmetic service
//!
//! Requests are `{"A": [[..]], "B": [[..]]}` (no `B` for reduction).
//! Replies come in several historical shapes, all accepted here:
//!
//! - `{"result": [[..]]}` / `{"error": "..."}`
//! - `{"Ok": [[..]]}` / `{"Err": "..."}`
//! - a bare nested array
//! - any of the above encoded once more as a JSON string
//!
//! An error field always wins over a result field.

use log::trace;
use serde_json::{json, Map, Value};

use crate::delegate::{DelegateReply, DelegateRequest};
use mxtrace_core::{Matrix, MxError, Result};

/// How many string layers are unwrapped before giving up
const MAX_STRING_NESTING: usize = 1;

/// Request body for `request`
pub fn encode_request(request: &DelegateRequest<'_>) -> Value {
    let mut body = json!({ "A": request.a });
    if let Some(b) = request.b {
        body["B"] = json!(b);
    }
    body
}

/// Decode a reply body
pub fn decode_reply(body: &str) -> Result<DelegateReply> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| MxError::MalformedResponse(format!("invalid JSON: {e}")))?;
    decode_value(value)
}

/// Decode an already-parsed reply
pub fn decode_value(value: Value) -> Result<DelegateReply> {
    decode_nested(value, 0)
}

fn decode_nested(value: Value, depth: usize) -> Result<DelegateReply> {
    match value {
        Value::String(text) if depth < MAX_STRING_NESTING => {
            trace!("unwrapping string-encoded reply");
            let inner: Value = serde_json::from_str(&text)
                .map_err(|e| MxError::MalformedResponse(format!("invalid JSON string: {e}")))?;
            decode_nested(inner, depth + 1)
        }
        Value::Array(_) => decode_matrix(value).map(Ok),
        Value::Object(fields) => decode_object(fields),
        other => Err(MxError::MalformedResponse(format!(
            "expected an object or array, got {}",
            kind(&other)
        ))),
    }
}

fn decode_object(mut fields: Map<String, Value>) -> Result<DelegateReply> {
    for key in ["error", "Err"] {
        match fields.remove(key) {
            None | Some(Value::Null) => {}
            Some(Value::String(message)) if message.is_empty() => {}
            Some(Value::String(message)) => return Ok(Err(message)),
            Some(other) => return Ok(Err(other.to_string())),
        }
    }
    for key in ["result", "Ok"] {
        match fields.remove(key) {
            None | Some(Value::Null) => {}
            Some(value) => return decode_matrix(value).map(Ok),
        }
    }
    Err(MxError::MalformedResponse(
        "reply has neither a result nor an error".to_string(),
    ))
}

fn decode_matrix(value: Value) -> Result<Matrix> {
    let rows: Vec<Vec<f64>> = serde_json::from_value(value)
        .map_err(|e| MxError::MalformedResponse(format!("result is not a matrix: {e}")))?;
    Matrix::new(rows).map_err(|e| MxError::MalformedResponse(format!("result is not a matrix: {e}")))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mxtrace_core::Operation;

    fn ok(rows: Vec<Vec<f64>>) -> DelegateReply {
        Ok(Matrix::new(rows).unwrap())
    }

    #[test]
    fn test_encode_request() {
        let a = Matrix::from([[1.0, 2.0]]);
        let b = Matrix::from([[3.0], [4.0]]);
        let body = encode_request(&DelegateRequest::new(Operation::Multiply, &a, Some(&b)));
        assert_eq!(body, json!({"A": [[1.0, 2.0]], "B": [[3.0], [4.0]]}));

        let body = encode_request(&DelegateRequest::new(Operation::ReduceToRref, &a, None));
        assert_eq!(body, json!({"A": [[1.0, 2.0]]}));
    }

    #[test]
    fn test_accepted_shapes() {
        let expected = ok(vec![vec![6.0, 8.0], vec![10.0, 12.0]]);
        for body in [
            r#"{"result": [[6, 8], [10, 12]]}"#,
            r#"{"result": [[6, 8], [10, 12]], "error": null}"#,
            r#"{"Ok": [[6, 8], [10, 12]]}"#,
            r#"[[6, 8], [10, 12]]"#,
            r#""{\"result\": [[6, 8], [10, 12]]}""#,
            r#""[[6, 8], [10, 12]]""#,
        ] {
            assert_eq!(decode_reply(body).unwrap(), expected, "{body}");
        }
    }

    #[test]
    fn test_error_wins_over_result() {
        let reply = decode_reply(r#"{"result": [[1]], "error": "boom"}"#).unwrap();
        assert_eq!(reply, Err("boom".to_string()));

        let reply = decode_reply(r#"{"Err": "add requires same dimensions"}"#).unwrap();
        assert_eq!(reply, Err("add requires same dimensions".to_string()));
    }

    #[test]
    fn test_malformed_replies() {
        for body in [
            "not json",
            "42",
            "{}",
            r#"{"result": null}"#,
            r#"{"result": [[1, 2], [3]]}"#,
            r#"{"result": "x"}"#,
            r#""\"[[1]]\"""#,
        ] {
            assert!(
                matches!(decode_reply(body), Err(MxError::MalformedResponse(_))),
                "{body}"
            );
        }
    }

    #[test]
    fn test_empty_result_is_a_matrix() {
        assert_eq!(decode_reply(r#"{"result": []}"#).unwrap(), Ok(Matrix::empty()));
    }
}
