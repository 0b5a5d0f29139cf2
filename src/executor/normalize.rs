//! Result normalization
//!
//! Raw response bodies are decoded with `arbitrary_precision`, so numbers
//! keep the exact literal the API sent.

use serde_json::Value;

use crate::error::{ExecutorError, Result};
use crate::models::InvocationResult;

/// Decode a raw body and package it with its status code.
///
/// An empty body or a JSON `null` yields no `bodyjson`. Anything that is
/// not JSON fails, whatever the status code.
pub fn normalize(raw: &[u8], code: Option<u16>) -> Result<InvocationResult> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(InvocationResult::new(code, None));
    }

    let body: Value = serde_json::from_slice(raw).map_err(ExecutorError::ResultFormat)?;
    let body = (!body.is_null()).then_some(body);

    Ok(InvocationResult::new(code, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_large_integers_keep_their_literal() {
        let raw = br#"{"max":9223372036854775807,"huge":123456789012345678901234567890,"ratio":1.10}"#;

        let result = normalize(raw, Some(200)).unwrap();
        let body = result.bodyjson.as_ref().unwrap();

        assert_eq!(body["max"].to_string(), "9223372036854775807");
        assert_eq!(body["huge"].to_string(), "123456789012345678901234567890");
        assert_eq!(body["ratio"].to_string(), "1.10");
        assert!(serde_json::to_string(&result)
            .unwrap()
            .contains("123456789012345678901234567890"));
    }

    #[test]
    fn test_packages_code() {
        let result = normalize(br#"{"kind":"PodList","items":[]}"#, Some(200)).unwrap();
        assert_eq!(result.code, Some(200));
        assert_eq!(result.bodyjson, Some(json!({"kind": "PodList", "items": []})));
        assert_eq!(result.systemerr, None);
    }

    #[test]
    fn test_malformed_body_fails() {
        let err = normalize(b"<html>404 page not found</html>", Some(404)).unwrap_err();
        assert!(matches!(err, ExecutorError::ResultFormat(_)));
        assert!(err.to_string().starts_with("result not valid JSON"));
    }

    #[test]
    fn test_empty_and_null_bodies() {
        assert_eq!(normalize(b"", Some(200)).unwrap().bodyjson, None);
        assert_eq!(normalize(b" \n", Some(200)).unwrap().bodyjson, None);
        assert_eq!(normalize(b"null", None).unwrap(), InvocationResult::default());
    }
}
