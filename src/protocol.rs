//! JSON-RPC 2.0 envelope for the line-delimited stdio transport.

use rmcp::model::ErrorData;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// One request line. Fields are kept loose so that version and method
/// problems can be answered with an error instead of being dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,

    #[serde(default)]
    pub id: Option<Value>,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

impl JsonRpcRequest {
    /// Parse one input line. `None` means the line is not a request object
    /// and must be dropped without a reply.
    pub fn parse_line(line: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(line).ok()?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// The id to echo back; a missing or null id is answered as `0`.
    pub fn response_id(&self) -> Value {
        self.id.clone().unwrap_or_else(|| Value::from(0))
    }

    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Exactly one of `result` or `error`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(ErrorData),
}

impl JsonRpcResponse {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn error(id: Value, error: ErrorData) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Error(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_request() {
        let req = JsonRpcRequest::parse_line(
            br#"{"jsonrpc":"2.0","id":"abc","method":"tools/call","params":{"name":"x"}}"#,
        )
        .unwrap();
        assert_eq!(req.jsonrpc.as_deref(), Some("2.0"));
        assert_eq!(req.response_id(), json!("abc"));
        assert_eq!(req.method(), "tools/call");
        assert_eq!(req.params.unwrap()["name"], "x");
    }

    #[test]
    fn test_missing_and_null_id_become_zero() {
        let req = JsonRpcRequest::parse_line(br#"{"jsonrpc":"2.0","method":"initialize"}"#).unwrap();
        assert_eq!(req.response_id(), json!(0));
        let req =
            JsonRpcRequest::parse_line(br#"{"jsonrpc":"2.0","id":null,"method":"initialize"}"#)
                .unwrap();
        assert_eq!(req.response_id(), json!(0));
    }

    #[test]
    fn test_missing_fields_still_parse() {
        let req = JsonRpcRequest::parse_line(br#"{"id":7}"#).unwrap();
        assert!(req.jsonrpc.is_none());
        assert_eq!(req.method(), "");
        assert_eq!(req.response_id(), json!(7));
    }

    #[test]
    fn test_unparsable_lines_are_rejected() {
        for line in [
            "not json",
            "{\"jsonrpc\":\"2.0\"",
            "[1,2,3]",
            "\"2.0\"",
            "42",
            "\u{fffd}garbage",
            r#"{"jsonrpc":"2.0","method":5}"#,
            r#"{"jsonrpc":"2.0","method":"tools/list","params":[1]}"#,
        ] {
            assert!(JsonRpcRequest::parse_line(line.as_bytes()).is_none(), "{}", line);
        }
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        assert!(JsonRpcRequest::parse_line(b"\xff\xfe garbage").is_none());
        assert!(JsonRpcRequest::parse_line(b"{\"jsonrpc\":\"2.0\",\"method\":\"\xff\"}").is_none());
    }

    #[test]
    fn test_response_carries_exactly_one_outcome() {
        let ok = serde_json::to_value(JsonRpcResponse::result(json!(1), json!({}))).unwrap();
        assert_eq!(ok, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));

        let err = serde_json::to_value(JsonRpcResponse::error(
            json!("x"),
            ErrorData::invalid_request("Invalid Request: method is required", None),
        ))
        .unwrap();
        assert_eq!(
            err,
            json!({
                "jsonrpc": "2.0",
                "id": "x",
                "error": {"code": -32600, "message": "Invalid Request: method is required"}
            })
        );
    }
}
