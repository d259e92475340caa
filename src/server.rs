use std::sync::Arc;

use rmcp::model::{
    CallToolResult, Content, ErrorCode, ErrorData, Implementation, ProtocolVersion,
    ServerCapabilities, ServerInfo, Tool,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::args::Arguments;
use crate::catalog::tool_catalog;
use crate::error::ToolError;
use crate::github::GithubApi;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use crate::tools::{self, ToolName};

pub const SERVER_NAME: &str = "github-mcp";

/// Methods this server answers. Anything else is `Method not found`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    Initialized,
    ListTools,
    CallTool,
}

impl Method {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "initialize" => Some(Method::Initialize),
            "initialized" => Some(Method::Initialized),
            "tools/list" => Some(Method::ListTools),
            "tools/call" => Some(Method::CallTool),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ToolList {
    tools: &'static [Tool],
}

/// Stateless request dispatcher. The only thing it holds is the read-only
/// API client, so clones can serve requests independently.
#[derive(Clone)]
pub struct GithubMcpServer {
    api: Arc<dyn GithubApi>,
}

impl GithubMcpServer {
    pub fn new(api: Arc<dyn GithubApi>) -> Self {
        Self { api }
    }

    /// Produce the response for one parsed request. Never fails; every
    /// problem becomes a JSON-RPC error object.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.response_id();

        if request.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
            return JsonRpcResponse::error(
                id,
                ErrorData::invalid_request("Invalid Request: jsonrpc must be '2.0'", None),
            );
        }

        let name = request.method();
        if name.is_empty() {
            return JsonRpcResponse::error(
                id,
                ErrorData::invalid_request("Invalid Request: method is required", None),
            );
        }

        let Some(method) = Method::from_name(name) else {
            tracing::debug!(method = name, "Unknown method");
            return JsonRpcResponse::error(
                id,
                ErrorData::new(ErrorCode::METHOD_NOT_FOUND, "Method not found", None),
            );
        };
        tracing::debug!(method = name, "Handling request");

        match method {
            Method::Initialize => respond(id, &server_info()),
            Method::Initialized => JsonRpcResponse::result(id, Value::Object(Map::new())),
            Method::ListTools => respond(
                id,
                &ToolList {
                    tools: tool_catalog(),
                },
            ),
            Method::CallTool => {
                let params = request.params.unwrap_or_default();
                match self.call_tool(&params).await {
                    Ok(text) => respond(id, &CallToolResult::success(vec![Content::text(text)])),
                    Err(e) => JsonRpcResponse::error(id, e.to_rpc_error()),
                }
            }
        }
    }

    async fn call_tool(&self, params: &Map<String, Value>) -> Result<String, ToolError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or(ToolError::ToolNameRequired)?;
        let args = Arguments::from_value(params.get("arguments"));
        let tool = ToolName::from_name(name).ok_or(ToolError::UnknownTool)?;

        tracing::debug!(tool = name, "Calling tool");
        let outcome = tools::call_tool(self.api.as_ref(), tool, &args).await;
        if let Err(ref e) = outcome {
            tracing::warn!(tool = name, error = %e, "Tool call failed");
        }
        outcome
    }
}

/// Capabilities advertised in the `initialize` handshake.
pub fn server_info() -> ServerInfo {
    ServerInfo {
        protocol_version: ProtocolVersion::V_2024_11_05,
        capabilities: ServerCapabilities::builder().enable_tools().build(),
        server_info: Implementation {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        },
        instructions: None,
    }
}

fn respond<T: Serialize>(id: Value, payload: &T) -> JsonRpcResponse {
    match serde_json::to_value(payload) {
        Ok(result) => JsonRpcResponse::result(id, result),
        Err(e) => JsonRpcResponse::error(id, ErrorData::internal_error(e.to_string(), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::github::ApiRequest;
    use crate::protocol::Outcome;

    #[derive(Default)]
    struct CountingApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GithubApi for CountingApi {
        async fn call(&self, _request: ApiRequest) -> Result<Value, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"name": "demo", "html_url": "https://github.com/octo/demo"}))
        }
    }

    fn make_server() -> (GithubMcpServer, Arc<CountingApi>) {
        let api = Arc::new(CountingApi::default());
        (GithubMcpServer::new(api.clone()), api)
    }

    fn request(value: Value) -> JsonRpcRequest {
        JsonRpcRequest::parse_line(value.to_string().as_bytes()).unwrap()
    }

    fn error_of(response: &JsonRpcResponse) -> &ErrorData {
        match &response.outcome {
            Outcome::Error(e) => e,
            Outcome::Result(r) => panic!("expected error, got {}", r),
        }
    }

    fn result_of(response: &JsonRpcResponse) -> &Value {
        match &response.outcome {
            Outcome::Result(r) => r,
            Outcome::Error(e) => panic!("expected result, got {:?}", e),
        }
    }

    #[test]
    fn test_method_from_name() {
        assert_eq!(Method::from_name("tools/list"), Some(Method::ListTools));
        assert_eq!(Method::from_name("tools/call"), Some(Method::CallTool));
        assert_eq!(Method::from_name("resources/list"), None);
    }

    #[tokio::test]
    async fn test_wrong_version_is_invalid_request() {
        let (server, _) = make_server();
        let resp = server
            .handle_request(request(json!({"jsonrpc": "1.0", "id": 9, "method": "initialize"})))
            .await;
        assert_eq!(resp.id, json!(9));
        let err = error_of(&resp);
        assert_eq!(err.code, ErrorCode::INVALID_REQUEST);
        assert_eq!(err.message, "Invalid Request: jsonrpc must be '2.0'");
    }

    #[tokio::test]
    async fn test_missing_version_echoes_zero_id() {
        let (server, _) = make_server();
        let resp = server
            .handle_request(request(json!({"method": "initialize"})))
            .await;
        assert_eq!(resp.id, json!(0));
        assert_eq!(error_of(&resp).code.0, -32600);
    }

    #[tokio::test]
    async fn test_empty_method_is_invalid_request() {
        let (server, _) = make_server();
        let resp = server
            .handle_request(request(json!({"jsonrpc": "2.0", "id": "a", "method": ""})))
            .await;
        let err = error_of(&resp);
        assert_eq!(err.code.0, -32600);
        assert_eq!(err.message, "Invalid Request: method is required");
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (server, _) = make_server();
        let resp = server
            .handle_request(request(json!({"jsonrpc": "2.0", "id": 1, "method": "prompts/list"})))
            .await;
        let err = error_of(&resp);
        assert_eq!(err.code.0, -32601);
        assert_eq!(err.message, "Method not found");
    }

    #[tokio::test]
    async fn test_initialize_capabilities() {
        let (server, api) = make_server();
        let resp = server
            .handle_request(request(json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"})))
            .await;
        let result = result_of(&resp);
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["capabilities"]["tools"], json!({}));
        assert_eq!(result["serverInfo"]["name"], "github-mcp");
        assert_eq!(result["serverInfo"]["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_initialized_returns_empty_object() {
        let (server, _) = make_server();
        let resp = server
            .handle_request(request(json!({"jsonrpc": "2.0", "id": 2, "method": "initialized"})))
            .await;
        assert_eq!(result_of(&resp), &json!({}));
    }

    #[tokio::test]
    async fn test_list_tools_ignores_params() {
        let (server, _) = make_server();
        let resp = server
            .handle_request(request(
                json!({"jsonrpc": "2.0", "id": 3, "method": "tools/list", "params": {"cursor": "x"}}),
            ))
            .await;
        let tools = result_of(&resp)["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 12);
        assert_eq!(tools[0]["name"], "github_list_repos");
    }

    #[tokio::test]
    async fn test_call_tool_success_wraps_text() {
        let (server, api) = make_server();
        let resp = server
            .handle_request(request(json!({
                "jsonrpc": "2.0",
                "id": 4,
                "method": "tools/call",
                "params": {"name": "github_create_repo", "arguments": {"name": "demo"}}
            })))
            .await;
        let result = result_of(&resp);
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(
            result["content"][0]["text"],
            "Repository 'demo' created successfully: https://github.com/octo/demo"
        );
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_call_tool_without_name() {
        let (server, api) = make_server();
        let resp = server
            .handle_request(request(json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call"})))
            .await;
        let err = error_of(&resp);
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(err.message, "tool name required");
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let (server, api) = make_server();
        let resp = server
            .handle_request(request(json!({
                "jsonrpc": "2.0",
                "id": 6,
                "method": "tools/call",
                "params": {"name": "github_delete_repo", "arguments": {}}
            })))
            .await;
        let err = error_of(&resp);
        assert_eq!(err.code.0, -32603);
        assert_eq!(err.message, "tool not found");
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_call_tool_arguments_of_wrong_shape() {
        let (server, api) = make_server();
        let resp = server
            .handle_request(request(json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "tools/call",
                "params": {"name": "github_get_repo", "arguments": "owner=o"}
            })))
            .await;
        assert_eq!(error_of(&resp).message, "owner required");
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }
}
