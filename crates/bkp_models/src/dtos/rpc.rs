use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

pub const JSON_RPC_VERSION: &str = "2.0";

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, T: Serialize> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: T,
}

impl<'a, T: Serialize> RpcRequest<'a, T> {
    pub fn new(id: u64, method: &'a str, params: T) -> Self {
        Self {
            jsonrpc: JSON_RPC_VERSION,
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Display for RpcError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    #[serde(default)]
    pub id: Option<Value>,

    #[serde(default)]
    pub result: Option<T>,

    #[serde(default)]
    pub error: Option<RpcError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_is_serialized_as_json_rpc() {
        let request = RpcRequest::new(7, "schedule.set", json!({ "id": "s1", "enabled": true }));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "schedule.set",
                "params": { "id": "s1", "enabled": true }
            })
        );
    }

    #[test]
    fn error_response_is_parsed() {
        let response: RpcResponse<Value> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": 10, "message": "no such object" }
        }))
        .unwrap();

        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.to_string(), "no such object (code 10)");
    }
}
