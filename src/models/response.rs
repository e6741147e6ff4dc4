use serde::{Deserialize, Serialize};

/// Outcome of one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    /// HTTP-like status: 200 done, 400 rejected request, 409 gated, 502
    /// downstream failure.
    pub status_code: u16,
    /// Human readable outcome.
    pub body: String,
}

impl HandlerResponse {
    /// 200
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status_code: 200, body: body.into() }
    }

    /// 400
    pub fn bad_request(body: impl Into<String>) -> Self {
        Self { status_code: 400, body: body.into() }
    }

    /// 409
    pub fn conflict(body: impl Into<String>) -> Self {
        Self { status_code: 409, body: body.into() }
    }

    /// 502
    pub fn bad_gateway(body: impl Into<String>) -> Self {
        Self { status_code: 502, body: body.into() }
    }
}
