// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ExampleError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use te_api::ApiClient;

/// GET `endpoint` and decode the body into `T`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &ApiClient,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<T, ExampleError> {
    let body = require(client.get(endpoint, params).await?, endpoint)?;
    decode(body, endpoint)
}

/// POST `body` to `endpoint` and return the raw JSON answer.
pub(crate) async fn post_json(
    client: &ApiClient,
    endpoint: &str,
    body: &Value,
    params: &[(&str, &str)],
) -> Result<Value, ExampleError> {
    require(client.post(endpoint, body, params).await?, endpoint)
}

pub(crate) fn require(body: Option<Value>, endpoint: &str) -> Result<Value, ExampleError> {
    body.ok_or_else(|| ExampleError::NoResult(endpoint.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(body: Value, endpoint: &str) -> Result<T, ExampleError> {
    serde_json::from_value(body).map_err(|e| ExampleError::UnexpectedShape {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_missing_body_is_no_result() {
        assert!(matches!(
            require(None, "/agents"),
            Err(ExampleError::NoResult(e)) if e == "/agents"
        ));
    }

    #[test]
    fn test_decode_reports_endpoint() {
        let named: Named = decode(json!({"name": "a"}), "/x").unwrap();
        assert_eq!(named.name, "a");

        match decode::<Named>(json!({"other": 1}), "/x") {
            Err(ExampleError::UnexpectedShape { endpoint, reason }) => {
                assert_eq!(endpoint, "/x");
                assert!(reason.contains("name"));
            }
            other => panic!("Expected UnexpectedShape, got {other:?}"),
        }
    }
}
