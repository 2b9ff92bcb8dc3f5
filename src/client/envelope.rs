//! Response normalization
//!
//! The backend answers either with a bare payload or with an envelope
//! `{ "success": bool, "data": ..., "message": "..." }`. Everything that
//! leaves this module is the bare payload in one canonical shape.

use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::models::Record;

/// Keys a count endpoint may use for its number.
const COUNT_KEYS: [&str; 5] = ["count", "total", "quantidade", "ativos", "data"];

// == Envelope ==
/// Strips the `{success, data, message}` wrapper if present.
///
/// `success: false` becomes [`ApiError::Rejected`]. A success envelope without
/// `data` yields `Value::Null`.
pub fn unwrap_envelope(body: Value) -> ApiResult<Value> {
    let Value::Object(mut map) = body else {
        return Ok(body);
    };

    let success = map.get("success").and_then(Value::as_bool);

    match success {
        Some(false) => {
            let message = map
                .get("message")
                .or_else(|| map.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("A operação não pôde ser concluída")
                .to_string();
            Err(ApiError::Rejected(message))
        }
        Some(true) => Ok(map.remove("data").unwrap_or(Value::Null)),
        // `{ data: [...] }` without a success flag
        None if map.len() <= 2 && matches!(map.get("data"), Some(Value::Array(_))) => {
            Ok(map.remove("data").unwrap_or(Value::Null))
        }
        _ => Ok(Value::Object(map)),
    }
}

// == Lists ==
/// Normalizes a list response into records.
pub fn normalize_list(body: Value) -> ApiResult<Vec<Record>> {
    match unwrap_envelope(body)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(_) => Ok(Record::new(item)),
                other => Err(ApiError::MalformedResponse(format!(
                    "expected object in list, got {}",
                    kind(&other)
                ))),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(ApiError::MalformedResponse(format!(
            "expected array or success envelope, got {}",
            kind(&other)
        ))),
    }
}

// == Counts ==
/// Normalizes a count response: a number, a numeric string, or an object
/// carrying the number under one of the usual keys.
pub fn normalize_count(body: Value) -> ApiResult<u64> {
    let payload = unwrap_envelope(body)?;

    if let Some(count) = as_count(&payload) {
        return Ok(count);
    }

    if let Value::Object(map) = &payload {
        if let Some(count) = COUNT_KEYS.iter().find_map(|k| map.get(*k).and_then(as_count)) {
            return Ok(count);
        }
    }

    Err(ApiError::MalformedResponse(format!(
        "expected a count, got {}",
        kind(&payload)
    )))
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// == Single Items ==
/// Normalizes a create/update response. An empty or null payload is `None`.
pub fn normalize_item(body: Option<Value>) -> ApiResult<Option<Record>> {
    let Some(body) = body else {
        return Ok(None);
    };

    match unwrap_envelope(body)? {
        Value::Null => Ok(None),
        item @ Value::Object(_) => Ok(Some(Record::new(item))),
        other => Err(ApiError::MalformedResponse(format!(
            "expected object, got {}",
            kind(&other)
        ))),
    }
}

// == Error Bodies ==
/// Extracts a server-supplied `message` or `error` from an error body.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "erro"]
        .iter()
        .find_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array_and_envelope_agree() {
        let bare = normalize_list(json!([{ "id": 1, "nome": "Ana" }])).unwrap();
        let wrapped = normalize_list(json!({
            "success": true,
            "data": [{ "id": 1, "nome": "Ana" }]
        }))
        .unwrap();

        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].field("nome").as_deref(), Some("Ana"));
    }

    #[test]
    fn test_data_without_success_flag() {
        let records = normalize_list(json!({ "data": [{ "id": 2 }] })).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_success_false_is_rejected() {
        let err = normalize_list(json!({
            "success": false,
            "message": "Sessão expirada"
        }))
        .unwrap_err();

        assert_eq!(err, ApiError::Rejected("Sessão expirada".into()));
    }

    #[test]
    fn test_unexpected_shapes_are_malformed() {
        assert!(matches!(
            normalize_list(json!({ "pacientes": [] })),
            Err(ApiError::MalformedResponse(_))
        ));
        assert!(matches!(
            normalize_list(json!("ok")),
            Err(ApiError::MalformedResponse(_))
        ));
        assert!(matches!(
            normalize_list(json!([1, 2])),
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_success_without_data_is_empty() {
        assert!(normalize_list(json!({ "success": true })).unwrap().is_empty());
    }

    #[test]
    fn test_count_shapes() {
        assert_eq!(normalize_count(json!(12)).unwrap(), 12);
        assert_eq!(normalize_count(json!("15")).unwrap(), 15);
        assert_eq!(normalize_count(json!({ "count": 3 })).unwrap(), 3);
        assert_eq!(normalize_count(json!({ "total": 4 })).unwrap(), 4);
        assert_eq!(normalize_count(json!({ "success": true, "data": 9 })).unwrap(), 9);
        assert_eq!(
            normalize_count(json!({ "success": true, "data": { "quantidade": 5 } })).unwrap(),
            5
        );
        assert!(normalize_count(json!({ "foo": "bar" })).is_err());
        assert!(normalize_count(json!(-1)).is_err());
    }

    #[test]
    fn test_item_shapes() {
        assert_eq!(normalize_item(None).unwrap(), None);
        assert_eq!(normalize_item(Some(json!({ "success": true }))).unwrap(), None);

        let item = normalize_item(Some(json!({ "success": true, "data": { "id": 3 } })))
            .unwrap()
            .unwrap();
        assert_eq!(item.id().as_deref(), Some("3"));

        assert!(normalize_item(Some(json!([1]))).is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"CPF inválido"}"#).as_deref(),
            Some("CPF inválido")
        );
        assert_eq!(error_message(r#"{"error":"Não autorizado"}"#).as_deref(), Some("Não autorizado"));
        assert_eq!(error_message("<html>502</html>"), None);
    }
}
