use actix_web::HttpResponse;
use serde::Serialize;
use tracing::warn;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

/// Form extractor config shared by every validated form route, accepting
/// bodies up to `limit` bytes.
///
/// Validation failures report each offending field with its messages;
/// undecodable bodies (missing fields, non-numeric salary) get a single
/// generic message.
pub fn form_config(limit: usize) -> actix_web_validator::FormConfig {
    actix_web_validator::FormConfig::default()
        .limit(limit)
        .error_handler(|err, req| {
            let mut fields = serde_json::Map::new();

            let error = match err {
                actix_web_validator::Error::Validate(validation_errors) => {
                    for (field, errors) in validation_errors.field_errors() {
                        let messages: Vec<String> = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| format!("Validation error in field: {}", field))
                            })
                            .collect();
                        fields.insert(
                            field.to_string(),
                            serde_json::json!({"errors": messages}),
                        );
                    }
                    "Validation failed"
                }
                other => {
                    fields.insert(
                        "message".to_string(),
                        serde_json::json!(format!("Invalid form submission: {}", other)),
                    );
                    "Request validation failed"
                }
            };

            warn!("Rejected form submission to {}: {}", req.path(), error);

            let error_response = ErrorResponse {
                error: error.to_string(),
                fields: serde_json::Value::Object(fields),
            };
            actix_web::error::InternalError::from_response(
                "",
                HttpResponse::BadRequest().json(error_response),
            )
            .into()
        })
}
