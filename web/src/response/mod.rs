//! JSON response bodies returned by the web layer.
//!
//! These mirror the fixed literals the service answers with and double as
//! OpenAPI schemas.

use serde::Serialize;
use utoipa::ToSchema;

/// Homepage body
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub ok: bool,
    /// Configured service name
    #[schema(example = "mce-api")]
    pub service: String,
}

impl ServiceInfo {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            ok: true,
            service: service.into(),
        }
    }
}

/// Liveness probe body
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "healthy")]
    pub status: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Serializes as `{}`
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct EmptyObject {}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_info_serializes_ok_and_name() {
        let value = serde_json::to_value(ServiceInfo::new("mce-api")).unwrap();
        assert_eq!(value, json!({"ok": true, "service": "mce-api"}));
    }

    #[test]
    fn health_status_serializes_healthy() {
        let value = serde_json::to_value(HealthStatus::healthy()).unwrap();
        assert_eq!(value, json!({"status": "healthy"}));
    }

    #[test]
    fn empty_object_serializes_as_empty_map() {
        assert_eq!(serde_json::to_string(&EmptyObject::default()).unwrap(), "{}");
    }
}
