use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::report::{ErrorReport, ReportStatus};

/// Every way a check can fail, each tied to the HTTP status it answers with.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Missing or empty request fields.
    #[error("{0}")]
    Validation(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// Shopify answered with a non-2xx status. The status is mirrored back.
    #[error("upstream returned {status}: {}", .report.message)]
    Upstream {
        status: u16,
        report: Box<ErrorReport>,
    },
    /// Malformed input, unreadable upstream payloads, transport failures.
    #[error("{0}")]
    Unexpected(String),
}

/// Body for failures that never reached Shopify.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: ReportStatus,
    pub message: String,
}

impl CheckError {
    pub fn missing_parameters() -> Self {
        Self::Validation("Missing required parameters".to_string())
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::MethodNotAllowed => 405,
            Self::Upstream { status, .. } => *status,
            Self::Unexpected(_) => 500,
        }
    }

    /// JSON body to send back for this error.
    pub fn body(&self) -> Value {
        let encoded = match self {
            Self::Upstream { report, .. } => serde_json::to_value(report.as_ref()),
            other => serde_json::to_value(ErrorBody {
                status: ReportStatus::Error,
                message: other.to_string(),
            }),
        };
        encoded.unwrap_or_else(|e| {
            serde_json::json!({ "status": "error", "message": e.to_string() })
        })
    }
}
