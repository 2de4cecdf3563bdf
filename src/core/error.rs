use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationInvalidArgument,

    DefinitionNotFound,
    DefinitionConstructionFailed,
    DefinitionInvalidManifest,

    DispatchNoDispatcher,
    DispatchAmbiguous,

    ObserverFailed,

    InternalIoError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::DefinitionNotFound => "definition.not_found",
            ErrorCode::DefinitionConstructionFailed => "definition.construction_failed",
            ErrorCode::DefinitionInvalidManifest => "definition.invalid_manifest",

            ErrorCode::DispatchNoDispatcher => "dispatch.no_dispatcher",
            ErrorCode::DispatchAmbiguous => "dispatch.ambiguous",

            ErrorCode::ObserverFailed => "observer.failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundDetails {
    pub identifier: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructionFailedDetails {
    pub identifier: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidManifestDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoDispatcherDetails {
    pub task_kind: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbiguousDispatchDetails {
    pub task_kind: String,
    pub candidates: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserverFailedDetails {
    pub event: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = serde_json::to_value(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn definition_not_found(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let details = serde_json::to_value(NotFoundDetails {
            identifier: identifier.clone(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::DefinitionNotFound,
            format!("Deployment definition '{}' not found", identifier),
            details,
        )
        .with_hint("Run 'runway list' to see available definitions")
    }

    pub fn construction_failed(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let reason = reason.into();
        let details = serde_json::to_value(ConstructionFailedDetails {
            identifier: identifier.clone(),
            reason: reason.clone(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::DefinitionConstructionFailed,
            format!("Failed to construct definition '{}': {}", identifier, reason),
            details,
        )
    }

    pub fn invalid_manifest(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        let details = serde_json::to_value(InvalidManifestDetails {
            path: path.clone(),
            error: error.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::DefinitionInvalidManifest,
            format!("Invalid deployment manifest: {}", path),
            details,
        )
    }

    pub fn no_dispatcher(task_kind: impl Into<String>) -> Self {
        let task_kind = task_kind.into();
        let details = serde_json::to_value(NoDispatcherDetails {
            task_kind: task_kind.clone(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::DispatchNoDispatcher,
            format!("No dispatcher found for task definition '{}'", task_kind),
            details,
        )
    }

    pub fn ambiguous_dispatch(task_kind: impl Into<String>, candidates: usize) -> Self {
        let task_kind = task_kind.into();
        let details = serde_json::to_value(AmbiguousDispatchDetails {
            task_kind: task_kind.clone(),
            candidates,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::DispatchAmbiguous,
            format!(
                "{} dispatchers can handle task definition '{}'",
                candidates, task_kind
            ),
            details,
        )
    }

    pub fn observer_failed(event: impl Into<String>, error: impl Into<String>) -> Self {
        let event = event.into();
        let error = error.into();
        let details = serde_json::to_value(ObserverFailedDetails {
            event: event.clone(),
            error: error.clone(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ObserverFailed,
            format!("Observer of '{}' failed: {}", event, error),
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalIoErrorDetails {
            error: error.into(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
