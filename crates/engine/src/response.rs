use crate::ServerError;

/// The result of a request.
///
/// `data` is absent when the request failed before execution started and `null` when a non-null
/// root field failed. `errors` is only serialized when non-empty.
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ServerError>,
}

impl Response {
    pub fn new(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// A response for a request which never reached execution.
    pub fn from_errors(errors: impl IntoIterator<Item = ServerError>) -> Self {
        Self {
            data: None,
            errors: errors.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn with_errors(mut self, errors: impl IntoIterator<Item = ServerError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_json(self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
