use std::fmt;

use engine_parser::Pos;
use engine_validation::RuleError;
use serde::ser::SerializeMap;

/// What went wrong, kept out of the serialized response.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    OperationParsingError,
    OperationValidationError,
    /// Variables or operation selection.
    BadRequest,
    ResolverError,
    /// A resolver returned a value that does not fit the field type.
    InvalidResponseValue,
    Timeout,
}

impl ErrorCode {
    /// Whether the error ends the request before any resolver runs.
    pub fn is_request_error(self) -> bool {
        matches!(
            self,
            ErrorCode::OperationParsingError | ErrorCode::OperationValidationError | ErrorCode::BadRequest
        )
    }
}

/// A segment of the path of a response value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// An error of the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    pub message: String,
    pub locations: Vec<Pos>,
    pub path: Vec<PathSegment>,
    pub code: ErrorCode,
}

impl ServerError {
    pub fn new(message: impl Into<String>, code: ErrorCode) -> Self {
        ServerError {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            code,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Pos) -> Self {
        self.locations.push(location);
        self
    }

    #[must_use]
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = Pos>) -> Self {
        self.locations.extend(locations);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<Vec<PathSegment>>) -> Self {
        self.path = path.into();
        self
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ServerError {}

impl serde::Serialize for ServerError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + usize::from(!self.locations.is_empty()) + usize::from(!self.path.is_empty());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("message", &self.message)?;
        if !self.locations.is_empty() {
            map.serialize_entry("locations", &self.locations)?;
        }
        if !self.path.is_empty() {
            map.serialize_entry("path", &self.path)?;
        }
        map.end()
    }
}

impl From<engine_parser::Error> for ServerError {
    fn from(err: engine_parser::Error) -> Self {
        ServerError::new(err.to_string(), ErrorCode::OperationParsingError).with_locations(err.positions())
    }
}

/// Validation errors are reported without locations.
impl From<RuleError> for ServerError {
    fn from(err: RuleError) -> Self {
        ServerError::new(err.message, ErrorCode::OperationValidationError)
    }
}
