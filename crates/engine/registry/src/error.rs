use std::fmt::Display;

/// An error raised by a resolver.
///
/// Anything that implements `Display` converts into it, so resolvers can use `?` freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub message: String,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<T: Display + Send + Sync + 'static> From<T> for Error {
    fn from(e: T) -> Self {
        Self { message: e.to_string() }
    }
}

/// Errors detected while building a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Type \"{0}\" is defined more than once with different definitions")]
    DuplicateType(String),
    #[error("Field \"{field}\" is defined more than once on type \"{ty}\"")]
    DuplicateField { ty: String, field: String },
    #[error("Type \"{name}\" used by \"{referenced_by}\" is not defined")]
    UndefinedType { name: String, referenced_by: String },
    #[error("Type reference \"{ty}\" used by \"{referenced_by}\" is not valid")]
    InvalidTypeReference { ty: String, referenced_by: String },
    #[error("\"{referenced_by}\" expects an input type but \"{name}\" is an output type")]
    NotAnInputType { name: String, referenced_by: String },
    #[error("\"{referenced_by}\" expects an output type but \"{name}\" is an input object")]
    NotAnOutputType { name: String, referenced_by: String },
    #[error("Union \"{union}\" can only contain object types but \"{member}\" is not one")]
    InvalidUnionMember { union: String, member: String },
    #[error("Type \"{object}\" implements \"{interface}\" which is not an interface")]
    UnknownInterface { object: String, interface: String },
    #[error("Field \"{0}\" uses a name reserved for introspection")]
    ReservedFieldName(String),
}
