//! A GraphQL execution engine.
//!
//! A [`Schema`] is built from object types and fields carrying resolvers. Requests are parsed,
//! validated against the schema and executed, producing a [`Response`] that separates data from
//! errors. Introspection is provided through ordinary types registered with the schema.

mod config;
mod error;
mod execution;
mod introspection;
mod request;
mod response;
mod schema;

pub use config::{ConfigError, EngineConfig, OperationLimits};
pub use engine_parser::{parse_query, types as ast, Pos, Positioned};
pub use engine_registry::{
    resolvers, Data, Deprecation, DirectiveLocation, EnumType, Error, InputObjectType, InterfaceType, MetaDirective,
    MetaEnumValue, MetaField, MetaFieldType, MetaInputValue, MetaType, ObjectType, Registry, RegistryBuilder,
    ResolvedValue, Resolver, ResolverContext, ScalarParser, ScalarType, SchemaError, TypeKind, UnionType,
};
pub use engine_value::{ConstValue, Name, Variables};
pub use error::{ErrorCode, PathSegment, ServerError};
pub use request::Request;
pub use response::Response;
pub use schema::{Schema, SchemaBuilder};
