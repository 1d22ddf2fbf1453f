use std::sync::Arc;

use engine_parser::types::ExecutableDocument;
use engine_registry::{MetaField, MetaType, ObjectType, Registry, RegistryBuilder, SchemaError};
use tokio::time::Instant;
use tracing::Instrument;

use crate::{
    execution::{self, ExecutionContext},
    introspection, EngineConfig, Request, Response, ServerError,
};

/// An executable schema.
///
/// Immutable once built and cheap to clone, so it can be shared between concurrent requests.
#[derive(Clone)]
pub struct Schema(Arc<SchemaInner>);

struct SchemaInner {
    registry: Registry,
    config: EngineConfig,
}

impl Schema {
    pub fn build(query_root: ObjectType) -> SchemaBuilder {
        SchemaBuilder {
            registry: RegistryBuilder::new(query_root),
            config: EngineConfig::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.0.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.0.config
    }

    /// Every type of the schema, root types first.
    pub fn types(&self) -> impl ExactSizeIterator<Item = &MetaType> {
        self.0.registry.types()
    }

    pub fn get_type(&self, name: &str) -> Option<&MetaType> {
        self.0.registry.lookup_type(name)
    }

    /// Parses, validates and executes a request.
    pub async fn execute(&self, request: impl Into<Request>) -> Response {
        let request = request.into();
        let document = match engine_parser::parse_query(&request.query) {
            Ok(document) => document,
            Err(err) => {
                tracing::debug!("Failed to parse operation: {err}");
                return Response::from_errors([ServerError::from(err)]);
            }
        };
        self.execute_operation(&document, request).await
    }

    /// Validates and executes an already parsed document, `request.query` is ignored.
    pub async fn execute_operation(&self, document: &ExecutableDocument, request: Request) -> Response {
        let span = tracing::debug_span!(
            "execute",
            operation_name = request.operation_name.as_deref(),
            operation_type = tracing::field::Empty,
        );
        self.execute_operation_inner(document, request).instrument(span).await
    }

    async fn execute_operation_inner(&self, document: &ExecutableDocument, request: Request) -> Response {
        let SchemaInner { registry, config } = self.0.as_ref();

        let validation = match engine_validation::check_rules(registry, document, Some(&request.variables)) {
            Ok(validation) => validation,
            Err(errors) => {
                tracing::debug!(errors = errors.len(), "Operation failed validation");
                return Response::from_errors(errors.into_iter().map(ServerError::from));
            }
        };
        if let Err(err) = config.limits.check(&validation) {
            tracing::debug!("Operation exceeds limits: {err}");
            return Response::from_errors([ServerError::from(err)]);
        }

        let operation = match execution::select_operation(document, request.operation_name.as_deref()) {
            Ok(operation) => operation,
            Err(err) => return Response::from_errors([err]),
        };
        tracing::Span::current().record("operation_type", tracing::field::display(operation.node.ty));

        let Request {
            variables,
            data,
            timeout,
            ..
        } = request;
        let variables = match execution::coerce_variables(registry, &operation.node, variables) {
            Ok(variables) => variables,
            Err(errors) => return Response::from_errors(errors),
        };

        let ctx = ExecutionContext {
            registry,
            document,
            variables: &variables,
            data: &data,
            deadline: timeout.or(config.timeout).map(|timeout| Instant::now() + timeout),
        };
        execution::execute(&ctx, &operation.node).await
    }
}

/// Builds a [`Schema`], see [`RegistryBuilder`] for the type registration rules.
pub struct SchemaBuilder {
    registry: RegistryBuilder,
    config: EngineConfig,
}

impl SchemaBuilder {
    pub fn add_query(&mut self, field: MetaField) -> &mut Self {
        self.registry.add_query(field);
        self
    }

    pub fn add_mutation(&mut self, field: MetaField) -> &mut Self {
        self.registry.add_mutation(field);
        self
    }

    pub fn add_subscription(&mut self, field: MetaField) -> &mut Self {
        self.registry.add_subscription(field);
        self
    }

    pub fn register_type(&mut self, ty: impl Into<MetaType>) -> &mut Self {
        self.registry.register_type(ty);
        self
    }

    pub fn get_type(&self, name: &str) -> Option<MetaType> {
        self.registry.get_type(name)
    }

    #[must_use]
    pub fn with_mutation_root(self, root: ObjectType) -> Self {
        Self {
            registry: self.registry.with_mutation_root(root),
            ..self
        }
    }

    #[must_use]
    pub fn with_subscription_root(self, root: ObjectType) -> Self {
        Self {
            registry: self.registry.with_subscription_root(root),
            ..self
        }
    }

    #[must_use]
    pub fn config(self, config: EngineConfig) -> Self {
        Self { config, ..self }
    }

    pub fn finish(self) -> Result<Schema, SchemaError> {
        let SchemaBuilder { mut registry, config } = self;
        if config.introspection {
            introspection::register(&mut registry);
        }
        let registry = registry.finish()?;
        tracing::debug!(types = registry.types().len(), "Schema built");
        Ok(Schema(Arc::new(SchemaInner { registry, config })))
    }
}
