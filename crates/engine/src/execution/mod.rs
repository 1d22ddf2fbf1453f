//! Execution of a validated operation.
//!
//! Sibling fields and list items are driven concurrently with `join_all` and assembled in
//! selection order. Root fields of a mutation run one after the other.

mod collect;
mod complete;
mod variables;

use engine_parser::{
    types::{DocumentOperations, ExecutableDocument, OperationDefinition, OperationType},
    Positioned,
};
use engine_registry::{Data, Registry, ResolvedValue};
use engine_value::{ConstValue, Variables};
use tokio::time::Instant;

pub(crate) use self::variables::coerce_variables;
use crate::{ErrorCode, Response, ServerError};

/// Per request state shared by every resolver call.
pub(crate) struct ExecutionContext<'a> {
    pub registry: &'a Registry,
    pub document: &'a ExecutableDocument,
    /// Coerced variables.
    pub variables: &'a Variables,
    pub data: &'a Data,
    pub deadline: Option<Instant>,
}

impl ExecutionContext<'_> {
    fn variable(&self, name: &str) -> Option<ConstValue> {
        self.variables.get(name).cloned()
    }
}

/// Picks the operation to run: the one named `operation_name`, or the only one of the document.
pub(crate) fn select_operation<'a>(
    document: &'a ExecutableDocument,
    operation_name: Option<&str>,
) -> Result<&'a Positioned<OperationDefinition>, ServerError> {
    let operation = match (&document.operations, operation_name) {
        (DocumentOperations::Single(operation), None) => Some(operation),
        (DocumentOperations::Single(_), Some(_)) => None,
        (DocumentOperations::Multiple(operations), Some(name)) => operations.get(name),
        (DocumentOperations::Multiple(operations), None) if operations.len() == 1 => operations.values().next(),
        (DocumentOperations::Multiple(_), None) => {
            return Err(ServerError::new("Missing operation name.", ErrorCode::BadRequest));
        }
    };

    operation.ok_or_else(|| {
        ServerError::new(
            format!("Unknown operation named '{}'.", operation_name.unwrap_or_default()),
            ErrorCode::BadRequest,
        )
    })
}

pub(crate) async fn execute(ctx: &ExecutionContext<'_>, operation: &OperationDefinition) -> Response {
    let Some(root_type) = ctx.registry.root_type(operation.ty) else {
        return Response::from_errors([ServerError::new(
            format!("Schema is not configured for {}s.", operation.ty),
            ErrorCode::BadRequest,
        )]);
    };

    let root_value = ResolvedValue::null();
    let completion = complete::execute_selection_set(
        ctx,
        root_type,
        &root_value,
        &[&operation.selection_set.node],
        &[],
        matches!(operation.ty, OperationType::Mutation),
    )
    .await;

    match completion {
        Ok(completed) => Response::new(completed.value).with_errors(completed.errors),
        Err(errors) => Response::new(serde_json::Value::Null).with_errors(errors),
    }
}
