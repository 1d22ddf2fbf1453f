use engine_parser::types::OperationDefinition;
use engine_registry::{coerce_input_value, Registry};
use engine_value::Variables;

use crate::{ErrorCode, ServerError};

/// Coerces the provided variables against the variable definitions of `operation`.
///
/// Variables that are neither provided nor defaulted stay absent, so arguments bound to them fall
/// back to their own defaults. Values the operation does not declare are dropped.
pub(crate) fn coerce_variables(
    registry: &Registry,
    operation: &OperationDefinition,
    mut provided: Variables,
) -> Result<Variables, Vec<ServerError>> {
    let mut variables = Variables::default();
    let mut errors = Vec::new();

    for definition in &operation.variable_definitions {
        let name = &definition.node.name.node;
        let ty = definition.node.var_type.node.to_string();

        let value = match (provided.remove(name), &definition.node.default_value) {
            (Some(value), _) => value,
            (None, Some(default_value)) => default_value.node.clone(),
            (None, None) if definition.node.var_type.node.nullable => continue,
            (None, None) => {
                errors.push(
                    ServerError::new(
                        format!("Variable \"${name}\" of required type \"{ty}\" was not provided."),
                        ErrorCode::BadRequest,
                    )
                    .with_location(definition.pos),
                );
                continue;
            }
        };

        match coerce_input_value(registry, &ty, value) {
            Ok(value) => {
                variables.insert(name.clone(), value);
            }
            Err(err) => errors.push(
                ServerError::new(
                    format!("Invalid value for variable \"${name}\": {err}"),
                    ErrorCode::BadRequest,
                )
                .with_location(definition.pos),
            ),
        }
    }

    if errors.is_empty() {
        Ok(variables)
    } else {
        Err(errors)
    }
}
