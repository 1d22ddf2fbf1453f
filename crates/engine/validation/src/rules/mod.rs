mod directives;
mod fields;
mod fragments;
mod operations;
mod overlapping_fields;
mod variables;

use engine_registry::coerce_input_value;
use engine_value::Value;

pub(crate) use self::{
    directives::KnownDirectives,
    fields::check_field,
    fragments::{KnownFragmentNames, NoFragmentCycles, PossibleFragmentSpreads},
    operations::KnownOperationTypes,
    overlapping_fields::OverlappingFieldsCanBeMerged,
    variables::{DefaultValuesOfCorrectType, NoUndefinedVariables, UniqueVariableNames, VariablesAreInputTypes},
};
use crate::VisitorContext;

/// Why `value` does not fit the input type `ty`.
///
/// Values depending on a variable that has neither been provided nor defaulted are left to the
/// variable coercion.
fn invalid_input_value(ctx: &VisitorContext<'_>, ty: &str, value: &Value) -> Option<String> {
    let value = ctx.resolve_value(value)?;
    coerce_input_value(ctx.registry, ty, value)
        .err()
        .map(|err| err.to_string())
}
