//! Validation of executable documents.
//!
//! Rules are visitors chained together and driven by a single walk over every operation of the
//! document. A fragment is expanded at its first spread in each operation, so it is validated
//! against its own type condition once per operation. Valid operations are then measured.

mod limits;
mod measure;
mod rules;
mod visitor;

use engine_parser::types::ExecutableDocument;
use engine_registry::Registry;
use engine_value::Variables;

pub use limits::OperationLimits;
pub use visitor::{RuleError, Visitor, VisitorContext};
use visitor::{visit, VisitorNil};

/// Validation results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Query complexity
    pub complexity: usize,

    /// Query depth
    pub depth: usize,

    /// Root fields in the query
    pub root_field_count: usize,

    /// Alias count.
    pub alias_count: usize,
}

pub fn check_rules(
    registry: &Registry,
    doc: &ExecutableDocument,
    variables: Option<&Variables>,
) -> Result<ValidationResult, Vec<RuleError>> {
    let mut ctx = VisitorContext::new(registry, doc, variables);
    let mut visitor = VisitorNil
        .with(rules::KnownOperationTypes)
        .with(rules::UniqueVariableNames::default())
        .with(rules::VariablesAreInputTypes)
        .with(rules::DefaultValuesOfCorrectType)
        .with(rules::NoUndefinedVariables)
        .with(rules::KnownDirectives)
        .with(rules::KnownFragmentNames)
        .with(rules::NoFragmentCycles)
        .with(rules::PossibleFragmentSpreads)
        .with(rules::OverlappingFieldsCanBeMerged);

    visit(&mut visitor, &mut ctx, doc);

    if !ctx.errors.is_empty() {
        return Err(ctx.errors);
    }

    Ok(measure::measure(doc))
}
