use crate::{RuleError, ValidationResult};

/// Upper bounds on the size of an operation, fragments included. Unset limits are not enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationLimits {
    /// Limits the deepest nesting of selection sets.
    pub depth: Option<u16>,
    /// Limits the number of aliased fields.
    pub aliases: Option<u16>,
    /// Limits the number of root fields. A root field selected several times under different
    /// aliases counts for each of them.
    pub root_fields: Option<u16>,
    /// Every selected field adds one point.
    pub complexity: Option<u16>,
}

impl OperationLimits {
    /// The first exceeded limit, if any.
    pub fn check(&self, result: &ValidationResult) -> Result<(), RuleError> {
        let exceeds = |limit: Option<u16>, value: usize| limit.is_some_and(|limit| value > usize::from(limit));

        let message = if exceeds(self.depth, result.depth) {
            "Query is nested too deep."
        } else if exceeds(self.aliases, result.alias_count) {
            "Query contains too many aliases."
        } else if exceeds(self.root_fields, result.root_field_count) {
            "Query contains too many root fields."
        } else if exceeds(self.complexity, result.complexity) {
            "Query is too complex."
        } else {
            return Ok(());
        };

        Err(RuleError::new(Vec::new(), message))
    }
}
