//! Size of operations, fragments included.
//!
//! Every measure is taken per operation; the document keeps the largest one. A fragment is
//! measured once and its totals are reused at every spread.

use std::collections::HashMap;

use engine_parser::types::{ExecutableDocument, Selection, SelectionSet};

use crate::ValidationResult;

#[derive(Debug, Clone, Copy, Default)]
struct Size {
    /// Fields of the selection set itself, spreads and inline fragments flattened.
    fields: usize,
    /// Fields at every level.
    complexity: usize,
    aliases: usize,
    depth: usize,
}

impl Size {
    fn add(&mut self, other: Size) {
        self.fields = self.fields.saturating_add(other.fields);
        self.complexity = self.complexity.saturating_add(other.complexity);
        self.aliases = self.aliases.saturating_add(other.aliases);
        self.depth = self.depth.max(other.depth);
    }
}

struct Measure<'a> {
    document: &'a ExecutableDocument,
    fragments: HashMap<&'a str, Size>,
}

impl<'a> Measure<'a> {
    fn selection_set(&mut self, selection_set: &'a SelectionSet) -> Size {
        let mut size = Size::default();
        for selection in &selection_set.items {
            match &selection.node {
                Selection::Field(field) => {
                    let nested = self.selection_set(&field.node.selection_set.node);
                    size.add(Size {
                        fields: 1,
                        complexity: nested.complexity.saturating_add(1),
                        aliases: nested.aliases.saturating_add(usize::from(field.node.alias.is_some())),
                        depth: nested.depth.saturating_add(1),
                    });
                }
                Selection::FragmentSpread(fragment_spread) => {
                    let fragment = self.fragment(fragment_spread.node.fragment_name.node.as_str());
                    size.add(fragment);
                }
                Selection::InlineFragment(inline_fragment) => {
                    let nested = self.selection_set(&inline_fragment.node.selection_set.node);
                    size.add(nested);
                }
            }
        }
        size
    }

    fn fragment(&mut self, name: &'a str) -> Size {
        if let Some(size) = self.fragments.get(name) {
            return *size;
        }
        // A cycle ends on an empty fragment.
        self.fragments.insert(name, Size::default());
        let size = match self.document.fragments.get(name) {
            Some(fragment) => self.selection_set(&fragment.node.selection_set.node),
            None => Size::default(),
        };
        self.fragments.insert(name, size);
        size
    }
}

pub(crate) fn measure(document: &ExecutableDocument) -> ValidationResult {
    let mut measure = Measure {
        document,
        fragments: HashMap::new(),
    };

    let mut result = ValidationResult::default();
    for (_, operation) in document.operations.iter() {
        let size = measure.selection_set(&operation.node.selection_set.node);
        result.complexity = result.complexity.max(size.complexity);
        result.depth = result.depth.max(size.depth);
        result.root_field_count = result.root_field_count.max(size.fields);
        result.alias_count = result.alias_count.max(size.aliases);
    }
    result
}

#[cfg(test)]
mod tests {
    use engine_parser::parse_query;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn fragments_count_at_every_spread() {
        let document = parse_query(
            "query One { a: x ...F ...F } query Other { x { y { z } } } fragment F on Query { b: x { y } }",
        )
        .unwrap();
        assert_eq!(
            measure(&document),
            ValidationResult {
                complexity: 5,
                depth: 3,
                root_field_count: 3,
                alias_count: 3,
            }
        );
    }

    #[test]
    fn fan_out_saturates() {
        let mut query = String::from("{ ...F0 }");
        for i in 0..100 {
            query.push_str(&format!(" fragment F{i} on Query {{ ...F{next} ...F{next} }}", next = i + 1));
        }
        query.push_str(" fragment F100 on Query { a: x }");

        let result = measure(&parse_query(query).unwrap());
        assert_eq!(result.complexity, usize::MAX);
        assert_eq!(result.alias_count, usize::MAX);
        assert_eq!(result.depth, 1);
    }
}
