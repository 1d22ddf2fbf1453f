use std::collections::HashSet;

use engine_parser::{
    types::{Directive, Field, Selection, SelectionSet, TypeCondition},
    Positioned,
};
use engine_registry::MetaType;
use engine_value::ConstValue;
use indexmap::IndexMap;

use super::ExecutionContext;

/// Fields grouped by response key, in order of first occurrence.
pub(super) type CollectedFields<'a> = IndexMap<&'a str, Vec<&'a Positioned<Field>>>;

pub(super) fn collect_fields<'a>(
    ctx: &ExecutionContext<'a>,
    object_type: &MetaType,
    selection_sets: &[&'a SelectionSet],
) -> CollectedFields<'a> {
    let mut fields = CollectedFields::new();
    let mut visited_fragments = HashSet::new();
    for selection_set in selection_sets {
        collect(ctx, object_type, selection_set, &mut visited_fragments, &mut fields);
    }
    fields
}

fn collect<'a>(
    ctx: &ExecutionContext<'a>,
    object_type: &MetaType,
    selection_set: &'a SelectionSet,
    visited_fragments: &mut HashSet<&'a str>,
    fields: &mut CollectedFields<'a>,
) {
    for selection in &selection_set.items {
        if !is_included(ctx, selection.node.directives()) {
            continue;
        }

        match &selection.node {
            Selection::Field(field) => {
                fields
                    .entry(field.node.response_key().node.as_str())
                    .or_default()
                    .push(field);
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.node.fragment_name.node.as_str();
                if !visited_fragments.insert(name) {
                    continue;
                }
                let Some(fragment) = ctx.document.fragments.get(name) else {
                    continue;
                };
                if applies_to(ctx, object_type, Some(&fragment.node.type_condition)) {
                    collect(
                        ctx,
                        object_type,
                        &fragment.node.selection_set.node,
                        visited_fragments,
                        fields,
                    );
                }
            }
            Selection::InlineFragment(fragment) => {
                if applies_to(ctx, object_type, fragment.node.type_condition.as_ref()) {
                    collect(
                        ctx,
                        object_type,
                        &fragment.node.selection_set.node,
                        visited_fragments,
                        fields,
                    );
                }
            }
        }
    }
}

/// Evaluates `@skip` and `@include`.
fn is_included(ctx: &ExecutionContext<'_>, directives: &[Positioned<Directive>]) -> bool {
    for directive in directives {
        let include = match directive.node.name.node.as_str() {
            "skip" => false,
            "include" => true,
            _ => continue,
        };
        let condition = directive
            .node
            .get_argument("if")
            .and_then(|value| value.node.clone().into_const_with(|name| ctx.variable(&name).ok_or(())).ok())
            .and_then(|value| match value {
                ConstValue::Boolean(condition) => Some(condition),
                _ => None,
            });
        if condition.unwrap_or(include) != include {
            return false;
        }
    }
    true
}

fn applies_to(ctx: &ExecutionContext<'_>, object_type: &MetaType, condition: Option<&Positioned<TypeCondition>>) -> bool {
    let Some(condition) = condition else {
        return true;
    };
    let name = condition.node.on.node.as_str();
    name == object_type.name()
        || ctx
            .registry
            .lookup_type(name)
            .is_some_and(|ty| ty.is_possible_type(object_type.name()))
}
