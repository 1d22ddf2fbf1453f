use std::collections::HashSet;

use engine_parser::{
    types::{Field, OperationDefinition, Selection, SelectionSet},
    Pos, Positioned,
};
use engine_registry::{MetaFieldType, MetaType, Registry, TypeKind};
use engine_value::Name;

use crate::{Visitor, VisitorContext};

/// Fields sharing a response key must be merged into a single value.
///
/// They must select the same field with the same arguments and return types of the same shape.
/// Fields selected on two different object types never apply to the same object, so only their
/// types are compared. Sub-selections of fields sharing a key are checked together.
pub(crate) struct OverlappingFieldsCanBeMerged;

impl<'a> Visitor<'a> for OverlappingFieldsCanBeMerged {
    fn exit_operation_definition(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        _name: Option<&'a Name>,
        operation_definition: &'a Positioned<OperationDefinition>,
    ) {
        // Merging sub-selections of cyclic fragments never ends.
        if !ctx.errors.is_empty() {
            return;
        }
        let Some(root) = ctx.registry.root_type(operation_definition.node.ty) else {
            return;
        };
        let mut fields = ResponseKeys::new();
        collect_fields(
            ctx,
            Some(root),
            &operation_definition.node.selection_set.node,
            &mut HashSet::new(),
            &mut fields,
        );
        check_fields(ctx, fields);
    }
}

struct SelectedField<'a> {
    parent: Option<&'a MetaType>,
    field: &'a Positioned<Field>,
}

impl<'a> SelectedField<'a> {
    fn name(&self) -> &'a str {
        self.field.node.name.node.as_str()
    }

    fn ty(&self, registry: &'a Registry) -> Option<&'a MetaFieldType> {
        registry.lookup_field(self.parent?, self.name()).map(|field| &field.ty)
    }
}

/// Fields grouped by response key, in selection order.
type ResponseKeys<'a> = Vec<(&'a str, Vec<SelectedField<'a>>)>;

/// Flattens fragments into `fields`. A fragment spread several times is collected once.
fn collect_fields<'a>(
    ctx: &VisitorContext<'a>,
    parent: Option<&'a MetaType>,
    selection_set: &'a SelectionSet,
    spread_fragments: &mut HashSet<&'a str>,
    fields: &mut ResponseKeys<'a>,
) {
    let registry = ctx.registry;
    let document = ctx.document;
    for selection in &selection_set.items {
        match &selection.node {
            Selection::Field(field) => {
                let key = field.node.response_key().node.as_str();
                let selected = SelectedField { parent, field };
                match fields.iter_mut().find(|(existing, _)| *existing == key) {
                    Some((_, group)) => group.push(selected),
                    None => fields.push((key, vec![selected])),
                }
            }
            Selection::FragmentSpread(fragment_spread) => {
                let name = fragment_spread.node.fragment_name.node.as_str();
                if !spread_fragments.insert(name) {
                    continue;
                }
                if let Some(fragment) = document.fragments.get(name) {
                    let ty = registry.lookup_type(&fragment.node.type_condition.node.on.node);
                    collect_fields(ctx, ty, &fragment.node.selection_set.node, spread_fragments, fields);
                }
            }
            Selection::InlineFragment(inline_fragment) => {
                let ty = match &inline_fragment.node.type_condition {
                    Some(condition) => registry.lookup_type(&condition.node.on.node),
                    None => parent,
                };
                collect_fields(ctx, ty, &inline_fragment.node.selection_set.node, spread_fragments, fields);
            }
        }
    }
}

/// Reports the first conflict of every response key, then checks the merged sub-selections of
/// keys without conflicts.
fn check_fields<'a>(ctx: &mut VisitorContext<'a>, fields: ResponseKeys<'a>) {
    let registry = ctx.registry;
    for (key, group) in fields {
        if let Some((reason, locations)) = find_conflict(registry, &group) {
            ctx.report_error(
                locations,
                format!(
                    "Fields \"{key}\" conflict because {reason}. Use different aliases on the fields to fetch both if this was intentional."
                ),
            );
            continue;
        }

        let mut subfields = ResponseKeys::new();
        let mut spread_fragments = HashSet::new();
        for selected in &group {
            let ty = selected
                .ty(registry)
                .and_then(|ty| registry.lookup_type(ty.base_type_name()));
            collect_fields(
                ctx,
                ty,
                &selected.field.node.selection_set.node,
                &mut spread_fragments,
                &mut subfields,
            );
        }
        check_fields(ctx, subfields);
    }
}

fn find_conflict<'a>(registry: &'a Registry, group: &[SelectedField<'a>]) -> Option<(String, Vec<Pos>)> {
    group.iter().enumerate().find_map(|(i, a)| {
        group[i + 1..].iter().find_map(|b| {
            conflict(registry, a, b).map(|reason| (reason, vec![a.field.pos, b.field.pos]))
        })
    })
}

fn conflict<'a>(registry: &'a Registry, a: &SelectedField<'a>, b: &SelectedField<'a>) -> Option<String> {
    let exclusive_parents = match (a.parent, b.parent) {
        (Some(x), Some(y)) => {
            x.name() != y.name() && matches!(x.kind(), TypeKind::Object) && matches!(y.kind(), TypeKind::Object)
        }
        _ => false,
    };

    if !exclusive_parents {
        if a.name() != b.name() {
            return Some(format!("\"{}\" and \"{}\" are different fields", a.name(), b.name()));
        }
        if !same_arguments(&a.field.node, &b.field.node) {
            return Some("they have differing arguments".to_string());
        }
    }

    let (a_ty, b_ty) = (a.ty(registry)?, b.ty(registry)?);
    types_conflict(registry, a_ty, b_ty).then(|| format!("they return conflicting types \"{a_ty}\" and \"{b_ty}\""))
}

fn same_arguments(a: &Field, b: &Field) -> bool {
    a.arguments.len() == b.arguments.len()
        && a.arguments.iter().all(|(name, value)| {
            b.get_argument(&name.node)
                .is_some_and(|other| other.node == value.node)
        })
}

/// Wrappers must match exactly. Composite types may differ as their sub-selections are compared
/// field by field.
fn types_conflict(registry: &Registry, a: &MetaFieldType, b: &MetaFieldType) -> bool {
    if !a.wrapping_types().eq(b.wrapping_types()) {
        return true;
    }
    let (a, b) = (a.base_type_name(), b.base_type_name());
    let is_leaf = |name: &str| registry.lookup_type(name).is_some_and(MetaType::is_leaf);
    a != b && (is_leaf(a) || is_leaf(b))
}
