use engine_parser::{types::Field, Positioned};
use engine_registry::MetaType;

use crate::VisitorContext;

/// Checks a field against its parent type and returns the type it selects from.
///
/// Checks run in a fixed order and stop at the first violation: the field must exist, required
/// arguments must be provided, provided arguments must be known and valid and finally the
/// selection set must match the kind of the type. Nothing below a failing field is checked.
pub(crate) fn check_field<'a>(
    ctx: &mut VisitorContext<'a>,
    parent: &'a MetaType,
    field: &'a Positioned<Field>,
) -> Option<&'a MetaType> {
    let registry = ctx.registry;
    let name = field.node.name.node.as_str();
    let Some(definition) = registry.lookup_field(parent, name) else {
        ctx.report_error(
            vec![field.pos],
            format!("Field \"{name}\" not found in type \"{}\"", parent.name()),
        );
        return None;
    };

    if let Some(missing) = definition
        .args
        .values()
        .find(|arg| arg.is_required() && field.node.get_argument(&arg.name).is_none())
    {
        ctx.report_error(
            vec![field.pos],
            format!("Require \"{}\" arguments to query \"{name}\"", missing.name),
        );
        return None;
    }

    for (arg_name, value) in &field.node.arguments {
        let Some(arg) = definition.args.get(arg_name.node.as_str()) else {
            ctx.report_error(
                vec![arg_name.pos],
                format!(
                    "Unknown argument \"{}\" on field \"{}.{name}\"",
                    arg_name.node,
                    parent.name()
                ),
            );
            return None;
        };
        if let Some(reason) = super::invalid_input_value(ctx, arg.ty.as_str(), &value.node) {
            ctx.report_error(
                vec![value.pos],
                format!("Invalid value for argument \"{}\": {reason}", arg_name.node),
            );
            return None;
        }
    }

    let ty = registry.lookup_type(definition.ty.base_type_name())?;
    let has_selection = !field.node.selection_set.node.items.is_empty();
    if ty.is_leaf() && has_selection {
        ctx.report_error(
            vec![field.pos],
            format!(
                "Field \"{name}\" must not have a selection since type \"{}\" has no subfields",
                definition.ty
            ),
        );
        return None;
    }
    if !ty.is_leaf() && !has_selection {
        ctx.report_error(
            vec![field.pos],
            format!(
                "Field \"{name}\" of type \"{}\" must have a selection of subfields",
                definition.ty
            ),
        );
        return None;
    }

    Some(ty)
}
