use engine_parser::{types::Directive, Positioned};
use engine_registry::DirectiveLocation;

use crate::{Visitor, VisitorContext};

/// Directives must be known, used where they are allowed and given valid arguments.
pub(crate) struct KnownDirectives;

impl<'a> Visitor<'a> for KnownDirectives {
    fn enter_directive(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        directive: &'a Positioned<Directive>,
        location: DirectiveLocation,
    ) {
        let registry = ctx.registry;
        let name = &directive.node.name;
        let Some(definition) = registry.lookup_directive(&name.node) else {
            ctx.report_error(vec![name.pos], format!("Unknown directive \"@{}\"", name.node));
            return;
        };

        if !definition.locations.contains(&location) {
            ctx.report_error(
                vec![directive.pos],
                format!("Directive \"@{}\" may not be used on {location}", name.node),
            );
            return;
        }

        for arg in definition.args.values() {
            if arg.is_required() && directive.node.get_argument(&arg.name).is_none() {
                ctx.report_error(
                    vec![directive.pos],
                    format!(
                        "Directive \"@{}\" argument \"{}\" of type \"{}\" is required but not provided",
                        name.node, arg.name, arg.ty
                    ),
                );
            }
        }

        for (arg_name, value) in &directive.node.arguments {
            let Some(arg) = definition.args.get(arg_name.node.as_str()) else {
                ctx.report_error(
                    vec![arg_name.pos],
                    format!("Unknown argument \"{}\" on directive \"@{}\"", arg_name.node, name.node),
                );
                continue;
            };
            if let Some(reason) = super::invalid_input_value(ctx, arg.ty.as_str(), &value.node) {
                ctx.report_error(
                    vec![value.pos],
                    format!("Invalid value for argument \"{}\": {reason}", arg_name.node),
                );
            }
        }
    }
}
