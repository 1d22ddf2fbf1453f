use engine_parser::{
    types::{FragmentSpread, InlineFragment, TypeCondition},
    Positioned,
};

use crate::{Visitor, VisitorContext};

pub(crate) struct KnownFragmentNames;

impl<'a> Visitor<'a> for KnownFragmentNames {
    fn enter_fragment_spread(&mut self, ctx: &mut VisitorContext<'a>, fragment_spread: &'a Positioned<FragmentSpread>) {
        let name = &fragment_spread.node.fragment_name;
        if !ctx.document.fragments.contains_key(&name.node) {
            ctx.report_error(vec![name.pos], format!("Unknown fragment \"{}\"", name.node));
        }
    }
}

pub(crate) struct NoFragmentCycles;

impl<'a> Visitor<'a> for NoFragmentCycles {
    fn enter_fragment_spread(&mut self, ctx: &mut VisitorContext<'a>, fragment_spread: &'a Positioned<FragmentSpread>) {
        let name = fragment_spread.node.fragment_name.node.as_str();
        let Some(start) = ctx.fragment_stack().iter().position(|fragment| *fragment == name) else {
            return;
        };

        let via = ctx.fragment_stack()[start + 1..].join(", ");
        let message = if via.is_empty() {
            format!("Cannot spread fragment \"{name}\" within itself")
        } else {
            format!("Cannot spread fragment \"{name}\" within itself via {via}")
        };
        ctx.report_error(vec![fragment_spread.pos], message);
    }
}

/// Type conditions must name a composite type that can overlap with the enclosing type.
pub(crate) struct PossibleFragmentSpreads;

impl PossibleFragmentSpreads {
    fn check(ctx: &mut VisitorContext<'_>, fragment_name: Option<&str>, condition: &Positioned<TypeCondition>) {
        let registry = ctx.registry;
        let on = &condition.node.on;
        let Some(ty) = registry.lookup_type(&on.node) else {
            ctx.report_error(vec![on.pos], format!("Unknown type \"{}\"", on.node));
            return;
        };

        let fragment = match fragment_name {
            Some(name) => format!("Fragment \"{name}\""),
            None => "Fragment".to_string(),
        };

        if !ty.is_composite() {
            ctx.report_error(
                vec![condition.pos],
                format!("{fragment} cannot condition on non composite type \"{}\"", on.node),
            );
            return;
        }

        if let Some(parent) = ctx.current_type() {
            if !registry.types_overlap(parent, ty) {
                ctx.report_error(
                    vec![condition.pos],
                    format!(
                        "{fragment} cannot be spread here as objects of type \"{}\" can never be of type \"{}\"",
                        parent.name(),
                        ty.name()
                    ),
                );
            }
        }
    }
}

impl<'a> Visitor<'a> for PossibleFragmentSpreads {
    fn enter_fragment_spread(&mut self, ctx: &mut VisitorContext<'a>, fragment_spread: &'a Positioned<FragmentSpread>) {
        let name = fragment_spread.node.fragment_name.node.as_str();
        if let Some(fragment) = ctx.document.fragments.get(name) {
            Self::check(ctx, Some(name), &fragment.node.type_condition);
        }
    }

    fn enter_inline_fragment(&mut self, ctx: &mut VisitorContext<'a>, inline_fragment: &'a Positioned<InlineFragment>) {
        if let Some(condition) = &inline_fragment.node.type_condition {
            Self::check(ctx, None, condition);
        }
    }
}
