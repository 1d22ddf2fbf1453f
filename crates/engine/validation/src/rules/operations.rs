use engine_parser::{types::OperationDefinition, Positioned};
use engine_value::Name;

use crate::{Visitor, VisitorContext};

pub(crate) struct KnownOperationTypes;

impl<'a> Visitor<'a> for KnownOperationTypes {
    fn enter_operation_definition(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        _name: Option<&'a Name>,
        operation_definition: &'a Positioned<OperationDefinition>,
    ) {
        let ty = operation_definition.node.ty;
        if ctx.registry.root_type(ty).is_none() {
            ctx.report_error(
                vec![operation_definition.pos],
                format!("Schema is not configured for {ty}s."),
            );
        }
    }
}
