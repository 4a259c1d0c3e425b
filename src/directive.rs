use crate::args::ArgDef;
use crate::definition::{CommonDef, NodeDefinition};
use crate::error::{EvalError, Location, NodeKind, SchemaError};
use crate::node::Node;

/// A leaf configuration node: positional arguments, no children.
#[derive(Debug)]
pub struct DirectiveDef<'a> {
    common: CommonDef<'a>,
}

impl<'a> DirectiveDef<'a> {
    pub fn new(
        name: &str,
        args: impl IntoIterator<Item = ArgDef<'a>>,
    ) -> Result<Self, SchemaError> {
        let mut common = CommonDef::new(name);
        common.add_args(args)?;
        Ok(Self { common })
    }

    /// A directive whose arguments are all handled by `handler`. It accepts any
    /// number of arguments unless argument definitions are added later.
    pub fn with_callback(
        name: &str,
        handler: impl FnMut(&Node) -> Result<(), EvalError> + 'a,
    ) -> Self {
        let mut common = CommonDef::with_open_arity(name);
        common.set_handler(Box::new(handler));
        Self { common }
    }

    pub fn add_args(
        &mut self,
        args: impl IntoIterator<Item = ArgDef<'a>>,
    ) -> Result<&mut Self, SchemaError> {
        self.common.add_args(args)?;
        Ok(self)
    }

    /// Allow the directive to appear more than once among its siblings.
    pub fn repeatable(&mut self) -> &mut Self {
        self.common.set_repeatable(true);
        self
    }

    pub fn set_handler(
        &mut self,
        handler: impl FnMut(&Node) -> Result<(), EvalError> + 'a,
    ) -> &mut Self {
        self.common.set_handler(Box::new(handler));
        self
    }
}

impl<'a> NodeDefinition<'a> for DirectiveDef<'a> {
    fn common(&self) -> &CommonDef<'a> {
        &self.common
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Directive
    }

    fn evaluate(&mut self, node: &Node) -> Result<(), EvalError> {
        if node.is_block() {
            return Err(EvalError::NotABlock {
                at: Location::of(node),
                name: node.name.clone(),
            });
        }
        self.common.bind(node, NodeKind::Directive)
    }
}
