//! Block definitions: nodes that own a nested schema for their children.
//!
//! A [`BlockDef`] always validates its children against one
//! [`NodesContainer`]. A [`ModuleBlockDef`] reserves its first argument as a
//! module name and picks the children's schema from a registry keyed by it,
//! so `storage sql { ... }` and `storage s3 { ... }` can accept different
//! directives under the same block name.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::args::{ArgDef, ValueType};
use crate::container::NodesContainer;
use crate::definition::{CommonDef, NodeDefinition};
use crate::error::{EvalError, Location, NodeKind, SchemaError, ValueError};
use crate::node::Node;
use crate::values::Value;

/// A block with positional arguments and its own set of legal children.
///
/// Dereferences to its [`NodesContainer`], so children are registered with the
/// same `define_*` calls as at the root.
#[derive(Debug)]
pub struct BlockDef<'a> {
    common: CommonDef<'a>,
    children: NodesContainer<'a>,
}

impl<'a> BlockDef<'a> {
    pub fn new(
        name: &str,
        args: impl IntoIterator<Item = ArgDef<'a>>,
    ) -> Result<Self, SchemaError> {
        let mut common = CommonDef::new(name);
        common.add_args(args)?;
        Ok(Self {
            common,
            children: NodesContainer::default(),
        })
    }

    /// A block whose arguments are handled by `handler`. It accepts any number
    /// of arguments unless argument definitions are added later.
    pub fn with_callback(
        name: &str,
        handler: impl FnMut(&Node) -> Result<(), EvalError> + 'a,
    ) -> Self {
        let mut common = CommonDef::with_open_arity(name);
        common.set_handler(Box::new(handler));
        Self {
            common,
            children: NodesContainer::default(),
        }
    }

    pub fn add_args(
        &mut self,
        args: impl IntoIterator<Item = ArgDef<'a>>,
    ) -> Result<&mut Self, SchemaError> {
        self.common.add_args(args)?;
        Ok(self)
    }

    /// Allow the block to appear more than once among its siblings.
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

    pub fn children(&self) -> &NodesContainer<'a> {
        &self.children
    }
}

impl<'a> Deref for BlockDef<'a> {
    type Target = NodesContainer<'a>;

    fn deref(&self) -> &Self::Target {
        &self.children
    }
}

impl DerefMut for BlockDef<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.children
    }
}

impl<'a> NodeDefinition<'a> for BlockDef<'a> {
    fn common(&self) -> &CommonDef<'a> {
        &self.common
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Block
    }

    fn evaluate(&mut self, node: &Node) -> Result<(), EvalError> {
        self.common.bind(node, NodeKind::Block)?;
        self.children.evaluate_tree(&node.children)
    }
}

/// Holds the module name bound from a module block's first argument.
#[derive(Debug, Default)]
struct ModuleName(String);

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Value for ModuleName {
    fn set(&mut self, s: &str) -> Result<(), ValueError> {
        self.0 = s.to_owned();
        Ok(())
    }

    fn get(&self) -> &dyn std::any::Any {
        &self.0
    }
}

/// A block whose first argument selects which registered sub-schema governs
/// its children.
#[derive(Debug)]
pub struct ModuleBlockDef<'a> {
    common: CommonDef<'a>,
    modules: BTreeMap<String, NodesContainer<'a>>,
}

impl<'a> ModuleBlockDef<'a> {
    /// `args` are declared after the implicit, required module-name argument.
    pub fn new(
        name: &str,
        args: impl IntoIterator<Item = ArgDef<'a>>,
    ) -> Result<Self, SchemaError> {
        let selector = ArgDef::new(ModuleName::default(), ValueType::String).named("module");
        let mut common = CommonDef::new(name);
        common.add_args(std::iter::once(selector).chain(args))?;
        Ok(Self {
            common,
            modules: BTreeMap::new(),
        })
    }

    pub fn with_args(
        &mut self,
        args: impl IntoIterator<Item = ArgDef<'a>>,
    ) -> Result<&mut Self, SchemaError> {
        self.common.add_args(args)?;
        Ok(self)
    }

    /// The schema for module `name`, created empty on first use.
    pub fn module(&mut self, name: &str) -> &mut NodesContainer<'a> {
        self.modules.entry(name.to_string()).or_default()
    }

    /// Register (or replace) the schema for module `name`.
    pub fn add_module(&mut self, name: &str, container: NodesContainer<'a>) -> &mut Self {
        self.modules.insert(name.to_string(), container);
        self
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Allow the block to appear more than once among its siblings.
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

    fn selected(&self) -> String {
        self.common
            .args()
            .first()
            .map(|arg| arg.target().to_string())
            .unwrap_or_default()
    }
}

impl<'a> NodeDefinition<'a> for ModuleBlockDef<'a> {
    fn common(&self) -> &CommonDef<'a> {
        &self.common
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Block
    }

    fn evaluate(&mut self, node: &Node) -> Result<(), EvalError> {
        self.common.bind(node, NodeKind::Block)?;

        let module = self.selected();
        let Some(schema) = self.modules.get_mut(&module) else {
            return Err(EvalError::UnknownModule {
                at: Location::of(node),
                module,
            });
        };
        tracing::trace!(block = %node.name, %module, "selected module");
        schema.evaluate_tree(&node.children)
    }
}

/// The two block kinds a container can hold, kept in one ordered sequence.
#[derive(Debug)]
pub enum BlockEntry<'a> {
    Block(BlockDef<'a>),
    Module(ModuleBlockDef<'a>),
}

impl<'a> NodeDefinition<'a> for BlockEntry<'a> {
    fn common(&self) -> &CommonDef<'a> {
        match self {
            BlockEntry::Block(def) => def.common(),
            BlockEntry::Module(def) => def.common(),
        }
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Block
    }

    fn evaluate(&mut self, node: &Node) -> Result<(), EvalError> {
        match self {
            BlockEntry::Block(def) => def.evaluate(node),
            BlockEntry::Module(def) => def.evaluate(node),
        }
    }
}
