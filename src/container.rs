//! The set of directives and blocks legal at one nesting level, and the tree
//! walk that matches input nodes against them.
//!
//! Matching is by name, in input order. For each sibling node every directive
//! and every block registered under that name is evaluated. Repetition is
//! tracked per walk: a non-repeatable name seen twice among the same siblings
//! fails, but evaluating the same schema again starts fresh.
//!
//! Nodes that match nothing at a level are skipped, so a container can
//! validate only the names it cares about. Call [`NodesContainer::strict`] to
//! reject them instead.

use std::collections::HashSet;

use crate::args::ArgDef;
use crate::block::{BlockDef, BlockEntry, ModuleBlockDef};
use crate::definition::NodeDefinition;
use crate::directive::DirectiveDef;
use crate::error::{EvalError, Location, NodeKind, SchemaError};
use crate::node::Node;

#[derive(Debug, Default)]
pub struct NodesContainer<'a> {
    directives: Vec<DirectiveDef<'a>>,
    blocks: Vec<BlockEntry<'a>>,
    strict: bool,
}

impl<'a> NodesContainer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directives(&self) -> &[DirectiveDef<'a>] {
        &self.directives
    }

    pub fn blocks(&self) -> &[BlockEntry<'a>] {
        &self.blocks
    }

    /// Reject nodes with no definition at this level (default: `false`).
    pub fn strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn add_directive(&mut self, directive: DirectiveDef<'a>) -> &mut Self {
        self.directives.push(directive);
        self
    }

    pub fn define_directive(
        &mut self,
        name: &str,
        args: impl IntoIterator<Item = ArgDef<'a>>,
    ) -> Result<&mut DirectiveDef<'a>, SchemaError> {
        let directive = DirectiveDef::new(name, args)?;
        Ok(self.push_directive(directive))
    }

    /// Register a directive handled entirely by `handler`.
    pub fn define_directive_callback(
        &mut self,
        name: &str,
        handler: impl FnMut(&Node) -> Result<(), EvalError> + 'a,
    ) -> &mut DirectiveDef<'a> {
        self.push_directive(DirectiveDef::with_callback(name, handler))
    }

    pub fn add_block(&mut self, block: BlockDef<'a>) -> &mut Self {
        self.blocks.push(BlockEntry::Block(block));
        self
    }

    pub fn define_block(
        &mut self,
        name: &str,
        args: impl IntoIterator<Item = ArgDef<'a>>,
    ) -> Result<&mut BlockDef<'a>, SchemaError> {
        let block = BlockDef::new(name, args)?;
        Ok(self.push_block(block))
    }

    /// Register a block handled by `handler`. Its children are still walked
    /// against the block's own (initially empty) container.
    pub fn define_block_callback(
        &mut self,
        name: &str,
        handler: impl FnMut(&Node) -> Result<(), EvalError> + 'a,
    ) -> &mut BlockDef<'a> {
        self.push_block(BlockDef::with_callback(name, handler))
    }

    pub fn add_module_block(&mut self, block: ModuleBlockDef<'a>) -> &mut Self {
        self.blocks.push(BlockEntry::Module(block));
        self
    }

    pub fn define_module_block(
        &mut self,
        name: &str,
        args: impl IntoIterator<Item = ArgDef<'a>>,
    ) -> Result<&mut ModuleBlockDef<'a>, SchemaError> {
        let block = ModuleBlockDef::new(name, args)?;
        let BlockEntry::Module(block) = self.push_entry(BlockEntry::Module(block)) else {
            unreachable!("pushed a module block")
        };
        Ok(block)
    }

    fn push_directive(&mut self, directive: DirectiveDef<'a>) -> &mut DirectiveDef<'a> {
        self.directives.push(directive);
        let last = self.directives.len() - 1;
        &mut self.directives[last]
    }

    fn push_block(&mut self, block: BlockDef<'a>) -> &mut BlockDef<'a> {
        let BlockEntry::Block(block) = self.push_entry(BlockEntry::Block(block)) else {
            unreachable!("pushed a plain block")
        };
        block
    }

    fn push_entry(&mut self, entry: BlockEntry<'a>) -> &mut BlockEntry<'a> {
        self.blocks.push(entry);
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    /// Evaluate a list of sibling nodes, recursing into blocks.
    ///
    /// Stops at the first error. Values bound by earlier nodes stay written.
    #[tracing::instrument(level = "debug", skip_all, fields(count = nodes.len()))]
    pub fn evaluate_tree(&mut self, nodes: &[Node]) -> Result<(), EvalError> {
        let mut used_directives = HashSet::new();
        let mut used_blocks = HashSet::new();

        for node in nodes {
            let directive = evaluate_matching(
                &mut self.directives,
                node,
                NodeKind::Directive,
                &mut used_directives,
            )?;
            let block =
                evaluate_matching(&mut self.blocks, node, NodeKind::Block, &mut used_blocks)?;

            if !directive && !block {
                if self.strict {
                    return Err(EvalError::UnknownNode {
                        at: Location::of(node),
                        name: node.name.clone(),
                    });
                }
                tracing::trace!(name = %node.name, "no definition at this level, skipping");
            }
        }
        Ok(())
    }
}

/// Evaluate `node` against every definition in `defs` sharing its name.
/// Returns whether any matched.
fn evaluate_matching<'n, 'a, D>(
    defs: &mut [D],
    node: &'n Node,
    kind: NodeKind,
    used: &mut HashSet<&'n str>,
) -> Result<bool, EvalError>
where
    D: NodeDefinition<'a>,
{
    let mut matched = false;
    let mut repeatable = true;
    for def in defs.iter().filter(|d| d.name() == node.name) {
        matched = true;
        repeatable &= def.is_repeatable();
    }
    if !matched {
        return Ok(false);
    }

    if !used.insert(node.name.as_str()) && !repeatable {
        return Err(EvalError::Repeated {
            at: Location::of(node),
            kind,
            name: node.name.clone(),
        });
    }

    for def in defs.iter_mut().filter(|d| d.name() == node.name) {
        tracing::trace!(%kind, name = %node.name, "evaluating");
        def.evaluate(node)?;
    }
    Ok(true)
}
