//! State and evaluation logic shared by every node definition kind.
//!
//! Arity is never set directly. It is derived while arguments are attached:
//!
//! - each required, non-variadic argument raises the minimum by one;
//! - each non-variadic argument raises the maximum by one;
//! - a variadic argument makes the maximum unbounded and must come last.
//!
//! Once an optional argument has been attached, no required argument may
//! follow, across any number of [`CommonDef::add_args`] calls.

use std::fmt;

use crate::args::ArgDef;
use crate::error::{EvalError, Location, NodeKind, SchemaError};
use crate::node::Node;

/// Callback run after a node's arguments have been bound.
pub type NodeHandler<'a> = Box<dyn FnMut(&Node) -> Result<(), EvalError> + 'a>;

/// Capability shared by directives, blocks and module blocks.
pub trait NodeDefinition<'a> {
    fn common(&self) -> &CommonDef<'a>;

    fn kind(&self) -> NodeKind;

    /// Check `node` against this definition and bind it.
    fn evaluate(&mut self, node: &Node) -> Result<(), EvalError>;

    fn name<'s>(&'s self) -> &'s str
    where
        'a: 's,
    {
        self.common().name()
    }

    fn args(&self) -> &[ArgDef<'a>] {
        self.common().args()
    }

    fn min_args(&self) -> usize {
        self.common().min_args()
    }

    /// `None` means unbounded.
    fn max_args(&self) -> Option<usize> {
        self.common().max_args()
    }

    fn is_repeatable(&self) -> bool {
        self.common().is_repeatable()
    }

    fn has_handler(&self) -> bool {
        self.common().handler.is_some()
    }
}

/// Name, arguments, derived arity, handler and repeatability of a definition.
pub struct CommonDef<'a> {
    name: String,
    args: Vec<ArgDef<'a>>,
    min_args: usize,
    max_args: Option<usize>,
    handler: Option<NodeHandler<'a>>,
    repeatable: bool,
    // Callback definitions accept any number of arguments until some are declared.
    open_arity: bool,
}

impl<'a> CommonDef<'a> {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: Vec::new(),
            min_args: 0,
            max_args: Some(0),
            handler: None,
            repeatable: false,
            open_arity: false,
        }
    }

    pub(crate) fn with_open_arity(name: &str) -> Self {
        Self {
            max_args: None,
            open_arity: true,
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[ArgDef<'a>] {
        &self.args
    }

    pub fn min_args(&self) -> usize {
        self.min_args
    }

    pub fn max_args(&self) -> Option<usize> {
        self.max_args
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    pub(crate) fn set_repeatable(&mut self, repeatable: bool) {
        self.repeatable = repeatable;
    }

    pub(crate) fn set_handler(&mut self, handler: NodeHandler<'a>) {
        self.handler = Some(handler);
    }

    /// Append argument definitions, enforcing the ordering rules.
    ///
    /// The call is all-or-nothing: on error the definition is left unchanged.
    pub fn add_args(
        &mut self,
        args: impl IntoIterator<Item = ArgDef<'a>>,
    ) -> Result<(), SchemaError> {
        let args: Vec<ArgDef<'a>> = args.into_iter().collect();
        if args.is_empty() {
            return Ok(());
        }

        let mut optional_seen = self.args.iter().any(|a| !a.is_required());
        if self.args.iter().any(ArgDef::is_variadic) {
            return Err(SchemaError::VariadicNotLast {
                node: self.name.clone(),
            });
        }
        for (i, arg) in args.iter().enumerate() {
            if arg.is_required() && optional_seen {
                return Err(SchemaError::RequiredAfterOptional {
                    node: self.name.clone(),
                    position: self.args.len() + i + 1,
                });
            }
            if arg.is_variadic() && i != args.len() - 1 {
                return Err(SchemaError::VariadicNotLast {
                    node: self.name.clone(),
                });
            }
            if !arg.is_required() {
                optional_seen = true;
            }
        }

        if self.open_arity {
            self.open_arity = false;
            self.max_args = Some(0);
        }
        for arg in &args {
            if arg.is_variadic() {
                self.max_args = None;
                continue;
            }
            if arg.is_required() {
                self.min_args += 1;
            }
            if let Some(max) = self.max_args.as_mut() {
                *max += 1;
            }
        }
        self.args.extend(args);
        Ok(())
    }

    /// Check name and arity, bind arguments positionally, then run the handler.
    pub(crate) fn bind(&mut self, node: &Node, kind: NodeKind) -> Result<(), EvalError> {
        if node.name != self.name {
            return Err(EvalError::NotAllowed {
                at: Location::of(node),
                name: node.name.clone(),
            });
        }

        let got = node.args.len();
        if got < self.min_args {
            return Err(EvalError::TooFewArgs {
                at: Location::of(node),
                kind,
                name: self.name.clone(),
                min: self.min_args,
                got,
            });
        }
        if let Some(max) = self.max_args
            && got > max
        {
            return Err(EvalError::TooManyArgs {
                at: Location::of(node),
                kind,
                name: self.name.clone(),
                max,
                got,
            });
        }

        for (i, arg) in self.args.iter_mut().enumerate() {
            if arg.is_variadic() {
                let rest = node.args.get(i..).unwrap_or_default();
                for (j, value) in rest.iter().enumerate() {
                    set_arg(arg, node, i + j, value)?;
                }
                break;
            }
            if let Some(value) = node.args.get(i) {
                set_arg(arg, node, i, value)?;
            }
        }
        tracing::trace!(%kind, name = %self.name, args = got, "bound arguments");

        if let Some(handler) = self.handler.as_mut() {
            handler(node)?;
        }
        Ok(())
    }
}

fn set_arg(arg: &mut ArgDef<'_>, node: &Node, index: usize, value: &str) -> Result<(), EvalError> {
    arg.target_mut()
        .set(value)
        .map_err(|source| EvalError::InvalidArgument {
            at: Location::of(node),
            name: node.name.clone(),
            position: index + 1,
            source,
        })
}

impl fmt::Debug for CommonDef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonDef")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .field("handler", &self.handler.is_some())
            .field("repeatable", &self.repeatable)
            .finish()
    }
}
