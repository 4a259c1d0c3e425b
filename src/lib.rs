//! Schema-driven binding and validation for block-structured configuration.
//!
//! Blockfig takes a configuration tree that has already been tokenized (names,
//! positional arguments, nested children, source positions) and walks it
//! against a schema you declare up front. Every node is matched by name, its
//! argument count is checked, its arguments are converted and written into
//! your own variables, and nested blocks are validated recursively.
//!
//! ```
//! use blockfig::Builder;
//! use blockfig::args::{bool_arg, int_arg, string_arg};
//! use blockfig::node::Node;
//!
//! #[derive(Default)]
//! struct Config {
//!     log_level: String,
//!     max_connections: i64,
//!     server_name: String,
//!     tls: bool,
//! }
//!
//! let mut cfg = Config::default();
//! {
//!     let mut schema = Builder::new();
//!     schema.define_directive("log_level", [string_arg(&mut cfg.log_level)])?;
//!     schema.define_directive("max_connections", [int_arg(&mut cfg.max_connections)])?;
//!     schema
//!         .define_block("server", [string_arg(&mut cfg.server_name)])?
//!         .define_directive("tls", [bool_arg(&mut cfg.tls)])?;
//!
//!     let tree = vec![
//!         Node::new("log_level").with_args(["debug"]),
//!         Node::new("max_connections").with_args(["100"]),
//!         Node::new("server")
//!             .with_args(["web"])
//!             .with_children([Node::new("tls").with_args(["true"])]),
//!     ];
//!     schema.evaluate_tree(&tree)?;
//! }
//! assert_eq!(cfg.log_level, "debug");
//! assert_eq!(cfg.max_connections, 100);
//! assert_eq!(cfg.server_name, "web");
//! assert!(cfg.tls);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Design: the schema borrows the configuration
//!
//! Each argument definition holds a [`Value`](values::Value) that mutably
//! borrows one storage location of your configuration. The schema therefore
//! carries the lifetime of those borrows; once it is dropped you get your
//! configuration back, fully written. Handlers are plain closures that capture
//! whatever else they need.
//!
//! # Building a schema
//!
//! Schemas are built bottom-up, once, before any evaluation:
//!
//! - **Values** ([`values`]) convert text into a typed location. Scalars
//!   overwrite on every set; list values and
//!   [`Accumulator`](values::Accumulator) append.
//! - **Arguments** ([`args`]) describe one positional slot each: required by
//!   default, [`optional()`](args::ArgDef::optional), or variadic (consuming all
//!   remaining arguments).
//! - **Definitions** come in three kinds sharing one
//!   [`NodeDefinition`] contract:
//!   - [`DirectiveDef`]: a leaf, children are an error.
//!   - [`BlockDef`]: owns a [`NodesContainer`] for its children.
//!   - [`ModuleBlockDef`]: its first argument names a module, and the children
//!     are validated against that module's container.
//! - **Containers** ([`NodesContainer`], and [`Builder`] at the root) hold the
//!   definitions legal at one nesting level.
//!
//! Arity is derived from the arguments: required ones raise the minimum, every
//! non-variadic one raises the maximum, a variadic one lifts the maximum.
//! Argument ordering is checked when arguments are attached. A required
//! argument after an optional one, or a variadic argument that is not last,
//! is a [`SchemaError`] returned from the registration call.
//!
//! # Evaluation
//!
//! [`NodesContainer::evaluate_tree`] walks sibling nodes in order. For each
//! node, every directive and block registered under its name is evaluated:
//!
//! 1. The argument count is checked against the derived bounds.
//! 2. Arguments are bound positionally; a variadic slot takes the rest.
//! 3. The handler, if any, runs with the raw node.
//! 4. Blocks recurse into their children; module blocks first look up the
//!    module named by their first argument.
//!
//! A non-repeatable name appearing twice among the same siblings is an error.
//! The bookkeeping is per walk, so one schema can evaluate many trees.
//!
//! The first error stops the walk. Values written before it stay written.
//!
//! Nodes whose name has no definition at a level are **skipped**. A container
//! can validate only the names it owns, and several consumers can share one
//! tree. Use [`strict(true)`](NodesContainer::strict) on a container to reject
//! them instead.
//!
//! # Error handling
//!
//! Evaluation returns [`EvalError`]. Every variant that comes from a node is
//! prefixed with `file:line:` when the node carries a source position, so
//! messages can be shown to end users verbatim. With the `rich-errors` feature,
//! errors also implement `miette::Diagnostic`.
//!
//! Evaluation emits `tracing` spans and events at `debug`/`trace` level; no
//! subscriber is installed by the library.

pub mod args;
pub mod error;
pub mod node;
pub mod values;

mod block;
mod builder;
mod container;
mod definition;
mod directive;

#[cfg(test)]
mod fixtures;

pub use block::{BlockDef, BlockEntry, ModuleBlockDef};
pub use builder::Builder;
pub use container::NodesContainer;
pub use definition::{CommonDef, NodeDefinition, NodeHandler};
pub use directive::DirectiveDef;
pub use error::{EvalError, Location, NodeKind, SchemaError, ValueError};
pub use node::{Node, expect_max_args, expect_min_args};
