use std::ops::{Deref, DerefMut};

use crate::container::NodesContainer;

/// Root of a schema.
///
/// Dereferences to the top-level [`NodesContainer`], so directives, blocks and
/// module blocks are registered and evaluated directly on the builder.
#[derive(Debug, Default)]
pub struct Builder<'a> {
    root: NodesContainer<'a>,
}

impl<'a> Builder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_container(self) -> NodesContainer<'a> {
        self.root
    }
}

impl<'a> Deref for Builder<'a> {
    type Target = NodesContainer<'a>;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}

impl DerefMut for Builder<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{bool_arg, int_arg, string_arg, variadic_string_arg};
    use crate::definition::NodeDefinition;
    use crate::error::{EvalError, SchemaError};
    use crate::fixtures::test::{ServerConfig, server_tree};
    use crate::node::{Node, expect_max_args};
    use pretty_assertions::assert_eq;

    #[test]
    fn new_builder_is_empty() {
        let builder = Builder::new();
        assert!(builder.directives().is_empty());
        assert!(builder.blocks().is_empty());
        assert!(!builder.is_strict());
    }

    #[test]
    fn define_directive_returns_definition() {
        let mut value = String::new();
        let mut builder = Builder::new();
        let directive = builder
            .define_directive("test_directive", [string_arg(&mut value)])
            .unwrap();
        assert_eq!(directive.name(), "test_directive");
        assert_eq!(directive.min_args(), 1);
    }

    #[test]
    fn define_callbacks_set_handlers() {
        let mut builder = Builder::new();
        let directive = builder.define_directive_callback("callback_directive", |node: &Node| {
            expect_max_args(node, 1)
        });
        assert!(directive.has_handler());
        assert_eq!(directive.max_args(), None);

        let block = builder.define_block_callback("callback_block", |_: &Node| Ok(()));
        assert!(block.has_handler());

        let err = builder
            .evaluate_tree(&[Node::new("callback_directive").with_args(["a", "b"])])
            .unwrap_err();
        assert!(matches!(err, EvalError::Node { .. }));
    }

    #[test]
    fn full_schema_binds_configuration() {
        let mut cfg = ServerConfig::default();
        {
            let mut builder = Builder::new();
            builder
                .define_directive("log_level", [string_arg(&mut cfg.log_level)])
                .unwrap();
            builder
                .define_directive("max_connections", [int_arg(&mut cfg.max_connections)])
                .unwrap();

            let server = builder
                .define_block("server", [string_arg(&mut cfg.server_name)])
                .unwrap();
            server
                .define_directive("listen", [string_arg(&mut cfg.listen)])
                .unwrap();
            server.define_directive("tls", [bool_arg(&mut cfg.tls)]).unwrap();
            server
                .define_directive("upstream", [variadic_string_arg(&mut cfg.upstreams)])
                .unwrap();

            builder.evaluate_tree(&server_tree()).unwrap();
        }
        assert_eq!(
            cfg,
            ServerConfig {
                log_level: "debug".into(),
                max_connections: 100,
                server_name: "web".into(),
                listen: "80".into(),
                tls: false,
                upstreams: vec!["a".into(), "b".into(), "c".into()],
                ..ServerConfig::default()
            }
        );
    }

    #[test]
    fn conversion_error_is_located() {
        let mut cfg = ServerConfig::default();
        let mut builder = Builder::new();
        builder
            .define_directive("max_connections", [int_arg(&mut cfg.max_connections)])
            .unwrap();
        let nodes = [Node::new("max_connections")
            .with_args(["lots"])
            .at("server.conf", 2)];
        let err = builder.evaluate_tree(&nodes).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("server.conf:2: invalid argument 1 to 'max_connections'")
        );
    }

    #[test]
    fn tree_from_serialized_input() -> Result<(), Box<dyn std::error::Error>> {
        let json = r#"[
            {"name": "log_level", "args": ["warn"], "file": "in.json", "line": 1},
            {"name": "server", "args": ["api"], "children": [
                {"name": "tls", "args": ["true"]}
            ]}
        ]"#;
        let nodes: Vec<Node> = serde_json::from_str(json)?;
        let mut cfg = ServerConfig::default();
        {
            let mut builder = Builder::new();
            builder.define_directive("log_level", [string_arg(&mut cfg.log_level)])?;
            builder
                .define_block("server", [string_arg(&mut cfg.server_name)])?
                .define_directive("tls", [bool_arg(&mut cfg.tls)])?;
            builder.evaluate_tree(&nodes)?;
        }
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.server_name, "api");
        assert!(cfg.tls);
        Ok(())
    }

    #[test]
    fn into_container_keeps_definitions() {
        let mut value = String::new();
        let mut builder = Builder::new();
        builder.strict(true);
        builder.define_directive("a", [string_arg(&mut value)]).unwrap();
        let container = builder.into_container();
        assert!(container.is_strict());
        assert_eq!(container.directives().len(), 1);
    }

    #[test]
    fn schema_error_is_typed() {
        let mut rest = Vec::new();
        let mut tail = String::new();
        let mut builder = Builder::new();
        let err = builder
            .define_block(
                "upstream",
                [variadic_string_arg(&mut rest), string_arg(&mut tail)],
            )
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::VariadicNotLast {
                node: "upstream".into()
            }
        );
    }
}
