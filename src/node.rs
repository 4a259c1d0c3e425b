//! The already-tokenized input tree.
//!
//! Nodes are produced by an external tokenizer and never mutated by the
//! evaluator. They derive serde so a tree can arrive in any serde format.

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// One configuration node: a name, positional arguments and optional children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub children: Vec<Node>,
    /// Source file, empty if unknown.
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: usize,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    pub fn at(mut self, file: impl Into<String>, line: usize) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    pub fn is_block(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Check that `node` has at most `max` arguments. Meant for custom handlers.
pub fn expect_max_args(node: &Node, max: usize) -> Result<(), EvalError> {
    if node.args.len() > max {
        return Err(EvalError::at(
            node,
            format!(
                "expected at most {max} arguments to {}, got {}",
                node.name,
                node.args.len()
            ),
        ));
    }
    Ok(())
}

/// Check that `node` has at least `min` arguments. Meant for custom handlers.
pub fn expect_min_args(node: &Node, min: usize) -> Result<(), EvalError> {
    if node.args.len() < min {
        return Err(EvalError::at(
            node,
            format!(
                "expected at least {min} arguments to {}, got {}",
                node.name,
                node.args.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_with_missing_fields() {
        let json = r#"{"name": "server", "args": ["web"], "children": [{"name": "listen", "args": ["80"], "file": "a.conf", "line": 3}]}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(
            node,
            Node::new("server")
                .with_args(["web"])
                .with_children([Node::new("listen").with_args(["80"]).at("a.conf", 3)])
        );
        assert!(node.is_block());
        assert!(!node.children[0].is_block());
    }

    #[test]
    fn expect_max_args_within_bound() {
        let node = Node::new("tls").with_args(["cert", "key"]);
        assert!(expect_max_args(&node, 2).is_ok());
        assert!(expect_max_args(&node, 3).is_ok());
    }

    #[test]
    fn expect_max_args_over_bound() {
        let node = Node::new("tls")
            .with_args(["cert", "key", "extra"])
            .at("main.conf", 7);
        let err = expect_max_args(&node, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "main.conf:7: expected at most 2 arguments to tls, got 3"
        );
    }

    #[test]
    fn expect_min_args_under_bound() {
        let node = Node::new("tls");
        let err = expect_min_args(&node, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected at least 1 arguments to tls, got 0"
        );
        assert!(expect_min_args(&node, 0).is_ok());
    }
}
