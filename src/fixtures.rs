#[cfg(test)]
pub mod test {
    use crate::node::Node;

    /// Target structure the tests bind into.
    #[derive(Debug, Default, PartialEq)]
    pub struct ServerConfig {
        pub log_level: String,
        pub max_connections: i64,
        pub global_setting: String,
        pub server_name: String,
        pub listen: String,
        pub tls: bool,
        pub auth_type: String,
        pub setting: String,
        pub upstreams: Vec<String>,
    }

    /// `server "web" { auth "jwt" { setting "x" } }`
    pub fn nested_tree() -> Vec<Node> {
        vec![
            Node::new("server")
                .with_args(["web"])
                .at("site.conf", 1)
                .with_children([Node::new("auth")
                    .with_args(["jwt"])
                    .at("site.conf", 2)
                    .with_children([Node::new("setting").with_args(["x"]).at("site.conf", 3)])]),
        ]
    }

    /// The tree an upstream tokenizer would produce for:
    ///
    /// ```text
    /// log_level debug
    /// max_connections 100
    ///
    /// server web {
    ///     listen 80
    ///     tls false
    ///     upstream a b c
    /// }
    /// ```
    pub fn server_tree() -> Vec<Node> {
        vec![
            Node::new("log_level").with_args(["debug"]).at("server.conf", 1),
            Node::new("max_connections")
                .with_args(["100"])
                .at("server.conf", 2),
            Node::new("server")
                .with_args(["web"])
                .at("server.conf", 4)
                .with_children([
                    Node::new("listen").with_args(["80"]).at("server.conf", 5),
                    Node::new("tls").with_args(["false"]).at("server.conf", 6),
                    Node::new("upstream")
                        .with_args(["a", "b", "c"])
                        .at("server.conf", 7),
                ]),
        ]
    }
}
