use crate::resource::Resource;
use crate::segment::{ParamKind, Segment};
use crate::types::{ParamValue, RouteParams};
use std::sync::Arc;

/// One node of the route trie.
///
/// Literal and parameter children live in separate insertion-ordered lists:
/// literal children are looked up by exact token equality and always win
/// over parameter children, which are tried in registration order. The
/// trie is extended only while the router is being built and is read-only
/// for its entire operational lifetime.
#[derive(Debug, Default)]
pub(crate) struct Node {
    literals: Vec<(String, Node)>,
    params: Vec<ParamEdge>,
    resource: Option<Arc<Resource>>,
}

#[derive(Debug)]
struct ParamEdge {
    name: String,
    kind: ParamKind,
    node: Node,
}

impl Node {
    /// Walks/extends the trie along `path`, reusing any structurally equal
    /// existing child at each step so resources with a shared prefix share
    /// nodes, and binds `resource` to the final node.
    pub(crate) fn insert(&mut self, path: &[Segment], resource: Arc<Resource>) {
        let mut cursor = self;

        for segment in path {
            cursor = match segment {
                Segment::Literal(s) => {
                    let pos = match cursor.literals.iter().position(|(lit, _)| lit == s) {
                        Some(pos) => pos,
                        None => {
                            cursor.literals.push((s.clone(), Node::default()));
                            cursor.literals.len() - 1
                        }
                    };
                    &mut cursor.literals[pos].1
                }
                Segment::Param { name, kind } => {
                    let pos = match cursor
                        .params
                        .iter()
                        .position(|edge| edge.name == *name && edge.kind == *kind)
                    {
                        Some(pos) => pos,
                        None => {
                            cursor.params.push(ParamEdge {
                                name: name.clone(),
                                kind: *kind,
                                node: Node::default(),
                            });
                            cursor.params.len() - 1
                        }
                    };
                    &mut cursor.params[pos].node
                }
            };
        }

        cursor.resource = Some(resource);
    }

    /// Resolves a token sequence to its bound resource and the parameter
    /// values collected along the way. `None` means no route matched: a
    /// dead end mid-walk, or a landing node with nothing bound.
    pub(crate) fn lookup<'t, I>(&self, tokens: I) -> Option<(Arc<Resource>, RouteParams)>
    where
        I: IntoIterator<Item = &'t str>,
    {
        let mut cursor = self;
        let mut params = RouteParams::new();

        for token in tokens {
            cursor = cursor.descend(token, &mut params)?;
        }

        cursor
            .resource
            .as_ref()
            .map(|resource| (Arc::clone(resource), params))
    }

    fn descend<'n>(&'n self, token: &str, params: &mut RouteParams) -> Option<&'n Node> {
        if let Some((_, node)) = self.literals.iter().find(|(lit, _)| lit == token) {
            return Some(node);
        }

        for edge in &self.params {
            match edge.kind {
                ParamKind::Str => {
                    params.set(edge.name.clone(), ParamValue::Str(token.to_owned()));
                    return Some(&edge.node);
                }
                ParamKind::Int => {
                    if let Ok(n) = token.parse::<i64>() {
                        params.set(edge.name.clone(), ParamValue::Int(n));
                        return Some(&edge.node);
                    }
                }
            }
        }

        None
    }
}
