use hyper::body::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;

/// A typed value extracted from a parameter segment of the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            ParamValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Str(_) => None,
            ParamValue::Int(n) => Some(*n),
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => Display::fmt(s, f),
            ParamValue::Int(n) => Display::fmt(n, f),
        }
    }
}

/// The parameter values extracted while matching a request path against the
/// route trie, keyed by parameter name.
///
/// Keys are unique per route; iteration order is path depth order.
#[derive(Debug, Clone, Default)]
pub struct RouteParams(Vec<(String, ParamValue)>);

impl RouteParams {
    pub fn new() -> RouteParams {
        RouteParams(Vec::new())
    }

    pub(crate) fn set(&mut self, name: String, value: ParamValue) {
        self.0.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Peer address recorded in the request extensions by the connection
/// service.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RemoteAddr(pub(crate) SocketAddr);

/// The per-dispatch request context handed to a capability handler: the
/// request head, the fully collected body bytes and the extracted route
/// parameters.
///
/// It is created once a route and capability have been selected and dropped
/// when the handler returns.
#[derive(Debug)]
pub struct Context {
    pub(crate) head: http::request::Parts,
    pub(crate) body: Bytes,
    pub(crate) params: RouteParams,
    pub(crate) remote_addr: Option<SocketAddr>,
}

impl Context {
    pub fn method(&self) -> &Method {
        &self.head.method
    }

    pub fn uri(&self) -> &Uri {
        &self.head.uri
    }

    pub fn version(&self) -> Version {
        self.head.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// The raw request body. For capabilities registered with
    /// [`Capability::with_json_body`](crate::Capability::with_json_body)
    /// the parsed document is passed as the handler's second argument
    /// instead.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Shorthand for a string-typed route parameter.
    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(ParamValue::as_str)
    }

    /// Shorthand for an integer-typed route parameter.
    pub fn int_param(&self, name: &str) -> Option<i64> {
        self.params.get(name).and_then(ParamValue::as_int)
    }

    /// The peer address, when the crate's connection service supplied one.
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }
}
