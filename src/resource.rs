use crate::interrupt::Interrupt;
use crate::types::Context;
use hyper::header::{HeaderValue, IntoHeaderName};
use hyper::{HeaderMap, Method};
use serde_json::Value;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

type PlainHandler<R> = Box<dyn Fn(Context) -> HandlerReturn<R> + Send + Sync + 'static>;
type BodyHandler<R> = Box<dyn Fn(Context, Value) -> HandlerReturn<R> + Send + Sync + 'static>;
type HandlerReturn<R> = Box<dyn Future<Output = Result<R, Interrupt>> + Send + 'static>;

/// The body a capability hands back, before the dispatcher renders it.
///
/// `Text` reaches the wire verbatim. `Json` is serialized by the
/// dispatcher: plainly for a raw capability, nested under `{"success": …}`
/// for an enveloped one.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Text(String),
    Json(Value),
}

impl From<String> for Payload {
    fn from(s: String) -> Payload {
        Payload::Text(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Payload {
        Payload::Text(s.to_owned())
    }
}

impl From<Value> for Payload {
    fn from(v: Value) -> Payload {
        Payload::Json(v)
    }
}

/// What a GET, PUT or DELETE capability returns: response headers plus a
/// body payload.
///
/// The dispatcher fixes the status itself: 200 for GET, and for PUT/DELETE
/// 200 when the rendered body is non-empty, 204 otherwise.
#[derive(Debug)]
pub struct Reply {
    pub(crate) headers: HeaderMap,
    pub(crate) body: Payload,
}

impl Reply {
    pub fn new<P: Into<Payload>>(body: P) -> Reply {
        Reply {
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// A reply with no body; PUT and DELETE render it as 204 No Content.
    pub fn empty() -> Reply {
        Reply {
            headers: HeaderMap::new(),
            body: Payload::Empty,
        }
    }

    pub fn text<S: Into<String>>(body: S) -> Reply {
        Reply::new(body.into())
    }

    pub fn json(body: Value) -> Reply {
        Reply::new(body)
    }

    pub fn with_header<N: IntoHeaderName>(mut self, name: N, value: HeaderValue) -> Reply {
        self.headers.insert(name, value);
        self
    }
}

/// What a POST capability returns: headers, body payload and the
/// identifier of the created entity, which the dispatcher appends to the
/// canonical request URL to form the `Location` header of the 201 response.
#[derive(Debug)]
pub struct Created {
    pub(crate) headers: HeaderMap,
    pub(crate) body: Payload,
    pub(crate) id: String,
}

impl Created {
    pub fn new<I: ToString>(id: I) -> Created {
        Created {
            headers: HeaderMap::new(),
            body: Payload::Empty,
            id: id.to_string(),
        }
    }

    pub fn with_body<P: Into<Payload>>(mut self, body: P) -> Created {
        self.body = body.into();
        self
    }

    pub fn with_header<N: IntoHeaderName>(mut self, name: N, value: HeaderValue) -> Created {
        self.headers.insert(name, value);
        self
    }
}

/// How the dispatcher shapes a capability's output and any interrupt
/// escaping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Envelope {
    Raw,
    Json,
}

pub(crate) enum Handler<R> {
    Plain(PlainHandler<R>),
    WithBody(BodyHandler<R>),
}

/// One registered operation of a [`Resource`]: a handler plus its shaping
/// flags.
///
/// The handler either takes the [`Context`] alone ([`Capability::new`]) or
/// additionally receives the request body parsed as JSON
/// ([`Capability::with_json_body`]); in the latter case a body that fails
/// to parse yields 400 before the handler runs. Independently,
/// [`enveloped`](Capability::enveloped) switches response shaping to the
/// JSON success/error envelope.
///
/// ```
/// use restrie::{Capability, Context, Interrupt, Reply};
/// use serde_json::json;
///
/// async fn show(ctx: Context) -> Result<Reply, Interrupt> {
///     Ok(Reply::json(json!({ "motd": "hello" })))
/// }
///
/// let capability = Capability::new(show).enveloped();
/// ```
pub struct Capability<R> {
    pub(crate) handler: Handler<R>,
    pub(crate) envelope: Envelope,
}

impl<R: 'static> Capability<R> {
    /// A capability whose handler receives the [`Context`] alone.
    pub fn new<H, F>(handler: H) -> Capability<R>
    where
        H: Fn(Context) -> F + Send + Sync + 'static,
        F: Future<Output = Result<R, Interrupt>> + Send + 'static,
    {
        Capability {
            handler: Handler::Plain(Box::new(move |ctx| Box::new(handler(ctx)))),
            envelope: Envelope::Raw,
        }
    }

    /// A capability whose handler additionally receives the request body
    /// parsed as JSON. Malformed bodies never reach the handler; they
    /// yield 400 with a fixed diagnostic.
    pub fn with_json_body<H, F>(handler: H) -> Capability<R>
    where
        H: Fn(Context, Value) -> F + Send + Sync + 'static,
        F: Future<Output = Result<R, Interrupt>> + Send + 'static,
    {
        Capability {
            handler: Handler::WithBody(Box::new(move |ctx, body| Box::new(handler(ctx, body)))),
            envelope: Envelope::Raw,
        }
    }

    /// Shapes this capability's output as a JSON envelope: success payloads
    /// are serialized under `{"success": …}`, and the body of any interrupt
    /// escaping the handler is rewritten under `{"error": …}` while its
    /// status and headers are preserved. Both directions set
    /// `Content-Type: application/json`.
    pub fn enveloped(mut self) -> Capability<R> {
        self.envelope = Envelope::Json;
        self
    }
}

impl<R> Debug for Capability<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let shape = match self.handler {
            Handler::Plain(_) => "plain",
            Handler::WithBody(_) => "with_json_body",
        };
        write!(f, "{{ handler: {}, envelope: {:?} }}", shape, self.envelope)
    }
}

/// The capability slots of one resource, one per supported HTTP method.
///
/// "Allowed methods" is a direct emptiness check over these slots, in the
/// fixed order POST, GET, PUT, DELETE.
#[derive(Debug, Default)]
pub(crate) struct CapabilityTable {
    pub(crate) post: Option<Capability<Created>>,
    pub(crate) get: Option<Capability<Reply>>,
    pub(crate) put: Option<Capability<Reply>>,
    pub(crate) delete: Option<Capability<Reply>>,
}

impl CapabilityTable {
    pub(crate) fn allowed(&self) -> Vec<Method> {
        let mut methods = Vec::with_capacity(4);
        if self.post.is_some() {
            methods.push(Method::POST);
        }
        if self.get.is_some() {
            methods.push(Method::GET);
        }
        if self.put.is_some() {
            methods.push(Method::PUT);
        }
        if self.delete.is_some() {
            methods.push(Method::DELETE);
        }
        methods
    }
}

/// A resource: a route template plus the capabilities reachable at it.
///
/// ```
/// use restrie::{Capability, Interrupt, Reply, Resource};
///
/// let resource = Resource::builder("customers/{cid:int}")
///     .get(Capability::new(|ctx| async move {
///         let cid = ctx.int_param("cid").ok_or_else(Interrupt::server_error)?;
///         Ok(Reply::text(format!("customer {}", cid)))
///     }))
///     .build();
/// assert_eq!(resource.route(), "customers/{cid:int}");
/// ```
pub struct Resource {
    pub(crate) route: String,
    pub(crate) table: CapabilityTable,
}

impl Resource {
    pub fn builder<P: Into<String>>(route: P) -> ResourceBuilder {
        ResourceBuilder {
            route: route.into(),
            table: CapabilityTable::default(),
        }
    }

    /// The route template this resource was registered with.
    pub fn route(&self) -> &str {
        &self.route
    }
}

impl Debug for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ route: {:?}, methods: {:?} }}",
            self.route,
            self.table.allowed()
        )
    }
}

/// Builder for a [`Resource`]. Attach at most one capability per method.
pub struct ResourceBuilder {
    route: String,
    table: CapabilityTable,
}

impl ResourceBuilder {
    pub fn post(mut self, capability: Capability<Created>) -> ResourceBuilder {
        self.table.post = Some(capability);
        self
    }

    pub fn get(mut self, capability: Capability<Reply>) -> ResourceBuilder {
        self.table.get = Some(capability);
        self
    }

    pub fn put(mut self, capability: Capability<Reply>) -> ResourceBuilder {
        self.table.put = Some(capability);
        self
    }

    pub fn delete(mut self, capability: Capability<Reply>) -> ResourceBuilder {
        self.table.delete = Some(capability);
        self
    }

    pub fn build(self) -> Resource {
        Resource {
            route: self.route,
            table: self.table,
        }
    }
}
