use crate::constants;
use crate::helpers;
use crate::interrupt::Interrupt;
use crate::resource::{Capability, Created, Envelope, Handler, Payload, Reply, Resource};
use crate::segment::compile_template;
use crate::trie::Node;
use crate::types::{Context, RemoteAddr, RouteParams};
use crate::url::{self, Origin};
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderValue};
use hyper::{HeaderMap, Method, Request, Response, StatusCode};
use serde_json::{Value, json};
use std::pin::Pin;
use std::sync::Arc;

/// The router: a trie of path segments built once from a set of
/// [`Resource`]s, resolving each request to a capability invocation.
///
/// A router is built with [`Router::builder`], is immutable afterwards and
/// supports any number of concurrent [`dispatch`](Router::dispatch) calls
/// without locking.
///
/// ```
/// use restrie::{Capability, Interrupt, Reply, Resource, Router};
///
/// let router = Router::builder()
///     .resource(
///         Resource::builder("customers/{cid:int}")
///             .get(Capability::new(|ctx| async move {
///                 let cid = ctx.int_param("cid").ok_or_else(Interrupt::server_error)?;
///                 Ok(Reply::text(format!("customer {}", cid)))
///             }))
///             .build(),
///     )
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct Router {
    pub(crate) root: Node,
    pub(crate) origin: Origin,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Resolves one request to a response.
    ///
    /// Every outcome is a well-formed response; routing failures and
    /// interrupts raised by capability handlers are converted at this
    /// boundary, never propagated to the caller.
    pub async fn dispatch<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body + Send + 'static,
        B::Data: Send,
    {
        match self.process(req).await {
            Ok(response) => response,
            Err(interrupt) => {
                tracing::debug!(%interrupt, "dispatch interrupted");
                let (status, headers, body) = interrupt.into_parts();
                respond(status, headers, body)
            }
        }
    }

    async fn process<B>(&self, req: Request<B>) -> Result<Response<Full<Bytes>>, Interrupt>
    where
        B: Body + Send + 'static,
        B::Data: Send,
    {
        let path = helpers::percent_decode_request_path(req.uri().path()).map_err(|_| {
            Interrupt::bad_request().with_body("Invalid percent encoding in request path")
        })?;

        let (resource, params) = self
            .root
            .lookup(helpers::path_tokens(&path))
            .ok_or_else(Interrupt::not_found)?;

        tracing::trace!(route = resource.route(), method = %req.method(), "route matched");

        let allowed = resource.table.allowed();

        if req.method() == Method::OPTIONS {
            return Ok(preflight(&allowed));
        }

        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_owned());

        match req.method().clone() {
            Method::POST => match resource.table.post.as_ref() {
                Some(capability) => {
                    let ctx = context(req, params).await?;
                    let Created {
                        mut headers,
                        body,
                        id,
                    } = invoke(capability, ctx).await?;
                    let body = render(body, capability.envelope, &mut headers);

                    let location =
                        url::canonical_url(&self.origin, host.as_deref(), &path, Some(&id));
                    let location = HeaderValue::from_str(&location).map_err(|_| {
                        Interrupt::server_error().with_body("Created identifier is not header-safe")
                    })?;
                    headers.insert(header::LOCATION, location);

                    Ok(respond(StatusCode::CREATED, headers, body))
                }
                None => Ok(method_not_allowed(&allowed)),
            },
            Method::GET => match resource.table.get.as_ref() {
                Some(capability) => {
                    let ctx = context(req, params).await?;
                    let Reply { mut headers, body } = invoke(capability, ctx).await?;
                    let body = render(body, capability.envelope, &mut headers);

                    Ok(respond(StatusCode::OK, headers, body))
                }
                None => Ok(method_not_allowed(&allowed)),
            },
            Method::PUT => mutate(resource.table.put.as_ref(), &allowed, req, params).await,
            Method::DELETE => {
                mutate(resource.table.delete.as_ref(), &allowed, req, params).await
            }
            _ => Ok(method_not_allowed(&allowed)),
        }
    }
}

/// PUT and DELETE share their shaping: 200 when the rendered body is
/// non-empty, 204 otherwise.
async fn mutate<B>(
    capability: Option<&Capability<Reply>>,
    allowed: &[Method],
    req: Request<B>,
    params: RouteParams,
) -> Result<Response<Full<Bytes>>, Interrupt>
where
    B: Body + Send + 'static,
    B::Data: Send,
{
    let capability = match capability {
        Some(capability) => capability,
        None => return Ok(method_not_allowed(allowed)),
    };

    let ctx = context(req, params).await?;
    let Reply { mut headers, body } = invoke(capability, ctx).await?;
    let body = render(body, capability.envelope, &mut headers);

    let status = if body.is_empty() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    };

    Ok(respond(status, headers, body))
}

/// Builder for a [`Router`]: collects resources and the origin
/// configuration, then compiles the route trie.
pub struct RouterBuilder {
    resources: Vec<Resource>,
    origin: Origin,
}

impl RouterBuilder {
    pub(crate) fn new() -> RouterBuilder {
        RouterBuilder {
            resources: Vec::new(),
            origin: Origin::default(),
        }
    }

    pub fn resource(mut self, resource: Resource) -> RouterBuilder {
        self.resources.push(resource);
        self
    }

    /// Scheme, server name and port used by the canonical URL builder when
    /// a request carries no `Host` header.
    pub fn origin(mut self, origin: Origin) -> RouterBuilder {
        self.origin = origin;
        self
    }

    /// Compiles every route template and builds the trie. Registration
    /// order fixes parameter tie-breaking among siblings; a template
    /// registered twice leaves the later resource bound.
    pub fn build(self) -> crate::Result<Router> {
        let mut root = Node::default();

        for resource in self.resources {
            let segments = compile_template(resource.route())?;
            root.insert(&segments, Arc::new(resource));
        }

        Ok(Router {
            root,
            origin: self.origin,
        })
    }
}

async fn context<B>(req: Request<B>, params: RouteParams) -> Result<Context, Interrupt>
where
    B: Body + Send + 'static,
    B::Data: Send,
{
    let remote_addr = req.extensions().get::<RemoteAddr>().map(|addr| addr.0);
    let (head, body) = req.into_parts();
    let body = body
        .collect()
        .await
        .map_err(|_| Interrupt::server_error().with_body("Failed to read request body"))?
        .to_bytes();

    Ok(Context {
        head,
        body,
        params,
        remote_addr,
    })
}

async fn invoke<R>(capability: &Capability<R>, ctx: Context) -> Result<R, Interrupt> {
    let result = match &capability.handler {
        Handler::Plain(handler) => Pin::from(handler(ctx)).await,
        Handler::WithBody(handler) => match serde_json::from_slice::<Value>(ctx.body()) {
            Ok(parsed) => Pin::from(handler(ctx, parsed)).await,
            Err(_) => Err(Interrupt::bad_request().with_body(constants::MALFORMED_JSON_BODY)),
        },
    };

    match capability.envelope {
        Envelope::Raw => result,
        Envelope::Json => result.map_err(envelope_error),
    }
}

/// Renders a capability payload into the response body, setting the JSON
/// content type where JSON reaches the wire.
fn render(body: Payload, envelope: Envelope, headers: &mut HeaderMap) -> String {
    match envelope {
        Envelope::Raw => match body {
            Payload::Empty => String::new(),
            Payload::Text(text) => text,
            Payload::Json(value) => {
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(constants::MIME_JSON),
                );
                value.to_string()
            }
        },
        Envelope::Json => {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(constants::MIME_JSON),
            );
            let value = match body {
                Payload::Empty => Value::String(String::new()),
                Payload::Text(text) => Value::String(text),
                Payload::Json(value) => value,
            };
            json!({ "success": value }).to_string()
        }
    }
}

/// Rewrites an interrupt escaping an enveloped capability: the body moves
/// under an `"error"` key; status and existing headers are untouched.
fn envelope_error(mut interrupt: Interrupt) -> Interrupt {
    let body = json!({ "error": interrupt.body() }).to_string();
    interrupt.set_body(body);
    interrupt.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(constants::MIME_JSON),
    );
    interrupt
}

fn preflight(allowed: &[Method]) -> Response<Full<Bytes>> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(constants::CORS_ALLOW_HEADERS),
    );
    headers.insert(header::ALLOW, allow_header(allowed));

    respond(StatusCode::NO_CONTENT, headers, String::new())
}

fn method_not_allowed(allowed: &[Method]) -> Response<Full<Bytes>> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ALLOW, allow_header(allowed));

    respond(StatusCode::METHOD_NOT_ALLOWED, headers, String::new())
}

fn allow_header(allowed: &[Method]) -> HeaderValue {
    let joined = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(",");

    HeaderValue::from_str(&joined).expect("method names are valid header values")
}

fn respond(status: StatusCode, headers: HeaderMap, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
