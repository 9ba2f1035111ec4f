//! `restrie` is a lightweight, trie-based REST resource router for the Rust HTTP library [hyper](https://hyper.rs/).
//!
//! Restrie's core features:
//!
//! - 🌲 Route matching over a segment trie: resources sharing a path prefix share one path through the tree
//!
//! - 🔢 Typed route parameters: `{cid:int}` only matches integer tokens and hands the handler an `i64`
//!
//! - 🧭 Method dispatch with computed `Allow` headers, OPTIONS preflight answers and `Location` headers on 201
//!
//! - ❗ A uniform [interrupt](crate::Interrupt) model: abort any handler with a specific HTTP status, headers and body
//!
//! - 📦 JSON envelopes per capability: parsed request bodies in, `{"success": …}` / `{"error": …}` out
//!
//! ## Basic Example
//!
//! A simple example using `restrie` with `hyper` would look like the following:
//!
//! ```no_run
//! use hyper::service::Service;
//! use hyper_util::rt::{TokioExecutor, TokioIo};
//! use hyper_util::server::conn::auto::Builder;
//! use restrie::{Capability, Created, Interrupt, Reply, Resource, Router, RouterService};
//! use serde_json::Value;
//! use std::collections::HashMap;
//! use std::net::SocketAddr;
//! use std::sync::{Arc, Mutex};
//! use tokio::net::TcpListener;
//!
//! // A tiny in-memory store shared by the handlers.
//! #[derive(Default)]
//! struct Store {
//!     customers: Mutex<HashMap<i64, Value>>,
//!     next_id: Mutex<i64>,
//! }
//!
//! fn router(store: Arc<Store>) -> Router {
//!     let create = {
//!         let store = Arc::clone(&store);
//!         // The request body arrives parsed; malformed JSON never gets here.
//!         Capability::with_json_body(move |_ctx, body| {
//!             let store = Arc::clone(&store);
//!             async move {
//!                 let mut next_id = store.next_id.lock().unwrap();
//!                 let cid = *next_id;
//!                 *next_id += 1;
//!                 store.customers.lock().unwrap().insert(cid, body);
//!                 Ok(Created::new(cid))
//!             }
//!         })
//!     };
//!
//!     let show = {
//!         let store = Arc::clone(&store);
//!         Capability::new(move |ctx| {
//!             let store = Arc::clone(&store);
//!             async move {
//!                 let cid = ctx.int_param("cid").ok_or_else(Interrupt::server_error)?;
//!                 let customers = store.customers.lock().unwrap();
//!                 let customer = customers.get(&cid).ok_or_else(Interrupt::not_found)?;
//!                 Ok(Reply::json(customer.clone()))
//!             }
//!         })
//!         .enveloped()
//!     };
//!
//!     Router::builder()
//!         .resource(Resource::builder("customers").post(create).build())
//!         .resource(Resource::builder("customers/{cid:int}").get(show).build())
//!         .build()
//!         .unwrap()
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let router = router(Arc::new(Store::default()));
//!
//!     let router_service = Arc::new(RouterService::new(router));
//!
//!     // The address on which the server will be listening.
//!     let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
//!
//!     let listener = TcpListener::bind(addr).await?;
//!     println!("App is running on: {}", addr);
//!
//!     loop {
//!         let (stream, _) = listener.accept().await?;
//!
//!         let router_service = router_service.clone();
//!
//!         tokio::spawn(async move {
//!             // Get the request service for this connection
//!             let request_service = router_service.call(&stream).await.unwrap();
//!
//!             // Wrap the stream in TokioIo for hyper
//!             let io = TokioIo::new(stream);
//!             let builder = Builder::new(TokioExecutor::new());
//!
//!             // Serve the connection
//!             if let Err(err) = builder.serve_connection(io, request_service).await {
//!                 eprintln!("Error serving connection: {:?}", err);
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! ## Routing
//!
//! ### Resources and capabilities
//!
//! A [`Resource`] couples one route template with up to four capabilities,
//! one per HTTP method. The router computes everything else: `Allow`
//! headers from the populated slots, 405 for the rest, 204 answers for
//! OPTIONS preflights.
//!
//! ```
//! use restrie::{Capability, Created, Reply, Resource, Router};
//!
//! let products = Resource::builder("products")
//!     .post(Capability::new(|_ctx| async move {
//!         // 201 Created; the id becomes part of the Location header.
//!         Ok(Created::new("socks"))
//!     }))
//!     .get(Capability::new(|_ctx| async move {
//!         Ok(Reply::text("the product list"))
//!     }))
//!     .build();
//!
//! let router = Router::builder().resource(products).build().unwrap();
//! ```
//!
//! Response statuses are fixed by the method: GET answers 200, POST
//! answers 201 with a `Location` header, and PUT/DELETE answer 200 when
//! the capability returned a body and 204 when it did not, so one
//! handler shape serves both the body-returning and the void variant.
//!
//! ### Route Parameters
//!
//! Route templates mix literal segments with named parameters written as
//! `{name}` or `{name:kind}`. A `{name}` segment matches any token; a
//! `{name:int}` segment only matches integer tokens, and non-numeric
//! tokens at that depth yield 404 rather than a conversion error. Literal
//! siblings always win over parameter siblings.
//!
//! ```txt
//! Route template: products/{pname}/versions/{version:int}
//! Request path:   /products/socks/versions/3
//! Parameters:     pname = "socks" (string), version = 3 (integer)
//! ```
//!
//! ```
//! use restrie::{Capability, Interrupt, Reply, Resource, Router};
//!
//! let router = Router::builder()
//!     .resource(
//!         Resource::builder("products/{pname}/versions/{version:int}")
//!             .get(Capability::new(|ctx| async move {
//!                 let pname = ctx.str_param("pname").unwrap_or_default().to_owned();
//!                 let version = ctx.int_param("version").ok_or_else(Interrupt::server_error)?;
//!                 Ok(Reply::text(format!("{} v{}", pname, version)))
//!             }))
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## JSON envelopes
//!
//! Two independent shapes can be attached per capability:
//!
//! - [`Capability::with_json_body`] parses the request body as JSON before
//!   the handler runs and passes the parsed value as the handler's second
//!   argument; a malformed body answers 400 without invoking the handler.
//! - [`Capability::enveloped`] serializes success payloads under
//!   `{"success": …}` and rewrites the body of any escaping interrupt
//!   under `{"error": …}`, preserving its status and headers, with
//!   `Content-Type: application/json` set in both directions.
//!
//! ```
//! use restrie::{Capability, Reply, Resource, Router};
//! use serde_json::json;
//!
//! let router = Router::builder()
//!     .resource(
//!         Resource::builder("status")
//!             .get(
//!                 Capability::new(|_ctx| async move { Ok(Reply::json(json!({"up": true}))) })
//!                     .enveloped(),
//!             )
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//! // GET /status now answers `{"success":{"up":true}}`.
//! ```
//!
//! ## Interrupts
//!
//! Any handler can abort with an [`Interrupt`]; the dispatch boundary
//! converts it verbatim into the response. The router itself only ever
//! raises NotFound (no route matched) and BadRequest (undecodable path or
//! malformed JSON body); the remaining kinds exist for application
//! handlers.
//!
//! ```
//! use http_body_util::Empty;
//! use hyper::{Request, StatusCode, body::Bytes};
//! use restrie::{Capability, Interrupt, Reply, Resource, Router};
//!
//! let router = Router::builder()
//!     .resource(
//!         Resource::builder("teapot")
//!             .get(Capability::new(|_ctx| async move {
//!                 Err::<Reply, _>(Interrupt::forbidden().with_body("I refuse"))
//!             }))
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let req = Request::builder()
//!     .uri("/teapot")
//!     .body(Empty::<Bytes>::new())
//!     .unwrap();
//!
//! let response = futures::executor::block_on(router.dispatch(req));
//! assert_eq!(response.status(), StatusCode::FORBIDDEN);
//! ```
//!
//! ## Canonical URLs
//!
//! The `Location` header of a 201 response is the absolute URL of the
//! request plus `/` and the created identifier. The authority is the
//! request's `Host` header when present; otherwise it falls back to the
//! router's [`Origin`] configuration, suppressing the port when it is the
//! scheme's default.
//!
//! ```
//! use restrie::{Origin, Router, Scheme};
//!
//! let router = Router::builder()
//!     .origin(Origin::new(Scheme::Https, "api.example.org", 443))
//!     .build()
//!     .unwrap();
//! ```

pub use self::error::Error;
pub use self::interrupt::{Interrupt, InterruptKind};
pub use self::resource::{Capability, Created, Payload, Reply, Resource, ResourceBuilder};
pub use self::router::{Router, RouterBuilder};
#[doc(hidden)]
pub use self::service::RequestService;
pub use self::service::RequestServiceBuilder;
pub use self::service::RouterService;
pub use self::types::{Context, ParamValue, RouteParams};
pub use self::url::{Origin, Scheme};

mod constants;
mod error;
mod helpers;
mod interrupt;
mod resource;
mod router;
mod segment;
mod service;
mod trie;
mod types;
mod url;

/// A Result type often returned from methods that can have restrie errors.
pub type Result<T> = std::result::Result<T, Error>;
