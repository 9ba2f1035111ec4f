use crate::router::Router;
use crate::service::request_service::{RequestService, RequestServiceBuilder};
use hyper::service::Service;
use std::convert::Infallible;
use std::future::{Ready, ready};
use tokio::net::TcpStream;

/// A [`Service`] over accepted connections: for each `TcpStream` it hands
/// out a [`RequestService`] that carries the peer address into every
/// dispatched request.
///
/// # Examples
///
/// ```no_run
/// use hyper::service::Service;
/// use hyper_util::rt::{TokioExecutor, TokioIo};
/// use hyper_util::server::conn::auto::Builder;
/// use restrie::{Capability, Reply, Resource, Router, RouterService};
/// use std::net::SocketAddr;
/// use std::sync::Arc;
/// use tokio::net::TcpListener;
///
/// fn router() -> Router {
///     Router::builder()
///         .resource(
///             Resource::builder("")
///                 .get(Capability::new(|_ctx| async move { Ok(Reply::text("Home page")) }))
///                 .build(),
///         )
///         .build()
///         .unwrap()
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let service = Arc::new(RouterService::new(router()));
///
///     let addr: SocketAddr = SocketAddr::from(([127, 0, 0, 1], 3001));
///     let listener = TcpListener::bind(addr).await?;
///     println!("App is running on: {}", addr);
///
///     loop {
///         let (stream, _) = listener.accept().await?;
///
///         let router_service = service.clone();
///
///         tokio::spawn(async move {
///             // Get the request service for this connection
///             let request_service = router_service.call(&stream).await.unwrap();
///
///             // Wrap the stream in TokioIo for hyper
///             let io = TokioIo::new(stream);
///
///             // Serve the connection
///             let builder = Builder::new(TokioExecutor::new());
///             if let Err(err) = builder.serve_connection(io, request_service).await {
///                 eprintln!("Error serving connection: {:?}", err);
///             }
///         });
///     }
/// }
/// ```
#[derive(Debug)]
pub struct RouterService {
    builder: RequestServiceBuilder,
}

impl RouterService {
    pub fn new(router: Router) -> RouterService {
        RouterService {
            builder: RequestServiceBuilder::new(router),
        }
    }
}

impl Service<&TcpStream> for RouterService {
    type Response = RequestService;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, conn: &TcpStream) -> Self::Future {
        let addr = match conn.peer_addr() {
            Ok(addr) => addr,
            Err(_) => std::net::SocketAddr::from(([0, 0, 0, 0], 0)),
        };
        let req_service = self.builder.build(addr);

        ready(Ok(req_service))
    }
}
