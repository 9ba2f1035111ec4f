use crate::router::Router;
use crate::types::RemoteAddr;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, service::Service};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

/// A per-connection hyper [`Service`] dispatching requests on the shared
/// router, with the peer address recorded into each request's extensions.
pub struct RequestService {
    pub(crate) router: Arc<Router>,
    pub(crate) remote_addr: SocketAddr,
}

impl<B> Service<Request<B>> for RequestService
where
    B: Body + Send + 'static,
    B::Data: Send,
{
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, mut req: Request<B>) -> Self::Future {
        let router = self.router.clone();
        let remote_addr = self.remote_addr;

        let fut = async move {
            req.extensions_mut().insert(RemoteAddr(remote_addr));
            Ok(router.dispatch(req).await)
        };

        Box::pin(fut)
    }
}

/// Shares one [`Router`] across the [`RequestService`]s built from it, one
/// per connection.
#[derive(Debug)]
pub struct RequestServiceBuilder {
    router: Arc<Router>,
}

impl RequestServiceBuilder {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    pub fn build(&self, remote_addr: SocketAddr) -> RequestService {
        RequestService {
            router: self.router.clone(),
            remote_addr,
        }
    }
}
