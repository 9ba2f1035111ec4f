use hyper::header::HeaderValue;
use hyper::service::Service;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use restrie::{Capability, Interrupt, Reply, Resource, Router, RouterService};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

// Every interrupt kind turns into its fixed status at the dispatch
// boundary; enveloped capabilities additionally get a JSON error body:
//
//   curl -i localhost:3001/vault          -> 401, plain text
//   curl -i localhost:3001/members-only   -> 403, {"error": ...}
async fn vault(_ctx: restrie::Context) -> Result<Reply, Interrupt> {
    Err(Interrupt::unauthorised()
        .with_body("No key, no entry")
        .with_header("www-authenticate", HeaderValue::from_static("Basic")))
}

async fn members_only(_ctx: restrie::Context) -> Result<Reply, Interrupt> {
    Err(Interrupt::forbidden().with_body("Members only"))
}

fn router() -> Router {
    Router::builder()
        .resource(
            Resource::builder("vault")
                .get(Capability::new(vault))
                .build(),
        )
        .resource(
            Resource::builder("members-only")
                .get(Capability::new(members_only).enveloped())
                .build(),
        )
        .build()
        .unwrap()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let router_service = Arc::new(RouterService::new(router()));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3001));

    let listener = TcpListener::bind(addr).await?;
    println!("App is running on: {}", addr);

    loop {
        let (stream, _) = listener.accept().await?;

        let router_service = router_service.clone();

        tokio::spawn(async move {
            let request_service = router_service.call(&stream).await.unwrap();

            let io = TokioIo::new(stream);
            let builder = Builder::new(TokioExecutor::new());

            if let Err(err) = builder.serve_connection(io, request_service).await {
                eprintln!("Error serving connection: {:?}", err);
            }
        });
    }
}
