use hyper::service::Service;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use restrie::{Capability, Created, Interrupt, Reply, Resource, Router, RouterService};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

// A product catalogue kept in memory, keyed by name:
//
//   curl -X POST localhost:3001/products -d '{"name":"socks","desc":"Warm!"}'
//   curl localhost:3001/products/socks
//   curl -X DELETE localhost:3001/products/socks
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Product {
    name: String,
    #[serde(default)]
    desc: String,
}

type Store = Arc<Mutex<HashMap<String, Product>>>;

fn router(store: Store) -> Router {
    let create = {
        let store = Arc::clone(&store);
        Capability::with_json_body(move |_ctx, body| {
            let store = Arc::clone(&store);
            async move {
                let product: Product = serde_json::from_value(body)
                    .map_err(|_| Interrupt::bad_request().with_body("Not a product"))?;
                let name = product.name.clone();

                let mut store = store.lock().unwrap();
                if store.contains_key(&name) {
                    return Err(Interrupt::conflict().with_body("Product already exists"));
                }
                store.insert(name.clone(), product);

                Ok(Created::new(&name).with_body(json!({ "id": name })))
            }
        })
        .enveloped()
    };

    let show = {
        let store = Arc::clone(&store);
        Capability::new(move |ctx| {
            let store = Arc::clone(&store);
            async move {
                let name = ctx.str_param("pname").unwrap_or_default().to_owned();
                let store = store.lock().unwrap();
                let product = store.get(&name).ok_or_else(Interrupt::not_found)?;
                Ok(Reply::json(serde_json::to_value(product).unwrap()))
            }
        })
        .enveloped()
    };

    let remove = {
        let store = Arc::clone(&store);
        Capability::new(move |ctx| {
            let store = Arc::clone(&store);
            async move {
                let name = ctx.str_param("pname").unwrap_or_default().to_owned();
                store
                    .lock()
                    .unwrap()
                    .remove(&name)
                    .ok_or_else(Interrupt::not_found)?;
                Ok(Reply::json(json!({ "message": "Deleted!" })))
            }
        })
        .enveloped()
    };

    Router::builder()
        .resource(Resource::builder("products").post(create).build())
        .resource(
            Resource::builder("products/{pname}")
                .get(show)
                .delete(remove)
                .build(),
        )
        .build()
        .unwrap()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let router = router(Arc::default());

    let router_service = Arc::new(RouterService::new(router));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3001));

    let listener = TcpListener::bind(addr).await?;
    println!("App is running on: {}", addr);

    loop {
        let (stream, _) = listener.accept().await?;

        let router_service = router_service.clone();

        tokio::spawn(async move {
            // Get the request service for this connection
            let request_service = router_service.call(&stream).await.unwrap();

            // Wrap the stream in TokioIo for hyper
            let io = TokioIo::new(stream);
            let builder = Builder::new(TokioExecutor::new());

            // Serve the connection
            if let Err(err) = builder.serve_connection(io, request_service).await {
                eprintln!("Error serving connection: {:?}", err);
            }
        });
    }
}
