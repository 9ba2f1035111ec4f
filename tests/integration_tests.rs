use bytes::Bytes;
use http_body_util::{BodyExt, Empty, Full};
use hyper::header::{self, HeaderValue};
use hyper::{Request, Response, StatusCode};
use restrie::{
    Capability, Context, Created, Interrupt, Origin, Reply, Resource, Router, Scheme,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Customer {
    name: String,
    dob_year: i64,
}

fn test_customer() -> Customer {
    Customer {
        name: "Mr. Bean".to_owned(),
        dob_year: 1963,
    }
}

type Store = Arc<Mutex<HashMap<i64, Value>>>;

/// Customers: POST on the collection (JSON body, raw response), GET/PUT/
/// DELETE on the item. Integer-typed ids.
fn customer_router(store: Store) -> Router {
    let create = {
        let store = Arc::clone(&store);
        Capability::with_json_body(move |_ctx, body| {
            let store = Arc::clone(&store);
            async move {
                let mut store = store.lock().unwrap();
                let cid = store.len() as i64;
                store.insert(cid, body);
                Ok(Created::new(cid))
            }
        })
    };

    let show = {
        let store = Arc::clone(&store);
        Capability::new(move |ctx| {
            let store = Arc::clone(&store);
            async move {
                let cid = ctx.int_param("cid").ok_or_else(Interrupt::server_error)?;
                let store = store.lock().unwrap();
                let customer = store.get(&cid).ok_or_else(Interrupt::not_found)?;
                Ok(Reply::json(customer.clone()))
            }
        })
        .enveloped()
    };

    let update = {
        let store = Arc::clone(&store);
        Capability::with_json_body(move |ctx, body| {
            let store = Arc::clone(&store);
            async move {
                let cid = ctx.int_param("cid").ok_or_else(Interrupt::server_error)?;
                let mut store = store.lock().unwrap();
                let customer = store.get_mut(&cid).ok_or_else(Interrupt::not_found)?;
                merge(customer, body);
                Ok(Reply::empty())
            }
        })
    };

    let remove = {
        let store = Arc::clone(&store);
        Capability::new(move |ctx| {
            let store = Arc::clone(&store);
            async move {
                let cid = ctx.int_param("cid").ok_or_else(Interrupt::server_error)?;
                store
                    .lock()
                    .unwrap()
                    .remove(&cid)
                    .ok_or_else(Interrupt::not_found)?;
                Ok(Reply::empty())
            }
        })
    };

    Router::builder()
        .resource(Resource::builder("customers").post(create).build())
        .resource(
            Resource::builder("customers/{cid:int}")
                .get(show)
                .put(update)
                .delete(remove)
                .build(),
        )
        .build()
        .unwrap()
}

fn merge(target: &mut Value, patch: Value) {
    if let (Value::Object(target), Value::Object(patch)) = (target, patch) {
        for (key, value) in patch {
            target.insert(key, value);
        }
    }
}

fn get(path: &str) -> Request<Empty<Bytes>> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Empty::new())
        .unwrap()
}

fn request(method: &str, path: &str) -> Request<Empty<Bytes>> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Empty::new())
        .unwrap()
}

fn request_json(method: &str, path: &str, body: &Value) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

async fn body_text(response: Response<Full<Bytes>>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn get_extracts_typed_parameters() {
    let store: Store = Arc::default();
    store
        .lock()
        .unwrap()
        .insert(42, serde_json::to_value(test_customer()).unwrap());
    let router = customer_router(Arc::clone(&store));

    let response = router.dispatch(get("/customers/42")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let returned: Customer = serde_json::from_value(body["success"].clone()).unwrap();
    assert_eq!(returned, test_customer());
}

#[tokio::test]
async fn non_numeric_token_misses_the_int_parameter() {
    let router = customer_router(Arc::default());

    let response = router.dispatch(get("/customers/bad")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_answers_created_with_location() {
    let store: Store = Arc::default();
    let router = customer_router(Arc::clone(&store));

    let body = serde_json::to_value(test_customer()).unwrap();
    let response = router.dispatch(request_json("POST", "/customers", &body)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "http://localhost/customers/0"
    );
    assert_eq!(store.lock().unwrap().get(&0).unwrap(), &body);
}

#[tokio::test]
async fn location_uses_the_host_header_verbatim() {
    let router = customer_router(Arc::default());

    let body = serde_json::to_value(test_customer()).unwrap();
    let req = Request::builder()
        .method("POST")
        .uri("/customers")
        .header(header::HOST, "api.example.org:8080")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap();

    let response = router.dispatch(req).await;
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "http://api.example.org:8080/customers/0"
    );
}

#[tokio::test]
async fn location_falls_back_to_the_configured_origin() {
    let update = Capability::new(|_ctx| async move { Ok(Reply::empty()) });
    let create = Capability::with_json_body(|_ctx, _body| async move { Ok(Created::new(7)) });

    let router = Router::builder()
        .origin(Origin::new(Scheme::Https, "api.example.org", 443))
        .resource(
            Resource::builder("things")
                .post(create)
                .put(update)
                .build(),
        )
        .build()
        .unwrap();

    let response = router
        .dispatch(request_json("POST", "/things", &json!({})))
        .await;
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://api.example.org/things/7"
    );
}

#[tokio::test]
async fn put_answers_no_content_when_the_body_is_empty() {
    let store: Store = Arc::default();
    store
        .lock()
        .unwrap()
        .insert(0, serde_json::to_value(test_customer()).unwrap());
    let router = customer_router(Arc::clone(&store));

    let response = router
        .dispatch(request_json("PUT", "/customers/0", &json!({"name": "Dr. Dmitri"})))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(body_text(response).await, "");

    assert_eq!(
        store.lock().unwrap().get(&0).unwrap()["name"],
        json!("Dr. Dmitri")
    );
}

#[tokio::test]
async fn delete_answers_no_content_and_misses_twice() {
    let store: Store = Arc::default();
    store
        .lock()
        .unwrap()
        .insert(0, serde_json::to_value(test_customer()).unwrap());
    let router = customer_router(Arc::clone(&store));

    let response = router.dispatch(request("DELETE", "/customers/0")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router.dispatch(request("DELETE", "/customers/0")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn enveloped_mutations_answer_ok_with_the_envelope() {
    // An enveloped DELETE always renders a non-empty body, so 200.
    let remove = Capability::new(|_ctx| async move { Ok(Reply::json(json!({"message": "Deleted!"}))) })
        .enveloped();

    let router = Router::builder()
        .resource(Resource::builder("products/{pname}").delete(remove).build())
        .build()
        .unwrap();

    let response = router.dispatch(request("DELETE", "/products/socks")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        json!({"success": {"message": "Deleted!"}}).to_string()
    );
}

#[tokio::test]
async fn enveloped_empty_payload_still_answers_ok() {
    let update = Capability::new(|_ctx| async move { Ok(Reply::empty()) }).enveloped();

    let router = Router::builder()
        .resource(Resource::builder("things/{id}").put(update).build())
        .build()
        .unwrap();

    let response = router.dispatch(request("PUT", "/things/a")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, json!({"success": ""}).to_string());
}

#[tokio::test]
async fn method_not_allowed_lists_the_capabilities() {
    let create = Capability::with_json_body(|_ctx, body: Value| async move {
        let name = body["name"].as_str().unwrap_or_default().to_owned();
        Ok(Created::new(name))
    });

    let router = Router::builder()
        .resource(Resource::builder("products").post(create).build())
        .build()
        .unwrap();

    let response = router.dispatch(get("/products")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    assert_eq!(body_text(response).await, "");
}

#[tokio::test]
async fn options_preflight_matches_the_allow_header_of_405() {
    let store: Store = Arc::default();
    let router = customer_router(store);

    let response = router.dispatch(request("OPTIONS", "/customers/3")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers().get(header::ALLOW).unwrap(),
        "GET,PUT,DELETE"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .unwrap(),
        "Content-Type, Accept, Content-Length, Host, Origin, User-Agent, Referer"
    );
    assert_eq!(body_text(response).await, "");

    // The same Allow set for a method outside the table.
    let response = router.dispatch(request("POST", "/customers/3")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.headers().get(header::ALLOW).unwrap(),
        "GET,PUT,DELETE"
    );
}

#[tokio::test]
async fn unknown_methods_answer_method_not_allowed() {
    let router = customer_router(Arc::default());

    let response = router.dispatch(request("PATCH", "/customers/1")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn malformed_json_never_reaches_the_handler() {
    let reached = Arc::new(AtomicBool::new(false));
    let create = {
        let reached = Arc::clone(&reached);
        Capability::with_json_body(move |_ctx, _body| {
            let reached = Arc::clone(&reached);
            async move {
                reached.store(true, Ordering::SeqCst);
                Ok(Created::new(0))
            }
        })
    };

    let router = Router::builder()
        .resource(Resource::builder("customers").post(create).build())
        .build()
        .unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/customers")
        .body(Full::new(Bytes::from_static(
            b"{name : \"Matt\", \"dob_year\" : 1990}",
        )))
        .unwrap();

    let response = router.dispatch(req).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Badly formatted JSON");
    assert!(!reached.load(Ordering::SeqCst));
}

#[tokio::test]
async fn raw_interrupts_pass_through_verbatim() {
    let failing = Capability::new(|_ctx: Context| async move {
        Err::<Reply, _>(
            Interrupt::server_error()
                .with_body("Something went wrong")
                .with_header("error", HeaderValue::from_static("Something went wrong")),
        )
    });

    let router = Router::builder()
        .resource(Resource::builder("fail").get(failing).build())
        .build()
        .unwrap();

    let response = router.dispatch(get("/fail")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get("error").unwrap(),
        "Something went wrong"
    );
    assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    assert_eq!(body_text(response).await, "Something went wrong");
}

#[tokio::test]
async fn enveloped_interrupts_are_rewritten_under_an_error_key() {
    let failing = Capability::new(|_ctx: Context| async move {
        Err::<Reply, _>(
            Interrupt::server_error()
                .with_body("Something went wrong")
                .with_header("error", HeaderValue::from_static("Something went wrong")),
        )
    })
    .enveloped();

    let router = Router::builder()
        .resource(Resource::builder("fail_json").get(failing).build())
        .build()
        .unwrap();

    let response = router.dispatch(get("/fail_json")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get("error").unwrap(),
        "Something went wrong"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(
        body_text(response).await,
        json!({"error": "Something went wrong"}).to_string()
    );
}

#[tokio::test]
async fn nested_resources_share_their_prefix() {
    let versions: Arc<Mutex<HashMap<String, Value>>> = Arc::default();

    let create = {
        let versions = Arc::clone(&versions);
        Capability::with_json_body(move |ctx, body| {
            let versions = Arc::clone(&versions);
            async move {
                let pname = ctx
                    .str_param("pname")
                    .ok_or_else(Interrupt::server_error)?
                    .to_owned();
                let version = body["version"].as_i64().ok_or_else(Interrupt::bad_request)?;
                versions
                    .lock()
                    .unwrap()
                    .insert(format!("{}/{}", pname, version), body.clone());
                Ok(Created::new(version))
            }
        })
    };

    let show = {
        let versions = Arc::clone(&versions);
        Capability::new(move |ctx| {
            let versions = Arc::clone(&versions);
            async move {
                let pname = ctx.str_param("pname").ok_or_else(Interrupt::server_error)?;
                let version = ctx.int_param("version").ok_or_else(Interrupt::server_error)?;
                let versions = versions.lock().unwrap();
                let found = versions
                    .get(&format!("{}/{}", pname, version))
                    .ok_or_else(Interrupt::not_found)?;
                Ok(Reply::json(found.clone()))
            }
        })
        .enveloped()
    };

    let router = Router::builder()
        .resource(
            Resource::builder("products/{pname}/versions")
                .post(create)
                .build(),
        )
        .resource(
            Resource::builder("products/{pname}/versions/{version:int}")
                .get(show)
                .build(),
        )
        .build()
        .unwrap();

    let body = json!({"version": 3, "desc": "Super Cool Version!"});
    let response = router
        .dispatch(request_json("POST", "/products/socks/versions", &body))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "http://localhost/products/socks/versions/3"
    );

    let response = router.dispatch(get("/products/socks/versions/3")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let parsed: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(parsed["success"], body);

    // An unmatched tail under the shared prefix misses.
    let response = router.dispatch(get("/products/socks/anyone")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn literal_children_win_over_parameters() {
    let by_id = Capability::new(|ctx: Context| async move {
        Ok(Reply::text(format!(
            "order {}",
            ctx.int_param("oid").unwrap_or(-1)
        )))
    });
    let special = Capability::new(|_ctx| async move { Ok(Reply::text("the special one")) });

    let router = Router::builder()
        .resource(Resource::builder("orders/{oid:int}").get(by_id).build())
        .resource(Resource::builder("orders/5").get(special).build())
        .build()
        .unwrap();

    let response = router.dispatch(get("/orders/5")).await;
    assert_eq!(body_text(response).await, "the special one");

    let response = router.dispatch(get("/orders/6")).await;
    assert_eq!(body_text(response).await, "order 6");
}

#[tokio::test]
async fn unmatched_paths_answer_not_found() {
    let router = customer_router(Arc::default());

    assert_eq!(
        router.dispatch(get("/unknown")).await.status(),
        StatusCode::NOT_FOUND
    );
    // Trailing slashes address a different (unbound) node.
    assert_eq!(
        router.dispatch(get("/customers/1/")).await.status(),
        StatusCode::NOT_FOUND
    );

    // A node that only exists as a shared prefix carries no binding.
    let deep = Capability::new(|_ctx: Context| async move { Ok(Reply::empty()) });
    let router = Router::builder()
        .resource(Resource::builder("a/b").get(deep).build())
        .build()
        .unwrap();
    assert_eq!(router.dispatch(get("/a")).await.status(), StatusCode::NOT_FOUND);
    // GET always answers 200, even with an empty body.
    assert_eq!(router.dispatch(get("/a/b")).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn root_resource_is_addressable() {
    let home = Capability::new(|_ctx| async move { Ok(Reply::text("home")) });

    let router = Router::builder()
        .resource(Resource::builder("").get(home).build())
        .build()
        .unwrap();

    let response = router.dispatch(get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "home");
}

#[test]
fn bad_templates_fail_the_build() {
    let broken = Resource::builder("customers/{cid").build();
    assert!(Router::builder().resource(broken).build().is_err());

    let nameless = Resource::builder("customers/{}").build();
    assert!(Router::builder().resource(nameless).build().is_err());
}
