pub(crate) const MIME_JSON: &str = "application/json";

/// Value of the `Access-Control-Allow-Headers` header on every OPTIONS
/// response.
pub(crate) const CORS_ALLOW_HEADERS: &str =
    "Content-Type, Accept, Content-Length, Host, Origin, User-Agent, Referer";

/// Body of the 400 response produced when a JSON-expecting capability
/// receives a body that does not parse.
pub(crate) const MALFORMED_JSON_BODY: &str = "Badly formatted JSON";
