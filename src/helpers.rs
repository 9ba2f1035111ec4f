use crate::Error;
use std::str::Split;

pub(crate) fn percent_decode_request_path(val: &str) -> crate::Result<String> {
    percent_encoding::percent_decode_str(val)
        .decode_utf8()
        .map_err(|e| Error::new(format!("Invalid percent encoding in request path: {}", e)))
        .map(|val| val.to_string())
}

/// Splits a request path or route template into its `/`-separated tokens.
///
/// At most one leading slash is dropped first, so `"/customers"` and
/// `"customers"` tokenize identically. An empty remainder yields a single
/// empty token, which is how a root-level route is addressed.
pub(crate) fn path_tokens(path: &str) -> Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}
