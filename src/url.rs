use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Escapes everything outside unreserved characters and `/`.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub(crate) fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// Where the router is reachable, used to reconstruct absolute URLs for
/// `Location` headers.
///
/// The configured server name and port only appear in a URL when the
/// request carries no `Host` header; the port is suppressed when it is the
/// scheme's default. An optional mount prefix is prepended to the request
/// path when the router serves a sub-tree of a larger application.
#[derive(Debug, Clone)]
pub struct Origin {
    pub(crate) scheme: Scheme,
    pub(crate) server_name: String,
    pub(crate) port: u16,
    pub(crate) prefix: String,
}

impl Origin {
    pub fn new<S: Into<String>>(scheme: Scheme, server_name: S, port: u16) -> Origin {
        Origin {
            scheme,
            server_name: server_name.into(),
            port,
            prefix: String::new(),
        }
    }

    /// Mount prefix prepended (percent-encoded) to the request path.
    pub fn with_prefix<P: Into<String>>(mut self, prefix: P) -> Origin {
        self.prefix = prefix.into();
        self
    }
}

impl Default for Origin {
    fn default() -> Origin {
        Origin::new(Scheme::Http, "localhost", 80)
    }
}

/// Reconstructs the absolute URL of the current request:
/// `scheme://authority` + percent-encoded prefix and path, plus `/id` when
/// a created identifier is supplied.
pub(crate) fn canonical_url(
    origin: &Origin,
    host: Option<&str>,
    path: &str,
    add_id: Option<&str>,
) -> String {
    let mut url = String::from(origin.scheme.as_str());
    url.push_str("://");

    match host {
        Some(host) => url.push_str(host),
        None => {
            url.push_str(&origin.server_name);
            if origin.port != origin.scheme.default_port() {
                url.push(':');
                url.push_str(&origin.port.to_string());
            }
        }
    }

    url.push_str(&utf8_percent_encode(&origin.prefix, PATH_ENCODE_SET).to_string());
    url.push_str(&utf8_percent_encode(path, PATH_ENCODE_SET).to_string());

    if let Some(id) = add_id {
        url.push('/');
        url.push_str(id);
    }

    url
}
