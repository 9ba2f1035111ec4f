use hyper::HeaderMap;
use hyper::StatusCode;
use hyper::header::{HeaderValue, IntoHeaderName};
use std::fmt::{self, Display, Formatter};

/// The closed set of interrupt kinds. Each kind fixes the status line of
/// the response it turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    NotFound,
    BadRequest,
    Unauthorised,
    Forbidden,
    Conflict,
    ServerError,
}

impl InterruptKind {
    pub fn status(self) -> StatusCode {
        match self {
            InterruptKind::NotFound => StatusCode::NOT_FOUND,
            InterruptKind::BadRequest => StatusCode::BAD_REQUEST,
            InterruptKind::Unauthorised => StatusCode::UNAUTHORIZED,
            InterruptKind::Forbidden => StatusCode::FORBIDDEN,
            InterruptKind::Conflict => StatusCode::CONFLICT,
            InterruptKind::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A propagating abort signal carrying an HTTP status, a header set and a
/// body.
///
/// Raising one anywhere during dispatch, including inside a capability
/// handler, short-circuits all remaining dispatch steps; the dispatch
/// boundary converts it verbatim into the response. Handlers return
/// `Result<_, Interrupt>` so `?` gives the short-circuit:
///
/// ```
/// use restrie::{Context, Interrupt, Reply};
///
/// async fn show(ctx: Context) -> Result<Reply, Interrupt> {
///     let id = ctx.int_param("id").ok_or_else(Interrupt::not_found)?;
///     if id != 1 {
///         return Err(Interrupt::not_found());
///     }
///     Ok(Reply::text("the one and only"))
/// }
/// ```
#[derive(Debug)]
pub struct Interrupt {
    kind: InterruptKind,
    headers: HeaderMap,
    body: String,
}

impl Interrupt {
    pub fn new(kind: InterruptKind) -> Interrupt {
        Interrupt {
            kind,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    /// A 404 interrupt: no route matched, or the addressed entity does not
    /// exist.
    pub fn not_found() -> Interrupt {
        Interrupt::new(InterruptKind::NotFound)
    }

    /// A 400 interrupt, e.g. for a request body that fails to parse.
    pub fn bad_request() -> Interrupt {
        Interrupt::new(InterruptKind::BadRequest)
    }

    pub fn unauthorised() -> Interrupt {
        Interrupt::new(InterruptKind::Unauthorised)
    }

    pub fn forbidden() -> Interrupt {
        Interrupt::new(InterruptKind::Forbidden)
    }

    pub fn conflict() -> Interrupt {
        Interrupt::new(InterruptKind::Conflict)
    }

    pub fn server_error() -> Interrupt {
        Interrupt::new(InterruptKind::ServerError)
    }

    pub fn with_body<B: Into<String>>(mut self, body: B) -> Interrupt {
        self.body = body.into();
        self
    }

    pub fn with_header<N: IntoHeaderName>(mut self, name: N, value: HeaderValue) -> Interrupt {
        self.headers.insert(name, value);
        self
    }

    pub fn kind(&self) -> InterruptKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Headers stay mutable up to the point the interrupt is converted into
    /// a response.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub(crate) fn set_body(&mut self, body: String) {
        self.body = body;
    }

    pub(crate) fn into_parts(self) -> (StatusCode, HeaderMap, String) {
        (self.kind.status(), self.headers, self.body)
    }
}

impl Display for Interrupt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "{}", self.status())
        } else {
            write!(f, "{}: {}", self.status(), self.body)
        }
    }
}

impl std::error::Error for Interrupt {}
