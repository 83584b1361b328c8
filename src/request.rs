//! Incoming HTTP request type.

use bytes::Bytes;

use crate::method::Method;

/// An incoming HTTP request with its body fully read.
///
/// Routes carry no path parameters: the fixed routes need none, and the
/// recipe dispatcher reads its id from [`Request::path`] itself.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Bytes,
}

impl Request {
    /// The server builds requests itself; this is for driving handlers
    /// directly, as tests do.
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            path: path.into(),
            body: body.into(),
        }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn body(&self) -> &[u8] { &self.body }
}
