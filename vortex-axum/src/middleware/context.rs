use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, Method, Uri},
};

/// The slice of an inbound request handed to host-supplied hooks: method,
/// URI and headers. Bodies are never exposed to hooks.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RequestContext {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Bearer token from the Authorization header, if any. Most identity
    /// resolvers start here.
    pub fn bearer_token(&self) -> Option<&str> {
        self.header(header::AUTHORIZATION.as_str())?
            .strip_prefix("Bearer ")
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn context_with_auth(value: &str) -> RequestContext {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        RequestContext {
            method: Method::GET,
            uri: Uri::from_static("/invitations"),
            headers,
        }
    }

    #[test]
    fn bearer_token_strips_scheme() {
        assert_eq!(context_with_auth("Bearer abc123").bearer_token(), Some("abc123"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        assert_eq!(context_with_auth("Basic abc123").bearer_token(), None);
    }
}
