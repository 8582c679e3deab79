//! Base URL + transport pair.
//!
//! [`ApiClient`] binds any [`HttpClientStreaming`] to a base URL, so request
//! records can be sent without repeating either.

use bytes::Bytes;

use crate::{
    Error, GenerateError, HttpClientStreaming, HttpRequest, Request, ResponseTarget, Result,
    execute_with, generate,
};

/// A transport bound to a base URL.
///
/// Useful for sharing a single HTTP client (with its connection pool and
/// middleware) across several services.
///
/// # Example
///
/// ```ignore
/// use wirecall::{ApiClient, HyperClient};
///
/// let http = HyperClient::builder().with_logging().build();
///
/// let users = ApiClient::new(http.clone(), "https://users.example.com")?;
/// let billing = ApiClient::new(http, "https://billing.example.com/api")?;
///
/// let mut user = User::default();
/// users.call(&GetUser { id: 42 }, Some(&mut user)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient<C> {
    client: C,
    base_url: String,
}

impl<C> ApiClient<C> {
    /// Create a new API client with the given base URL.
    ///
    /// The base URL is joined with each record's path template as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed.
    pub fn new(client: C, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        url::Url::parse(&base_url).map_err(|err| Error::invalid_url(&base_url, err))?;
        Ok(Self { client, base_url })
    }

    /// Base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get a reference to the inner HTTP client.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.client
    }

    /// Consume the wrapper and return the inner HTTP client.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }

    /// Build the request for `record` against the base URL.
    ///
    /// # Errors
    ///
    /// See [`generate`].
    pub fn generate<R: HttpRequest>(
        &self,
        record: &R,
    ) -> std::result::Result<Request<Bytes>, GenerateError> {
        generate(&self.base_url, Some(record))
    }
}

impl<C: HttpClientStreaming> ApiClient<C> {
    /// Send `record` and fill `target` from the response.
    ///
    /// # Errors
    ///
    /// Generation and execution errors.
    pub async fn call<R, T>(&self, record: &R, target: Option<&mut T>) -> Result<()>
    where
        R: HttpRequest,
        T: ResponseTarget + ?Sized,
    {
        let request = self.generate(record)?;
        execute_with(&self.client, request, target).await
    }

    /// Send an already generated request.
    ///
    /// # Errors
    ///
    /// See [`execute_with`].
    pub async fn send<T>(&self, request: Request<Bytes>, target: Option<&mut T>) -> Result<()>
    where
        T: ResponseTarget + ?Sized,
    {
        execute_with(&self.client, request, target).await
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::HyperClient;

    #[test]
    fn api_client_new() {
        let_assert!(Ok(client) = ApiClient::new(HyperClient::new(), "https://api.example.com"));
        check!(client.base_url() == "https://api.example.com");
    }

    #[test]
    fn api_client_invalid_url() {
        let_assert!(Err(err) = ApiClient::new(HyperClient::new(), "not a url"));
        check!(err.to_string().contains("attempted url: not a url"));
    }
}
