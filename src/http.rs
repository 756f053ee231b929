//! Transport primitives for the exchange request.
//!
//! [`TokenHttpClient`] is the exchanger's only dependency on an HTTP stack: one
//! form-encoded POST that resolves to an [`ExchangeResponse`] once the provider produced
//! any HTTP answer. Transport-level failures stay typed as the implementation's own error
//! and are re-classified by the exchanger; implementations never interpret response bodies.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

/// Boxed future returned by [`TokenHttpClient::post_form`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<ExchangeResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of submitting the exchange request.
///
/// Implementations must be `Send + Sync + 'static` so an exchanger can be shared across
/// tasks without additional wrappers, and the returned future must be `Send` for the
/// lifetime of the in-flight request. No timeout is imposed here; transports bring their
/// own policy.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Submits `form` to `url` as an `application/x-www-form-urlencoded` POST.
	///
	/// Resolves with [`ExchangeResponse`] whenever the provider answered at the HTTP
	/// level, regardless of status code; fails only when no response could be obtained.
	fn post_form<'a>(
		&'a self,
		url: &'a Url,
		form: &'a [(&'static str, &'a str)],
	) -> TransportFuture<'a, Self::TransportError>;
}

/// Raw HTTP outcome captured by a transport implementation.
#[derive(Clone, Debug)]
pub struct ExchangeResponse {
	/// Whether the provider answered with a success status.
	pub http_ok: bool,
	/// HTTP status code.
	pub status: u16,
	/// Response body exactly as received.
	pub body: Vec<u8>,
}
impl ExchangeResponse {
	/// Builds a response, deriving [`http_ok`](Self::http_ok) from the status code.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { http_ok: (200..300).contains(&status), status, body: body.into() }
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The exchange request must not follow redirects into a different token endpoint, so a
/// custom [`ReqwestClient`] passed through [`with_client`](Self::with_client) should keep
/// redirect following disabled.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn post_form<'a>(
		&'a self,
		url: &'a Url,
		form: &'a [(&'static str, &'a str)],
	) -> TransportFuture<'a, Self::TransportError> {
		Box::pin(async move {
			let response = self.0.post(url.clone()).form(form).send().await?;
			let status = response.status();
			let body = response.bytes().await?.to_vec();

			Ok(ExchangeResponse { http_ok: status.is_success(), status: status.as_u16(), body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn http_ok_tracks_the_success_range() {
		assert!(ExchangeResponse::new(200, "{}").http_ok);
		assert!(ExchangeResponse::new(299, "{}").http_ok);
		assert!(!ExchangeResponse::new(199, "{}").http_ok);
		assert!(!ExchangeResponse::new(400, "{}").http_ok);
		assert!(!ExchangeResponse::new(500, "{}").http_ok);
	}
}
