//! The JWT-bearer exchange pipeline.
//!
//! One linear flow per call: validate credentials, normalize scopes, build claims, sign,
//! POST the assertion, interpret the response. No step is retried, nothing persists
//! between invocations, and concurrent calls are fully independent.

// self
use crate::{
	_prelude::*,
	claims::{self, ClaimSet},
	credentials::Credentials,
	http::{ExchangeResponse, TokenHttpClient},
	obs::{self, ExchangeOutcome, ExchangeSpan},
	sign::AssertionSigner,
};
#[cfg(feature = "reqwest")] use crate::{http::ReqwestHttpClient, sign::Rs256Signer};

#[cfg(feature = "reqwest")]
/// Exchanger specialized for the crate's default reqwest transport and RS256 signer.
pub type ReqwestExchanger = Exchanger<ReqwestHttpClient, Rs256Signer>;

/// Provider success payload, passed through verbatim.
///
/// The only shape guarantee is a non-empty `access_token` string, checked before
/// construction; everything else in the body is provider-defined and preserved as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenResponse(JsonMap<String, JsonValue>);
impl TokenResponse {
	/// Returns the bearer access token.
	pub fn access_token(&self) -> &str {
		// Present and non-empty by construction; the pipeline only builds a
		// `TokenResponse` after checking the field.
		self.0.get("access_token").and_then(JsonValue::as_str).unwrap_or_default()
	}

	/// Returns the `expires_in` measure in seconds, when the provider supplied one.
	pub fn expires_in(&self) -> Option<u64> {
		self.0.get("expires_in").and_then(JsonValue::as_u64)
	}

	/// Returns the `token_type` field, when the provider supplied one.
	pub fn token_type(&self) -> Option<&str> {
		self.0.get("token_type").and_then(JsonValue::as_str)
	}

	/// Returns the full response object exactly as the provider sent it.
	pub fn raw(&self) -> &JsonMap<String, JsonValue> {
		&self.0
	}

	/// Consumes the response, yielding the raw provider object.
	pub fn into_raw(self) -> JsonMap<String, JsonValue> {
		self.0
	}
}

/// Performs JWT-bearer exchanges against an identity provider.
///
/// The exchanger owns the transport and signer capabilities so [`exchange`](Self::exchange)
/// can focus on the claim/response logic. It holds no per-call state; a single instance is
/// safe to share across concurrent calls.
pub struct Exchanger<C, S>
where
	C: ?Sized + TokenHttpClient,
	S: ?Sized + AssertionSigner,
{
	/// HTTP client used for the outbound exchange request.
	pub http_client: Arc<C>,
	/// Signer that produces the JWT-bearer assertion.
	pub signer: Arc<S>,
}
impl<C, S> Exchanger<C, S>
where
	C: ?Sized + TokenHttpClient,
	S: ?Sized + AssertionSigner,
{
	/// Creates an exchanger from a caller-provided transport + signer pair.
	pub fn with_parts(http_client: impl Into<Arc<C>>, signer: impl Into<Arc<S>>) -> Self {
		Self { http_client: http_client.into(), signer: signer.into() }
	}

	/// Exchanges service-account credentials for a bearer access token.
	///
	/// Single attempt, no retries; every failure surfaces as a classified [`Error`] and the
	/// caller alone decides whether to try again.
	pub async fn exchange(&self, credentials: &Credentials) -> Result<TokenResponse> {
		let span = ExchangeSpan::new("exchange");

		obs::record_exchange_outcome(ExchangeOutcome::Attempt);

		let result = span.instrument(self.run(credentials)).await;

		match &result {
			Ok(_) => obs::record_exchange_outcome(ExchangeOutcome::Success),
			Err(_) => obs::record_exchange_outcome(ExchangeOutcome::Failure),
		}

		result
	}

	async fn run(&self, credentials: &Credentials) -> Result<TokenResponse> {
		credentials.validate()?;

		let scopes = credentials.meta_scopes.resolve();
		let claims = ClaimSet::new(credentials, &scopes);
		let assertion = self.signer.sign(&claims, &credentials.key_material())?;
		let endpoint = exchange_endpoint(&credentials.ims)?;
		let form = [
			("client_id", credentials.client_id.as_str()),
			("client_secret", credentials.client_secret.expose()),
			("jwt_token", assertion.as_str()),
		];
		let response = self
			.http_client
			.post_form(&endpoint, &form)
			.await
			.map_err(Error::request_failed)?;

		interpret_response(response)
	}
}
impl<C, S> Clone for Exchanger<C, S>
where
	C: ?Sized + TokenHttpClient,
	S: ?Sized + AssertionSigner,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), signer: self.signer.clone() }
	}
}
impl<C, S> Debug for Exchanger<C, S>
where
	C: ?Sized + TokenHttpClient,
	S: ?Sized + AssertionSigner,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Exchanger").finish_non_exhaustive()
	}
}
#[cfg(feature = "reqwest")]
impl Exchanger<ReqwestHttpClient, Rs256Signer> {
	/// Creates an exchanger backed by the default reqwest transport and RS256 signer.
	pub fn new() -> Self {
		Self::with_parts(ReqwestHttpClient::default(), Rs256Signer)
	}
}
#[cfg(feature = "reqwest")]
impl Default for Exchanger<ReqwestHttpClient, Rs256Signer> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(feature = "reqwest")]
/// Performs one exchange with the default reqwest transport and RS256 signer.
///
/// This is the single-call convenience surface; construct an [`Exchanger`] instead to
/// reuse a transport or plug in custom capabilities.
pub async fn exchange(credentials: &Credentials) -> Result<TokenResponse> {
	ReqwestExchanger::new().exchange(credentials).await
}

/// Derives the token-endpoint URL from an identity-management base.
pub fn exchange_endpoint(ims: &Url) -> Result<Url> {
	let raw = format!("{}/ims/exchange/jwt/", claims::ims_base(ims));

	Url::parse(&raw).map_err(Error::request_failed)
}

/// Interprets the provider's HTTP answer as a success payload or a classified failure.
///
/// The branch order is load-bearing: the HTTP-success flag gates only the success branch,
/// so a provider that answers 200 with an `error`/`error_description` body (and no access
/// token) still fails with its own error code.
fn interpret_response(response: ExchangeResponse) -> Result<TokenResponse> {
	let raw = String::from_utf8_lossy(&response.body).into_owned();
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
	let body: JsonValue = match serde_path_to_error::deserialize(&mut deserializer) {
		Ok(value) => value,
		Err(source) =>
			return Err(Error::InvalidResponseBody { body: raw, source: Some(source) }),
	};
	let object = match body {
		JsonValue::Object(object) => object,
		_ => return Err(Error::InvalidResponseBody { body: raw, source: None }),
	};

	if response.http_ok && has_access_token(&object) {
		return Ok(TokenResponse(object));
	}
	if let (Some(code), Some(description)) = (
		object.get("error").and_then(JsonValue::as_str),
		object.get("error_description").and_then(JsonValue::as_str),
	) {
		return Err(Error::Provider { code: code.to_owned(), description: description.to_owned() });
	}

	Err(Error::InvalidResponseBody { body: raw, source: None })
}

fn has_access_token(object: &JsonMap<String, JsonValue>) -> bool {
	object.get("access_token").and_then(JsonValue::as_str).is_some_and(|token| !token.is_empty())
}
