//! Exchange-level error taxonomy shared across the pipeline.
//!
//! Every failure carries a stable machine-readable code (see [`Error::code`]) alongside its
//! human-readable message, so callers can branch on the taxonomy without parsing message text.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Structured JSON deserialization failure with the path that failed to parse.
pub type JsonParseError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical exchange error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// One or more required credential fields were absent.
	///
	/// The listed names use the caller-facing spelling and always appear in the fixed
	/// order `clientId, technicalAccountId, orgId, clientSecret, privateKey, metaScopes`.
	#[error("Required parameter(s) {} are missing", .fields.join(", "))]
	MissingParams {
		/// Names of every missing field, in declaration order.
		fields: Vec<&'static str>,
	},
	/// The signing capability rejected the key material or claims.
	#[error("Failed to sign the exchange assertion: {detail}")]
	SignFailed {
		/// Signer-supplied failure description.
		detail: String,
	},
	/// The transport could not complete the HTTP exchange.
	#[error("Request failed while swapping the jwt token. {detail}")]
	RequestFailed {
		/// Description of the underlying transport failure.
		detail: String,
	},
	/// The HTTP exchange completed but the body was neither a usable success nor a
	/// structured provider error.
	#[error("Unexpected response received while swapping the jwt token. The response body is as follows: {body}")]
	InvalidResponseBody {
		/// The response body exactly as received.
		body: String,
		/// JSON deserialization failure, when the body was not valid JSON at all.
		source: Option<JsonParseError>,
	},
	/// The exchange endpoint returned a structured error of its own.
	#[error("{description}")]
	Provider {
		/// Provider-issued error code, passed through verbatim.
		code: String,
		/// Provider-issued error description, passed through verbatim.
		description: String,
	},
}
impl Error {
	/// Returns the stable machine-readable code for this failure.
	///
	/// Provider errors surface the provider’s own code verbatim; every other variant maps to
	/// one of `missing_params`, `sign_failed`, `request_failed`, `invalid_response_body`.
	pub fn code(&self) -> &str {
		match self {
			Self::MissingParams { .. } => "missing_params",
			Self::SignFailed { .. } => "sign_failed",
			Self::RequestFailed { .. } => "request_failed",
			Self::InvalidResponseBody { .. } => "invalid_response_body",
			Self::Provider { code, .. } => code,
		}
	}

	/// Wraps a signer failure description inside [`Error::SignFailed`].
	pub fn sign_failed(detail: impl Display) -> Self {
		Self::SignFailed { detail: detail.to_string() }
	}

	/// Wraps a transport failure description inside [`Error::RequestFailed`].
	pub fn request_failed(detail: impl Display) -> Self {
		Self::RequestFailed { detail: detail.to_string() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn codes_stay_stable() {
		assert_eq!(Error::MissingParams { fields: vec!["clientId"] }.code(), "missing_params");
		assert_eq!(Error::sign_failed("bad key").code(), "sign_failed");
		assert_eq!(Error::request_failed("refused").code(), "request_failed");
		assert_eq!(
			Error::InvalidResponseBody { body: "{}".into(), source: None }.code(),
			"invalid_response_body",
		);
		assert_eq!(
			Error::Provider { code: "my_error_code".into(), description: "desc".into() }.code(),
			"my_error_code",
		);
	}

	#[test]
	fn missing_params_message_joins_fields_in_order() {
		let err = Error::MissingParams { fields: vec!["clientId", "orgId", "metaScopes"] };

		assert_eq!(err.to_string(), "Required parameter(s) clientId, orgId, metaScopes are missing");
	}

	#[test]
	fn failure_messages_embed_detail() {
		assert_eq!(
			Error::request_failed("500 error from server.").to_string(),
			"Request failed while swapping the jwt token. 500 error from server.",
		);
		assert_eq!(
			Error::InvalidResponseBody { body: "{\"foo\":\"bar\"}".into(), source: None }
				.to_string(),
			"Unexpected response received while swapping the jwt token. The response body is as follows: {\"foo\":\"bar\"}",
		);
		assert_eq!(
			Error::Provider { code: "my_error_code".into(), description: "Customer issue.".into() }
				.to_string(),
			"Customer issue.",
		);
	}
}
