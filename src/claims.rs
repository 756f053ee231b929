//! Assertion claim-set construction and meta-scope qualification.

// self
use crate::{_prelude::*, credentials::Credentials};

/// Lifetime of a signed assertion, measured from claim-construction time.
///
/// Bearer assertions are one-shot credentials; five minutes comfortably covers clock skew
/// plus one network round trip.
pub const ASSERTION_TTL: Duration = Duration::seconds(300);

/// Claim set signed into one exchange assertion.
///
/// Built fresh for every call and discarded after signing. Scope claims are flattened into
/// the top-level JSON object as boolean `true` entries, alongside the reserved
/// `exp`/`iss`/`sub`/`aud` keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimSet {
	/// Expiry as unix seconds, [`ASSERTION_TTL`] from construction time.
	pub exp: i64,
	/// Issuer: the organization identifier.
	pub iss: String,
	/// Subject: the technical-account identifier.
	pub sub: String,
	/// Audience: `{ims}/c/{clientId}`.
	pub aud: String,
	/// Fully-qualified scope claims, each mapped to `true`.
	#[serde(flatten)]
	pub scopes: BTreeMap<String, bool>,
}
impl ClaimSet {
	/// Builds the claim set for `credentials`, qualifying every resolved meta-scope.
	pub fn new(credentials: &Credentials, scopes: &[String]) -> Self {
		let expires_at = OffsetDateTime::now_utc() + ASSERTION_TTL;
		let scopes = scopes
			.iter()
			.map(|scope| (qualify_scope(&credentials.ims, scope), true))
			.collect();

		Self {
			exp: expires_at.unix_timestamp(),
			iss: credentials.org_id.clone(),
			sub: credentials.technical_account_id.clone(),
			aud: audience(&credentials.ims, &credentials.client_id),
			scopes,
		}
	}

	/// Returns true if the claim set carries the given fully-qualified scope claim.
	pub fn contains_scope(&self, scope: &str) -> bool {
		self.scopes.get(scope).copied().unwrap_or(false)
	}
}

/// Qualifies a meta-scope into its claim key.
///
/// Scopes already containing the substring `https` are treated as fully-qualified URIs and
/// used verbatim; everything else is prefixed as `{ims}/s/{scope}`.
pub fn qualify_scope(ims: &Url, scope: &str) -> String {
	if scope.contains("https") {
		scope.to_owned()
	} else {
		format!("{}/s/{scope}", ims_base(ims))
	}
}

/// Derives the `aud` claim for a client against an identity-management base.
pub fn audience(ims: &Url, client_id: &str) -> String {
	format!("{}/c/{client_id}", ims_base(ims))
}

/// Base URL view without the trailing slash `Url` normalization appends.
pub(crate) fn ims_base(ims: &Url) -> &str {
	ims.as_str().trim_end_matches('/')
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::credentials::MetaScopes;

	fn credentials(meta_scopes: MetaScopes) -> Credentials {
		Credentials::new(
			"client-1234",
			"tech@techacct.adobe.com",
			"org@AdobeOrg",
			"secret",
			"pem",
			meta_scopes,
		)
	}

	#[test]
	fn unqualified_scopes_gain_the_ims_prefix() {
		let credentials = credentials(MetaScopes::csv("scope_a,scope_b"));
		let scopes = credentials.meta_scopes.resolve();
		let claims = ClaimSet::new(&credentials, &scopes);

		assert!(claims.contains_scope("https://ims-na1.adobelogin.com/s/scope_a"));
		assert!(claims.contains_scope("https://ims-na1.adobelogin.com/s/scope_b"));
	}

	#[test]
	fn qualified_scopes_pass_through_verbatim() {
		let scope = "https://ims-na1.adobelogin.com/s/ent_dataservices_sdk";
		let credentials = credentials(MetaScopes::list([scope]));
		let scopes = credentials.meta_scopes.resolve();
		let claims = ClaimSet::new(&credentials, &scopes);

		assert!(claims.contains_scope(scope));
		assert_eq!(claims.scopes.len(), 1);
	}

	#[test]
	fn reserved_claims_derive_from_credentials() {
		let credentials = credentials(MetaScopes::csv("scope_a"));
		let before = OffsetDateTime::now_utc().unix_timestamp();
		let claims = ClaimSet::new(&credentials, &credentials.meta_scopes.resolve());
		let after = OffsetDateTime::now_utc().unix_timestamp();

		assert_eq!(claims.iss, "org@AdobeOrg");
		assert_eq!(claims.sub, "tech@techacct.adobe.com");
		assert_eq!(claims.aud, "https://ims-na1.adobelogin.com/c/client-1234");
		assert!(claims.exp >= before + 300 && claims.exp <= after + 300);
	}

	#[test]
	fn scope_claims_flatten_into_the_top_level_object() {
		let credentials = credentials(MetaScopes::csv("scope_a"));
		let claims = ClaimSet::new(&credentials, &credentials.meta_scopes.resolve());
		let value = serde_json::to_value(&claims).expect("Claim set should serialize.");

		assert_eq!(value["aud"], "https://ims-na1.adobelogin.com/c/client-1234");
		assert_eq!(value["https://ims-na1.adobelogin.com/s/scope_a"], true);
	}

	#[test]
	fn audience_handles_custom_ims_bases() {
		let ims = Url::parse("https://ims.example.com/tenant/").expect("IMS fixture should parse.");

		assert_eq!(audience(&ims, "abc"), "https://ims.example.com/tenant/c/abc");
		assert_eq!(qualify_scope(&ims, "scope"), "https://ims.example.com/tenant/s/scope");
	}
}
