//! Rust’s turnkey JWT-bearer token exchange—build signed service-account assertions, swap them
//! for bearer tokens, and surface provider failures as one stable taxonomy.
//!
//! The crate performs a single, self-contained operation: it validates service-account
//! credentials, derives scope claims, signs an RS256 assertion, POSTs it to the provider’s
//! exchange endpoint, and interprets the JSON response as either the provider’s raw success
//! payload or a classified [`error::Error`]. There is no token cache, no retry policy, and no
//! state shared between calls; the caller owns all of those decisions.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod claims;
pub mod credentials;
pub mod error;
pub mod exchange;
pub mod http;
pub mod obs;
pub mod sign;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
