//! External references the platform stores but never dereferences itself.

use std::fmt;
use std::str::FromStr;

const AUTH0_PREFIX: &str = "auth0|";
const CONNECT_ACCOUNT_PREFIX: &str = "acct_";

/// Identity-provider subject, e.g. `auth0|64b1f…`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity(String);

impl FromStr for ExternalIdentity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.strip_prefix(AUTH0_PREFIX) {
            Some(rest) if !rest.is_empty() => Ok(Self(value.to_string())),
            _ => Err("Invalid auth0_id format. Should start with 'auth0|'".into()),
        }
    }
}

/// Payout account on the payment provider, e.g. `acct_1Nv…`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectAccountId(String);

impl FromStr for ConnectAccountId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.strip_prefix(CONNECT_ACCOUNT_PREFIX) {
            Some(rest) if !rest.is_empty() => Ok(Self(value.to_string())),
            _ => Err("Invalid Stripe account ID format. Should start with 'acct_'".into()),
        }
    }
}

impl AsRef<str> for ExternalIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ConnectAccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
