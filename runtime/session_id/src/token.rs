use std::fmt;

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
/// A freshly minted session token.
///
/// # Format
///
/// A token is rendered as 32 lowercase hexadecimal characters, without separators
/// (e.g. `5f0c7e3ba1e24a4f9d5e3a1c2b7d8e90`).
/// It's the "simple" representation of a random (v4) UUID.
///
/// Tokens coming from the client are never parsed into a [`SessionToken`]:
/// whatever value the session cookie holds is reused verbatim.
pub struct SessionToken(uuid::Uuid);

impl SessionToken {
    /// Generate a new random token using the random number generator
    /// provided by the underlying operating system.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse a token out of its canonical representation.
    ///
    /// Only the exact format produced by [`SessionToken::random`] is accepted:
    /// 32 lowercase hexadecimal characters.
    pub fn parse(s: &str) -> Result<Self, InvalidSessionToken> {
        let is_canonical = s.len() == 32
            && s
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !is_canonical {
            return Err(InvalidSessionToken {
                raw: s.to_owned(),
            });
        }
        uuid::Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| InvalidSessionToken { raw: s.to_owned() })
    }

    /// Access the underlying UUID.
    pub fn inner(&self) -> uuid::Uuid {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl From<SessionToken> for String {
    fn from(value: SessionToken) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for SessionToken {
    type Error = InvalidSessionToken;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("`{raw}` is not a valid session token. Expected 32 lowercase hexadecimal characters.")]
/// The error returned by [`SessionToken::parse`].
pub struct InvalidSessionToken {
    /// The string that failed to parse.
    pub raw: String,
}
