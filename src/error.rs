//! Error types shared by every gateway operation.

/// Which piece of credential material failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    SigningKey,
    IdentityCertificate,
    VerificationCertificate,
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CredentialKind::SigningKey => "signing key",
            CredentialKind::IdentityCertificate => "identity certificate",
            CredentialKind::VerificationCertificate => "verification certificate",
        })
    }
}

/// Errors that can occur while building, sending or verifying gateway messages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A field marked as required was absent or empty. Nothing was sent.
    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    /// The same field name appeared twice in one field list.
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    #[error("field names must not be empty")]
    EmptyFieldName,

    /// The request could not be delivered, or the gateway answered with a
    /// status other than 200.
    #[error("transport error calling {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The signature over inbound data did not verify. The payload must be
    /// discarded.
    #[error("invalid signature")]
    InvalidSignature,

    #[error("callback carried no fields")]
    EmptyCallback,

    /// Transport and signature checks passed but the gateway refused the
    /// transaction.
    #[error("gateway rejected the transaction: [{code}] {message}")]
    GatewayRejected { code: String, message: String },

    #[error("unable to load {kind}: {reason}")]
    Credential { kind: CredentialKind, reason: String },

    #[error("unable to sign request: {0}")]
    Signing(#[from] rsa::Error),

    #[error("unable to decode form data: {0}")]
    FormDecode(#[from] serde_urlencoded::de::Error),

    #[error("unable to encode form data: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn credential(kind: CredentialKind, reason: impl std::fmt::Display) -> Self {
        Error::Credential {
            kind,
            reason: reason.to_string(),
        }
    }

    /// Whether this error came from the gateway's business response code
    /// rather than from transport or signature handling.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::GatewayRejected { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
