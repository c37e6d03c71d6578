//! Merchant and gateway key material.
//!
//! Three distinct pieces are loaded once and never change:
//! - the merchant's RSA signing key (PEM `RSA PRIVATE KEY`, PKCS#1),
//! - the merchant's identity certificate, whose serial number is sent as `certId`,
//! - the gateway's verification certificate, whose RSA public key checks every
//!   inbound signature.

use std::path::{Path, PathBuf};

use rsa::{pkcs1::DecodeRsaPrivateKey, pkcs8::DecodePublicKey, BigUint, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use x509_cert::{
    der::{Decode, Encode},
    Certificate,
};

use crate::error::{CredentialKind, Error, Result};

const CERTIFICATE_LABEL: &str = "CERTIFICATE";
const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// Locations of the PEM files making up a credential set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialPaths {
    pub signing_key: PathBuf,
    pub identity_certificate: PathBuf,
    pub verification_certificate: PathBuf,
}

#[derive(Clone)]
pub struct Credentials {
    signing_key: RsaPrivateKey,
    cert_id: String,
    verification_key: RsaPublicKey,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("cert_id", &self.cert_id)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn from_pem(
        signing_key: &[u8],
        identity_certificate: &[u8],
        verification_certificate: &[u8],
    ) -> Result<Self> {
        let signing_key = parse_signing_key(signing_key)?;
        let identity = parse_certificate(identity_certificate, CredentialKind::IdentityCertificate)?;
        let verification =
            parse_certificate(verification_certificate, CredentialKind::VerificationCertificate)?;

        let credentials = Self {
            signing_key,
            cert_id: serial_number_decimal(&identity),
            verification_key: rsa_public_key(&verification)?,
        };
        tracing::debug!(cert_id = %credentials.cert_id, "loaded gateway credentials");
        Ok(credentials)
    }

    pub fn from_files(paths: &CredentialPaths) -> Result<Self> {
        Self::from_pem(
            &read(&paths.signing_key, CredentialKind::SigningKey)?,
            &read(&paths.identity_certificate, CredentialKind::IdentityCertificate)?,
            &read(
                &paths.verification_certificate,
                CredentialKind::VerificationCertificate,
            )?,
        )
    }

    pub fn signing_key(&self) -> &RsaPrivateKey {
        &self.signing_key
    }

    /// Serial number of the identity certificate, in decimal.
    pub fn cert_id(&self) -> &str {
        &self.cert_id
    }

    pub fn verification_key(&self) -> &RsaPublicKey {
        &self.verification_key
    }
}

/// Read the decimal serial number of a PEM certificate.
pub fn certificate_id(pem: &[u8]) -> Result<String> {
    let certificate = parse_certificate(pem, CredentialKind::IdentityCertificate)?;
    Ok(serial_number_decimal(&certificate))
}

/// Parse the RSA public key of a PEM certificate.
pub fn verification_key_from_pem(pem: &[u8]) -> Result<RsaPublicKey> {
    let certificate = parse_certificate(pem, CredentialKind::VerificationCertificate)?;
    rsa_public_key(&certificate)
}

fn read(path: &Path, kind: CredentialKind) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::credential(kind, format!("{}: {e}", path.display())))
}

fn decode_pem(bytes: &[u8], expected_label: &str, kind: CredentialKind) -> Result<Vec<u8>> {
    let (label, der) = pem_rfc7468::decode_vec(bytes)
        .map_err(|e| Error::credential(kind, format!("not PEM-encoded: {e}")))?;
    if label != expected_label {
        return Err(Error::credential(
            kind,
            format!("unexpected PEM label {label:?}, want {expected_label:?}"),
        ));
    }
    Ok(der)
}

fn parse_signing_key(pem: &[u8]) -> Result<RsaPrivateKey> {
    let kind = CredentialKind::SigningKey;
    let der = decode_pem(pem, RSA_PRIVATE_KEY_LABEL, kind)?;
    RsaPrivateKey::from_pkcs1_der(&der).map_err(|e| Error::credential(kind, e))
}

fn parse_certificate(pem: &[u8], kind: CredentialKind) -> Result<Certificate> {
    let der = decode_pem(pem, CERTIFICATE_LABEL, kind)?;
    Certificate::from_der(&der).map_err(|e| Error::credential(kind, e))
}

fn serial_number_decimal(certificate: &Certificate) -> String {
    BigUint::from_bytes_be(certificate.tbs_certificate.serial_number.as_bytes()).to_string()
}

fn rsa_public_key(certificate: &Certificate) -> Result<RsaPublicKey> {
    let kind = CredentialKind::VerificationCertificate;
    let spki = certificate
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| Error::credential(kind, e))?;
    RsaPublicKey::from_public_key_der(&spki)
        .map_err(|e| Error::credential(kind, format!("public key is not RSA: {e}")))
}
