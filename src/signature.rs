//! Signing and verification of field lists.
//!
//! The gateway signs the SHA-1 digest of the *lowercase hex text* of the SHA-1
//! digest of the canonical string, using RSA PKCS#1 v1.5. Hashing the hex text
//! rather than the raw digest looks odd but is what the gateway does on both
//! sides, so it is reproduced exactly.

use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};

use crate::error::{Error, Result};
use crate::fields::FieldList;

/// Name of the field carrying the base64 signature token.
pub const SIGNATURE_FIELD: &str = "signature";

/// Value of `signMethod` for RSA signatures.
pub const SIGN_METHOD_RSA: &str = "01";

/// The digest that is actually signed, over every field except `signature`.
pub fn signing_digest(fields: &FieldList) -> [u8; 20] {
    let canonical = fields.without(SIGNATURE_FIELD).canonical_string();
    let first = Sha1::digest(canonical.as_bytes());
    let second = Sha1::digest(hex::encode(first).as_bytes());
    let mut digest = [0u8; 20];
    digest.copy_from_slice(&second);
    digest
}

/// Sign a field list, returning the base64 signature token.
///
/// Any `signature` field already present is ignored.
pub fn sign(key: &RsaPrivateKey, fields: &FieldList) -> Result<String> {
    let digest = signing_digest(fields);
    let signature = key.sign_with_rng(
        &mut rand::thread_rng(),
        Pkcs1v15Sign::new::<Sha1>(),
        &digest,
    )?;
    Ok(base64::encode(signature))
}

/// Sign a field list and append the resulting `signature` field.
pub fn sign_fields(key: &RsaPrivateKey, mut fields: FieldList) -> Result<FieldList> {
    let token = sign(key, &fields)?;
    fields.remove(SIGNATURE_FIELD);
    fields.push(SIGNATURE_FIELD, token)?;
    Ok(fields)
}

/// Verify the `signature` field of a field list.
///
/// When `allowed` is given, fields outside that list are dropped before the
/// canonical string is built. Every failure, including a missing signature,
/// is reported as [`Error::InvalidSignature`].
pub fn verify(key: &RsaPublicKey, fields: &FieldList, allowed: Option<&[&str]>) -> Result<()> {
    let mut fields = match allowed {
        Some(allowed) => fields.retain_names(allowed),
        None => fields.clone(),
    };

    let claimed = match fields.remove(SIGNATURE_FIELD) {
        Some(claimed) if !claimed.is_empty() => claimed,
        _ => {
            tracing::info!("inbound data carries no signature");
            return Err(Error::InvalidSignature);
        }
    };

    let signature = base64::decode(claimed.as_bytes()).map_err(|e| {
        tracing::info!("signature is not valid base64: {e}");
        Error::InvalidSignature
    })?;

    let digest = signing_digest(&fields);
    key.verify(Pkcs1v15Sign::new::<Sha1>(), &digest, &signature)
        .map_err(|e| {
            tracing::info!("signature could not be verified: {e}");
            Error::InvalidSignature
        })
}

#[cfg(test)]
mod test {
    use rsa::pkcs1::DecodeRsaPrivateKey;

    use super::*;
    use crate::credentials::Credentials;

    static MERCHANT_KEY: &str = include_str!("../test/credentials/merchant-key.pem");
    static GATEWAY_KEY: &str = include_str!("../test/credentials/gateway-key.pem");

    // Produced independently with:
    //   printf %s "$(printf %s 'orderId=X1&signMethod=01&txnAmt=100' | sha1sum | cut -d' ' -f1)" \
    //     | openssl dgst -sha1 -sign merchant-key.pem | base64 -w0
    const KNOWN_SIGNATURE: &str = "BUUUFfW4I3KfiMNPi70YjZd65N2xZOTo8peELJttJDlHMfONpCN/XwqakEZ+dAc1ic19XhcUP46lcCZiqPbkX1251kJhoSP48SdNftaf3ZRsDzufOUUMmNnrCmqmEh8SIR5WCR5ByyEEfPR2DGF/7JoZG0SqyYwoEZxqTIxwjaf9kYdjm/hm8RtNOe2lTmeHRxGfX7St766X1q3tnD+nuXD6DkzIDxtZNc8xISw8Plbonma/nKqIfDl4P2i7iUyQf/6ZbpAgO3NKI+21Yo5mviulIvS8DtZWhH5yP1dG7fAgk+Jjbew6oaMA2eGPotKBQRJytYbIDTmaJsmN2Vm1Jw==";

    fn merchant_key() -> RsaPrivateKey {
        RsaPrivateKey::from_pkcs1_pem(MERCHANT_KEY).unwrap()
    }

    fn gateway_key() -> RsaPrivateKey {
        RsaPrivateKey::from_pkcs1_pem(GATEWAY_KEY).unwrap()
    }

    fn order() -> FieldList {
        FieldList::try_from_pairs([("orderId", "X1"), ("txnAmt", "100"), ("signMethod", "01")])
            .unwrap()
    }

    #[test]
    fn digest_hashes_the_hex_text_of_the_first_digest() {
        assert_eq!(
            hex::encode(signing_digest(&order())),
            "f4adb64e2da2f1b8fcf808682bc98b6a0975102a"
        );
    }

    #[test]
    fn signature_matches_known_answer() {
        assert_eq!(sign(&merchant_key(), &order()).unwrap(), KNOWN_SIGNATURE);
    }

    #[test]
    fn signature_field_is_excluded_from_digest() {
        let mut with_signature = order();
        with_signature.push(SIGNATURE_FIELD, "whatever").unwrap();
        assert_eq!(signing_digest(&with_signature), signing_digest(&order()));
    }

    #[test]
    fn round_trip() {
        let key = merchant_key();
        let signed = sign_fields(&key, order()).unwrap();
        verify(&key.to_public_key(), &signed, None).unwrap();
    }

    #[test]
    fn verification_with_mismatched_key_fails() {
        let signed = sign_fields(&merchant_key(), order()).unwrap();
        let result = verify(&gateway_key().to_public_key(), &signed, None);
        assert!(matches!(result, Err(Error::InvalidSignature)));
    }

    #[test]
    fn any_tampered_value_fails() {
        let key = merchant_key();
        let public = key.to_public_key();
        let signed = sign_fields(&key, order()).unwrap();

        for field in signed.iter() {
            let mut tampered = FieldList::new();
            for other in signed.iter() {
                let value = if other.name() == field.name() {
                    flip_last_char(other.value())
                } else {
                    other.value().to_string()
                };
                tampered.push(other.name(), value).unwrap();
            }
            assert!(
                matches!(verify(&public, &tampered, None), Err(Error::InvalidSignature)),
                "tampering with {} went unnoticed",
                field.name()
            );
        }
    }

    #[test]
    fn extra_fields_break_verification_unless_filtered() {
        let key = merchant_key();
        let public = key.to_public_key();
        let mut signed = sign_fields(&key, order()).unwrap();
        signed.push("injected", "1").unwrap();

        assert!(verify(&public, &signed, None).is_err());
        verify(
            &public,
            &signed,
            Some(&["orderId", "txnAmt", "signMethod", SIGNATURE_FIELD]),
        )
        .unwrap();
    }

    #[test]
    fn missing_or_garbled_signature_fails() {
        let public = merchant_key().to_public_key();
        assert!(matches!(
            verify(&public, &order(), None),
            Err(Error::InvalidSignature)
        ));

        let mut garbled = order();
        garbled.push(SIGNATURE_FIELD, "not base64!").unwrap();
        assert!(matches!(
            verify(&public, &garbled, None),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn verifies_with_certificate_loaded_from_pem() {
        let credentials = Credentials::from_pem(
            GATEWAY_KEY.as_bytes(),
            include_bytes!("../test/credentials/gateway-cert.pem"),
            include_bytes!("../test/credentials/merchant-cert.pem"),
        )
        .unwrap();
        let signed = sign_fields(&merchant_key(), order()).unwrap();
        verify(credentials.verification_key(), &signed, None).unwrap();
    }

    fn flip_last_char(value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let last = chars.pop().unwrap_or('x');
        chars.push(if last == 'A' { 'B' } else { 'A' });
        chars.into_iter().collect()
    }
}
