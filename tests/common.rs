#![cfg(feature = "reqwest")]

use anyhow::{Context, Result};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::RsaPrivateKey;

use unionpay::http::ReqwestClient;
use unionpay::{signature, Credentials, Environment, FieldList, Gateway, GatewayConfig};

pub const MERCHANT_ID: &str = "777290058110048";

static MERCHANT_KEY: &[u8] = include_bytes!("../test/credentials/merchant-key.pem");
static MERCHANT_CERT: &[u8] = include_bytes!("../test/credentials/merchant-cert.pem");
static GATEWAY_KEY: &str = include_str!("../test/credentials/gateway-key.pem");
static GATEWAY_CERT: &[u8] = include_bytes!("../test/credentials/gateway-cert.pem");
static ROGUE_CERT: &[u8] = include_bytes!("../test/credentials/rogue-cert.pem");

#[allow(dead_code)]
fn main() {}

/// Gateway client for a mock server at `host`, trusting the test gateway certificate.
#[allow(dead_code)]
pub fn gateway(host: &str) -> Result<Gateway<ReqwestClient>> {
    gateway_trusting(host, GATEWAY_CERT)
}

/// Gateway client that trusts a certificate the mock gateway does not sign with.
#[allow(dead_code)]
pub fn gateway_trusting_rogue(host: &str) -> Result<Gateway<ReqwestClient>> {
    gateway_trusting(host, ROGUE_CERT)
}

fn gateway_trusting(host: &str, verification_cert: &[u8]) -> Result<Gateway<ReqwestClient>> {
    let config = GatewayConfig::new(MERCHANT_ID, Environment::Test).with_host(host);
    let credentials = Credentials::from_pem(MERCHANT_KEY, MERCHANT_CERT, verification_cert)
        .context("could not load test credentials")?;
    let http = ReqwestClient::from_config(&config)?;
    Ok(Gateway::new(config, credentials, http)?)
}

/// Fields signed with the test gateway's key.
#[allow(dead_code)]
pub fn signed_by_gateway(pairs: &[(&str, &str)]) -> Result<FieldList> {
    let key = RsaPrivateKey::from_pkcs1_pem(GATEWAY_KEY).context("could not parse gateway key")?;
    let fields = FieldList::try_from_pairs(pairs.iter().copied())?;
    Ok(signature::sign_fields(&key, fields)?)
}

/// A synchronous response body as the gateway writes it: raw `name=value`
/// pairs joined with `&`.
#[allow(dead_code)]
pub fn response_body(pairs: &[(&str, &str)]) -> Result<String> {
    Ok(signed_by_gateway(pairs)?.join())
}

/// A callback as the gateway posts it: standard form encoding.
#[allow(dead_code)]
pub fn callback_form(pairs: &[(&str, &str)]) -> Result<Vec<u8>> {
    Ok(signed_by_gateway(pairs)?.to_form_urlencoded()?.into_bytes())
}
