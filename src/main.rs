use std::path::PathBuf;

use anyhow::{bail, Context, Error};
use clap::Parser;
use clap_stdin::MaybeStdin;
use tracing_subscriber::EnvFilter;
use unionpay::transaction::QueryRequest;
use unionpay::{credentials, signature, FieldList, Gateway, GatewayConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, clap::Subcommand)]
enum Action {
    /// Print the certId (decimal serial number) of a PEM certificate.
    CertId {
        #[arg(long)]
        cert: PathBuf,
    },
    /// Sign a `name=value&...` field set and print the signature token.
    Sign {
        /// PEM encoded RSA private key.
        #[arg(long)]
        key: PathBuf,
        /// Fields to sign, or `-` to read them from stdin.
        fields: MaybeStdin<String>,
    },
    /// Verify a signed gateway response body.
    Verify {
        /// PEM encoded verification certificate of the gateway.
        #[arg(long)]
        cert: PathBuf,
        /// Response body, or `-` to read it from stdin.
        body: MaybeStdin<String>,
    },
    /// Query the status of an earlier transaction and print it as JSON.
    Query {
        /// JSON gateway configuration, including credential paths.
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        order_id: String,
        /// `txnTime` of the original transaction.
        #[arg(long)]
        txn_time: String,
        #[arg(long)]
        query_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Args::parse().action {
        Action::CertId { cert } => print_cert_id(&std::fs::read(&cert)?),
        Action::Sign { key, fields } => sign(&std::fs::read(&key)?, &fields),
        Action::Verify { cert, body } => verify(&std::fs::read(&cert)?, &body),
        Action::Query {
            config,
            order_id,
            txn_time,
            query_id,
        } => {
            query(
                GatewayConfig::from_json_file(config)?,
                QueryRequest {
                    order_id,
                    txn_time,
                    query_id,
                    reserved: None,
                },
            )
            .await
        }
    }
}

fn print_cert_id(pem: &[u8]) -> Result<(), Error> {
    println!("{}", credentials::certificate_id(pem)?);
    Ok(())
}

fn sign(key_pem: &[u8], fields: &str) -> Result<(), Error> {
    use rsa::pkcs1::DecodeRsaPrivateKey;

    let pem = std::str::from_utf8(key_pem).context("key is not PEM text")?;
    let key = rsa::RsaPrivateKey::from_pkcs1_pem(pem).context("could not parse signing key")?;
    let fields = FieldList::parse_response_body(fields.trim_end())?;
    println!("{}", signature::sign(&key, &fields)?);
    Ok(())
}

fn verify(cert_pem: &[u8], body: &str) -> Result<(), Error> {
    let key = credentials::verification_key_from_pem(cert_pem)?;
    let fields = FieldList::parse_response_body(body.trim_end())?;
    if signature::verify(&key, &fields, None).is_err() {
        bail!("signature does not verify");
    }
    println!("signature OK");
    Ok(())
}

async fn query(config: GatewayConfig, request: QueryRequest) -> Result<(), Error> {
    let gateway = Gateway::from_config(config).context("could not set up gateway client")?;
    let response = gateway.query(request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
