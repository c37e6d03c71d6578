//! Client for the UnionPay online bankcard gateway.
//!
//! Every message exchanged with the gateway is a flat list of `name=value`
//! fields signed with the sender's RSA key over a canonical string. This
//! crate builds and signs requests for checkout, mobile payment, query and
//! reversal transactions, sends the synchronous ones, and verifies both the
//! signed responses and the signed callbacks the gateway posts back.
//!
//! ```no_run
//! # async fn run() -> unionpay::Result<()> {
//! use unionpay::transaction::QueryRequest;
//! use unionpay::{Gateway, GatewayConfig};
//!
//! let config = GatewayConfig::from_json_file("unionpay.json")?;
//! let gateway = Gateway::from_config(config)?;
//! let status = gateway
//!     .query(QueryRequest {
//!         order_id: "20181115165012".into(),
//!         txn_time: "20181115165012".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("original outcome: {}", status.orig_resp_code);
//! # Ok(())
//! # }
//! ```
pub mod callback;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fields;
pub mod gateway;
pub mod http;
pub mod response;
pub mod signature;
pub mod transaction;
pub mod validation;

pub use callback::{verify_callback, Acknowledgment};
pub use config::{Environment, GatewayConfig};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use fields::{Field, FieldList};
pub use gateway::{Gateway, SignedForm};
pub use response::FromFields;
pub use transaction::TransactionKind;
pub use validation::FieldSpec;

pub use unionpay_macros;
