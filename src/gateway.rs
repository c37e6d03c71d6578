//! Transaction executor.
//!
//! A [`Gateway`] owns the merchant configuration, the credential set and an
//! [`HttpClient`]. It is read-only after construction and can be shared
//! between tasks; every call works on its own data.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::GatewayConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::fields::FieldList;
use crate::http::{HttpClient, HttpRequest};
use crate::response::{
    ensure_success, FromFields, MobilePaymentResponse, QueryResponse, ReversalResponse,
};
use crate::signature;
use crate::transaction::{
    assemble, current_txn_time, CheckoutRequest, MobilePaymentRequest, QueryRequest,
    ReversalRequest, TransactionKind,
};

/// A signed form for the customer's browser to submit.
///
/// Rendering it as an auto-submitting HTML page (`method="post"` to
/// `action`, one hidden input per field) is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedForm {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct Gateway<C> {
    config: GatewayConfig,
    credentials: Credentials,
    http: C,
}

impl<C: HttpClient> Gateway<C> {
    pub fn new(config: GatewayConfig, credentials: Credentials, http: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            credentials,
            http,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn url(&self, kind: TransactionKind) -> String {
        format!("{}{}", self.config.host(), kind.endpoint())
    }

    /// Build, validate and sign a request without sending it.
    ///
    /// Empty-valued fields are dropped. The returned list ends with the
    /// `signature` field.
    pub fn prepare(
        &self,
        kind: TransactionKind,
        params: &BTreeMap<String, String>,
    ) -> Result<FieldList> {
        let defaults = kind.default_fields(
            &self.config.merchant_id,
            self.credentials.cert_id(),
            &current_txn_time()?,
        );
        let fields = assemble(&kind.field_spec(), defaults, params)?.remove_empty();
        signature::sign_fields(self.credentials.signing_key(), fields)
    }

    /// Sign a checkout form. Nothing is sent; the customer's browser posts
    /// the form to the gateway.
    pub fn checkout(&self, request: CheckoutRequest) -> Result<SignedForm> {
        let kind = TransactionKind::Checkout;
        let fields = self.prepare(kind, &request.into_params())?;
        tracing::debug!(
            order_id = fields.get("orderId").unwrap_or_default(),
            "signed checkout form"
        );
        Ok(SignedForm {
            action: self.url(kind),
            fields: fields
                .iter()
                .map(|f| (f.name().to_string(), f.value().to_string()))
                .collect(),
        })
    }

    /// Order a mobile payment. The returned `tn` is handed to the mobile SDK.
    pub async fn mobile_payment(
        &self,
        request: MobilePaymentRequest,
    ) -> Result<MobilePaymentResponse> {
        self.execute(TransactionKind::MobilePayment, &request.into_params(), None)
            .await
    }

    pub async fn query(&self, request: QueryRequest) -> Result<QueryResponse> {
        self.execute(TransactionKind::Query, &request.into_params(), None)
            .await
    }

    pub async fn reversal(&self, request: ReversalRequest) -> Result<ReversalResponse> {
        self.execute(TransactionKind::Reversal, &request.into_params(), None)
            .await
    }

    /// Send a signed request and decode the verified response.
    ///
    /// Exactly one POST is made. A missing required field fails before
    /// anything is sent. The response signature is checked over every
    /// received field, or only over `allowed` when given, before `respCode`
    /// is looked at.
    #[tracing::instrument(
        skip(self, params, allowed),
        fields(order_id = params.get("orderId").map(String::as_str).unwrap_or_default())
    )]
    pub async fn execute<T: FromFields>(
        &self,
        kind: TransactionKind,
        params: &BTreeMap<String, String>,
        allowed: Option<&[&str]>,
    ) -> Result<T> {
        let fields = self.prepare(kind, params)?;
        let url = self.url(kind);
        let request = HttpRequest::form(url.clone(), fields.to_form_urlencoded()?);

        tracing::debug!(%url, "sending {kind} request");
        let response = self
            .http
            .post(request)
            .await
            .map_err(|e| Error::Transport {
                url: url.clone(),
                source: Box::new(e),
            })?;

        if response.status != 200 {
            tracing::warn!(status = response.status, "gateway answered with unexpected status");
            return Err(Error::Transport {
                url,
                source: format!("HTTP status {}", response.status).into(),
            });
        }

        let body = String::from_utf8_lossy(&response.body);
        let received = FieldList::parse_response_body(&body)?;
        signature::verify(self.credentials.verification_key(), &received, allowed)?;

        if let Err(e) = ensure_success(&received) {
            tracing::info!("{kind} request rejected: {e}");
            return Err(e);
        }
        Ok(T::from_fields(&received))
    }
}

#[cfg(feature = "reqwest")]
impl Gateway<crate::http::ReqwestClient> {
    /// Build a gateway from a configuration that names its credential files.
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let paths = config
            .credentials
            .as_ref()
            .ok_or_else(|| Error::Config("no credentials configured".into()))?;
        let credentials = Credentials::from_files(paths)?;
        let http = crate::http::ReqwestClient::from_config(&config)?;
        Self::new(config, credentials, http)
    }
}
