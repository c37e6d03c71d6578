//! Verification of inbound callbacks and browser redirects.
//!
//! The gateway reports asynchronous outcomes as standard form submissions:
//! back-channel notifications posted to `backUrl`, and the customer's browser
//! returning to `frontUrl`. Both are signed like synchronous responses.
//! Callers must answer notifications with an [`Acknowledgment`] and should
//! record each `orderId` idempotently, since the gateway retries.

use rsa::RsaPublicKey;

use crate::error::{Error, Result};
use crate::fields::FieldList;
use crate::gateway::Gateway;
use crate::http::HttpClient;
use crate::response::{
    ensure_success, CheckoutNotification, CheckoutReturn, FromFields, MobilePaymentNotification,
    ReversalNotification, SUCCESS_CODE,
};
use crate::signature;

/// Token sent back to the gateway after handling a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgment {
    Success,
    Fail,
}

impl Acknowledgment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Acknowledgment::Success => "SUCCESS",
            Acknowledgment::Fail => "FAIL",
        }
    }

    pub fn for_response_code(code: &str) -> Self {
        if code == SUCCESS_CODE {
            Acknowledgment::Success
        } else {
            Acknowledgment::Fail
        }
    }
}

impl std::fmt::Display for Acknowledgment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verify a form-encoded callback and decode it into `T`.
///
/// `form` is a query string or an `application/x-www-form-urlencoded` body.
/// When `allowed` is given, only those fields take part in verification.
pub fn verify_callback<T: FromFields>(
    key: &RsaPublicKey,
    form: &[u8],
    allowed: Option<&[&str]>,
) -> Result<T> {
    let fields = FieldList::from_form_urlencoded(form)?;
    if fields.is_empty() {
        return Err(Error::EmptyCallback);
    }
    signature::verify(key, &fields, allowed)?;
    Ok(T::from_fields(&fields))
}

/// Verify a callback against the fields its record knows about.
fn verify_record<T: FromFields>(key: &RsaPublicKey, form: &[u8]) -> Result<T> {
    let allowed = T::field_names();
    verify_callback(key, form, Some(&allowed))
}

impl<C: HttpClient> Gateway<C> {
    /// The customer's browser returning from checkout. Anything but a
    /// successful payment is reported as [`Error::GatewayRejected`].
    pub fn checkout_return(&self, form: &[u8]) -> Result<CheckoutReturn> {
        let key = self.credentials().verification_key();
        let fields = FieldList::from_form_urlencoded(form)?;
        if fields.is_empty() {
            return Err(Error::EmptyCallback);
        }
        let allowed = CheckoutReturn::field_names();
        signature::verify(key, &fields, Some(&allowed))?;
        ensure_success(&fields)?;
        Ok(CheckoutReturn::from_fields(&fields))
    }

    /// Back-channel outcome of a checkout. Decoded whatever the response
    /// code; acknowledge with [`Acknowledgment::for_response_code`].
    pub fn checkout_notify(&self, form: &[u8]) -> Result<CheckoutNotification> {
        let notification: CheckoutNotification =
            verify_record(self.credentials().verification_key(), form)?;
        tracing::info!(
            order_id = %notification.order_id,
            resp_code = %notification.resp_code,
            "checkout notification verified"
        );
        Ok(notification)
    }

    pub fn mobile_payment_notify(&self, form: &[u8]) -> Result<MobilePaymentNotification> {
        let notification: MobilePaymentNotification =
            verify_record(self.credentials().verification_key(), form)?;
        tracing::info!(
            order_id = %notification.order_id,
            resp_code = %notification.resp_code,
            "mobile payment notification verified"
        );
        Ok(notification)
    }

    pub fn reversal_notify(&self, form: &[u8]) -> Result<ReversalNotification> {
        let notification: ReversalNotification =
            verify_record(self.credentials().verification_key(), form)?;
        tracing::info!(
            order_id = %notification.order_id,
            resp_code = %notification.resp_code,
            "reversal notification verified"
        );
        Ok(notification)
    }

    /// Verify any callback with the gateway's key.
    pub fn verify_callback<T: FromFields>(
        &self,
        form: &[u8],
        allowed: Option<&[&str]>,
    ) -> Result<T> {
        verify_callback(self.credentials().verification_key(), form, allowed)
    }
}
