//! Transaction kinds, their fixed codes and default fields.

use std::collections::BTreeMap;

use time::{
    format_description::FormatItem,
    macros::{format_description, offset},
    OffsetDateTime,
};

use crate::error::{Error, Result};
use crate::fields::FieldList;
use crate::signature::SIGN_METHOD_RSA;
use crate::validation::FieldSpec;

pub mod catalog;
pub mod request;

pub use request::{CheckoutRequest, MobilePaymentRequest, QueryRequest, ReversalRequest};

pub const PROTOCOL_VERSION: &str = "5.0.0";
/// Character set of every request, as written in the `encoding` field.
pub const ENCODING: &str = "UTF-8";
/// Merchant connected directly, not through an acquirer.
pub const ACCESS_TYPE_DIRECT: &str = "0";
/// Renminbi.
pub const CURRENCY_CNY: &str = "156";

const TXN_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year][month][day][hour][minute][second]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Browser-side consumption. Submitted by the customer's browser, never
    /// by this client.
    Checkout,
    MobilePayment,
    Query,
    /// Cancels a same-day consumption.
    Reversal,
}

/// `txnType`, `txnSubType`, `bizType` and `channelType` of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionCodes {
    pub txn_type: &'static str,
    pub txn_sub_type: &'static str,
    pub biz_type: &'static str,
    pub channel_type: &'static str,
}

impl TransactionKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            TransactionKind::Checkout => "/gateway/api/frontTransReq.do",
            TransactionKind::MobilePayment => "/gateway/api/appTransReq.do",
            TransactionKind::Query => "/gateway/api/queryTrans.do",
            TransactionKind::Reversal => "/gateway/api/backTransReq.do",
        }
    }

    pub fn codes(&self) -> TransactionCodes {
        let (txn_type, txn_sub_type, biz_type, channel_type) = match self {
            TransactionKind::Checkout => ("01", "01", "000201", "08"),
            TransactionKind::MobilePayment => ("01", "01", "000201", "08"),
            TransactionKind::Query => ("00", "00", "000000", "07"),
            TransactionKind::Reversal => ("31", "00", "000201", "07"),
        };
        TransactionCodes {
            txn_type,
            txn_sub_type,
            biz_type,
            channel_type,
        }
    }

    /// The fields this kind of request accepts.
    pub fn field_spec(&self) -> FieldSpec {
        match self {
            TransactionKind::Checkout => FieldSpec::checkout(),
            TransactionKind::MobilePayment => FieldSpec::mobile_payment(),
            TransactionKind::Query => FieldSpec::query(),
            TransactionKind::Reversal => FieldSpec::reversal(),
        }
    }

    /// Fields every request of this kind starts from.
    ///
    /// Queries refer to an earlier transaction by its `txnTime`, so no
    /// timestamp is generated for them.
    pub fn default_fields(
        &self,
        merchant_id: &str,
        cert_id: &str,
        txn_time: &str,
    ) -> BTreeMap<String, String> {
        let codes = self.codes();
        let mut fields: BTreeMap<String, String> = [
            ("version", PROTOCOL_VERSION),
            ("encoding", ENCODING),
            ("signMethod", SIGN_METHOD_RSA),
            ("accessType", ACCESS_TYPE_DIRECT),
            ("txnType", codes.txn_type),
            ("txnSubType", codes.txn_sub_type),
            ("bizType", codes.biz_type),
            ("channelType", codes.channel_type),
            ("merId", merchant_id),
            ("certId", cert_id),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

        if *self != TransactionKind::Query {
            fields.insert("txnTime".into(), txn_time.into());
        }
        if matches!(
            self,
            TransactionKind::Checkout | TransactionKind::MobilePayment
        ) {
            fields.insert("currencyCode".into(), CURRENCY_CNY.into());
        }
        if *self == TransactionKind::Checkout {
            fields.insert("defaultPayType".into(), "0001".into());
        }
        fields
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TransactionKind::Checkout => "checkout",
            TransactionKind::MobilePayment => "mobile payment",
            TransactionKind::Query => "query",
            TransactionKind::Reversal => "reversal",
        })
    }
}

/// `txnTime` for `now`: Beijing time as `YYYYMMDDhhmmss`.
pub fn txn_time(now: OffsetDateTime) -> Result<String> {
    now.to_offset(offset!(+8))
        .format(TXN_TIME_FORMAT)
        .map_err(|e| Error::Config(format!("unable to format transaction time: {e}")))
}

pub fn current_txn_time() -> Result<String> {
    txn_time(OffsetDateTime::now_utc())
}

/// Overlay caller parameters onto the defaults and validate the result.
///
/// Parameters `spec` does not name are dropped, as is any
/// `signature` a caller might have supplied.
pub fn assemble(
    spec: &FieldSpec,
    defaults: BTreeMap<String, String>,
    params: &BTreeMap<String, String>,
) -> Result<FieldList> {
    let mut merged = defaults;
    merged.extend(spec.filter(params));
    spec.validate(&merged)?;
    FieldList::try_from_pairs(merged)
}
