//! Typed gateway responses and notifications.
//!
//! Each record declares, through `#[derive(FromFields)]`, an explicit table
//! from protocol field name to the slot it fills. Decoded fields missing from
//! the table are ignored and slots without a decoded field stay empty.

use serde::Serialize;
use unionpay_macros::FromFields;

use crate::error::{Error, Result};
use crate::fields::FieldList;

/// Field carrying the two-character response code.
pub const RESPONSE_CODE_FIELD: &str = "respCode";
pub const RESPONSE_MESSAGE_FIELD: &str = "respMsg";
/// The only response code that denotes success.
pub const SUCCESS_CODE: &str = "00";

/// Writes one decoded value into its slot.
pub type Setter<T> = fn(&mut T, String);

pub trait FromFields: Default + 'static {
    /// Protocol field name and setter for every slot of the record.
    fn field_table() -> &'static [(&'static str, Setter<Self>)];

    /// The protocol field names this record knows about.
    fn field_names() -> Vec<&'static str> {
        Self::field_table().iter().map(|(name, _)| *name).collect()
    }

    fn from_fields(fields: &FieldList) -> Self {
        let mut record = Self::default();
        for (name, set) in Self::field_table() {
            if let Some(value) = fields.get(name) {
                set(&mut record, value.to_string());
            }
        }
        record
    }
}

/// Fail with [`Error::GatewayRejected`] unless `respCode` is the success code.
pub fn ensure_success(fields: &FieldList) -> Result<()> {
    let code = fields.get(RESPONSE_CODE_FIELD).unwrap_or_default();
    if code == SUCCESS_CODE {
        return Ok(());
    }
    Err(Error::GatewayRejected {
        code: code.to_string(),
        message: fields
            .get(RESPONSE_MESSAGE_FIELD)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Browser redirect back to the merchant after a checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromFields)]
#[unionpay(crate = "crate")]
pub struct CheckoutReturn {
    pub version: String,
    pub encoding: String,
    pub cert_id: String,
    pub signature: String,
    pub sign_method: String,
    pub txn_type: String,
    pub txn_sub_type: String,
    pub biz_type: String,
    pub access_type: String,
    pub mer_id: String,
    pub order_id: String,
    pub txn_time: String,
    /// Amount in cents.
    pub txn_amt: String,
    pub currency_code: String,
    pub req_reserved: String,
    pub reserved: String,
    /// Gateway serial number, used by later queries and reversals.
    pub query_id: String,
    pub resp_code: String,
    pub resp_msg: String,
    pub acc_no: String,
    pub pay_card_type: String,
    pub pay_type: String,
    pub tn: String,
    pub trace_no: String,
    pub trace_time: String,
    pub settle_date: String,
    pub settle_currency_code: String,
    pub settle_amt: String,
}

/// Back-channel notification of a checkout outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromFields)]
#[unionpay(crate = "crate")]
pub struct CheckoutNotification {
    pub version: String,
    pub encoding: String,
    pub cert_id: String,
    pub signature: String,
    pub sign_method: String,
    pub txn_type: String,
    pub txn_sub_type: String,
    pub biz_type: String,
    pub access_type: String,
    pub mer_id: String,
    pub order_id: String,
    pub txn_time: String,
    pub txn_amt: String,
    pub currency_code: String,
    pub req_reserved: String,
    pub reserved: String,
    pub query_id: String,
    pub resp_code: String,
    pub resp_msg: String,
    pub settle_amt: String,
    pub settle_currency_code: String,
    pub settle_date: String,
    pub trace_no: String,
    pub trace_time: String,
    /// Only present for cross-border transactions.
    pub exchange_date: String,
    pub exchange_rate: String,
    pub acc_no: String,
    pub pay_card_type: String,
    pub pay_type: String,
    pub pay_card_no: String,
    pub pay_card_issue_name: String,
    pub bind_id: String,
}

/// Answer to a mobile payment order. `tn` is handed to the mobile SDK.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromFields)]
#[unionpay(crate = "crate")]
pub struct MobilePaymentResponse {
    pub version: String,
    pub encoding: String,
    pub cert_id: String,
    pub sign_method: String,
    pub signature: String,
    pub txn_type: String,
    pub txn_sub_type: String,
    pub biz_type: String,
    pub access_type: String,
    pub mer_id: String,
    pub order_id: String,
    pub txn_time: String,
    pub req_reserved: String,
    pub reserved: String,
    pub resp_code: String,
    pub resp_msg: String,
    pub tn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromFields)]
#[unionpay(crate = "crate")]
pub struct MobilePaymentNotification {
    pub version: String,
    pub encoding: String,
    pub cert_id: String,
    pub sign_method: String,
    pub signature: String,
    pub txn_type: String,
    pub txn_sub_type: String,
    pub biz_type: String,
    pub access_type: String,
    pub mer_id: String,
    pub order_id: String,
    pub currency_code: String,
    pub txn_amt: String,
    pub txn_time: String,
    pub pay_type: String,
    pub acc_no: String,
    pub pay_card_type: String,
    pub req_reserved: String,
    pub reserved: String,
    pub query_id: String,
    pub trace_no: String,
    pub trace_time: String,
    pub settle_date: String,
    pub settle_currency_code: String,
    pub settle_amt: String,
    pub resp_code: String,
    pub resp_msg: String,
    pub pay_card_no: String,
    pub pay_card_issue_name: String,
    pub tn: String,
}

/// Status of an earlier transaction. `orig_resp_code` is the outcome of the
/// transaction being queried; `resp_code` only says whether the query itself
/// succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromFields)]
#[unionpay(crate = "crate")]
pub struct QueryResponse {
    pub version: String,
    pub encoding: String,
    pub cert_id: String,
    pub signature: String,
    pub sign_method: String,
    pub txn_type: String,
    pub txn_sub_type: String,
    pub access_type: String,
    pub mer_id: String,
    pub order_id: String,
    pub txn_time: String,
    pub pay_type: String,
    pub currency_code: String,
    pub acc_no: String,
    pub pay_card_type: String,
    pub txn_amt: String,
    pub req_reserved: String,
    pub reserved: String,
    pub issuer_identify_mode: String,
    pub query_id: String,
    pub trace_no: String,
    pub trace_time: String,
    pub settle_date: String,
    pub settle_currency_code: String,
    pub settle_amt: String,
    pub orig_resp_code: String,
    pub orig_resp_msg: String,
    pub resp_code: String,
    pub resp_msg: String,
}

/// Synchronous acknowledgment of a reversal request. The final outcome
/// arrives later as a [`ReversalNotification`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromFields)]
#[unionpay(crate = "crate")]
pub struct ReversalResponse {
    pub version: String,
    pub encoding: String,
    pub cert_id: String,
    pub signature: String,
    pub sign_method: String,
    pub txn_type: String,
    pub txn_sub_type: String,
    pub biz_type: String,
    pub access_type: String,
    pub mer_id: String,
    pub order_id: String,
    pub txn_time: String,
    pub txn_amt: String,
    pub req_reserved: String,
    pub reserved: String,
    pub query_id: String,
    pub orig_qry_id: String,
    pub resp_code: String,
    pub resp_msg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromFields)]
#[unionpay(crate = "crate")]
pub struct ReversalNotification {
    pub version: String,
    pub encoding: String,
    pub cert_id: String,
    pub signature: String,
    pub sign_method: String,
    pub txn_type: String,
    pub txn_sub_type: String,
    pub biz_type: String,
    pub access_type: String,
    pub mer_id: String,
    pub order_id: String,
    pub txn_time: String,
    pub currency_code: String,
    pub txn_amt: String,
    pub req_reserved: String,
    pub reserved: String,
    pub query_id: String,
    pub orig_qry_id: String,
    pub trace_no: String,
    pub trace_time: String,
    pub settle_date: String,
    pub settle_currency_code: String,
    pub settle_amt: String,
    pub resp_code: String,
    pub resp_msg: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decodes_known_fields_and_ignores_the_rest() {
        let fields = FieldList::try_from_pairs([
            ("respCode", "00"),
            ("respMsg", "OK"),
            ("orderId", "X1"),
            ("tn", "201811151650128263528"),
            ("somethingNew", "ignored"),
        ])
        .unwrap();
        let response = MobilePaymentResponse::from_fields(&fields);
        assert_eq!(response.resp_code, "00");
        assert_eq!(response.resp_msg, "OK");
        assert_eq!(response.order_id, "X1");
        assert_eq!(response.tn, "201811151650128263528");
        assert_eq!(response.mer_id, "");
    }

    #[test]
    fn field_table_is_usable_through_the_trait() {
        fn names_of<T: FromFields>() -> Vec<&'static str> {
            T::field_names()
        }
        assert_eq!(names_of::<MobilePaymentResponse>().last(), Some(&"tn"));
    }

    #[test]
    fn names_are_matched_exactly() {
        let fields = FieldList::try_from_pairs([("RespCode", "00"), ("ORDERID", "X1")]).unwrap();
        assert_eq!(QueryResponse::from_fields(&fields), QueryResponse::default());
    }

    #[test]
    fn field_names_use_wire_spelling() {
        let names = ReversalNotification::field_names();
        assert!(names.contains(&"origQryId"));
        assert!(names.contains(&"settleCurrencyCode"));
        assert!(names.contains(&"signature"));
        assert_eq!(names.len(), 25);
    }

    #[test]
    fn success_code_passes() {
        let fields = FieldList::try_from_pairs([("respCode", "00")]).unwrap();
        ensure_success(&fields).unwrap();
    }

    #[test]
    fn other_codes_are_rejections() {
        let fields =
            FieldList::try_from_pairs([("respCode", "01"), ("respMsg", "declined")]).unwrap();
        match ensure_success(&fields) {
            Err(Error::GatewayRejected { code, message }) => {
                assert_eq!(code, "01");
                assert_eq!(message, "declined");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn missing_code_is_a_rejection() {
        assert!(ensure_success(&FieldList::new())
            .unwrap_err()
            .is_rejection());
    }
}
