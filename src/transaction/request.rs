//! Typed request parameters.
//!
//! Each request turns into the caller parameter map that is overlaid on the
//! kind's defaults. `extra` carries any other field the kind accepts; fields
//! it does not accept are dropped during assembly.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub order_id: String,
    /// Amount in cents.
    pub amount: u64,
    /// Where the customer's browser returns after paying.
    pub front_url: String,
    /// Where the gateway posts the payment notification.
    pub back_url: String,
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MobilePaymentRequest {
    pub order_id: String,
    /// Amount in cents.
    pub amount: u64,
    pub back_url: String,
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    pub order_id: String,
    /// `txnTime` of the transaction being queried.
    pub txn_time: String,
    pub query_id: Option<String>,
    pub reserved: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReversalRequest {
    /// Order id of the reversal itself, not of the original payment.
    pub order_id: String,
    /// Amount in cents; must equal the original amount.
    pub amount: u64,
    /// `queryId` of the payment being reversed.
    pub original_query_id: String,
    pub back_url: String,
    pub req_reserved: Option<String>,
    pub reserved: Option<String>,
}

fn insert_opt(params: &mut BTreeMap<String, String>, name: &str, value: Option<String>) {
    if let Some(value) = value {
        params.insert(name.to_string(), value);
    }
}

impl CheckoutRequest {
    pub fn into_params(self) -> BTreeMap<String, String> {
        let mut params = self.extra;
        params.insert("orderId".into(), self.order_id);
        params.insert("txnAmt".into(), self.amount.to_string());
        params.insert("frontUrl".into(), self.front_url);
        params.insert("backUrl".into(), self.back_url);
        params
    }
}

impl MobilePaymentRequest {
    pub fn into_params(self) -> BTreeMap<String, String> {
        let mut params = self.extra;
        params.insert("orderId".into(), self.order_id);
        params.insert("txnAmt".into(), self.amount.to_string());
        params.insert("backUrl".into(), self.back_url);
        params
    }
}

impl QueryRequest {
    pub fn into_params(self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("orderId".into(), self.order_id);
        params.insert("txnTime".into(), self.txn_time);
        insert_opt(&mut params, "queryId", self.query_id);
        insert_opt(&mut params, "reserved", self.reserved);
        params
    }
}

impl ReversalRequest {
    pub fn into_params(self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("orderId".into(), self.order_id);
        params.insert("txnAmt".into(), self.amount.to_string());
        params.insert("origQryId".into(), self.original_query_id);
        params.insert("backUrl".into(), self.back_url);
        insert_opt(&mut params, "reqReserved", self.req_reserved);
        insert_opt(&mut params, "reserved", self.reserved);
        params
    }
}
