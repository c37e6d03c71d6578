//! Accepted request fields per transaction kind.

use crate::validation::FieldSpec;

const COMMON_REQUIRED: [&str; 10] = [
    "version",
    "encoding",
    "certId",
    "signMethod",
    "txnType",
    "txnSubType",
    "bizType",
    "channelType",
    "accessType",
    "merId",
];

impl FieldSpec {
    pub fn checkout() -> Self {
        FieldSpec::new()
            .required(COMMON_REQUIRED)
            .required(["backUrl", "orderId", "txnTime", "txnAmt", "currencyCode"])
            .optional([
                "frontUrl",
                "subMerId",
                "subMerName",
                "subMerAbbr",
                "accType",
                "accNo",
                "customerInfo",
                "orderTimeout",
                "payTimeout",
                "termId",
                "reqReserved",
                "reserved",
                "riskRateInfo",
                "encryptCertId",
                "frontFailUrl",
                "instalTransInfo",
                "defaultPayType",
                "issInsCode",
                "supPayType",
                "userMac",
                "customerIp",
                "cardTransData",
                "orderDesc",
            ])
    }

    pub fn mobile_payment() -> Self {
        FieldSpec::new()
            .required(COMMON_REQUIRED)
            .required(["backUrl", "orderId", "currencyCode", "txnAmt", "txnTime"])
            .optional(["payTimeout", "accNo", "reqReserved", "orderDesc"])
    }

    pub fn query() -> Self {
        FieldSpec::new()
            .required(COMMON_REQUIRED)
            .required(["orderId", "txnTime"])
            .optional(["queryId", "reserved"])
    }

    pub fn reversal() -> Self {
        FieldSpec::new()
            .required(COMMON_REQUIRED)
            .required(["backUrl", "orderId", "txnTime", "txnAmt", "origQryId"])
            .optional(["reqReserved", "reserved"])
    }
}
