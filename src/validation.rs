//! Field specifications and the request-side validator.
//!
//! A [`FieldSpec`] lists the fields a transaction accepts and which of them
//! are mandatory. It is both an allow-list (unknown caller fields are dropped)
//! and a requiredness check.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Whether a field must be present with a non-empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec {
    fields: BTreeMap<String, Presence>,
}

impl FieldSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.fields.insert(name.into(), Presence::Required);
        }
        self
    }

    pub fn optional<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.fields.insert(name.into(), Presence::Optional);
        }
        self
    }

    pub fn presence(&self, name: &str) -> Option<Presence> {
        self.fields.get(name).copied()
    }

    pub fn allows(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, presence)| **presence == Presence::Required)
            .map(|(name, _)| name.as_str())
    }

    /// Check that every required field is present and non-empty.
    ///
    /// Reports the first missing field in byte order of the name.
    pub fn validate(&self, params: &BTreeMap<String, String>) -> Result<()> {
        match self
            .required_names()
            .find(|name| params.get(*name).map_or(true, |v| v.is_empty()))
        {
            Some(missing) => Err(Error::MissingRequiredField(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Keep only the parameters named in this specification.
    pub fn filter(&self, params: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        params
            .iter()
            .filter(|(name, _)| self.allows(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_required_field_is_named() {
        let spec = FieldSpec::new().required(["orderId"]).optional(["note"]);
        let result = spec.validate(&params(&[("note", "hi")]));
        assert!(matches!(result, Err(Error::MissingRequiredField(name)) if name == "orderId"));
    }

    #[test]
    fn empty_required_value_counts_as_missing() {
        let spec = FieldSpec::new().required(["orderId"]);
        assert!(spec.validate(&params(&[("orderId", "")])).is_err());
        spec.validate(&params(&[("orderId", "X1")])).unwrap();
    }

    #[test]
    fn optional_and_unknown_fields_do_not_matter() {
        let spec = FieldSpec::new().required(["orderId"]).optional(["note"]);
        spec.validate(&params(&[("orderId", "X1"), ("whatever", "")]))
            .unwrap();
    }

    #[test]
    fn first_missing_field_in_byte_order_is_reported() {
        let spec = FieldSpec::new().required(["txnAmt", "orderId", "merId"]);
        let result = spec.validate(&params(&[]));
        assert!(matches!(result, Err(Error::MissingRequiredField(name)) if name == "merId"));
    }

    #[test]
    fn filter_drops_unknown_fields() {
        let spec = FieldSpec::new().required(["orderId"]).optional(["note"]);
        let input = params(&[("orderId", "X1"), ("note", "hi"), ("evil", "1")]);
        let filtered = spec.filter(&input);
        assert_eq!(filtered.len(), 2);
        assert!(!filtered.contains_key("evil"));
        // Validation never mutates its input.
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn later_declaration_overrides_presence() {
        let spec = FieldSpec::new().required(["frontUrl"]).optional(["frontUrl"]);
        assert_eq!(spec.presence("frontUrl"), Some(Presence::Optional));
        assert_eq!(spec.presence("nope"), None);
    }
}
