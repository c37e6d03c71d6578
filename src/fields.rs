//! Ordered `name=value` field lists and their canonical form.
//!
//! Every message exchanged with the gateway is a flat list of string fields.
//! The canonical string that both sides hash is always
//! `join(sort(remove_empty(list)))`:
//!
//! ```
//! use unionpay::fields::FieldList;
//!
//! let fields = FieldList::try_from_pairs([("b", "2"), ("a", "1"), ("z", ""), ("c", "3")]).unwrap();
//! assert_eq!(fields.canonical_string(), "a=1&b=2&c=3");
//! ```

use crate::error::{Error, Result};

/// A single protocol field. The name is never empty; the value may be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyFieldName);
        }
        Ok(Self {
            name,
            value: value.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An ordered list of fields with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList(Vec<Field>);

impl FieldList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from `(name, value)` pairs, rejecting empty or repeated names.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |mut list, (name, value)| {
                list.push(name, value)?;
                Ok(list)
            })
    }

    /// Append a field. Names must be unique within a list.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let field = Field::new(name, value)?;
        if self.contains(&field.name) {
            return Err(Error::DuplicateField(field.name));
        }
        self.0.push(field);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|f| f.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.0.iter().position(|f| f.name == name)?;
        Some(self.0.remove(index).value)
    }

    /// Copy of this list without the named field.
    pub fn without(&self, name: &str) -> Self {
        Self(self.0.iter().filter(|f| f.name != name).cloned().collect())
    }

    /// Copy of this list keeping only fields whose name is in `allowed`.
    pub fn retain_names(&self, allowed: &[&str]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|f| allowed.contains(&f.name.as_str()))
                .cloned()
                .collect(),
        )
    }

    /// Copy of this list without empty-valued fields, preserving order.
    pub fn remove_empty(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|f| !f.value.is_empty())
                .cloned()
                .collect(),
        )
    }

    /// Copy of this list ordered by name, byte-wise ascending.
    pub fn sorted(&self) -> Self {
        let mut fields = self.0.clone();
        // Names are unique, so an unstable sort is still deterministic.
        fields.sort_unstable_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        Self(fields)
    }

    /// `name=value` pairs joined by `&` in the current order.
    pub fn join(&self) -> String {
        self.0
            .iter()
            .map(|f| format!("{}={}", f.name, f.value))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// The exact preimage hashed by the signature engine.
    pub fn canonical_string(&self) -> String {
        self.remove_empty().sorted().join()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Standard `application/x-www-form-urlencoded` serialization.
    pub fn to_form_urlencoded(&self) -> Result<String> {
        let pairs: Vec<(&str, &str)> = self
            .0
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        Ok(serde_urlencoded::to_string(pairs)?)
    }

    /// Parse a synchronous gateway response body.
    ///
    /// The body is split on `&`, then each token on its first `=`. Values are
    /// taken verbatim without percent-decoding, since that is how the gateway
    /// emits and signs them. Tokens without `=` are skipped.
    pub fn parse_response_body(body: &str) -> Result<Self> {
        body.split('&')
            .filter_map(|token| token.split_once('='))
            .try_fold(Self::new(), |mut list, (name, value)| {
                list.push(name, value)?;
                Ok(list)
            })
    }

    /// Parse a standard form submission (query string or POST body).
    pub fn from_form_urlencoded(input: &[u8]) -> Result<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(input)?;
        Self::try_from_pairs(pairs)
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn list(pairs: &[(&str, &str)]) -> FieldList {
        FieldList::try_from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn canonical_string_is_order_independent() {
        let expected = "a=1&b=2&c=3";
        assert_eq!(
            list(&[("b", "2"), ("a", "1"), ("c", "3")]).canonical_string(),
            expected
        );
        assert_eq!(
            list(&[("c", "3"), ("b", "2"), ("a", "1")]).canonical_string(),
            expected
        );
        assert_eq!(
            list(&[("a", "1"), ("c", "3"), ("b", "2")]).canonical_string(),
            expected
        );
    }

    #[test]
    fn empty_values_are_excluded() {
        let fields = list(&[("orderId", "X1"), ("reserved", ""), ("txnAmt", "100")]);
        assert_eq!(fields.canonical_string(), "orderId=X1&txnAmt=100");
        // The input itself is untouched.
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn sort_is_bytewise_and_idempotent() {
        let fields = list(&[("b", "1"), ("B", "2"), ("a", "3"), ("_x", "4"), ("A1", "5")]);
        let sorted = fields.sorted();
        let names: Vec<&str> = sorted.names().collect();
        assert_eq!(names, vec!["A1", "B", "_x", "a", "b"]);
        assert_eq!(sorted.sorted(), sorted);
    }

    #[test]
    fn remove_empty_is_idempotent_and_keeps_order() {
        let fields = list(&[("z", "1"), ("y", ""), ("x", "2"), ("w", "")]);
        let once = fields.remove_empty();
        assert_eq!(once.names().collect::<Vec<_>>(), vec!["z", "x"]);
        assert_eq!(once.remove_empty(), once);
    }

    #[test]
    fn join_has_no_trailing_separator() {
        assert_eq!(list(&[("a", "1")]).join(), "a=1");
        assert_eq!(list(&[("a", "1"), ("b", "")]).join(), "a=1&b=");
        assert_eq!(FieldList::new().join(), "");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = FieldList::try_from_pairs([("a", "1"), ("a", "2")]);
        assert!(matches!(result, Err(Error::DuplicateField(name)) if name == "a"));
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut fields = FieldList::new();
        assert!(matches!(fields.push("", "x"), Err(Error::EmptyFieldName)));
    }

    #[test]
    fn response_body_splits_on_first_equals_only() {
        let fields =
            FieldList::parse_response_body("respCode=00&signature=ab+c/d==&reserved={a=b}&junk")
                .unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("respCode"), Some("00"));
        assert_eq!(fields.get("signature"), Some("ab+c/d=="));
        assert_eq!(fields.get("reserved"), Some("{a=b}"));
        assert_eq!(fields.get("junk"), None);
    }

    #[test]
    fn response_body_values_are_not_percent_decoded() {
        let fields = FieldList::parse_response_body("respMsg=Success%21&orderId=X1").unwrap();
        assert_eq!(fields.get("respMsg"), Some("Success%21"));
    }

    #[test]
    fn form_urlencoded_encodes_reserved_characters() {
        let fields = list(&[("signature", "a+b/c=="), ("backUrl", "https://m.example.com/n?x=1")]);
        let encoded = fields.to_form_urlencoded().unwrap();
        assert_eq!(
            encoded,
            "signature=a%2Bb%2Fc%3D%3D&backUrl=https%3A%2F%2Fm.example.com%2Fn%3Fx%3D1"
        );
        assert_eq!(
            FieldList::from_form_urlencoded(encoded.as_bytes()).unwrap(),
            fields
        );
    }

    #[test]
    fn remove_and_without() {
        let mut fields = list(&[("a", "1"), ("signature", "s"), ("b", "2")]);
        assert_eq!(fields.without("signature").len(), 2);
        assert_eq!(fields.remove("signature").as_deref(), Some("s"));
        assert_eq!(fields.remove("signature"), None);
        assert_eq!(fields.join(), "a=1&b=2");
    }

    #[test]
    fn retain_names_filters_unknown_fields() {
        let fields = list(&[("a", "1"), ("extra", "x"), ("b", "2")]);
        assert_eq!(fields.retain_names(&["a", "b", "c"]).join(), "a=1&b=2");
    }
}
