use proc_macro::TokenStream;

use syn::{Attribute, Lit, Meta, NestedMeta};

mod from_fields;

/// Derive `unionpay::response::FromFields` for a struct of `String` slots.
///
/// Every named field maps to the protocol field of the same name in
/// lowerCamelCase (`query_id` reads `queryId`). Use
/// `#[unionpay(rename = "...")]` to pick another name and `#[unionpay(skip)]`
/// to leave a slot out of the table. Inside the `unionpay` crate itself, add
/// `#[unionpay(crate = "crate")]` on the struct.
///
/// ```ignore
/// use unionpay::response::FromFields;
///
/// #[derive(Default, FromFields)]
/// struct Minimal {
///     resp_code: String,
///     #[unionpay(rename = "tn")]
///     token: String,
/// }
/// ```
#[proc_macro_derive(FromFields, attributes(unionpay))]
pub fn derive_from_fields(input: TokenStream) -> TokenStream {
    from_fields::derive(input)
}

// Attribute for setting the path to the unionpay crate, mostly for use
// internally in unionpay to refer to itself as 'crate'.
fn crate_path(attr: &Attribute) -> Option<String> {
    string_argument(attr, "crate")
}

fn rename(attr: &Attribute) -> Option<String> {
    string_argument(attr, "rename")
}

fn is_skipped(attr: &Attribute) -> bool {
    match get_unionpay_attributes(attr) {
        Some(ms) => ms,
        None => return false,
    }
    .any(|nested_meta| match nested_meta {
        NestedMeta::Meta(meta) => meta.path().is_ident("skip"),
        _ => false,
    })
}

fn string_argument(attr: &Attribute, name: &str) -> Option<String> {
    get_unionpay_attributes(attr)?
        .filter_map(|nested_meta| {
            let meta = match nested_meta {
                NestedMeta::Meta(meta) => meta,
                _ => return None,
            };
            match meta {
                Meta::NameValue(pair) => {
                    if !pair.path.is_ident(name) {
                        return None;
                    }
                    if let Lit::Str(s) = pair.lit {
                        Some(s.value())
                    } else {
                        None
                    }
                }
                _ => None,
            }
        })
        .next()
}

fn get_unionpay_attributes(attr: &Attribute) -> Option<syn::punctuated::IntoIter<NestedMeta>> {
    match attr.parse_meta().ok()? {
        Meta::List(ml) => {
            if !ml.path.is_ident("unionpay") {
                return None;
            }
            Some(ml.nested.into_iter())
        }
        _ => None,
    }
}

/// `snake_case` to `lowerCamelCase`, the naming used on the wire.
fn to_lower_camel_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let mut upper_next = false;
    for c in ident.trim_start_matches("r#").chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
