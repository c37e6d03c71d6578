use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, FieldsNamed, Ident, LitStr};

pub fn derive(input: TokenStream) -> TokenStream {
    let DeriveInput {
        ident, data, attrs, ..
    } = parse_macro_input!(input);
    let unionpay_path = Ident::new(
        &attrs
            .iter()
            .filter_map(super::crate_path)
            .next()
            .unwrap_or_else(|| "unionpay".to_owned()),
        Span::call_site(),
    );
    let struct_data = match data {
        Data::Struct(s) => s,
        Data::Enum(_) => {
            return quote! {
                compile_error!("cannot derive FromFields for enums");
            }
            .into()
        }
        Data::Union(_) => {
            return quote! {
                compile_error!("cannot derive FromFields for unions");
            }
            .into()
        }
    };

    match struct_data.fields {
        Fields::Named(f) => named_fields(unionpay_path, ident, f),
        _ => quote! {
            compile_error!("FromFields can only be derived for structs with named fields");
        }
        .into(),
    }
}

fn named_fields(unionpay_path: Ident, ident: Ident, input: FieldsNamed) -> TokenStream {
    let mut entries = quote! {};

    input
        .named
        .into_iter()
        .for_each(|Field { ident: field, attrs, .. }| {
            if attrs.iter().any(super::is_skipped) {
                return;
            }
            // Unwrap safety: this is a struct with named fields, so ident MUST be Some.
            let field = field.unwrap();
            let wire_name = attrs
                .iter()
                .filter_map(super::rename)
                .next()
                .unwrap_or_else(|| super::to_lower_camel_case(&field.to_string()));
            let wire_name = LitStr::new(&wire_name, field.span());

            entries.extend(quote! {
                (#wire_name, {
                    fn set(record: &mut #ident, value: ::std::string::String) {
                        record.#field = value;
                    }
                    set as #unionpay_path::response::Setter<#ident>
                }),
            });
        });

    let output = quote! {
        impl #unionpay_path::response::FromFields for #ident {
            fn field_table() -> &'static [(&'static str, #unionpay_path::response::Setter<Self>)] {
                const TABLE: &[(&str, #unionpay_path::response::Setter<#ident>)] = &[#entries];
                TABLE
            }
        }
    };

    output.into()
}
