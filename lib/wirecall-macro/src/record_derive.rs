//! `#[derive(Record)]` and `#[derive(HttpRequest)]` expansion.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{DeriveInput, Fields, FieldsNamed, parse2};

use crate::attrs::{
    FieldOptions, RecordOptions, parse_field_options, parse_record_options, type_name,
};
use crate::rename::RenameRule;

/// Expand `#[derive(Record)]`.
pub(crate) fn expand_record(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let options = parse_record_options(&input.attrs)?;
    let fields = named_fields(&input, "Record")?;
    record_impl(&input, &options, fields)
}

/// Expand `#[derive(HttpRequest)]`: the `Record` implementation plus the
/// route and the record-level capabilities.
pub(crate) fn expand_http_request(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let options = parse_record_options(&input.attrs)?;
    let fields = named_fields(&input, "HttpRequest")?;
    let record = record_impl(&input, &options, fields)?;

    let Some(method) = options.method else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "missing `#[request(method = \"...\")]`",
        ));
    };
    let Some(path) = options.path.as_deref() else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "missing `#[request(path = \"...\")]`",
        ));
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let name = record_name(&input, &options);
    let method = format_ident!("{}", method.as_str());

    let validator = options.validate.then(|| {
        quote! {
            fn validator(&self) -> ::std::option::Option<&dyn ::wirecall::Validate> {
                ::std::option::Option::Some(self)
            }
        }
    });
    let skip_validation = options.skip_client_validation.then(|| {
        quote! {
            fn skip_client_validation(&self) -> bool {
                true
            }
        }
    });
    let request_builder = options.build_request.then(|| {
        quote! {
            fn request_builder(&self) -> ::std::option::Option<&dyn ::wirecall::BuildRequest> {
                ::std::option::Option::Some(self)
            }
        }
    });
    let json_body = options.json_body.then(|| {
        quote! {
            fn json_body(&self) -> ::std::option::Option<&dyn ::wirecall::JsonBody> {
                ::std::option::Option::Some(self)
            }
        }
    });

    Ok(quote! {
        #record

        impl #impl_generics ::wirecall::HttpRequest for #ident #ty_generics #where_clause {
            fn route(&self) -> ::wirecall::RouteInfo {
                ::wirecall::RouteInfo::new(#name, ::wirecall::Method::#method, #path)
            }

            #validator
            #skip_validation
            #request_builder
            #json_body
        }
    })
}

fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> syn::Result<&'a FieldsNamed> {
    match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive} derive only supports structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} derive only supports structs"),
        )),
    }
}

fn record_name(input: &DeriveInput, options: &RecordOptions) -> String {
    options
        .name
        .clone()
        .unwrap_or_else(|| input.ident.unraw().to_string())
}

/// `Record` and `NestedRecord` implementations.
fn record_impl(
    input: &DeriveInput,
    options: &RecordOptions,
    fields: &FieldsNamed,
) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let name = record_name(input, options);

    let mut descriptors = Vec::with_capacity(fields.named.len());
    let mut values = Vec::with_capacity(fields.named.len());
    for field in &fields.named {
        let Some(member) = field.ident.as_ref() else {
            continue;
        };
        let field_options = parse_field_options(field)?;
        let field_name = member.unraw().to_string();
        descriptors.push(field_descriptor(
            &field_name,
            &type_name(&field.ty),
            &field_options,
            options.rename_all,
        ));
        values.push(field_value(member, &field_options));
    }

    Ok(quote! {
        impl #impl_generics ::wirecall::Record for #ident #ty_generics #where_clause {
            fn descriptor(&self) -> &'static ::wirecall::RecordDescriptor {
                static DESCRIPTOR: ::std::sync::OnceLock<::wirecall::RecordDescriptor> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| {
                    ::wirecall::RecordDescriptor::new(#name, &[#(#descriptors),*])
                })
            }

            fn field_values(&self) -> ::std::vec::Vec<::wirecall::FieldValue<'_>> {
                ::std::vec![#(#values),*]
            }
        }

        impl #impl_generics ::wirecall::NestedRecord for #ident #ty_generics #where_clause {
            fn as_record(&self) -> ::std::option::Option<&dyn ::wirecall::Record> {
                ::std::option::Option::Some(self)
            }
        }
    })
}

/// `FieldDescriptor` constructor expression for one field.
fn field_descriptor(
    ident: &str,
    type_name: &str,
    options: &FieldOptions,
    rename_all: Option<RenameRule>,
) -> TokenStream {
    let mut tags = quote!(::wirecall::FieldTags::new());
    if let Some(part) = &options.part {
        tags = quote!(#tags.request(#part));
    }
    if let Some(alias) = &options.alias {
        tags = quote!(#tags.alias(#alias));
    }
    if let Some(serialization) = options.serialization(ident, rename_all) {
        tags = quote!(#tags.serialization(#serialization));
    }
    if let Some(flag) = &options.url_encode {
        tags = quote!(#tags.url_encode(#flag));
    }
    if let Some(schema) = &options.schema {
        let location = format_ident!("{}", schema.location.variant());
        let name = &schema.name;
        let required = schema.required;
        tags = quote!(#tags.schema(::wirecall::Part::#location, #name, #required));
    }

    if options.nested {
        quote!(::wirecall::FieldDescriptor::nested(#ident, #type_name, #tags))
    } else {
        quote!(::wirecall::FieldDescriptor::new(#ident, #type_name, #tags))
    }
}

/// `FieldValue` expression for one field.
fn field_value(member: &syn::Ident, options: &FieldOptions) -> TokenStream {
    if !options.is_tagged() {
        return if options.nested {
            quote!(::wirecall::FieldValue::Nested(
                ::wirecall::NestedRecord::as_record(&self.#member)
            ))
        } else {
            quote!(::wirecall::FieldValue::Skipped)
        };
    }
    if options.is_json() {
        quote!(::wirecall::FieldValue::Json(&self.#member))
    } else {
        quote!(::wirecall::FieldValue::Scalar(&self.#member))
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use syn::{ImplItem, Item, ItemImpl};

    use super::*;

    fn impls(tokens: TokenStream) -> Vec<ItemImpl> {
        let_assert!(Ok(file) = syn::parse2::<syn::File>(tokens));
        file.items
            .into_iter()
            .filter_map(|item| match item {
                Item::Impl(item) => Some(item),
                _ => None,
            })
            .collect()
    }

    fn trait_name(item: &ItemImpl) -> String {
        item.trait_
            .as_ref()
            .and_then(|(_, path, _)| path.segments.last())
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default()
    }

    fn method_names(item: &ItemImpl) -> Vec<String> {
        item.items
            .iter()
            .filter_map(|item| match item {
                ImplItem::Fn(method) => Some(method.sig.ident.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn record_emits_record_and_nested_impls() {
        let input = quote! {
            struct Paging {
                #[request(query)]
                page: u32,
                #[request(query, alias = "per_page")]
                size: Option<u32>,
                internal: String,
            }
        };
        let_assert!(Ok(tokens) = expand_record(input));
        let impls = impls(tokens);
        let names: Vec<_> = impls.iter().map(trait_name).collect();
        check!(names == ["Record", "NestedRecord"]);
    }

    #[test]
    fn http_request_emits_route_and_capabilities() {
        let input = quote! {
            #[request(method = "POST", path = "/v1/items", json_body, validate)]
            struct CreateItem {
                name: String,
            }
        };
        let_assert!(Ok(tokens) = expand_http_request(input));
        let impls = impls(tokens);
        let_assert!(Some(http) = impls.iter().find(|item| trait_name(item) == "HttpRequest"));
        check!(method_names(http) == ["route", "validator", "json_body"]);
    }

    #[test]
    fn http_request_needs_method_and_path() {
        let input = quote! {
            #[request(path = "/v1/items")]
            struct NoMethod {}
        };
        let_assert!(Err(err) = expand_http_request(input));
        check!(err.to_string().contains("method"));

        let input = quote! {
            #[request(method = "GET")]
            struct NoPath {}
        };
        let_assert!(Err(err) = expand_http_request(input));
        check!(err.to_string().contains("path"));
    }

    #[test]
    fn only_named_structs() {
        let input = quote! { struct Tuple(u32); };
        let_assert!(Err(err) = expand_record(input));
        check!(err.to_string() == "Record derive only supports structs with named fields");

        let input = quote! { enum Choice { A, B } };
        let_assert!(Err(err) = expand_record(input));
        check!(err.to_string() == "Record derive only supports structs");
    }

    #[test]
    fn field_value_kinds() {
        let member = format_ident!("value");

        let tagged = FieldOptions {
            part: Some("header".to_string()),
            ..FieldOptions::default()
        };
        check!(field_value(&member, &tagged).to_string().contains("Scalar"));

        let json = FieldOptions {
            part: Some("query".to_string()),
            json: true,
            ..FieldOptions::default()
        };
        check!(field_value(&member, &json).to_string().contains("Json"));

        let nested = FieldOptions {
            nested: true,
            ..FieldOptions::default()
        };
        check!(field_value(&member, &nested).to_string().contains("Nested"));

        let untagged = FieldOptions::default();
        check!(field_value(&member, &untagged).to_string().contains("Skipped"));
    }

    #[test]
    fn descriptor_carries_serialization_alias() {
        let options = FieldOptions {
            part: Some("query!".to_string()),
            ..FieldOptions::default()
        };
        let tokens = field_descriptor("page_size", "u32", &options, Some(RenameRule::CamelCase));
        let rendered = tokens.to_string();
        check!(rendered.contains("\"query!\""));
        check!(rendered.contains("\"pageSize\""));
        check!(rendered.contains("FieldDescriptor :: new"));
    }
}
