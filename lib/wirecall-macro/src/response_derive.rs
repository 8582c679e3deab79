//! `#[derive(ResponseTarget)]` expansion.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Member, parse2};

use crate::attrs::{parse_response_field, parse_response_options};

/// Expand `#[derive(ResponseTarget)]`.
pub(crate) fn expand_response_target(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let options = parse_response_options(&input.attrs)?;
    if options.capture && options.unmarshal {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "a response target either captures or unmarshals the body, not both",
        ));
    }

    let syn::Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input,
            "ResponseTarget derive only supports structs",
        ));
    };

    let mut status = None;
    let mut error = None;
    let mut preserved = Vec::new();
    for (index, field) in data.fields.iter().enumerate() {
        let kind = parse_response_field(field)?;
        if !kind.is_capability() {
            continue;
        }
        let member = field
            .ident
            .clone()
            .map_or_else(|| Member::from(index), Member::Named);
        if kind.status && status.replace(member.clone()).is_some() {
            return Err(syn::Error::new_spanned(field, "duplicate `status` field"));
        }
        if kind.error && error.replace(member.clone()).is_some() {
            return Err(syn::Error::new_spanned(field, "duplicate `error` field"));
        }
        preserved.push(member);
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let status_receiver = status.map(|member| {
        quote! {
            fn status_receiver(
                &mut self,
            ) -> ::std::option::Option<&mut dyn ::wirecall::StatusReceiver> {
                ::std::option::Option::Some(&mut self.#member)
            }
        }
    });
    let error_receiver = error.map(|member| {
        quote! {
            fn error_receiver(
                &mut self,
            ) -> ::std::option::Option<&mut dyn ::wirecall::ErrorReceiver> {
                ::std::option::Option::Some(&mut self.#member)
            }
        }
    });
    let body_capture = options.capture.then(|| {
        quote! {
            fn body_capture(&mut self) -> ::std::option::Option<&mut dyn ::wirecall::CaptureBody> {
                ::std::option::Option::Some(self)
            }
        }
    });
    let custom_unmarshal = options.unmarshal.then(|| {
        quote! {
            fn custom_unmarshal(
                &mut self,
            ) -> ::std::option::Option<&mut dyn ::wirecall::UnmarshalBody> {
                ::std::option::Option::Some(self)
            }
        }
    });

    let decode_json = if options.capture || options.unmarshal {
        quote! {
            fn decode_json(&mut self, _body: &[u8]) -> ::wirecall::Result<()> {
                ::std::result::Result::Ok(())
            }
        }
    } else if preserved.is_empty() {
        quote! {
            fn decode_json(&mut self, body: &[u8]) -> ::wirecall::Result<()> {
                *self = ::wirecall::from_json(body)?;
                ::std::result::Result::Ok(())
            }
        }
    } else {
        // Capability fields were filled before decoding; keep them.
        quote! {
            fn decode_json(&mut self, body: &[u8]) -> ::wirecall::Result<()> {
                let mut decoded: Self = ::wirecall::from_json(body)?;
                #(::std::mem::swap(&mut decoded.#preserved, &mut self.#preserved);)*
                *self = decoded;
                ::std::result::Result::Ok(())
            }
        }
    };

    Ok(quote! {
        impl #impl_generics ::wirecall::ResponseTarget for #ident #ty_generics #where_clause {
            #status_receiver
            #body_capture
            #error_receiver
            #custom_unmarshal
            #decode_json
        }
    })
}
