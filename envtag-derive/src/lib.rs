//! Derive macro implementation for envtag

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::{FieldAttrs, StructAttrs};

/// `Env` derive macro
///
/// Implements `envtag::Fields` and `envtag::Target` so the struct can be
/// filled with `envtag::parse` or `envtag::Parser`, or nested inside another
/// derived struct.
///
/// # Supported Attributes
///
/// **Struct-level**:
/// - `#[env(text)]`: annotated fields of this type use its `FromEnvText` impl
///
/// **Field-level**:
/// - `#[env("NAME")]` or `#[env(name = "NAME")]`: read from variable `NAME`
/// - `#[env]`: read from the upper-cased field name
/// - `#[env(skip)]`: never touch this field
///
/// Private fields are never touched either.
///
/// # Example
///
/// See the `envtag` crate documentation for usage examples.
#[proc_macro_derive(Env, attributes(env))]
pub fn derive_env(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let struct_attrs = StructAttrs::from_input(input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit | Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "Env only supports structs with named fields",
                ))
            }
        },
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(data.enum_token, "Env only supports structs"))
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(data.union_token, "Env only supports structs"))
        }
    };

    // One FieldRef per field, in declaration order
    let entries = fields
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
            let name = ident.unraw().to_string();
            let attrs = FieldAttrs::from_field(field)?;

            if !attrs.is_settable(&field.vis) {
                return Ok(quote! { ::envtag::FieldRef::locked(#name) });
            }

            let key = match attrs.key {
                None => quote! { ::core::option::Option::None },
                Some(None) => {
                    let upper = name.to_uppercase();
                    quote! { ::core::option::Option::Some(#upper) }
                }
                Some(Some(key)) => quote! { ::core::option::Option::Some(#key) },
            };

            Ok(quote! { ::envtag::FieldRef::new(#name, #key, &mut self.#ident) })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let text_slot = if struct_attrs.text {
        quote! {
            fn text_slot(&mut self) -> ::core::option::Option<&mut dyn ::envtag::TextSlot> {
                ::core::option::Option::Some(self)
            }
        }
    } else {
        TokenStream2::new()
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::envtag::Fields for #struct_name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::envtag::FieldRef<'_>> {
                ::std::vec![#(#entries),*]
            }
        }

        impl #impl_generics ::envtag::Target for #struct_name #ty_generics #where_clause {
            #text_slot

            fn kind(&mut self) -> ::envtag::Kind<'_> {
                ::envtag::Kind::Struct(self)
            }
        }
    })
}
