use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, DeriveInput, Fields, LitStr};

/// Derives `rowjoin::Record`, `rowjoin::StaticShape` and `rowjoin::FromValues`.
///
/// Field attributes:
/// - `#[record(rename = "name")]` uses `name` as the field's name in the shape.
/// - `#[record(skip)]` leaves the field out of the shape; it is constructed
///   with `Default::default()`.
///
/// Struct attributes:
/// - `#[record(name = "Name")]` overrides the shape name.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct FieldSpec {
    ident: syn::Ident,
    ty: syn::Type,
    name: String,
    skip: bool,
}

fn impl_record(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "Record cannot be derived for generic structs",
        ));
    }

    let data = match &input.data {
        syn::Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let fields = match &data.fields {
        Fields::Named(named) => &named.named,
        _ => {
            return Err(syn::Error::new(
                input.span(),
                "Record requires named fields",
            ))
        }
    };

    let mut shape_name = struct_ident.to_string();
    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                shape_name = lit.value();
                Ok(())
            } else {
                Err(meta.error("unsupported struct attribute, expected `name`"))
            }
        })?;
    }

    let mut specs = Vec::with_capacity(fields.len());

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new(field.span(), "Expected named field"))?
            .clone();
        let ty = field.ty.clone();

        let mut rename: Option<String> = None;
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    rename = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported field attribute, expected `rename` or `skip`"))
                }
            })?;
        }

        if skip && rename.is_some() {
            return Err(syn::Error::new(
                field.span(),
                "`skip` and `rename` cannot be combined",
            ));
        }

        let name = rename.unwrap_or_else(|| ident.to_string());
        specs.push(FieldSpec {
            ident,
            ty,
            name,
            skip,
        });
    }

    let shaped: Vec<&FieldSpec> = specs.iter().filter(|spec| !spec.skip).collect();
    let arity = shaped.len();

    let field_defs = shaped.iter().map(|spec| {
        let FieldSpec { ty, name, .. } = spec;
        quote! {
            ::rowjoin::FieldDef::new(#name, <#ty as ::rowjoin::FieldValue>::FIELD_TYPE)
        }
    });

    let accessors = shaped.iter().enumerate().map(|(index, spec)| {
        let ident = &spec.ident;
        quote! {
            #index => ::core::option::Option::Some(::rowjoin::FieldValue::to_value(&self.#ident))
        }
    });

    let inits = specs.iter().map(|spec| {
        let FieldSpec {
            ident,
            ty,
            name,
            skip,
        } = spec;
        if *skip {
            quote! { #ident: ::core::default::Default::default() }
        } else {
            quote! { #ident: ::rowjoin::__private::take_field::<#ty>(&mut values, #name)? }
        }
    });

    Ok(quote! {
        impl ::rowjoin::StaticShape for #struct_ident {
            fn static_shape() -> &'static ::rowjoin::Shape {
                ::rowjoin::__private::lazy_static! {
                    static ref SHAPE: ::rowjoin::Shape = {
                        let fields: ::std::vec::Vec<::rowjoin::FieldDef> = ::std::vec![
                            #(#field_defs),*
                        ];
                        ::rowjoin::Shape::new(#shape_name, fields)
                    };
                }
                &*SHAPE
            }
        }

        impl ::rowjoin::Record for #struct_ident {
            fn shape(&self) -> &::rowjoin::Shape {
                <Self as ::rowjoin::StaticShape>::static_shape()
            }

            fn field(&self, index: usize) -> ::core::option::Option<::rowjoin::Value> {
                match index {
                    #(#accessors,)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::rowjoin::FromValues for #struct_ident {
            #[allow(unused_mut, unused_variables)]
            fn from_values(
                values: ::std::vec::Vec<::rowjoin::Value>,
            ) -> ::core::result::Result<Self, ::rowjoin::ConstructError> {
                ::rowjoin::__private::check_arity(#arity, &values)?;
                let mut values = values.into_iter();
                ::core::result::Result::Ok(Self {
                    #(#inits,)*
                })
            }
        }
    })
}
