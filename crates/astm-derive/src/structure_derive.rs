use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use astm_schema::annotation::StructAnnotation;

use crate::attrs::astm_attr;
use crate::shape::classify;

struct Plan {
    ident: syn::Ident,
    is_array: bool,
    inner_type: syn::Type,
    record_name: Option<char>,
    required: bool,
    /// `subname:VALUE` from the struct annotation, carried through only to
    /// label the decode-attempt trace event; never affects dispatch.
    subname: Option<String>,
}

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = input.ident.clone();
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input, "Structure can only be derived for structs"));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(&input, "Structure requires named fields"));
    };

    let mut plans = Vec::new();
    for field in &fields.named {
        let ident = field.ident.clone().unwrap();
        let raw = astm_attr(&field.attrs)?;
        let annotation = StructAnnotation::parse(raw.as_deref())
            .map_err(|e| syn::Error::new_spanned(&field, format!("{e}")))?;
        // Composite fields are never `scalar`-marked: that attribute only
        // disambiguates a `Fragment` leaf from a substructure, which has no
        // meaning for a `Structure` field (record, record array, or nested
        // composite).
        let shape = classify(&field.ty, false);
        let record_name = match &annotation.record_name {
            Some(s) => Some(s.chars().next().unwrap()),
            None => None,
        };
        plans.push(Plan {
            ident,
            is_array: shape.is_array,
            inner_type: shape.inner_type,
            record_name,
            required: annotation.required,
            subname: annotation.subname,
        });
    }

    let encode_stmts: Vec<TokenStream> = plans
        .iter()
        .enumerate()
        .map(|(i, p)| encode_stmt(i, p))
        .collect();
    let decode_stmts: Vec<TokenStream> = plans
        .iter()
        .enumerate()
        .map(|(i, p)| decode_stmt(i, p))
        .collect();
    let field_idents: Vec<&syn::Ident> = plans.iter().map(|p| &p.ident).collect();
    let leading_letter_expr = leading_letter_expr(plans.first());

    Ok(quote! {
        impl ::astm_codec::Structure for #name {
            fn leading_letter() -> Option<char> {
                #leading_letter_expr
            }

            fn encode_into(
                &self,
                seq: u32,
                delimiters: &::astm_schema::Delimiters,
                cfg: &::astm_codec::config::Config,
                depth: &mut ::astm_codec::Depth,
                out: &mut Vec<String>,
            ) -> Result<(), ::astm_schema::Error> {
                depth.enter()?;
                let __result: Result<(), ::astm_schema::Error> = (|| {
                    #(#encode_stmts)*
                    Ok(())
                })();
                depth.exit();
                __result
            }

            fn decode_from(
                cursor: &mut ::astm_codec::cursor::Cursor,
                seq: u32,
                delimiters: &mut ::astm_schema::Delimiters,
                cfg: &::astm_codec::config::Config,
                depth: &mut ::astm_codec::Depth,
            ) -> Result<Self, ::astm_schema::Error> {
                depth.enter()?;
                let __result: Result<Self, ::astm_schema::Error> = (|| {
                    #(#decode_stmts)*
                    Ok(#name { #(#field_idents),* })
                })();
                depth.exit();
                __result
            }
        }
    })
}

/// The letter a line must start with to possibly belong to this struct: the
/// first field's own record letter, or (if the first field is a composite)
/// that field's `leading_letter`. A struct with no fields can't tell, so it
/// reports `None` and falls back to attempting a full decode.
fn leading_letter_expr(first: Option<&Plan>) -> TokenStream {
    match first {
        None => quote! { None },
        Some(plan) => match plan.record_name {
            Some(c) => quote! { Some(#c) },
            None => {
                let ty = &plan.inner_type;
                quote! { <#ty as ::astm_codec::Structure>::leading_letter() }
            }
        },
    }
}

fn encode_stmt(index: usize, plan: &Plan) -> TokenStream {
    let ident = &plan.ident;
    match (plan.record_name.is_some(), plan.is_array) {
        (true, false) => quote! {
            out.push(::astm_codec::fragment::encode_record(
                &self.#ident,
                ::astm_codec::structure::sibling_sequence(#index, seq),
                delimiters,
                cfg,
            )?);
        },
        (true, true) => quote! {
            for (__i, __elem) in self.#ident.iter().enumerate() {
                out.push(::astm_codec::fragment::encode_record(__elem, __i as u32 + 1, delimiters, cfg)?);
            }
        },
        (false, false) => quote! {
            ::astm_codec::Structure::encode_into(
                &self.#ident,
                ::astm_codec::structure::sibling_sequence(#index, seq),
                delimiters,
                cfg,
                depth,
                out,
            )?;
        },
        (false, true) => quote! {
            for (__i, __elem) in self.#ident.iter().enumerate() {
                ::astm_codec::Structure::encode_into(__elem, __i as u32 + 1, delimiters, cfg, depth, out)?;
            }
        },
    }
}

fn decode_stmt(index: usize, plan: &Plan) -> TokenStream {
    let ident = &plan.ident;
    let ty = &plan.inner_type;
    let required = plan.required;
    let letter_expr = plan
        .record_name
        .map(|c| quote! { #c })
        .unwrap_or(quote! { '?' });

    let subname_trace = plan.subname.as_ref().map(|s| {
        quote! { tracing::trace!(subname = #s, "decoding record via subname alias"); }
    });

    match (plan.record_name.is_some(), plan.is_array) {
        (true, false) => quote! {
            #subname_trace
            let __expected_seq = ::astm_codec::structure::sibling_sequence(#index, seq);
            let #ident = ::astm_codec::structure::decode_scalar(
                cursor,
                #letter_expr,
                #required,
                |__line| ::astm_codec::fragment::decode_record::<#ty>(__line, __expected_seq, delimiters, cfg),
            )?
            .unwrap_or_default();
        },
        (true, true) => quote! {
            #subname_trace
            let #ident: Vec<#ty> = ::astm_codec::structure::decode_array(
                cursor,
                #required,
                #letter_expr,
                |__line, __seq| ::astm_codec::fragment::decode_record::<#ty>(__line, __seq, delimiters, cfg),
            )?;
        },
        (false, false) => quote! {
            let __inherited_seq = ::astm_codec::structure::sibling_sequence(#index, seq);
            let #ident = <#ty as ::astm_codec::Structure>::decode_from(cursor, __inherited_seq, delimiters, cfg, depth)?;
        },
        (false, true) => quote! {
            let #ident: Vec<#ty> = {
                let mut __collected = Vec::new();
                let mut __seq = 1u32;
                loop {
                    let __next_matches = match cursor.peek() {
                        None => false,
                        Some(__line) => match <#ty as ::astm_codec::Structure>::leading_letter() {
                            Some(__letter) => __line.as_bytes().first() == Some(&(__letter as u8)),
                            // No single-line signal available; the only way
                            // to find out is to attempt the decode, same as
                            // a depth-one struct would.
                            None => true,
                        },
                    };
                    if !__next_matches {
                        break;
                    }
                    let __value = <#ty as ::astm_codec::Structure>::decode_from(cursor, __seq, delimiters, cfg, depth)?;
                    __collected.push(__value);
                    __seq += 1;
                }
                if #required && __collected.is_empty() {
                    return Err(::astm_schema::Error::RequiredRecordMissing(#letter_expr));
                }
                __collected
            };
        },
    }
}
