use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use astm_schema::annotation::FieldAnnotation;

use crate::attrs::astm_attr;
use crate::shape::{classify, Leaf};

struct Plan {
    ident: syn::Ident,
    field: u32,
    component: Option<u32>,
    is_array: bool,
    is_optional: bool,
    leaf: Leaf,
    inner_type: syn::Type,
    annotation: FieldAnnotation,
}

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = input.ident.clone();
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input, "Fragment can only be derived for structs"));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(&input, "Fragment requires named fields"));
    };

    let mut plans = Vec::new();
    for field in &fields.named {
        let ident = field.ident.clone().unwrap();
        let raw = astm_attr(&field.attrs)?.ok_or_else(|| {
            syn::Error::new_spanned(&field, format!("field `{ident}` is missing an #[astm(\"...\")] annotation"))
        })?;
        let declared_scalar = has_scalar_attr(&raw);
        let shape = classify(&field.ty, declared_scalar);
        let is_substructure = shape.leaf == Leaf::Substructure;
        let annotation = FieldAnnotation::parse(&raw, shape.is_array, is_substructure)
            .map_err(|e| syn::Error::new_spanned(&field, format!("{e}")))?;
        plans.push(Plan {
            ident,
            field: annotation.field,
            component: annotation.component,
            is_array: shape.is_array,
            is_optional: shape.is_optional,
            leaf: shape.leaf,
            inner_type: shape.inner_type,
            annotation,
        });
    }

    let encode_stmts = plans.iter().map(encode_stmt);
    let decode_stmts = plans.iter().map(decode_stmt);
    let field_idents = plans.iter().map(|p| &p.ident);

    Ok(quote! {
        impl ::astm_codec::Fragment for #name {
            fn encode_fields(
                &self,
                seq: u32,
                cfg: &::astm_codec::config::Config,
                delimiters: &::astm_schema::Delimiters,
            ) -> ::std::collections::BTreeMap<u32, String> {
                let mut __out: ::std::collections::BTreeMap<u32, String> = ::std::collections::BTreeMap::new();
                let mut __components: ::std::collections::BTreeMap<u32, ::std::collections::BTreeMap<u32, String>> =
                    ::std::collections::BTreeMap::new();
                #(#encode_stmts)*
                for (position, parts) in __components {
                    __out.insert(position, ::astm_codec::line::encode_component_map(&parts, delimiters));
                }
                __out
            }

            fn decode_fields(
                tokens: &[&str],
                cfg: &::astm_codec::config::Config,
                delimiters: &::astm_schema::Delimiters,
            ) -> Result<Self, ::astm_schema::Error> {
                #(#decode_stmts)*
                Ok(#name { #(#field_idents),* })
            }
        }
    })
}

/// Cheap pre-scan for a `scalar` attribute token, done ahead of the full
/// `FieldAnnotation::parse` because the field's shape (needed to tell
/// `parse` whether this is a substructure) depends on it.
fn has_scalar_attr(raw: &str) -> bool {
    let mut parts = raw.splitn(2, ',');
    parts.next();
    parts.next().is_some_and(|rest| rest.split(',').any(|tok| tok == "scalar"))
}

fn encode_leaf_expr(leaf: Leaf, value_expr: TokenStream, longdate: bool, length: Option<u32>) -> TokenStream {
    match leaf {
        Leaf::Float => {
            let length_tok = match length {
                Some(n) => quote! { Some(#n) },
                None => quote! { None },
            };
            quote! {
                ::astm_codec::line::format_float(*(#value_expr), #length_tok, if cfg.round_fixed_numbers {
                    ::astm_codec::config::RoundingPolicy::Round
                } else {
                    ::astm_codec::config::RoundingPolicy::Truncate
                })
            }
        }
        Leaf::Substructure => {
            quote! { {
                let __fields = ::astm_codec::Fragment::encode_fields(#value_expr, seq, cfg, delimiters);
                ::astm_codec::line::encode_component_map(&__fields, delimiters)
            } }
        }
        Leaf::Timestamp => {
            quote! { ::astm_schema::value::encode_timestamp(#value_expr, #longdate, cfg.time_zone) }
        }
        _ => quote! { ::astm_schema::WireScalar::encode_token(#value_expr, #longdate) },
    }
}

fn encode_stmt(plan: &Plan) -> TokenStream {
    let ident = &plan.ident;
    let field = plan.field;
    let longdate = plan.annotation.longdate;
    let length = plan.annotation.length;
    let is_sequence = plan.annotation.sequence;

    if is_sequence {
        return quote! {
            __out.insert(#field, seq.to_string());
        };
    }

    if plan.is_array {
        let elem_expr = encode_leaf_expr(plan.leaf, quote! { __elem }, longdate, length);
        return quote! {
            {
                let __rendered: Vec<String> = self.#ident.iter().map(|__elem| #elem_expr).collect();
                let __joined = __rendered.join(&(delimiters.repeat as char).to_string());
                __out.insert(#field, __joined);
            }
        };
    }

    if let Some(component) = plan.component {
        let expr = if plan.is_optional {
            let inner = encode_leaf_expr(plan.leaf, quote! { __v }, longdate, length);
            quote! { match &self.#ident { Some(__v) => #inner, None => String::new() } }
        } else {
            encode_leaf_expr(plan.leaf, quote! { &self.#ident }, longdate, length)
        };
        return quote! {
            __components.entry(#field).or_default().insert(#component, #expr);
        };
    }

    let expr = if plan.is_optional {
        let inner = encode_leaf_expr(plan.leaf, quote! { __v }, longdate, length);
        quote! { match &self.#ident { Some(__v) => #inner, None => String::new() } }
    } else {
        encode_leaf_expr(plan.leaf, quote! { &self.#ident }, longdate, length)
    };
    quote! {
        __out.insert(#field, #expr);
    }
}

fn decode_leaf_expr(leaf: Leaf, ty: &syn::Type, token_expr: TokenStream, longdate: bool) -> TokenStream {
    match leaf {
        Leaf::Substructure => quote! {
            {
                let __components = ::astm_codec::line::split_substructure(#token_expr, delimiters);
                <#ty as ::astm_codec::Fragment>::decode_fields(&__components, cfg, delimiters)?
            }
        },
        Leaf::Timestamp => quote! {
            ::astm_schema::value::decode_timestamp(#token_expr, #longdate, cfg.time_zone)?
        },
        _ => quote! {
            <#ty as ::astm_schema::WireScalar>::decode_token(#token_expr, #longdate)?
        },
    }
}

fn decode_stmt(plan: &Plan) -> TokenStream {
    let ident = &plan.ident;
    let field = plan.field;
    let longdate = plan.annotation.longdate;
    let required = plan.annotation.required;
    let ty = &plan.inner_type;

    if plan.is_array {
        let elem_expr = decode_leaf_expr(plan.leaf, ty, quote! { __tok }, longdate);
        return quote! {
            let #ident = {
                let __raw = ::astm_codec::line::field_at(tokens, #field);
                let __toks = ::astm_codec::line::split_array(__raw, delimiters);
                if #required && __toks.is_empty() {
                    return Err(::astm_schema::Error::RequiredFieldMissing { field: #field, component: None });
                }
                __toks
                    .into_iter()
                    .map(|__tok| -> Result<_, ::astm_schema::Error> { Ok(#elem_expr) })
                    .collect::<Result<Vec<_>, _>>()?
            };
        };
    }

    if let Some(component) = plan.component {
        let elem_expr = decode_leaf_expr(plan.leaf, ty, quote! { __tok }, longdate);
        let wrapped = if plan.is_optional {
            quote! {
                if __tok.is_empty() { None } else { Some(#elem_expr) }
            }
        } else {
            quote! { #elem_expr }
        };
        return quote! {
            let #ident = {
                let __raw = ::astm_codec::line::field_at(tokens, #field);
                let __components = ::astm_codec::line::split_substructure(__raw, delimiters);
                let __tok = ::astm_codec::line::component_at(&__components, #component);
                if #required && __tok.is_empty() {
                    return Err(::astm_schema::Error::RequiredFieldMissing { field: #field, component: Some(#component) });
                }
                #wrapped
            };
        };
    }

    let elem_expr = decode_leaf_expr(plan.leaf, ty, quote! { __tok }, longdate);
    let wrapped = if plan.is_optional {
        quote! {
            if __tok.is_empty() { None } else { Some(#elem_expr) }
        }
    } else {
        quote! { #elem_expr }
    };
    quote! {
        let #ident = {
            let __tok = ::astm_codec::line::field_at(tokens, #field);
            if #required && __tok.is_empty() {
                return Err(::astm_schema::Error::RequiredFieldMissing { field: #field, component: None });
            }
            #wrapped
        };
    }
}
