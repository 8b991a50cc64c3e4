//! Compile-time replacement for the source's runtime reflection over
//! struct tags (spec §9 "Reflection-driven dispatch → tagged schema at
//! build time"). `#[derive(Fragment)]` generates the field-level
//! encode/decode dispatch for a record line or a substructure leaf;
//! `#[derive(Structure)]` generates the tree-walking dispatch for a
//! composite or message container.

mod attrs;
mod fragment_derive;
mod shape;
mod structure_derive;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

#[proc_macro_derive(Fragment, attributes(astm))]
pub fn derive_fragment(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    fragment_derive::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

#[proc_macro_derive(Structure, attributes(astm))]
pub fn derive_structure(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    structure_derive::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
