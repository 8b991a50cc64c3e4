use syn::{Attribute, LitStr};

/// Find a single `#[astm("...")]` attribute on a field or struct and
/// return its literal string, if present.
pub fn astm_attr(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut found = None;
    for attr in attrs {
        if !attr.path().is_ident("astm") {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate `astm` annotation"));
        }
        let lit: LitStr = attr.parse_args()?;
        found = Some(lit.value());
    }
    Ok(found)
}
