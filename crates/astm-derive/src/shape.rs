//! Classifies a field's Rust type into the sum type spec §9 calls for
//! ("Struct annotation as sum type"), purely syntactically: derive macros
//! run before type checking, so this is a best-effort read of the type
//! path rather than a resolved-type query. Real record definitions in
//! `astm-lis2a2` are written to fit this reading (scalar leaves are
//! `String`/`i64`/`f64`/`chrono::DateTime<Utc>`, optionally wrapped in
//! `Option<_>`; substructure leaves are any other named type; arrays are
//! `Vec<_>` of either). A field built on `wire_scalar_enum!` looks exactly
//! like a substructure leaf to this syntactic read, so it's only
//! recognized when the field's own annotation carries a `scalar`
//! attribute — see `classify`'s `declared_scalar` parameter.
use syn::{GenericArgument, PathArguments, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaf {
    String,
    Int,
    Float,
    Timestamp,
    /// A custom scalar built with `wire_scalar_enum!`: syntactically
    /// indistinguishable from `Substructure` (both are just "some other
    /// named type" to a pre-typeck read), disambiguated by the field's own
    /// `scalar` attribute rather than its type path.
    Enum,
    Substructure,
}

pub struct FieldShape {
    pub is_array: bool,
    pub is_optional: bool,
    pub leaf: Leaf,
    /// The innermost named type, with `Vec`/`Option` wrappers stripped,
    /// used to call that type's own generated `Fragment` impl for
    /// substructure leaves.
    pub inner_type: Type,
}

/// `declared_scalar` is the field's own `scalar` attribute (spec §4.D step
/// 2): when set, a type that would otherwise read as `Leaf::Substructure`
/// is instead classified `Leaf::Enum` (a `wire_scalar_enum!` leaf). It has
/// no effect on a type already recognized as a builtin scalar.
pub fn classify(ty: &Type, declared_scalar: bool) -> FieldShape {
    if let Some(inner) = unwrap_generic(ty, "Vec") {
        let (is_optional, leaf, inner_type) = classify_scalar(&inner, declared_scalar);
        return FieldShape { is_array: true, is_optional, leaf, inner_type };
    }
    let (is_optional, leaf, inner_type) = classify_scalar(ty, declared_scalar);
    FieldShape { is_array: false, is_optional, leaf, inner_type }
}

fn classify_scalar(ty: &Type, declared_scalar: bool) -> (bool, Leaf, Type) {
    if let Some(inner) = unwrap_generic(ty, "Option") {
        let leaf = leaf_of(&inner, declared_scalar);
        (true, leaf, inner)
    } else {
        let leaf = leaf_of(ty, declared_scalar);
        (false, leaf, ty.clone())
    }
}

fn leaf_of(ty: &Type, declared_scalar: bool) -> Leaf {
    let fallback = if declared_scalar { Leaf::Enum } else { Leaf::Substructure };
    let Type::Path(p) = ty else { return fallback };
    let Some(seg) = p.path.segments.last() else { return fallback };
    match seg.ident.to_string().as_str() {
        "String" => Leaf::String,
        "i64" | "i32" | "u32" | "u64" => Leaf::Int,
        "f64" | "f32" => Leaf::Float,
        "DateTime" => Leaf::Timestamp,
        _ => fallback,
    }
}

fn unwrap_generic(ty: &Type, name: &str) -> Option<Type> {
    let Type::Path(p) = ty else { return None };
    let seg = p.path.segments.last()?;
    if seg.ident != name {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &seg.arguments else { return None };
    args.args.iter().find_map(|a| match a {
        GenericArgument::Type(t) => Some(t.clone()),
        _ => None,
    })
}
