use crate::attribute::Attribute;
use crate::error::Error;

/// A parsed `#[astm("F[.C][,attr[:val]]")]` field annotation (spec §4.A).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAnnotation {
    pub field: u32,
    pub component: Option<u32>,
    pub required: bool,
    pub sequence: bool,
    pub longdate: bool,
    pub length: Option<u32>,
    /// `scalar` — the field's type is a `wire_scalar_enum!` leaf rather
    /// than a substructure (spec §4.D step 2).
    pub scalar: bool,
}

impl FieldAnnotation {
    /// Parse the raw annotation string for a field whose Rust shape is
    /// already known to the derive macro (`is_array`, `is_substructure`).
    pub fn parse(raw: &str, is_array: bool, is_substructure: bool) -> Result<FieldAnnotation, Error> {
        let mut parts = raw.splitn(2, ',');
        let address = parts.next().unwrap_or("");
        if address.is_empty() {
            return Err(Error::InvalidAnnotationSyntax(raw.to_string()));
        }
        let attr_str = parts.next();

        let (field, component) = parse_address(address, raw)?;

        if component.is_some() && is_array {
            return Err(Error::IllegalComponentArray);
        }
        if component.is_some() && is_substructure {
            return Err(Error::IllegalComponentSubstructure);
        }

        let mut required = false;
        let mut sequence = false;
        let mut longdate = false;
        let mut length = None;
        let mut scalar = false;

        if let Some(attr_str) = attr_str {
            for token in attr_str.split(',') {
                match Attribute::parse(token)? {
                    Attribute::Required => required = true,
                    Attribute::Optional => required = false,
                    Attribute::Sequence => sequence = true,
                    Attribute::LongDate => longdate = true,
                    Attribute::Length(n) => length = Some(n),
                    Attribute::Scalar => scalar = true,
                }
            }
        }

        Ok(FieldAnnotation {
            field,
            component,
            required,
            sequence,
            longdate,
            length,
            scalar,
        })
    }
}

fn parse_address(address: &str, raw: &str) -> Result<(u32, Option<u32>), Error> {
    let mut pieces = address.splitn(2, '.');
    let field_str = pieces.next().unwrap_or("");
    let rest = pieces.next();
    if pieces.next().is_some() {
        return Err(Error::InvalidAnnotationSyntax(raw.to_string()));
    }
    let field: u32 = field_str
        .parse()
        .map_err(|_| Error::InvalidAnnotationSyntax(raw.to_string()))?;
    if field == 0 {
        return Err(Error::InvalidAnnotationSyntax(raw.to_string()));
    }
    // Positions 1 and 2 are reserved only at the top-level line (record
    // letter, sequence number); this same address syntax also numbers
    // components inside a substructure, where 1 and 2 are ordinary
    // positions. The two contexts can't be told apart here, so that
    // narrower rule is enforced by the line builder instead, not parsed
    // annotations in general.
    let component = match rest {
        None => None,
        Some(c) => Some(
            c.parse::<u32>()
                .map_err(|_| Error::InvalidAnnotationSyntax(raw.to_string()))?,
        ),
    };
    Ok((field, component))
}

/// A parsed `#[astm("X[,attr]")]` struct annotation (spec §4.A).
///
/// `None` means the field is a composite: a substructure or an array of
/// substructures, routed by the child struct's own name rather than a
/// letter named here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructAnnotation {
    pub record_name: Option<String>,
    pub required: bool,
    /// Distinguishes same-letter record variants for diagnostics (e.g. two
    /// differently-shaped `M` records in one schema). Carried from
    /// `subname:VALUE`; purely informational, does not affect wire
    /// behavior or field dispatch.
    pub subname: Option<String>,
}

impl StructAnnotation {
    pub fn parse(raw: Option<&str>) -> Result<StructAnnotation, Error> {
        let Some(raw) = raw else {
            return Ok(StructAnnotation {
                record_name: None,
                required: false,
                subname: None,
            });
        };
        let mut parts = raw.splitn(2, ',');
        let name = parts.next().unwrap_or("");
        let attr_str = parts.next();

        let record_name = if name.is_empty() {
            None
        } else {
            if name.chars().count() != 1 || !name.chars().next().unwrap().is_ascii_uppercase() {
                return Err(Error::InvalidAnnotationSyntax(raw.to_string()));
            }
            Some(name.to_string())
        };

        let mut required = false;
        let mut subname = None;
        if let Some(attr_str) = attr_str {
            for token in attr_str.split(',') {
                if let Some(value) = token.strip_prefix("subname:") {
                    if value.is_empty() {
                        return Err(Error::InvalidAnnotationSyntax(raw.to_string()));
                    }
                    subname = Some(value.to_string());
                    continue;
                }
                match Attribute::parse(token)? {
                    Attribute::Required => required = true,
                    Attribute::Optional => required = false,
                    other => {
                        return Err(Error::InvalidAttribute(format!("{token:?} ({other:?}) not valid on a struct field")))
                    }
                }
            }
        }

        Ok(StructAnnotation { record_name, required, subname })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_field() {
        let a = FieldAnnotation::parse("4", false, false).unwrap();
        assert_eq!(a.field, 4);
        assert_eq!(a.component, None);
        assert!(!a.required);
    }

    #[test]
    fn parses_component_field() {
        let a = FieldAnnotation::parse("5.2", false, false).unwrap();
        assert_eq!(a.field, 5);
        assert_eq!(a.component, Some(2));
    }

    #[test]
    fn parses_attributes() {
        let a = FieldAnnotation::parse("6,required,longdate", false, false).unwrap();
        assert!(a.required);
        assert!(a.longdate);
    }

    #[test]
    fn parses_length_attribute() {
        let a = FieldAnnotation::parse("6,length:3", false, false).unwrap();
        assert_eq!(a.length, Some(3));
    }

    #[test]
    fn rejects_component_on_array() {
        let err = FieldAnnotation::parse("6.1", true, false).unwrap_err();
        assert_eq!(err, Error::IllegalComponentArray);
    }

    #[test]
    fn rejects_component_on_substructure() {
        let err = FieldAnnotation::parse("6.1", false, true).unwrap_err();
        assert_eq!(err, Error::IllegalComponentSubstructure);
    }

    #[test]
    fn rejects_require_spelling() {
        let err = FieldAnnotation::parse("6,require", false, false).unwrap_err();
        assert!(matches!(err, Error::InvalidAttribute(_)));
    }

    #[test]
    fn accepts_low_positions_for_substructure_component_numbering() {
        // Positions 1/2 are only reserved at the top-level line; a
        // substructure's own fields legitimately start there.
        let a = FieldAnnotation::parse("1", false, false).unwrap();
        assert_eq!(a.field, 1);
    }

    #[test]
    fn rejects_zero_position() {
        let err = FieldAnnotation::parse("0", false, false).unwrap_err();
        assert!(matches!(err, Error::InvalidAnnotationSyntax(_)));
    }

    #[test]
    fn struct_annotation_composite_when_absent() {
        let a = StructAnnotation::parse(None).unwrap();
        assert_eq!(a.record_name, None);
    }

    #[test]
    fn struct_annotation_named() {
        let a = StructAnnotation::parse(Some("O,required")).unwrap();
        assert_eq!(a.record_name.as_deref(), Some("O"));
        assert!(a.required);
    }

    #[test]
    fn struct_annotation_subname_is_diagnostic_only() {
        let a = StructAnnotation::parse(Some("M,required,subname:MATRIX")).unwrap();
        assert_eq!(a.record_name.as_deref(), Some("M"));
        assert!(a.required);
        assert_eq!(a.subname.as_deref(), Some("MATRIX"));
    }

    #[test]
    fn struct_annotation_rejects_empty_subname() {
        let err = StructAnnotation::parse(Some("M,subname:")).unwrap_err();
        assert!(matches!(err, Error::InvalidAnnotationSyntax(_)));
    }

    #[test]
    fn struct_annotation_rejects_multi_char_name() {
        let err = StructAnnotation::parse(Some("OB")).unwrap_err();
        assert!(matches!(err, Error::InvalidAnnotationSyntax(_)));
    }
}
