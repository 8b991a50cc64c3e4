use crate::error::Error;

/// An attribute carried by a field or struct annotation (spec §4.A).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Required,
    Optional,
    Sequence,
    LongDate,
    Length(u32),
    /// Marks a field whose Rust type is a custom scalar (built with
    /// `wire_scalar_enum!`) rather than a nested substructure, since the
    /// two look identical to the derive's pre-typeck syntactic read of the
    /// field's type path (spec §4.D step 2, "string-convertible user enum
    /// types preserved").
    Scalar,
}

impl Attribute {
    /// Parse a single `name` or `name:value` attribute token.
    ///
    /// `require` (singular) is a known-rejected spelling from one of the
    /// source's disagreeing revisions; spec.md picks `required`.
    pub fn parse(token: &str) -> Result<Attribute, Error> {
        let mut parts = token.splitn(2, ':');
        let name = parts.next().unwrap_or("");
        let value = parts.next();
        if parts.next().is_some() {
            return Err(Error::InvalidAttribute(token.to_string()));
        }
        match (name, value) {
            ("required", None) => Ok(Attribute::Required),
            ("optional", None) => Ok(Attribute::Optional),
            ("sequence", None) => Ok(Attribute::Sequence),
            ("longdate", None) => Ok(Attribute::LongDate),
            ("scalar", None) => Ok(Attribute::Scalar),
            ("length", Some(v)) => {
                let n: u32 = v
                    .parse()
                    .map_err(|_| Error::InvalidAttribute(token.to_string()))?;
                Ok(Attribute::Length(n))
            }
            _ => Err(Error::InvalidAttribute(token.to_string())),
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Attribute::Required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalar() {
        assert_eq!(Attribute::parse("scalar").unwrap(), Attribute::Scalar);
    }
}
