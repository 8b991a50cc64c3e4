//! Component B: transcoding between the wire character set and internal
//! Unicode text (spec §4.B).
//!
//! UTF-8 and ASCII bypass the transcoder entirely. Everything else goes
//! through `encoding_rs` where it has a label, `oem_cp` for the two DOS
//! code pages the WHATWG encoding standard does not define, and a
//! hand-rolled identity map for true ISO-8859-1 (encoding_rs's "latin1"
//! label is actually windows-1252, which disagrees with ISO-8859-1 in the
//! 0x80..=0x9F range).

use crate::config::Encoding;
use astm_schema::Error;

/// Decode a wire byte buffer into UTF-8 text under the given encoding.
///
/// Operates on the buffer the caller already holds in memory; nothing
/// here imposes a size ceiling, unlike the 4 KiB truncation bug the
/// source carries.
pub fn transcode_to_utf8(bytes: &[u8], encoding: Encoding) -> Result<String, Error> {
    match encoding {
        Encoding::Utf8 => String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::TranscodeFailure(e.to_string())),
        Encoding::Ascii => {
            if bytes.iter().all(|b| b.is_ascii()) {
                Ok(bytes.iter().map(|&b| b as char).collect())
            } else {
                Err(Error::TranscodeFailure("non-ASCII byte in ASCII input".to_string()))
            }
        }
        Encoding::Iso8859_1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        Encoding::Windows1250 => decode_rs(bytes, encoding_rs::WINDOWS_1250),
        Encoding::Windows1251 => decode_rs(bytes, encoding_rs::WINDOWS_1251),
        Encoding::Windows1252 => decode_rs(bytes, encoding_rs::WINDOWS_1252),
        Encoding::Dos866 => decode_rs(bytes, encoding_rs::IBM866),
        Encoding::Dos852 => decode_oem(bytes, oem_cp::code_table::CP852),
        Encoding::Dos855 => decode_oem(bytes, oem_cp::code_table::CP855),
    }
}

/// Encode internal UTF-8 text back into the wire byte buffer.
pub fn transcode_from_utf8(text: &str, encoding: Encoding) -> Result<Vec<u8>, Error> {
    match encoding {
        Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
        Encoding::Ascii => {
            if text.is_ascii() {
                Ok(text.as_bytes().to_vec())
            } else {
                Err(Error::TranscodeFailure("non-ASCII character for ASCII output".to_string()))
            }
        }
        Encoding::Iso8859_1 => text
            .chars()
            .map(|c| {
                u8::try_from(c as u32).map_err(|_| {
                    Error::TranscodeFailure(format!("{c:?} has no ISO-8859-1 representation"))
                })
            })
            .collect(),
        Encoding::Windows1250 => encode_rs(text, encoding_rs::WINDOWS_1250),
        Encoding::Windows1251 => encode_rs(text, encoding_rs::WINDOWS_1251),
        Encoding::Windows1252 => encode_rs(text, encoding_rs::WINDOWS_1252),
        Encoding::Dos866 => encode_rs(text, encoding_rs::IBM866),
        Encoding::Dos852 => encode_oem(text, oem_cp::code_table::CP852),
        Encoding::Dos855 => encode_oem(text, oem_cp::code_table::CP855),
    }
}

fn decode_rs(bytes: &[u8], enc: &'static encoding_rs::Encoding) -> Result<String, Error> {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(Error::TranscodeFailure(format!("malformed input for {}", enc.name())));
    }
    Ok(text.into_owned())
}

fn encode_rs(text: &str, enc: &'static encoding_rs::Encoding) -> Result<Vec<u8>, Error> {
    let (bytes, _, had_errors) = enc.encode(text);
    if had_errors {
        return Err(Error::TranscodeFailure(format!(
            "{} is not representable in {}",
            text,
            enc.name()
        )));
    }
    Ok(bytes.into_owned())
}

fn decode_oem(bytes: &[u8], table: &'static [char; 256]) -> Result<String, Error> {
    Ok(oem_cp::decode_string_complete_table(bytes, table))
}

fn encode_oem(text: &str, table: &'static [char; 256]) -> Result<Vec<u8>, Error> {
    oem_cp::encode_string_complete_table(text, table)
        .map_err(|e| Error::TranscodeFailure(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_bypasses() {
        let s = transcode_to_utf8("héllo".as_bytes(), Encoding::Utf8).unwrap();
        assert_eq!(s, "héllo");
    }

    #[test]
    fn ascii_round_trips() {
        let bytes = transcode_from_utf8("Bio-Rad", Encoding::Ascii).unwrap();
        let back = transcode_to_utf8(&bytes, Encoding::Ascii).unwrap();
        assert_eq!(back, "Bio-Rad");
    }

    #[test]
    fn iso8859_1_round_trips_high_bytes() {
        let bytes = vec![0xE9]; // é in ISO-8859-1
        let text = transcode_to_utf8(&bytes, Encoding::Iso8859_1).unwrap();
        assert_eq!(text, "é");
        let back = transcode_from_utf8(&text, Encoding::Iso8859_1).unwrap();
        assert_eq!(back, bytes);
    }

    #[test]
    fn ascii_rejects_high_bytes() {
        let err = transcode_to_utf8(&[0xFF], Encoding::Ascii).unwrap_err();
        assert!(matches!(err, Error::TranscodeFailure(_)));
    }
}
