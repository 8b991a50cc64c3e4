//! Runtime codec for ASTM E1394/LIS2-A2 messages.
//!
//! This crate holds everything but the annotation descriptors themselves
//! (`astm-schema`) and the code that generates trait impls from them
//! (`astm-derive`). The four library entry points in spec §6 live here:
//! [`decode`], [`encode`], [`classify::classify`], and
//! [`encoding::transcode_to_utf8`].

pub mod classify;
pub mod config;
pub mod cursor;
pub mod encoding;
pub mod fragment;
pub mod line;
pub mod lines;
pub mod structure;

pub use classify::{classify, MessageKind};
pub use config::Config;
pub use fragment::{Fragment, Record};
pub use structure::{Depth, Structure};

use astm_schema::Error;

use cursor::Cursor;

/// Decode a wire buffer into a `T`, per spec §6 entry point 1.
///
/// Adapted from the source's out-parameter shape (`decode(bytes, target,
/// config) -> Result<(), Error>`) into a value-returning form, which is
/// the idiomatic fit for an owned, immutable-after-construction tree
/// (spec §3 "Lifecycle").
pub fn decode<T: Structure>(bytes: &[u8], cfg: &Config) -> Result<T, Error> {
    tracing::debug!(bytes = bytes.len(), encoding = ?cfg.encoding, "decoding message");
    let text = encoding::transcode_to_utf8(bytes, cfg.encoding)?;
    let separator = if cfg.auto_detect_line_separator {
        None
    } else {
        Some(cfg.line_separator.as_str())
    };
    let raw_lines = lines::split_lines(&text, separator, cfg.auto_detect_line_separator)?;
    tracing::trace!(lines = raw_lines.len(), "split into lines");

    let mut cursor = Cursor::new(&raw_lines);
    let mut delimiters = cfg.delimiters;
    let mut depth = Depth::new(cfg.max_depth);
    let result = T::decode_from(&mut cursor, 1, &mut delimiters, cfg, &mut depth);
    if let Err(ref e) = result {
        tracing::warn!(error = %e, "decode failed");
    }
    result
}

/// Encode a `T` into a wire buffer, per spec §6 entry point 2.
pub fn encode<T: Structure>(value: &T, cfg: &Config) -> Result<Vec<u8>, Error> {
    tracing::debug!(encoding = ?cfg.encoding, notation = ?cfg.notation, "encoding message");
    let mut depth = Depth::new(cfg.max_depth);
    let mut out_lines = Vec::new();
    let delimiters = cfg.delimiters;
    value.encode_into(1, &delimiters, cfg, &mut depth, &mut out_lines)?;
    tracing::trace!(lines = out_lines.len(), "rendered lines");
    let joined = lines::join_lines(&out_lines, &cfg.line_separator);
    encoding::transcode_from_utf8(&joined, cfg.encoding)
}

/// Transcode a raw wire buffer to UTF-8 without attempting to decode it
/// as a message, per spec §6 entry point 4.
pub fn transcode_utf8(bytes: &[u8], source_encoding: config::Encoding) -> Result<String, Error> {
    encoding::transcode_to_utf8(bytes, source_encoding)
}
