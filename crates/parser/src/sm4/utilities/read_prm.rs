use miniz_oxide::inflate::decompress_to_vec_zlib_with_limit;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{FileError, Result},
    sm4::structs::RawObject,
    types::MetadataMap,
    utilities::{cp437, reader::Reader},
};

pub const PRM_HEADER_SIZE: u32 = 12;

/// Starred top-level section, e.g. `****[Page Header]****`.
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\**\[([^\[\]]+)\]\*+$").unwrap());
/// Plain bracketed section, e.g. `[Channel 1]`.
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\[\]]+)\]$").unwrap());
/// Indented dash-framed sub-sub-section, e.g. `  ---- Drive ----`.
static H3_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+-*([^\[\]]+?)-*$").unwrap());
/// Numbered data line, e.g. `<0007> Scan Speed :: 1.0`.
static DATA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<[0-9]{4}>\s+(.+?)\s+::(.*)$").unwrap());

/// Decode the PRM parameter blob into a flat metadata map.
///
/// Structural inconsistencies between the 12-byte PRM header and the data
/// object degrade to `None`; only a broken zlib stream is reported as a
/// hard error, and the orchestrator downgrades even that to a warning.
pub fn read_prm(
    buffer: &[u8],
    header_obj: &RawObject,
    data_obj: &RawObject,
) -> Result<Option<MetadataMap>> {
    if header_obj.size != PRM_HEADER_SIZE {
        return Ok(None);
    }

    let mut r = Reader::new_at(buffer, header_obj.offset as usize, "PRMHeader");
    let compressed = r.read_u32_le()?;
    let decompressed_size = r.read_u32_le()?;
    let compressed_size = r.read_u32_le()?;
    log::debug!(
        "PRM ({compressed}) compressed_size {compressed_size}, \
         decompressed_size {decompressed_size}, object size {}",
        data_obj.size
    );

    let payload =
        &buffer[data_obj.offset as usize..data_obj.offset as usize + data_obj.size as usize];
    let text = if compressed != 0 {
        if data_obj.size != compressed_size {
            return Ok(None);
        }
        let raw = inflate_exact(payload, decompressed_size as usize)?;
        cp437::decode(&raw)
    } else {
        if data_obj.size != decompressed_size {
            return Ok(None);
        }
        cp437::decode(payload)
    };

    Ok(Some(parse_prm_text(&text)))
}

fn inflate_exact(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let out = decompress_to_vec_zlib_with_limit(data, expected)
        .map_err(|e| FileError::DecompressionFailed(format!("{e:?}")))?;
    if out.len() != expected {
        return Err(FileError::DecompressionFailed(format!(
            "expected {expected} decompressed bytes, got {}",
            out.len()
        )));
    }
    Ok(out)
}

/// Flatten the sectioned `key :: value` text into
/// `section::subsection::subsubsection::key` entries. Data lines before
/// any section header and lines matching no pattern are dropped.
pub fn parse_prm_text(text: &str) -> MetadataMap {
    let mut meta = MetadataMap::new();
    let mut header1: Option<String> = None;
    let mut header2: Option<String> = None;
    let mut header3: Option<String> = None;

    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(caps) = DATA_RE.captures(line) {
            let levels: Vec<&str> = [&header1, &header2, &header3]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect();
            if levels.is_empty() {
                continue;
            }
            let key = format!("{}::{}", levels.join("::"), &caps[1]);
            meta.insert(key, caps[2].trim().to_string());
            continue;
        }

        if let Some(caps) = H1_RE.captures(line) {
            header1 = Some(caps[1].trim().to_string());
            header2 = None;
            header3 = None;
            continue;
        }

        if let Some(caps) = H2_RE.captures(line) {
            header2 = Some(caps[1].trim().to_string());
            header3 = None;
            continue;
        }

        if let Some(caps) = H3_RE.captures(line) {
            let name = caps[1].trim().to_string();
            header3 = if name.starts_with('*') || name.ends_with('*') {
                None
            } else {
                Some(name)
            };
        }
    }

    meta
}
