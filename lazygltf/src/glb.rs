//! Binary glTF (`.glb`) container: a 12-byte header followed by a JSON chunk and an
//! optional binary chunk.

use crate::json::JsonData;
use crate::location::BinaryChunk;
use crate::{Error, fs};
use byteorder::{ByteOrder, LittleEndian};
use std::path::Path;

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

pub(crate) struct GlbContents {
    pub(crate) json: JsonData,
    pub(crate) binary: Option<BinaryChunk>,
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidGlb {
        message: message.into(),
    }
}

pub(crate) fn read_glb(path: &Path) -> Result<GlbContents, Error> {
    let bytes = fs::read_all(path)?;
    parse_glb(path, &bytes)
}

struct ChunkHeader {
    length: usize,
    kind: u32,
}

fn chunk_header(bytes: &[u8], offset: usize) -> Result<ChunkHeader, Error> {
    let header = bytes
        .get(offset..offset + CHUNK_HEADER_LEN)
        .ok_or_else(|| invalid(format!("truncated chunk header at offset {offset}")))?;
    let length = LittleEndian::read_u32(&header[0..4]) as usize;
    let kind = LittleEndian::read_u32(&header[4..8]);
    let data_end = offset + CHUNK_HEADER_LEN + length;
    if data_end > bytes.len() {
        return Err(invalid(format!(
            "chunk at offset {offset} declares {length} bytes but the file ends at {}",
            bytes.len()
        )));
    }
    Ok(ChunkHeader { length, kind })
}

/// Chunks start on 4-byte boundaries.
fn align4(value: usize) -> usize {
    (value + 3) & !3
}

pub(crate) fn parse_glb(path: &Path, bytes: &[u8]) -> Result<GlbContents, Error> {
    if bytes.len() < HEADER_LEN {
        return Err(invalid("file is shorter than the GLB header"));
    }
    let magic = LittleEndian::read_u32(&bytes[0..4]);
    if magic != GLB_MAGIC {
        return Err(invalid(format!("bad magic 0x{magic:08X}")));
    }
    let version = LittleEndian::read_u32(&bytes[4..8]);
    if version != GLB_VERSION {
        return Err(invalid(format!("unsupported container version {version}")));
    }
    let total = LittleEndian::read_u32(&bytes[8..12]) as usize;
    if total > bytes.len() {
        return Err(invalid(format!(
            "header declares {total} bytes but the file holds {}",
            bytes.len()
        )));
    }
    let bytes = &bytes[..total];

    let json_header = chunk_header(bytes, HEADER_LEN)?;
    if json_header.kind != CHUNK_JSON {
        return Err(invalid("first chunk is not a JSON chunk"));
    }
    let json_start = HEADER_LEN + CHUNK_HEADER_LEN;
    let json = JsonData::from_slice(&bytes[json_start..json_start + json_header.length])?;

    let mut binary = None;
    let mut offset = align4(json_start + json_header.length);
    while offset + CHUNK_HEADER_LEN <= bytes.len() {
        let header = chunk_header(bytes, offset)?;
        let data_start = offset + CHUNK_HEADER_LEN;
        match header.kind {
            CHUNK_BIN if binary.is_none() => {
                binary = Some(BinaryChunk {
                    path: path.to_path_buf(),
                    offset: data_start as u64,
                    length: header.length as u64,
                });
            }
            CHUNK_BIN => return Err(invalid("more than one binary chunk")),
            CHUNK_JSON => return Err(invalid("more than one JSON chunk")),
            kind => log::debug!("skipping unknown GLB chunk 0x{kind:08X}"),
        }
        offset = align4(data_start + header.length);
    }

    log::debug!(
        "read GLB {}: {} JSON bytes, binary chunk {}",
        path.display(),
        json_header.length,
        binary.as_ref().map_or(0, |chunk| chunk.length)
    );
    Ok(GlbContents { json, binary })
}
