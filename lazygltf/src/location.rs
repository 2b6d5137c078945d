//! Resolves where the bytes of a buffer or image live.
//!
//! Locating never opens a file unless an eager-loading option or a custom allocation
//! callback asks for the bytes up front.

use crate::{Asset, Error, MimeType, Options, fs};
use base64::Engine as _;
use std::any::Any;
use std::borrow::Cow;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Caller-owned memory handed out by a buffer allocation callback.
pub type MappedMemory = Rc<RefCell<Vec<u8>>>;

/// Opaque value passed back to the allocation callbacks.
pub type UserPointer = Rc<dyn Any>;

pub type BufferMapCallback = dyn Fn(u64, Option<&dyn Any>) -> BufferInfo;
pub type BufferFreeCallback = dyn Fn(&BufferInfo, Option<&dyn Any>);

#[derive(Clone, Debug)]
pub struct BufferInfo {
    /// When present, the resolved bytes are copied here.
    pub mapped_memory: Option<MappedMemory>,
    pub custom_id: u64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DataLocation {
    FilePathWithByteRange,
    VectorWithMimeType,
    BufferView,
    CustomBufferWithId,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DataSource {
    /// External file, or a byte range of one (GLB binary chunk).
    FilePath {
        path: PathBuf,
        file_byte_offset: u64,
        /// `None` reads to the end of the file.
        byte_length: Option<u64>,
        mime_type: MimeType,
    },
    Vector {
        bytes: Vec<u8>,
        mime_type: MimeType,
    },
    BufferView {
        buffer_view: usize,
        mime_type: MimeType,
    },
    CustomBuffer {
        id: u64,
        mime_type: MimeType,
    },
}

impl DataSource {
    pub fn location(&self) -> DataLocation {
        match self {
            Self::FilePath { .. } => DataLocation::FilePathWithByteRange,
            Self::Vector { .. } => DataLocation::VectorWithMimeType,
            Self::BufferView { .. } => DataLocation::BufferView,
            Self::CustomBuffer { .. } => DataLocation::CustomBufferWithId,
        }
    }

    pub fn mime_type(&self) -> MimeType {
        match self {
            Self::FilePath { mime_type, .. }
            | Self::Vector { mime_type, .. }
            | Self::BufferView { mime_type, .. }
            | Self::CustomBuffer { mime_type, .. } => *mime_type,
        }
    }

    pub fn custom_id(&self) -> Option<u64> {
        match self {
            Self::CustomBuffer { id, .. } => Some(*id),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub(crate) struct BufferAllocator {
    pub(crate) map: Rc<BufferMapCallback>,
    pub(crate) free: Option<Rc<BufferFreeCallback>>,
}

/// Binary chunk of a GLB container, addressed inside the container file.
#[derive(Clone, Debug)]
pub(crate) struct BinaryChunk {
    pub(crate) path: PathBuf,
    pub(crate) offset: u64,
    pub(crate) length: u64,
}

pub(crate) struct Locator<'a> {
    pub(crate) directory: &'a Path,
    pub(crate) options: Options,
    pub(crate) binary_chunk: Option<&'a BinaryChunk>,
    pub(crate) allocator: Option<&'a BufferAllocator>,
    pub(crate) user_pointer: Option<&'a UserPointer>,
}

enum RawSource {
    Embedded { bytes: Vec<u8>, mime_type: MimeType },
    File { path: PathBuf, mime_type: MimeType },
    Binary(BinaryChunk),
    Nothing,
}

impl Locator<'_> {
    /// Resolves a buffer. Custom allocations are appended to `allocations`.
    pub(crate) fn locate_buffer(
        &self,
        context: &str,
        index: usize,
        uri: Option<&str>,
        byte_length: u64,
        allocations: &mut Vec<BufferInfo>,
    ) -> Result<DataSource, Error> {
        let raw = match uri {
            Some(uri) => self.resolve_uri(context, uri, None)?,
            None => match self.binary_chunk {
                Some(chunk) if index == 0 => RawSource::Binary(chunk.clone()),
                _ => RawSource::Nothing,
            },
        };

        if let Some(allocator) = self.allocator {
            return self.locate_custom(context, allocator, raw, byte_length, allocations);
        }

        match raw {
            RawSource::Embedded { bytes, mime_type } => Ok(DataSource::Vector { bytes, mime_type }),
            RawSource::File { path, mime_type } => {
                if self.options.contains(Options::LOAD_EXTERNAL_BUFFERS) {
                    log::debug!("{context}: loading external buffer {}", path.display());
                    let bytes = fs::read_range(&path, 0, Some(byte_length))?;
                    Ok(DataSource::Vector { bytes, mime_type })
                } else {
                    Ok(DataSource::FilePath {
                        path,
                        file_byte_offset: 0,
                        byte_length: Some(byte_length),
                        mime_type,
                    })
                }
            }
            RawSource::Binary(chunk) => {
                if self.options.contains(Options::LOAD_GLB_BUFFERS) {
                    let bytes = fs::read_range(&chunk.path, chunk.offset, Some(chunk.length))?;
                    Ok(DataSource::Vector {
                        bytes,
                        mime_type: MimeType::GltfBuffer,
                    })
                } else {
                    Ok(DataSource::FilePath {
                        path: chunk.path,
                        file_byte_offset: chunk.offset,
                        byte_length: Some(chunk.length),
                        mime_type: MimeType::GltfBuffer,
                    })
                }
            }
            RawSource::Nothing => Err(Error::MissingData {
                context: context.to_string(),
            }),
        }
    }

    fn locate_custom(
        &self,
        context: &str,
        allocator: &BufferAllocator,
        raw: RawSource,
        byte_length: u64,
        allocations: &mut Vec<BufferInfo>,
    ) -> Result<DataSource, Error> {
        let size = match &raw {
            RawSource::Embedded { bytes, .. } => bytes.len() as u64,
            RawSource::Binary(chunk) => chunk.length,
            RawSource::File { .. } | RawSource::Nothing => byte_length,
        };

        let user_pointer = self.user_pointer.map(|p| &**p);
        let info = (allocator.map)(size, user_pointer);
        log::debug!(
            "{context}: allocated custom buffer {} ({size} bytes)",
            info.custom_id
        );
        let id = info.custom_id;
        let memory = info.mapped_memory.clone();
        allocations.push(info);

        let mime_type = match raw {
            RawSource::Embedded { bytes, mime_type } => {
                if let Some(memory) = &memory {
                    copy_into(context, memory, &bytes)?;
                }
                mime_type
            }
            RawSource::File { path, mime_type } => {
                if let Some(memory) = &memory {
                    let bytes = fs::read_range(&path, 0, Some(byte_length))?;
                    copy_into(context, memory, &bytes)?;
                }
                mime_type
            }
            RawSource::Binary(chunk) => {
                if let Some(memory) = &memory {
                    let bytes = fs::read_range(&chunk.path, chunk.offset, Some(chunk.length))?;
                    copy_into(context, memory, &bytes)?;
                }
                MimeType::GltfBuffer
            }
            RawSource::Nothing => MimeType::None,
        };

        Ok(DataSource::CustomBuffer { id, mime_type })
    }

    /// Resolves an image. A `bufferView` wins over a `uri`.
    pub(crate) fn locate_image(
        &self,
        context: &str,
        uri: Option<&str>,
        buffer_view: Option<usize>,
        declared_mime: Option<&str>,
        buffer_view_count: usize,
    ) -> Result<DataSource, Error> {
        let declared = declared_mime.map(parse_mime).transpose()?;

        if let Some(buffer_view) = buffer_view {
            if buffer_view >= buffer_view_count {
                return Err(Error::out_of_range(
                    context,
                    "bufferView",
                    buffer_view,
                    buffer_view_count,
                ));
            }
            return Ok(DataSource::BufferView {
                buffer_view,
                mime_type: declared.unwrap_or_default(),
            });
        }

        let Some(uri) = uri else {
            return Err(Error::MissingData {
                context: context.to_string(),
            });
        };

        match self.resolve_uri(context, uri, declared)? {
            RawSource::Embedded { bytes, mime_type } => Ok(DataSource::Vector { bytes, mime_type }),
            RawSource::File { path, mime_type } => Ok(DataSource::FilePath {
                path,
                file_byte_offset: 0,
                byte_length: None,
                mime_type,
            }),
            RawSource::Binary(_) | RawSource::Nothing => Err(Error::MissingData {
                context: context.to_string(),
            }),
        }
    }

    fn resolve_uri(
        &self,
        context: &str,
        uri: &str,
        declared: Option<MimeType>,
    ) -> Result<RawSource, Error> {
        if let Some(rest) = uri.strip_prefix("data:") {
            let (bytes, uri_mime) = decode_data_uri(context, uri, rest)?;
            return Ok(RawSource::Embedded {
                bytes,
                mime_type: declared.unwrap_or(uri_mime),
            });
        }

        let path = match uri.strip_prefix("file://") {
            Some(rest) => rest,
            None if has_scheme(uri) => {
                return Err(Error::InvalidUri {
                    uri: uri.to_string(),
                });
            }
            None => uri,
        };
        let path = self.directory.join(&*percent_decode(path));
        let mime_type = declared.unwrap_or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(MimeType::from_extension)
                .unwrap_or_default()
        });
        Ok(RawSource::File { path, mime_type })
    }
}

fn copy_into(context: &str, memory: &MappedMemory, bytes: &[u8]) -> Result<(), Error> {
    let mut target = memory
        .try_borrow_mut()
        .map_err(|_| Error::invalid(context, "mapped buffer memory is already borrowed"))?;
    target.clear();
    target.extend_from_slice(bytes);
    Ok(())
}

fn parse_mime(value: &str) -> Result<MimeType, Error> {
    MimeType::from_mime_str(value).ok_or_else(|| Error::UnsupportedMimeType {
        value: value.to_string(),
    })
}

fn has_scheme(uri: &str) -> bool {
    let Some((scheme, _)) = uri.split_once("://") else {
        return false;
    };
    !scheme.is_empty()
        && scheme
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
}

fn decode_data_uri(context: &str, uri: &str, rest: &str) -> Result<(Vec<u8>, MimeType), Error> {
    let Some((header, payload)) = rest.split_once(',') else {
        return Err(Error::InvalidUri {
            uri: uri.to_string(),
        });
    };
    let Some(media_type) = header.strip_suffix(";base64") else {
        return Err(Error::InvalidUri {
            uri: uri.to_string(),
        });
    };
    let mime_type = if media_type.is_empty() {
        MimeType::None
    } else {
        parse_mime(media_type)?
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::invalid(context, format!("invalid base64 payload: {e}")))?;
    Ok((bytes, mime_type))
}

fn percent_decode(input: &str) -> Cow<'_, str> {
    if !input.contains('%') {
        return Cow::Borrowed(input);
    }

    fn hex(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push((h << 4) | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    match String::from_utf8(out) {
        Ok(decoded) => Cow::Owned(decoded),
        Err(_) => Cow::Borrowed(input),
    }
}

impl Asset {
    /// Reads the bytes of a buffer. Custom buffers live with the caller and cannot be read here.
    pub fn buffer_bytes(&self, index: usize) -> Result<Cow<'_, [u8]>, Error> {
        let buffer = self
            .buffers
            .get(index)
            .ok_or_else(|| Error::out_of_range("asset", "buffer", index, self.buffers.len()))?;
        read_source(&format!("buffers[{index}]"), &buffer.data, self)
    }

    pub fn image_bytes(&self, index: usize) -> Result<Cow<'_, [u8]>, Error> {
        let image = self
            .images
            .get(index)
            .ok_or_else(|| Error::out_of_range("asset", "image", index, self.images.len()))?;
        read_source(&format!("images[{index}]"), &image.data, self)
    }
}

fn read_source<'a>(
    context: &str,
    source: &'a DataSource,
    asset: &'a Asset,
) -> Result<Cow<'a, [u8]>, Error> {
    match source {
        DataSource::FilePath {
            path,
            file_byte_offset,
            byte_length,
            ..
        } => Ok(Cow::Owned(fs::read_range(path, *file_byte_offset, *byte_length)?)),
        DataSource::Vector { bytes, .. } => Ok(Cow::Borrowed(bytes.as_slice())),
        DataSource::BufferView { buffer_view, .. } => {
            let view = asset.buffer_views.get(*buffer_view).ok_or_else(|| {
                Error::out_of_range(context, "bufferView", *buffer_view, asset.buffer_views.len())
            })?;
            let bytes = asset.buffer_bytes(view.buffer_index)?;
            let start = usize::try_from(view.byte_offset).unwrap_or(usize::MAX);
            let end = start.saturating_add(usize::try_from(view.byte_length).unwrap_or(usize::MAX));
            if end > bytes.len() {
                return Err(Error::invalid(
                    context,
                    format!(
                        "buffer view {buffer_view} spans {start}..{end} but the buffer holds {} bytes",
                        bytes.len()
                    ),
                ));
            }
            Ok(match bytes {
                Cow::Borrowed(all) => Cow::Borrowed(&all[start..end]),
                Cow::Owned(all) => Cow::Owned(all[start..end].to_vec()),
            })
        }
        DataSource::CustomBuffer { .. } => Err(Error::MissingData {
            context: context.to_string(),
        }),
    }
}
