use crate::Error;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

fn map_io_error(path: &Path, error: io::Error) -> Error {
    match error.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::FileRead {
            path: path.to_path_buf(),
            message: error.to_string(),
        },
    }
}

pub(crate) fn read_all(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| map_io_error(path, e))
}

/// Reads `length` bytes starting at `offset`, or everything after `offset` when `length` is `None`.
pub(crate) fn read_range(path: &Path, offset: u64, length: Option<u64>) -> Result<Vec<u8>, Error> {
    let mut file = File::open(path).map_err(|e| map_io_error(path, e))?;
    file.seek(SeekFrom::Start(offset))
        .map_err(|e| map_io_error(path, e))?;

    let mut out = Vec::new();
    match length {
        Some(length) => {
            let len = usize::try_from(length).map_err(|_| Error::FileRead {
                path: path.to_path_buf(),
                message: format!("byte range of {length} bytes does not fit in memory"),
            })?;
            out.resize(len, 0);
            file.read_exact(&mut out).map_err(|e| match e.kind() {
                io::ErrorKind::UnexpectedEof => Error::FileRead {
                    path: path.to_path_buf(),
                    message: format!("file ends before {length} bytes at offset {offset}"),
                },
                _ => map_io_error(path, e),
            })?;
        }
        None => {
            file.read_to_end(&mut out)
                .map_err(|e| map_io_error(path, e))?;
        }
    }
    Ok(out)
}
