//! File payloads for import endpoints.
//!
//! # Design
//! A caller either already holds the content (for example a download being
//! re-uploaded) or only knows where it lives on disk. `FileSpec` covers both
//! behind one `{content type, length, stream}` contract. The path variant
//! does not touch the filesystem until `length` or `open_stream` is called,
//! so a spec can be built before the file exists and I/O errors surface when
//! the request is actually composed.

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::constants::{CSV_TYPE, XLSX_TYPE};
use crate::error::ApiError;
use crate::http::ByteStream;

/// In-memory (or already-open) payload with a caller-declared length.
pub struct ObjectFileSpec {
    content: ByteStream,
    length: u64,
    content_type: String,
    filename: Option<String>,
}

impl fmt::Debug for ObjectFileSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectFileSpec")
            .field("length", &self.length)
            .field("content_type", &self.content_type)
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// Payload read from disk when the request is built.
#[derive(Debug, Clone)]
pub struct PathFileSpec {
    path: PathBuf,
    content_type: String,
    filename: Option<String>,
}

/// A file payload, either held in memory or named by path.
#[derive(Debug)]
pub enum FileSpec {
    Object(ObjectFileSpec),
    Path(PathFileSpec),
}

impl FileSpec {
    /// Wrap a reader whose byte length the caller already knows.
    pub fn from_reader(
        content: impl Read + Send + 'static,
        length: u64,
        content_type: impl Into<String>,
    ) -> Self {
        FileSpec::Object(ObjectFileSpec {
            content: Box::new(content),
            length,
            content_type: content_type.into(),
            filename: None,
        })
    }

    /// Refer to a file on disk. Nothing is read or checked here.
    pub fn from_path(path: impl Into<PathBuf>, content_type: impl Into<String>) -> Self {
        FileSpec::Path(PathFileSpec {
            path: path.into(),
            content_type: content_type.into(),
            filename: None,
        })
    }

    /// Override the filename sent in `Content-Disposition`.
    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        let name = Some(name.into());
        match &mut self {
            FileSpec::Object(spec) => spec.filename = name,
            FileSpec::Path(spec) => spec.filename = name,
        }
        self
    }

    pub fn content_type(&self) -> &str {
        match self {
            FileSpec::Object(spec) => &spec.content_type,
            FileSpec::Path(spec) => &spec.content_type,
        }
    }

    /// Explicit name, or the final path component for path-backed specs.
    pub fn filename(&self) -> Option<Cow<'_, str>> {
        match self {
            FileSpec::Object(spec) => spec.filename.as_deref().map(Cow::Borrowed),
            FileSpec::Path(spec) => match &spec.filename {
                Some(name) => Some(Cow::Borrowed(name)),
                None => spec.path.file_name().map(|n| n.to_string_lossy()),
            },
        }
    }

    /// Byte length. For path-backed specs this stats the file now.
    pub fn length(&self) -> Result<u64, ApiError> {
        match self {
            FileSpec::Object(spec) => Ok(spec.length),
            FileSpec::Path(spec) => open_regular(&spec.path).map(|(_, len)| len),
        }
    }

    /// Hand over the content. For path-backed specs this opens the file now.
    ///
    /// The stream is capped at the length seen on the opened handle, so bytes
    /// appended afterwards are never sent. A file rewritten between `length`
    /// and `open_stream` can still disagree with an earlier `Content-Length`.
    pub fn open_stream(self) -> Result<ByteStream, ApiError> {
        match self {
            FileSpec::Object(spec) => Ok(spec.content),
            FileSpec::Path(spec) => {
                let (file, len) = open_regular(&spec.path)?;
                Ok(Box::new(file.take(len)))
            }
        }
    }
}

/// Open `path` and stat the handle, rejecting anything but a regular file.
fn open_regular(path: &Path) -> Result<(File, u64), ApiError> {
    let io_err = |e: std::io::Error| ApiError::from_io(path.to_path_buf(), e);
    let file = File::open(path).map_err(io_err)?;
    let meta = file.metadata().map_err(io_err)?;
    if !meta.is_file() {
        return Err(ApiError::FileUnreadable {
            path: path.to_path_buf(),
            source: std::io::Error::other("not a regular file"),
        });
    }
    Ok((file, meta.len()))
}

/// Caller-facing file type tags accepted by the import endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FileType {
    Csv,
    Xlsx,
}

impl FileType {
    pub fn content_type(self) -> &'static str {
        match self {
            FileType::Csv => CSV_TYPE,
            FileType::Xlsx => XLSX_TYPE,
        }
    }

    /// Every accepted tag, in declaration order.
    pub fn tags() -> Vec<String> {
        FileType::iter().map(|t| t.to_string()).collect()
    }
}

impl FromStr for FileType {
    type Err = ApiError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        FileType::iter()
            .find(|t| t.to_string() == tag)
            .ok_or_else(|| ApiError::UnsupportedFileType {
                tag: tag.to_string(),
                valid: FileType::tags(),
            })
    }
}

/// Map a file type tag such as `"csv"` to its MIME type.
pub fn to_content_type(tag: &str) -> Result<&'static str, ApiError> {
    tag.parse::<FileType>().map(FileType::content_type)
}
