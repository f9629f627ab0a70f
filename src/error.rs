use std::io;

use thiserror::Error;

use crate::icontype::{Encoding, OSType};
use crate::image::DecodeError;

/// Errors produced while parsing, building, or editing an ICNS container.
#[derive(Debug, Error)]
pub enum IcnsError {
    /// The data does not start with a valid `icns` file header.
    #[error("not an icns file: {0}")]
    InvalidHeader(String),
    /// An entry claims more bytes than the container header declares (or
    /// than the buffer actually holds).
    #[error("icns data is truncated (declared {declared} bytes, {available} available)")]
    TruncatedContainer {
        /// Length declared by the file header.
        declared: u32,
        /// Number of bytes actually available.
        available: usize,
    },
    /// An entry declares a length beyond the end of the supplied bytes.
    #[error("icon entry is truncated (declared {declared} bytes, {available} available)")]
    TruncatedEntry {
        /// Length declared by the entry header.
        declared: u32,
        /// Number of bytes actually available.
        available: usize,
    },
    /// An entry declares a length too small to hold its own header.
    #[error("invalid icon entry length {0} (must be at least 8)")]
    InvalidEntryLength(u32),
    /// The OS-type code is not in the icon type registry.
    #[error("unsupported icon type '{0}'")]
    UnsupportedIconType(OSType),
    /// The source image is not square.
    #[error("image must be square (was {width}x{height})")]
    NotSquare {
        /// Source image width.
        width: u32,
        /// Source image height.
        height: u32,
    },
    /// The source image is square but has the wrong size for its type.
    #[error("image size must be {expected}x{expected} for '{ostype}' (was {actual}x{actual})")]
    SizeMismatch {
        /// The requested icon type.
        ostype: OSType,
        /// Edge length required by the registry.
        expected: u32,
        /// Edge length of the supplied image.
        actual: u32,
    },
    /// The RGBA buffer length does not agree with the image dimensions.
    #[error("pixel data has {actual} bytes (expected {expected})")]
    PixelDataLength {
        /// `4 * width * height`.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },
    /// A packed channel stream is corrupt or decodes to the wrong length.
    #[error("malformed channel data: {0}")]
    MalformedEncoding(String),
    /// An entry index is outside the container.
    #[error("index {index} is out of range for a container of {len} entries")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of entries in the container.
        len: usize,
    },
    /// Channel planes were requested for an encoding that has none.
    #[error("{0:?} payloads are not built from channel planes")]
    UnsupportedEncoding(Encoding),
    /// A PNG icon type was requested without the original PNG bytes.
    #[error("'{0}' stores PNG data, but no PNG bytes were supplied")]
    MissingPngData(OSType),
    /// The container holds no entry with the given OS-type.
    #[error("the container does not hold a '{0}' entry")]
    MissingEntry(OSType),
    /// The serialized container would not fit a 32-bit length field.
    #[error("container length {0} does not fit in 32 bits")]
    ContainerTooLarge(usize),
    /// The injected PNG decoder failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Reading or writing through `std::io` failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Shorthand for results carrying an [`IcnsError`].
pub type Result<T> = std::result::Result<T, IcnsError>;
