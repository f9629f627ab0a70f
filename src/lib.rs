//! Library for parsing, editing, and writing Apple Icon Image (.icns) files
//!
//! An ICNS file is an 8-byte header (`icns` plus the big-endian length of the
//! whole file) followed by icon entries, each an OSType code, a big-endian
//! length, and a payload.  Legacy entries store pixels as PackBits-style
//! run-length packed channel planes; modern entries embed whole PNG files.
//!
//! See https://en.wikipedia.org/wiki/Apple_Icon_Image_format for more
//! information about the file format.
//!
//! # Example
//! ```
//! use icns::{IconContainer, ImageEntry, OSType};
//!
//! let rgba = [255u8, 0, 0, 255].repeat(16 * 16);
//! let entry = ImageEntry::from_source_image(&rgba, 16, 16, OSType(*b"ic04"), None)?;
//! let mut container = IconContainer::new();
//! container.append(entry)?;
//! let bytes = container.serialize();
//! assert_eq!(IconContainer::parse(&bytes)?, container);
//! # Ok::<(), icns::IcnsError>(())
//! ```

#![warn(missing_docs)]

mod channels;
mod container;
mod entry;
mod error;
mod icontype;
mod image;
pub mod rle;

#[cfg(feature = "pngio")]
mod pngio;

pub use self::channels::{build_payload, extract_channels, ChannelPlanes};
pub use self::container::{FileHeader, IconContainer};
pub use self::entry::ImageEntry;
pub use self::error::{IcnsError, Result};
pub use self::icontype::{Encoding, IconType, OSType};
pub use self::image::{DecodeError, DecodedImage, PngDecoder};

#[cfg(feature = "pngio")]
pub use self::pngio::PngCodec;
