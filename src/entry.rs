use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::io::{self, Write};

use crate::channels::{self, ChannelPlanes};
use crate::error::{IcnsError, Result};
use crate::icontype::{Encoding, IconType, OSType};
use crate::image::PngDecoder;

/// The length of an icon entry header, in bytes:
pub(crate) const ENTRY_HEADER_LENGTH: u32 = 8;

/// One entry in an ICNS file.  Depending on the OSType, this may represent a
/// whole icon, or part of one (such as an alpha mask, or color data without
/// the mask).  Entries with OSTypes missing from the registry are kept as
/// opaque payloads.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageEntry {
    ostype: OSType,
    data: Vec<u8>,
}

impl ImageEntry {
    /// Creates an icon entry with the given OSType and data payload.
    pub fn new(ostype: OSType, data: Vec<u8>) -> ImageEntry {
        ImageEntry { ostype, data }
    }

    /// Encodes an already-decoded image as an entry of the given type.
    ///
    /// The image must be square and exactly as large as the registry says
    /// `ostype` requires.  PNG types store `png_bytes` untouched (and fail
    /// with [`IcnsError::MissingPngData`] without them); every other type
    /// packs `rgba` into channel planes.
    pub fn from_source_image(rgba: &[u8],
                             width: u32,
                             height: u32,
                             ostype: OSType,
                             png_bytes: Option<&[u8]>)
                             -> Result<ImageEntry> {
        let icon_type = IconType::from_ostype(ostype)
            .ok_or(IcnsError::UnsupportedIconType(ostype))?;
        if width != height {
            return Err(IcnsError::NotSquare { width, height });
        }
        if width != icon_type.pixel_size() {
            return Err(IcnsError::SizeMismatch {
                ostype,
                expected: icon_type.pixel_size(),
                actual: width,
            });
        }
        let data = match icon_type.encoding() {
            Encoding::RawPNG => {
                png_bytes.ok_or(IcnsError::MissingPngData(ostype))?.to_vec()
            }
            encoding => {
                let expected = 4 * icon_type.pixel_count();
                if rgba.len() != expected {
                    return Err(IcnsError::PixelDataLength {
                        expected,
                        actual: rgba.len(),
                    });
                }
                channels::build_payload(rgba, encoding, ostype)?
            }
        };
        Ok(ImageEntry::new(ostype, data))
    }

    /// Decodes a PNG file with `decoder` and encodes it as an entry of the
    /// given type.  PNG types keep the original bytes.
    pub fn from_png<D: PngDecoder + ?Sized>(png_bytes: &[u8],
                                            ostype: OSType,
                                            decoder: &D)
                                            -> Result<ImageEntry> {
        let image = decoder.decode(png_bytes)?;
        ImageEntry::from_source_image(image.rgba(),
                                      image.width(),
                                      image.height(),
                                      ostype,
                                      Some(png_bytes))
    }

    /// Returns the OSType for this entry (e.g. `it32` or `t8mk`).
    pub fn ostype(&self) -> OSType {
        self.ostype
    }

    /// Returns the type of icon encoded by this entry, or `None` if this
    /// entry does not encode a supported icon type.
    pub fn icon_type(&self) -> Option<IconType> {
        IconType::from_ostype(self.ostype)
    }

    /// Returns the encoded data for this entry.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the encoded length of the entry, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        ENTRY_HEADER_LENGTH + (self.data.len() as u32)
    }

    /// Recovers the channel planes of a packed or mask entry.  Fails for
    /// unknown OSTypes and for PNG entries.
    pub fn decode_channels(&self) -> Result<ChannelPlanes> {
        let icon_type = self
            .icon_type()
            .ok_or(IcnsError::UnsupportedIconType(self.ostype))?;
        channels::extract_channels(&self.data,
                                   icon_type.encoding(),
                                   self.ostype,
                                   icon_type.pixel_count())
    }

    /// Parses one entry from the front of `bytes`, returning it along with
    /// the number of bytes it occupied.
    pub fn parse(bytes: &[u8]) -> Result<(ImageEntry, usize)> {
        let header_length = ENTRY_HEADER_LENGTH as usize;
        if bytes.len() < header_length {
            return Err(IcnsError::TruncatedEntry {
                declared: ENTRY_HEADER_LENGTH,
                available: bytes.len(),
            });
        }
        let mut raw_ostype = [0u8; 4];
        raw_ostype.copy_from_slice(&bytes[0..4]);
        let entry_length = BigEndian::read_u32(&bytes[4..8]);
        if entry_length < ENTRY_HEADER_LENGTH {
            return Err(IcnsError::InvalidEntryLength(entry_length));
        }
        let end = entry_length as usize;
        if bytes.len() < end {
            return Err(IcnsError::TruncatedEntry {
                declared: entry_length,
                available: bytes.len(),
            });
        }
        let entry = ImageEntry::new(OSType(raw_ostype), bytes[header_length..end].to_vec());
        Ok((entry, end))
    }

    /// Serializes the entry: OSType, big-endian total length, payload.
    pub fn serialize(&self) -> Vec<u8> {
        let mut output = vec![0u8; ENTRY_HEADER_LENGTH as usize];
        let OSType(ref raw_ostype) = self.ostype;
        output[0..4].copy_from_slice(raw_ostype);
        BigEndian::write_u32(&mut output[4..8], self.total_length());
        output.extend_from_slice(&self.data);
        output
    }

    /// Writes the entry to within an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let OSType(ref raw_ostype) = self.ostype;
        writer.write_all(raw_ostype)?;
        writer.write_u32::<BigEndian>(self.total_length())?;
        writer.write_all(&self.data)?;
        Ok(())
    }
}
