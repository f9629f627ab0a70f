use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use log::{debug, trace, warn};
use std::io::{self, Read, Write};

use crate::entry::{ImageEntry, ENTRY_HEADER_LENGTH};
use crate::error::{IcnsError, Result};
use crate::icontype::{Encoding, IconType, OSType};
use crate::image::{DecodedImage, PngDecoder};

/// The first four bytes of an ICNS file:
const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The length of an icon container header, in bytes:
const FILE_HEADER_LENGTH: u32 = 8;

/// The fixed 8-byte header at the start of every ICNS file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FileHeader {
    total_length: u32,
}

impl FileHeader {
    /// Returns the four-byte identifier, always `icns`.
    pub fn identifier(&self) -> &'static [u8; 4] {
        ICNS_MAGIC_LITERAL
    }

    /// Returns the length of the whole file, header included.
    pub fn total_length(&self) -> u32 {
        self.total_length
    }

    /// Returns the header's eight bytes.
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        bytes[0..4].copy_from_slice(ICNS_MAGIC_LITERAL);
        BigEndian::write_u32(&mut bytes[4..8], self.total_length);
        bytes
    }

    fn parse(bytes: &[u8]) -> Result<FileHeader> {
        if bytes.len() < FILE_HEADER_LENGTH as usize {
            return Err(IcnsError::InvalidHeader(format!("only {} bytes of data",
                                                        bytes.len())));
        }
        if bytes[0..4] != ICNS_MAGIC_LITERAL[..] {
            return Err(IcnsError::InvalidHeader("wrong magic literal".to_string()));
        }
        let total_length = BigEndian::read_u32(&bytes[4..8]);
        if total_length < FILE_HEADER_LENGTH {
            return Err(IcnsError::InvalidHeader(format!("declared length {} is shorter \
                                                         than the header",
                                                        total_length)));
        }
        Ok(FileHeader { total_length })
    }
}

/// A set of icons stored in a single ICNS file: a header followed by icon
/// entries in file order.  Entries are only changed through
/// [`append`](#method.append), [`insert`](#method.insert) and
/// [`remove`](#method.remove), each of which keeps the header's total length
/// equal to the serialized length of the container.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconContainer {
    header: FileHeader,
    entries: Vec<ImageEntry>,
}

impl Default for IconContainer {
    fn default() -> IconContainer {
        IconContainer::new()
    }
}

impl IconContainer {
    /// Creates a new, empty container.
    pub fn new() -> IconContainer {
        IconContainer {
            header: FileHeader {
                total_length: FILE_HEADER_LENGTH,
            },
            entries: Vec::new(),
        }
    }

    /// Returns the file header.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Returns the entries, in file order.
    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the container holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }

    /// Returns the first entry with the given OSType.
    pub fn find(&self, ostype: OSType) -> Option<&ImageEntry> {
        self.entries.iter().find(|entry| entry.ostype() == ostype)
    }

    /// Returns the encoded length of the file, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        self.header.total_length
    }

    /// Adds an entry after all existing entries.
    pub fn append(&mut self, entry: ImageEntry) -> Result<()> {
        let index = self.entries.len();
        self.insert(entry, index)
    }

    /// Inserts an entry at `index`, shifting later entries right.  `index`
    /// may equal the number of entries (appending); anything larger fails
    /// with [`IcnsError::IndexOutOfRange`].
    pub fn insert(&mut self, entry: ImageEntry, index: usize) -> Result<()> {
        if index > self.entries.len() {
            return Err(IcnsError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let total_length = self.header.total_length as usize +
                           ENTRY_HEADER_LENGTH as usize +
                           entry.data().len();
        if total_length > u32::MAX as usize {
            return Err(IcnsError::ContainerTooLarge(total_length));
        }
        debug!("inserting '{}' entry ({} bytes) at index {}",
               entry.ostype(),
               entry.total_length(),
               index);
        self.entries.insert(index, entry);
        self.header.total_length = total_length as u32;
        Ok(())
    }

    /// Removes and returns the entry at `index`, shifting later entries
    /// left.
    pub fn remove(&mut self, index: usize) -> Result<ImageEntry> {
        if index >= self.entries.len() {
            return Err(IcnsError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let entry = self.entries.remove(index);
        self.header.total_length -= entry.total_length();
        debug!("removed '{}' entry at index {}", entry.ostype(), index);
        Ok(entry)
    }

    /// Returns a list of all (non-mask) icon types for which the container
    /// holds the necessary entries for a complete icon image (including
    /// alpha channel).  These icon types can be passed to
    /// [`decode_icon`](#method.decode_icon).
    pub fn available_icons(&self) -> Vec<IconType> {
        let mut result = Vec::new();
        for entry in &self.entries {
            if let Some(icon_type) = entry.icon_type() {
                if icon_type.is_mask() || result.contains(&icon_type) {
                    continue;
                }
                let complete = match icon_type.mask_type() {
                    Some(mask_type) => self.find(mask_type.ostype()).is_some(),
                    None => true,
                };
                if complete {
                    result.push(icon_type);
                }
            }
        }
        result
    }

    /// Decodes the icon with the given type back into RGBA pixels.  Packed
    /// RGB icons take their alpha from the matching mask entry when there is
    /// one.  PNG payloads go through `decoder` and must have the registered
    /// size.
    pub fn decode_icon<D: PngDecoder + ?Sized>(&self,
                                               icon_type: IconType,
                                               decoder: &D)
                                               -> Result<DecodedImage> {
        let ostype = icon_type.ostype();
        let entry = self.find(ostype).ok_or(IcnsError::MissingEntry(ostype))?;
        let size = icon_type.pixel_size();
        let rgba = match icon_type.encoding() {
            Encoding::RawPNG => {
                let image = decoder.decode(entry.data())?;
                if image.width() != image.height() {
                    return Err(IcnsError::NotSquare {
                        width: image.width(),
                        height: image.height(),
                    });
                }
                if image.width() != size {
                    return Err(IcnsError::SizeMismatch {
                        ostype,
                        expected: size,
                        actual: image.width(),
                    });
                }
                return Ok(image);
            }
            Encoding::PackedRGB => {
                let planes = entry.decode_channels()?;
                let mask = icon_type
                    .mask_type()
                    .and_then(|mask_type| self.find(mask_type.ostype()))
                    .map(ImageEntry::data);
                planes.to_rgba(mask)?
            }
            Encoding::PackedARGB | Encoding::RawMask => {
                entry.decode_channels()?.to_rgba(None)?
            }
        };
        DecodedImage::from_rgba(size, size, rgba).ok_or_else(|| {
            IcnsError::MalformedEncoding(format!("'{}' decoded to the wrong number of pixels",
                                                 ostype))
        })
    }

    /// Parses a complete ICNS file held in memory.  Entries are read until
    /// the length declared by the header is reached; bytes after that are
    /// ignored.
    pub fn parse(bytes: &[u8]) -> Result<IconContainer> {
        let header = FileHeader::parse(bytes)?;
        let declared = header.total_length;
        let body = bytes.get(..declared as usize).ok_or(IcnsError::TruncatedContainer {
            declared,
            available: bytes.len(),
        })?;
        let mut container = IconContainer::new();
        let mut position = FILE_HEADER_LENGTH as usize;
        while position < body.len() {
            let (entry, consumed) = match ImageEntry::parse(&body[position..]) {
                Ok(parsed) => parsed,
                Err(IcnsError::TruncatedEntry { .. }) => {
                    return Err(IcnsError::TruncatedContainer {
                        declared,
                        available: bytes.len(),
                    });
                }
                Err(error) => return Err(error),
            };
            trace!("parsed '{}' entry ({} bytes) at offset {}",
                   entry.ostype(),
                   consumed,
                   position);
            if entry.icon_type().is_none() {
                warn!("keeping '{}' entry with unsupported icon type as opaque data",
                      entry.ostype());
            }
            position += consumed;
            container.entries.push(entry);
        }
        container.header = header;
        if bytes.len() > body.len() {
            debug!("ignoring {} bytes after the declared end of the file",
                   bytes.len() - body.len());
        }
        debug!("parsed icns container with {} entries ({} bytes)",
               container.entries.len(),
               declared);
        Ok(container)
    }

    /// Reads an icon container from an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> Result<IconContainer> {
        let mut bytes = Vec::with_capacity(FILE_HEADER_LENGTH as usize);
        reader.by_ref().take(u64::from(FILE_HEADER_LENGTH)).read_to_end(&mut bytes)?;
        let header = FileHeader::parse(&bytes)?;
        let remaining = u64::from(header.total_length - FILE_HEADER_LENGTH);
        reader.take(remaining).read_to_end(&mut bytes)?;
        IconContainer::parse(&bytes)
    }

    /// Serializes the container: the header, then every entry in order.
    pub fn serialize(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.header.total_length as usize);
        output.extend_from_slice(&self.header.to_bytes());
        for entry in &self.entries {
            output.extend(entry.serialize());
        }
        debug!("serialized icns container with {} entries ({} bytes)",
               self.entries.len(),
               output.len());
        output
    }

    /// Writes the icon container to an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(ICNS_MAGIC_LITERAL)?;
        writer.write_u32::<BigEndian>(self.header.total_length)?;
        for entry in &self.entries {
            entry.write(writer.by_ref())?;
        }
        Ok(())
    }
}
