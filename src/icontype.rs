use std::fmt;
use std::str::FromStr;

/// Icon types known to the registry.  Each variant binds one OSType to the
/// pixel size and payload encoding an entry of that type must have.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IconType {
    /// 16x16 24-bit icon (without alpha).
    RGB24_16x16,
    /// 16x16 8-bit alpha mask.
    Mask8_16x16,
    /// 32x32 24-bit icon (without alpha).
    RGB24_32x32,
    /// 32x32 8-bit alpha mask.
    Mask8_32x32,
    /// 48x48 24-bit icon (without alpha).
    RGB24_48x48,
    /// 48x48 8-bit alpha mask.
    Mask8_48x48,
    /// 128x128 24-bit icon (without alpha).
    RGB24_128x128,
    /// 128x128 8-bit alpha mask.
    Mask8_128x128,
    /// 16x16 32-bit icon stored as packed ARGB planes.
    ARGB32_16x16,
    /// 32x32 32-bit icon stored as packed ARGB planes.
    ARGB32_32x32,
    /// 16x16 32-bit PNG icon.
    RGBA32_16x16,
    /// 32x32 32-bit PNG icon.
    RGBA32_32x32,
    /// 64x64 32-bit PNG icon.
    RGBA32_64x64,
    /// 128x128 32-bit PNG icon.
    RGBA32_128x128,
    /// 256x256 32-bit PNG icon.
    RGBA32_256x256,
    /// 512x512 32-bit PNG icon.
    RGBA32_512x512,
    /// 16x16 32-bit PNG icon at 2x "retina" density (so, 32 by 32 pixels).
    RGBA32_16x16_2x,
    /// 32x32 32-bit PNG icon at 2x "retina" density (so, 64 by 64 pixels).
    RGBA32_32x32_2x,
    /// 128x128 32-bit PNG icon at 2x "retina" density (so, 256 by 256
    /// pixels).
    RGBA32_128x128_2x,
    /// 256x256 32-bit PNG icon at 2x "retina" density (so, 512 by 512
    /// pixels).
    RGBA32_256x256_2x,
    /// 512x512 32-bit PNG icon at 2x "retina" density (so, 1024 by 1024
    /// pixels).
    RGBA32_512x512_2x,
}

impl IconType {
    /// Every registered icon type, in registry order.
    pub const ALL: [IconType; 21] = [
        IconType::RGB24_16x16,
        IconType::Mask8_16x16,
        IconType::RGB24_32x32,
        IconType::Mask8_32x32,
        IconType::RGB24_48x48,
        IconType::Mask8_48x48,
        IconType::RGB24_128x128,
        IconType::Mask8_128x128,
        IconType::ARGB32_16x16,
        IconType::ARGB32_32x32,
        IconType::RGBA32_16x16,
        IconType::RGBA32_32x32,
        IconType::RGBA32_64x64,
        IconType::RGBA32_128x128,
        IconType::RGBA32_256x256,
        IconType::RGBA32_512x512,
        IconType::RGBA32_16x16_2x,
        IconType::RGBA32_32x32_2x,
        IconType::RGBA32_128x128_2x,
        IconType::RGBA32_256x256_2x,
        IconType::RGBA32_512x512_2x,
    ];

    /// Looks up the icon type registered for the given OSType, if any.
    /// Unknown codes never fall back to a default type.
    pub fn from_ostype(ostype: OSType) -> Option<IconType> {
        let OSType(raw_ostype) = ostype;
        match &raw_ostype {
            b"is32" => Some(IconType::RGB24_16x16),
            b"s8mk" => Some(IconType::Mask8_16x16),
            b"il32" => Some(IconType::RGB24_32x32),
            b"l8mk" => Some(IconType::Mask8_32x32),
            b"ih32" => Some(IconType::RGB24_48x48),
            b"h8mk" => Some(IconType::Mask8_48x48),
            b"it32" => Some(IconType::RGB24_128x128),
            b"t8mk" => Some(IconType::Mask8_128x128),
            b"ic04" => Some(IconType::ARGB32_16x16),
            b"ic05" => Some(IconType::ARGB32_32x32),
            b"icp4" => Some(IconType::RGBA32_16x16),
            b"icp5" => Some(IconType::RGBA32_32x32),
            b"icp6" => Some(IconType::RGBA32_64x64),
            b"ic07" => Some(IconType::RGBA32_128x128),
            b"ic08" => Some(IconType::RGBA32_256x256),
            b"ic09" => Some(IconType::RGBA32_512x512),
            b"ic11" => Some(IconType::RGBA32_16x16_2x),
            b"ic12" => Some(IconType::RGBA32_32x32_2x),
            b"ic13" => Some(IconType::RGBA32_128x128_2x),
            b"ic14" => Some(IconType::RGBA32_256x256_2x),
            b"ic10" => Some(IconType::RGBA32_512x512_2x),
            _ => None,
        }
    }

    /// Get the OSType that represents this icon type.
    pub fn ostype(self) -> OSType {
        match self {
            IconType::RGB24_16x16 => OSType(*b"is32"),
            IconType::Mask8_16x16 => OSType(*b"s8mk"),
            IconType::RGB24_32x32 => OSType(*b"il32"),
            IconType::Mask8_32x32 => OSType(*b"l8mk"),
            IconType::RGB24_48x48 => OSType(*b"ih32"),
            IconType::Mask8_48x48 => OSType(*b"h8mk"),
            IconType::RGB24_128x128 => OSType(*b"it32"),
            IconType::Mask8_128x128 => OSType(*b"t8mk"),
            IconType::ARGB32_16x16 => OSType(*b"ic04"),
            IconType::ARGB32_32x32 => OSType(*b"ic05"),
            IconType::RGBA32_16x16 => OSType(*b"icp4"),
            IconType::RGBA32_32x32 => OSType(*b"icp5"),
            IconType::RGBA32_64x64 => OSType(*b"icp6"),
            IconType::RGBA32_128x128 => OSType(*b"ic07"),
            IconType::RGBA32_256x256 => OSType(*b"ic08"),
            IconType::RGBA32_512x512 => OSType(*b"ic09"),
            IconType::RGBA32_16x16_2x => OSType(*b"ic11"),
            IconType::RGBA32_32x32_2x => OSType(*b"ic12"),
            IconType::RGBA32_128x128_2x => OSType(*b"ic13"),
            IconType::RGBA32_256x256_2x => OSType(*b"ic14"),
            IconType::RGBA32_512x512_2x => OSType(*b"ic10"),
        }
    }

    /// Returns the edge length, in pixels, that images of this type must
    /// have.  For 2x "retina" density icons this is twice the screen size.
    ///
    /// # Examples
    /// ```
    /// use icns::IconType;
    /// assert_eq!(IconType::Mask8_128x128.pixel_size(), 128);
    /// assert_eq!(IconType::RGBA32_256x256.pixel_size(), 256);
    /// assert_eq!(IconType::RGBA32_256x256_2x.pixel_size(), 512);
    /// assert_eq!(IconType::RGBA32_512x512_2x.pixel_size(), 1024);
    /// ```
    pub fn pixel_size(self) -> u32 {
        self.screen_size() * self.pixel_density()
    }

    /// Returns every distinct pixel size in the registry, smallest first.
    ///
    /// # Examples
    /// ```
    /// use icns::IconType;
    /// assert_eq!(IconType::supported_sizes(),
    ///            vec![16, 32, 48, 64, 128, 256, 512, 1024]);
    /// ```
    pub fn supported_sizes() -> Vec<u32> {
        let mut sizes: Vec<u32> =
            IconType::ALL.iter().map(|icon_type| icon_type.pixel_size()).collect();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }

    /// Returns the number of pixels in one channel plane of this type.
    pub fn pixel_count(self) -> usize {
        let size = self.pixel_size() as usize;
        size * size
    }

    /// Returns the pixel density for this icon type -- that is, 2 for 2x
    /// "retina" density icons, or 1 for other icon types.
    pub fn pixel_density(self) -> u32 {
        match self {
            IconType::RGBA32_16x16_2x
            | IconType::RGBA32_32x32_2x
            | IconType::RGBA32_128x128_2x
            | IconType::RGBA32_256x256_2x
            | IconType::RGBA32_512x512_2x => 2,
            _ => 1,
        }
    }

    /// Returns the screen edge length of this icon type.  Normally this is
    /// the same as the pixel size, but for 2x "retina" density icons, this
    /// will be half that value.
    ///
    /// # Examples
    /// ```
    /// use icns::IconType;
    /// assert_eq!(IconType::RGBA32_32x32.screen_size(), 32);
    /// assert_eq!(IconType::RGBA32_16x16_2x.screen_size(), 16);
    /// ```
    pub fn screen_size(self) -> u32 {
        match self {
            IconType::RGB24_16x16
            | IconType::Mask8_16x16
            | IconType::ARGB32_16x16
            | IconType::RGBA32_16x16
            | IconType::RGBA32_16x16_2x => 16,
            IconType::RGB24_32x32
            | IconType::Mask8_32x32
            | IconType::ARGB32_32x32
            | IconType::RGBA32_32x32
            | IconType::RGBA32_32x32_2x => 32,
            IconType::RGB24_48x48 | IconType::Mask8_48x48 => 48,
            IconType::RGBA32_64x64 => 64,
            IconType::RGB24_128x128
            | IconType::Mask8_128x128
            | IconType::RGBA32_128x128
            | IconType::RGBA32_128x128_2x => 128,
            IconType::RGBA32_256x256 | IconType::RGBA32_256x256_2x => 256,
            IconType::RGBA32_512x512 | IconType::RGBA32_512x512_2x => 512,
        }
    }

    /// Returns the encoding used within an ICNS file for this icon type.
    pub fn encoding(self) -> Encoding {
        match self {
            IconType::RGB24_16x16
            | IconType::RGB24_32x32
            | IconType::RGB24_48x48
            | IconType::RGB24_128x128 => Encoding::PackedRGB,
            IconType::Mask8_16x16
            | IconType::Mask8_32x32
            | IconType::Mask8_48x48
            | IconType::Mask8_128x128 => Encoding::RawMask,
            IconType::ARGB32_16x16 | IconType::ARGB32_32x32 => {
                Encoding::PackedARGB
            }
            IconType::RGBA32_16x16
            | IconType::RGBA32_32x32
            | IconType::RGBA32_64x64
            | IconType::RGBA32_128x128
            | IconType::RGBA32_256x256
            | IconType::RGBA32_512x512
            | IconType::RGBA32_16x16_2x
            | IconType::RGBA32_32x32_2x
            | IconType::RGBA32_128x128_2x
            | IconType::RGBA32_256x256_2x
            | IconType::RGBA32_512x512_2x => Encoding::RawPNG,
        }
    }

    /// Returns true if this is an alpha mask type.
    pub fn is_mask(self) -> bool {
        self.encoding() == Encoding::RawMask
    }

    /// Returns the mask type that supplies the alpha channel for this
    /// (packed RGB) icon type, if any.
    ///
    /// # Examples
    /// ```
    /// use icns::IconType;
    /// assert_eq!(IconType::RGB24_32x32.mask_type(),
    ///            Some(IconType::Mask8_32x32));
    /// assert_eq!(IconType::ARGB32_32x32.mask_type(), None);
    /// ```
    pub fn mask_type(self) -> Option<IconType> {
        match self {
            IconType::RGB24_16x16 => Some(IconType::Mask8_16x16),
            IconType::RGB24_32x32 => Some(IconType::Mask8_32x32),
            IconType::RGB24_48x48 => Some(IconType::Mask8_48x48),
            IconType::RGB24_128x128 => Some(IconType::Mask8_128x128),
            _ => None,
        }
    }

    /// Returns true if packed payloads of this type start with four zero
    /// bytes ahead of the channel planes.  Only `it32` does.
    pub fn has_zero_prefix(self) -> bool {
        self == IconType::RGB24_128x128
    }
}

/// A Macintosh OSType (also known as a ResType), used in ICNS files to
/// identify the type of each icon entry.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        let &OSType(raw) = self;
        for &byte in &raw {
            write!(out, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl FromStr for OSType {
    type Err = String;

    fn from_str(input: &str) -> Result<OSType, String> {
        let bytes = input.as_bytes();
        if bytes.len() != 4 {
            Err(format!("OSType string must be 4 bytes (was {})", bytes.len()))
        } else {
            let mut raw = [0u8; 4];
            raw.clone_from_slice(bytes);
            Ok(OSType(raw))
        }
    }
}

/// Method of encoding an image within an icon entry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Encoding {
    /// Payload is a complete PNG file.
    RawPNG,
    /// Payload is three RLE-packed planes (red, green, blue), no alpha.
    PackedRGB,
    /// Payload is the tag `ARGB` followed by four RLE-packed planes (alpha,
    /// red, green, blue).
    PackedARGB,
    /// Payload is one uncompressed 8-bit alpha plane.
    RawMask,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_type_ostype_round_trip() {
        for icon_type in &IconType::ALL {
            let ostype = icon_type.ostype();
            let from = IconType::from_ostype(ostype);
            assert_eq!(Some(*icon_type), from);
        }
    }

    #[test]
    fn unknown_ostype_has_no_icon_type() {
        assert_eq!(IconType::from_ostype(OSType(*b"quux")), None);
        assert_eq!(IconType::from_ostype(OSType(*b"IC04")), None);
    }

    #[test]
    fn retina_variants_differ_only_by_code() {
        assert_eq!(IconType::RGBA32_256x256.pixel_size(),
                   IconType::RGBA32_128x128_2x.pixel_size());
        assert_eq!(IconType::RGBA32_512x512.pixel_size(),
                   IconType::RGBA32_256x256_2x.pixel_size());
        assert_eq!(IconType::RGBA32_32x32.pixel_size(),
                   IconType::RGBA32_16x16_2x.pixel_size());
        assert_ne!(IconType::RGBA32_256x256.ostype(),
                   IconType::RGBA32_128x128_2x.ostype());
    }

    #[test]
    fn registry_sizes_and_encodings() {
        let expected: [(&str, u32, Encoding); 8] = [
            ("is32", 16, Encoding::PackedRGB),
            ("s8mk", 16, Encoding::RawMask),
            ("il32", 32, Encoding::PackedRGB),
            ("l8mk", 32, Encoding::RawMask),
            ("ic04", 16, Encoding::PackedARGB),
            ("ic05", 32, Encoding::PackedARGB),
            ("ic10", 1024, Encoding::RawPNG),
            ("ic12", 64, Encoding::RawPNG),
        ];
        for &(code, size, encoding) in &expected {
            let ostype = OSType::from_str(code).unwrap();
            let icon_type = IconType::from_ostype(ostype).unwrap();
            assert_eq!(icon_type.pixel_size(), size, "{}", code);
            assert_eq!(icon_type.encoding(), encoding, "{}", code);
        }
    }

    #[test]
    fn supported_sizes_are_sorted_and_distinct() {
        let sizes = IconType::supported_sizes();
        assert_eq!(sizes, vec![16, 32, 48, 64, 128, 256, 512, 1024]);
        for icon_type in &IconType::ALL {
            assert!(sizes.contains(&icon_type.pixel_size()));
        }
    }

    #[test]
    fn only_it32_has_zero_prefix() {
        let prefixed: Vec<IconType> = IconType::ALL
            .iter()
            .cloned()
            .filter(|t| t.has_zero_prefix())
            .collect();
        assert_eq!(prefixed, vec![IconType::RGB24_128x128]);
    }

    #[test]
    fn mask_types_are_masks_of_same_size() {
        for icon_type in &IconType::ALL {
            if let Some(mask_type) = icon_type.mask_type() {
                assert!(mask_type.is_mask());
                assert_eq!(mask_type.pixel_size(), icon_type.pixel_size());
            }
        }
    }

    #[test]
    fn ostype_to_and_from_str() {
        let ostype = OSType::from_str("abcd").expect("failed to parse OSType");
        assert_eq!(ostype.to_string(), "abcd".to_string());
    }

    #[test]
    fn ostype_from_str_failure() {
        assert_eq!(OSType::from_str("abc"),
                   Err("OSType string must be 4 bytes (was 3)".to_string()));
        assert_eq!(OSType::from_str("abcde"),
                   Err("OSType string must be 4 bytes (was 5)".to_string()));
    }
}
