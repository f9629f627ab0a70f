//! Conversion between interleaved RGBA pixels and the channel-plane payloads
//! of the non-PNG icon encodings.

use crate::error::{IcnsError, Result};
use crate::icontype::{Encoding, IconType, OSType};
use crate::rle;

/// Tag that opens every `PackedARGB` payload.
const ARGB_TAG: &[u8; 4] = b"ARGB";

/// Zero bytes ahead of the planes of a prefixed `PackedRGB` payload.
const ZERO_PREFIX: [u8; 4] = [0; 4];

const RED: usize = 0;
const GREEN: usize = 1;
const BLUE: usize = 2;
const ALPHA: usize = 3;

/// The channel planes recovered from one entry payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChannelPlanes {
    /// Color without alpha (`PackedRGB`).
    Rgb {
        /// Red plane.
        red: Vec<u8>,
        /// Green plane.
        green: Vec<u8>,
        /// Blue plane.
        blue: Vec<u8>,
    },
    /// Color with alpha (`PackedARGB`).
    Argb {
        /// Alpha plane.
        alpha: Vec<u8>,
        /// Red plane.
        red: Vec<u8>,
        /// Green plane.
        green: Vec<u8>,
        /// Blue plane.
        blue: Vec<u8>,
    },
    /// Alpha only (`RawMask`).
    Mask {
        /// Alpha plane.
        alpha: Vec<u8>,
    },
}

impl ChannelPlanes {
    /// Returns the number of pixels in each plane.
    pub fn pixel_count(&self) -> usize {
        match self {
            ChannelPlanes::Rgb { red, .. } => red.len(),
            ChannelPlanes::Argb { alpha, .. } | ChannelPlanes::Mask { alpha } => alpha.len(),
        }
    }

    /// Re-interleaves the planes into RGBA pixels.  `mask`, if given,
    /// replaces the alpha channel; otherwise missing alpha is 255 and missing
    /// color is 0.
    pub fn to_rgba(&self, mask: Option<&[u8]>) -> Result<Vec<u8>> {
        let pixel_count = self.pixel_count();
        if let Some(mask) = mask {
            if mask.len() != pixel_count {
                return Err(IcnsError::MalformedEncoding(format!(
                    "mask has {} pixels but the image has {}",
                    mask.len(),
                    pixel_count
                )));
            }
        }
        let opaque = vec![u8::MAX; pixel_count];
        let empty = vec![0u8; pixel_count];
        let (red, green, blue, alpha) = match self {
            ChannelPlanes::Rgb { red, green, blue } => {
                (&red[..], &green[..], &blue[..], &opaque[..])
            }
            ChannelPlanes::Argb { alpha, red, green, blue } => {
                (&red[..], &green[..], &blue[..], &alpha[..])
            }
            ChannelPlanes::Mask { alpha } => (&empty[..], &empty[..], &empty[..], &alpha[..]),
        };
        for plane in &[red, green, blue, alpha] {
            if plane.len() != pixel_count {
                return Err(IcnsError::MalformedEncoding(format!(
                    "plane has {} pixels but the image has {}",
                    plane.len(),
                    pixel_count
                )));
            }
        }
        let alpha = mask.unwrap_or(alpha);
        let mut rgba = Vec::with_capacity(4 * pixel_count);
        for index in 0..pixel_count {
            rgba.push(red[index]);
            rgba.push(green[index]);
            rgba.push(blue[index]);
            rgba.push(alpha[index]);
        }
        Ok(rgba)
    }
}

/// Builds the entry payload for `rgba` pixels under the given encoding.
/// `PackedRGB` payloads for `it32` get the four-byte zero prefix.  PNG
/// payloads are never built here: the original PNG bytes are stored as-is.
pub fn build_payload(rgba: &[u8], encoding: Encoding, ostype: OSType) -> Result<Vec<u8>> {
    if rgba.len() % 4 != 0 {
        return Err(IcnsError::PixelDataLength {
            expected: rgba.len() - rgba.len() % 4,
            actual: rgba.len(),
        });
    }
    match encoding {
        Encoding::RawPNG => Err(IcnsError::UnsupportedEncoding(encoding)),
        Encoding::PackedRGB => {
            let mut payload = Vec::new();
            if zero_prefixed(ostype) {
                payload.extend_from_slice(&ZERO_PREFIX);
            }
            for &channel in &[RED, GREEN, BLUE] {
                payload.extend(rle::encode(&plane(rgba, channel)));
            }
            Ok(payload)
        }
        Encoding::PackedARGB => {
            let mut payload = ARGB_TAG.to_vec();
            for &channel in &[ALPHA, RED, GREEN, BLUE] {
                payload.extend(rle::encode(&plane(rgba, channel)));
            }
            Ok(payload)
        }
        Encoding::RawMask => Ok(plane(rgba, ALPHA)),
    }
}

/// Recovers the channel planes of a payload built by [`build_payload`].
/// Every plane must decode to exactly `pixel_count` bytes.
pub fn extract_channels(payload: &[u8],
                        encoding: Encoding,
                        ostype: OSType,
                        pixel_count: usize)
                        -> Result<ChannelPlanes> {
    match encoding {
        Encoding::RawPNG => Err(IcnsError::UnsupportedEncoding(encoding)),
        Encoding::PackedRGB => {
            let packed = if zero_prefixed(ostype) {
                payload.get(ZERO_PREFIX.len()..).ok_or_else(|| {
                    IcnsError::MalformedEncoding(format!("'{}' payload is missing its zero prefix",
                                                         ostype))
                })?
            } else {
                payload
            };
            let [red, green, blue] = decode_planes::<3>(packed, pixel_count)?;
            Ok(ChannelPlanes::Rgb { red, green, blue })
        }
        Encoding::PackedARGB => {
            if !payload.starts_with(ARGB_TAG) {
                return Err(IcnsError::MalformedEncoding("payload does not start with 'ARGB'"
                                                            .to_string()));
            }
            let [alpha, red, green, blue] =
                decode_planes::<4>(&payload[ARGB_TAG.len()..], pixel_count)?;
            Ok(ChannelPlanes::Argb { alpha, red, green, blue })
        }
        Encoding::RawMask => {
            if payload.len() != pixel_count {
                return Err(IcnsError::MalformedEncoding(format!(
                    "mask has {} bytes instead of {}",
                    payload.len(),
                    pixel_count
                )));
            }
            Ok(ChannelPlanes::Mask { alpha: payload.to_vec() })
        }
    }
}

/// De-interleaves one channel out of RGBA pixels.
fn plane(rgba: &[u8], channel: usize) -> Vec<u8> {
    rgba.iter().skip(channel).step_by(4).cloned().collect()
}

/// Decodes `N` packed planes stored back to back, with nothing after them.
fn decode_planes<const N: usize>(mut packed: &[u8], pixel_count: usize) -> Result<[Vec<u8>; N]> {
    let mut planes: [Vec<u8>; N] = std::array::from_fn(|_| Vec::new());
    for plane in planes.iter_mut() {
        let (decoded, consumed) = rle::decode_prefix(packed, pixel_count)?;
        *plane = decoded;
        packed = &packed[consumed..];
    }
    if !packed.is_empty() {
        return Err(IcnsError::MalformedEncoding(format!("{} bytes of trailing data after \
                                                         the last plane",
                                                        packed.len())));
    }
    Ok(planes)
}

fn zero_prefixed(ostype: OSType) -> bool {
    IconType::from_ostype(ostype).map_or(false, IconType::has_zero_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_rgba(pixel_count: usize, pixel: [u8; 4]) -> Vec<u8> {
        pixel.iter().cloned().cycle().take(4 * pixel_count).collect()
    }

    fn gradient_rgba(pixel_count: usize) -> Vec<u8> {
        (0..4 * pixel_count).map(|i| (i / 7 % 251) as u8).collect()
    }

    #[test]
    fn argb_payload_for_solid_red() {
        let rgba = solid_rgba(256, [255, 0, 0, 255]);
        let payload = build_payload(&rgba, Encoding::PackedARGB, OSType(*b"ic04")).unwrap();
        let expected: Vec<u8> = b"ARGB"
            .iter()
            .cloned()
            .chain(vec![255, 255, 251, 255]) // alpha
            .chain(vec![255, 255, 251, 255]) // red
            .chain(vec![255, 0, 251, 0]) // green
            .chain(vec![255, 0, 251, 0]) // blue
            .collect();
        assert_eq!(payload, expected);
    }

    #[test]
    fn rgb_payload_has_no_prefix_except_for_it32() {
        let rgba = solid_rgba(256, [1, 2, 3, 4]);
        let payload = build_payload(&rgba, Encoding::PackedRGB, OSType(*b"is32")).unwrap();
        assert_eq!(payload, vec![255, 1, 251, 1, 255, 2, 251, 2, 255, 3, 251, 3]);

        let rgba = solid_rgba(128 * 128, [1, 2, 3, 4]);
        let payload = build_payload(&rgba, Encoding::PackedRGB, OSType(*b"it32")).unwrap();
        assert_eq!(&payload[..4], &[0, 0, 0, 0]);
        let unprefixed = build_payload(&rgba, Encoding::PackedRGB, OSType(*b"il32")).unwrap();
        assert_eq!(&payload[4..], &unprefixed[..]);
    }

    #[test]
    fn mask_payload_is_raw_alpha() {
        let rgba = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let payload = build_payload(&rgba, Encoding::RawMask, OSType(*b"s8mk")).unwrap();
        assert_eq!(payload, vec![4, 8]);
    }

    #[test]
    fn png_encoding_is_unsupported() {
        let rgba = solid_rgba(4, [0, 0, 0, 0]);
        assert!(matches!(build_payload(&rgba, Encoding::RawPNG, OSType(*b"ic07")),
                         Err(IcnsError::UnsupportedEncoding(Encoding::RawPNG))));
        assert!(matches!(extract_channels(&[], Encoding::RawPNG, OSType(*b"ic07"), 4),
                         Err(IcnsError::UnsupportedEncoding(Encoding::RawPNG))));
    }

    #[test]
    fn ragged_pixel_data_is_rejected() {
        assert!(matches!(build_payload(&[0; 5], Encoding::RawMask, OSType(*b"s8mk")),
                         Err(IcnsError::PixelDataLength { expected: 4, actual: 5 })));
    }

    #[test]
    fn extract_inverts_build() {
        let cases: [(&[u8; 4], Encoding, usize); 4] = [
            (b"is32", Encoding::PackedRGB, 256),
            (b"it32", Encoding::PackedRGB, 128 * 128),
            (b"ic05", Encoding::PackedARGB, 1024),
            (b"l8mk", Encoding::RawMask, 1024),
        ];
        for &(code, encoding, pixel_count) in &cases {
            let ostype = OSType(*code);
            let rgba = gradient_rgba(pixel_count);
            let payload = build_payload(&rgba, encoding, ostype).unwrap();
            let planes = extract_channels(&payload, encoding, ostype, pixel_count).unwrap();
            assert_eq!(planes.pixel_count(), pixel_count);
            let restored = planes.to_rgba(None).unwrap();
            for (index, (got, want)) in restored.iter().zip(rgba.iter()).enumerate() {
                let expected = match (encoding, index % 4) {
                    (Encoding::PackedRGB, ALPHA) => 255,
                    (Encoding::RawMask, RED) |
                    (Encoding::RawMask, GREEN) |
                    (Encoding::RawMask, BLUE) => 0,
                    _ => *want,
                };
                assert_eq!(*got, expected, "{} byte {}", ostype, index);
            }
        }
    }

    #[test]
    fn mask_replaces_alpha() {
        let planes = ChannelPlanes::Rgb {
            red: vec![1, 2],
            green: vec![3, 4],
            blue: vec![5, 6],
        };
        assert_eq!(planes.to_rgba(Some(&[9, 10])).unwrap(),
                   vec![1, 3, 5, 9, 2, 4, 6, 10]);
        assert!(planes.to_rgba(Some(&[9])).is_err());
    }

    #[test]
    fn ragged_planes_are_rejected() {
        let planes = ChannelPlanes::Rgb {
            red: vec![1, 2],
            green: vec![3],
            blue: vec![],
        };
        assert!(matches!(planes.to_rgba(None), Err(IcnsError::MalformedEncoding(_))));
        let planes = ChannelPlanes::Argb {
            alpha: vec![1, 2, 3],
            red: vec![1, 2, 3],
            green: vec![1, 2, 3],
            blue: vec![1, 2],
        };
        assert!(matches!(planes.to_rgba(Some(&[7, 8, 9])),
                         Err(IcnsError::MalformedEncoding(_))));
    }

    #[test]
    fn extract_rejects_bad_payloads() {
        let ostype = OSType(*b"ic04");
        assert!(matches!(extract_channels(b"RGBA", Encoding::PackedARGB, ostype, 0),
                         Err(IcnsError::MalformedEncoding(_))));
        // One plane short.
        let short = [b'A', b'R', b'G', b'B', 128, 0, 128, 0, 128, 0];
        assert!(matches!(extract_channels(&short, Encoding::PackedARGB, ostype, 3),
                         Err(IcnsError::MalformedEncoding(_))));
        // Trailing garbage.
        let long = [128, 0, 128, 0, 128, 0, 7];
        assert!(matches!(extract_channels(&long, Encoding::PackedRGB, OSType(*b"is32"), 3),
                         Err(IcnsError::MalformedEncoding(_))));
        assert!(matches!(extract_channels(&[0, 0], Encoding::PackedRGB, OSType(*b"it32"), 1),
                         Err(IcnsError::MalformedEncoding(_))));
        assert!(matches!(extract_channels(&[0; 3], Encoding::RawMask, OSType(*b"s8mk"), 4),
                         Err(IcnsError::MalformedEncoding(_))));
    }
}
