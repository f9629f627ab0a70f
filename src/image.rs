use thiserror::Error;

/// A decoded image, always held as 8-bit RGBA rows.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl DecodedImage {
    /// Creates a new image with all pixel data set to zero.
    pub fn new(width: u32, height: u32) -> DecodedImage {
        let num_bytes = 4 * (width as usize) * (height as usize);
        DecodedImage {
            width,
            height,
            rgba: vec![0u8; num_bytes],
        }
    }

    /// Wraps existing RGBA data.  Returns `None` if the buffer length is not
    /// `4 * width * height`.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<DecodedImage> {
        if rgba.len() != 4 * (width as usize) * (height as usize) {
            return None;
        }
        Some(DecodedImage { width, height, rgba })
    }

    /// Wraps 24-bit RGB data, filling the alpha channel with 255.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Option<DecodedImage> {
        DecodedImage::from_rgba(width, height, rgb_to_rgba(rgb)?)
    }

    /// Wraps 8-bit grayscale data, filling the alpha channel with 255.
    pub fn from_gray(width: u32, height: u32, gray: &[u8]) -> Option<DecodedImage> {
        DecodedImage::from_rgba(width, height, gray_alpha_to_rgba(gray, None))
    }

    /// Wraps 16-bit grayscale-with-alpha data.
    pub fn from_gray_alpha(width: u32, height: u32, gray_alpha: &[u8]) -> Option<DecodedImage> {
        if gray_alpha.len() % 2 != 0 {
            return None;
        }
        let gray: Vec<u8> = gray_alpha.iter().step_by(2).cloned().collect();
        let alpha: Vec<u8> = gray_alpha.iter().skip(1).step_by(2).cloned().collect();
        DecodedImage::from_rgba(width, height, gray_alpha_to_rgba(&gray, Some(&alpha[..])))
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image's RGBA pixel data, row-major.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Returns a mutable reference to the image's RGBA pixel data.
    pub fn rgba_mut(&mut self) -> &mut [u8] {
        &mut self.rgba
    }

    /// Consumes the image, returning its RGBA pixel data.
    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }
}

/// Failure reported by a [`PngDecoder`].
#[derive(Debug, Error)]
#[error("failed to decode PNG data: {message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    /// Creates a decode error with the given description.
    pub fn new<S: Into<String>>(message: S) -> DecodeError {
        DecodeError {
            message: message.into(),
        }
    }

    /// Returns the description of what went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Something that can turn PNG bytes into RGBA pixels.  The codec never
/// decodes PNG data itself; callers inject an implementation (the `pngio`
/// feature provides one backed by the `png` crate).
pub trait PngDecoder {
    /// Decodes a complete PNG file.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError>;
}

impl<'a, D: PngDecoder + ?Sized> PngDecoder for &'a D {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        (**self).decode(bytes)
    }
}

/// Converts RGB image data into RGBA.
fn rgb_to_rgba(rgb: &[u8]) -> Option<Vec<u8>> {
    if rgb.len() % 3 != 0 {
        return None;
    }
    let num_pixels = rgb.len() / 3;
    let mut rgba = Vec::with_capacity(num_pixels * 4);
    for pixel in rgb.chunks(3) {
        rgba.extend_from_slice(pixel);
        rgba.push(u8::MAX);
    }
    Some(rgba)
}

/// Converts grayscale image data (with optional alpha) into RGBA.
fn gray_alpha_to_rgba(gray: &[u8], alpha: Option<&[u8]>) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(gray.len() * 4);
    for (index, &value) in gray.iter().enumerate() {
        rgba.push(value);
        rgba.push(value);
        rgba.push(value);
        rgba.push(alpha.map_or(u8::MAX, |alpha| alpha[index]));
    }
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_checks_length() {
        assert!(DecodedImage::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(DecodedImage::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn rgb_gets_opaque_alpha() {
        let image = DecodedImage::from_rgb(2, 1, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(image.rgba(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn gray_expands_to_rgba() {
        let image = DecodedImage::from_gray(2, 1, &[7, 9]).unwrap();
        assert_eq!(image.rgba(), &[7, 7, 7, 255, 9, 9, 9, 255]);
        let image = DecodedImage::from_gray_alpha(1, 1, &[7, 100]).unwrap();
        assert_eq!(image.rgba(), &[7, 7, 7, 100]);
    }

    #[test]
    fn into_rgba_returns_pixel_buffer() {
        let mut image = DecodedImage::new(1, 2);
        image.rgba_mut()[5] = 42;
        assert_eq!(image.into_rgba(), vec![0, 0, 0, 0, 0, 42, 0, 0]);
    }

    #[test]
    fn decode_error_keeps_message() {
        let error = DecodeError::new("bad IHDR chunk");
        assert_eq!(error.message(), "bad IHDR chunk");
        assert_eq!(error.to_string(), "failed to decode PNG data: bad IHDR chunk");
    }
}
