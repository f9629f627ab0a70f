use std::io::{self, Cursor, Write};

use crate::image::{DecodeError, DecodedImage, PngDecoder};

/// A [`PngDecoder`] backed by the `png` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCodec;

impl PngDecoder for PngCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        decoder.set_transformations(
            png::Transformations::STRIP_16 | png::Transformations::EXPAND,
        );
        let mut reader = decoder.read_info().map_err(png_error)?;
        let (width, height) = {
            let info = reader.info();
            (info.width, info.height)
        };
        let (color_type, bit_depth) = reader.output_color_type();
        if bit_depth != png::BitDepth::Eight {
            return Err(DecodeError::new(format!(
                "unexpected output bit depth {:?}",
                bit_depth
            )));
        }
        let buffer_size = reader
            .output_buffer_size()
            .ok_or_else(|| DecodeError::new("image is too large to decode"))?;
        let mut data = vec![0u8; buffer_size];
        reader.next_frame(&mut data).map_err(png_error)?;
        reader.finish().map_err(png_error)?;

        let image = match color_type {
            png::ColorType::Rgba => DecodedImage::from_rgba(width, height, data),
            png::ColorType::Rgb => DecodedImage::from_rgb(width, height, &data),
            png::ColorType::GrayscaleAlpha => {
                DecodedImage::from_gray_alpha(width, height, &data)
            }
            png::ColorType::Grayscale => {
                DecodedImage::from_gray(width, height, &data)
            }
            // EXPAND prevents paletted output.
            png::ColorType::Indexed => None,
        };
        image.ok_or_else(|| {
            DecodeError::new(format!("unexpected {:?} pixel layout", color_type))
        })
    }
}

impl DecodedImage {
    /// Writes the image to a PNG file.
    pub fn write_png<W: Write>(&self, output: W) -> io::Result<()> {
        let mut encoder = png::Encoder::new(output, self.width(), self.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(self.rgba())?;
        writer.finish()?;
        Ok(())
    }

    /// Encodes the image as an in-memory PNG file.
    pub fn to_png(&self) -> io::Result<Vec<u8>> {
        let mut output = Vec::new();
        self.write_png(&mut output)?;
        Ok(output)
    }
}

fn png_error(error: png::DecodingError) -> DecodeError {
    DecodeError::new(error.to_string())
}
