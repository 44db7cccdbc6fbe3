use std::{
    fs,
    io::{BufRead, Cursor, Seek},
    path::Path,
};

use image::{io::Reader as ImageReader, ColorType, DynamicImage, ImageFormat};
use printpdf::{ColorBits, ColorSpace, ImageFilter, ImageXObject, Px};

use crate::Result;

#[derive(Debug)]
pub struct Image {
    dynamic_image: DynamicImage,
    format: Option<ImageFormat>,
    bytes: Vec<u8>,
}

impl Image {
    /// ## Errors
    ///
    /// Fails if the image can't be read or decoded
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(fs::read(path)?)
    }

    /// The format is guessed from the content, never from the file name
    ///
    /// ## Errors
    ///
    /// Fails if the image format can't be guessed or the image can't be decoded
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let (dynamic_image, format) = decode(Cursor::new(&bytes))?;

        Ok(Self {
            dynamic_image,
            format,
            bytes,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.dynamic_image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.dynamic_image.height()
    }

    #[must_use]
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Whether the source bytes can be embedded as is, as a DCT stream.
    /// The decoder turns cmyk jpegs into rgb, so the component count is read from the file.
    fn is_plain_jpeg(&self) -> bool {
        self.format == Some(ImageFormat::Jpeg)
            && self.dynamic_image.color() == ColorType::Rgb8
            && jpeg_components(&self.bytes) == Some(3)
    }

    /// Converts the image into a pdf image object.
    /// Rgb jpegs keep their original compressed stream, anything else is stored as raw rgb.
    #[must_use]
    pub fn into_xobject(self) -> ImageXObject {
        let width = Px(self.width() as usize);
        let height = Px(self.height() as usize);
        let (image_data, image_filter) = if self.is_plain_jpeg() {
            (self.bytes, Some(ImageFilter::DCT))
        } else {
            (self.dynamic_image.into_rgb8().into_raw(), None)
        };

        ImageXObject {
            width,
            height,
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data,
            image_filter,
            clipping_bbox: None,
            smask: None,
        }
    }
}

/// Number of color components declared in the frame header of a jpeg
fn jpeg_components(bytes: &[u8]) -> Option<u8> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut pos = 2;
    loop {
        if *bytes.get(pos)? != 0xFF {
            return None;
        }
        let marker = *bytes.get(pos + 1)?;
        match marker {
            // fill byte
            0xFF => pos += 1,
            // markers without a payload
            0x01 | 0xD0..=0xD8 => pos += 2,
            // start of frame, except DHT, JPG and DAC which share the range
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                return bytes.get(pos + 9).copied();
            }
            // start of scan or end of image before any frame
            0xDA | 0xD9 => return None,
            _ => {
                let length = u16::from_be_bytes([*bytes.get(pos + 2)?, *bytes.get(pos + 3)?]);
                pos += 2 + usize::from(length);
            }
        }
    }
}

fn decode(reader: impl BufRead + Seek) -> Result<(DynamicImage, Option<ImageFormat>)> {
    let reader = ImageReader::new(reader).with_guessed_format()?;
    let format = reader.format();

    Ok((reader.decode()?, format))
}
