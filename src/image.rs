use crate::refs::{ObjectReferences, RefType};
use crate::PlacardError;
use image::{ColorType, DynamicImage, GenericImageView};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::path::Path;

/// Pixel data an [Image] embeds
pub enum ImageData {
    /// Baseline RGB JPEGs can go into the PDF as-is
    Jpeg(Vec<u8>),
    Decoded(DynamicImage),
}

/// A raster image placed on label pages: backgrounds and pre-rendered barcodes
pub struct Image {
    pub data: ImageData,
    pub width: u32,
    pub height: u32,
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Load a PNG or JPEG from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Image, PlacardError> {
        let data = std::fs::read(path.as_ref())?;
        let format = image::guess_format(&data)?;
        let decoded = image::load_from_memory_with_format(&data, format)?;

        match (format, decoded.color()) {
            (image::ImageFormat::Jpeg, ColorType::Rgb8) => Ok(Image {
                width: decoded.width(),
                height: decoded.height(),
                data: ImageData::Jpeg(data),
            }),
            _ => Ok(Image::from_dynamic(decoded)),
        }
    }

    pub fn from_dynamic(image: DynamicImage) -> Image {
        Image {
            width: image.width(),
            height: image.height(),
            data: ImageData::Decoded(image),
        }
    }

    fn encode(&self) -> EncodeOutput {
        match &self.data {
            ImageData::Jpeg(bytes) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: bytes.clone(),
                mask: None,
            },
            ImageData::Decoded(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.pixels().map(|(_, _, p)| p.0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes: compress_to_vec_zlib(image.to_rgb8().as_raw(), level),
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}
