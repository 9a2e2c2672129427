//! Embedded raster image discovery and decoding.
//!
//! Walks a page's resource dictionary for XObject entries tagged as images
//! and reconstructs each one into an in-memory bitmap. Faults are scoped as
//! tightly as possible: a bad object skips that object, and a bad resource
//! dictionary skips only that page's scan. Nothing here can abort the
//! document.

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId};
use thiserror::Error;

use super::resolve;

/// Color interpretation for an embedded image's raw samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Single luminance channel (`/DeviceGray`).
    Grayscale,
    /// Three channels. Also the fallback for absent or unrecognized color
    /// spaces; recognition tolerates the occasional wrong interpretation.
    Rgb,
}

impl ColorMode {
    fn channels(self) -> usize {
        match self {
            ColorMode::Grayscale => 1,
            ColorMode::Rgb => 3,
        }
    }
}

/// A bitmap decoded from one page's XObject table, in traversal order.
#[derive(Debug)]
pub struct PageImage {
    /// 1-indexed number of the page the image was found on.
    pub page_number: u32,
    /// Resource name of the XObject entry (e.g. `Im0`).
    pub name: String,
    /// The reconstructed pixel buffer.
    pub image: DynamicImage,
}

/// Faults scoped to a single XObject entry.
#[derive(Debug, Error)]
pub enum ImageFault {
    #[error("XObject is not a stream")]
    NotAStream(#[source] lopdf::Error),

    #[error("missing or invalid {key} entry")]
    BadEntry {
        key: &'static str,
        #[source]
        source: lopdf::Error,
    },

    #[error("image dimensions {width}x{height} out of range")]
    BadDimensions { width: i64, height: i64 },

    #[error("could not decode image stream data")]
    UndecodableData(#[source] lopdf::Error),

    #[error(
        "pixel data length {actual} does not fit {width}x{height} {mode:?} ({expected} bytes)"
    )]
    SizeMismatch {
        width: u32,
        height: u32,
        mode: ColorMode,
        expected: usize,
        actual: usize,
    },
}

/// Collect the decodable raster images of one page.
///
/// The outer error covers faults in the page's resource dictionary itself
/// and aborts only this page's scan; each inner entry is the outcome for a
/// single image-subtype XObject. Pages without resources or without an
/// XObject table yield an empty list.
pub fn collect_page_images(
    document: &Document,
    page_number: u32,
    page_id: ObjectId,
) -> Result<Vec<Result<PageImage, ImageFault>>, lopdf::Error> {
    let page = document.get_object(page_id)?.as_dict()?;

    let Ok(resources) = page.get(b"Resources") else {
        return Ok(Vec::new());
    };
    let resources = resolve(document, resources)?.as_dict()?;

    let Ok(xobjects) = resources.get(b"XObject") else {
        return Ok(Vec::new());
    };
    let xobjects = resolve(document, xobjects)?.as_dict()?;

    let mut images = Vec::new();
    for (name, entry) in xobjects.iter() {
        let name = String::from_utf8_lossy(name).into_owned();
        match decode_xobject(document, entry) {
            Ok(Some(image)) => images.push(Ok(PageImage {
                page_number,
                name,
                image,
            })),
            // Not an image subtype; nothing to do
            Ok(None) => {}
            Err(fault) => images.push(Err(fault)),
        }
    }

    Ok(images)
}

/// Decode one XObject entry into a bitmap.
///
/// `Ok(None)` means the object's subtype is not `Image` and it was skipped;
/// an error is a fault for an object that claimed to be an image.
fn decode_xobject(
    document: &Document,
    entry: &Object,
) -> Result<Option<DynamicImage>, ImageFault> {
    let stream = resolve(document, entry)
        .and_then(Object::as_stream)
        .map_err(ImageFault::NotAStream)?;

    let subtype = stream
        .dict
        .get(b"Subtype")
        .map_err(|source| ImageFault::BadEntry {
            key: "Subtype",
            source,
        })?;
    if !matches!(subtype, Object::Name(name) if name == b"Image") {
        return Ok(None);
    }

    let width = dict_i64(document, &stream.dict, "Width")?;
    let height = dict_i64(document, &stream.dict, "Height")?;
    if width <= 0 || height <= 0 || width > i64::from(u32::MAX) || height > i64::from(u32::MAX) {
        return Err(ImageFault::BadDimensions { width, height });
    }

    let mode = color_mode(document, &stream.dict);

    // Raw samples, with the stream's filter chain applied when present.
    // A filter lopdf cannot decode is a fault for this object only.
    let data = if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(ImageFault::UndecodableData)?
    } else {
        stream.content.clone()
    };

    reconstruct(mode, width as u32, height as u32, data).map(Some)
}

/// Determine the color interpretation of an image stream.
///
/// `/DeviceGray` selects luminance. Every other case falls back to RGB:
/// another name, an array form (ICCBased, Indexed, ...), an unresolvable
/// reference, or a missing entry. Unrecognized color spaces are not a
/// fault; they may misrender, but the bitmap still reaches the recognizer.
fn color_mode(document: &Document, dict: &Dictionary) -> ColorMode {
    let Ok(entry) = dict.get(b"ColorSpace") else {
        return ColorMode::Rgb;
    };
    match resolve(document, entry) {
        Ok(Object::Name(name)) if name == b"DeviceGray" => ColorMode::Grayscale,
        _ => ColorMode::Rgb,
    }
}

fn dict_i64(
    document: &Document,
    dict: &Dictionary,
    key: &'static str,
) -> Result<i64, ImageFault> {
    dict.get(key.as_bytes())
        .and_then(|entry| resolve(document, entry))
        .and_then(Object::as_i64)
        .map_err(|source| ImageFault::BadEntry { key, source })
}

/// Rebuild a bitmap from raw samples plus the declared geometry and mode.
fn reconstruct(
    mode: ColorMode,
    width: u32,
    height: u32,
    data: Vec<u8>,
) -> Result<DynamicImage, ImageFault> {
    let expected = width as usize * height as usize * mode.channels();
    let actual = data.len();
    if actual != expected {
        return Err(ImageFault::SizeMismatch {
            width,
            height,
            mode,
            expected,
            actual,
        });
    }

    let image = match mode {
        ColorMode::Grayscale => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
        ColorMode::Rgb => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
    };
    image.ok_or(ImageFault::SizeMismatch {
        width,
        height,
        mode,
        expected,
        actual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::{
        TestPage, build_document, gray_image, image_xobject, untagged_image,
    };

    fn first_page_id(doc: &Document) -> ObjectId {
        *doc.get_pages().get(&1).unwrap()
    }

    #[test]
    fn decodes_grayscale_images() {
        let doc = build_document(vec![TestPage::Images(vec![gray_image(
            2,
            2,
            vec![0, 64, 128, 255],
        )])]);
        let images = collect_page_images(&doc, 1, first_page_id(&doc)).unwrap();
        assert_eq!(images.len(), 1);

        let image = images.into_iter().next().unwrap().unwrap();
        assert_eq!(image.page_number, 1);
        assert_eq!(image.name, "Im0");
        match &image.image {
            DynamicImage::ImageLuma8(buffer) => assert_eq!(buffer.dimensions(), (2, 2)),
            other => panic!("expected a luma bitmap, got {other:?}"),
        }
    }

    #[test]
    fn absent_color_space_defaults_to_rgb() {
        let doc = build_document(vec![TestPage::Images(vec![untagged_image(
            1,
            2,
            vec![1, 2, 3, 4, 5, 6],
        )])]);
        let images = collect_page_images(&doc, 1, first_page_id(&doc)).unwrap();

        let image = images.into_iter().next().unwrap().unwrap();
        assert!(matches!(image.image, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn unrecognized_color_space_falls_back_to_rgb() {
        let doc = build_document(vec![TestPage::Images(vec![image_xobject(
            "Image",
            1,
            1,
            Some("DeviceCMYK".into()),
            vec![10, 20, 30],
        )])]);
        let images = collect_page_images(&doc, 1, first_page_id(&doc)).unwrap();

        let image = images.into_iter().next().unwrap().unwrap();
        assert!(matches!(image.image, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn byte_count_mismatch_faults_only_that_object() {
        let doc = build_document(vec![TestPage::Images(vec![
            gray_image(2, 2, vec![1, 2, 3]),
            gray_image(1, 1, vec![9]),
        ])]);
        let images = collect_page_images(&doc, 1, first_page_id(&doc)).unwrap();
        assert_eq!(images.len(), 2);

        assert!(matches!(images[0], Err(ImageFault::SizeMismatch { .. })));
        assert!(images[1].is_ok());
    }

    #[test]
    fn non_image_subtypes_are_skipped_silently() {
        let doc = build_document(vec![TestPage::Images(vec![
            image_xobject("Form", 4, 4, None, vec![0; 48]),
            gray_image(1, 1, vec![42]),
        ])]);
        let images = collect_page_images(&doc, 1, first_page_id(&doc)).unwrap();

        // The form contributes neither a bitmap nor a fault.
        assert_eq!(images.len(), 1);
        assert!(images[0].is_ok());
    }

    #[test]
    fn page_without_xobjects_yields_nothing() {
        let doc = build_document(vec![TestPage::Text("just text")]);
        let images = collect_page_images(&doc, 1, first_page_id(&doc)).unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn malformed_resources_fault_the_page_scan() {
        let mut doc = build_document(vec![TestPage::Text("x")]);
        let page_id = first_page_id(&doc);
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Resources", Object::Integer(5));
        }
        assert!(collect_page_images(&doc, 1, page_id).is_err());
    }
}
