//! PDF document access.
//!
//! Submodules cover the two extraction passes over a parsed document:
//! per-page machine text and embedded raster images.

pub mod images;
pub mod text;

use lopdf::{Document, Object};

/// Follow an indirect reference to its target object; direct objects pass
/// through unchanged.
pub(crate) fn resolve<'a>(
    document: &'a Document,
    object: &'a Object,
) -> Result<&'a Object, lopdf::Error> {
    match object {
        Object::Reference(id) => document.get_object(*id),
        _ => Ok(object),
    }
}
