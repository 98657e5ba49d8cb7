//! Finds `<img>` references in a fetched page.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use url::Url;

use crate::downloader::ImageDescriptor;

const IMAGE_EXTENSIONS: [&str; 7] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".svg"];

/// Attributes checked for the image location, in order. Lazy-loading
/// scripts keep the real URL in the `data-*` ones.
const SOURCE_ATTRIBUTES: [&str; 3] = ["src", "data-src", "data-lazy"];

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid img tag pattern"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attribute pattern")
});

/// Returns a descriptor for every `<img>` in `html` whose resolved URL looks
/// like an image file, in document order.
pub fn extract_images(html: &str, page_url: &Url) -> Vec<ImageDescriptor> {
    let images: Vec<ImageDescriptor> = IMG_TAG
        .find_iter(html)
        .filter_map(|tag| descriptor_for_tag(tag.as_str(), page_url))
        .collect();

    debug!("Found {} images on {}", images.len(), page_url);

    images
}

fn descriptor_for_tag(tag: &str, page_url: &Url) -> Option<ImageDescriptor> {
    let attributes = parse_attributes(tag);

    let source = SOURCE_ATTRIBUTES
        .iter()
        .filter_map(|name| attributes.get(*name))
        .find(|value| !value.is_empty())?;

    let url = page_url.join(source).ok()?;

    if !is_valid_image_url(url.as_str()) {
        return None;
    }

    let alt_text = attributes.get("alt").map(String::as_str).unwrap_or("");

    Some(ImageDescriptor::new(
        url.as_str(),
        &extension_of(&url),
        alt_text,
    ))
}

fn parse_attributes(tag: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();

    for capture in ATTRIBUTE.captures_iter(tag) {
        let name = capture[1].to_ascii_lowercase();

        let value = capture
            .get(2)
            .or_else(|| capture.get(3))
            .or_else(|| capture.get(4))
            .map(|m| decode_entities(m.as_str().trim()))
            .unwrap_or_default();

        // First occurrence wins, like a browser.
        attributes.entry(name).or_insert(value);
    }

    attributes
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

pub fn is_valid_image_url(url: &str) -> bool {
    let url = url.to_lowercase();

    IMAGE_EXTENSIONS.iter().any(|ext| url.ends_with(ext))
}

/// Lowercased extension of the URL path without the dot, `jpg` if none.
pub fn extension_of(url: &Url) -> String {
    Path::new(url.path())
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "jpg".to_string())
}
