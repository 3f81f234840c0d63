//! Image dialog intents.
//!
//! Inserted images are embedded as `data:` URIs, so the document carries
//! its own assets. Alt text and dimensions are written both as attributes
//! and as inline style overrides.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::host::{Command, EditingHost};
use super::state::EditingState;
use super::styles::{remove_style_properties, set_style_property};
use crate::dom::{ArenaDom, ArenaNodeId};
use crate::error::{Error, Result};

/// An image picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an image from disk.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Err(Error::InvalidInput(format!("{} is empty", path.display())));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// MIME type from the magic bytes, then from the file extension.
    pub fn mime_type(&self) -> &'static str {
        sniff_media_type(&self.bytes).unwrap_or_else(|| media_type_from_name(&self.name))
    }

    /// The image as a self-contained `data:` URI.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}

fn sniff_media_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0x89, 0x50, 0x4e, 0x47]) {
        Some("image/png")
    } else if data.starts_with(&[0xff, 0xd8, 0xff]) {
        Some("image/jpeg")
    } else if data.starts_with(b"GIF8") {
        Some("image/gif")
    } else if data.starts_with(b"RIFF") && data.len() > 12 && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else if data.starts_with(b"BM") {
        Some("image/bmp")
    } else {
        let head = String::from_utf8_lossy(&data[..data.len().min(256)]);
        let head = head.trim_start();
        (head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")))
            .then_some("image/svg+xml")
    }
}

fn media_type_from_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Payload of a confirmed insert-image dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub file: ImageFile,
    pub alt_text: String,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// Payload of a confirmed edit-image dialog, also used as its prefill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEdit {
    pub alt_text: String,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
}

/// Presentation of an image given no dimension at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unsized {
    /// Natural size: no dimension overrides.
    Natural,
    /// Full width of the content, natural aspect ratio.
    Responsive,
}

impl<H: EditingHost> EditingState<H> {
    /// The image element the selection is on, if any.
    pub fn selected_image(&self) -> Option<ArenaNodeId> {
        let range = self.host.selection_in_root()?;
        let dom = self.host.dom();
        let (start, end) = range.ordered(dom);
        if dom.is_tag(start.node, "img") {
            return Some(start.node);
        }
        if start.node != end.node || end.offset != start.offset + 1 {
            return None;
        }
        dom.children(start.node)
            .nth(start.offset)
            .filter(|&child| dom.is_tag(child, "img"))
    }

    /// Capture the selection before the image dialog opens.
    ///
    /// Returns the current values of the selected image, if there is one,
    /// to prefill an edit dialog.
    pub fn begin_image(&mut self) -> Option<ImageEdit> {
        let image = self.selected_image();
        self.capture_selection();

        let dom = self.host.dom();
        image.map(|img| ImageEdit {
            alt_text: dom.get_attr(img, "alt").unwrap_or_default().to_string(),
            width: dom.get_attr(img, "width").map(str::to_string),
            height: dom.get_attr(img, "height").map(str::to_string),
        })
    }

    /// Embed an image at the captured selection.
    pub fn insert_image(&mut self, request: ImageRequest) -> bool {
        if self.restore_selection().is_none() {
            return false;
        }
        if request.file.bytes.is_empty() {
            log::warn!("ignoring empty image file {:?}", request.file.name);
            self.refresh();
            return false;
        }

        let inserted = self
            .host
            .exec_command(Command::InsertImage(request.file.data_uri()));
        let image = inserted.then(|| self.selected_image()).flatten();
        if let Some(img) = image {
            apply_image_attributes(
                self.host.dom_mut(),
                img,
                &request.alt_text,
                request.width.as_deref(),
                request.height.as_deref(),
                Unsized::Natural,
            );
            log::debug!(
                "embedded {} ({}, {} bytes)",
                request.file.name,
                request.file.mime_type(),
                request.file.bytes.len()
            );
        }
        self.refresh();
        image.is_some()
    }

    /// Update the alt text and dimensions of the selected image.
    ///
    /// With neither dimension given, the image becomes full-width.
    pub fn edit_image(&mut self, edit: ImageEdit) -> bool {
        let selection = if self.saved.is_some() {
            self.restore_selection()
        } else {
            self.editable_selection()
        };
        let image = selection.and_then(|_| self.selected_image());
        if let Some(img) = image {
            apply_image_attributes(
                self.host.dom_mut(),
                img,
                &edit.alt_text,
                edit.width.as_deref(),
                edit.height.as_deref(),
                Unsized::Responsive,
            );
        }
        self.refresh();
        image.is_some()
    }
}

/// CSS length for a dimension typed in the dialog: bare numbers are pixels.
fn css_length(value: &str) -> String {
    if value.parse::<f64>().is_ok() {
        format!("{value}px")
    } else {
        value.to_string()
    }
}

fn apply_image_attributes(
    dom: &mut ArenaDom,
    img: ArenaNodeId,
    alt: &str,
    width: Option<&str>,
    height: Option<&str>,
    fallback: Unsized,
) {
    dom.set_attr(img, "alt", alt.trim());

    let width = width.map(str::trim).filter(|v| !v.is_empty());
    let height = height.map(str::trim).filter(|v| !v.is_empty());

    if width.is_none() && height.is_none() {
        dom.remove_attr(img, "width");
        dom.remove_attr(img, "height");
        match fallback {
            Unsized::Natural => {
                remove_style_properties(dom, img, &["width", "height"]);
            }
            Unsized::Responsive => {
                set_style_property(dom, img, "width", "100%");
                set_style_property(dom, img, "height", "auto");
            }
        }
        return;
    }

    for (prop, value) in [("width", width), ("height", height)] {
        match value {
            Some(value) => {
                dom.set_attr(img, prop, value);
                set_style_property(dom, img, prop, &css_length(value));
            }
            // Scale with the other dimension
            None => {
                dom.remove_attr(img, prop);
                set_style_property(dom, img, prop, "auto");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::memory::MemoryHost;
    use crate::editor::selection::SelectionRange;
    use std::io::Write;

    const PNG: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

    fn tracker(html: &str) -> EditingState<MemoryHost> {
        let mut host = MemoryHost::from_html(html);
        host.focus();
        EditingState::new(host)
    }

    fn request(width: Option<&str>, height: Option<&str>) -> ImageRequest {
        ImageRequest {
            file: ImageFile::new("logo.png", PNG),
            alt_text: "Logo".into(),
            width: width.map(Into::into),
            height: height.map(Into::into),
        }
    }

    fn select_image(state: &mut EditingState<MemoryHost>) -> ArenaNodeId {
        let img = state.host().dom().find_by_tag("img").unwrap();
        let range = SelectionRange::around(state.host().dom(), img).unwrap();
        state.host_mut().select(range);
        state.refresh();
        img
    }

    #[test]
    fn test_mime_sniffing() {
        assert_eq!(ImageFile::new("x.bin", PNG).mime_type(), "image/png");
        assert_eq!(ImageFile::new("x", [0xffu8, 0xd8, 0xff, 0xe0]).mime_type(), "image/jpeg");
        assert_eq!(ImageFile::new("x", *b"GIF89a").mime_type(), "image/gif");
        assert_eq!(
            ImageFile::new("x", *b"RIFF\0\0\0\0WEBPVP8 ").mime_type(),
            "image/webp"
        );
        assert_eq!(
            ImageFile::new("x", *b"  <svg xmlns=\"http://www.w3.org/2000/svg\"/>").mime_type(),
            "image/svg+xml"
        );
        assert_eq!(ImageFile::new("photo.JPG", *b"????").mime_type(), "image/jpeg");
        assert_eq!(
            ImageFile::new("notes", *b"????").mime_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_data_uri() {
        let file = ImageFile::new("a.png", PNG);
        assert_eq!(file.data_uri(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_read_from_disk() {
        let mut tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        tmp.write_all(PNG).unwrap();

        let file = ImageFile::read(tmp.path()).await.unwrap();
        assert_eq!(file.bytes, PNG);
        assert!(file.name.ends_with(".png"));
        assert!(ImageFile::read(tmp.path().with_extension("absent")).await.is_err());

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            ImageFile::read(empty.path()).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_insert_with_one_dimension() {
        let mut state = tracker("<p>avant après</p>");
        state.host_mut().place_caret_after("avant");
        assert_eq!(state.begin_image(), None);

        assert!(state.insert_image(request(Some("120"), None)));

        let dom = state.host().dom();
        let img = state.selected_image().unwrap();
        assert!(dom.get_attr(img, "src").unwrap().starts_with("data:image/png;base64,"));
        assert_eq!(dom.get_attr(img, "alt"), Some("Logo"));
        assert_eq!(dom.get_attr(img, "width"), Some("120"));
        assert_eq!(dom.get_attr(img, "height"), None);
        assert_eq!(dom.get_attr(img, "style"), Some("width: 120px; height: auto"));
    }

    #[test]
    fn test_insert_without_dimensions_keeps_natural_size() {
        let mut state = tracker("<p>texte</p>");
        state.host_mut().place_caret_after("texte");
        state.begin_image();

        assert!(state.insert_image(request(None, None)));
        let img = state.selected_image().unwrap();
        assert_eq!(state.host().dom().get_attr(img, "style"), None);
        assert_eq!(state.host().dom().get_attr(img, "width"), None);
    }

    #[test]
    fn test_insert_needs_captured_selection_and_bytes() {
        let mut state = tracker("<p>texte</p>");
        state.host_mut().place_caret_after("texte");
        assert!(!state.insert_image(request(None, None)));

        state.begin_image();
        let mut empty = request(None, None);
        empty.file.bytes.clear();
        assert!(!state.insert_image(empty));
        assert_eq!(state.host().html(), "<p>texte</p>");
    }

    #[test]
    fn test_edit_prefills_and_resets_to_responsive() {
        let mut state = tracker(
            r#"<p>a<img src="x.png" alt="vieux" width="50" height="40" style="width: 50px; height: 40px">b</p>"#,
        );
        let img = select_image(&mut state);

        let draft = state.begin_image().unwrap();
        assert_eq!(draft.alt_text, "vieux");
        assert_eq!(draft.width.as_deref(), Some("50"));

        let edit = ImageEdit {
            alt_text: "neuf".into(),
            width: None,
            height: None,
        };
        assert!(state.edit_image(edit));

        let dom = state.host().dom();
        assert_eq!(dom.get_attr(img, "alt"), Some("neuf"));
        assert_eq!(dom.get_attr(img, "width"), None);
        assert_eq!(dom.get_attr(img, "height"), None);
        assert_eq!(dom.get_attr(img, "style"), Some("width: 100%; height: auto"));
    }

    #[test]
    fn test_edit_with_both_dimensions() {
        let mut state = tracker(r#"<p><img src="x.png"></p>"#);
        let img = select_image(&mut state);

        let edit = ImageEdit {
            alt_text: String::new(),
            width: Some("50%".into()),
            height: Some("200".into()),
        };
        assert!(state.edit_image(edit));
        let dom = state.host().dom();
        assert_eq!(dom.get_attr(img, "style"), Some("width: 50%; height: 200px"));
        assert_eq!(dom.get_attr(img, "alt"), Some(""));
    }

    #[test]
    fn test_edit_without_image_does_nothing() {
        let mut state = tracker("<p>texte</p>");
        state.host_mut().select_text("texte");
        assert!(!state.edit_image(ImageEdit::default()));
        assert_eq!(state.host().html(), "<p>texte</p>");
    }
}
