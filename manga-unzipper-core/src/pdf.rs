use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use printpdf::{ImageTransform, Mm, PdfDocument, PdfLayerReference};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{image::Image, Error, Result};

static MM_PER_PT: f32 = 25.4 / 72.0;

/// At 72 dpi one image pixel is one pdf point, which keeps the scale factors simple
static IMAGE_DPI: f32 = 72.0;

static LAYER_NAME: &str = "Page";

/// Size of a pdf page, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
}

impl PageGeometry {
    pub const A4: Self = Self {
        width: 595.28,
        height: 841.89,
    };

    fn width_mm(self) -> Mm {
        Mm(self.width * MM_PER_PT)
    }

    fn height_mm(self) -> Mm {
        Mm(self.height * MM_PER_PT)
    }

    /// Scales a `width` x `height` image to fit in the page without distortion
    /// and centers it on both axes
    #[must_use]
    pub fn fit_and_center(self, width: f32, height: f32) -> Placement {
        let scale = (self.width / width).min(self.height / height);
        let (fitted_width, fitted_height) = (width * scale, height * scale);

        Placement {
            x: (self.width - fitted_width) / 2.0,
            y: (self.height - fitted_height) / 2.0,
            width: fitted_width,
            height: fitted_height,
            scale,
        }
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Where an image lands on its page, in points from the bottom left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Placement {
    fn transform(self) -> ImageTransform {
        ImageTransform {
            translate_x: Some(Mm(self.x * MM_PER_PT)),
            translate_y: Some(Mm(self.y * MM_PER_PT)),
            scale_x: Some(self.scale),
            scale_y: Some(self.scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn paint(layer: PdfLayerReference, geometry: PageGeometry, path: &Utf8Path) -> Result<()> {
    let image = Image::open(path)?;
    let placement = geometry.fit_and_center(image.width() as f32, image.height() as f32);
    debug!("painting {path} at {placement:?}");

    printpdf::Image::from(image.into_xobject()).add_to_layer(layer, placement.transform());

    Ok(())
}

/// Paints every page image, in order, on its own page and writes `<outdir>/<name>.pdf`.
/// The document is saved to a temporary file next to the output and only renamed
/// to `<name>.pdf` once fully written.
///
/// ## Errors
///
/// Fails if `outdir` isn't a directory, if `pages` is empty, if an image can't be decoded
/// or if the document can't be written
pub fn compose(
    pages: &[Utf8PathBuf],
    outdir: &Utf8Path,
    name: &str,
    geometry: PageGeometry,
) -> Result<Utf8PathBuf> {
    if !outdir.is_dir() {
        return Err(Error::OutputNotADirectory(outdir.to_path_buf()));
    }
    let Some((first, rest)) = pages.split_first() else {
        return Err(Error::Pdf(format!("no page to write in {name}.pdf")));
    };

    let (doc, page, layer) = PdfDocument::new(
        name,
        geometry.width_mm(),
        geometry.height_mm(),
        LAYER_NAME,
    );
    paint(doc.get_page(page).get_layer(layer), geometry, first)?;
    for path in rest {
        let (page, layer) = doc.add_page(geometry.width_mm(), geometry.height_mm(), LAYER_NAME);
        paint(doc.get_page(page).get_layer(layer), geometry, path)?;
    }

    let output_path = outdir.join(format!("{name}.pdf"));
    let mut tmp_file = NamedTempFile::new_in(outdir)?;
    let mut writer = BufWriter::new(tmp_file.as_file_mut());
    doc.save(&mut writer)
        .map_err(|err| Error::Pdf(err.to_string()))?;
    writer.flush()?;
    drop(writer);
    tmp_file
        .persist(&output_path)
        .map_err(|err| Error::IO(err.error))?;
    info!("wrote {} pages to {output_path}", pages.len());

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(left: f32, right: f32) {
        assert!((left - right).abs() < 0.01, "{left} != {right}");
    }

    #[test]
    fn a4_is_the_default() {
        assert_eq!(PageGeometry::default(), PageGeometry::A4);
        assert_close(PageGeometry::A4.width_mm().0, 210.0);
        assert_close(PageGeometry::A4.height_mm().0, 297.0);
    }

    #[test]
    fn tall_image_fills_the_height() {
        let a4 = PageGeometry::A4;
        let placement = a4.fit_and_center(1000.0, 2000.0);

        assert_close(placement.height, a4.height);
        assert_close(placement.width, a4.height / 2.0);
        assert_close(placement.y, 0.0);
        assert_close(placement.x, (a4.width - a4.height / 2.0) / 2.0);
    }

    #[test]
    fn wide_image_fills_the_width() {
        let a4 = PageGeometry::A4;
        let placement = a4.fit_and_center(2000.0, 1000.0);

        assert_close(placement.width, a4.width);
        assert_close(placement.height, a4.width / 2.0);
        assert_close(placement.x, 0.0);
        assert_close(placement.y, (a4.height - a4.width / 2.0) / 2.0);
    }

    #[test]
    fn small_image_is_scaled_up() {
        let a4 = PageGeometry::A4;
        let placement = a4.fit_and_center(a4.width / 4.0, a4.height / 4.0);

        assert_close(placement.scale, 4.0);
        assert_close(placement.x, 0.0);
        assert_close(placement.y, 0.0);
    }

    #[test]
    fn output_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap();
        let file = dir.join("not-a-dir");
        std::fs::write(&file, b"").unwrap();

        assert!(matches!(
            compose(&[file.clone()], &file, "chapter", PageGeometry::A4),
            Err(Error::OutputNotADirectory(_))
        ));
        assert!(matches!(
            compose(&[file.clone()], &dir.join("missing"), "chapter", PageGeometry::A4),
            Err(Error::OutputNotADirectory(_))
        ));
    }

    #[test]
    fn only_the_pdf_is_left_in_outdir() {
        let dir = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap();
        let pages_dir = dir.join("pages");
        let outdir = dir.join("out");
        std::fs::create_dir(&pages_dir).unwrap();
        std::fs::create_dir(&outdir).unwrap();
        let page = pages_dir.join("001.png");
        image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 3))
            .save(&page)
            .unwrap();
        std::fs::write(outdir.join("chapter.pdf"), b"stale").unwrap();

        let output = compose(&[page], &outdir, "chapter", PageGeometry::A4).unwrap();

        let names = std::fs::read_dir(&outdir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect::<Vec<_>>();
        assert_eq!(names, ["chapter.pdf"]);
        assert!(std::fs::read(output).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn failed_composition_keeps_the_previous_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap();
        let page = dir.join("001.jpg");
        std::fs::write(&page, b"not a jpeg").unwrap();
        std::fs::write(dir.join("chapter.pdf"), b"previous").unwrap();

        assert!(compose(&[page], dir, "chapter", PageGeometry::A4).is_err());
        assert_eq!(std::fs::read(dir.join("chapter.pdf")).unwrap(), b"previous");
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 2);
    }

    #[test]
    fn undecodable_page_leaves_no_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap();
        let page = dir.join("001.jpg");
        std::fs::write(&page, b"not a jpeg").unwrap();

        assert!(compose(&[page], dir, "chapter", PageGeometry::A4).is_err());
        assert!(!dir.join("chapter.pdf").exists());
    }
}
