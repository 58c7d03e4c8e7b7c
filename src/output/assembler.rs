//! PDF assembly from persisted page images
//!
//! Every image in a numeric page range becomes one PDF page. Pixels are
//! embedded unchanged (Flate-compressed), and the page size follows from the
//! pixel size and the configured resolution.

use crate::storage::{AssetStore, DirectoryStore};
use image::{ColorType, DynamicImage, GenericImageView};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;
use thiserror::Error;

/// PDF user space units per inch
const POINTS_PER_INCH: f32 = 72.0;

/// Resource name of the page image inside each page
const IMAGE_NAME: &str = "Im0";

/// Errors that can occur while assembling a document
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("Invalid page range {first}..={last}")]
    InvalidRange { first: u32, last: u32 },

    #[error("Invalid quality {0}: must be a positive number")]
    InvalidQuality(f32),

    #[error("Missing image for page {page} at {}: {reason}", path.display())]
    MissingAsset {
        page: u32,
        path: PathBuf,
        reason: String,
    },

    #[error("Assembly interrupted")]
    Interrupted,

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to serialize PDF: {0}")]
    Serialize(#[source] std::io::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for assembly operations
pub type AssembleResult<T> = Result<T, AssembleError>;

/// The deliverable of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// The persisted page images themselves
    ImageSet {
        directory: PathBuf,
        first_page: u32,
        last_page: u32,
    },

    /// One assembled multi-page document
    Document { path: PathBuf, page_count: u32 },
}

/// Composes page images into a PDF document
#[derive(Debug, Clone)]
pub struct Assembler {
    quality: f32,
    interrupted: Arc<AtomicBool>,
}

impl Assembler {
    /// Creates an assembler
    ///
    /// # Arguments
    ///
    /// * `quality` - Resolution in DPI used to turn pixels into page size
    pub fn new(quality: f32) -> AssembleResult<Self> {
        if !quality.is_finite() || quality <= 0.0 {
            return Err(AssembleError::InvalidQuality(quality));
        }
        Ok(Self {
            quality,
            interrupted: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Stops assembly between pages once `interrupted` is set
    ///
    /// An interrupted assembly fails with [`AssembleError::Interrupted`] and
    /// writes nothing.
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = interrupted;
        self
    }

    /// Assembles pages `first..=last` from `store` into a PDF at `output`
    ///
    /// The range is the only source of page order. Any page that cannot be
    /// read or decoded fails the whole assembly and nothing is written.
    pub fn assemble(
        &self,
        store: &dyn AssetStore,
        first: u32,
        last: u32,
        output: &Path,
    ) -> AssembleResult<Artifact> {
        tracing::info!(
            "Converting pages {}..={} to PDF at {}",
            first,
            last,
            output.display()
        );

        let bytes = self.compose(store, first, last)?;
        self.check_interrupt()?;
        write_atomically(output, &bytes)?;

        tracing::info!("Saved PDF to {}", output.display());

        Ok(Artifact::Document {
            path: output.to_path_buf(),
            page_count: last - first + 1,
        })
    }

    /// Builds the PDF for pages `first..=last` in memory
    ///
    /// Identical images and quality always produce identical bytes.
    pub fn compose(&self, store: &dyn AssetStore, first: u32, last: u32) -> AssembleResult<Vec<u8>> {
        if first == 0 || first > last {
            return Err(AssembleError::InvalidRange { first, last });
        }

        // Decode everything before building so a bad page fails fast
        let mut images = Vec::new();
        for page in first..=last {
            self.check_interrupt()?;
            images.push(load_page(store, page)?);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::with_capacity(images.len());

        // Each decoded image is released once its page is built
        for image in images {
            self.check_interrupt()?;

            let (width, height) = image.dimensions();
            let (color_space, bits_per_component, samples) = pixel_samples(image);

            let mut image_stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(width),
                    "Height" => i64::from(height),
                    "ColorSpace" => color_space,
                    "BitsPerComponent" => bits_per_component,
                },
                samples,
            );
            image_stream.compress()?;
            let image_id = doc.add_object(image_stream);

            let page_width = self.to_points(width);
            let page_height = self.to_points(height);

            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            page_width.into(),
                            0.into(),
                            0.into(),
                            page_height.into(),
                            0.into(),
                            0.into(),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

            let media_box: Vec<Object> =
                vec![0.into(), 0.into(), page_width.into(), page_height.into()];
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { IMAGE_NAME => image_id },
                },
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(AssembleError::Serialize)?;
        Ok(output)
    }

    fn check_interrupt(&self) -> AssembleResult<()> {
        if self.interrupted.load(Ordering::SeqCst) {
            tracing::debug!("Assembly interrupted");
            return Err(AssembleError::Interrupted);
        }
        Ok(())
    }

    fn to_points(&self, pixels: u32) -> f32 {
        pixels as f32 * POINTS_PER_INCH / self.quality
    }
}

/// Assembles `<source>/<n>.png` for n in `first..=last` into a PDF
///
/// # Example
///
/// ```no_run
/// use manual_downloader::output::assemble_directory;
/// use std::path::Path;
///
/// assemble_directory(Path::new("pages"), 1, 48, Path::new("manual.pdf"), 100.0).unwrap();
/// ```
pub fn assemble_directory(
    source: &Path,
    first: u32,
    last: u32,
    output: &Path,
    quality: f32,
) -> AssembleResult<Artifact> {
    let store = DirectoryStore::open_existing(source);
    Assembler::new(quality)?.assemble(&store, first, last, output)
}

fn load_page(store: &dyn AssetStore, page: u32) -> AssembleResult<DynamicImage> {
    let missing = |reason: String| AssembleError::MissingAsset {
        page,
        path: store.path_for(page),
        reason,
    };

    let bytes = store.open(page).map_err(|e| missing(e.to_string()))?;
    let image =
        image::load_from_memory(&bytes).map_err(|e| missing(format!("cannot decode image: {}", e)))?;

    tracing::trace!("Loaded page {} ({}x{})", page, image.width(), image.height());
    Ok(image)
}

/// Color space, bits per component and raw samples for an image XObject
///
/// 16-bit images keep their depth; samples are big-endian as PDF expects.
/// Alpha is dropped.
fn pixel_samples(image: DynamicImage) -> (&'static str, i64, Vec<u8>) {
    match image.color() {
        ColorType::L8 | ColorType::La8 => ("DeviceGray", 8, image.into_luma8().into_raw()),
        ColorType::L16 | ColorType::La16 => {
            ("DeviceGray", 16, big_endian(image.into_luma16().into_raw()))
        }
        ColorType::Rgb16 | ColorType::Rgba16 => {
            ("DeviceRGB", 16, big_endian(image.into_rgb16().into_raw()))
        }
        _ => ("DeviceRGB", 8, image.into_rgb8().into_raw()),
    }
}

fn big_endian(samples: Vec<u16>) -> Vec<u8> {
    samples.into_iter().flat_map(u16::to_be_bytes).collect()
}

/// Writes `bytes` to a temporary file beside `path`, then renames it into place
fn write_atomically(path: &Path, bytes: &[u8]) -> AssembleResult<()> {
    let write_err = |source: std::io::Error| AssembleError::Write {
        path: path.to_path_buf(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
