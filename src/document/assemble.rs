use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId, dictionary};
use svg2pdf::usvg::{self, fontdb};
use svg2pdf::{ConversionOptions, PageOptions};
use tempfile::{NamedTempFile, TempDir};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::deck::Fragment;

/// Resolution usvg assumes when mapping `mm` to pixels. The PDF page must
/// use the same figure to come out at the physical sheet size.
const SVG_DPI: f32 = 96.0;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("no pages to write")]
    EmptyDocument,
    #[error("font family {family:?} is not installed; add its directory to `fonts` or choose another family")]
    Font { family: String },
    #[error("i/o error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("page {index} is not valid SVG: {reason}")]
    Svg { index: usize, reason: String },
    #[error("page {index} could not be converted to PDF: {reason}")]
    Pdf { index: usize, reason: String },
    #[error("failed to merge PDF pages: {0}")]
    Merge(String),
    #[error("failed to move finished document to {path}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings for turning page faces into the final document.
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Family the faces set their text in. It must resolve to an installed
    /// face, otherwise the converter would drop every text element.
    pub font_family: Option<String>,
    pub font_dirs: Vec<PathBuf>,
    /// Where the per-page scratch directory is created. Defaults to the
    /// system temp directory.
    pub scratch_root: Option<PathBuf>,
}

/// Convert each fragment into one fixed-size PDF page and merge them, in
/// order, into `output`.
///
/// Per-page PDFs live in a scratch directory that is removed on every exit
/// path. The merged file is staged next to `output` and only renamed into
/// place once complete, so a failure never leaves a partial document behind.
pub fn assemble_document(
    fragments: &[Fragment],
    output: &Path,
    settings: &AssembleOptions,
) -> Result<(), AssembleError> {
    if fragments.is_empty() {
        return Err(AssembleError::EmptyDocument);
    }

    let mut options = usvg::Options::default();
    options.dpi = SVG_DPI;
    let fontdb = options.fontdb_mut();
    fontdb.load_system_fonts();
    for dir in &settings.font_dirs {
        fontdb.load_fonts_dir(dir);
    }
    if let Some(family) = &settings.font_family {
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family.as_str())],
            ..fontdb::Query::default()
        };
        if fontdb.query(&query).is_none() {
            return Err(AssembleError::Font {
                family: family.clone(),
            });
        }
        options.font_family = family.clone();
    }

    let scratch_root = settings
        .scratch_root
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let scratch = TempDir::new_in(&scratch_root).map_err(|source| AssembleError::Io {
        path: scratch_root,
        source,
    })?;

    let mut parts = Vec::with_capacity(fragments.len());
    for (index, fragment) in fragments.iter().enumerate() {
        let pdf = fragment_to_pdf(index, &fragment.svg, &options)?;
        let path = scratch.path().join(format!("part_{index:04}.pdf"));
        fs::write(&path, pdf).map_err(|source| AssembleError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(index, page = fragment.page, mode = %fragment.mode, "converted page");
        parts.push(path);
    }

    let mut merged = merge_parts(&parts)?;

    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir).map_err(|source| AssembleError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let staged_at = staged.path().to_path_buf();
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        merged
            .save_to(&mut writer)
            .map_err(|err| AssembleError::Merge(err.to_string()))?;
        writer.flush().map_err(|source| AssembleError::Io {
            path: staged_at.clone(),
            source,
        })?;
    }
    staged.as_file().sync_all().map_err(|source| AssembleError::Io {
        path: staged_at,
        source,
    })?;
    staged
        .persist(output)
        .map_err(|err| AssembleError::Persist {
            path: output.to_path_buf(),
            source: err.error,
        })?;

    let scratch_path = scratch.path().to_path_buf();
    scratch.close().map_err(|source| AssembleError::Io {
        path: scratch_path,
        source,
    })?;

    info!(path = %output.display(), pages = fragments.len(), "assembled document");
    Ok(())
}

fn fragment_to_pdf(index: usize, svg: &str, options: &usvg::Options) -> Result<Vec<u8>, AssembleError> {
    let tree = usvg::Tree::from_str(svg, options).map_err(|err| AssembleError::Svg {
        index,
        reason: err.to_string(),
    })?;
    let mut page = PageOptions::default();
    page.dpi = SVG_DPI;
    svg2pdf::to_pdf(&tree, ConversionOptions::default(), page).map_err(|err| AssembleError::Pdf {
        index,
        reason: err.to_string(),
    })
}

/// Concatenate single-document PDFs into one page tree, in slice order.
fn merge_parts(parts: &[PathBuf]) -> Result<Document, AssembleError> {
    let mut merged = Document::with_version("1.7");
    let mut next_id = 1;
    let mut kids: Vec<ObjectId> = Vec::new();

    for path in parts {
        let mut doc = Document::load(path)
            .map_err(|err| AssembleError::Merge(format!("{}: {}", path.display(), err)))?;
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;
        kids.extend(doc.get_pages().into_values());
        for (id, object) in doc.objects {
            // Each part brings its own catalog and page tree; one new pair
            // replaces them below.
            if is_tree_root(&object) {
                continue;
            }
            merged.objects.insert(id, object);
        }
    }

    merged.max_id = next_id - 1;
    let pages_id = merged.new_object_id();
    for kid in &kids {
        if let Ok(Object::Dictionary(page)) = merged.get_object_mut(*kid) {
            page.set("Parent", pages_id);
        }
    }
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.iter().copied().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => kids.len() as i64,
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);
    Ok(merged)
}

fn is_tree_root(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type").and_then(Object::as_name),
            Ok(b"Catalog") | Ok(b"Pages")
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CardStyle;
    use crate::core::page::{Page, RenderMode};

    fn blank_fragment(page: usize) -> Fragment {
        Fragment {
            page,
            mode: RenderMode::Qr,
            svg: Page::default()
                .render(RenderMode::Qr, "", &CardStyle::default())
                .unwrap(),
        }
    }

    fn options_in(scratch_root: &Path) -> AssembleOptions {
        AssembleOptions {
            scratch_root: Some(scratch_root.to_path_buf()),
            ..AssembleOptions::default()
        }
    }

    #[test]
    fn merges_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("deck.pdf");
        let scratch = tempfile::tempdir().unwrap();
        let fragments = vec![blank_fragment(0), blank_fragment(1), blank_fragment(2)];
        assemble_document(&fragments, &output, &options_in(scratch.path())).unwrap();

        let doc = Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn invalid_svg_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("deck.pdf");
        let scratch = tempfile::tempdir().unwrap();
        let mut broken = blank_fragment(1);
        broken.svg = "<svg".to_string();
        let err = assemble_document(&[blank_fragment(0), broken], &output, &options_in(scratch.path()))
            .unwrap_err();
        assert!(matches!(err, AssembleError::Svg { index: 1, .. }), "{err}");
        assert!(!output.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        // The first page was already converted; its scratch copy must be gone too.
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_font_family_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("deck.pdf");
        let scratch = tempfile::tempdir().unwrap();
        let options = AssembleOptions {
            font_family: Some("NoSuchFamily".to_string()),
            ..options_in(scratch.path())
        };
        let err = assemble_document(&[blank_fragment(0)], &output, &options).unwrap_err();
        assert!(
            matches!(&err, AssembleError::Font { family } if family == "NoSuchFamily"),
            "{err}"
        );
        assert!(!output.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn empty_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = assemble_document(&[], &dir.path().join("x.pdf"), &AssembleOptions::default())
            .unwrap_err();
        assert!(matches!(err, AssembleError::EmptyDocument));
    }

    #[test]
    fn media_box_matches_sheet_size() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("deck.pdf");
        assemble_document(&[blank_fragment(0)], &output, &AssembleOptions::default()).unwrap();

        let doc = Document::load(&output).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let width = media_box[2].as_float().unwrap_or_else(|_| media_box[2].as_i64().unwrap() as f32);
        // 210mm in PostScript points.
        assert!((width - 595.28).abs() < 1.0, "width {width}");
    }
}
