use bytes::Bytes;
use lopdf::{
    Dictionary, Document, Object, ObjectId, Stream,
    content::{Content, Operation},
    dictionary,
};
use tracing::debug;

use super::{branding::Branding, layout::*};
use crate::{
    domain::report::{
        entity::{ComposedDocument, CoverDetails, PageKind},
        locale::ReportLocale,
    },
    infrastructure::imaging::NormalizedImage,
};

const PRODUCER: &str = concat!("damage-report ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
#[error("PDF serialization failed: {0}")]
pub struct ComposeError(String);

/// Lays out damage reports as A4 PDF documents.
///
/// Cheap to clone; the branding logo is shared.
#[derive(Debug, Clone)]
pub struct ReportComposer {
    branding: Branding,
    locale: ReportLocale,
}

impl ReportComposer {
    pub fn new(branding: Branding, locale: ReportLocale) -> Self {
        Self { branding, locale }
    }

    pub fn locale(&self) -> ReportLocale {
        self.locale
    }

    /// Builds the whole document in memory: cover, damage pages when `ledger_lines`
    /// is non-empty, then one page per photo in the given order.
    pub fn compose(
        &self,
        cover: &CoverDetails,
        ledger_lines: &[String],
        photos: &[NormalizedImage],
    ) -> Result<ComposedDocument, ComposeError> {
        let mut builder = DocumentBuilder::new(&self.branding, self.locale);

        builder.cover_page(cover)?;
        if !ledger_lines.is_empty() {
            builder.damage_pages(ledger_lines)?;
        }
        for (position, photo) in photos.iter().enumerate() {
            builder.photo_page(position, photo)?;
        }

        let (pages, bytes) = builder.finish(cover)?;
        debug!(
            pages = pages.len(),
            bytes = bytes.len(),
            "Composed report {}",
            cover.artifact
        );

        Ok(ComposedDocument {
            artifact: cover.artifact.clone(),
            pages,
            bytes: Bytes::from(bytes),
        })
    }
}

struct Fonts {
    regular: ObjectId,
    bold: ObjectId,
    italic: ObjectId,
}

struct DocumentBuilder {
    doc: Document,
    pages_id: ObjectId,
    fonts: Fonts,
    logo: Option<(ObjectId, f32)>,
    locale: ReportLocale,
    page_ids: Vec<ObjectId>,
    kinds: Vec<PageKind>,
}

impl DocumentBuilder {
    fn new(branding: &Branding, locale: ReportLocale) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font = |base: &str| {
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base,
                "Encoding" => "WinAnsiEncoding",
            })
        };
        let fonts = Fonts {
            regular: font("Helvetica"),
            bold: font("Helvetica-Bold"),
            italic: font("Helvetica-Oblique"),
        };

        let logo = branding
            .logo
            .as_ref()
            .map(|logo| (add_image_xobject(&mut doc, logo), logo.aspect_ratio()));

        Self {
            doc,
            pages_id,
            fonts,
            logo,
            locale,
            page_ids: Vec::new(),
            kinds: Vec::new(),
        }
    }

    fn cover_page(&mut self, cover: &CoverDetails) -> Result<(), ComposeError> {
        let body_band = (MARGIN_MM, PAGE_WIDTH_MM - MARGIN_MM);
        let mut ops = centered_text(
            "F1",
            BODY_FONT_SIZE,
            body_band,
            CONTENT_TOP_MM + 10.0,
            &format!("{}: {}", self.locale.identifier_label(), cover.artifact),
        );
        ops.extend(centered_text(
            "F1",
            BODY_FONT_SIZE,
            body_band,
            CONTENT_TOP_MM + 20.0,
            &format!(
                "{}: {}",
                self.locale.date_label(),
                cover.generated_on.format("%d/%m/%Y")
            ),
        ));
        self.push_page(PageKind::Cover, ops, None)
    }

    fn damage_pages(&mut self, ledger_lines: &[String]) -> Result<(), ComposeError> {
        let max_width = mm_to_pt(PAGE_WIDTH_MM - 2.0 * MARGIN_MM);
        let first_line_mm = CONTENT_TOP_MM + 20.0;

        let mut ops = text_at(
            "F2",
            HEADING_FONT_SIZE,
            MARGIN_MM,
            CONTENT_TOP_MM + 10.0,
            self.locale.damage_heading(),
        );
        let mut cursor_mm = first_line_mm;

        for line in ledger_lines {
            for wrapped in wrap_text(line, BODY_FONT_SIZE, max_width) {
                if cursor_mm > CONTENT_BOTTOM_MM {
                    self.push_page(PageKind::Damage, std::mem::take(&mut ops), None)?;
                    cursor_mm = CONTENT_TOP_MM + 10.0;
                }
                ops.extend(text_at("F1", BODY_FONT_SIZE, MARGIN_MM, cursor_mm, &wrapped));
                cursor_mm += LINE_HEIGHT_MM;
            }
        }

        self.push_page(PageKind::Damage, ops, None)
    }

    fn photo_page(&mut self, position: usize, photo: &NormalizedImage) -> Result<(), ComposeError> {
        let image_id = add_image_xobject(&mut self.doc, photo);
        let (x_mm, y_mm, w_mm, h_mm) = photo_placement(photo.aspect_ratio());
        let ops = draw_image("Photo", x_mm, y_mm, w_mm, h_mm);
        self.push_page(PageKind::Image { position }, ops, Some(image_id))
    }

    fn push_page(
        &mut self,
        kind: PageKind,
        body: Vec<Operation>,
        photo: Option<ObjectId>,
    ) -> Result<(), ComposeError> {
        let number = self.page_ids.len() + 1;

        let mut operations = self.header_ops();
        operations.extend(body);
        operations.extend(centered_text(
            "F3",
            FOOTER_FONT_SIZE,
            (0.0, PAGE_WIDTH_MM),
            FOOTER_BASELINE_MM,
            &self.locale.page_label(number),
        ));

        let content = Content { operations }
            .encode()
            .map_err(|e| ComposeError(format!("page {} content: {}", number, e)))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

        let mut xobjects = Dictionary::new();
        if let Some((logo_id, _)) = self.logo {
            xobjects.set("Logo", logo_id);
        }
        if let Some(photo_id) = photo {
            xobjects.set("Photo", photo_id);
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                page_width_pt().into(),
                page_height_pt().into(),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => self.fonts.regular,
                    "F2" => self.fonts.bold,
                    "F3" => self.fonts.italic,
                },
                "XObject" => xobjects,
            },
        });

        self.page_ids.push(page_id);
        self.kinds.push(kind);
        Ok(())
    }

    fn header_ops(&self) -> Vec<Operation> {
        let mut ops = Vec::new();
        if let Some((_, aspect)) = self.logo {
            let (max_w, max_h) = LOGO_MAX_SIZE_MM;
            let (w, h) = fit_box(max_w, max_h, aspect);
            ops.extend(draw_image("Logo", LOGO_ORIGIN_MM.0, LOGO_ORIGIN_MM.1, w, h));
        }
        ops.extend(centered_text(
            "F2",
            TITLE_FONT_SIZE,
            TITLE_BAND_MM,
            TITLE_BASELINE_MM,
            self.locale.report_title(),
        ));
        ops
    }

    fn finish(mut self, cover: &CoverDetails) -> Result<(Vec<PageKind>, Vec<u8>), ComposeError> {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_win_ansi(&format!(
                "{} - {}",
                self.locale.report_title(),
                cover.artifact
            ))),
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(format!(
                "D:{}000000",
                cover.generated_on.format("%Y%m%d")
            )),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();
        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| ComposeError(e.to_string()))?;
        Ok((self.kinds, bytes))
    }
}

fn add_image_xobject(doc: &mut Document, image: &NormalizedImage) -> ObjectId {
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(image.width_px),
        "Height" => i64::from(image.height_px),
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "DCTDecode",
    };
    doc.add_object(Stream::new(dict, image.jpeg.clone()).with_compression(false))
}

/// Photo rectangle in mm: fixed width from the fixed origin, unless the photo is so
/// tall that it would run into the footer, in which case it is fitted to the content area.
fn photo_placement(aspect_ratio: f32) -> (f32, f32, f32, f32) {
    let (origin_x, origin_y) = IMAGE_ORIGIN_MM;
    let (w, h) = fit_box(IMAGE_WIDTH_MM, CONTENT_BOTTOM_MM - origin_y, aspect_ratio);
    (origin_x + (IMAGE_WIDTH_MM - w) / 2.0, origin_y, w, h)
}

/// Largest (width, height) with the given height/width ratio inside the box, width first.
fn fit_box(max_w: f32, max_h: f32, aspect_ratio: f32) -> (f32, f32) {
    let h = max_w * aspect_ratio;
    if h <= max_h {
        (max_w, h)
    } else {
        (max_h / aspect_ratio, max_h)
    }
}

fn draw_image(name: &str, x_mm: f32, y_mm: f32, w_mm: f32, h_mm: f32) -> Vec<Operation> {
    let (w, h) = (mm_to_pt(w_mm), mm_to_pt(h_mm));
    let bottom = y_from_top(y_mm + h_mm);
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![w.into(), 0.into(), 0.into(), h.into(), mm_to_pt(x_mm).into(), bottom.into()],
        ),
        Operation::new("Do", vec![name.into()]),
        Operation::new("Q", vec![]),
    ]
}

fn text_at(font: &str, size: f32, x_mm: f32, baseline_mm: f32, text: &str) -> Vec<Operation> {
    text_at_pt(font, size, mm_to_pt(x_mm), y_from_top(baseline_mm), text)
}

fn centered_text(
    font: &str,
    size: f32,
    band_mm: (f32, f32),
    baseline_mm: f32,
    text: &str,
) -> Vec<Operation> {
    let band_start = mm_to_pt(band_mm.0);
    let band_width = mm_to_pt(band_mm.1 - band_mm.0);
    let x = band_start + ((band_width - text_width_pt(text, size)) / 2.0).max(0.0);
    text_at_pt(font, size, x, y_from_top(baseline_mm), text)
}

fn text_at_pt(font: &str, size: f32, x: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
        Operation::new("ET", vec![]),
    ]
}
