//! PDF encoding of rendered pages using lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::layout::{PageGeometry, RenderedPage};
use crate::error::ExportError;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// PDF coordinates and sizes are written as whole points.
fn pt(value: f32) -> Object {
    Object::Integer(value.round() as i64)
}

/// WinAnsi is a superset of Latin-1 for the printable range; anything else
/// becomes '?'.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn page_operations(page: &RenderedPage, footer: Option<(String, &PageGeometry)>) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(page.runs.len() * 5 + 5);
    for run in &page.runs {
        let font = if run.bold { BOLD_FONT } else { REGULAR_FONT };
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![font.into(), pt(run.size)]));
        operations.push(Operation::new("Td", vec![pt(run.x), pt(run.y)]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(encode_text(&run.text))]));
        operations.push(Operation::new("ET", vec![]));
    }
    if let Some((text, geometry)) = footer {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![REGULAR_FONT.into(), pt(8.0)]));
        operations.push(Operation::new("Td", vec![pt(geometry.margin), pt(geometry.margin / 2.0)]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(encode_text(&text))]));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

/// Build a PDF from rendered pages. Pages get a "Page n of m" footer.
pub fn encode(
    pages: &[RenderedPage],
    geometry: &PageGeometry,
    title: &str,
) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let total = pages.len();
    let mut kids: Vec<Object> = Vec::with_capacity(total);
    for (index, page) in pages.iter().enumerate() {
        let footer = format!("Page {} of {}", index + 1, total);
        let content = Content {
            operations: page_operations(page, Some((footer, geometry))),
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => total as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![pt(0.0), pt(0.0), pt(geometry.width), pt(geometry.height)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_text(title)),
        "Producer" => Object::string_literal("wsjf-core"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(bytes)
}
