//! Builds small text PDFs with lopdf for the integration tests.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// Write a PDF with one page per entry of `pages`; each page's lines are
/// drawn top to bottom in Courier. `title` goes into the `Info` dictionary.
pub fn write_pdf(path: &Path, pages: &[&[&str]], title: Option<&str>) -> anyhow::Result<()> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            let y = 800 - 16 * idx as i64;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            operations.push(Operation::new("Td", vec![40.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
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

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal("specsheet tests"),
        });
        doc.trailer.set("Info", info_id);
    }

    doc.save(path)?;
    Ok(())
}

/// A three-page venue rider: prose, an equipment table, and a short closing page.
pub fn write_rider(path: &Path) -> anyhow::Result<()> {
    write_pdf(
        path,
        &[
            &[
                "Riverside Hall technical rider",
                "The stage measures twelve by eight metres with wing space.",
                "Load-in is through the rear dock from Mill Street.",
            ],
            &[
                "Audio inventory",
                "Equipment      Model      Qty",
                "Console        CL5        1",
                "Wedge          M15        8",
            ],
            &["Contact the house technician before arrival."],
        ],
        Some("Riverside Hall Rider"),
    )
}
