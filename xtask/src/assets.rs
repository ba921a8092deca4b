//! Demo inputs: a small two-chapter PDF and a flat-colour avatar.

use anyhow::{bail, Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;
use std::process::Command;

const DEMO_PAGES: &[&[&str]] = &[
    &[
        "Chapter 1",
        "Arjuna Vishada Yoga",
        "Dhritarashtra said: O Sanjaya, after my sons and the sons of Pandu",
        "assembled in the place of pilgrimage at Kurukshetra, desiring to fight,",
        "what did they do?",
        "Sanjaya said: O King, after looking over the army arranged in military",
        "formation by the sons of Pandu, King Duryodhana went to his teacher",
        "and spoke the following words.",
    ],
    &[
        "Chapter 2",
        "Sankhya Yoga",
        "Sanjaya said: Seeing Arjuna full of compassion, his mind depressed,",
        "his eyes full of tears, Madhusudana, Krishna, spoke the following words.",
        "The Supreme Personality of Godhead said: My dear Arjuna, how have these",
        "impurities come upon you? They are not at all befitting a man who knows",
        "the value of life.",
    ],
];

const FONT_SIZE: i64 = 12;
const LEADING: i64 = 18;

/// Write a two-page PDF with one "Chapter N" header per page.
pub fn write_demo_pdf(path: &Path) -> Result<()> {
    let mut doc = build_demo_document(DEMO_PAGES)?;
    doc.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn build_demo_document(pages: &[&[&str]]) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in pages {
        let content = page_content(lines);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
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
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    Ok(doc)
}

fn page_content(lines: &[&str]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("Td", vec![72.into(), 770.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
    }
    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

/// Render a solid 512x512 placeholder with ffmpeg's colour source.
pub fn write_placeholder_avatar(path: &Path) -> Result<()> {
    let status = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-f", "lavfi", "-i"])
        .arg("color=c=0x496d89:s=512x512")
        .args(["-frames:v", "1"])
        .arg(path)
        .status()
        .context("Failed to run ffmpeg. Is it installed?")?;

    if !status.success() {
        bail!("ffmpeg exited with {} while writing {}", status, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_demo_pdf_has_one_page_per_chapter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("demo.pdf");
        write_demo_pdf(&path).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), DEMO_PAGES.len());
    }

    #[test]
    fn test_page_content_lines() {
        let content = page_content(&["Chapter 1", "text"]);
        let ops: Vec<&str> = content
            .operations
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        assert_eq!(ops, vec!["BT", "Tf", "TL", "Td", "Tj", "T*", "Tj", "ET"]);
    }
}
