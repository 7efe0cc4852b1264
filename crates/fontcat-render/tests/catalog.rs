//! End-to-end catalogue tests: plan, PDF outline, temp image lifetime
//!
//! Tests that need a real font return early on hosts without any.

use std::path::Path;

use lopdf::encode_utf16_be;
use fontcat_render::*;
use fontcat_text::draw_mode::vector_support;
use fontcat_text::{
    discover, DiscoveryConfig, DrawMode, FontDatabase, FontFace, PreparedFace, SampleBox, SampleRasterizer,
};
use lopdf::{Document, Object, ObjectId};

fn ghost(family: &str, path: &str) -> PreparedFace {
    PreparedFace::new(FontFace::new(family, "Regular", "", path), DrawMode::Undrawable, 14.0)
}

/// Outline items as `(title bytes, destination page id)`
fn outline_items(doc: &Document) -> Vec<(Vec<u8>, ObjectId)> {
    doc.objects
        .values()
        .filter_map(|obj| obj.as_dict().ok())
        .filter_map(|dict| {
            let title = dict.get(b"Title").ok()?.as_str().ok()?.to_vec();
            let dest = dict.get(b"Dest").ok()?.as_array().ok()?;
            let page = dest.first()?.as_reference().ok()?;
            Some((title, page))
        })
        .collect()
}

fn page_id(doc: &Document, index: usize) -> ObjectId {
    doc.get_pages()[&(index as u32 + 1)]
}

/// First face on the host that the vector backend accepts
fn host_font(db: &mut FontDatabase) -> Option<FontFace> {
    let config = DiscoveryConfig {
        use_system_index: false,
        ..Default::default()
    };
    discover(db, &config)
        .faces
        .into_iter()
        .find(|face| vector_support(db, face).is_ok())
}

// ============================================================================
// SECTIONS AND BOOKMARKS
// ============================================================================

#[test]
fn test_two_a_faces_one_bookmark() {
    let prepared = vec![
        ghost("Arial", "/fonts/arial.ttf"),
        ghost("Bitstream", "/fonts/bitstream.ttf"),
        ghost("Amiri", "/fonts/amiri.ttf"),
    ];
    let mut sorted = prepared.clone();
    sorted.sort_by_cached_key(|p| fontcat_text::sort_key(&p.face));

    let sections = group_sections(&sorted);
    let a = sections.iter().find(|s| s.letter == "A").unwrap();
    let families: Vec<_> = a.faces.iter().map(|p| p.face.family.as_str()).collect();
    assert_eq!(families, ["Amiri", "Arial"]);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("catalog.pdf");
    let mut db = FontDatabase::new();
    let summary = render_catalog(&mut db, &sorted, &CatalogOptions::default(), &out).unwrap();
    assert_eq!(summary.sections, 2);
    assert_eq!(summary.bookmarks, 2);
    assert_eq!(summary.placeholders, 3);

    let doc = Document::load(&out).unwrap();
    let items = outline_items(&doc);
    assert_eq!(items.iter().filter(|(t, _)| *t == encode_utf16_be("A")).count(), 1);
    assert_eq!(items.iter().filter(|(t, _)| *t == encode_utf16_be("B")).count(), 1);
}

#[test]
fn test_multi_page_section_bookmark_on_first_page() {
    let mut prepared = vec![ghost("Zapf", "/fonts/zapf.ttf")];
    prepared.extend((0..80).map(|i| ghost("Bodoni", &format!("/fonts/bodoni-{i:02}.ttf"))));

    let options = CatalogOptions {
        detail: Detail::Full,
        ..Default::default()
    };
    let plan = plan_catalog(&prepared, &options.layout, options.detail);
    let b_pages = plan.header_pages("B");
    assert!(b_pages.len() >= 2);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("catalog.pdf");
    let mut db = FontDatabase::new();
    let summary = render_catalog(&mut db, &prepared, &options, &out).unwrap();
    assert_eq!(summary.pages, plan.page_count());

    let doc = Document::load(&out).unwrap();
    assert_eq!(doc.get_pages().len(), plan.page_count());
    let b_items: Vec<_> = outline_items(&doc)
        .into_iter()
        .filter(|(t, _)| *t == encode_utf16_be("B"))
        .collect();
    assert_eq!(b_items.len(), 1);
    assert_eq!(b_items[0].1, page_id(&doc, b_pages[0]));
}

#[test]
fn test_catalog_opens_with_outline() {
    let prepared = vec![ghost("Arial", "/fonts/arial.ttf")];
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("catalog.pdf");
    let mut db = FontDatabase::new();
    render_catalog(&mut db, &prepared, &CatalogOptions::default(), &out).unwrap();

    let doc = Document::load(&out).unwrap();
    let catalog = doc.catalog().unwrap();
    assert_eq!(catalog.get(b"PageMode").unwrap().as_name().unwrap(), b"UseOutlines");
    assert!(catalog.get(b"Outlines").is_ok());
}

#[test]
fn test_empty_catalog_has_title_page() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.pdf");
    let mut db = FontDatabase::new();
    let summary = render_catalog(&mut db, &[], &CatalogOptions::default(), &out).unwrap();
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.bookmarks, 0);
    assert!(Document::load(&out).is_ok());
}

// ============================================================================
// SAMPLES
// ============================================================================

#[test]
fn test_vector_sample_embeds_font_once() {
    let mut db = FontDatabase::new();
    let Some(face) = host_font(&mut db) else {
        return;
    };
    let prepared = vec![
        PreparedFace::new(face.clone(), DrawMode::Vector, 14.0),
        PreparedFace::new(face, DrawMode::Vector, 14.0),
    ];

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("vector.pdf");
    let summary = render_catalog(&mut db, &prepared, &CatalogOptions::default(), &out).unwrap();
    assert_eq!(summary.vector_samples, 2);
    assert_eq!(summary.embedded_fonts, 1);

    let doc = Document::load(&out).unwrap();
    let type0 = doc
        .objects
        .values()
        .filter_map(|obj| obj.as_dict().ok())
        .filter(|dict| matches!(dict.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Type0"))
        .count();
    assert_eq!(type0, 1);
}

#[test]
fn test_raster_temp_files_removed_after_success() {
    let mut db = FontDatabase::new();
    let Some(face) = host_font(&mut db) else {
        return;
    };
    let raster = SampleRasterizer::new(12.0, 2.0);
    let Ok(size) = raster.measure(&mut db, &face, fontcat_text::DEFAULT_SAMPLE_TEXT) else {
        return;
    };
    let prepared = vec![PreparedFace::new(face, DrawMode::Raster(size), 14.0)];

    let scratch = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let options = CatalogOptions {
        temp_dir: Some(scratch.path().to_path_buf()),
        ..Default::default()
    };
    let summary = render_catalog(&mut db, &prepared, &options, &out_dir.path().join("raster.pdf")).unwrap();
    assert_eq!(summary.raster_samples, 1);
    assert_eq!(summary.temp_images, 1);
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_raster_temp_files_removed_after_failure() {
    let mut db = FontDatabase::new();
    let Some(face) = host_font(&mut db) else {
        return;
    };
    let prepared: Vec<_> = (0..3)
        .map(|_| PreparedFace::new(face.clone(), DrawMode::Raster(SampleBox { width: 50.0, height: 12.0 }), 14.0))
        .collect();

    let scratch = tempfile::tempdir().unwrap();
    let options = CatalogOptions {
        temp_dir: Some(scratch.path().to_path_buf()),
        ..Default::default()
    };
    // The output directory does not exist, so saving fails after drawing
    let out = scratch.path().join("missing").join("catalog.pdf");
    assert!(render_catalog(&mut db, &prepared, &options, &out).is_err());
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_temp_dir_must_exist() {
    let mut db = FontDatabase::new();
    let Some(face) = host_font(&mut db) else {
        return;
    };
    let prepared = vec![PreparedFace::new(face, DrawMode::Raster(SampleBox::default()), 14.0)];
    let options = CatalogOptions {
        temp_dir: Some(Path::new("/nonexistent/fontcat-temp").to_path_buf()),
        ..Default::default()
    };
    let dir = tempfile::tempdir().unwrap();
    let result = render_catalog(&mut db, &prepared, &options, &dir.path().join("x.pdf"));
    assert!(matches!(result, Err(RenderError::Io(_))));
}
