//! Section grouping and pagination
//!
//! Pagination produces a [`CatalogPlan`]: positioned elements per page and
//! one bookmark per section. Planning needs no font data, so page breaks
//! and bookmarks can be checked without touching the PDF backend.

use std::collections::BTreeMap;

use fontcat_text::{DrawMode, FontFace, PreparedFace, FALLBACK_SECTION};

use crate::config::{Detail, LayoutConfig};
use crate::pdf::StandardFont;

pub const TITLE: &str = "System Font Catalogue";
pub const PLACEHOLDER: &str = "(sample unavailable)";

/// Faces sharing a section letter, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    pub letter: String,
    pub faces: Vec<&'a PreparedFace>,
}

/// Group faces by section letter.
///
/// Sections come out ordered by letter with the fallback bucket last.
pub fn group_sections(prepared: &[PreparedFace]) -> Vec<Section<'_>> {
    let mut groups: BTreeMap<(bool, &str), Vec<&PreparedFace>> = BTreeMap::new();
    for face in prepared {
        let letter = face.section.as_str();
        groups
            .entry((letter == FALLBACK_SECTION, letter))
            .or_default()
            .push(face);
    }
    groups
        .into_iter()
        .map(|((_, letter), faces)| Section { letter: letter.to_string(), faces })
        .collect()
}

/// A positioned drawing instruction; `y` is the text baseline
#[derive(Debug, Clone, PartialEq)]
pub enum Element<'a> {
    Text {
        text: String,
        font: StandardFont,
        size: f32,
        x: f32,
        y: f32,
    },
    /// Sample line of a drawable face
    Sample {
        face: &'a PreparedFace,
        x: f32,
        y: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannedPage<'a> {
    pub elements: Vec<Element<'a>>,
}

/// Outline entry for a section
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub letter: String,
    /// Zero-based page index
    pub page: usize,
    /// Top of the header band on that page
    pub top: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPlan<'a> {
    pub pages: Vec<PlannedPage<'a>>,
    pub bookmarks: Vec<Bookmark>,
    pub sections: Vec<Section<'a>>,
}

impl CatalogPlan<'_> {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages on which the header of `letter` is drawn
    pub fn header_pages(&self, letter: &str) -> Vec<usize> {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, page)| {
                page.elements.iter().any(|e| {
                    matches!(e, Element::Text { text, font: StandardFont::HelveticaBold, .. } if text == letter)
                })
            })
            .map(|(i, _)| i)
            .collect()
    }
}

/// Specs line of a face in full mode
pub fn specs_line(face: &FontFace) -> String {
    let yes_no = |flag: Option<bool>| if flag == Some(true) { "yes" } else { "no" };
    let weight = match face.weight {
        Some(w) if w > 0 => w.to_string(),
        _ => "?".to_string(),
    };
    format!(
        "{} — {}   |   class={}   mono={}   weight={}   italic={}   accents={}",
        face.family,
        face.style,
        face.classification.unwrap_or_default(),
        yes_no(face.monospace),
        weight,
        yes_no(face.italic),
        yes_no(face.supports_accents),
    )
}

struct Paginator<'a, 'c> {
    config: &'c LayoutConfig,
    pages: Vec<PlannedPage<'a>>,
    y: f32,
}

impl<'a> Paginator<'a, '_> {
    fn page(&mut self) -> &mut PlannedPage<'a> {
        if self.pages.is_empty() {
            self.pages.push(PlannedPage::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn text(&mut self, text: impl Into<String>, font: StandardFont, size: f32) {
        let (x, y) = (self.config.margin, self.y);
        self.page().elements.push(Element::Text { text: text.into(), font, size, x, y });
    }

    fn new_page(&mut self) {
        self.pages.push(PlannedPage::default());
        self.y = self.config.top();
    }

    /// Break the page when less than `need` is left above the margin
    fn ensure(&mut self, need: f32) -> bool {
        if self.y < self.config.margin + need {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn header(&mut self, letter: &str) {
        let size = self.config.header_size;
        self.y -= size * self.config.header_descent;
        self.text(letter, StandardFont::HelveticaBold, size);
        self.y -= size * self.config.header_ascent + self.config.after_header_gap;
    }

    fn entry(&mut self, face: &'a PreparedFace, detail: Detail) {
        let config = self.config;
        let x = config.margin;
        match face.draw_mode {
            DrawMode::Vector => {
                let y = self.y;
                self.page().elements.push(Element::Sample { face, x, y });
                self.y -= config.sample_line;
            }
            DrawMode::Raster(_) => {
                let y = self.y;
                self.page().elements.push(Element::Sample { face, x, y });
                self.y -= face.sample_height + config.raster_gap;
            }
            DrawMode::Undrawable => {
                self.text(PLACEHOLDER, StandardFont::Helvetica, config.placeholder_size);
                self.y -= config.placeholder_line;
            }
        }

        if detail == Detail::Full {
            self.text(specs_line(&face.face), StandardFont::HelveticaOblique, config.specs_size);
            self.y -= config.specs_line;
        }

        self.y -= config.path_gap;
        self.text(face.face.display_path("  "), StandardFont::Helvetica, config.path_size);
        self.y -= config.path_line + config.entry_gap;
    }
}

/// Lay prepared faces out on pages
pub fn plan_catalog<'a>(prepared: &'a [PreparedFace], config: &LayoutConfig, detail: Detail) -> CatalogPlan<'a> {
    let mut p = Paginator {
        config,
        pages: vec![PlannedPage::default()],
        y: config.top(),
    };

    p.text(TITLE, StandardFont::HelveticaBold, config.title_size);
    p.y -= config.title_size * config.title_leading;
    p.text(
        format!("Total fonts listed: {}   |   mode: {}", prepared.len(), detail.as_str()),
        StandardFont::Helvetica,
        config.summary_size,
    );
    p.y -= config.summary_line;

    let sections = group_sections(prepared);
    let mut bookmarks = Vec::with_capacity(sections.len());

    for section in &sections {
        let Some(first) = section.faces.first() else {
            continue;
        };
        p.ensure(config.header_band() + config.block_height(first.sample_height, detail));
        bookmarks.push(Bookmark {
            letter: section.letter.clone(),
            page: p.pages.len() - 1,
            top: p.y,
        });
        p.header(&section.letter);

        for &face in &section.faces {
            if p.ensure(config.block_height(face.sample_height, detail)) {
                // Continuation header, no new bookmark
                p.header(&section.letter);
            }
            p.entry(face, detail);
        }
    }

    tracing::debug!("Planned {} page(s), {} section(s)", p.pages.len(), bookmarks.len());
    CatalogPlan {
        pages: p.pages,
        bookmarks,
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontcat_text::SampleBox;

    fn prepared(family: &str, path: &str, mode: DrawMode) -> PreparedFace {
        PreparedFace::new(FontFace::new(family, "Regular", "", path), mode, 14.0)
    }

    fn texts<'p>(plan: &'p CatalogPlan, page: usize) -> Vec<&'p str> {
        plan.pages[page]
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { text, .. } => Some(text.as_str()),
                Element::Sample { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_group_sections_order() {
        let faces = vec![
            prepared("123", "/n.ttf", DrawMode::Vector),
            prepared("Beta", "/b.ttf", DrawMode::Vector),
            prepared("alpha", "/a1.ttf", DrawMode::Vector),
            prepared("Alpha", "/a2.ttf", DrawMode::Vector),
        ];
        let sections = group_sections(&faces);
        let letters: Vec<_> = sections.iter().map(|s| s.letter.as_str()).collect();
        assert_eq!(letters, ["A", "B", "#"]);
        let a: Vec<_> = sections[0].faces.iter().map(|f| f.face.path.to_str().unwrap()).collect();
        assert_eq!(a, ["/a1.ttf", "/a2.ttf"]);
    }

    #[test]
    fn test_first_page_layout() {
        let config = LayoutConfig::default();
        let mut faces = vec![prepared("Alpha", "/a.ttc", DrawMode::Undrawable)];
        faces[0].face.index = Some(3);
        let plan = plan_catalog(&faces, &config, Detail::Full);

        assert_eq!(plan.page_count(), 1);
        let t = texts(&plan, 0);
        assert_eq!(t[0], TITLE);
        assert_eq!(t[1], "Total fonts listed: 1   |   mode: full");
        assert_eq!(t[2], "A");
        assert_eq!(t[3], PLACEHOLDER);
        assert!(t[4].starts_with("Alpha — Regular   |   class=unknown"));
        assert_eq!(t[5], "/a.ttc  (index 3)");

        // Header baseline is lowered by the descent
        let top = config.top();
        let summary_y = top - 16.0 * 1.1;
        let header_top = summary_y - 14.0;
        assert_eq!(plan.bookmarks.len(), 1);
        assert!((plan.bookmarks[0].top - header_top).abs() < 1e-3);
        match &plan.pages[0].elements[2] {
            Element::Text { y, size, .. } => {
                assert_eq!(*size, 26.0);
                assert!((y - (header_top - 26.0 * 0.2)).abs() < 1e-3);
            }
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn test_long_section_single_bookmark() {
        let config = LayoutConfig::default();
        let mut faces: Vec<_> = (0..60)
            .map(|i| prepared("Alpha", &format!("/a{i:02}.ttf"), DrawMode::Vector))
            .collect();
        faces.push(prepared("Beta", "/b.ttf", DrawMode::Raster(SampleBox { width: 100.0, height: 20.0 })));
        let plan = plan_catalog(&faces, &config, Detail::Simple);

        let a_pages = plan.header_pages("A");
        assert!(a_pages.len() >= 2, "section should span pages: {a_pages:?}");
        let a_marks: Vec<_> = plan.bookmarks.iter().filter(|b| b.letter == "A").collect();
        assert_eq!(a_marks.len(), 1);
        assert_eq!(a_marks[0].page, a_pages[0]);
        assert_eq!(plan.bookmarks.iter().filter(|b| b.letter == "B").count(), 1);

        // Every entry stays above the bottom margin
        for page in &plan.pages {
            for element in &page.elements {
                let y = match element {
                    Element::Text { y, .. } | Element::Sample { y, .. } => *y,
                };
                assert!(y >= config.margin, "element below margin at {y}");
            }
        }
    }

    #[test]
    fn test_section_start_breaks_page() {
        // Short page: the second section cannot follow the first
        let config = LayoutConfig {
            page_height: 200.0,
            ..LayoutConfig::default()
        };
        let faces = vec![
            prepared("Alpha", "/a.ttf", DrawMode::Vector),
            prepared("Beta", "/b.ttf", DrawMode::Vector),
        ];
        let plan = plan_catalog(&faces, &config, Detail::Simple);
        let pages: Vec<_> = plan.bookmarks.iter().map(|b| b.page).collect();
        assert_eq!(pages, [0, 1]);
        assert_eq!(plan.bookmarks[1].top, config.top());
    }

    #[test]
    fn test_specs_line() {
        let mut face = FontFace::new("Mono", "Bold", "", "/m.ttf");
        face.weight = Some(700);
        face.monospace = Some(true);
        face.supports_accents = Some(true);
        face.classification = Some(fontcat_text::Classification::Mono);
        assert_eq!(
            specs_line(&face),
            "Mono — Bold   |   class=mono   mono=yes   weight=700   italic=no   accents=yes"
        );
    }
}
