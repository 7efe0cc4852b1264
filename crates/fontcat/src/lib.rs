//! fontcat - System Font Catalogue
//!
//! Discovers installed fonts, lists or fuzzy-searches them, and writes a PDF
//! catalogue with one bookmark per alphabetical section.

pub mod cli;
pub mod output;

pub use cli::Cli;

use std::io::Write;

use anyhow::{bail, Context};
use fontcat_render::render_catalog;
use fontcat_text::{discover, enrich_and_prepare, mark_accent_support, search_fonts, sort_faces, FontDatabase};

/// Log to stderr; `RUST_LOG` overrides the default `warn` level
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Exit status after Ctrl-C, as shells report SIGINT
const INTERRUPTED_EXIT: i32 = 130;

/// Remove in-flight temp images on Ctrl-C before exiting
pub fn install_interrupt_cleanup() {
    let result = ctrlc::set_handler(|| {
        let removed = fontcat_render::temp::remove_live_files();
        tracing::warn!("Interrupted; removed {} temp image(s)", removed);
        std::process::exit(INTERRUPTED_EXIT);
    });
    if let Err(err) = result {
        tracing::warn!("Could not install the interrupt handler: {}", err);
    }
}

/// Run one invocation, writing user-facing lines to `out`
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    if !cli.has_action() {
        bail!("nothing to do: pass --pdf, --list-only or --search (see --help)");
    }

    let mut db = FontDatabase::new();
    let discovery = discover(&mut db, &cli.discovery_config());
    for diagnostic in &discovery.diagnostics {
        tracing::debug!("{}", diagnostic);
    }
    let mut faces = discovery.faces;

    if let Some(query) = &cli.search {
        let hits = search_fonts(&faces, query, cli.top);
        writeln!(out, "{}", output::search_header(hits.len(), query))?;
        for hit in &hits {
            writeln!(out, "{}", output::search_line(hit))?;
        }
        if cli.pdf.is_none() {
            return Ok(());
        }
    }

    let Some(pdf_path) = cli.pdf_path(&output::hostname()) else {
        // --list-only without --pdf
        mark_accent_support(&mut db, &mut faces, &cli.accents);
        sort_faces(&mut faces);
        for face in &faces {
            writeln!(out, "{}", output::listing_line(face))?;
        }
        return Ok(());
    };

    // --list-only is ignored once a PDF is requested
    let prepared = enrich_and_prepare(&mut db, faces, &cli.enrich_options());

    let summary = render_catalog(&mut db, &prepared, &cli.catalog_options(), &pdf_path)
        .with_context(|| format!("failed to write {}", pdf_path.display()))?;
    tracing::info!(
        "{} face(s): {} vector, {} raster, {} placeholder",
        summary.faces,
        summary.vector_samples,
        summary.raster_samples,
        summary.placeholders
    );
    writeln!(out, "PDF written to: {}", pdf_path.display())?;
    Ok(())
}
