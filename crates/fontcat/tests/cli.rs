//! Command-line runs against the host's fonts

use clap::Parser;
use fontcat::*;

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("fontcat").chain(args.iter().copied())).unwrap()
}

fn run_to_string(cli: &Cli) -> anyhow::Result<String> {
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

// ============================================================================
// ACTIONS
// ============================================================================

#[test]
fn test_no_action_is_an_error() {
    let err = run_to_string(&cli(&["--full"])).unwrap_err();
    assert!(err.to_string().contains("nothing to do"));
}

#[test]
fn test_list_only_skips_broken_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.ttf"), b"definitely not a font").unwrap();
    let dir_arg = dir.path().to_str().unwrap();

    let text = run_to_string(&cli(&["--list-only", "--scan", "--font-dir", dir_arg])).unwrap();
    for line in text.lines() {
        assert!(line.contains(" — "), "{line}");
        assert!(line.contains(" :: "), "{line}");
        assert!(line.contains("| class="), "{line}");
        assert!(!line.contains("broken.ttf"), "{line}");
    }
}

#[test]
fn test_search_output_format() {
    let text = run_to_string(&cli(&["--search", "sans", "--top", "3", "--scan"])).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Top "));
    assert!(header.ends_with("matches for: 'sans'"));

    let hits: Vec<_> = lines.collect();
    assert!(hits.len() <= 3);
    for line in hits {
        assert!(line.contains("%  "), "{line}");
        assert!(line.contains("  ::  "), "{line}");
    }
}

#[test]
fn test_pdf_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("catalog.pdf");
    let out_arg = out.to_str().unwrap();

    let text = run_to_string(&cli(&["--pdf", out_arg, "--scan", "--require-accents"])).unwrap();
    assert_eq!(text.trim_end(), format!("PDF written to: {}", out.display()));
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn test_pdf_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing").join("catalog.pdf");
    let out_arg = out.to_str().unwrap();

    let err = run_to_string(&cli(&["--pdf", out_arg, "--scan", "--require-sample"])).unwrap_err();
    assert!(format!("{err:#}").contains("failed to write"));
    assert!(!out.exists());
}

#[test]
fn test_list_only_ignored_with_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("catalog.pdf");
    let out_arg = out.to_str().unwrap();

    let text = run_to_string(&cli(&["--list-only", "--pdf", out_arg, "--scan", "--require-accents"])).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("PDF written to: "));
    assert!(out.exists());
}

#[test]
fn test_interrupt_cleanup_installs() {
    // A second install fails inside ctrlc and must only log
    install_interrupt_cleanup();
    install_interrupt_cleanup();
}
