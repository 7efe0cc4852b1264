//! Listing and search output lines

use std::path::PathBuf;

use fontcat_text::{FontFace, SearchHit};

fn yes_no(flag: Option<bool>) -> &'static str {
    if flag == Some(true) { "yes" } else { "no" }
}

/// `<family> — <style> :: <path>[ (index N)] | class=.. mono=.. weight=.. italic=.. accents=..`
pub fn listing_line(face: &FontFace) -> String {
    let weight = face
        .weight
        .map(|w| w.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!(
        "{} — {} :: {} | class={} mono={} weight={} italic={} accents={}",
        face.family,
        face.style,
        face.display_path(" "),
        face.classification.unwrap_or_default(),
        yes_no(face.monospace),
        weight,
        yes_no(face.italic),
        yes_no(face.supports_accents),
    )
}

pub fn search_header(count: usize, query: &str) -> String {
    format!("Top {count} matches for: '{query}'")
}

/// `<score>%  <family> — <style>  ::  <path>[ (index N)]`
pub fn search_line(hit: &SearchHit) -> String {
    format!(
        "{:6.2}%  {} — {}  ::  {}",
        hit.score,
        hit.face.family,
        hit.face.style,
        hit.face.display_path(" ")
    )
}

/// Host name for the default output file
pub fn hostname() -> String {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("HOSTNAME").ok().filter(|s| !s.is_empty()))
        .or_else(|| std::env::var("COMPUTERNAME").ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "localhost".to_string())
}

pub fn default_pdf_path(hostname: &str) -> PathBuf {
    PathBuf::from(format!("fonts_in_{hostname}.pdf"))
}
