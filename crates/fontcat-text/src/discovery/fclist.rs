//! fontconfig `fc-list` tier

use std::path::Path;
use std::process::{Command, Stdio};

use super::DiscoveryError;
use crate::font::{is_container_path, FontDatabase, FontFace, ParsedFace};

const FC_LIST: &str = "fc-list";
const FC_FORMAT: &str = "%{file}|%{family}|%{style}|%{fullname}|%{index}\n";

/// Whether `fc-list` can be executed
pub fn fc_list_available() -> bool {
    Command::new(FC_LIST)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// List faces with `fc-list`, then read metadata from the files that parse
pub(super) fn list_with_fc_list(db: &mut FontDatabase) -> Result<Vec<FontFace>, DiscoveryError> {
    let output = Command::new(FC_LIST)
        .arg("-f")
        .arg(FC_FORMAT)
        .output()
        .map_err(|e| DiscoveryError::SystemIndex(e.to_string()))?;
    if !output.status.success() {
        return Err(DiscoveryError::SystemIndex(format!("exited with {}", output.status)));
    }

    let mut faces = parse_fc_list(&String::from_utf8_lossy(&output.stdout));
    for face in &mut faces {
        let meta = db
            .with_face_data(&face.path, face.face_index(), |data, index| {
                ParsedFace::parse(data, index)
                    .ok()
                    .map(|parsed| parsed.metadata(&face.family))
            })
            .flatten();
        match meta {
            Some(meta) => face.apply_metadata(&meta),
            None => tracing::debug!("No metadata for {}", face.display_path(" ")),
        }
    }
    Ok(faces)
}

/// First entry of a comma-separated fontconfig value
fn first_value(value: &str) -> &str {
    value.split(',').next().unwrap_or("").trim()
}

/// Parse `fc-list` output produced with [`FC_FORMAT`]
pub fn parse_fc_list(output: &str) -> Vec<FontFace> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<FontFace> {
    if line.trim().is_empty() {
        return None;
    }
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 4 {
        return None;
    }

    let path = parts[0].trim();
    if path.is_empty() {
        return None;
    }
    let full_name = first_value(parts[3]);
    let family = match first_value(parts[1]) {
        "" => full_name,
        family => family,
    };
    let style = first_value(parts[2]);

    // fontconfig packs named-instance ids in the high 16 bits
    let index = parts
        .get(4)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .map(|i| i & 0xFFFF);
    let index = if is_container_path(Path::new(path)) {
        Some(index.unwrap_or(0))
    } else {
        None
    };

    Some(FontFace::new(family, style, full_name, path).with_index(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fc_list() {
        let output = "\
/usr/share/fonts/dejavu/DejaVuSans.ttf|DejaVu Sans|Book|DejaVu Sans|0
/usr/share/fonts/noto/NotoSansCJK.ttc|Noto Sans CJK JP,Noto Sans CJK JP Regular|Regular,Standard|Noto Sans CJK JP|2

/usr/share/fonts/misc/odd.ttf||Bold|Odd Face Bold|0
/usr/share/fonts/misc/bare.ttf|||
broken line
";
        let faces = parse_fc_list(output);
        assert_eq!(faces.len(), 4);

        assert_eq!(faces[0].family, "DejaVu Sans");
        assert_eq!(faces[0].style, "Book");
        assert_eq!(faces[0].index, None);

        assert_eq!(faces[1].family, "Noto Sans CJK JP");
        assert_eq!(faces[1].style, "Regular");
        assert_eq!(faces[1].index, Some(2));

        assert_eq!(faces[2].family, "Odd Face Bold");
        assert_eq!(faces[2].full_name, "Odd Face Bold");

        assert_eq!(faces[3].family, "Unknown");
        assert_eq!(faces[3].style, "Regular");
        assert_eq!(faces[3].full_name, "Unknown Regular");
    }

    #[test]
    fn test_named_instance_index_is_masked() {
        let faces = parse_fc_list("/f/Var.ttc|Var|Bold|Var Bold|65537\n/f/Var.ttf|Var|Bold|Var Bold|65536\n");
        assert_eq!(faces[0].index, Some(1));
        assert_eq!(faces[1].index, None);
    }
}
