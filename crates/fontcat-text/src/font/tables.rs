//! Raw OS/2 fields ttf-parser does not expose: PANOSE, and the weight class
//! of tables too short for it to parse

use super::reader::{FontReader, ReadError};
use crate::font::Classification;

/// Weight class assumed when OS/2 is too short to carry one
pub const DEFAULT_WEIGHT_CLASS: u16 = 400;

/// PANOSE classification bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panose {
    pub family_type: u8,
    pub serif_style: u8,
}

impl Panose {
    /// Classify a Latin text face by its serif style.
    ///
    /// Returns `None` when the family type is not "Latin Text" (2), so the
    /// caller can fall back to the name heuristic.
    pub fn classification(&self) -> Option<Classification> {
        if self.family_type != 2 {
            return None;
        }
        Some(match self.serif_style {
            11 => Classification::Sans,
            2 | 3 | 4 | 5 | 7 | 8 | 9 | 10 => Classification::Serif,
            _ => Classification::Unknown,
        })
    }
}

/// Fields read from the OS/2 table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Os2Fields {
    pub weight_class: u16,
    pub panose: Option<Panose>,
}

impl Os2Fields {
    pub fn parse(data: &[u8]) -> Result<Self, ReadError> {
        let mut r = FontReader::new(data);
        r.skip(4)?; // version, xAvgCharWidth
        let weight_class = r.read_u16().unwrap_or(DEFAULT_WEIGHT_CLASS);

        let panose = {
            let mut r = FontReader::new(data);
            r.skip(32)
                .and_then(|_| r.read_bytes(10))
                .ok()
                .map(|bytes| Panose {
                    family_type: bytes[0],
                    serif_style: bytes[1],
                })
        };

        Ok(Self { weight_class, panose })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os2_table(weight: u16, family_type: u8, serif_style: u8) -> Vec<u8> {
        let mut data = vec![0u8; 78];
        data[4..6].copy_from_slice(&weight.to_be_bytes());
        data[32] = family_type;
        data[33] = serif_style;
        data
    }

    #[test]
    fn test_os2_fields() {
        let os2 = Os2Fields::parse(&os2_table(700, 2, 11)).unwrap();
        assert_eq!(os2.weight_class, 700);
        assert_eq!(os2.panose.unwrap().classification(), Some(Classification::Sans));

        let os2 = Os2Fields::parse(&os2_table(400, 2, 4)).unwrap();
        assert_eq!(os2.panose.unwrap().classification(), Some(Classification::Serif));
    }

    #[test]
    fn test_panose_non_latin_family() {
        let panose = Panose { family_type: 3, serif_style: 11 };
        assert_eq!(panose.classification(), None);
        let panose = Panose { family_type: 2, serif_style: 6 };
        assert_eq!(panose.classification(), Some(Classification::Unknown));
    }

    #[test]
    fn test_truncated_os2() {
        let os2 = Os2Fields::parse(&[0u8; 5]).unwrap();
        assert_eq!(os2.weight_class, DEFAULT_WEIGHT_CLASS);
        assert_eq!(os2.panose, None);
        let os2 = Os2Fields::parse(&os2_table(300, 2, 11)[..40]).unwrap();
        assert_eq!(os2.weight_class, 300);
        assert!(os2.panose.is_some());
        assert!(Os2Fields::parse(&[0u8; 2]).is_err());
    }
}
