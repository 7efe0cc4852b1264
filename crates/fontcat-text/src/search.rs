//! Fuzzy font search
//!
//! Scores are Ratcliff/Obershelp similarity ratios over normalized names,
//! scaled to 0..=100.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::font::FontFace;
use crate::normalize::normalize;

/// Length of the second sequence from which frequent elements stop
/// seeding matches
const AUTOJUNK_MIN_LEN: usize = 200;

/// Longest-common-block matcher over two char sequences.
///
/// The second sequence is indexed once, so one matcher can be reused
/// against many first sequences via [`SequenceMatcher::set_a`].
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// Positions of each element of `b`, popular elements removed
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let mut matcher = Self {
            a: a.chars().collect(),
            b: Vec::new(),
            b2j: HashMap::new(),
        };
        matcher.set_b(b);
        matcher
    }

    pub fn set_a(&mut self, a: &str) {
        self.a = a.chars().collect();
    }

    pub fn set_b(&mut self, b: &str) {
        self.b = b.chars().collect();
        self.b2j.clear();
        for (j, &c) in self.b.iter().enumerate() {
            self.b2j.entry(c).or_default().push(j);
        }

        let n = self.b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let limit = n / 100 + 1;
            let popular: HashSet<char> = self
                .b2j
                .iter()
                .filter(|(_, positions)| positions.len() > limit)
                .map(|(&c, _)| c)
                .collect();
            self.b2j.retain(|c, _| !popular.contains(c));
        }
    }

    /// Longest matching block `(i, j, size)` in `a[alo..ahi]` and
    /// `b[blo..bhi]`, earliest in `a` then in `b` on ties
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Grow the block over equal neighbours that popular elements hid
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    /// Non-overlapping matching blocks, in no particular order
    pub fn matching_blocks(&self) -> Vec<(usize, usize, usize)> {
        let mut blocks = Vec::new();
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            blocks.push((i, j, k));
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks
    }

    /// Similarity in `0.0..=1.0`: twice the matched length over the total
    /// length, 1.0 for two empty sequences
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self.matching_blocks().iter().map(|&(_, _, k)| k).sum();
        2.0 * matched as f64 / total as f64
    }
}

/// Similarity of two names after normalization, 0..=100
pub fn match_score(query: &str, candidate: &str) -> f64 {
    100.0 * SequenceMatcher::new(&normalize(query), &normalize(candidate)).ratio()
}

/// Non-empty searchable fields of a face
fn search_fields(face: &FontFace) -> Vec<String> {
    [
        face.family.clone(),
        face.style.clone(),
        face.full_name.clone(),
        face.file_name(),
    ]
    .into_iter()
    .filter(|f| !f.is_empty())
    .collect()
}

/// Best score of a query against a face: the joined document or any single
/// field, whichever is higher
pub fn face_score(query: &str, face: &FontFace) -> f64 {
    let query = normalize(query);
    let fields = search_fields(face);
    let document = fields.join(" ");

    let mut matcher = SequenceMatcher::new(&query, "");
    std::iter::once(&document)
        .chain(fields.iter())
        .map(|candidate| {
            matcher.set_b(&normalize(candidate));
            100.0 * matcher.ratio()
        })
        .fold(0.0, f64::max)
}

/// A search result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub face: &'a FontFace,
    /// 0..=100
    pub score: f64,
}

/// Rank faces against `query`; at most `top_k` hits, best first, ties
/// broken by family then style, case-insensitively
pub fn search_fonts<'a>(faces: &'a [FontFace], query: &str, top_k: usize) -> Vec<SearchHit<'a>> {
    let mut hits: Vec<SearchHit<'a>> = faces
        .iter()
        .map(|face| SearchHit { face, score: face_score(query, face) })
        .collect();

    hits.sort_by(|x, y| {
        y.score
            .partial_cmp(&x.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| x.face.family.to_lowercase().cmp(&y.face.family.to_lowercase()))
            .then_with(|| x.face.style.to_lowercase().cmp(&y.face.style.to_lowercase()))
    });
    hits.truncate(top_k);

    tracing::debug!("Search {:?}: {} hit(s) from {} face(s)", query, hits.len(), faces.len());
    hits
}
