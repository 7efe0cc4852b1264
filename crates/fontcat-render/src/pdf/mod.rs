//! PDF backend
//!
//! Builds the document object by object with lopdf. Text in the standard
//! fonts is WinAnsi-encoded; samples use embedded TrueType fonts addressed
//! by glyph id, or grayscale images.

mod encoding;
mod fonts;
mod writer;

pub use encoding::winansi_encode;
pub use fonts::{FontRegistry, RegisteredFont, StandardFont};
pub use writer::{CatalogWriter, PageBuilder};
