//! # ESCO Highlight
//!
//! Overlays skill annotations on free-text activity descriptions.
//!
//! Every annotation names a skill, the reason it was detected and the span of
//! text that supports it. Spans may overlap, repeat, or point at the same
//! characters with different skills; the pipeline resolves all of that into
//! non-overlapping, deterministically colored segments.
//!
//! ## Architecture
//!
//! ```text
//! Activity text + LabelEntry[]
//!     │
//!     ├──> Span Locator
//!     │    └─> (start, end) char ranges per cleaned span
//!     │
//!     ├──> Coverage Builder
//!     │    └─> one LabelSet per character
//!     │
//!     ├──> Segmenter
//!     │    └─> maximal runs with a constant LabelSet
//!     │
//!     └──> Renderer
//!          ├─> escape text, skip unlabeled/whitespace runs
//!          ├─> color per combination key (first-seen order)
//!          └─> hover card listing every label of the run
//! ```
//!
//! ## Example
//!
//! ```
//! use esco_highlight::{LabelEntry, insert_highlights};
//!
//! let entries = vec![
//!     LabelEntry::new("work in teams", "Joint work is required", "quick fox"),
//!     LabelEntry::new("show empathy", "Caring for animals", "fox"),
//! ];
//! let html = insert_highlights("the quick fox", &entries);
//! assert!(html.starts_with("the "));
//! assert!(html.contains("work in teams"));
//! ```

mod config;
mod coverage;
mod error;
mod escape;
mod label;
mod locator;
mod render;
mod segmenter;

pub use config::{DEFAULT_PALETTE, HighlightConfig};
pub use coverage::{Coverage, build_coverage};
pub use error::{HighlightError, Result};
pub use escape::escape_html;
pub use label::{CombinationKey, Label, LabelEntry, LabelSet};
pub use locator::{clean_span, find_all_occurrences};
pub use render::{ColorAssignment, Rendered, Renderer, insert_highlights};
pub use segmenter::{Segment, segments_from_coverage};
