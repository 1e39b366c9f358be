//! Recurrence handling: pattern date generation, conflict classification,
//! and the generation preview that batch execution reuses.

pub mod conflicts;
pub mod dates;
pub mod preview;

pub use conflicts::{classify, expand_marker_dates, DateDecision};
pub use dates::{generate_dates, validate_pattern_fields};
pub use preview::{preview_generation, GenerationPreview, PreviewEntry};
