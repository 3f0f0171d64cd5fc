//! Row model and transformation pipeline.
//!
//! - **line**: one parsed, schema-aligned row and its per-row operations
//! - **registry**: run-scoped categorical label codes
//! - **words**: number-word table for word-to-int conversion
//! - **step**: declarative steps and the ordered [`Pipeline`]
//! - **transformer**: the chainable driver that applies steps to all rows
//! - **dataset**: the collected rectangular result

pub mod dataset;
pub mod line;
mod load;
pub mod registry;
pub mod step;
pub mod transformer;
pub mod words;

pub use dataset::Dataset;
pub use line::Line;
pub use load::linearize;
pub use registry::{EncoderKind, LabelRegistry};
pub use step::{Pipeline, Step};
pub use transformer::{StepReport, Transformer};
pub use words::{UnknownWordPolicy, WordTable};
