pub mod sources_model;

pub use sources_model::{Source, SourceCreate, SourceUpdate, SourceView, TestSourceConnection};
