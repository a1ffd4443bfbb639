//! Data models shared by the analyzer, classifier and layout engine

pub mod code_file;
pub mod dependency_edge;
pub mod zone;

pub use code_file::CodeFile;
pub use dependency_edge::{DependencyEdge, EdgeKind};
pub use zone::{Position, Zone, ZoneSummary};
