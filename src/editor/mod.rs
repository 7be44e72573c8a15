pub mod structure_editor;

pub use structure_editor::{Direction, StructureEditor, TextTarget};
