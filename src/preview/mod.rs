pub mod renderer;

pub use renderer::{render, Preview, PreviewDocument, PreviewField, PreviewSection, Span};
