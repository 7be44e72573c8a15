pub mod json_loader;

pub use json_loader::{load_all_template_files, load_template_file, TemplateFile};
