pub mod loaders;
pub mod question;
pub mod template;

pub use loaders::{load_all_template_files, load_template_file, TemplateFile};
pub use question::{BlankLocation, MarkerOccurrence, QuestionRecord};
pub use template::{Field, Section, Template};
