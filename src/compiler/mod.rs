pub mod question_compiler;

pub use question_compiler::QuestionCompiler;
