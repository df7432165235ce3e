pub mod reader;

pub use reader::FileDocumentProvider;
