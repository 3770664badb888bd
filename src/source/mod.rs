pub mod category_source;

pub use category_source::{CategorySource, XlsxCategorySource};
