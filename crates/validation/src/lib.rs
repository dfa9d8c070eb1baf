pub mod templates;
pub mod validator;
pub mod workbook;

pub use templates::{write_distribution_template, write_scoring_template};
pub use validator::{validate, validate_final_scores};
pub use workbook::{LoadError, RawSection, RawWorkbook};
