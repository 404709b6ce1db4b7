pub mod article;
pub mod analysis;

pub use article::*;
pub use analysis::*;
