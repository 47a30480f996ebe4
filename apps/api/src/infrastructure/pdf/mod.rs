pub mod branding;
pub mod composer;
pub mod layout;

pub use branding::Branding;
pub use composer::{ComposeError, ReportComposer};
