pub mod lettre_mailer;
pub mod traits;

pub use lettre_mailer::LettreReportMailer;
pub use traits::{DispatchError, ReportAttachment, ReportMailer};
