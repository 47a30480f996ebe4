use crate::{
    application::file_damage_report::use_case::FileDamageReportUseCase, config::Config,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub file_damage_report: Arc<FileDamageReportUseCase>,
    /// Label of the configured mail transport, reported by `/health`.
    pub mail_transport: &'static str,
}
