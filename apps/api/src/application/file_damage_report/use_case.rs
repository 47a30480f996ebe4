use crate::{
    application::file_damage_report::dto::{FileDamageReportRequest, ImageBlob},
    domain::report::{
        entity::{ComposedDocument, CoverDetails},
        errors::{FailureKind, ReportError},
        ledger::DamageLedger,
        value_objects::{ArtifactName, ReportIdentifier},
    },
    infrastructure::{
        imaging::{self, NormalizedImage},
        mail::{ReportAttachment, ReportMailer},
        pdf::ReportComposer,
    },
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Stages a damage report request moves through. See [`Self::is_terminal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Validated,
    LedgerParsed,
    ImagesProcessed,
    DocumentComposed,
    Dispatched,
    DispatchFailed,
    InputError,
    LedgerError,
    ImageError,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Dispatched
                | Self::DispatchFailed
                | Self::InputError
                | Self::LedgerError
                | Self::ImageError
        )
    }

    pub fn can_advance_to(self, next: Self) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Received, Validated)
                | (Received, InputError)
                | (Validated, LedgerParsed)
                | (Validated, LedgerError)
                | (LedgerParsed, ImagesProcessed)
                | (LedgerParsed, ImageError)
                | (ImagesProcessed, DocumentComposed)
                | (ImagesProcessed, ImageError)
                | (DocumentComposed, Dispatched)
                | (DocumentComposed, DispatchFailed)
        )
    }
}

impl From<FailureKind> for PipelineState {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Input => Self::InputError,
            FailureKind::Ledger => Self::LedgerError,
            FailureKind::Image => Self::ImageError,
        }
    }
}

#[derive(Debug)]
struct Progress {
    state: PipelineState,
}

impl Progress {
    fn new() -> Self {
        Self {
            state: PipelineState::Received,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal pipeline transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "Pipeline transition");
        self.state = next;
    }

    fn fail(&mut self, err: &ReportError) {
        // Logged once, at the HTTP edge.
        self.advance(PipelineState::from(err.kind()));
    }
}

/// Whether the composed report reached the distribution list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Dispatched,
    DispatchFailed { reason: String },
}

/// Terminal result of a request that produced a document.
#[derive(Debug, Clone)]
pub struct FiledReport {
    pub document: ComposedDocument,
    pub delivery: DeliveryStatus,
}

impl FiledReport {
    pub fn final_state(&self) -> PipelineState {
        match self.delivery {
            DeliveryStatus::Dispatched => PipelineState::Dispatched,
            DeliveryStatus::DispatchFailed { .. } => PipelineState::DispatchFailed,
        }
    }
}

/// Turns one upload into a composed PDF and emails it.
///
/// Input and ledger problems are rejected before any image is decoded. Photo
/// decoding and PDF serialization run on the blocking pool; a failure there
/// discards everything composed so far. Once the document exists, a delivery
/// failure is reported alongside it rather than as an error.
pub struct FileDamageReportUseCase {
    composer: ReportComposer,
    mailer: Arc<dyn ReportMailer>,
}

impl FileDamageReportUseCase {
    pub fn new(composer: ReportComposer, mailer: Arc<dyn ReportMailer>) -> Self {
        Self { composer, mailer }
    }

    #[instrument(skip(self, request), fields(
        identifier = %request.identifier,
        images = request.images.len(),
        has_ledger = request.ledger.is_some()
    ))]
    pub async fn execute(
        &self,
        request: FileDamageReportRequest,
    ) -> Result<FiledReport, ReportError> {
        let mut progress = Progress::new();
        match self.run(&mut progress, request).await {
            Ok(report) => Ok(report),
            Err(err) => {
                progress.fail(&err);
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        progress: &mut Progress,
        request: FileDamageReportRequest,
    ) -> Result<FiledReport, ReportError> {
        let artifact = validate(&request)?;
        progress.advance(PipelineState::Validated);

        let ledger = DamageLedger::parse(request.ledger.as_deref())?;
        let ledger_lines = ledger.render(self.composer.locale());
        progress.advance(PipelineState::LedgerParsed);

        let images = request.images;
        let photos = tokio::task::spawn_blocking(move || normalize_all(images))
            .await
            .map_err(|e| ReportError::Document(format!("image worker failed: {e}")))??;
        progress.advance(PipelineState::ImagesProcessed);

        let cover = CoverDetails {
            artifact,
            generated_on: chrono::Local::now().date_naive(),
        };
        let composer = self.composer.clone();
        let document = tokio::task::spawn_blocking(move || {
            composer.compose(&cover, &ledger_lines, &photos)
        })
        .await
        .map_err(|e| ReportError::Document(format!("composition worker failed: {e}")))?
        .map_err(|e| ReportError::Document(e.to_string()))?;
        progress.advance(PipelineState::DocumentComposed);

        let delivery = self.dispatch(&document).await;
        let report = FiledReport { document, delivery };
        progress.advance(report.final_state());
        Ok(report)
    }

    async fn dispatch(&self, document: &ComposedDocument) -> DeliveryStatus {
        let attachment = ReportAttachment {
            file_name: document.file_name(),
            bytes: document.bytes.clone(),
        };

        match self.mailer.send_report(&attachment).await {
            Ok(()) => {
                info!(
                    file_name = %attachment.file_name,
                    pages = document.page_count(),
                    "Report composed and dispatched"
                );
                DeliveryStatus::Dispatched
            }
            Err(err) => {
                warn!(
                    file_name = %attachment.file_name,
                    transport = self.mailer.transport_name(),
                    "Report composed but dispatch failed: {}",
                    err
                );
                DeliveryStatus::DispatchFailed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

fn validate(request: &FileDamageReportRequest) -> Result<ArtifactName, ReportError> {
    let identifier = ReportIdentifier::new(&request.identifier)?;
    if request.images.is_empty() {
        return Err(ReportError::MissingImages);
    }
    ArtifactName::sanitize(&identifier)
}

fn normalize_all(images: Vec<ImageBlob>) -> Result<Vec<NormalizedImage>, ReportError> {
    images
        .into_iter()
        .enumerate()
        .map(|(position, blob)| {
            debug!(
                position,
                file_name = %blob.file_name,
                content_type = blob.content_type.as_deref().unwrap_or("unknown"),
                bytes = blob.data.len(),
                "Normalizing photo"
            );
            imaging::normalize(&blob.data).map_err(|e| ReportError::Image {
                position,
                file_name: blob.file_name.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}
