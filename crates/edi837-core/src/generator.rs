//! End-to-end generation of one 837P interchange.

use std::path::Path;

use edi837_control::{ControlNumberManager, ControlNumbers, CounterStore, FileCounterStore};
use edi837_model::{ClaimRecord, Diagnostics, EngineConfig, MissingIdentityError};
use edi837_transform::{grouping_key, normalize_record};
use edi837_x12::{EdiDocument, RenderOptions, validate, wrap_transaction};

use crate::assembler::assemble_body;
use crate::clock::{Clock, SystemClock};
use crate::error::{EngineError, Result};
use crate::grouping::group_claims;

/// A validated interchange and everything reported while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub text: String,
    pub control_numbers: ControlNumbers,
    pub claim_count: usize,
    pub line_count: usize,
    pub diagnostics: Diagnostics,
    /// Records skipped for lack of a grouping key.
    pub rejected: Vec<MissingIdentityError>,
}

/// Turns batches of claim records into interchanges.
///
/// Control numbers are reserved from the store only once the document has
/// been rendered and validated. A failed call leaves the store untouched.
pub struct DocumentGenerator<S> {
    config: EngineConfig,
    control: ControlNumberManager<S>,
    clock: Box<dyn Clock>,
}

impl DocumentGenerator<FileCounterStore> {
    /// Generator backed by the state file named in `config.control`.
    pub fn from_config(config: EngineConfig) -> Self {
        let store = FileCounterStore::from_config(&config.control);
        Self::new(config, store)
    }

    /// Load a TOML configuration and build a file-backed generator from it.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = EngineConfig::load(path)?;
        Ok(Self::from_config(config))
    }
}

impl<S: CounterStore> DocumentGenerator<S> {
    pub fn new(config: EngineConfig, store: S) -> Self {
        let control = ControlNumberManager::new(store).with_rollover(config.control.rollover);
        Self {
            config,
            control,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn control_numbers(&self) -> &ControlNumberManager<S> {
        &self.control
    }

    /// Generate one interchange holding every claim in `records`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Record`] when a keyed record cannot be normalized
    /// - [`EngineError::EmptyBatch`] when no record has a grouping key
    /// - [`EngineError::Format`] when the rendered document fails validation
    /// - [`EngineError::Control`] when the counter store cannot be used
    pub fn generate(&self, records: &[ClaimRecord]) -> Result<GeneratedDocument> {
        let span = tracing::info_span!("generate", records = records.len());
        let _guard = span.enter();

        let mut diagnostics = Diagnostics::new();
        let mut rejected = Vec::new();
        let mut normalized = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            // Keyless records are set aside before their dates are looked at.
            if grouping_key(record, &self.config).is_none() {
                tracing::warn!(record_id = %record.record_id, index, "record has no grouping key");
                rejected.push(MissingIdentityError {
                    record_id: record.record_id.clone(),
                    index,
                });
                continue;
            }
            normalized.push((index, normalize_record(record, &self.config, &mut diagnostics)?));
        }

        let grouping = group_claims(normalized, &mut diagnostics);
        rejected.extend(grouping.rejected);
        rejected.sort_by_key(|missing| missing.index);
        if grouping.groups.is_empty() {
            tracing::warn!(rejected = rejected.len(), "no claims to assemble");
            return Err(EngineError::EmptyBatch {
                records: records.len(),
                rejected: rejected.len(),
            });
        }

        let timestamp = self.clock.now();
        let body = assemble_body(&grouping.groups, &self.config, timestamp, &mut diagnostics);
        let expected = body.expected_counts();
        let options = RenderOptions::default()
            .with_newlines(self.config.render.newline_after_segment);

        let (text, control_numbers) = self.control.with_envelope_numbers(|numbers| {
            let segments =
                wrap_transaction(body.segments, &self.config.interchange, &numbers, timestamp);
            let text = EdiDocument::new(segments).render(options);
            if let Err(err) = validate(&text, Some(expected)) {
                tracing::error!(
                    segment = err.segment().unwrap_or_default(),
                    position = err.position(),
                    "generated document failed validation"
                );
                return Err(EngineError::from(err));
            }
            Ok((text, numbers))
        })?;

        tracing::info!(
            claims = body.claim_count,
            lines = body.line_count,
            rejected = rejected.len(),
            warnings = diagnostics.warning_count(),
            interchange = control_numbers.interchange,
            "generated interchange"
        );

        Ok(GeneratedDocument {
            text,
            control_numbers,
            claim_count: body.claim_count,
            line_count: body.line_count,
            diagnostics,
            rejected,
        })
    }
}
