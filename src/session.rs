//! Compression session.
//!
//! Tracks a set of entries through the `pending → processing →
//! {completed | error}` lifecycle: add sources, process what is pending,
//! reprocess everything after a settings change, remove or clear entries.
//! Every display handle the session creates is released when its entry is
//! superseded or removed, and whatever is left goes when the session is
//! dropped.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::{EntryStatus, SourceImage, TransformRequest, TransformResult};
use crate::export::ExportItem;
use crate::handle::{DisplayHandle, HandleRegistry};
use crate::intake::MAX_SOURCES_PER_BATCH;
use crate::transform::ImageTransformer;
use crate::utils::{format_file_size, CompressorError, CompressorResult};

/// One tracked image within a session.
#[derive(Debug)]
pub struct SessionEntry {
    pub source: SourceImage,
    pub status: EntryStatus,
    pub result: Option<TransformResult>,
    /// Failure message when the status is [`EntryStatus::Error`]
    pub error: Option<String>,
    /// Preview handle for the source payload
    pub source_handle: DisplayHandle,
    /// Preview handle for the transformed payload, once completed
    pub result_handle: Option<DisplayHandle>,
}

/// Drives entries through their lifecycle and owns their display handles.
pub struct CompressionSession {
    transformer: ImageTransformer,
    registry: Arc<HandleRegistry>,
    entries: Vec<SessionEntry>,
}

impl CompressionSession {
    pub fn new(transformer: ImageTransformer, registry: Arc<HandleRegistry>) -> Self {
        Self {
            transformer,
            registry,
            entries: Vec::new(),
        }
    }

    /// Adds sources as pending entries.
    ///
    /// Rejects the whole batch when it would push the session past the
    /// per-batch cap; there are no partial adds.
    pub fn add_sources(&mut self, sources: Vec<SourceImage>) -> CompressorResult<()> {
        if self.entries.len() + sources.len() > MAX_SOURCES_PER_BATCH {
            return Err(CompressorError::validation(format!(
                "Cannot add {} image(s): a batch holds at most {MAX_SOURCES_PER_BATCH}",
                sources.len()
            )));
        }

        for source in sources {
            let source_handle = self.registry.register(source.data.clone());
            debug!("Queued {} ({})", source.name, format_file_size(source.size()));
            self.entries.push(SessionEntry {
                source,
                status: EntryStatus::Pending,
                result: None,
                error: None,
                source_handle,
                result_handle: None,
            });
        }
        Ok(())
    }

    /// Transforms every pending entry with `request`.
    ///
    /// Returns the number of entries that completed.
    pub async fn process_pending(&mut self, request: &TransformRequest) -> usize {
        let pending: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.status == EntryStatus::Pending)
            .map(|(index, _)| index)
            .collect();
        self.process_entries(&pending, request).await
    }

    /// Reprocesses every entry with `request`.
    ///
    /// Superseded result handles are released before the new run starts.
    pub async fn reprocess_all(&mut self, request: &TransformRequest) -> usize {
        for entry in &mut self.entries {
            if let Some(old) = entry.result_handle.take() {
                self.registry.release(old);
            }
            entry.result = None;
            entry.error = None;
            entry.status = EntryStatus::Pending;
        }
        let all: Vec<usize> = (0..self.entries.len()).collect();
        self.process_entries(&all, request).await
    }

    async fn process_entries(&mut self, indices: &[usize], request: &TransformRequest) -> usize {
        if indices.is_empty() {
            return 0;
        }

        for &index in indices {
            self.entries[index].status = EntryStatus::Processing;
        }

        let sources: Vec<SourceImage> = indices
            .iter()
            .map(|&index| self.entries[index].source.clone())
            .collect();
        let items = self.transformer.transform_batch(&sources, request).await;

        let mut completed = 0;
        for (&index, item) in indices.iter().zip(items) {
            let entry = &mut self.entries[index];
            if let Some(old) = entry.result_handle.take() {
                self.registry.release(old);
            }
            match item.outcome {
                Ok(result) => {
                    entry.result_handle = Some(self.registry.register(result.data.clone()));
                    entry.result = Some(result);
                    entry.error = None;
                    entry.status = EntryStatus::Completed;
                    completed += 1;
                }
                Err(e) => {
                    warn!("{} failed: {e}", entry.source.name);
                    entry.result = None;
                    entry.error = Some(e.to_string());
                    entry.status = EntryStatus::Error;
                }
            }
        }
        completed
    }

    /// Removes one entry by id, releasing its handles.
    ///
    /// Returns false when no entry has that id.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(position) = self.entries.iter().position(|entry| entry.source.id == id) else {
            return false;
        };
        let entry = self.entries.remove(position);
        self.release_entry(&entry);
        debug!("Removed {}", entry.source.name);
        true
    }

    /// Clears the session, releasing every handle it owns.
    pub fn clear(&mut self) {
        for entry in &self.entries {
            self.release_entry(entry);
        }
        if !self.entries.is_empty() {
            debug!("Cleared {} entries", self.entries.len());
        }
        self.entries.clear();
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Completed entries paired with their submission names, ready for export.
    pub fn completed(&self) -> Vec<ExportItem> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry.result.as_ref().map(|result| ExportItem {
                    name: entry.source.name.clone(),
                    result: result.clone(),
                })
            })
            .collect()
    }

    fn release_entry(&self, entry: &SessionEntry) {
        self.registry.release(entry.source_handle);
        if let Some(handle) = entry.result_handle {
            self.registry.release(handle);
        }
    }
}

impl Drop for CompressionSession {
    // The session owns its handles; dropping it must not leak them
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransformConfig;
    use crate::utils::ImageFormat;
    use bytes::Bytes;

    fn session() -> CompressionSession {
        let transformer = ImageTransformer::new(TransformConfig::default()).unwrap();
        CompressionSession::new(transformer, Arc::new(HandleRegistry::new()))
    }

    fn raw_source(id: &str) -> SourceImage {
        SourceImage::new(id, format!("{id}.png"), ImageFormat::PNG, Bytes::from_static(b"stub"))
    }

    #[test]
    fn rejects_batches_past_the_cap() {
        let mut session = session();
        let sources: Vec<SourceImage> = (0..MAX_SOURCES_PER_BATCH + 1)
            .map(|i| raw_source(&format!("s{i}")))
            .collect();
        assert!(session.add_sources(sources).is_err());
        assert!(session.is_empty());
    }

    #[test]
    fn the_cap_spans_successive_adds() {
        let mut session = session();
        let first: Vec<SourceImage> = (0..MAX_SOURCES_PER_BATCH)
            .map(|i| raw_source(&format!("a{i}")))
            .collect();
        session.add_sources(first).unwrap();
        assert!(session.add_sources(vec![raw_source("one-too-many")]).is_err());
        assert_eq!(session.len(), MAX_SOURCES_PER_BATCH);
    }

    #[test]
    fn removing_an_unknown_id_is_a_noop() {
        let mut session = session();
        session.add_sources(vec![raw_source("a")]).unwrap();
        assert!(!session.remove("missing"));
        assert!(session.remove("a"));
        assert!(session.is_empty());
    }
}
