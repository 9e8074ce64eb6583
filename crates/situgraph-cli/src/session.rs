//! Session controller: the single writer of the serialization buffer.
//!
//! The buffer file is the source of truth; everything else (graph model,
//! instance index, entry counter) is derived from it. The controller owns
//! the transient selections a user builds up while entering one lemma
//! (senses, chosen shape, the lemma itself), and `reset` clears exactly
//! those: never the buffer, the entry counter, or the loaded shape catalog.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use situgraph_client::{InferenceStats, KnowledgeService, Sense, ValidationReport};
use situgraph_model::{FieldKind, GraphModel, ShapeCatalog};
use situgraph_turtle::{
    declared_ids, normalize_buffer, parse_graph, preamble, scan, EntryDraft, FieldValue,
    InstanceRef,
};

#[derive(Debug, Default)]
pub struct SessionState {
    /// Monotonic entry counter; synchronized with the buffer on load so
    /// re-opened sessions keep minting fresh identifiers.
    pub entry_count: u64,
    pub lemma: String,
    pub senses: Vec<Sense>,
    pub selected_shape: Option<String>,
    /// Shape → field metadata, loaded once; read-only afterwards.
    pub shapes: ShapeCatalog,
}

impl SessionState {
    /// Clear transient selections. The buffer, counter, and shape catalog
    /// survive.
    pub fn reset(&mut self) {
        self.lemma.clear();
        self.senses.clear();
        self.selected_shape = None;
    }

    /// Advance past every `temp:s<N>` the buffer already declares.
    pub fn sync_counter(&mut self, buffer: &str) {
        let highest = declared_ids(buffer)
            .iter()
            .filter_map(|id| id.strip_prefix("temp:s"))
            .filter_map(|digits| digits.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.entry_count = self.entry_count.max(highest);
    }

    fn next_entry_number(&mut self) -> u64 {
        self.entry_count += 1;
        self.entry_count
    }
}

pub struct SessionController<S: KnowledgeService> {
    pub service: S,
    pub state: SessionState,
    buffer_path: PathBuf,
}

impl<S: KnowledgeService> SessionController<S> {
    pub fn new(service: S, buffer_path: impl Into<PathBuf>) -> Self {
        Self {
            service,
            state: SessionState::default(),
            buffer_path: buffer_path.into(),
        }
    }

    pub fn buffer_path(&self) -> &Path {
        &self.buffer_path
    }

    /// Start a fresh buffer containing only the namespace preamble.
    pub fn new_buffer(&mut self) -> Result<()> {
        self.write_buffer(&preamble())?;
        self.state.reset();
        Ok(())
    }

    pub fn load_buffer(&self) -> Result<String> {
        fs::read_to_string(&self.buffer_path)
            .with_context(|| format!("failed to read buffer {}", self.buffer_path.display()))
    }

    fn write_buffer(&self, text: &str) -> Result<()> {
        fs::write(&self.buffer_path, text)
            .with_context(|| format!("failed to write buffer {}", self.buffer_path.display()))
    }

    /// True when the buffer holds statements beyond the preamble.
    pub fn has_meaningful_content(&self) -> Result<bool> {
        let text = self.load_buffer()?;
        Ok(!text.replacen(&preamble(), "", 1).trim().is_empty())
    }

    /// Fetch the shape catalog once; later calls are no-ops.
    pub fn load_shapes(&mut self) -> Result<&ShapeCatalog> {
        if self.state.shapes.is_empty() {
            self.state.shapes = self.service.forms()?;
            info!(shapes = self.state.shapes.len(), "loaded shape catalog");
        }
        Ok(&self.state.shapes)
    }

    /// Look up a lemma and remember its senses for shape selection.
    pub fn lookup(&mut self, verb: &str) -> Result<&[Sense]> {
        let verb = verb.trim().to_lowercase();
        let resp = self.service.lookup(&verb)?;
        if !resp.found {
            self.state.reset();
            return Err(anyhow!("lemma `{verb}` not found"));
        }
        self.state.lemma = verb;
        self.state.senses = resp.senses;
        Ok(&self.state.senses)
    }

    /// Map a field label to its predicate local name through the loaded
    /// shape metadata, falling back to the label itself.
    fn predicate_local_for(&self, shape_id: &str, role_label: &str) -> String {
        self.state
            .shapes
            .get(shape_id)
            .and_then(|shape| shape.fields.iter().find(|f| f.label == role_label))
            .map(|f| f.predicate_local().to_string())
            .unwrap_or_else(|| role_label.to_string())
    }

    /// Assemble and append one entry. Returns the minted subject identifier.
    /// Empty field values are skipped silently.
    pub fn add_entry(
        &mut self,
        shape_id: &str,
        lemma: &str,
        gloss: Option<&str>,
        fields: &[(String, FieldKind, String)],
    ) -> Result<String> {
        let existing = self.load_buffer()?;
        self.state.sync_counter(&existing);

        let draft = EntryDraft {
            shape_id: shape_id.to_string(),
            lemma: lemma.to_string(),
            gloss: gloss.map(str::to_string),
            fields: fields
                .iter()
                .map(|(role, kind, value)| FieldValue {
                    predicate_local: self.predicate_local_for(shape_id, role),
                    kind: *kind,
                    value: value.clone(),
                })
                .collect(),
        };

        let n = self.state.next_entry_number();
        let appended = draft.render(n, &existing);
        self.write_buffer(&format!("{existing}{appended}"))?;
        Ok(format!("temp:s{n}"))
    }

    /// Run remote inference and replace the buffer wholesale with the
    /// rewritten serialization. On any failure the buffer is untouched.
    pub fn run_inference(&mut self) -> Result<InferenceStats> {
        let turtle = normalize_buffer(&self.load_buffer()?);
        let outcome = self.service.infer(&turtle)?;
        self.write_buffer(&outcome.rewritten)?;
        info!(
            inferred = outcome.stats.inferred_count,
            total = outcome.stats.total_count,
            "applied inference rewrite"
        );
        Ok(outcome.stats)
    }

    /// Validate the buffer; never modifies it.
    pub fn run_validation(&self) -> Result<ValidationReport> {
        let turtle = normalize_buffer(&self.load_buffer()?);
        Ok(self.service.validate(&turtle)?)
    }

    /// Persist the buffer to the remote graph store; returns the triple
    /// count. Refuses when the buffer carries nothing beyond the preamble.
    pub fn save_remote(&self) -> Result<u64> {
        if !self.has_meaningful_content()? {
            return Err(anyhow!("buffer holds no statements beyond the preamble"));
        }
        Ok(self.service.save(&self.load_buffer()?)?)
    }

    /// Derived graph model for the external renderer.
    pub fn graph(&self) -> Result<GraphModel> {
        Ok(parse_graph(&self.load_buffer()?))
    }

    /// Reference targets currently discoverable in the buffer.
    pub fn instances(&self) -> Result<Vec<InstanceRef>> {
        Ok(scan(&self.load_buffer()?))
    }
}
