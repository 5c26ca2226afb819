use std::collections::HashMap;

use crate::core::types::WorkflowId;

/// SISTR workflow releases known to IRIDA: (canonical version, aliases, workflow id)
const SISTR_WORKFLOWS: &[(&str, &[&str], &str)] = &[
    ("0.1", &["0.1.0"], "e559af58-a560-4bbd-997e-808bfbe026e2"),
    ("0.2", &["0.2.0"], "e8f9cc61-3264-48c6-81d9-02d9e84bccc7"),
    ("0.3", &["0.3.0"], "92ecf046-ee09-4271-b849-7a82625d6b60"),
];

/// One workflow release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowEntry {
    /// Canonical version string (e.g. "0.3")
    pub version: String,
    /// Other spellings accepted for the version (e.g. "0.3.0")
    pub aliases: Vec<String>,
    pub id: WorkflowId,
}

/// Version ↔ id table for one analysis type
#[derive(Debug, Clone, Default)]
pub struct WorkflowTable {
    entries: Vec<WorkflowEntry>,

    /// Index: version or alias -> entry
    version_to_index: HashMap<String, usize>,

    /// Index: workflow id -> entry
    id_to_index: HashMap<WorkflowId, usize>,
}

impl WorkflowTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The SISTR releases shipped with IRIDA
    pub fn sistr() -> Self {
        let mut table = Self::new();
        for (version, aliases, id) in SISTR_WORKFLOWS {
            table.add(WorkflowEntry {
                version: (*version).to_string(),
                aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
                id: WorkflowId::new(*id),
            });
        }
        table
    }

    /// Add a release; a later entry replaces earlier lookups for the same keys
    pub fn add(&mut self, entry: WorkflowEntry) {
        let index = self.entries.len();

        self.version_to_index.insert(entry.version.clone(), index);
        for alias in &entry.aliases {
            self.version_to_index.insert(alias.clone(), index);
        }
        self.id_to_index.insert(entry.id.clone(), index);

        self.entries.push(entry);
    }

    #[must_use]
    pub fn with_entry(mut self, version: impl Into<String>, id: impl Into<String>) -> Self {
        self.add(WorkflowEntry {
            version: version.into(),
            aliases: Vec::new(),
            id: WorkflowId::new(id),
        });
        self
    }

    pub fn id_for_version(&self, version: &str) -> Option<&WorkflowId> {
        self.version_to_index
            .get(version)
            .map(|&idx| &self.entries[idx].id)
    }

    /// Canonical version for a workflow id
    pub fn version_of(&self, id: &WorkflowId) -> Option<&str> {
        self.id_to_index
            .get(id)
            .map(|&idx| self.entries[idx].version.as_str())
    }

    pub fn contains_id(&self, id: &WorkflowId) -> bool {
        self.id_to_index.contains_key(id)
    }

    pub fn entries(&self) -> &[WorkflowEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
