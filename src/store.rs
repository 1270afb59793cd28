use crate::{Record, UserValue};
use std::sync::Arc;
use thiserror::Error;

/// Shared, immutable view of the collection handed to observers.
pub type Snapshot = Arc<Vec<Record>>;

type Observer = Box<dyn FnMut(&Snapshot)>;

/// Handle returned by [`RecordStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("user {editing} is already being edited")]
    AlreadyEditing { editing: String },
    #[error("user {0} not found")]
    NotFound(String),
    #[error("no user at row {0}")]
    NoSuchRow(usize),
    #[error("user at row {0} has no id")]
    MissingId(usize),
    #[error("no edit in progress")]
    NoActiveSession,
}

/// The single in-progress edit. Field writes land in `working`; the store's
/// collection is untouched until the session is saved.
///
/// The session remembers the row it was started on and that row's typed identifier,
/// so records whose ids only look alike (`"1"` and `1`) are never confused.
#[derive(Debug, Clone)]
pub struct EditSession {
    id: String,
    key: UserValue,
    row: usize,
    working: Record,
    snapshot: Record,
}

impl EditSession {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn working(&self) -> &Record {
        &self.working
    }

    /// Restore every snapshot field onto the working copy.
    /// Fields added during the session stay.
    fn revert(&mut self) {
        for (field, value) in self.snapshot.fields() {
            self.working.insert(field.clone(), value.clone());
        }
    }

    fn holds(&self, record: &Record) -> bool {
        record.id().is_some_and(|id| id.same_identifier(&self.key))
    }
}

/// Owner of the current user collection. Every change is pushed synchronously to all
/// subscribers, in registration order, before the mutating call returns.
pub struct RecordStore {
    records: Snapshot,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    edit: Option<EditSession>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.records.len())
            .field("observers", &self.observers.len())
            .field("edit", &self.edit)
            .finish()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Vec::new()),
            observers: Vec::new(),
            next_subscription: 0,
            edit: None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn replace_all(&mut self, records: Vec<Record>) {
        tracing::debug!(count = records.len(), "replacing user collection");
        self.records = Arc::new(records);
        self.notify();
    }

    /// Register `observer`. It receives the current collection immediately.
    pub fn subscribe(&mut self, mut observer: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        observer(&self.records);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self) {
        let records = &self.records;
        for (_, observer) in self.observers.iter_mut() {
            observer(records);
        }
    }

    /// First record whose identifier, in string form, equals `id`.
    pub fn lookup_by_id(&self, id: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|record| record.id_key().as_deref() == Some(id))
    }

    /// Overlay `patch` onto the record with the same identifier and publish the result.
    /// A patch without an identifier, or with an unknown one, is ignored.
    pub fn merge_update(&mut self, patch: &Record) {
        let Some(patch_id) = patch.id() else {
            tracing::debug!("ignoring update without an id");
            return;
        };
        let Some(index) = self
            .records
            .iter()
            .position(|record| record.id().is_some_and(|id| id.same_identifier(patch_id)))
        else {
            tracing::debug!(id = %patch_id.to_plain_string(), "ignoring update for unknown user");
            return;
        };

        let mut records = self.records.as_ref().clone();
        records[index] = records[index].merged(patch);
        self.replace_all(records);
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.edit.as_ref().map(EditSession::id)
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Current row of the record being edited: the row the session started on if it still
    /// holds the same identifier, otherwise the first row that does. `None` once a
    /// replacement collection no longer contains the record.
    pub fn editing_row(&self) -> Option<usize> {
        let session = self.edit.as_ref()?;
        match self.records.get(session.row) {
            Some(record) if session.holds(record) => Some(session.row),
            _ => self.records.iter().position(|record| session.holds(record)),
        }
    }

    fn ensure_idle(&self) -> Result<(), EditError> {
        match &self.edit {
            Some(active) => Err(EditError::AlreadyEditing {
                editing: active.id.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Start editing the first record whose identifier, in string form, equals `id`.
    pub fn start_edit(&mut self, id: &str) -> Result<&EditSession, EditError> {
        self.ensure_idle()?;
        let row = self
            .records
            .iter()
            .position(|record| record.id_key().as_deref() == Some(id))
            .ok_or_else(|| EditError::NotFound(id.to_string()))?;
        self.start_edit_at(row)
    }

    /// Start editing the record at `row` of the current collection.
    pub fn start_edit_at(&mut self, row: usize) -> Result<&EditSession, EditError> {
        self.ensure_idle()?;
        let record = self.records.get(row).ok_or(EditError::NoSuchRow(row))?;
        let (Some(key), Some(id)) = (record.id(), record.id_key()) else {
            return Err(EditError::MissingId(row));
        };
        let session = EditSession {
            id,
            key: key.clone(),
            row,
            working: record.clone(),
            snapshot: record.clone(),
        };
        tracing::debug!(id = %session.id, row, "edit started");
        Ok(&*self.edit.insert(session))
    }

    pub fn update_field(
        &mut self,
        field: &str,
        value: impl Into<UserValue>,
    ) -> Result<(), EditError> {
        let session = self.edit.as_mut().ok_or(EditError::NoActiveSession)?;
        session.working.insert(field, value);
        Ok(())
    }

    /// Undo field writes without leaving edit mode.
    pub fn revert_edit(&mut self) -> Result<(), EditError> {
        let session = self.edit.as_mut().ok_or(EditError::NoActiveSession)?;
        session.revert();
        Ok(())
    }

    /// Overlay the working copy onto the edited record and end the session.
    /// Nothing is written if the record has left the collection.
    pub fn save_edit(&mut self) -> Result<Record, EditError> {
        let row = self.editing_row();
        let session = self.edit.take().ok_or(EditError::NoActiveSession)?;
        match row {
            Some(row) => {
                tracing::debug!(id = %session.id, row, "edit saved");
                let mut records = self.records.as_ref().clone();
                records[row] = records[row].merged(&session.working);
                self.replace_all(records);
            }
            None => tracing::debug!(id = %session.id, "edited user is gone; nothing saved"),
        }
        Ok(session.working)
    }

    /// End the session without touching the collection. Returns the reverted working copy.
    pub fn cancel_edit(&mut self) -> Result<Record, EditError> {
        let mut session = self.edit.take().ok_or(EditError::NoActiveSession)?;
        session.revert();
        tracing::debug!(id = %session.id, "edit cancelled");
        Ok(session.working)
    }
}
