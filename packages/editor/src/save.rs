//! # Save Protocol
//!
//! Strictly user-triggered: `Idle → Saving → outcome → Idle`, no retry,
//! no debounce, no background save. The trigger first freezes the current
//! canvas order into the document, then submits the whole in-memory
//! document under the last-known version token. A stale token comes back
//! as [`SaveOutcome::Conflict`] with the store's message verbatim; the
//! in-memory document is left untouched so nothing is lost and the user
//! may re-read and retry.

use mosaic_store::{DocumentStore, StoreError};
use tracing::{debug, warn};

use crate::errors::EditorError;
use crate::mutations::Mutation;
use crate::session::EditorSession;

/// Whether a save is in flight. The save affordance is disabled while
/// `Saving`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
}

/// Terminal result of one save attempt. Conflict and failure carry the
/// store's message verbatim for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Conflict(String),
    Failed(String),
}

impl EditorSession {
    pub fn is_saving(&self) -> bool {
        self.save_state == SaveState::Saving
    }

    /// Run one save cycle against the store.
    ///
    /// Fails with [`EditorError::NotLoaded`] when no document has been
    /// loaded yet; every store-side failure is an outcome, not an error,
    /// and always returns the session to `Idle`.
    pub async fn save<S: DocumentStore>(
        &mut self,
        store: &S,
        path: &str,
    ) -> Result<SaveOutcome, EditorError> {
        let token = self.token.clone().ok_or(EditorError::NotLoaded)?;

        // Freeze whatever order the canvas currently shows into the
        // document before it leaves the session.
        self.apply(Mutation::SyncOrder {
            order: self.canvas.order(),
        })?;

        self.save_state = SaveState::Saving;
        debug!(%path, %token, "saving document");
        let result = store.write(path, &self.document, &token).await;
        self.save_state = SaveState::Idle;

        match result {
            Ok(new_token) => {
                debug!(%new_token, "document saved");
                self.token = Some(new_token);
                Ok(SaveOutcome::Saved)
            }
            Err(StoreError::Conflict(message)) => {
                warn!(%message, "save rejected: stale version token");
                Ok(SaveOutcome::Conflict(message))
            }
            Err(err) => {
                warn!(error = %err, "save failed");
                Ok(SaveOutcome::Failed(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_document::{Column, SiteDocument};
    use mosaic_store::MemoryStore;

    const PATH: &str = "config.json";

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        let mut doc = SiteDocument::empty();
        doc.layout.main.columns.push(Column::new("col-1", "1fr"));
        store.seed(PATH, &doc).unwrap();
        store
    }

    #[tokio::test]
    async fn save_adopts_the_new_token() {
        let store = seeded_store();
        let mut session = EditorSession::new();
        session.load(&store, PATH).await.unwrap();
        let old_token = session.token().unwrap().clone();

        session.set_global_title("My Site").unwrap();
        let outcome = session.save(&store, PATH).await.unwrap();

        assert_eq!(outcome, SaveOutcome::Saved);
        assert_ne!(session.token(), Some(&old_token));
        assert!(!session.is_saving());

        let (stored, _) = store.read(PATH).await.unwrap();
        assert_eq!(stored.global_settings.page_title, "My Site");
    }

    #[tokio::test]
    async fn stale_token_is_a_conflict_and_loses_nothing() {
        let store = seeded_store();

        let mut first = EditorSession::new();
        first.load(&store, PATH).await.unwrap();
        let mut second = EditorSession::new();
        second.load(&store, PATH).await.unwrap();

        first.set_global_title("first wins").unwrap();
        assert_eq!(first.save(&store, PATH).await.unwrap(), SaveOutcome::Saved);

        second.set_global_title("second loses").unwrap();
        let before = second.document().clone();
        let outcome = second.save(&store, PATH).await.unwrap();

        assert!(matches!(outcome, SaveOutcome::Conflict(_)));
        // The losing session's edits are intact and it is ready to retry.
        assert_eq!(second.document(), &before);
        assert!(!second.is_saving());

        // The store still holds the winning write.
        let (stored, _) = store.read(PATH).await.unwrap();
        assert_eq!(stored.global_settings.page_title, "first wins");
    }

    #[tokio::test]
    async fn save_without_a_loaded_document_fails() {
        let store = seeded_store();
        let mut session = EditorSession::new();
        let err = session.save(&store, PATH).await.unwrap_err();
        assert!(matches!(err, EditorError::NotLoaded));
    }

    #[tokio::test]
    async fn save_freezes_canvas_order_first() {
        let store = MemoryStore::new();
        let mut doc = SiteDocument::empty();
        doc.layout.main.columns.push(Column::new("col-a", "1fr"));
        doc.layout.main.columns.push(Column::new("col-b", "2fr"));
        store.seed(PATH, &doc).unwrap();

        let mut session = EditorSession::new();
        session.load(&store, PATH).await.unwrap();
        let id = session
            .add_element(mosaic_document::ElementKind::TextBlock)
            .unwrap();

        // Simulate a drop into the second column, then save.
        let mut order = session.canvas().order();
        order[0].elements.clear();
        order[1].elements.push(id.clone());
        session.reorder(order).unwrap();
        session.save(&store, PATH).await.unwrap();

        let (stored, _) = store.read(PATH).await.unwrap();
        assert!(stored.layout.main.columns[0].elements.is_empty());
        assert_eq!(stored.layout.main.columns[1].elements, vec![id]);
    }
}
