use slotmap::SlotMap;

use super::TriangulationSession;
use crate::error::{InputError, Result};
use crate::solver::{Solver, SpadeSolver};

slotmap::new_key_type! {
    /// Unique identifier for a session in a [`SessionStore`].
    pub struct SessionId;
}

/// Arena of independent triangulation sessions.
///
/// Callers hold a [`SessionId`] instead of a reference, so a removed session
/// can never be reached through a stale handle.
#[derive(Debug)]
pub struct SessionStore<S: Solver = SpadeSolver> {
    sessions: SlotMap<SessionId, TriangulationSession<S>>,
}

impl<S: Solver> Default for SessionStore<S> {
    fn default() -> Self {
        Self {
            sessions: SlotMap::with_key(),
        }
    }
}

impl<S: Solver> SessionStore<S> {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a session and returns its ID.
    pub fn add_session(&mut self, session: TriangulationSession<S>) -> SessionId {
        self.sessions.insert(session)
    }

    /// Returns a reference to the session.
    ///
    /// # Errors
    ///
    /// Returns `InputError::SessionNotFound` if `id` is stale or unknown.
    pub fn session(&self, id: SessionId) -> Result<&TriangulationSession<S>> {
        self.sessions
            .get(id)
            .ok_or_else(|| InputError::SessionNotFound.into())
    }

    /// Returns a mutable reference to the session.
    ///
    /// # Errors
    ///
    /// Returns `InputError::SessionNotFound` if `id` is stale or unknown.
    pub fn session_mut(&mut self, id: SessionId) -> Result<&mut TriangulationSession<S>> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| InputError::SessionNotFound.into())
    }

    /// Removes the session, releasing its buffers.
    pub fn remove_session(&mut self, id: SessionId) -> Option<TriangulationSession<S>> {
        self.sessions.remove(id)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if the store holds no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Iterates over all live sessions.
    pub fn iter(&self) -> impl Iterator<Item = (SessionId, &TriangulationSession<S>)> {
        self.sessions.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TrigonError;
    use crate::geometry::Polygon;
    use crate::math::Point2;
    use crate::session::SessionState;

    #[test]
    fn sessions_are_independent() {
        let mut store = SessionStore::new();
        let a = store.add_session(TriangulationSession::new());
        let b = store.add_session(TriangulationSession::new());
        assert_eq!(store.len(), 2);

        let square = Polygon::from_closed_polyline(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]);
        store.session_mut(a).unwrap().triangulate_simple(&square).unwrap();

        assert_eq!(store.session(a).unwrap().state(), SessionState::Triangulated);
        assert_eq!(store.session(b).unwrap().state(), SessionState::Empty);
    }

    #[test]
    fn removed_session_is_unreachable() {
        let mut store: SessionStore = SessionStore::new();
        let id = store.add_session(TriangulationSession::new());
        assert!(store.remove_session(id).is_some());
        assert!(store.is_empty());

        let err = store.session(id).unwrap_err();
        assert!(matches!(err, TrigonError::Input(InputError::SessionNotFound)));
        assert!(store.session_mut(id).is_err());
        assert!(store.remove_session(id).is_none());
    }
}
