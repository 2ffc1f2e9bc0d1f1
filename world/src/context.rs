use afk_spot_core::{ClearReason, Plane, RegionId, SessionState};

/// Detects context transitions that end the current observation window.
#[derive(Debug, Default)]
pub(crate) struct ContextGuard {
    location: Option<(Plane, RegionId)>,
    session: SessionState,
    raw_filter: String,
}

impl ContextGuard {
    /// Compares the provided location against the remembered baseline.
    ///
    /// The first observed location becomes the baseline without signalling.
    pub(crate) fn observe_location(&mut self, plane: Plane, region: RegionId) -> Option<ClearReason> {
        let previous = self.location.replace((plane, region));
        let (last_plane, last_region) = previous?;

        if last_plane != plane {
            Some(ClearReason::PlaneChanged)
        } else if last_region != region {
            Some(ClearReason::RegionChanged)
        } else {
            None
        }
    }

    /// Records the session state, signalling when a fresh login begins.
    pub(crate) fn observe_session(&mut self, state: SessionState) -> bool {
        let previous = std::mem::replace(&mut self.session, state);
        state == SessionState::LoggedIn && previous != SessionState::LoggedIn
    }

    /// Records the raw filter string, signalling when it differs from the last one.
    pub(crate) fn observe_filter(&mut self, raw: &str) -> bool {
        if self.raw_filter == raw {
            return false;
        }
        raw.clone_into(&mut self.raw_filter);
        true
    }

    pub(crate) fn session(&self) -> SessionState {
        self.session
    }

    pub(crate) fn plane(&self) -> Option<Plane> {
        self.location.map(|(plane, _)| plane)
    }

    /// Forgets the remembered location and filter. The session state is kept
    /// because the host owns it.
    pub(crate) fn reset(&mut self) {
        self.location = None;
        self.raw_filter.clear();
    }
}
