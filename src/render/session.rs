use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    foundation::error::MemeResult,
    render::{
        compositor::{Compositor, MemeComposite},
        raster::RenderedRaster,
    },
};

/// Sequence number issued to one render request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTicket(u64);

impl RenderTicket {
    /// Raw sequence number.
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// One editing session's "current raster" slot.
///
/// Renders are not cancelled; a result is simply dropped when a newer ticket has been issued by
/// the time it completes, so the slot only ever holds the latest request's output.
#[derive(Debug, Default)]
pub struct RenderSession {
    issued: AtomicU64,
    current: Mutex<Option<(RenderTicket, Arc<RenderedRaster>)>>,
}

impl RenderSession {
    /// Empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket. Tickets are strictly increasing.
    pub fn begin(&self) -> RenderTicket {
        RenderTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is the most recently issued one.
    pub fn is_latest(&self, ticket: RenderTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Publish `raster` if `ticket` is still the latest. Returns whether it was published.
    pub fn commit(&self, ticket: RenderTicket, raster: Arc<RenderedRaster>) -> bool {
        let mut slot = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if !self.is_latest(ticket) {
            tracing::debug!(seq = ticket.0, "stale render discarded");
            return false;
        }
        *slot = Some((ticket, raster));
        true
    }

    /// Render `composite` under a fresh ticket.
    ///
    /// Returns `Ok(None)` when a newer render was started before this one finished.
    pub async fn render(
        &self,
        compositor: &Compositor,
        composite: &MemeComposite,
    ) -> MemeResult<Option<Arc<RenderedRaster>>> {
        let ticket = self.begin();
        let raster = Arc::new(compositor.render(composite).await?);
        Ok(self.commit(ticket, Arc::clone(&raster)).then_some(raster))
    }

    /// The active raster, if any render has been published.
    pub fn current(&self) -> Option<Arc<RenderedRaster>> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|(_, r)| Arc::clone(r))
    }

    /// Ticket of the active raster.
    pub fn current_ticket(&self) -> Option<RenderTicket> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|(t, _)| *t)
    }

    /// Drop the active raster, ending the session's display.
    pub fn clear(&self) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/session.rs"]
mod tests;
