use tracing::debug;

use super::Compositor;
use crate::error::{CompositorError, TypingDirection};
use crate::lm::LanguageModel;

impl<M: LanguageModel> Compositor<M> {
    /// Move the cursor, clamped to `0..=len()`. The marker follows.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.grid.cursor = cursor.min(self.grid.keys.len());
        self.grid.marker = self.grid.cursor;
    }

    /// Move only the marker, clamped to `0..=len()`.
    pub fn set_marker(&mut self, marker: usize) {
        self.grid.marker = marker.min(self.grid.keys.len());
    }

    /// Move the cursor (or the marker) to the next segment boundary of the
    /// walked path in `direction`. Walks first if the cached path is stale.
    pub fn jump_cursor_by_span(
        &mut self,
        direction: TypingDirection,
        is_marker: bool,
    ) -> Result<(), CompositorError> {
        let key_count = self.grid.keys.len();
        let target = if is_marker {
            self.grid.marker
        } else {
            self.grid.cursor
        };
        let at_edge = match direction {
            TypingDirection::Front => target >= key_count,
            TypingDirection::Rear => target == 0,
        };
        if at_edge {
            return Err(CompositorError::CursorAtEdge(direction));
        }

        let path = self.walk();
        if path.is_empty() || path.total_key_count() != key_count {
            return Err(CompositorError::NotWalked);
        }
        let boundaries = path.region_cursor_map();
        let next = match direction {
            TypingDirection::Front => boundaries.iter().copied().find(|&b| b > target),
            TypingDirection::Rear => boundaries.iter().copied().rev().find(|&b| b < target),
        };
        let Some(next) = next else {
            return Err(CompositorError::CursorAtEdge(direction));
        };

        debug!(%direction, is_marker, from = target, to = next, "jump_cursor_by_span");
        if is_marker {
            self.grid.marker = next;
        } else {
            self.set_cursor(next);
        }
        Ok(())
    }
}
