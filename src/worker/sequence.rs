//! Request tagging for "last request wins" screens.
//!
//! Two loads in flight at once may complete in either order. A screen that
//! must not show results of a superseded search tags each submission and
//! drops completions whose tag is no longer the latest.

/// Monotonic tag attached to one submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTag(u64);

impl RequestTag {
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Issues increasing [`RequestTag`]s for one screen.
///
/// # Example
///
/// ```
/// use shelfdesk::worker::RequestSequencer;
///
/// let mut sequencer = RequestSequencer::default();
/// let first = sequencer.issue();
/// let second = sequencer.issue();
/// assert!(!sequencer.is_latest(first));
/// assert!(sequencer.is_latest(second));
/// ```
#[derive(Debug, Default, Clone)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    /// Issues a new tag, superseding every tag issued before it.
    pub fn issue(&mut self) -> RequestTag {
        self.latest += 1;
        RequestTag(self.latest)
    }

    /// Whether `tag` is the most recently issued tag.
    pub const fn is_latest(&self, tag: RequestTag) -> bool {
        tag.0 == self.latest
    }

    /// The most recently issued tag, if any.
    pub const fn latest(&self) -> Option<RequestTag> {
        if self.latest == 0 {
            None
        } else {
            Some(RequestTag(self.latest))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_increase_and_supersede() {
        let mut sequencer = RequestSequencer::default();
        assert_eq!(sequencer.latest(), None);

        let a = sequencer.issue();
        let b = sequencer.issue();
        assert!(b > a);
        assert!(!sequencer.is_latest(a));
        assert!(sequencer.is_latest(b));
        assert_eq!(sequencer.latest(), Some(b));
    }
}
