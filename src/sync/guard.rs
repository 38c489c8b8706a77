use std::sync::Mutex;

/// Monotonic request ticket for one logical resource.
///
/// Every fetch takes a ticket before going to the network and commits its
/// response through `commit_if_current`, which runs the commit and the
/// still-newest check under one lock. A response that lost the race is
/// discarded, so overlapping fetches resolve latest-wins and the committed
/// state can never regress to an older request's data.
#[derive(Debug, Default)]
pub struct RequestGuard {
    latest: Mutex<u64>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket, invalidating all earlier ones.
    pub fn issue(&self) -> u64 {
        let mut latest = self.latest.lock().unwrap();
        *latest += 1;
        *latest
    }

    /// Whether this ticket is still the newest issued.
    pub fn is_current(&self, ticket: u64) -> bool {
        *self.latest.lock().unwrap() == ticket
    }

    /// Run `commit` only if the ticket is still the newest issued, holding
    /// the lock across both so a newer request cannot slip in between the
    /// check and the commit. Returns whether the commit ran.
    pub fn commit_if_current(&self, ticket: u64, commit: impl FnOnce()) -> bool {
        let latest = self.latest.lock().unwrap();
        if *latest == ticket {
            commit();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_are_monotonic() {
        let guard = RequestGuard::new();
        let a = guard.issue();
        let b = guard.issue();
        assert!(b > a);
    }

    #[test]
    fn only_the_newest_ticket_is_current() {
        let guard = RequestGuard::new();
        let a = guard.issue();
        assert!(guard.is_current(a));

        let b = guard.issue();
        assert!(!guard.is_current(a));
        assert!(guard.is_current(b));
    }

    #[test]
    fn commit_runs_only_under_the_current_ticket() {
        let guard = RequestGuard::new();
        let a = guard.issue();
        let b = guard.issue();

        let mut committed = Vec::new();
        assert!(!guard.commit_if_current(a, || committed.push("a")));
        assert!(guard.commit_if_current(b, || committed.push("b")));
        assert_eq!(committed, vec!["b"]);
    }
}
