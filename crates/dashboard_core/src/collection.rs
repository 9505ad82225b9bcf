use std::collections::BTreeSet;

/// Snapshot of one remote collection as the views see it.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
        }
    }
}

/// Issued by [`CollectionModel::begin_refresh`]; hand it back with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The result belonged to the latest dispatched refresh and was applied.
    Applied,
    /// A newer refresh was dispatched after this one; the result was dropped.
    Superseded,
}

/// Sequenced full-snapshot model behind a collection controller.
///
/// Every refresh takes a ticket. A result is applied only if no newer
/// ticket has settled and none is still pending, so a slow response can
/// never overwrite a fresher one. A ticket whose request was abandoned
/// leaves the pending set without touching the items.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionModel<T> {
    state: CollectionState<T>,
    next: u64,
    settled: u64,
    pending: BTreeSet<u64>,
}

impl<T> Default for CollectionModel<T> {
    fn default() -> Self {
        Self {
            state: CollectionState::default(),
            next: 0,
            settled: 0,
            pending: BTreeSet::new(),
        }
    }
}

impl<T: Clone> CollectionModel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.next += 1;
        self.pending.insert(self.next);
        self.update_loading();
        RefreshTicket(self.next)
    }

    /// Replaces the items wholesale with a fresh snapshot.
    pub fn complete(&mut self, ticket: RefreshTicket, items: Vec<T>) -> RefreshOutcome {
        let outcome = self.settle(ticket);
        if outcome == RefreshOutcome::Applied {
            self.state.items = items;
        }
        outcome
    }

    /// Clears the loading flag but keeps the last good items.
    pub fn fail(&mut self, ticket: RefreshTicket) -> RefreshOutcome {
        self.settle(ticket)
    }

    /// Forgets a ticket whose request will never answer. An older request
    /// still pending may then apply its result.
    pub fn abandon(&mut self, ticket: RefreshTicket) {
        if self.pending.remove(&ticket.0) {
            self.update_loading();
        }
    }

    pub fn snapshot(&self) -> CollectionState<T> {
        self.state.clone()
    }

    pub fn items(&self) -> &[T] {
        &self.state.items
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    fn settle(&mut self, ticket: RefreshTicket) -> RefreshOutcome {
        let was_pending = self.pending.remove(&ticket.0);
        let newer_pending = self.pending.last().is_some_and(|&newest| newest > ticket.0);
        let outcome = if was_pending && ticket.0 > self.settled && !newer_pending {
            self.settled = ticket.0;
            RefreshOutcome::Applied
        } else {
            RefreshOutcome::Superseded
        };
        self.update_loading();
        outcome
    }

    // Loading while some request newer than the last settled one is out.
    fn update_loading(&mut self) {
        self.state.is_loading = self
            .pending
            .last()
            .is_some_and(|&newest| newest > self.settled);
    }
}
