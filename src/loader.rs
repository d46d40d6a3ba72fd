//! Loading state for one remote query.
//!
//! A `Loader` tracks the current parameter, the last good payload, a loading
//! flag and an error message. Every dispatched request carries a [`Ticket`];
//! only the completion holding the current ticket is applied, so a slow
//! response for a superseded parameter can never overwrite fresher state.

use crate::api::FetchError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug)]
pub struct Loader<P, T> {
    param: Option<P>,
    data: T,
    state: LoadState,
    error: Option<String>,
    ticket: Ticket,
}

impl<P: Clone + PartialEq, T: Default> Default for Loader<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone + PartialEq, T: Default> Loader<P, T> {
    pub fn new() -> Self {
        Self {
            param: None,
            data: T::default(),
            state: LoadState::Idle,
            error: None,
            ticket: Ticket(0),
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }
    pub fn param(&self) -> Option<&P> {
        self.param.as_ref()
    }
    pub fn state(&self) -> LoadState {
        self.state
    }
    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a load for `param` unless it equals the current parameter.
    /// Returns the ticket the caller must attach to the request.
    pub fn request(&mut self, param: P) -> Option<Ticket> {
        if self.param.as_ref() == Some(&param) && self.state != LoadState::Idle {
            return None;
        }
        self.param = Some(param);
        Some(self.begin())
    }

    /// Re-run the current parameter's load from whatever state we are in.
    /// Returns `None` when nothing was ever requested.
    pub fn refetch(&mut self) -> Option<Ticket> {
        self.param.as_ref()?;
        Some(self.begin())
    }

    fn begin(&mut self) -> Ticket {
        self.ticket = Ticket(self.ticket.0 + 1);
        self.state = LoadState::Loading;
        self.error = None;
        self.ticket
    }

    /// Apply a completion. Returns `false` (and changes nothing) when the
    /// ticket has been superseded or cancelled.
    pub fn complete(&mut self, ticket: Ticket, result: Result<T, FetchError>) -> bool {
        if ticket != self.ticket || self.state != LoadState::Loading {
            log::debug!("[loader] dropping stale completion {ticket:?} (current {:?})", self.ticket);
            return false;
        }
        match result {
            Ok(data) => {
                self.data = data;
                self.error = None;
                self.state = LoadState::Success;
            }
            Err(e) => {
                // previous payload stays visible
                self.error = Some(e.to_string());
                self.state = LoadState::Error;
            }
        }
        true
    }

    /// Empty parameter: clear the payload without issuing a request.
    pub fn reset(&mut self) {
        self.ticket = Ticket(self.ticket.0 + 1);
        self.param = None;
        self.data = T::default();
        self.error = None;
        self.state = LoadState::Idle;
    }

    /// Invalidate any in-flight request; its completion will be ignored.
    pub fn cancel(&mut self) {
        self.ticket = Ticket(self.ticket.0 + 1);
        if self.state == LoadState::Loading {
            self.state = if self.error.is_some() {
                LoadState::Error
            } else {
                LoadState::Idle
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16) -> FetchError {
        FetchError::Status {
            what: "creatures".into(),
            status,
            url: "http://test/pokemon".into(),
        }
    }

    #[test]
    fn request_only_on_parameter_change() {
        let mut l: Loader<u32, Vec<u32>> = Loader::new();
        assert_eq!(l.state(), LoadState::Idle);
        let t = l.request(400).unwrap();
        assert!(l.is_loading());
        assert!(l.request(400).is_none());
        assert!(l.complete(t, Ok(vec![1, 2])));
        assert!(l.request(400).is_none());
        assert!(l.request(100).is_some());
    }

    #[test]
    fn previous_data_kept_while_loading_and_on_error() {
        let mut l: Loader<u32, Vec<u32>> = Loader::new();
        let t = l.request(1).unwrap();
        l.complete(t, Ok(vec![7]));

        let t = l.refetch().unwrap();
        assert!(l.is_loading());
        assert_eq!(l.data(), &vec![7]);

        l.complete(t, Err(status_error(500)));
        assert_eq!(l.state(), LoadState::Error);
        assert_eq!(l.data(), &vec![7]);
        assert!(l.error().unwrap().contains("500"));
    }

    #[test]
    fn success_clears_error() {
        let mut l: Loader<(), Vec<u32>> = Loader::new();
        let t = l.request(()).unwrap();
        l.complete(t, Err(status_error(503)));
        let t = l.refetch().unwrap();
        assert!(l.error().is_none());
        l.complete(t, Ok(vec![1]));
        assert_eq!(l.state(), LoadState::Success);
        assert!(l.error().is_none());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut l: Loader<String, Vec<u32>> = Loader::new();
        let slow = l.request("Feu".into()).unwrap();
        let fast = l.request("Eau".into()).unwrap();
        assert!(l.complete(fast, Ok(vec![2])));
        assert!(!l.complete(slow, Ok(vec![1])));
        assert_eq!(l.data(), &vec![2]);
        assert_eq!(l.param().map(String::as_str), Some("Eau"));
    }

    #[test]
    fn cancel_blocks_late_updates() {
        let mut l: Loader<u32, Vec<u32>> = Loader::new();
        let t = l.request(3).unwrap();
        l.cancel();
        assert!(!l.complete(t, Ok(vec![9])));
        assert!(l.data().is_empty());
        assert!(!l.is_loading());
    }

    #[test]
    fn reset_clears_payload_without_request() {
        let mut l: Loader<u32, Vec<u32>> = Loader::new();
        let t = l.request(1).unwrap();
        l.complete(t, Ok(vec![1, 2, 3]));
        l.reset();
        assert!(l.data().is_empty());
        assert_eq!(l.state(), LoadState::Idle);
        assert!(l.refetch().is_none());
        // same parameter again starts a fresh load after a reset
        assert!(l.request(1).is_some());
    }
}
