use std::future::Future;

use futures::{
    channel::oneshot,
    future::{self, Either, Shared},
    FutureExt,
};

/// Ties requests to the lifetime of the view that started them
///
/// Dropping the scope cancels every request still running, so their
/// completions never reach a view that is gone. All requests listen to the
/// same signal, so finished ones leave nothing behind.
#[derive(Debug)]
pub struct RequestScope {
    // never sent on: dropping it resolves `cancelled`
    _cancel: oneshot::Sender<()>,
    cancelled: Shared<oneshot::Receiver<()>>,
}

impl RequestScope {
    pub fn new() -> RequestScope {
        let (cancel, cancelled) = oneshot::channel();
        RequestScope {
            _cancel: cancel,
            cancelled: cancelled.shared(),
        }
    }

    /// Resolves to `None` if the scope was cancelled first
    pub fn wrap<F: Future>(&mut self, fut: F) -> impl Future<Output = Option<F::Output>> {
        let cancelled = self.cancelled.clone();
        async move {
            futures::pin_mut!(fut);
            match future::select(cancelled, fut).await {
                Either::Left(_) => None,
                Either::Right((out, _)) => Some(out),
            }
        }
    }

    /// Cancels everything started so far; the scope stays usable
    pub fn cancel_all(&mut self) {
        *self = RequestScope::new();
    }
}

impl Default for RequestScope {
    fn default() -> RequestScope {
        RequestScope::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn completes_while_alive() {
        let mut scope = RequestScope::new();
        let res = block_on(scope.wrap(async { 42 }));
        assert_eq!(res, Some(42));
    }

    #[test]
    fn dropped_scope_aborts() {
        let (tx, rx) = oneshot::channel::<u32>();
        let mut scope = RequestScope::new();
        let pending = scope.wrap(rx);
        drop(scope);
        tx.send(1).unwrap();
        assert_eq!(block_on(pending), None);
    }

    #[test]
    fn cancel_all_spares_later_requests() {
        let (tx, rx) = oneshot::channel::<u32>();
        let mut scope = RequestScope::new();
        let old = scope.wrap(rx);
        scope.cancel_all();
        let new = scope.wrap(async { 7 });
        tx.send(1).unwrap();
        assert_eq!(block_on(old), None);
        assert_eq!(block_on(new), Some(7));
    }

    #[test]
    fn finished_requests_are_forgotten() {
        let mut scope = RequestScope::new();
        for i in 0..100 {
            assert_eq!(block_on(scope.wrap(async move { i })), Some(i));
        }
        assert_eq!(scope.cancelled.strong_count(), Some(1));
    }
}
