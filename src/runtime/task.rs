use std::fmt;
use std::future::{Future, IntoFuture};

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

/// Eager cancellation result: a type-erased future bundled with the
/// controller whose child token the future observes.
pub struct CancellableTask<T = ()> {
    future: BoxFuture<'static, T>,
    controller: CancellationToken,
}

impl<T: 'static> CancellableTask<T> {
    #[must_use]
    pub fn new<F>(future: F, controller: CancellationToken) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            future: Box::pin(future),
            controller,
        }
    }

    /// Create a fresh controller and start `factory` with its signal.
    pub fn create<Factory, F>(factory: Factory) -> Self
    where
        Factory: FnOnce(CancellationToken) -> F,
        F: Future<Output = T> + Send + 'static,
    {
        let controller = CancellationToken::new();
        let future = factory(controller.child_token());
        Self::new(future, controller)
    }

    /// Like [`CancellableTask::create`], passing `state` through to the
    /// factory so it needs no capturing closure.
    pub fn create_with_state<State, Factory, F>(factory: Factory, state: State) -> Self
    where
        Factory: FnOnce(CancellationToken, State) -> F,
        F: Future<Output = T> + Send + 'static,
    {
        let controller = CancellationToken::new();
        let future = factory(controller.child_token(), state);
        Self::new(future, controller)
    }
}

impl<T> CancellableTask<T> {
    /// The controller owning this result's cancellation signal.
    #[must_use]
    pub fn controller(&self) -> &CancellationToken {
        &self.controller
    }

    /// Request cancellation. Idempotent and safe to call from any thread.
    pub fn cancel(&self) {
        self.controller.cancel();
    }

    #[must_use]
    pub fn is_cancellation_requested(&self) -> bool {
        self.controller.is_cancelled()
    }

    #[must_use]
    pub fn into_parts(self) -> (BoxFuture<'static, T>, CancellationToken) {
        (self.future, self.controller)
    }
}

impl<T> IntoFuture for CancellableTask<T> {
    type Output = T;
    type IntoFuture = BoxFuture<'static, T>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

impl<T> From<CancellableTask<T>> for BoxFuture<'static, T> {
    fn from(task: CancellableTask<T>) -> Self {
        task.future
    }
}

impl<T> fmt::Debug for CancellableTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellableTask")
            .field("cancellation_requested", &self.controller.is_cancelled())
            .finish_non_exhaustive()
    }
}
