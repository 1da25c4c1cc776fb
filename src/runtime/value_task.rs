use std::fmt;
use std::future::{Future, IntoFuture};

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::task::CancellableTask;

/// Value-optimized cancellation result: keeps the concrete future inline,
/// without boxing.
pub struct CancellableValueTask<F> {
    future: F,
    controller: CancellationToken,
}

impl<F: Future> CancellableValueTask<F> {
    #[must_use]
    pub fn new(future: F, controller: CancellationToken) -> Self {
        Self { future, controller }
    }

    pub fn create<Factory>(factory: Factory) -> Self
    where
        Factory: FnOnce(CancellationToken) -> F,
    {
        let controller = CancellationToken::new();
        let future = factory(controller.child_token());
        Self::new(future, controller)
    }

    pub fn create_with_state<State, Factory>(factory: Factory, state: State) -> Self
    where
        Factory: FnOnce(CancellationToken, State) -> F,
    {
        let controller = CancellationToken::new();
        let future = factory(controller.child_token(), state);
        Self::new(future, controller)
    }

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
    pub fn into_parts(self) -> (F, CancellationToken) {
        (self.future, self.controller)
    }
}

impl<F> CancellableValueTask<F>
where
    F: Future + Send + 'static,
    F::Output: 'static,
{
    /// Box the future into the eager form, keeping the same controller.
    #[must_use]
    pub fn into_task(self) -> CancellableTask<F::Output> {
        CancellableTask::new(self.future, self.controller)
    }
}

impl<F: Future> IntoFuture for CancellableValueTask<F> {
    type Output = F::Output;
    type IntoFuture = F;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

impl<F> From<CancellableValueTask<F>> for CancellableTask<F::Output>
where
    F: Future + Send + 'static,
    F::Output: 'static,
{
    fn from(task: CancellableValueTask<F>) -> Self {
        task.into_task()
    }
}

impl<F> From<CancellableValueTask<F>> for BoxFuture<'static, F::Output>
where
    F: Future + Send + 'static,
{
    fn from(task: CancellableValueTask<F>) -> Self {
        Box::pin(task.future)
    }
}

impl<F> fmt::Debug for CancellableValueTask<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellableValueTask")
            .field("cancellation_requested", &self.controller.is_cancelled())
            .finish_non_exhaustive()
    }
}
