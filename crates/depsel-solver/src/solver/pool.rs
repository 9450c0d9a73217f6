//! Pool of reusable solver sessions.
//!
//! One `solve` call rents exactly one session for its whole duration.
//! Sessions come back through an RAII lease, so release happens on every
//! exit path; a lease marked failed makes the pool discard the worker and
//! build a replacement instead of reusing it.

use std::fmt;
use std::sync::Mutex;

use log::debug;

use super::fd::FdSession;
use super::session::SolverSession;
use crate::error::SolveError;

const DEFAULT_WORKERS: usize = 2;

/// How a session is handed back to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Ordinary termination: the session goes back into rotation.
    Ok,
    /// The worker misbehaved (timeout); replace it with a fresh one.
    Fail,
}

type BoxedSession = Box<dyn SolverSession>;
type SessionFactory = dyn Fn() -> BoxedSession + Send + Sync;

pub struct WorkerPool {
    idle: Mutex<Vec<BoxedSession>>,
    factory: Box<SessionFactory>,
}

impl WorkerPool {
    /// A pool of `workers` built-in [`FdSession`]s.
    pub fn new(workers: usize) -> Self {
        WorkerPool::with_factory(workers, || Box::new(FdSession::new()))
    }

    /// A pool whose sessions come from `factory`, the hook for plugging in
    /// an external solver engine.
    pub fn with_factory(
        workers: usize,
        factory: impl Fn() -> BoxedSession + Send + Sync + 'static,
    ) -> Self {
        let idle = (0..workers).map(|_| factory()).collect();
        WorkerPool {
            idle: Mutex::new(idle),
            factory: Box::new(factory),
        }
    }

    /// Rent a session. Fails with [`SolveError::NoWorkers`] when every
    /// worker is out on loan.
    pub fn take(&self) -> Result<SessionLease<'_>, SolveError> {
        let mut idle = self.lock();
        match idle.pop() {
            Some(session) => Ok(SessionLease {
                pool: self,
                session: Some(session),
                disposition: Disposition::Ok,
            }),
            None => Err(SolveError::NoWorkers),
        }
    }

    /// Number of sessions currently available.
    pub fn idle_count(&self) -> usize {
        self.lock().len()
    }

    fn put_back(&self, session: BoxedSession, disposition: Disposition) {
        let mut idle = self.lock();
        match disposition {
            Disposition::Ok => idle.push(session),
            Disposition::Fail => {
                debug!("recycling failed solver worker");
                drop(session);
                idle.push((self.factory)());
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<BoxedSession>> {
        // A panic while holding the lock cannot leave the session list in a
        // bad state, so a poisoned lock is still usable.
        self.idle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        WorkerPool::new(DEFAULT_WORKERS)
    }
}

/// RAII lease over a pooled session; returns the session on drop.
pub struct SessionLease<'a> {
    pool: &'a WorkerPool,
    session: Option<BoxedSession>,
    disposition: Disposition,
}

impl SessionLease<'_> {
    pub fn session(&mut self) -> &mut dyn SolverSession {
        self.session.as_mut().unwrap().as_mut()
    }

    /// Return the session in the failing disposition when the lease ends.
    pub fn mark_failed(&mut self) {
        self.disposition = Disposition::Fail;
    }
}

impl Drop for SessionLease<'_> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            self.pool.put_back(session, self.disposition);
        }
    }
}

impl fmt::Debug for SessionLease<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionLease")
            .field("disposition", &self.disposition)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_and_return() {
        let pool = WorkerPool::new(1);
        assert_eq!(pool.idle_count(), 1);
        {
            let _lease = pool.take().unwrap();
            assert_eq!(pool.idle_count(), 0);
        }
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_exhausted_pool_errors() {
        let pool = WorkerPool::new(1);
        let _held = pool.take().unwrap();
        assert_eq!(pool.take().unwrap_err(), SolveError::NoWorkers);
    }

    #[test]
    fn test_failed_lease_recycles_worker() {
        let pool = WorkerPool::new(1);
        {
            let mut lease = pool.take().unwrap();
            lease.mark_failed();
        }
        // Capacity is preserved by replacing the failed worker.
        assert_eq!(pool.idle_count(), 1);
        assert!(pool.take().is_ok());
    }

    #[test]
    fn test_zero_worker_pool() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.take().unwrap_err(), SolveError::NoWorkers);
    }
}
