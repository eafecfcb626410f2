//! Per-service bounded-parallelism gate around verifier execution.

use crate::VerifyError;
use eligo_types::ServiceType;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Named counting permit pools, one per service type.
///
/// Capacities are supplied explicitly at startup; there is no
/// construct-if-missing fallback, so an unconfigured service fails loudly
/// instead of silently minting a default pool.
pub struct ServiceLimiter {
    pools: HashMap<ServiceType, Arc<Semaphore>>,
}

impl ServiceLimiter {
    pub fn new<I>(capacities: I) -> Self
    where
        I: IntoIterator<Item = (ServiceType, usize)>,
    {
        let pools = capacities
            .into_iter()
            .map(|(service, cap)| (service, Arc::new(Semaphore::new(cap))))
            .collect();
        Self { pools }
    }

    /// Wait for a permit for the given service type.
    ///
    /// At most the configured number of callers hold a permit at once,
    /// system-wide, regardless of how many commands arrive concurrently.
    pub async fn acquire(&self, service: ServiceType) -> Result<ServicePermit, VerifyError> {
        let pool = self
            .pools
            .get(&service)
            .ok_or(VerifyError::ServiceNotConfigured(service))?;
        let permit = Arc::clone(pool)
            .acquire_owned()
            .await
            .map_err(|_| VerifyError::LimiterClosed)?;
        Ok(ServicePermit { _permit: permit })
    }

    /// Permits currently free for a service.
    pub fn available(&self, service: ServiceType) -> Option<usize> {
        self.pools.get(&service).map(|p| p.available_permits())
    }
}

/// RAII permit: returned to the pool on drop, on success, failure, and
/// panic unwinding alike — the guarded operation cannot leak it.
pub struct ServicePermit {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn limiter(cap: usize) -> Arc<ServiceLimiter> {
        Arc::new(ServiceLimiter::new([(ServiceType::SpotifyStudent, cap)]))
    }

    #[tokio::test(start_paused = true)]
    async fn ten_callers_three_permits() {
        let limiter = limiter(3);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let l = Arc::clone(&limiter);
            let current = Arc::clone(&in_flight);
            let max = Arc::clone(&max_seen);
            handles.push(tokio::spawn(async move {
                let _permit = l.acquire(ServiceType::SpotifyStudent).await.unwrap();
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                max.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                current.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert!(max_seen.load(Ordering::SeqCst) <= 3);
        assert_eq!(limiter.available(ServiceType::SpotifyStudent), Some(3));
    }

    #[tokio::test]
    async fn permit_released_when_guarded_task_panics() {
        let limiter = limiter(1);

        let l = Arc::clone(&limiter);
        let crashed = tokio::spawn(async move {
            let _permit = l.acquire(ServiceType::SpotifyStudent).await.unwrap();
            panic!("verifier blew up");
        });
        assert!(crashed.await.is_err());

        // The permit came back despite the panic.
        let _permit = limiter.acquire(ServiceType::SpotifyStudent).await.unwrap();
    }

    #[tokio::test]
    async fn unconfigured_service_is_an_error() {
        let limiter = limiter(1);
        let result = limiter.acquire(ServiceType::BoltTeacher).await;
        assert!(matches!(
            result,
            Err(VerifyError::ServiceNotConfigured(ServiceType::BoltTeacher))
        ));
    }
}
