//! Bounded pool for running optimizations from async code.
//!
//! Optimization is CPU-bound, so each request runs on the blocking thread
//! pool. A semaphore caps how many run at once; waiting for a slot races the
//! caller's cancellation token and an optional timeout.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::PoolConfig;
use crate::error::{InvalidInput, Result, RoutingError};
use crate::models::OptimizationResult;
use crate::optimizer::{OptimizeRequest, RouteOptimizer};

/// Runs [`RouteOptimizer`] requests with bounded concurrency.
///
/// Cloning is cheap; clones share the same slots.
///
/// # Examples
///
/// ```
/// # #[tokio::main]
/// # async fn main() {
/// use u_route_optimizer::config::{OptimizerConfig, PoolConfig};
/// use u_route_optimizer::models::{DeliveryPoint, GeoPoint};
/// use u_route_optimizer::pool::OptimizerPool;
/// use u_route_optimizer::{OptimizeRequest, RouteOptimizer};
///
/// let pool = OptimizerPool::new(
///     RouteOptimizer::new(OptimizerConfig::fast()),
///     PoolConfig { max_concurrent: 2, acquire_timeout_ms: None },
/// ).unwrap();
/// let depot = GeoPoint::new(40.7128, -74.0060).unwrap();
/// let request = OptimizeRequest::new(depot, vec![DeliveryPoint::new(depot)]);
/// let result = pool.optimize(request, None).await.unwrap();
/// assert_eq!(result.sequence, vec![0]);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OptimizerPool {
    optimizer: Arc<RouteOptimizer>,
    permits: Arc<Semaphore>,
    acquire_timeout: Option<Duration>,
}

impl OptimizerPool {
    /// Creates a pool.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::InvalidConfig`] if `max_concurrent` is zero.
    pub fn new(optimizer: RouteOptimizer, config: PoolConfig) -> Result<Self> {
        if config.max_concurrent == 0 {
            return Err(InvalidInput::InvalidConfig(
                "max_concurrent must be at least 1".to_string(),
            )
            .into());
        }
        Ok(Self {
            optimizer: Arc::new(optimizer),
            permits: Arc::new(Semaphore::new(config.max_concurrent)),
            acquire_timeout: config.acquire_timeout_ms.map(Duration::from_millis),
        })
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Stops accepting work. Queued and future requests fail with
    /// [`RoutingError::PoolClosed`]; running ones finish.
    pub fn close(&self) {
        self.permits.close();
    }

    /// Optimizes `request` once a slot is free.
    ///
    /// The token is also passed to the search, so cancelling after the
    /// request started returns the best route found so far.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::Cancelled`] if `cancel` fires while waiting
    /// - [`RoutingError::PoolTimeout`] if no slot frees up in time
    /// - [`RoutingError::PoolClosed`] after [`close`](Self::close)
    /// - [`RoutingError::Worker`] if the blocking task panicked
    /// - any error from [`RouteOptimizer::optimize`]
    pub async fn optimize(
        &self,
        request: OptimizeRequest,
        cancel: Option<CancellationToken>,
    ) -> Result<OptimizationResult> {
        let cancel = cancel.unwrap_or_default();
        let acquire = self.permits.clone().acquire_owned();

        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("optimization cancelled while queued");
                return Err(RoutingError::Cancelled);
            }
            permit = with_timeout(self.acquire_timeout, acquire) => match permit {
                Some(Ok(permit)) => permit,
                Some(Err(_)) => return Err(RoutingError::PoolClosed),
                None => {
                    let waited = self.acquire_timeout.unwrap_or_default();
                    warn!(?waited, "no optimizer slot available");
                    return Err(RoutingError::PoolTimeout(waited));
                }
            },
        };

        let optimizer = Arc::clone(&self.optimizer);
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            optimizer.optimize(&request, Some(&cancel))
        });

        handle
            .await
            .map_err(|e| RoutingError::Worker(e.to_string()))?
    }
}

/// Awaits `fut`, giving up after `limit` if one is set.
async fn with_timeout<F: std::future::Future>(limit: Option<Duration>, fut: F) -> Option<F::Output> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.ok(),
        None => Some(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizerConfig;
    use crate::models::{DeliveryPoint, GeoPoint};

    fn request() -> OptimizeRequest {
        let depot = GeoPoint::new(40.7128, -74.0060).expect("valid");
        let points = [(40.7580, -73.9855), (40.7489, -73.9680), (40.6782, -73.9442)]
            .iter()
            .map(|&(lat, lon)| DeliveryPoint::new(GeoPoint::new(lat, lon).expect("valid")))
            .collect();
        OptimizeRequest::new(depot, points)
    }

    fn pool(max_concurrent: usize, acquire_timeout_ms: Option<u64>) -> OptimizerPool {
        OptimizerPool::new(
            RouteOptimizer::new(OptimizerConfig::deterministic(1_000)),
            PoolConfig {
                max_concurrent,
                acquire_timeout_ms,
            },
        )
        .expect("valid pool")
    }

    #[test]
    fn test_zero_slots_rejected() {
        let err = OptimizerPool::new(
            RouteOptimizer::default(),
            PoolConfig {
                max_concurrent: 0,
                acquire_timeout_ms: None,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RoutingError::InvalidInput(InvalidInput::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_runs_request() {
        let pool = pool(2, None);
        let result = pool.optimize(request(), None).await.expect("feasible");
        assert_eq!(result.sequence.len(), 3);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn test_cancel_while_queued() {
        let pool = pool(1, None);
        let held = Arc::clone(&pool.permits).acquire_owned().await.expect("open");
        let token = CancellationToken::new();
        token.cancel();
        let err = pool.optimize(request(), Some(token)).await.unwrap_err();
        assert_eq!(err, RoutingError::Cancelled);
        drop(held);
    }

    #[tokio::test]
    async fn test_acquire_timeout() {
        let pool = pool(1, Some(10));
        let _held = Arc::clone(&pool.permits).acquire_owned().await.expect("open");
        let err = pool.optimize(request(), None).await.unwrap_err();
        assert_eq!(err, RoutingError::PoolTimeout(Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn test_closed_pool() {
        let pool = pool(1, None);
        pool.close();
        let err = pool.optimize(request(), None).await.unwrap_err();
        assert_eq!(err, RoutingError::PoolClosed);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_slots() {
        let pool = pool(2, None);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = pool.clone();
                tokio::spawn(async move { pool.optimize(request(), None).await })
            })
            .collect();
        for handle in handles {
            let result = handle.await.expect("join").expect("feasible");
            assert_eq!(result.sequence.len(), 3);
        }
        assert_eq!(pool.available(), 2);
    }
}
