//! Application wiring: stores, services, and the orchestrator.

use crate::{ServiceConfig, ServiceError};
use eligo_ledger::{CheckIns, PointsLedger, RedemptionCodes};
use eligo_store::{AttemptStore, CheckInStore, CodeStore, UserStore};
use eligo_store_memory::MemoryStore;
use eligo_types::{ServiceType, UserId};
use eligo_verification::{
    AttemptLog, HttpStatusBackend, ServiceLimiter, StatusBackend, StatusPoller,
    VerificationOrchestrator, Verifier,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// The assembled service stack.
///
/// Everything the command facade needs is built here from an explicit
/// configuration; there is no ambient global state.
pub struct App {
    pub(crate) ledger: PointsLedger,
    pub(crate) codes: RedemptionCodes,
    pub(crate) checkins: CheckIns,
    pub(crate) orchestrator: VerificationOrchestrator,
    pub(crate) admin: UserId,
}

impl App {
    /// Wire the services over an arbitrary storage backend and status
    /// backend.
    pub fn new<S>(
        config: ServiceConfig,
        store: Arc<S>,
        verifiers: HashMap<ServiceType, Arc<dyn Verifier>>,
        status_backend: Arc<dyn StatusBackend>,
    ) -> Result<Self, ServiceError>
    where
        S: UserStore + CodeStore + CheckInStore + AttemptStore + 'static,
    {
        config.validate()?;

        let ledger = PointsLedger::new(store.clone(), config.bonuses);
        let codes = RedemptionCodes::new(store.clone(), ledger.clone());
        let checkins = CheckIns::new(store.clone(), ledger.clone());
        let attempts = AttemptLog::new(store);

        let limiter = ServiceLimiter::new(
            config
                .services
                .iter()
                .map(|(service, params)| (*service, params.max_concurrent)),
        );
        let poller = StatusPoller::new(
            status_backend,
            Duration::from_secs(config.poll_interval_secs),
        );
        let orchestrator = VerificationOrchestrator::new(
            ledger.clone(),
            attempts,
            limiter,
            poller,
            verifiers,
            config.services.clone(),
        );

        tracing::info!(
            admin = config.admin_user_id,
            services = config.services.len(),
            "service stack assembled"
        );
        Ok(Self {
            ledger,
            codes,
            checkins,
            orchestrator,
            admin: UserId::new(config.admin_user_id),
        })
    }

    /// Wire the services over the in-memory backend and the HTTP status
    /// endpoint from the configuration.
    pub fn in_memory(
        config: ServiceConfig,
        verifiers: HashMap<ServiceType, Arc<dyn Verifier>>,
    ) -> Result<Self, ServiceError> {
        let backend = Arc::new(HttpStatusBackend::new(config.status_base_url.clone()));
        Self::new(config, Arc::new(MemoryStore::new()), verifiers, backend)
    }

    pub fn ledger(&self) -> &PointsLedger {
        &self.ledger
    }

    pub fn orchestrator(&self) -> &VerificationOrchestrator {
        &self.orchestrator
    }
}
