//! Tunable parameters for the ledger and verification services.
//!
//! Nothing in the business logic invents a default: the orchestrator and
//! limiter receive an explicit per-service table at construction, and the
//! ledger receives an explicit bonus schedule. The defaults below belong to
//! the configuration layer only.

use crate::service::ServiceType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-service verification parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceParams {
    /// Points reserved per verification attempt.
    pub verify_cost: u64,

    /// Maximum concurrent external verifier invocations for this service.
    pub max_concurrent: usize,

    /// How long the orchestrator waits for a remote review before handing
    /// the attempt over to the free on-demand query path, in seconds.
    pub poll_window_secs: u64,
}

/// Point bonuses credited by the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusParams {
    /// Credited to a user at registration.
    pub registration: u64,
    /// Credited to the inviter when an invited user registers.
    pub referral: u64,
    /// Credited for a daily check-in.
    pub check_in: u64,
}

impl Default for BonusParams {
    fn default() -> Self {
        Self {
            registration: 1,
            referral: 2,
            check_in: 1,
        }
    }
}

/// The stock per-service parameter table.
///
/// Bolt.new reviews resolve within seconds, so its window is short; the
/// document-review programs get the full minute.
pub fn default_service_table() -> BTreeMap<ServiceType, ServiceParams> {
    let mut table = BTreeMap::new();
    for service in ServiceType::ALL {
        let poll_window_secs = match service {
            ServiceType::BoltTeacher => 20,
            ServiceType::SpotifyStudent | ServiceType::YoutubeStudent => 30,
            ServiceType::GeminiOnePro | ServiceType::ChatgptTeacherK12 => 60,
        };
        table.insert(
            service,
            ServiceParams {
                verify_cost: 5,
                max_concurrent: 3,
                poll_window_secs,
            },
        );
    }
    table
}
