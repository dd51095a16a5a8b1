use log::{debug, warn};

use crate::config::RunConfig;

use super::cases::SmokeCase;

/// Pick the cases to run for `config`.
///
/// Status cases always run. A user token adds the authenticated cases, and a
/// token together with an Azure subscription adds the managed-apps case. The
/// subscription is only looked at once a token is known to be present.
pub fn assemble(config: &RunConfig) -> Vec<SmokeCase> {
    let mut cases = vec![SmokeCase::StatusCode, SmokeCase::Subsystems];

    if let Some(token) = &config.user_token {
        cases.push(SmokeCase::BillingProfiles {
            token: token.clone(),
        });

        if let Some(subscription_id) = &config.azure_subscription_id {
            cases.push(SmokeCase::ManagedApps {
                token: token.clone(),
                subscription_id: subscription_id.clone(),
            });
        }
    } else if config.azure_subscription_id.is_some() {
        warn!("Azure subscription id given without a user token; skipping managed apps checks");
    }

    debug!("assembled {} cases", cases.len());
    cases
}
