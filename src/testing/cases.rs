use std::collections::BTreeMap;

use log::info;
use serde::Deserialize;

use crate::config::BearerToken;
use crate::http::{HttpCaller, HttpResponse};
use crate::target::{BILLING_PROFILES_PATH, MANAGED_APPS_PATH, STATUS_PATH, Target};

use super::CaseFailure;

/// Which credentials a case needs. Each tier only adds to the one before.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Unauthenticated,
    Authenticated,
    Azure,
}

/// One check against one BPM endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmokeCase {
    StatusCode,
    Subsystems,
    BillingProfiles {
        token: BearerToken,
    },
    ManagedApps {
        token: BearerToken,
        subscription_id: String,
    },
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    systems: BTreeMap<String, SubsystemStatus>,
}

#[derive(Debug, Deserialize)]
struct SubsystemStatus {
    ok: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManagedAppsBody {
    managed_apps: Vec<ManagedApp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManagedApp {
    subscription_id: String,
    managed_resource_group_id: String,
    tenant_id: String,
}

impl SmokeCase {
    pub fn name(&self) -> &'static str {
        match self {
            SmokeCase::StatusCode => "status::status_code_is_200",
            SmokeCase::Subsystems => "status::subsystems",
            SmokeCase::BillingProfiles { .. } => "billing_profiles::retrieving_billing_profiles",
            SmokeCase::ManagedApps { .. } => "managed_apps::retrieving_managed_apps",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SmokeCase::StatusCode => "BPM status endpoint answers 200",
            SmokeCase::Subsystems => "every BPM subsystem reports ok",
            SmokeCase::BillingProfiles { .. } => "billing profiles can be listed",
            SmokeCase::ManagedApps { .. } => "Azure managed apps are well formed",
        }
    }

    #[cfg(test)]
    pub fn tier(&self) -> Tier {
        match self {
            SmokeCase::StatusCode | SmokeCase::Subsystems => Tier::Unauthenticated,
            SmokeCase::BillingProfiles { .. } => Tier::Authenticated,
            SmokeCase::ManagedApps { .. } => Tier::Azure,
        }
    }

    pub async fn run(&self, target: &Target, caller: &HttpCaller) -> Result<(), CaseFailure> {
        match self {
            SmokeCase::StatusCode => {
                let url = target.url(STATUS_PATH)?;
                info!("Using BPM status URL: {url}");
                let response = caller.call(url, &[], None).await?;
                expect_status(&response, 200)
            }
            SmokeCase::Subsystems => {
                let response = caller.call(target.url(STATUS_PATH)?, &[], None).await?;
                let status: StatusBody = response.json()?;
                check_subsystems(&status)
            }
            SmokeCase::BillingProfiles { token } => {
                let url = target.url(BILLING_PROFILES_PATH)?;
                let response = caller.call(url, &[], Some(token)).await?;
                expect_status(&response, 200)
            }
            SmokeCase::ManagedApps {
                token,
                subscription_id,
            } => {
                let url = target.url(MANAGED_APPS_PATH)?;
                let params = [("azureSubscriptionId", subscription_id.as_str())];
                let response = caller.call(url, &params, Some(token)).await?;
                expect_status(&response, 200)?;
                let body: ManagedAppsBody = response.json()?;
                check_managed_apps(&body)
            }
        }
    }
}

fn expect_status(response: &HttpResponse, expected: u16) -> Result<(), CaseFailure> {
    if response.status == expected {
        Ok(())
    } else {
        Err(CaseFailure::Assertion(format!(
            "{} != {expected} : unexpected status from {}",
            response.status, response.url
        )))
    }
}

fn check_subsystems(status: &StatusBody) -> Result<(), CaseFailure> {
    let failing: Vec<&str> = status
        .systems
        .iter()
        .filter(|(_, subsystem)| !subsystem.ok)
        .map(|(name, _)| name.as_str())
        .collect();

    match failing.as_slice() {
        [] => Ok(()),
        [name] => Err(CaseFailure::Assertion(format!("{name} is not OK"))),
        names => Err(CaseFailure::Assertion(format!("{} are not OK", names.join(", ")))),
    }
}

/// An empty list passes: a subscription with nothing provisioned is valid.
fn check_managed_apps(body: &ManagedAppsBody) -> Result<(), CaseFailure> {
    for (index, app) in body.managed_apps.iter().enumerate() {
        let fields = [
            ("subscriptionId", &app.subscription_id),
            ("managedResourceGroupId", &app.managed_resource_group_id),
            ("tenantId", &app.tenant_id),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                return Err(CaseFailure::Assertion(format!(
                    "managedApps[{index}].{field} is empty"
                )));
            }
        }
    }
    Ok(())
}
