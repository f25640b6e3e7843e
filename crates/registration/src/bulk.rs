use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::{Command, Registration, Status};

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Confirm,
    Waitlist,
    Cancel,
    Delete,
    Export,
}

impl BulkAction {
    /// Status written by the action, if it is a status change.
    pub fn target(&self) -> Option<Status> {
        match self {
            BulkAction::Confirm => Some(Status::Confirmed),
            BulkAction::Waitlist => Some(Status::Waitlist),
            BulkAction::Cancel => Some(Status::Cancelled),
            BulkAction::Delete | BulkAction::Export => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            BulkAction::Confirm => "Registrations marked as confirmed.",
            BulkAction::Waitlist => "Registrations moved to waitlist.",
            BulkAction::Cancel => "Registrations cancelled.",
            BulkAction::Delete => "Registrations deleted permanently.",
            BulkAction::Export => "Registrations exported successfully.",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    pub action: BulkAction,
    pub applied: Vec<i64>,
    pub missing: Vec<i64>,
    /// Found registrations, filled for `export` only.
    #[serde(skip)]
    pub registrations: Vec<Registration>,
}

impl BulkReport {
    fn new(action: BulkAction) -> Self {
        Self {
            action,
            applied: vec![],
            missing: vec![],
            registrations: vec![],
        }
    }
}

impl Command {
    /// Applies `action` to each id independently. Unknown ids land in `missing`.
    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn bulk(
        &self,
        action: BulkAction,
        ids: &[i64],
    ) -> arbe_events_shared::Result<BulkReport> {
        let mut report = BulkReport::new(action);
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        if action == BulkAction::Export {
            report.registrations = self.store().get_many(&ids).await?;
            report.applied = report.registrations.iter().map(|r| r.id).collect();
            report.missing = ids
                .into_iter()
                .filter(|id| !report.applied.contains(id))
                .collect();

            return Ok(report);
        }

        for id in ids {
            let found = match action.target() {
                Some(status) => self.store().update_status(id, status).await?,
                None => self.store().delete(id).await?,
            };

            if found {
                report.applied.push(id);
            } else {
                report.missing.push(id);
            }
        }

        tracing::info!(
            action = %action,
            applied = report.applied.len(),
            missing = report.missing.len(),
            "bulk action applied"
        );

        Ok(report)
    }
}
