//! Where a clicked notification takes the user.

use serde::{Deserialize, Serialize};

use crate::notification::model::{Notification, NotificationKind};

/// A page the client can open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Destination {
    VerificationStatus,
    EmployerJobs,
    JobDetail { job_id: String },
}

impl Destination {
    /// Client route for the page.
    pub fn path(&self) -> String {
        match self {
            Self::VerificationStatus => "/verification-status".to_string(),
            Self::EmployerJobs => "/employer/jobs".to_string(),
            Self::JobDetail { job_id } => format!("/jobs/{}", job_id),
        }
    }
}

/// Pick the destination for a clicked notification, if any.
pub fn destination_for(notification: &Notification) -> Option<Destination> {
    match &notification.kind {
        NotificationKind::System if mentions_verification(&notification.message) => {
            Some(Destination::VerificationStatus)
        }
        NotificationKind::System => None,
        NotificationKind::NewApplication => Some(Destination::EmployerJobs),
        NotificationKind::JobAlert => notification
            .related_id
            .as_ref()
            .map(|job_id| Destination::JobDetail {
                job_id: job_id.clone(),
            }),
        NotificationKind::Other(_) => None,
    }
}

// Inferred from the message text: SYSTEM notifications carry no field that
// marks them as verification notices.
fn mentions_verification(message: &str) -> bool {
    message.to_lowercase().contains("verification")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(kind: NotificationKind, message: &str, related_id: Option<&str>) -> Notification {
        Notification {
            id: "n1".to_string(),
            owner: "u123".to_string(),
            kind,
            message: message.to_string(),
            related_id: related_id.map(str::to_string),
            is_read: false,
            created_at: String::new(),
            read_at: None,
        }
    }

    #[test]
    fn test_job_alert_opens_job_detail() {
        let n = notification(NotificationKind::JobAlert, "New match", Some("job42"));
        let dest = destination_for(&n).unwrap();
        assert_eq!(dest, Destination::JobDetail { job_id: "job42".to_string() });
        assert_eq!(dest.path(), "/jobs/job42");
    }

    #[test]
    fn test_job_alert_without_job_id() {
        let n = notification(NotificationKind::JobAlert, "New match", None);
        assert_eq!(destination_for(&n), None);
    }

    #[test]
    fn test_system_verification_message() {
        let n = notification(NotificationKind::System, "Your Verification was approved", None);
        assert_eq!(destination_for(&n), Some(Destination::VerificationStatus));

        let plain = notification(NotificationKind::System, "Scheduled maintenance tonight", None);
        assert_eq!(destination_for(&plain), None);
    }

    #[test]
    fn test_new_application_opens_employer_jobs() {
        let n = notification(NotificationKind::NewApplication, "Someone applied", Some("job1"));
        assert_eq!(destination_for(&n).unwrap().path(), "/employer/jobs");
    }

    #[test]
    fn test_unknown_kind_goes_nowhere() {
        let n = notification(
            NotificationKind::Other("INTERVIEW_INVITE".to_string()),
            "verification",
            Some("job1"),
        );
        assert_eq!(destination_for(&n), None);
    }
}
