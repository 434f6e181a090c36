//! Email templates
//!
//! Each template yields a subject, an HTML body, and a plain-text body.
//! Fields are interpolated verbatim into the markup; no HTML escaping is
//! applied to user-supplied names or links. That mirrors the behavior this
//! portal inherited and is a known injection hazard awaiting product
//! sign-off before it can change.

use chrono::{DateTime, Utc};
use projhub_types::Role;

/// A rendered message ready for dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Fields for the team invitation template
#[derive(Debug, Clone)]
pub struct TeamInvitationData {
    pub to_name: String,
    pub from_name: String,
    pub team_name: String,
    pub invitation_link: String,
}

/// Render the invitation email sent when a team invites a member
pub fn team_invitation_template(data: &TeamInvitationData) -> EmailMessage {
    let subject = format!("You're invited to join team {}", data.team_name);

    let html_body = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px;\">\
         <h2>Team Invitation</h2>\
         <p>Hi {to},</p>\
         <p><strong>{from}</strong> has invited you to join the team \
         <strong>{team}</strong> for the academic project portal.</p>\
         <p><a href=\"{link}\" style=\"background: #2563eb; color: #fff; \
         padding: 10px 18px; border-radius: 4px; text-decoration: none;\">\
         Respond to invitation</a></p>\
         <p>Or open this link: {link}</p>\
         <p>If you weren't expecting this invitation you can ignore it.</p>\
         </div>",
        to = data.to_name,
        from = data.from_name,
        team = data.team_name,
        link = data.invitation_link,
    );

    let text_body = format!(
        "Hi {},\n\n{} has invited you to join the team {}.\n\n\
         Respond here: {}\n\n\
         If you weren't expecting this invitation you can ignore it.\n",
        data.to_name, data.from_name, data.team_name, data.invitation_link,
    );

    EmailMessage {
        subject,
        html_body,
        text_body,
    }
}

/// Fields for the welcome template
#[derive(Debug, Clone)]
pub struct WelcomeData {
    pub to_name: String,
    pub role: Role,
}

/// Render the welcome email sent after account verification
pub fn welcome_template(data: &WelcomeData) -> EmailMessage {
    let subject = "Welcome to the project portal".to_string();

    let html_body = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px;\">\
         <h2>Welcome, {to}!</h2>\
         <p>Your account has been verified and your {role} dashboard is ready.</p>\
         <p>Sign in to form a team, track invitations, and follow your project.</p>\
         </div>",
        to = data.to_name,
        role = data.role,
    );

    let text_body = format!(
        "Welcome, {}!\n\nYour account has been verified and your {} dashboard is ready.\n",
        data.to_name, data.role,
    );

    EmailMessage {
        subject,
        html_body,
        text_body,
    }
}

/// Fields for the feedback notification template
#[derive(Debug, Clone)]
pub struct FeedbackNotificationData {
    pub to_name: String,
    pub guide_name: String,
    pub project_title: String,
}

/// Render the notification sent when a guide posts feedback
pub fn feedback_notification_template(data: &FeedbackNotificationData) -> EmailMessage {
    let subject = format!("New feedback on {}", data.project_title);

    let html_body = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px;\">\
         <h2>New Feedback</h2>\
         <p>Hi {to},</p>\
         <p><strong>{guide}</strong> left feedback on <strong>{title}</strong>.</p>\
         <p>Open your dashboard to read it.</p>\
         </div>",
        to = data.to_name,
        guide = data.guide_name,
        title = data.project_title,
    );

    let text_body = format!(
        "Hi {},\n\n{} left feedback on {}.\nOpen your dashboard to read it.\n",
        data.to_name, data.guide_name, data.project_title,
    );

    EmailMessage {
        subject,
        html_body,
        text_body,
    }
}

/// Fields for the evaluation schedule template
#[derive(Debug, Clone)]
pub struct ScheduleNotificationData {
    pub to_name: String,
    pub event_name: String,
    pub scheduled_for: DateTime<Utc>,
    pub venue: Option<String>,
}

/// Render the notification sent when an evaluation is scheduled
pub fn schedule_notification_template(data: &ScheduleNotificationData) -> EmailMessage {
    let subject = format!("Scheduled: {}", data.event_name);
    let when = data.scheduled_for.format("%Y-%m-%d %H:%M UTC");
    let venue = data.venue.as_deref().unwrap_or("to be announced");

    let html_body = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px;\">\
         <h2>{event}</h2>\
         <p>Hi {to},</p>\
         <p>Your evaluation <strong>{event}</strong> is scheduled for \
         <strong>{when}</strong>.</p>\
         <p>Venue: {venue}</p>\
         </div>",
        event = data.event_name,
        to = data.to_name,
        when = when,
        venue = venue,
    );

    let text_body = format!(
        "Hi {},\n\nYour evaluation {} is scheduled for {}.\nVenue: {}\n",
        data.to_name, data.event_name, when, venue,
    );

    EmailMessage {
        subject,
        html_body,
        text_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_invitation_subject_and_link() {
        let message = team_invitation_template(&TeamInvitationData {
            to_name: "Alice".to_string(),
            from_name: "Bob".to_string(),
            team_name: "Alpha".to_string(),
            invitation_link: "https://x/y".to_string(),
        });

        assert!(message.subject.contains("Alpha"));
        assert!(message.html_body.contains("https://x/y"));
        assert!(message.text_body.contains("https://x/y"));
        assert!(message.html_body.contains("Alice"));
        assert!(message.html_body.contains("Bob"));
    }

    #[test]
    fn test_team_invitation_does_not_escape_fields() {
        // Inherited behavior: interpolation is verbatim, markup and query
        // strings in user-controlled fields pass straight through.
        let message = team_invitation_template(&TeamInvitationData {
            to_name: "<b>Alice</b>".to_string(),
            from_name: "Bob".to_string(),
            team_name: "Alpha & Friends".to_string(),
            invitation_link: "https://x/y?team=alpha&token=1<2".to_string(),
        });

        assert!(message.html_body.contains("<b>Alice</b>"));
        assert!(message.html_body.contains("https://x/y?team=alpha&token=1<2"));
        assert!(message.subject.contains("Alpha & Friends"));
    }

    #[test]
    fn test_welcome_mentions_role() {
        let message = welcome_template(&WelcomeData {
            to_name: "Priya".to_string(),
            role: Role::Faculty,
        });
        assert!(message.html_body.contains("faculty"));
        assert!(message.text_body.contains("Priya"));
    }

    #[test]
    fn test_feedback_notification() {
        let message = feedback_notification_template(&FeedbackNotificationData {
            to_name: "Alice".to_string(),
            guide_name: "Dr. Rao".to_string(),
            project_title: "Adaptive Scheduling".to_string(),
        });
        assert!(message.subject.contains("Adaptive Scheduling"));
        assert!(message.html_body.contains("Dr. Rao"));
    }

    #[test]
    fn test_schedule_notification_venue_fallback() {
        let message = schedule_notification_template(&ScheduleNotificationData {
            to_name: "Alice".to_string(),
            event_name: "Mid-term Review".to_string(),
            scheduled_for: Utc::now(),
            venue: None,
        });
        assert!(message.subject.contains("Mid-term Review"));
        assert!(message.html_body.contains("to be announced"));
    }
}
