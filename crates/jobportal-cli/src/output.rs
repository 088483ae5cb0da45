//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use jobportal_client::toast::{Toast, ToastLevel};
use jobportal_core::notification::model::{Notification, NotificationKind};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Print notifications as a table, newest first.
pub fn print_notifications_table(notifications: &[Notification]) {
    if notifications.is_empty() {
        println!("{}", "No notifications.".dimmed());
        return;
    }

    println!(
        "{:<2} {:<10} {:<16} {:<44} {:<20}",
        "", "ID", "Type", "Message", "Created"
    );
    println!("{}", "─".repeat(94));

    for n in notifications {
        let marker = if n.is_read { " ".normal() } else { "●".cyan() };
        let message = pad_right(&truncate_visual(&n.message, 44), 44);
        let message = if n.is_read {
            message.dimmed()
        } else {
            message.bold()
        };
        println!(
            "{:<2} {:<10} {} {} {:<20}",
            marker,
            short_id(&n.id),
            pad_kind(&n.kind, 16),
            message,
            short_time(&n.created_at).dimmed()
        );
    }

    println!();
    let unread = notifications.iter().filter(|n| !n.is_read).count();
    println!("{} notification(s), {} unread", notifications.len(), unread);
}

/// Print one toast as it appears.
pub fn print_toast(toast: &Toast) {
    match toast.level {
        ToastLevel::Info => {
            let kind = toast
                .notification
                .as_ref()
                .map(|n| pad_kind(&n.kind, 0))
                .unwrap_or_else(|| "".normal());
            println!("{} {} {}", "▸".cyan().bold(), kind, toast.message);
        }
        ToastLevel::Error => println!("{} {}", "✗".red().bold(), toast.message.red()),
    }
}

pub fn print_unread_line(unread: usize) {
    let count = if unread == 0 {
        unread.to_string().dimmed()
    } else {
        unread.to_string().yellow().bold()
    };
    println!("  {} {}", "Unread:".dimmed(), count);
}

fn kind_colored(kind: &NotificationKind, label: String) -> ColoredString {
    match kind {
        NotificationKind::System => label.blue(),
        NotificationKind::NewApplication => label.green(),
        NotificationKind::JobAlert => label.magenta(),
        NotificationKind::Other(_) => label.normal(),
    }
}

fn pad_kind(kind: &NotificationKind, width: usize) -> ColoredString {
    kind_colored(kind, pad_right(kind.as_str(), width))
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// `2024-05-01T10:22:03.123Z` → `2024-05-01 10:22`.
fn short_time(rfc3339: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(rfc3339) {
        Ok(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => rfc3339.to_string(),
    }
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 3 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("...");
    result
}
