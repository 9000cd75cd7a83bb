//! Plain-text rendering of the view model.

use chrono::{DateTime, Utc};
use shiftboard_core::{
    AppViewModel, DailyRegistrations, JobEditorView, ListView, Notice, NoticeLevel,
    VolunteerEditorView, WaiverType,
};

fn time(value: &DateTime<Utc>) -> String {
    value.format("%a %b %-d %H:%M").to_string()
}

fn window(start: &DateTime<Utc>, end: &DateTime<Utc>) -> String {
    format!("{} - {}", time(start), end.format("%H:%M"))
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

pub fn notice(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    format!("[{level}] {}", notice.text)
}

pub fn roster(view: &AppViewModel) -> String {
    let rows = match &view.volunteers {
        ListView::Loading => return "Loading volunteers...".to_string(),
        ListView::Failed(message) => return format!("Could not load volunteers: {message}"),
        ListView::Ready(rows) => rows,
    };
    let mut lines = vec![format!(
        "{} of {} volunteers",
        rows.len(),
        view.volunteer_total
    )];
    for row in rows {
        let mut line = format!(
            "{:<24} {:<32} {:<14} {:<5} {}",
            row.name,
            or_dash(&row.email),
            or_dash(&row.phone),
            or_dash(&row.shirt_size),
            if row.waiver_signed { "waiver" } else { "no waiver" },
        );
        if row.duplicate {
            line.push_str("  (duplicate)");
        }
        line.push_str(&format!("  [{}]", row.id));
        lines.push(line);
    }
    lines.join("\n")
}

pub fn jobs(view: &AppViewModel) -> String {
    let locations = match &view.locations {
        ListView::Loading => return "Loading jobs...".to_string(),
        ListView::Failed(message) => return format!("Could not load jobs: {message}"),
        ListView::Ready(locations) => locations,
    };
    if locations.is_empty() {
        return "No jobs yet".to_string();
    }
    let mut lines = Vec::new();
    for location in locations {
        lines.push(format!("== {} ==", or_dash(&location.name)));
        for job in &location.jobs {
            lines.push(format!("  {} [{}]", job.name, job.id));
            if !job.description.is_empty() {
                lines.push(format!("    {}", job.description));
            }
            for shift in &job.shifts {
                let fill = match shift.fill_percent {
                    Some(percent) => format!("{percent}%"),
                    None => "N/A".to_string(),
                };
                lines.push(format!(
                    "    {}  {}/{} ({fill})  [{}]",
                    window(&shift.start_time, &shift.end_time),
                    shift.assigned,
                    shift.capacity,
                    shift.id
                ));
            }
        }
    }
    lines.join("\n")
}

pub fn volunteer(editor: &VolunteerEditorView) -> String {
    let Some(record) = &editor.record else {
        return format!("Volunteer {} is still loading", editor.id);
    };
    let waiver = match (record.waiver_signed, record.waiver_type) {
        (true, Some(WaiverType::Minor)) => "signed (minor)",
        (true, _) => "signed",
        (false, _) => "not signed",
    };
    let mut lines = vec![
        format!("{} [{}]", record.name, editor.id),
        format!("  Email:      {}", or_dash(&record.email)),
        format!("  Phone:      {}", or_dash(&record.phone)),
        format!("  Shirt size: {}", or_dash(&record.shirt_size)),
        format!("  Referral:   {}", or_dash(&record.referral)),
        format!("  Registered: {} ({})", record.registered, time(&record.created_at)),
        format!("  Waiver:     {waiver}"),
    ];
    let contact = [
        record.emergency_contact_name.as_deref(),
        record.emergency_contact_phone.as_deref(),
        record.emergency_contact_email.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|value| !value.is_empty())
    .collect::<Vec<_>>();
    if !contact.is_empty() {
        lines.push(format!("  Emergency:  {}", contact.join(", ")));
    }

    if record.assignments.is_empty() {
        lines.push("  No shifts".to_string());
    }
    for job in &record.assignments {
        lines.push(format!("  {} @ {}", or_dash(&job.job_name), or_dash(&job.location_name)));
        for shift in &job.shifts {
            lines.push(format!("    {}", window(&shift.start_time, &shift.end_time)));
        }
    }
    if record.modified {
        lines.push("  (unsaved changes)".to_string());
    }
    lines.join("\n")
}

/// The shift picker: every shift with the volunteer's current selection.
pub fn picker(editor: &VolunteerEditorView) -> String {
    let mut lines = Vec::new();
    for location in &editor.picker {
        lines.push(format!("== {} ==", or_dash(&location.name)));
        for job in &location.jobs {
            lines.push(format!("  {}", job.name));
            for shift in &job.shifts {
                let mark = if shift.selected { "x" } else { " " };
                let mut line = format!(
                    "    [{mark}] {}  [{}]",
                    window(&shift.start_time, &shift.end_time),
                    shift.id
                );
                if shift.pending {
                    line.push_str("  (updating)");
                } else if shift.rolled_back {
                    line.push_str("  (reverted)");
                }
                lines.push(line);
            }
        }
    }
    lines.join("\n")
}

pub fn job_editor(editor: &JobEditorView) -> String {
    let mut lines = vec![
        format!("{} [{}]", or_dash(&editor.name), editor.id),
        format!("  Location: {}", or_dash(&editor.location_name)),
    ];
    if !editor.description.is_empty() {
        lines.push(format!("  {}", editor.description));
    }
    for shift in &editor.shifts {
        lines.push(format!(
            "    {}  {}h  capacity {}  [{}]",
            window(&shift.start_time, &shift.end_time),
            shift.hours,
            shift.capacity,
            shift.id
        ));
    }
    lines.join("\n")
}

pub fn registrations(days: &[DailyRegistrations]) -> String {
    if days.is_empty() {
        return "No registrations".to_string();
    }
    let total: usize = days.iter().map(|day| day.count).sum();
    let mut lines: Vec<String> = days
        .iter()
        .map(|day| format!("{}  {:>4}", day.date.format("%Y-%m-%d"), day.count))
        .collect();
    lines.push(format!("total       {total:>4}"));
    lines.join("\n")
}
