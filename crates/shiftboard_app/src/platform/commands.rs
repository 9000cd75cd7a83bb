use anyhow::{bail, Context};
use shiftboard_core::{JobEdit, Msg, NoticeLevel, VolunteerEdit, VolunteerEditorView};
use uuid::Uuid;

use super::app::Session;
use super::render;
use crate::cli::{
    Command, JobFields, JobsCommand, ShiftsCommand, StatsCommand, VolunteerFields,
    VolunteersCommand,
};

/// Runs one command against a started session and returns the text to print.
pub fn run(command: Command, session: &mut Session) -> anyhow::Result<String> {
    match command {
        Command::Volunteers(command) => volunteers(command, session),
        Command::Jobs(command) => jobs(command, session),
        Command::Shifts(ShiftsCommand::Toggle { volunteer, shift }) => {
            toggle_shift(session, volunteer, shift)
        }
        Command::Stats(StatsCommand::Registrations) => {
            Ok(render::registrations(&session.view().registrations))
        }
    }
}

fn volunteers(command: VolunteersCommand, session: &mut Session) -> anyhow::Result<String> {
    match command {
        VolunteersCommand::List { query } => {
            if let Some(query) = query {
                session.send(Msg::QueryChanged(query));
            }
            Ok(render::roster(&session.view()))
        }
        VolunteersCommand::Show { id, shifts } => {
            let editor = open_volunteer(session, &id)?;
            let mut text = render::volunteer(&editor);
            if shifts {
                text.push('\n');
                text.push_str(&render::picker(&editor));
            }
            Ok(text)
        }
        VolunteersCommand::Edit {
            id,
            fields,
            send_email,
        } => {
            open_volunteer(session, &id)?;
            let edits = volunteer_edits(fields);
            if edits.is_empty() {
                bail!("nothing to change; pass at least one field flag");
            }
            for edit in edits {
                session.dispatch(Msg::VolunteerEdited(edit));
            }
            session.send(Msg::VolunteerSaveClicked { send_email });
            let editor = session
                .view()
                .volunteer_editor
                .context("volunteer editor closed during save")?;
            Ok(render::volunteer(&editor))
        }
        VolunteersCommand::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete volunteer {id} without --yes");
            }
            open_volunteer(session, &id)?;
            session.send(Msg::VolunteerDeleteConfirmed);
            if session.view().volunteer_editor.is_some() {
                bail!("volunteer {id} was not deleted");
            }
            Ok(format!("Volunteer {id} deleted"))
        }
    }
}

/// Opens the editor for `id` and waits until the record is loaded.
fn open_volunteer(session: &mut Session, id: &str) -> anyhow::Result<VolunteerEditorView> {
    session.send(Msg::VolunteerOpened { id: id.to_string() });
    match session.view().volunteer_editor {
        Some(editor) if editor.record.is_some() => Ok(editor),
        _ => bail!("volunteer {id} could not be loaded"),
    }
}

fn volunteer_edits(fields: VolunteerFields) -> Vec<VolunteerEdit> {
    [
        fields.name.map(VolunteerEdit::Name),
        fields.email.map(VolunteerEdit::Email),
        fields.phone.map(VolunteerEdit::Phone),
        fields.shirt_size.map(VolunteerEdit::ShirtSize),
        fields.referral.map(VolunteerEdit::Referral),
        fields.emergency_name.map(VolunteerEdit::EmergencyContactName),
        fields.emergency_phone.map(VolunteerEdit::EmergencyContactPhone),
        fields.emergency_email.map(VolunteerEdit::EmergencyContactEmail),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn jobs(command: JobsCommand, session: &mut Session) -> anyhow::Result<String> {
    match command {
        JobsCommand::List => Ok(render::jobs(&session.view())),
        JobsCommand::Edit { id, new, fields } => {
            let id = match id {
                Some(id) if !new => {
                    session.send(Msg::JobOpened { id: id.clone() });
                    id
                }
                _ => {
                    let id = Uuid::new_v4().to_string();
                    session.send(Msg::NewJobClicked { id: id.clone() });
                    id
                }
            };
            if session.view().job_editor.is_none() {
                bail!("job {id} could not be opened");
            }
            apply_job_fields(session, fields);
            let preview = session
                .view()
                .job_editor
                .map(|editor| render::job_editor(&editor))
                .unwrap_or_default();

            session.send(Msg::JobSaveClicked);
            if session.view().job_editor.is_some() {
                // Still open: validation or the save failed; notices say why.
                session.send(Msg::JobEditorClosed);
                return Ok(preview);
            }
            Ok(format!("{preview}\nJob {id} saved"))
        }
        JobsCommand::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete job {id} without --yes");
            }
            session.send(Msg::JobOpened { id: id.clone() });
            if session.view().job_editor.is_none() {
                bail!("job {id} could not be opened");
            }
            session.send(Msg::JobDeleteConfirmed);
            if session.view().job_editor.is_some() {
                bail!("job {id} was not deleted");
            }
            Ok(format!("Job {id} deleted"))
        }
    }
}

fn apply_job_fields(session: &mut Session, fields: JobFields) {
    let edits = [
        fields.name.map(JobEdit::Name),
        fields.description.map(JobEdit::Description),
        fields.location.map(JobEdit::Location),
    ];
    for edit in edits.into_iter().flatten() {
        session.dispatch(Msg::JobEdited(edit));
    }
    for shift_id in fields.remove_shift {
        session.dispatch(Msg::JobEdited(JobEdit::ShiftRemoved { shift_id }));
    }

    let mut added = Vec::new();
    for window in fields.add_shift {
        let shift_id = Uuid::new_v4().to_string();
        session.dispatch(Msg::JobShiftAdded {
            shift_id: shift_id.clone(),
        });
        session.dispatch(Msg::JobEdited(JobEdit::ShiftStart {
            shift_id: shift_id.clone(),
            time: window.start,
        }));
        session.dispatch(Msg::JobEdited(JobEdit::ShiftEnd {
            shift_id: shift_id.clone(),
            time: window.end,
        }));
        added.push(shift_id);
    }
    for _ in 0..fields.repeat_shift {
        let shift_id = Uuid::new_v4().to_string();
        session.dispatch(Msg::JobShiftAdded {
            shift_id: shift_id.clone(),
        });
        added.push(shift_id);
    }
    for shift_id in added {
        session.dispatch(Msg::JobEdited(JobEdit::ShiftCapacity {
            shift_id,
            capacity: fields.capacity,
        }));
    }
}

fn toggle_shift(session: &mut Session, volunteer: String, shift: String) -> anyhow::Result<String> {
    open_volunteer(session, &volunteer)?;
    session.send(Msg::ShiftToggleClicked {
        shift_id: shift.clone(),
    });
    let editor = session
        .view()
        .volunteer_editor
        .context("volunteer editor closed during toggle")?;
    let selected = editor
        .picker
        .iter()
        .flat_map(|location| &location.jobs)
        .flat_map(|job| &job.shifts)
        .find(|candidate| candidate.id == shift)
        .map(|candidate| candidate.selected)
        .with_context(|| format!("shift {shift} is not offered by any job"))?;
    Ok(if selected {
        format!("Volunteer {volunteer} is signed up for shift {shift}")
    } else {
        format!("Volunteer {volunteer} is not signed up for shift {shift}")
    })
}

/// True when any of `notices` reports a failure.
pub fn any_failed(notices: &[shiftboard_core::Notice]) -> bool {
    notices.iter().any(|notice| notice.level == NoticeLevel::Error)
}
