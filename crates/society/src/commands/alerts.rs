//! Alert command handlers.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tabled::Tabled;

use society_core::types::{
    Alert, AlertPriority, AlertStatus, AlertType, Visibility, VisibilityScope,
};
use society_core::validation::NewAlertForm;
use society_core::{
    AlertAction, AlertBadgePoller, AlertCounts, AlertFilter, Command as CoreCommand, CommandResult,
    FilterSet, Society,
};

use crate::cli::{AlertsArgs, AlertsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Esc")]
    escalation: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Alert> for AlertRow {
    fn from(a: &Alert) -> Self {
        Self {
            id: a.display_id().to_owned(),
            title: a.title.clone(),
            kind: a.kind.to_string(),
            priority: a.priority.to_string(),
            status: a.status.to_string(),
            escalation: if a.is_escalated() {
                format!("L{}", a.escalation_level())
            } else {
                String::new()
            },
            created: util::fmt_time(Some(a.created_at)),
        }
    }
}

fn status_tone(status: AlertStatus) -> Tone {
    match status {
        AlertStatus::Active => Tone::Bad,
        AlertStatus::Scheduled => Tone::Warn,
        AlertStatus::Resolved => Tone::Good,
        AlertStatus::Cancelled => Tone::Muted,
    }
}

fn priority_tone(priority: AlertPriority) -> Tone {
    match priority {
        AlertPriority::Critical => Tone::Bad,
        AlertPriority::High => Tone::Warn,
        AlertPriority::Medium | AlertPriority::Low => Tone::Muted,
    }
}

/// Subcommand names for the actions the signed-in user may take.
fn action_names(actions: &[AlertAction]) -> String {
    actions
        .iter()
        .map(|a| match a {
            AlertAction::AddUpdate => "update",
            AlertAction::Escalate => "escalate",
            AlertAction::Resolve => "resolve",
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn alert_detail(a: &Alert, actions: &[AlertAction], color: bool) -> String {
    let escalation = a
        .escalation
        .as_ref()
        .filter(|e| e.is_escalated)
        .map(|e| {
            format!(
                "level {}{}",
                e.escalation_level,
                e.escalation_reason
                    .as_deref()
                    .map(|r| format!(" ({r})"))
                    .unwrap_or_default()
            )
        })
        .unwrap_or_default();

    let targets = a.visibility.targets().join(", ");
    let scope = if targets.is_empty() {
        a.visibility.scope.to_string()
    } else {
        format!("{}: {targets}", a.visibility.scope)
    };

    let mut out = output::detail_lines(&[
        ("ID", a.display_id().to_owned()),
        ("Title", a.title.clone()),
        ("Type", a.kind.to_string()),
        ("Priority", output::badge(&a.priority.to_string(), priority_tone(a.priority), color)),
        ("Status", output::badge(&a.status.to_string(), status_tone(a.status), color)),
        ("Visible to", scope),
        ("Created by", a.created_by.to_string()),
        ("Created", util::fmt_time(Some(a.created_at))),
        ("Starts", util::fmt_time(a.start_time)),
        ("Scheduled", util::fmt_time(a.scheduled_time)),
        ("ETA", util::fmt_time(a.estimated_resolution_time)),
        ("Escalated", escalation),
        ("Resolved", util::fmt_time(a.actual_resolution_time)),
        ("Actions", action_names(actions)),
    ]);

    let _ = write!(out, "\n\n{}", a.description);

    if let Some(notes) = a.resolution.as_ref().and_then(|r| r.resolution_notes.as_deref()) {
        let _ = write!(out, "\n\nResolution: {notes}");
    }

    let updates = a.updates_in_order();
    if !updates.is_empty() {
        let _ = write!(out, "\n\nUpdates:");
        for u in updates {
            let by = u.updated_by.as_ref().map(ToString::to_string).unwrap_or_default();
            let _ = write!(
                out,
                "\n  {} [{}] {} {}",
                util::fmt_time(Some(u.timestamp)),
                u.update_type,
                u.message,
                by
            );
        }
    }
    out
}

fn print_alert(a: &Alert, actions: &[AlertAction], global: &GlobalOpts) {
    let color = util::color(global);
    let out = output::render_single(
        global.output,
        a,
        |a| alert_detail(a, actions, color),
        |a| a.display_id().to_owned(),
    );
    output::print_output(&out, global.quiet);
}

fn into_alert(result: CommandResult) -> Result<Alert, CliError> {
    match result {
        CommandResult::Alert(alert) => Ok(*alert),
        other => Err(CliError::Internal(format!("unexpected result: {other:?}"))),
    }
}

fn visibility(scope: VisibilityScope, targets: Vec<String>) -> Visibility {
    let mut v = Visibility {
        scope,
        ..Visibility::default()
    };
    match scope {
        VisibilityScope::All => {}
        VisibilityScope::Building => v.buildings = targets,
        VisibilityScope::Floor => v.floors = targets,
        VisibilityScope::Unit => v.units = targets,
    }
    v
}

fn counts_line(c: &AlertCounts, color: bool) -> String {
    let at = util::fmt_time(c.fetched_at);
    let critical = output::badge(
        &format!("critical {}", c.critical),
        if c.critical > 0 { Tone::Bad } else { Tone::Muted },
        color,
    );
    format!(
        "{at}  active {}  {critical}  high {}  escalated {}",
        c.active, c.high, c.escalated
    )
}

async fn watch(
    society: &Society,
    interval: Option<u64>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let poller = match interval {
        Some(secs) => {
            AlertBadgePoller::spawn(Arc::clone(society.client()), Duration::from_secs(secs))
        }
        None => society.start_alert_polling(),
    };
    let color = util::color(global);
    let mut rx = poller.subscribe();

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let counts = *rx.borrow_and_update();
                let line = match global.output {
                    OutputFormat::Table | OutputFormat::Plain => counts_line(&counts, color),
                    _ => serde_json::json!({
                        "active": counts.active,
                        "critical": counts.critical,
                        "high": counts.high,
                        "escalated": counts.escalated,
                        "fetchedAt": counts.fetched_at,
                    })
                    .to_string(),
                };
                output::print_output(&line, global.quiet);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.stop().await;
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    society: &Society,
    args: AlertsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AlertsCommand::List {
            status,
            kind,
            priority,
            search,
            escalated,
            page,
        } => {
            let mut query = util::page_query(&page);
            let mut filters = FilterSet::new();
            if let Some(s) = status {
                let s: AlertStatus = s.into();
                query.status = Some(s.to_string());
                filters.push(AlertFilter::Status(s));
            }
            if let Some(k) = kind {
                let k: AlertType = k.into();
                query.kind = Some(k.to_string());
                filters.push(AlertFilter::Type(k));
            }
            if let Some(p) = priority {
                let p: AlertPriority = p.into();
                query.priority = Some(p.to_string());
                filters.push(AlertFilter::Priority(p));
            }
            if let Some(q) = search {
                query.search = Some(q.clone());
                filters.push(AlertFilter::Search(q));
            }
            if escalated {
                filters.push(AlertFilter::Escalated);
            }

            let (result, counts) = society.alert_overview(&query).await?;
            let alerts: Vec<Alert> = filters
                .apply(result.items.as_slice())
                .into_iter()
                .cloned()
                .collect();
            let out = output::render_list(global.output, &alerts, |a| AlertRow::from(a), |a| {
                a.display_id().to_owned()
            });
            output::print_output(&out, global.quiet);
            if global.output == OutputFormat::Table {
                let p = &result.pagination;
                output::notice(
                    &output::page_footer(p.current_page, p.total_pages, p.total_items),
                    global.quiet,
                );
                output::notice(&counts_line(&counts, util::color(global)), global.quiet);
            }
            Ok(())
        }

        AlertsCommand::Active => {
            let alerts = society.active_alerts().await?;
            let out = output::render_list(global.output, &alerts, |a| AlertRow::from(a), |a| {
                a.display_id().to_owned()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Show { id } => {
            let alert = society.alert(&id).await?;
            let actions = society.alert_actions(&alert).await?;
            print_alert(&alert, &actions, global);
            Ok(())
        }

        AlertsCommand::Create {
            title,
            description,
            kind,
            priority,
            scope,
            targets,
            start,
            scheduled,
            eta,
        } => {
            let mut form = NewAlertForm::new(title, description, kind.into(), priority.into());
            form.visibility = visibility(scope.into(), targets);
            form.start_time = util::parse_time_opt("start", start.as_deref())?;
            form.scheduled_time = util::parse_time_opt("scheduled", scheduled.as_deref())?;
            form.estimated_resolution_time = util::parse_time_opt("eta", eta.as_deref())?;

            let result = society
                .execute(CoreCommand::CreateAlert(Box::new(form)))
                .await?;
            let alert = into_alert(result)?;
            output::notice(&format!("Alert {} created", alert.display_id()), global.quiet);
            print_alert(&alert, &[], global);
            Ok(())
        }

        AlertsCommand::Update {
            id,
            message,
            update_type,
        } => {
            let alert = into_alert(
                society
                    .execute(CoreCommand::AddAlertUpdate {
                        id,
                        message,
                        update_type: update_type.into(),
                    })
                    .await?,
            )?;
            output::notice(&format!("Update posted to {}", alert.display_id()), global.quiet);
            Ok(())
        }

        AlertsCommand::Escalate { id, reason } => {
            let result = society
                .execute(CoreCommand::EscalateAlert { id, reason })
                .await?;
            let alert = into_alert(result)?;
            output::notice(
                &format!(
                    "Alert {} escalated to level {}",
                    alert.display_id(),
                    alert.escalation_level()
                ),
                global.quiet,
            );
            Ok(())
        }

        AlertsCommand::Resolve { id, notes, proof } => {
            let alert = into_alert(
                society
                    .execute(CoreCommand::ResolveAlert {
                        id,
                        notes,
                        proof_images: proof,
                    })
                    .await?,
            )?;
            output::notice(&format!("Alert {} resolved", alert.display_id()), global.quiet);
            Ok(())
        }

        AlertsCommand::Watch { interval } => watch(society, interval, global).await,
    }
}
