//! Parking violation command handlers.

use std::io::Write;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use society_core::review::reviewable_ids;
use society_core::types::{ListQuery, ReviewAction, Violation, ViolationStatus};
use society_core::{
    BulkReviewOutcome, Command as CoreCommand, CommandResult, FilterSet, Society, ViolationFilter,
};

use crate::cli::{GlobalOpts, OutputFormat, ParkingArgs, ParkingCommand};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

const PENDING_SELECTION_LIMIT: u32 = 100;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ViolationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Fine")]
    fine: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reported")]
    reported: String,
}

impl From<&Violation> for ViolationRow {
    fn from(v: &Violation) -> Self {
        Self {
            id: v.display_id().to_owned(),
            vehicle: v.vehicle_number.clone(),
            category: v.category.name.clone(),
            location: v.location.clone().unwrap_or_default(),
            fine: util::fmt_money(v.effective_fine()),
            status: if v.has_pending_appeal() {
                format!("{} (appeal)", v.status)
            } else {
                v.status.to_string()
            },
            reported: util::fmt_time(Some(v.created_at)),
        }
    }
}

fn status_tone(status: ViolationStatus) -> Tone {
    match status {
        ViolationStatus::Pending | ViolationStatus::UnderReview => Tone::Warn,
        ViolationStatus::Approved => Tone::Bad,
        ViolationStatus::Rejected | ViolationStatus::Dismissed => Tone::Muted,
        ViolationStatus::Resolved => Tone::Good,
    }
}

fn violation_detail(v: &Violation, color: bool) -> String {
    let review = v.admin_review.as_ref();
    output::detail_lines(&[
        ("ID", v.display_id().to_owned()),
        ("Vehicle", v.vehicle_number.clone()),
        ("Category", v.category.name.clone()),
        ("Fine", util::fmt_money(v.effective_fine())),
        ("Status", output::badge(&v.status.to_string(), status_tone(v.status), color)),
        ("Location", v.location.clone().unwrap_or_default()),
        ("Reported by", v.reported_by.as_ref().map(ToString::to_string).unwrap_or_default()),
        ("Reported", util::fmt_time(Some(v.created_at))),
        (
            "Reviewed by",
            review
                .and_then(|r| r.reviewed_by.as_ref())
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        ("Review notes", review.and_then(|r| r.notes.clone()).unwrap_or_default()),
        ("Description", v.description.clone().unwrap_or_default()),
    ])
}

fn print_bulk_outcome(outcome: &BulkReviewOutcome, global: &GlobalOpts) {
    match global.output {
        OutputFormat::Table => {
            output::notice(&outcome.message, global.quiet);
            if !outcome.failed_ids.is_empty() {
                output::notice(
                    &format!("Failed: {}", outcome.failed_ids.join(", ")),
                    global.quiet,
                );
            }
        }
        OutputFormat::Plain => output::print_output(&outcome.failed_ids.join("\n"), global.quiet),
        _ => {
            let value = serde_json::json!({
                "successful": outcome.successful,
                "failed": outcome.failed,
                "failedIds": outcome.failed_ids,
                "message": outcome.message,
            });
            let out = output::render_single(
                global.output,
                &value,
                ToString::to_string,
                ToString::to_string,
            );
            output::print_output(&out, global.quiet);
        }
    }
}

fn spinner(message: &'static str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    society: &Society,
    args: ParkingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ParkingCommand::List {
            pending,
            status,
            search,
            category,
            page,
        } => {
            let mut query = util::page_query(&page);
            let mut filters = FilterSet::new();
            if let Some(s) = status {
                let s: ViolationStatus = s.into();
                query.status = Some(s.to_string());
                filters.push(ViolationFilter::Status(s));
            }
            if let Some(q) = search {
                query.search = Some(q.clone());
                filters.push(ViolationFilter::Search(q));
            }
            if let Some(c) = category {
                filters.push(ViolationFilter::Category(c));
            }

            let result = if pending {
                society.pending_violations(&query).await?
            } else {
                society.violations(&query).await?
            };
            let violations: Vec<Violation> = filters
                .apply(result.items.as_slice())
                .into_iter()
                .cloned()
                .collect();
            let out = output::render_list(
                global.output,
                &violations,
                |v| ViolationRow::from(v),
                |v| v.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if global.output == OutputFormat::Table {
                let p = &result.pagination;
                output::notice(
                    &output::page_footer(p.current_page, p.total_pages, p.total_items),
                    global.quiet,
                );
            }
            Ok(())
        }

        ParkingCommand::Review {
            id,
            action,
            notes,
            fine,
        } => {
            let result = society
                .execute(CoreCommand::ReviewViolation {
                    id,
                    action: action.into(),
                    notes,
                    fine_amount: fine,
                })
                .await?;
            let violation = match result {
                CommandResult::Violation(v) => *v,
                other => return Err(CliError::Internal(format!("unexpected result: {other:?}"))),
            };
            output::notice(
                &format!("Violation {} is now {}", violation.display_id(), violation.status),
                global.quiet,
            );
            let color = util::color(global);
            let out = output::render_single(
                global.output,
                &violation,
                |v| violation_detail(v, color),
                |v| v.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ParkingCommand::BulkReview {
            ids,
            all_pending,
            action,
            notes,
        } => {
            let action: ReviewAction = action.into();
            let ids = if all_pending {
                let page = society
                    .pending_violations(&ListQuery::page(1, PENDING_SELECTION_LIMIT))
                    .await?;
                reviewable_ids(&page.items, action)
            } else {
                ids
            };
            let result = society
                .execute(CoreCommand::BulkReviewViolations { ids, action, notes })
                .await?;
            let outcome = match result {
                CommandResult::BulkReview(outcome) => outcome,
                other => return Err(CliError::Internal(format!("unexpected result: {other:?}"))),
            };
            print_bulk_outcome(&outcome, global);
            Ok(())
        }

        ParkingCommand::Export {
            format,
            status,
            out,
        } => {
            let pb = spinner("Exporting violations", global.quiet || out.is_none());
            let bytes = society
                .export_violations(format.into(), status.map(Into::into))
                .await;
            pb.finish_and_clear();
            let bytes = bytes?;

            match out {
                Some(path) => {
                    std::fs::write(&path, &bytes)?;
                    output::notice(
                        &format!("Wrote {} bytes to {}", bytes.len(), path.display()),
                        global.quiet,
                    );
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&bytes)?;
                    stdout.flush()?;
                }
            }
            Ok(())
        }
    }
}
