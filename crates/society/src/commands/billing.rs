//! Billing command handlers.

use chrono::{DateTime, Utc};
use tabled::Tabled;

use society_core::types::{
    Bill, BillStatus, BillTarget, BillType, BillingAnalytics, Payment, VisibilityScope,
};
use society_core::validation::{BulkBillForm, ManualPaymentForm};
use society_core::{BillFilter, Command as CoreCommand, CommandResult, FilterSet, Society};

use crate::cli::{BillingArgs, BillingCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "Bill")]
    number: String,
    #[tabled(rename = "Flat")]
    flat: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Outstanding")]
    outstanding: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl BillRow {
    fn new(b: &Bill, now: DateTime<Utc>) -> Self {
        let status = if b.is_overdue(now) {
            format!("{} ({}d overdue)", b.status, b.days_overdue(now))
        } else {
            b.status.to_string()
        };
        Self {
            number: b.display_id().to_owned(),
            flat: b.flat_number.clone().unwrap_or_default(),
            kind: b.bill_type.to_string(),
            total: util::fmt_money(b.total_amount),
            outstanding: util::fmt_money(b.outstanding()),
            due: b.due_date.format("%Y-%m-%d").to_string(),
            status,
        }
    }
}

#[derive(Tabled)]
struct PaymentRow {
    #[tabled(rename = "Payment")]
    id: String,
    #[tabled(rename = "Bill")]
    bill: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Paid")]
    paid: String,
}

impl From<&Payment> for PaymentRow {
    fn from(p: &Payment) -> Self {
        Self {
            id: p.display_id().to_owned(),
            bill: p.bill.as_ref().map(|b| b.id().to_owned()).unwrap_or_default(),
            amount: util::fmt_money(p.amount),
            method: p.method.to_string(),
            status: p.status.to_string(),
            paid: util::fmt_time(p.paid_at),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn status_tone(b: &Bill, now: DateTime<Utc>) -> Tone {
    if b.is_overdue(now) {
        return Tone::Bad;
    }
    match b.status {
        BillStatus::Paid => Tone::Good,
        BillStatus::Pending | BillStatus::PartiallyPaid => Tone::Warn,
        BillStatus::Overdue => Tone::Bad,
        BillStatus::Cancelled => Tone::Muted,
    }
}

fn bill_detail(b: &Bill, now: DateTime<Utc>, color: bool) -> String {
    let items = b
        .items
        .iter()
        .map(|i| format!("{} {}", i.description, util::fmt_money(i.amount)))
        .collect::<Vec<_>>()
        .join("; ");
    output::detail_lines(&[
        ("Bill", b.display_id().to_owned()),
        ("Resident", b.resident.as_ref().map(ToString::to_string).unwrap_or_default()),
        ("Flat", b.flat_number.clone().unwrap_or_default()),
        ("Type", b.bill_type.to_string()),
        ("Description", b.description.clone().unwrap_or_default()),
        ("Items", items),
        ("Total", util::fmt_money(b.total_amount)),
        ("Paid", util::fmt_money(b.paid_amount)),
        ("Outstanding", util::fmt_money(b.outstanding())),
        ("Due", util::fmt_time(Some(b.due_date))),
        ("Status", output::badge(&b.status.to_string(), status_tone(b, now), color)),
    ])
}

fn analytics_detail(a: &BillingAnalytics) -> String {
    let mut by_status: Vec<_> = a.by_status.iter().collect();
    by_status.sort();
    let by_status = by_status
        .into_iter()
        .map(|(k, v)| format!("{k} {v}"))
        .collect::<Vec<_>>()
        .join(", ");
    output::detail_lines(&[
        ("Billed", util::fmt_money(a.total_billed)),
        ("Collected", util::fmt_money(a.total_collected)),
        ("Outstanding", util::fmt_money(a.total_outstanding)),
        ("Collection rate", format!("{:.1}%", a.collection_rate)),
        ("Overdue bills", a.overdue_count.to_string()),
        ("By status", by_status),
    ])
}

fn collection_line(a: &BillingAnalytics) -> String {
    format!(
        "Outstanding {} across {} overdue bill(s), {:.1}% collected",
        util::fmt_money(a.total_outstanding),
        a.overdue_count,
        a.collection_rate
    )
}

fn bill_target(scope: VisibilityScope, targets: Vec<String>) -> BillTarget {
    match scope {
        VisibilityScope::Building => BillTarget {
            scope,
            buildings: targets,
            units: Vec::new(),
        },
        VisibilityScope::Unit => BillTarget {
            scope,
            buildings: Vec::new(),
            units: targets,
        },
        VisibilityScope::All | VisibilityScope::Floor => BillTarget {
            scope,
            ..BillTarget::default()
        },
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    society: &Society,
    args: BillingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let now = Utc::now();

    match args.command {
        BillingCommand::Bills {
            admin,
            status,
            bill_type,
            overdue,
            search,
            page,
        } => {
            let mut query = util::page_query(&page);
            let mut filters = FilterSet::new();
            if let Some(s) = status {
                let s: BillStatus = s.into();
                query.status = Some(s.to_string());
                filters.push(BillFilter::Status(s));
            }
            if let Some(t) = bill_type {
                let t: BillType = t.into();
                query.kind = Some(t.to_string());
                filters.push(BillFilter::Type(t));
            }
            if let Some(q) = search {
                query.search = Some(q.clone());
                filters.push(BillFilter::Search(q));
            }
            if overdue {
                filters.push(BillFilter::Overdue(now));
            }

            let (result, analytics) = if admin {
                let (analytics, bills) = society.billing_overview(&query).await?;
                (bills, Some(analytics))
            } else {
                (society.my_bills(&query).await?, None)
            };
            let bills: Vec<Bill> = filters
                .apply(result.items.as_slice())
                .into_iter()
                .cloned()
                .collect();
            let out = output::render_list(
                global.output,
                &bills,
                |b| BillRow::new(b, now),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if global.output == OutputFormat::Table {
                let p = &result.pagination;
                output::notice(
                    &output::page_footer(p.current_page, p.total_pages, p.total_items),
                    global.quiet,
                );
                if let Some(a) = analytics {
                    output::notice(&collection_line(&a), global.quiet);
                }
            }
            Ok(())
        }

        BillingCommand::Show { id } => {
            let bill = society.bill(&id).await?;
            let color = util::color(global);
            let out = output::render_single(
                global.output,
                &bill,
                |b| bill_detail(b, now, color),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BillingCommand::Payments { page } => {
            let result = society.my_payments(&util::page_query(&page)).await?;
            let out = output::render_list(
                global.output,
                &result.items,
                |p| PaymentRow::from(p),
                |p| p.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BillingCommand::Analytics => {
            let analytics = society.billing_analytics().await?;
            let out = output::render_single(global.output, &analytics, analytics_detail, |a| {
                util::fmt_money(a.total_outstanding)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BillingCommand::Generate {
            bill_type,
            amount,
            due,
            description,
            scope,
            targets,
        } => {
            let form = BulkBillForm {
                bill_type: bill_type.into(),
                amount,
                due_date: util::parse_time("due", &due)?,
                description,
                target: bill_target(scope.into(), targets),
            };
            if !util::confirm(
                &format!(
                    "Generate {} bills of {} for {}?",
                    form.bill_type,
                    util::fmt_money(amount),
                    form.target.scope
                ),
                global.yes,
            )? {
                return Ok(());
            }

            let result = society
                .execute(CoreCommand::GenerateBills(Box::new(form)))
                .await?;
            let CommandResult::BillsGenerated(summary) = result else {
                return Err(CliError::Internal("unexpected result".into()));
            };
            output::notice(
                &format!(
                    "Generated {} bill(s), skipped {}",
                    summary.generated, summary.skipped
                ),
                global.quiet,
            );
            Ok(())
        }

        BillingCommand::RecordPayment {
            bill_id,
            amount,
            method,
            transaction_id,
            notes,
        } => {
            let form = ManualPaymentForm {
                bill_id,
                amount,
                method: method.into(),
                transaction_id,
                notes,
                paid_at: Some(now),
            };
            let result = society
                .execute(CoreCommand::RecordPayment(Box::new(form)))
                .await?;
            let CommandResult::Payment(payment) = result else {
                return Err(CliError::Internal("unexpected result".into()));
            };
            output::notice(
                &format!(
                    "Recorded payment {} of {}",
                    payment.display_id(),
                    util::fmt_money(payment.amount)
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn building_targets_go_to_buildings() {
        let t = bill_target(VisibilityScope::Building, vec!["A".into(), "B".into()]);
        assert_eq!(t.buildings, vec!["A".to_owned(), "B".to_owned()]);
        assert!(t.units.is_empty());
    }

    #[test]
    fn collection_line_summarises_analytics() {
        let a = BillingAnalytics {
            total_outstanding: 1250.0,
            overdue_count: 3,
            collection_rate: 87.456,
            ..BillingAnalytics::default()
        };
        assert_eq!(
            collection_line(&a),
            "Outstanding 1250.00 across 3 overdue bill(s), 87.5% collected"
        );
    }

    #[test]
    fn society_wide_target_drops_stray_targets() {
        let t = bill_target(VisibilityScope::All, vec!["A".into()]);
        assert_eq!(t, BillTarget::default());
    }
}
