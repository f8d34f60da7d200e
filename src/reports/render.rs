//! Printable HTML rendering of a report
//!
//! The document is self-contained: inline CSS, no scripts, no external assets.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::{RankedEntry, ReportData};

const STYLE: &str = r#"
body { font-family: Georgia, serif; color: #1f2933; margin: 2rem; }
h1 { font-size: 1.6rem; margin-bottom: 0.2rem; }
h2 { font-size: 1.15rem; border-bottom: 1px solid #cbd2d9; padding-bottom: 0.2rem; margin-top: 1.8rem; }
.meta { color: #616e7c; font-size: 0.9rem; }
.totals { display: flex; gap: 1.5rem; margin-top: 1rem; }
.totals div { border: 1px solid #cbd2d9; padding: 0.5rem 1rem; }
.totals strong { display: block; font-size: 1.3rem; }
table { border-collapse: collapse; width: 100%; margin-top: 0.5rem; }
th, td { border: 1px solid #cbd2d9; padding: 0.3rem 0.6rem; text-align: left; }
th { background: #f5f7fa; }
td.num { text-align: right; }
.empty { color: #9aa5b1; font-style: italic; }
@media print { body { margin: 0; } h2 { page-break-after: avoid; } }
"#;

fn ranked_table(title: &str, label: &str, entries: &[RankedEntry]) -> Markup {
    html! {
        h2 { (title) }
        @if entries.is_empty() {
            p.empty { "No data for this period." }
        } @else {
            table {
                thead { tr { th { "#" } th { (label) } th { "Count" } } }
                tbody {
                    @for (rank, entry) in entries.iter().enumerate() {
                        tr {
                            td.num { (rank + 1) }
                            td { (entry.label) }
                            td.num { (entry.count) }
                        }
                    }
                }
            }
        }
    }
}

/// Render `report` as a standalone HTML document titled after `library_name`.
pub fn render_html(report: &ReportData, library_name: &str) -> String {
    let totals = &report.totals;
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (library_name) " - Activity report" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { (library_name) " - Activity report" }
                p.meta {
                    "Last " (report.window.days()) " days, generated "
                    (report.generated_at.format("%Y-%m-%d %H:%M UTC"))
                }
                div.totals {
                    div { strong { (totals.loans_in_window) } "loans in period" }
                    div { strong { (totals.active_loans) } "active loans" }
                    div { strong { (report.overdue_loans.len()) } "overdue" }
                    div { strong { (totals.books) } "books" }
                    div { strong { (totals.copies) } "copies" }
                    div { strong { (totals.users) } "users" }
                }

                (ranked_table("Most borrowed books", "Title", &report.most_borrowed_books))
                (ranked_table("Most active users", "User", &report.most_active_users))

                h2 { "Overdue loans" }
                @if report.overdue_loans.is_empty() {
                    p.empty { "No overdue loans." }
                } @else {
                    table {
                        thead {
                            tr { th { "Loan" } th { "Title" } th { "User" } th { "Due" } th { "Days late" } }
                        }
                        tbody {
                            @for entry in &report.overdue_loans {
                                tr {
                                    td.num { (entry.loan_id) }
                                    td { (entry.book_title) }
                                    td { (entry.user_name) }
                                    td { (entry.due_date.format("%Y-%m-%d")) }
                                    td.num { (entry.days_overdue) }
                                }
                            }
                        }
                    }
                }

                (ranked_table("Copies by condition", "Condition", &report.copies_by_condition))
                (ranked_table("Books by publisher", "Publisher", &report.books_by_publisher))
                (ranked_table("Books by author", "Author", &report.books_by_author))
            }
        }
    };
    markup.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{OverdueEntry, ReportTotals, ReportWindow};

    fn report() -> ReportData {
        ReportData {
            generated_at: "2024-06-30T12:00:00Z".parse().unwrap(),
            window: ReportWindow::Month,
            totals: ReportTotals {
                books: 3,
                users: 2,
                copies: 4,
                active_loans: 1,
                loans_in_window: 2,
            },
            most_borrowed_books: vec![RankedEntry {
                label: "<script>alert(1)</script>".into(),
                count: 2,
            }],
            most_active_users: vec![],
            overdue_loans: vec![OverdueEntry {
                loan_id: 9,
                book_title: "Emma".into(),
                user_name: "Ada".into(),
                due_date: "2024-06-01T00:00:00Z".parse().unwrap(),
                days_overdue: 29,
            }],
            copies_by_condition: vec![],
            books_by_publisher: vec![],
            books_by_author: vec![],
        }
    }

    #[test]
    fn test_document_is_self_contained() {
        let html = render_html(&report(), "Yeti Library");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("href="));
        assert!(!html.contains("src="));
    }

    #[test]
    fn test_values_are_interpolated_and_escaped() {
        let html = render_html(&report(), "Yeti & Co");
        assert!(html.contains("Yeti &amp; Co"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Last 30 days"));
        assert!(html.contains("2024-06-01"));
        assert!(html.contains("No data for this period."));
    }
}
