//! HTML email composition for search results.

use quick_xml::escape::escape;
use rathunter_core::{AugmentedRecord, RunMetadata};

use crate::columns::cell_value;

/// Columns shown in the results table, in display order.
pub const EMAIL_COLUMNS: [&str; 8] = [
    "name",
    "address",
    "last_updated_mins_ago",
    "price_in_dollars",
    "google_maps_url",
    "status",
    "verified",
    "date_local_time",
];

const SOURCE_SITE: &str = "https://findarat.com.au/";
const LAST_RUN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A composed message, ready for a [`crate::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
}

/// Builds the "locations found" email for a non-empty table.
///
/// Rows are ordered by minutes since update, freshest first; ties keep their
/// table order.
#[must_use]
pub fn compose_results_email(table: &[AugmentedRecord], metadata: &RunMetadata) -> EmailContent {
    let total = table.len();
    let subject = format!("RAT Hunter: {total} \u{1f400} locations found");

    let mut rows: Vec<&AugmentedRecord> = table.iter().collect();
    rows.sort_by_key(|row| row.last_updated_mins_ago);

    let html_body = format!(
        "<html>\
         <head>RAT hunter has detected <b>{total}</b> locations with RATs using the search query: \
         <b>{query}</b>, last updated at: <b>{last_run}</b></head>\
         <body>\
         <h4><b>All times below are in local timezone</b>: {tz} </h4>\
         <br>\
         <p>Hello fellow RAT hunter,<br>\
         I've found some pesky RATs!:<br>\
         {table}\
         <br>Regards,<br>The RAT hunter \u{1f400}\u{1f400}\u{1f400}</p>\
         {footer}\
         </body>\
         </html>",
        query = escape(metadata.search_query.as_str()),
        last_run = last_run_text(metadata),
        tz = escape(metadata.timezone_name.as_str()),
        table = html_table(&rows),
        footer = footer(),
    );

    tracing::debug!(subject = %subject, rows = total, "composed results email");
    EmailContent {
        subject,
        html_body: strip_newlines(&html_body),
    }
}

/// Builds the "no results" email.
#[must_use]
pub fn compose_no_results_email(metadata: &RunMetadata) -> EmailContent {
    let subject = "RAT Hunter: We're rat out of luck!".to_string();
    let html_body = format!(
        "<html>\
         <head>RAT hunter didn't find any locations with RATs using the search query: \
         <b>{query}</b>, last updated at: <b>{last_run}</b></head>\
         <body>\
         <br>\
         <p>Unfortunately, we couldn't find any RATs available in your requested search area. \
         Hopefully we find some next time.<br>\
         <br>Regards,<br>The RAT hunter \u{1f400}\u{1f400}\u{1f400}</p>\
         {footer}\
         </body>\
         </html>",
        query = escape(metadata.search_query.as_str()),
        last_run = last_run_text(metadata),
        footer = footer(),
    );

    tracing::debug!(subject = %subject, "composed no-results email");
    EmailContent {
        subject,
        html_body: strip_newlines(&html_body),
    }
}

fn html_table(rows: &[&AugmentedRecord]) -> String {
    let mut out = String::from("<table border=\"1\" style=\"border-collapse:collapse;font-family:Arial, Helvetica, sans-serif;font-size:small;text-align:center\"><thead><tr>");
    for column in EMAIL_COLUMNS {
        out.push_str(&format!("<th>{column}</th>"));
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows {
        out.push_str("<tr>");
        for column in EMAIL_COLUMNS {
            let value = cell_value(row, column);
            out.push_str(&format!("<td>{}</td>", escape(value.as_str())));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

fn last_run_text(metadata: &RunMetadata) -> String {
    metadata.last_run.format(LAST_RUN_FORMAT).to_string()
}

fn footer() -> String {
    format!(
        "<h3>This data is automatically parsed from the <a href=\"{SOURCE_SITE}\">Find a RAT Website</a></h3>"
    )
}

// Some mail clients render literal newlines inside HTML bodies as breaks.
fn strip_newlines(body: &str) -> String {
    body.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}
