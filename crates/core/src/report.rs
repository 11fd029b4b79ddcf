//! HTML report rendering for inspections and quality reports.
//!
//! Output is a self-contained HTML document meant for print-to-PDF. All
//! user-supplied text is escaped; signatures are only embedded when they are
//! inline `data:image/` URIs.

use crate::inspection::Outcome;
use crate::quality_report::FinalizedQualityReport;
use crate::signature::FinalizedInspection;
use crate::types::Timestamp;

const STYLE: &str = "body{font-family:sans-serif;margin:24px;color:#222}\
table{border-collapse:collapse;width:100%;margin:12px 0}\
th,td{border:1px solid #ccc;padding:6px;text-align:left;font-size:13px}\
th{background:#f0f0f0}.fail{color:#b00020;font-weight:bold}.pass{color:#1b5e20}\
.status{font-size:18px;font-weight:bold}.sig img{max-height:80px}";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn format_ts(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title>\
         <style>{STYLE}</style></head><body>{body}</body></html>",
        escape_html(title)
    )
}

fn signature_cell(label: &str, data: &str) -> String {
    let content = if data.starts_with("data:image/") {
        format!("<img src=\"{}\" alt=\"{}\">", escape_html(data), escape_html(label))
    } else {
        "<em>signature on file</em>".to_string()
    };
    format!(
        "<td class=\"sig\"><div>{}</div>{content}</td>",
        escape_html(label)
    )
}

// ---------------------------------------------------------------------------
// Inspections
// ---------------------------------------------------------------------------

/// Full report for a single inspection.
pub fn render_inspection(record: &FinalizedInspection) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<h1>Vehicle Inspection: {}</h1>",
        escape_html(&record.meta.truck_number)
    ));
    body.push_str(&format!(
        "<table><tr><th>Driver</th><td>{}</td><th>Transporter</th><td>{}</td></tr>\
         <tr><th>Depot</th><td>{}</td><th>Inspector</th><td>{}</td></tr>\
         <tr><th>Date</th><td colspan=\"3\">{}</td></tr></table>",
        escape_html(&record.meta.driver_name),
        escape_html(&record.meta.transporter),
        escape_html(&record.meta.depot),
        escape_html(&record.inspector_name),
        format_ts(&record.created_at),
    ));
    body.push_str(&format!(
        "<p class=\"status\">Status: {} ({} issue{})</p>",
        record.status.as_str(),
        record.issue_count,
        if record.issue_count == 1 { "" } else { "s" }
    ));

    body.push_str("<table><tr><th>#</th><th>Item</th><th>Result</th><th>Severity</th><th>Note</th></tr>");
    for (i, r) in record.responses.iter().enumerate() {
        let (class, result) = match r.outcome {
            Outcome::Pass => ("pass", "PASS"),
            Outcome::Fail => ("fail", "FAIL"),
        };
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}<br><small>{}</small></td><td class=\"{class}\">{result}</td><td>{}</td><td>{}</td></tr>",
            i + 1,
            escape_html(&r.title),
            escape_html(&r.description),
            r.severity.map(|s| s.as_str()).unwrap_or(""),
            escape_html(r.note.as_deref().unwrap_or("")),
        ));
    }
    body.push_str("</table>");

    body.push_str("<table><tr>");
    body.push_str(&signature_cell("Driver", &record.driver_signature));
    body.push_str(&signature_cell("Inspector", &record.inspector_signature));
    body.push_str("</tr></table>");

    document(
        &format!("Inspection {}", record.meta.truck_number),
        &body,
    )
}

/// Tabular log of many inspections, in the order given.
pub fn render_inspection_log(records: &[FinalizedInspection]) -> String {
    let mut body = String::from("<h1>Inspection Log</h1>");
    body.push_str(&format!("<p>{} inspection(s)</p>", records.len()));
    body.push_str(
        "<table><tr><th>Date</th><th>Truck</th><th>Driver</th><th>Depot</th>\
         <th>Inspector</th><th>Status</th><th>Issues</th></tr>",
    );
    for r in records {
        let class = if r.status.needs_attention() { "fail" } else { "pass" };
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{class}\">{}</td><td>{}</td></tr>",
            format_ts(&r.created_at),
            escape_html(&r.meta.truck_number),
            escape_html(&r.meta.driver_name),
            escape_html(&r.meta.depot),
            escape_html(&r.inspector_name),
            r.status.as_str(),
            r.issue_count,
        ));
    }
    body.push_str("</table>");
    document("Inspection Log", &body)
}

// ---------------------------------------------------------------------------
// Quality reports
// ---------------------------------------------------------------------------

pub fn render_quality_report(record: &FinalizedQualityReport) -> String {
    let d = &record.draft;
    let mut body = String::new();
    body.push_str(&format!(
        "<h1>Quality Report: {}</h1>",
        escape_html(&d.truck_number)
    ));
    body.push_str(&format!(
        "<table><tr><th>Company</th><td>{}</td><th>Product</th><td>{}</td></tr>\
         <tr><th>Depot</th><td>{}</td><th>Inspector</th><td>{}</td></tr>\
         <tr><th>Date</th><td colspan=\"3\">{}</td></tr></table>",
        escape_html(&d.company_name),
        escape_html(&d.product),
        escape_html(&d.depot),
        escape_html(&record.inspector_name),
        format_ts(&record.created_at),
    ));

    body.push_str("<h2>Compartments</h2><table><tr><th>#</th><th>Litres</th><th>Certificate level</th><th>Product level</th></tr>");
    for (i, c) in d.compartments.iter().enumerate() {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            i + 1,
            c.litres,
            escape_html(&c.certificate_level),
            escape_html(&c.product_level),
        ));
    }
    body.push_str(&format!(
        "<tr><th>Total</th><td colspan=\"3\">{}</td></tr></table>",
        d.total_litres()
    ));

    let q = &d.quality_params;
    body.push_str(&format!(
        "<h2>Quality</h2><table><tr><th>Density</th><td>{}</td></tr>\
         <tr><th>Temperature</th><td>{}</td></tr><tr><th>Appearance</th><td>{}</td></tr>\
         <tr><th>Water test</th><td>{}</td></tr><tr><th>Remarks</th><td>{}</td></tr></table>",
        escape_html(&q.density),
        escape_html(&q.temperature),
        escape_html(&q.appearance),
        escape_html(&q.water_test),
        escape_html(q.remarks.as_deref().unwrap_or("")),
    ));

    body.push_str("<table><tr>");
    body.push_str(&signature_cell("Inspector", &record.inspector_signature));
    body.push_str(&signature_cell(
        &format!("Sealer: {}", d.sealer_name),
        &record.sealer_signature,
    ));
    body.push_str("</tr></table>");

    document(&format!("Quality Report {}", d.truck_number), &body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
