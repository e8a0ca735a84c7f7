use edgar13f_lib::{AnalysisReport, DeltaRow};
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Company (Ticker)")]
    company: String,
    #[tabled(rename = "% Port")]
    weight: String,
    #[tabled(rename = "Wt Chg (pp)")]
    weight_change: String,
    #[tabled(rename = "Shares Chg")]
    share_change: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn build_rows(rows: &[DeltaRow]) -> Vec<ReportRow> {
    rows.iter()
        .enumerate()
        .map(|(i, r)| ReportRow {
            rank: i + 1,
            company: format!("{} ({})", truncate(&r.company_name, 30), r.ticker),
            weight: format!("{:.2}", r.weight_current),
            weight_change: format!("{:+.2}", r.weight_change),
            share_change: r
                .share_change_pct
                .map(|pct| format!("{:+.2}%", pct))
                .unwrap_or_else(|| "N/A".to_string()),
            status: r.status.to_string(),
        })
        .collect()
}

pub fn print_report(report: &AnalysisReport) {
    println!(
        "CIK {}: {} vs {}",
        report.cik, report.current_accession, report.previous_accession
    );
    if !report.has_previous_data {
        println!("No previous-period holdings found; every position reads as new.");
    }

    print_section("TOP HOLDINGS", &report.top_holdings);
    print_section("TOP BUYS", &report.top_buys);
    print_section("TOP SELLS", &report.top_sells);
}

fn print_section(title: &str, rows: &[DeltaRow]) {
    println!("\n{}", title);
    if rows.is_empty() {
        println!("(none)");
        return;
    }
    println!("{}", Table::new(build_rows(rows)));
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn truncate(name: &str, max_chars: usize) -> String {
    match name.char_indices().nth(max_chars) {
        Some((idx, _)) => name[..idx].to_string(),
        None => name.to_string(),
    }
}
