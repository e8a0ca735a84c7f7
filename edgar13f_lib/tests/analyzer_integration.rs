use edgar13f_lib::{Analyzer, AnalyzerError, PositionStatus};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CIK: u64 = 1067983;
const ACC_CURRENT: &str = "0000950123-24-011775";
const ACC_AMENDED: &str = "0000950123-24-008740";
const ACC_PREVIOUS: &str = "0000950123-24-005518";

fn submissions_body(filings: &[(&str, &str, &str)]) -> String {
    let forms: Vec<&str> = filings.iter().map(|f| f.0).collect();
    let accessions: Vec<&str> = filings.iter().map(|f| f.1).collect();
    let dates: Vec<&str> = filings.iter().map(|f| f.2).collect();
    json!({
        "cik": CIK.to_string(),
        "filings": {
            "recent": {
                "form": forms,
                "accessionNumber": accessions,
                "filingDate": dates,
            }
        }
    })
    .to_string()
}

fn info_table_xml(entries: &[(&str, &str, i64, i64)]) -> String {
    let mut xml = String::from(
        "<informationTable xmlns=\"http://www.sec.gov/edgar/document/thirteenf/informationtable\">\n",
    );
    for (name, cusip, value_thousands, shares) in entries {
        xml.push_str(&format!(
            "<infoTable><nameOfIssuer>{name}</nameOfIssuer><cusip>{cusip}</cusip>\
             <value>{value_thousands}</value>\
             <shrsOrPrnAmt><sshPrnamt>{shares}</sshPrnamt><sshPrnamtType>SH</sshPrnamtType></shrsOrPrnAmt>\
             </infoTable>\n"
        ));
    }
    xml.push_str("</informationTable>\n");
    xml
}

fn archive_path(accession: &str, file: &str) -> String {
    format!(
        "/Archives/edgar/data/{}/{}/{}",
        CIK,
        accession.replace('-', ""),
        file
    )
}

async fn mount_submissions(server: &MockServer, filings: &[(&str, &str, &str)]) {
    Mock::given(method("GET"))
        .and(path(format!("/submissions/CIK{:010}.json", CIK)))
        .respond_with(ResponseTemplate::new(200).set_body_string(submissions_body(filings)))
        .mount(server)
        .await;
}

/// Mounts a filing's directory index listing one XML table document.
async fn mount_filing_directory(server: &MockServer, accession: &str, file: &str, body: &str) {
    let dir_name = format!(
        "/Archives/edgar/data/{}/{}",
        CIK,
        accession.replace('-', "")
    );
    let index = json!({
        "directory": {
            "name": dir_name,
            "item": [
                {"name": format!("{accession}-index.htm"), "type": "text.gif", "size": ""},
                {"name": file, "type": "text.gif", "size": "1024"},
            ]
        }
    });
    Mock::given(method("GET"))
        .and(path(archive_path(accession, "index.json")))
        .respond_with(ResponseTemplate::new(200).set_body_string(index.to_string()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(archive_path(accession, file)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn test_analyzer(server: &MockServer) -> Analyzer {
    Analyzer::with_base_urls("Research analysis@example.com", &server.uri(), &server.uri())
        .unwrap()
}

#[tokio::test]
async fn analyze_compares_two_filings_and_scans_past_cover_amendment() {
    let server = MockServer::start().await;
    mount_submissions(
        &server,
        &[
            ("13F-HR", ACC_CURRENT, "2024-11-14"),
            // Amendment with no holdings table anywhere; the locator must
            // scan past it. Nothing mounted for it, so every tier misses.
            ("13F-HR/A", ACC_AMENDED, "2024-08-14"),
            ("13F-HR", ACC_PREVIOUS, "2024-05-15"),
            ("10-K", "0000950123-24-000001", "2024-02-01"),
        ],
    )
    .await;

    let current_xml = info_table_xml(&[
        ("ACME CORP", "123456789", 600, 100),
        ("BETA INDUSTRIES", "987654321", 400, 200),
    ]);
    mount_filing_directory(&server, ACC_CURRENT, "form13fInfoTable.xml", &current_xml).await;

    let previous_xml = info_table_xml(&[
        ("ACME CORP", "123456789", 400, 50),
        ("GAMMA LLC", "111111111", 100, 10),
    ]);
    // Numeric-named table document, as some filings ship.
    mount_filing_directory(&server, ACC_PREVIOUS, "39042.xml", &previous_xml).await;

    let analyzer = test_analyzer(&server);
    let report = analyzer.analyze(&CIK.to_string(), false, false).await.unwrap();

    assert_eq!(report.current_accession, ACC_CURRENT);
    assert_eq!(report.previous_accession, ACC_PREVIOUS);
    assert!(report.has_previous_data);
    assert_eq!(report.rows.len(), 3);

    let row = |cusip: &str| {
        report
            .rows
            .iter()
            .find(|r| r.cusip == cusip)
            .unwrap_or_else(|| panic!("no row for {}", cusip))
    };

    let acme = row("12345678");
    assert_eq!(acme.status, PositionStatus::Change);
    assert_eq!(acme.weight_current, 60.0);
    assert_eq!(acme.weight_previous, 80.0);
    assert_eq!(acme.share_change_abs, 50);
    assert_eq!(acme.share_change_pct, Some(100.0));

    let beta = row("98765432");
    assert_eq!(beta.status, PositionStatus::New);
    assert_eq!(beta.weight_current, 40.0);

    let gamma = row("11111111");
    assert_eq!(gamma.status, PositionStatus::Exit);
    assert_eq!(gamma.current_value, 0.0);

    // Holdings by current weight; Beta is the only real buy, Gamma the
    // only real sell (Acme added shares but lost weight).
    let holdings: Vec<&str> = report.top_holdings.iter().map(|r| r.cusip.as_str()).collect();
    assert_eq!(holdings, ["12345678", "98765432"]);
    let buys: Vec<&str> = report.top_buys.iter().map(|r| r.cusip.as_str()).collect();
    assert_eq!(buys, ["98765432"]);
    let sells: Vec<&str> = report.top_sells.iter().map(|r| r.cusip.as_str()).collect();
    assert_eq!(sells, ["11111111"]);
}

#[tokio::test]
async fn fetch_falls_back_to_primary_txt_document() {
    let server = MockServer::start().await;

    let txt = "\
<SEC-DOCUMENT>0000950123-24-005518.txt
<informationTable>
NAME OF ISSUER            CUSIP      VALUE    SHARES
ALPHA CORP                11111111A  1,200    48,000
BETA INC                  22222222B  2,500    90,000
GAMMA LLC                 33333333C    900    30,000
DELTA CO                  44444444D    400    10,000
EPSILON PLC               55555555E    700    25,000
</informationTable>
<SIGNATURE>
";
    Mock::given(method("GET"))
        .and(path(archive_path(
            ACC_PREVIOUS,
            &format!("{ACC_PREVIOUS}.txt"),
        )))
        .respond_with(ResponseTemplate::new(200).set_body_string(txt))
        .mount(&server)
        .await;

    let analyzer = test_analyzer(&server);
    let content = analyzer.fetch_info_table(CIK, ACC_PREVIOUS).await.unwrap();
    assert!(content.contains("ALPHA CORP"));
}

#[tokio::test]
async fn fetch_falls_back_to_conventional_names() {
    let server = MockServer::start().await;

    let xml = info_table_xml(&[("ACME CORP", "123456789", 100, 10)]);
    Mock::given(method("GET"))
        .and(path(archive_path(ACC_CURRENT, "InfoTable.xml")))
        .respond_with(ResponseTemplate::new(200).set_body_string(&xml))
        .mount(&server)
        .await;

    let analyzer = test_analyzer(&server);
    let content = analyzer.fetch_info_table(CIK, ACC_CURRENT).await.unwrap();
    assert!(content.contains("ACME CORP"));
}

#[tokio::test]
async fn fetch_skips_cover_page_xml_from_directory() {
    let server = MockServer::start().await;

    // The directory's only XML is a submission cover page; no tier passes.
    let cover = "<edgarSubmission><headerData/><formData/></edgarSubmission>";
    mount_filing_directory(&server, ACC_CURRENT, "primary_doc.xml", cover).await;

    let analyzer = test_analyzer(&server);
    assert!(analyzer.fetch_info_table(CIK, ACC_CURRENT).await.is_none());
}

#[tokio::test]
async fn missing_previous_data_marks_all_positions_new() {
    let server = MockServer::start().await;
    mount_submissions(
        &server,
        &[
            ("13F-HR", ACC_CURRENT, "2024-11-14"),
            ("13F-HR", ACC_PREVIOUS, "2024-05-15"),
        ],
    )
    .await;

    let current_xml = info_table_xml(&[
        ("ACME CORP", "123456789", 600, 100),
        ("BETA INDUSTRIES", "987654321", 400, 200),
    ]);
    mount_filing_directory(&server, ACC_CURRENT, "form13fInfoTable.xml", &current_xml).await;
    // Nothing mounted for the previous filing: the locator falls back to
    // it anyway, and the analysis degrades to an empty baseline.

    let analyzer = test_analyzer(&server);
    let report = analyzer.analyze(&CIK.to_string(), false, false).await.unwrap();

    assert_eq!(report.previous_accession, ACC_PREVIOUS);
    assert!(!report.has_previous_data);
    assert_eq!(report.rows.len(), 2);
    for row in &report.rows {
        assert_eq!(row.status, PositionStatus::New);
        assert_eq!(row.previous_value, 0.0);
        assert_eq!(row.previous_shares, 0);
    }
    assert!(report.top_sells.is_empty());
}

#[tokio::test]
async fn missing_current_table_is_fatal() {
    let server = MockServer::start().await;
    mount_submissions(
        &server,
        &[
            ("13F-HR", ACC_CURRENT, "2024-11-14"),
            ("13F-HR", ACC_PREVIOUS, "2024-05-15"),
        ],
    )
    .await;

    let previous_xml = info_table_xml(&[("ACME CORP", "123456789", 400, 50)]);
    mount_filing_directory(&server, ACC_PREVIOUS, "form13fInfoTable.xml", &previous_xml).await;

    let analyzer = test_analyzer(&server);
    let result = analyzer.analyze(&CIK.to_string(), false, false).await;
    assert!(matches!(result, Err(AnalyzerError::MissingInfoTable(acc)) if acc == ACC_CURRENT));
}

#[tokio::test]
async fn fewer_than_two_eligible_filings_is_fatal() {
    let server = MockServer::start().await;
    mount_submissions(
        &server,
        &[
            ("13F-HR", ACC_CURRENT, "2024-11-14"),
            ("10-Q", "0000950123-24-000002", "2024-08-01"),
        ],
    )
    .await;

    let analyzer = test_analyzer(&server);
    let result = analyzer.analyze(&CIK.to_string(), false, false).await;
    assert!(matches!(result, Err(AnalyzerError::InsufficientFilings(c)) if c == CIK));
}

#[tokio::test]
async fn construction_requires_contact_user_agent() {
    let result = Analyzer::new("anonymous scraper");
    assert!(matches!(result, Err(AnalyzerError::Config(_))));
}

#[tokio::test]
async fn non_numeric_cik_is_a_config_error() {
    let server = MockServer::start().await;
    let analyzer = test_analyzer(&server);
    let result = analyzer.analyze("BRK.B", false, false).await;
    assert!(matches!(result, Err(AnalyzerError::Config(_))));
}
