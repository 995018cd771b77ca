// tests/command/command_test.rs
use insta::assert_snapshot;
use vizor::command::{curl_command, encode_query, retrieval_url, CommandFilter, CommandRequest};
use vizor::config::RetrievalSettings;

const APP_TRAFFIC: &str = "sum bytesFromClient+bytesFromServer+lostBytesClient group by ts filter by appName = Facebook,Instagram order by ts ascending";

#[test]
fn test_parse_app_traffic_command() {
    let request = CommandRequest::parse(APP_TRAFFIC).unwrap();

    assert_eq!(
        request,
        CommandRequest {
            sum: vec!["bytesFromClient+bytesFromServer+lostBytesClient".to_string()],
            group_by: Some("ts".to_string()),
            order_by: Some("ts".to_string()),
            order: Some("ascending".to_string()),
            filter: Some(CommandFilter {
                column: "appName".to_string(),
                values: vec!["Facebook".to_string(), "Instagram".to_string()],
            }),
            ..Default::default()
        }
    );
}

#[test]
fn test_params_order() {
    let request = CommandRequest::parse(APP_TRAFFIC).unwrap();
    let keys: Vec<&str> = request
        .to_params(&RetrievalSettings::default())
        .iter()
        .map(|(key, _)| *key)
        .collect();

    assert_eq!(
        keys,
        vec![
            "start_time",
            "end_time",
            "version",
            "country_code",
            "sum",
            "group_by",
            "order_by",
            "filters",
            "filter_values",
            "order",
        ]
    );
}

#[test]
fn test_app_traffic_url() {
    let request = CommandRequest::parse(APP_TRAFFIC).unwrap();
    let url = retrieval_url(&request, &RetrievalSettings::default());

    assert_snapshot!(url, @"http://127.0.0.1:12054/data?start_time=0&end_time=99999999999999999999999999&version=4&country_code=0000&sum=bytesFromClient%2BbytesFromServer%2BlostBytesClient&group_by=ts&order_by=ts&filters=%5B%22%22%22appName%22%22%22%5D&filter_values=%5B%22%22%22Facebook%22%22%22%2C%22%22%22Instagram%22%22%22%5D&order=ascending");
}

#[test]
fn test_spaced_sum_fields_are_double_encoded() {
    let request = CommandRequest::parse("sum a b chart bar limit 10").unwrap();
    let params = request.to_params(&RetrievalSettings::default());

    assert_snapshot!(encode_query(&params), @"start_time=0&end_time=99999999999999999999999999&version=4&country_code=0000&sum=a%2520%252B%2520b&limit=10");
}

#[test]
fn test_configured_endpoint() {
    let settings = RetrievalSettings {
        base_url: "https://data.example.net/v2/data".to_string(),
        version: "5".to_string(),
        country_code: "0044".to_string(),
        api_key: None,
    };
    let request = CommandRequest::parse("sum bytes group by appName").unwrap();

    assert_snapshot!(retrieval_url(&request, &settings), @"https://data.example.net/v2/data?start_time=0&end_time=99999999999999999999999999&version=5&country_code=0044&sum=bytes&group_by=appName");
}

#[test]
fn test_curl_command() {
    let request = CommandRequest::parse("sum bytes order by bytes descending limit 5").unwrap();
    let url = retrieval_url(&request, &RetrievalSettings::default());

    assert_snapshot!(curl_command(&url, "a"), @"curl -X 'GET' 'http://127.0.0.1:12054/data?start_time=0&end_time=99999999999999999999999999&version=4&country_code=0000&sum=bytes&order_by=bytes&order=descending&limit=5' -H 'accept: application/json' -H 'x-api-key: a'");
}

#[test]
fn test_chart_type_is_not_a_parameter() {
    let request = CommandRequest::parse("sum bytes chart pie").unwrap();

    assert_eq!(request.chart_type.as_deref(), Some("pie"));
    assert!(request
        .to_params(&RetrievalSettings::default())
        .iter()
        .all(|(key, _)| *key != "chart"));
}
