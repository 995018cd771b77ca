//! Data-retrieval query parameters and their encoding.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::CommandRequest;
use crate::config::RetrievalSettings;

/// Everything except ASCII letters, digits and `_ . - ~` is escaped.
pub const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

const DEFAULT_START_TIME: &str = "0";
const DEFAULT_END_TIME: &str = "99999999999999999999999999";

impl CommandRequest {
    /// Query parameters in the order the retrieval API expects.
    pub fn to_params(&self, settings: &RetrievalSettings) -> Vec<(&'static str, String)> {
        let mut params = vec![
            (
                "start_time",
                non_zero(self.start_time).unwrap_or_else(|| DEFAULT_START_TIME.to_string()),
            ),
            (
                "end_time",
                non_zero(self.end_time).unwrap_or_else(|| DEFAULT_END_TIME.to_string()),
            ),
            ("version", settings.version.clone()),
            ("country_code", settings.country_code.clone()),
        ];

        if !self.sum.is_empty() {
            // The separator is pre-escaped and escaped again with the rest
            // of the query string; the API decodes twice.
            params.push(("sum", self.sum.join(" + ").replace(" + ", "%20%2B%20")));
        }
        if let Some(group_by) = &self.group_by {
            params.push(("group_by", group_by.clone()));
        }
        if let Some(order_by) = &self.order_by {
            params.push(("order_by", order_by.clone()));
        }
        if let Some(filter) = &self.filter {
            if !filter.values.is_empty() {
                params.push(("filters", triple_quoted_list([filter.column.as_str()])));
                params.push((
                    "filter_values",
                    triple_quoted_list(filter.values.iter().map(String::as_str)),
                ));
            }
        }
        if let Some(order) = &self.order {
            params.push(("order", order.clone()));
        }
        if let Some(limit) = &self.limit {
            params.push(("limit", limit.clone()));
        }

        params
    }
}

/// A zero timestamp is treated as absent.
fn non_zero(epoch: Option<i64>) -> Option<String> {
    epoch.filter(|&t| t != 0).map(|t| t.to_string())
}

/// `["""a""","""b"""]`
fn triple_quoted_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = items
        .into_iter()
        .map(|item| format!(r#""""{}""""#, item))
        .collect();
    format!("[{}]", quoted.join(","))
}

/// Percent-encode parameters into `k=v&k=v`.
pub fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_ENCODE_SET),
                utf8_percent_encode(value, QUERY_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Full retrieval URL for a command.
pub fn retrieval_url(request: &CommandRequest, settings: &RetrievalSettings) -> String {
    format!(
        "{}?{}",
        settings.base_url,
        encode_query(&request.to_params(settings))
    )
}

/// A `curl` invocation equivalent to fetching `url`.
pub fn curl_command(url: &str, api_key: &str) -> String {
    format!(
        "curl -X 'GET' '{}' -H 'accept: application/json' -H 'x-api-key: {}'",
        url, api_key
    )
}
