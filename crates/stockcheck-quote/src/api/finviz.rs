//! Finviz quote page client
//!
//! Finviz has no public JSON API for fundamentals, so the client fetches the
//! HTML quote page (`quote.ashx?t=<TICKER>`) and lifts the fields out of it:
//!
//! - company name from the quote header
//! - sector, industry, country and exchange from the screener links under it
//! - every label/value pair of the snapshot table
//! - profile text, signal badges and the analyst ratings table
//!
//! Parsing is regex based and only as strict as it needs to be. A page
//! without a company header or snapshot table is an error; the optional
//! sections degrade to `"N/A"`.

use crate::config::QuoteConfig;
use crate::error::{Result, StockError};
use crate::record::{DataOrigin, NOT_AVAILABLE, QuoteRecord, labels};
use crate::source::QuoteSource;
use crate::validate::validate_ticker;
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use std::sync::LazyLock;
use tracing::{debug, instrument};
use url::Url;

static COMPANY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h2[^>]*quote-header_ticker-wrapper_company[^>]*>(.*?)</h2>")
        .expect("valid company regex")
});
static LEGACY_COMPANY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<table[^>]*fullview-title[^>]*>.*?<b>(.*?)</b>").expect("valid title regex")
});
static SNAPSHOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<table[^>]*snapshot-table2[^>]*>(.*?)</table>").expect("valid snapshot regex")
});
static RATINGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<table[^>]*js-table-ratings[^>]*>(.*?)</table>").expect("valid ratings regex")
});
static PROFILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<div[^>]*quote_profile-bio[^>]*>(.*?)</div>").expect("valid profile regex")
});
static LEGACY_PROFILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<td[^>]*fullview-profile[^>]*>(.*?)</td>").expect("valid profile regex")
});
static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("valid row regex"));
static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td[^>]*>(.*?)</td>").expect("valid cell regex"));
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#).expect("valid link regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Snapshot labels renamed to what the panels read
const LABEL_ALIASES: &[(&str, &str)] = &[
    ("Recom", labels::RECOMMENDATION),
    ("Payout", labels::PAYOUT_RATIO),
];

/// Finviz quote page client
#[derive(Debug, Clone)]
pub struct FinvizClient {
    client: Client,
    config: QuoteConfig,
}

impl FinvizClient {
    /// Create a client from configuration
    pub fn new(config: QuoteConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// URL of the quote page for a ticker
    pub fn quote_url(&self, ticker: &str) -> Result<Url> {
        let mut url = base_url(&self.config.finviz_base_url)?.join("quote.ashx")?;
        url.query_pairs_mut()
            .append_pair("t", ticker)
            .append_pair("p", "d");
        Ok(url)
    }

    /// URL of the daily candlestick chart image for a ticker
    pub fn chart_image_url(&self, ticker: &str) -> Result<Url> {
        let mut url = base_url(&self.config.charts_base_url)?.join("chart.ashx")?;
        url.query_pairs_mut()
            .append_pair("t", ticker)
            .append_pair("ty", "c")
            .append_pair("ta", "1")
            .append_pair("p", "d")
            .append_pair("s", "l");
        Ok(url)
    }

    /// Download the raw quote page
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, ticker: &str) -> Result<String> {
        validate_ticker(ticker)?;
        let url = self.quote_url(ticker)?;
        debug!("Requesting {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StockError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: format!("HTTP {status}"),
            });
        }
        if !status.is_success() {
            return Err(StockError::ApiError(format!(
                "HTTP {status} for quote page of {ticker}"
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl QuoteSource for FinvizClient {
    async fn fetch(&self, ticker: &str) -> Result<QuoteRecord> {
        let html = self.fetch_page(ticker).await?;
        parse_quote_page(ticker, &html)
    }

    fn chart_url(&self, ticker: &str) -> Option<String> {
        self.chart_image_url(ticker).ok().map(String::from)
    }
}

/// Parse a full quote page: fundamentals plus description, signal and ratings
///
/// The extra sections are filled in independently; each one that is missing
/// reads `"N/A"`.
pub fn parse_quote_page(ticker: &str, html: &str) -> Result<QuoteRecord> {
    let mut record = parse_fundamentals(ticker, html)?;

    let na = || NOT_AVAILABLE.to_string();
    record.insert(labels::DESCRIPTION, parse_description(html).unwrap_or_else(na));
    record.insert(labels::SIGNAL, parse_signals(html).unwrap_or_else(na));
    record.insert(labels::RATINGS, parse_outer_ratings(html).unwrap_or_else(na));

    Ok(record)
}

/// Company header, screener links and snapshot table
pub fn parse_fundamentals(ticker: &str, html: &str) -> Result<QuoteRecord> {
    let company = COMPANY_RE
        .captures(html)
        .or_else(|| LEGACY_COMPANY_RE.captures(html))
        .map(|c| text_of(&c[1]))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| StockError::ParseError(format!("no company header on page for {ticker}")))?;

    let table = SNAPSHOT_RE
        .captures(html)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .ok_or_else(|| StockError::DataUnavailable {
            symbol: ticker.to_string(),
            reason: "snapshot table not found".to_string(),
        })?;

    let mut record = QuoteRecord::new(ticker, DataOrigin::Live);
    record.insert(labels::COMPANY, company);

    let links = quote_links(html);
    for (label, value) in [
        (labels::SECTOR, links.sector),
        (labels::INDUSTRY, links.industry),
        (labels::COUNTRY, links.country),
        (labels::EXCHANGE, links.exchange),
    ] {
        if let Some(value) = value {
            record.insert(label, value);
        }
    }

    let cells: Vec<String> = CELL_RE.captures_iter(table).map(|c| text_of(&c[1])).collect();
    let mut pairs = 0;
    for pair in cells.chunks_exact(2) {
        let (label, value) = (&pair[0], &pair[1]);
        if label.is_empty() {
            continue;
        }
        record.insert(label.as_str(), value.as_str());
        pairs += 1;
    }
    if pairs == 0 {
        return Err(StockError::DataUnavailable {
            symbol: ticker.to_string(),
            reason: "snapshot table is empty".to_string(),
        });
    }

    split_compound_fields(&mut record);
    Ok(record)
}

/// Profile paragraph
pub fn parse_description(html: &str) -> Option<String> {
    PROFILE_RE
        .captures(html)
        .or_else(|| LEGACY_PROFILE_RE.captures(html))
        .map(|c| text_of(&c[1]))
        .filter(|text| !text.is_empty())
}

/// Signal badges under the quote header, joined by `", "`
pub fn parse_signals(html: &str) -> Option<String> {
    let signals = quote_links(html).signals;
    if signals.is_empty() {
        None
    } else {
        Some(signals.join(", "))
    }
}

/// Analyst rating rows, newest first, joined by `"; "`
///
/// Each row reads `<date> <action> <analyst>: <rating>` with the price
/// target appended in parentheses when the row has one.
pub fn parse_outer_ratings(html: &str) -> Option<String> {
    let table = RATINGS_RE.captures(html)?;
    let rows: Vec<String> = ROW_RE
        .captures_iter(&table[1])
        .filter_map(|row| {
            let cells: Vec<String> = CELL_RE.captures_iter(&row[1]).map(|c| text_of(&c[1])).collect();
            let [date, status, analyst, rating, price, ..] = cells.as_slice() else {
                return None;
            };
            let mut line = format!("{date} {status} {analyst}: {rating}");
            if !price.is_empty() {
                line.push_str(&format!(" ({price})"));
            }
            Some(line)
        })
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(rows.join("; "))
    }
}

#[derive(Debug, Default)]
struct QuoteLinks {
    sector: Option<String>,
    industry: Option<String>,
    country: Option<String>,
    exchange: Option<String>,
    signals: Vec<String>,
}

/// Screener links between the quote header and the snapshot table
///
/// Links are told apart by their screener filter (`f=sec_…`, `f=ind_…`,
/// `f=geo_…`, `f=exch_…`) or signal (`s=…`) query parameter.
fn quote_links(html: &str) -> QuoteLinks {
    let mut links = QuoteLinks::default();
    let Some(start) = html.find("quote-links") else {
        return links;
    };
    let region = &html[start..];
    let region = region
        .find("snapshot-table2")
        .map_or(region, |end| &region[..end]);

    let Ok(root) = Url::parse("https://finviz.com/") else {
        return links;
    };

    for link in LINK_RE.captures_iter(region) {
        let href = decode_entities(&link[1]);
        let text = text_of(&link[2]);
        if text.is_empty() {
            continue;
        }
        let Ok(url) = root.join(&href) else {
            continue;
        };

        for (key, value) in url.query_pairs() {
            let slot = match (&*key, &*value) {
                ("f", v) if v.starts_with("sec_") => &mut links.sector,
                ("f", v) if v.starts_with("ind_") => &mut links.industry,
                ("f", v) if v.starts_with("geo_") => &mut links.country,
                ("f", v) if v.starts_with("exch_") => &mut links.exchange,
                ("s", _) => {
                    if !links.signals.contains(&text) {
                        links.signals.push(text.clone());
                    }
                    continue;
                }
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(text.clone());
            }
        }
    }

    links
}

/// Split `52W Range` and `Volatility` into the separate labels panels read
fn split_compound_fields(record: &mut QuoteRecord) {
    for (from, to) in LABEL_ALIASES {
        if let Some(value) = record.get_opt(from).map(str::to_string) {
            if !record.contains(to) {
                record.insert(*to, value);
            }
        }
    }

    if let Some(range) = record.get_opt(labels::RANGE_52W).map(str::to_string) {
        if let Some((low, high)) = range.split_once(" - ") {
            if !record.contains(labels::LOW_52W) {
                record.insert(labels::LOW_52W, low.trim());
            }
            if !record.contains(labels::HIGH_52W) {
                record.insert(labels::HIGH_52W, high.trim());
            }
        }
    }

    if let Some(volatility) = record.get_opt(labels::VOLATILITY).map(str::to_string) {
        let mut parts = volatility.split_whitespace();
        if let (Some(week), Some(month)) = (parts.next(), parts.next()) {
            record.insert(labels::VOLATILITY_W, week);
            record.insert(labels::VOLATILITY_M, month);
        }
    }
}

fn base_url(raw: &str) -> Result<Url> {
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{raw}/"))?)
    }
}

/// Visible text of an HTML fragment, whitespace collapsed
fn text_of(fragment: &str) -> String {
    let without_tags = TAG_RE.replace_all(fragment, " ");
    let decoded = decode_entities(&without_tags);
    SPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&rarr;", "→")
        .replace("&amp;", "&")
}
