use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use log::{info, warn};
use regex::Regex;

use crate::analyzer::Analyzer;
use crate::error::{Error, Result};
use crate::opds::OpdsUrl;
use crate::report::ReportSink;
use crate::source::LibrarySource;
use crate::source::kavita::KavitaClient;
use crate::types::{AuditHeader, AuditSummary, Series, SeriesReport, Volume};

/// Default per-request timeout for the Kavita client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn default_concurrency() -> usize {
    num_cpus::get().min(4)
}

/// The main Renzoku audit configuration, built declaratively using the builder pattern.
///
/// Once configured, it can audit libraries through any [`LibrarySource`]:
///
/// - [`audit_library`](RenzokuConfig::audit_library): Fetch, analyze and report one library
/// - [`analyze_series`](RenzokuConfig::analyze_series): Analyze already-fetched series data
/// - [`connect`](RenzokuConfig::connect): Build a Kavita client from an OPDS URL
///
/// ## Builder Pattern
///
/// ```rust,no_run
/// # use renzoku::prelude::*;
/// let config = RenzokuConfig::builder()
///     .max_concurrent_fetches(2usize)
///     .series_filter("^One")
///     .build()
///     .expect("Invalid configuration");
/// ```
#[derive(Clone, Debug, derive_builder::Builder)]
#[builder(setter(into, strip_option), build_fn(validate = "Self::validate"))]
pub struct RenzokuConfig {
    /// How many series may have their volumes fetched at the same time.
    ///
    /// Reports are still emitted in series order regardless of this value.
    #[builder(default = "default_concurrency()")]
    pub max_concurrent_fetches: usize,

    /// Whether chapter files are checked against the `Vol. N Ch. M` naming convention.
    #[builder(default = "true")]
    pub check_file_names: bool,

    /// Regex restricting the audit to series whose name matches.
    ///
    /// Example: `r"(?i)^one piece"`
    #[builder(default)]
    pub series_filter: Option<String>,

    /// Timeout applied to every request made by [`connect`](RenzokuConfig::connect)ed clients.
    #[builder(default = "DEFAULT_REQUEST_TIMEOUT")]
    pub request_timeout: Duration,
}

impl Default for RenzokuConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_concurrency(),
            check_file_names: true,
            series_filter: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl RenzokuConfig {
    /// Creates a new builder for configuring `RenzokuConfig`.
    pub fn builder() -> RenzokuConfigBuilder {
        RenzokuConfigBuilder::default()
    }

    /// The analyzer matching this configuration.
    pub fn analyzer(&self) -> Analyzer {
        Analyzer::new(self.check_file_names)
    }

    /// Parses an OPDS URL and creates a Kavita client for its server.
    ///
    /// The client is not authenticated yet; call
    /// [`LibrarySource::authenticate`] before fetching.
    pub fn connect(&self, opds_url: &str) -> Result<KavitaClient> {
        let opds = OpdsUrl::parse(opds_url)?;
        info!("Connecting to {}", opds);
        KavitaClient::from_opds(&opds, self.request_timeout)
    }

    /// Analyzes one already-fetched series.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(SeriesReport))` - The series has at least one finding
    /// * `Ok(None)` - The series is clean
    pub fn analyze_series(&self, series: &Series, volumes: &[Volume]) -> Result<Option<SeriesReport>> {
        self.analyzer().analyze_series(series, volumes)
    }

    fn series_matcher(&self) -> Result<Option<Regex>> {
        self.series_filter
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(Error::from)
    }

    /// Audits every series of a library and streams the non-empty reports to `sink`.
    ///
    /// Volumes are fetched for up to
    /// [`max_concurrent_fetches`](RenzokuConfig::max_concurrent_fetches) series at once,
    /// but analysis and reporting follow the series order returned by the source.
    ///
    /// # Arguments
    ///
    /// * `source` - An authenticated data source
    /// * `library_id` - Library to audit
    /// * `sink` - Receives the run header, one report per series with findings, and the summary
    ///
    /// # Returns
    ///
    /// * `Ok(AuditSummary)` - Every series was fetched and analyzed
    /// * `Err(Error::SeriesFetch)` - Volumes of a series could not be fetched. Reports of
    ///   all earlier series have already been emitted and the sink was finished.
    /// * `Err(Error)` - The series list could not be fetched or the sink failed
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use renzoku::prelude::*;
    /// # #[tokio::main]
    /// # async fn main() -> renzoku::error::Result<()> {
    /// let config = RenzokuConfig::builder().build()?;
    /// let client = config.connect("http://localhost:5000/api/opds/my-api-key")?;
    /// client.authenticate().await?;
    ///
    /// let mut sink = TextSink::new(std::io::stdout());
    /// let summary = config.audit_library(&client, 1, &mut sink).await?;
    /// println!("{} of {} series need attention", summary.series_with_issues, summary.series_checked);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn audit_library<S, K>(
        &self,
        source: &S,
        library_id: i64,
        sink: &mut K,
    ) -> Result<AuditSummary>
    where
        S: LibrarySource + ?Sized,
        K: ReportSink + ?Sized,
    {
        let matcher = self.series_matcher()?;
        let analyzer = self.analyzer();

        let series_list: Vec<Series> = source
            .fetch_series_list(library_id)
            .await?
            .into_iter()
            .filter(|series| matcher.as_ref().map_or(true, |re| re.is_match(&series.name)))
            .collect();
        info!(
            "Auditing {} series of library {}",
            series_list.len(),
            library_id
        );

        let header = AuditHeader {
            library_id,
            series_count: series_list.len(),
            started_at: Utc::now(),
        };
        sink.begin(&header)?;
        let mut summary = AuditSummary::start(&header);

        let mut fetches = stream::iter(series_list)
            .map(|series| async move {
                let volumes = source.fetch_volumes(series.id).await;
                (series, volumes)
            })
            .buffered(self.max_concurrent_fetches.max(1));

        while let Some((series, volumes)) = fetches.next().await {
            let volumes = match volumes {
                Ok(volumes) => volumes,
                Err(e) => {
                    warn!("Stopping audit of library {}: {}", library_id, e);
                    summary.finished_at = Utc::now();
                    sink.finish(&summary)?;
                    return Err(Error::SeriesFetch {
                        series: series.name,
                        source: Box::new(e),
                    });
                }
            };

            let report = analyzer.analyze_series(&series, &volumes)?;
            summary.record(report.as_ref());
            if let Some(report) = report {
                sink.emit(&report)?;
            }
        }

        summary.finished_at = Utc::now();
        sink.finish(&summary)?;
        info!(
            "Library {}: {} of {} series with issues, {} findings",
            library_id, summary.series_with_issues, summary.series_checked, summary.findings
        );
        Ok(summary)
    }
}

impl RenzokuConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(Some(s)) = &self.series_filter {
            if Regex::new(s).is_err() {
                return Err(format!("Invalid series_filter: {}", s));
            }
        }

        if let Some(concurrency) = self.max_concurrent_fetches {
            if concurrency == 0 {
                return Err("max_concurrent_fetches must be at least 1.".to_string());
            }
        }

        if let Some(timeout) = self.request_timeout {
            if timeout.is_zero() {
                return Err("request_timeout must be greater than zero.".to_string());
            }
        }

        Ok(())
    }
}
