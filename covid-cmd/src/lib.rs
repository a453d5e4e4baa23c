//! Command implementations for the COVID-19 dataset CLI.
//!
//! Each subcommand loads the case table (and vaccination table when asked)
//! through a [`session::Session`], runs one engine query and writes the
//! result as CSV or JSON.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use covid_core::loader::Loader;
use covid_core::Source;
use covid_data::filter::DEFAULT_TOP_N;
use covid_data::{CountrySelection, RankMetric};
use covid_utils::dates::parse_date;
use std::io::Write;
use std::time::Duration;

pub mod output;
pub mod query;
pub mod session;

use output::Format;
use query::FilterRequest;
use session::Session;

/// Tables are reloaded when older than this.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Where to read data from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Case/death CSV path or http(s) URL; repeat to give fallbacks in order
    /// of preference. Defaults to the local WHO snapshot, then the WHO export.
    #[arg(short = 's', long = "source", global = true)]
    pub sources: Vec<Source>,

    /// Vaccination CSV path or URL; repeatable. Without one, vaccination
    /// output is omitted.
    #[arg(long = "vaccination-source", global = true)]
    pub vaccination_sources: Vec<Source>,
}

impl SourceArgs {
    pub fn case_sources(&self) -> Vec<Source> {
        if self.sources.is_empty() {
            Source::default_cases()
        } else {
            self.sources.clone()
        }
    }
}

/// Where and how to write results.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Csv, global = true)]
    pub format: Format,

    /// Output file; stdout when omitted
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,
}

/// Country and date range selection.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Country name, or "World" for every country summed
    #[arg(short = 'c', long, default_value = "World")]
    pub country: CountrySelection,

    /// First day (YYYY-MM-DD); defaults to the earliest date for the country
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD); defaults to the latest date for the country
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Centered rolling-mean window in days
    #[arg(short = 'w', long, default_value_t = 1)]
    pub window: usize,
}

impl FilterArgs {
    fn request(&self, top: usize) -> FilterRequest {
        FilterRequest {
            country: self.country.clone(),
            start: self.start,
            end: self.end,
            window: self.window,
            top,
        }
    }
}

/// Top-N ranking options.
#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Rank by "cases" or "deaths"
    #[arg(long = "by", default_value = "cases")]
    pub metric: RankMetric,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the distinct countries in the case table
    Countries,

    /// Daily series for one country or the world, optionally smoothed
    Series {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Headline totals for the selection and date range
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Countries ranked by their latest cumulative count
    Top {
        #[command(flatten)]
        rank: RankArgs,
    },

    /// Latest row per country
    Latest,

    /// New cases and deaths per Tuesday-to-Monday week
    Weekly {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Vaccination rows for the selection
    Vaccinations {
        #[command(flatten)]
        filter: FilterArgs,

        /// Latest row per country instead of a series
        #[arg(long)]
        latest: bool,
    },

    /// Every view for the selection as one JSON document
    Dashboard {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        rank: RankArgs,
    },
}

/// Run `command` against `session` and return the rendered output.
pub async fn execute(command: Command, session: &Session, format: Format) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let out = &mut buf;
    match command {
        Command::Countries => query::run_countries(session, out, format).await?,
        Command::Series { filter } => {
            query::run_series(session, &filter.request(DEFAULT_TOP_N), out, format).await?
        }
        Command::Summary { filter } => {
            query::run_summary(session, &filter.request(DEFAULT_TOP_N), out, format).await?
        }
        Command::Top { rank } => query::run_top(session, rank.top, rank.metric, out, format).await?,
        Command::Latest => query::run_latest(session, out, format).await?,
        Command::Weekly { filter } => {
            query::run_weekly(session, &filter.request(DEFAULT_TOP_N), out, format).await?
        }
        Command::Vaccinations { filter, latest } => {
            query::run_vaccinations(session, &filter.request(DEFAULT_TOP_N), latest, out, format)
                .await?
        }
        Command::Dashboard { filter, rank } => {
            query::run_dashboard(session, &filter.request(rank.top), rank.metric, out).await?
        }
    }
    Ok(buf)
}

/// Run `command` and write its output. The output file is only created
/// once the query has succeeded, so a failed run leaves it untouched.
pub async fn run(command: Command, sources: SourceArgs, output: OutputArgs) -> anyhow::Result<()> {
    let session = Session::new(
        Loader::new()?,
        sources.case_sources(),
        sources.vaccination_sources.clone(),
        DEFAULT_CACHE_TTL,
    );
    let rendered = execute(command, &session, output.format).await?;
    let mut out = output::open(output.output.as_deref())?;
    out.write_all(&rendered)?;
    out.flush()?;
    Ok(())
}
