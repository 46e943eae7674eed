use crate::infra::{build_financing_service, build_match_service, load_catalog};
use auto_quote::config::AppConfig;
use auto_quote::error::AppError;
use auto_quote::workflows::financing::{CreditProfile, FinancingKind, FinancingQuote, NoAdvisor};
use auto_quote::workflows::matching::{
    BodyStyle, DriveType, DrivingExperience, EngineType, MatchQuery, Priority, ScoredMatch,
    TrimLevel, Usage,
};
use clap::Args;
use std::fmt::Write as _;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Applicant credit score (300-850)
    #[arg(long)]
    pub(crate) credit_score: i32,
    /// Gross monthly income in dollars
    #[arg(long)]
    pub(crate) monthly_income: f64,
    /// Vehicle price in dollars
    #[arg(long)]
    pub(crate) vehicle_price: f64,
    /// Price a lease instead of a loan
    #[arg(long)]
    pub(crate) lease: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MatchArgs {
    /// Preferred body style, e.g. SUV or Mini-van (repeatable)
    #[arg(long)]
    pub(crate) body_style: Vec<BodyStyle>,
    /// Intended usage, e.g. "Daily commuting" (repeatable)
    #[arg(long)]
    pub(crate) usage: Vec<Usage>,
    /// Preferred driving feel (repeatable)
    #[arg(long)]
    pub(crate) driving_experience: Vec<DrivingExperience>,
    /// Gasoline, Hybrid or Electric (repeatable)
    #[arg(long)]
    pub(crate) engine_type: Vec<EngineType>,
    /// Minimum number of seats; zero or negative disables the filter
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) seat_count: Option<i32>,
    /// AWD, RWD or FWD (repeatable)
    #[arg(long)]
    pub(crate) drive_type: Vec<DriveType>,
    /// Trim level (repeatable)
    #[arg(long = "trim-level")]
    pub(crate) trim_levels: Vec<TrimLevel>,
    /// Fuel efficiency or Power (repeatable)
    #[arg(long)]
    pub(crate) priority: Vec<Priority>,
    /// Number of matches to print
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: usize,
}

impl MatchArgs {
    /// Flags that were never passed stay unconstrained.
    pub(crate) fn to_query(&self) -> MatchQuery {
        MatchQuery {
            body_style: listed(&self.body_style),
            usage: listed(&self.usage),
            driving_experience: listed(&self.driving_experience),
            engine_type: listed(&self.engine_type),
            seat_count: self.seat_count,
            drive_type: listed(&self.drive_type),
            trim_levels: listed(&self.trim_levels),
            priority: listed(&self.priority),
        }
    }
}

fn listed<T: Clone>(values: &[T]) -> Option<Vec<T>> {
    (!values.is_empty()).then(|| values.to_vec())
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_financing_service(&config, NoAdvisor)?;

    let kind = if args.lease {
        FinancingKind::Lease
    } else {
        FinancingKind::Loan
    };
    let profile = CreditProfile::new(args.credit_score, args.monthly_income, args.vehicle_price);
    let quote = service.menu(kind, &profile)?;

    print!("{}", render_quote(&profile, &quote));
    Ok(())
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = load_catalog(config.sources.catalog_csv_path.as_deref())?;
    let total = catalog.len();
    let service = build_match_service(catalog);

    let matches = service.match_vehicles(&args.to_query())?;

    print!("{}", render_matches(&matches, total, args.limit));
    Ok(())
}

pub(crate) fn render_quote(profile: &CreditProfile, quote: &FinancingQuote) -> String {
    let mut out = String::new();
    let heading = match quote.kind {
        FinancingKind::Loan => "Loan",
        FinancingKind::Lease => "Lease",
    };
    let _ = writeln!(
        out,
        "{heading} quote for credit score {} ({})",
        profile.credit_score,
        quote.tier.label()
    );
    let _ = writeln!(
        out,
        "Vehicle price ${:.2}, down payment ${:.2}, loan-to-value {:.2}%",
        profile.vehicle_price,
        quote.down_payment,
        quote.loan_to_value * 100.0
    );
    out.push('\n');
    for option in &quote.options {
        let marker = if option.recommended { " (recommended)" } else { "" };
        let _ = writeln!(
            out,
            "- {} months: {:.2}% APR, ${:.2}/month{marker}",
            option.term_months,
            option.annual_rate * 100.0,
            option.monthly_payment
        );
    }
    out
}

pub(crate) fn render_matches(matches: &[ScoredMatch], catalog_size: usize, limit: usize) -> String {
    let mut out = String::new();
    let shown = matches.len().min(limit);
    let _ = writeln!(
        out,
        "Top {shown} of {} eligible vehicles ({catalog_size} in catalog)",
        matches.len()
    );

    for (rank, entry) in matches.iter().take(limit).enumerate() {
        let vehicle = &entry.vehicle;
        let _ = writeln!(
            out,
            "{}. {} ({}, {} seats, ${:.2}) score {}",
            rank + 1,
            vehicle.name,
            vehicle.body_style,
            vehicle.seat_count,
            vehicle.price,
            entry.score
        );
        if !entry.matched.is_empty() {
            let fields: Vec<String> = entry
                .matched
                .iter()
                .map(|field| format!("{field:?}"))
                .collect();
            let _ = writeln!(out, "   matched: {}", fields.join(", "));
        }
    }
    out
}
