use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use split_ticket::domain::{
    DomainError, Station, TrainNumber, TripVariant, parse_departure_date,
};
use split_ticket::fares::{
    AggregatorConfig, FareAggregator, FareComparison, FareError, LegFailurePolicy,
};
use split_ticket::route::RouteFetcher;
use split_ticket::stations::{StationError, StationResolver};
use split_ticket::timetable::{AsyncQueryClient, QueryError, TimetableConfig};

const USAGE: &str = "usage: split-ticket TRAIN [DATE] [FROM TO]";

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "split_ticket=info";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),

    #[error("invalid value for {var}: {value:?}")]
    Config { var: &'static str, value: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Station(#[from] StationError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Fare(#[from] FareError),
}

/// Command line: `TRAIN [DATE] [FROM TO]`.
struct Args {
    train: TrainNumber,
    date: NaiveDate,
    segment: Option<(String, String)>,
}

impl Args {
    fn parse(args: &[String]) -> Result<Self, CliError> {
        let (train, rest) = args
            .split_first()
            .ok_or_else(|| CliError::Usage("missing train number".into()))?;
        let train = TrainNumber::parse(train).map_err(DomainError::from)?;

        // A date is present exactly when it leaves zero or two names behind.
        let (date, rest) = match rest.len() {
            1 | 3 => (parse_departure_date(&rest[0])?, &rest[1..]),
            _ => (chrono::Local::now().date_naive(), rest),
        };

        let segment = match rest {
            [] => None,
            [from, to] => Some((from.clone(), to.clone())),
            _ => return Err(CliError::Usage("expected both FROM and TO".into())),
        };

        Ok(Self {
            train,
            date,
            segment,
        })
    }
}

fn env_var<T: FromStr>(var: &'static str) -> Result<Option<T>, CliError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CliError::Config { var, value }),
        Err(_) => Ok(None),
    }
}

fn timetable_config() -> Result<TimetableConfig, CliError> {
    let mut config = TimetableConfig::new();
    if let Some(url) = env_var::<String>("SPLIT_TICKET_BASE_URL")? {
        config = config.with_base_url(url);
    }
    if let Some(url) = env_var::<String>("SPLIT_TICKET_SUGGEST_URL")? {
        config = config.with_suggest_url(url);
    }
    if let Some(secs) = env_var::<u64>("SPLIT_TICKET_SETTLE_SECS")? {
        config = config.with_settle_delay(Duration::from_secs(secs));
    }
    Ok(config)
}

fn aggregator_config() -> Result<AggregatorConfig, CliError> {
    let mut config = AggregatorConfig::new();
    if let Some(n) = env_var::<usize>("SPLIT_TICKET_CONCURRENCY")? {
        config = config.with_max_concurrent(n);
    }
    if env_var::<bool>("SPLIT_TICKET_SKIP_FAILED_LEGS")?.unwrap_or(false) {
        config = config.with_leg_failure(LegFailurePolicy::Skip);
    }
    Ok(config)
}

fn print_direct(direct: &TripVariant) {
    println!("{:<16} {:>6} {:>12}", "Класс", "Места", "Стоимость");
    for (class, quote) in direct.iter() {
        println!(
            "{:<16} {:>6} {:>12}",
            class.as_str(),
            quote.free_seats,
            quote.price.to_string()
        );
    }
}

fn print_comparison(comparison: &FareComparison) {
    println!();
    println!(
        "Маршрут: {} - {}",
        comparison.origin.name, comparison.destination.name
    );
    print_direct(&comparison.direct);

    let mut current: Option<&Station> = None;
    for split in &comparison.splits {
        if current != Some(&split.intermediate) {
            current = Some(&split.intermediate);
            println!();
            println!(
                "Маршрут: {} - {} - {}",
                comparison.origin.name, split.intermediate.name, comparison.destination.name
            );
            println!("{:<16} {:>6} {:>12}", "Класс", "Места", "Стоимость");
        }
        println!(
            "{:<16} {:>6} {:>12}",
            split.fare_class.as_str(),
            split.min_seats,
            split.combined_price.to_string()
        );
    }

    for station in &comparison.skipped {
        println!();
        println!("Пропущено: {station}");
    }

    let savings = comparison.savings();
    if !savings.is_empty() {
        println!();
        println!("Дешевле прямого билета:");
        for saving in savings {
            println!(
                "  через {}, {}: {} вместо {} (экономия {})",
                saving.split.intermediate.name,
                saving.split.fare_class,
                saving.split.combined_price,
                saving.direct_price,
                saving.saving
            );
        }
    }
}

async fn run() -> Result<(), CliError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = Args::parse(&args)?;

    let client = AsyncQueryClient::new(timetable_config()?);
    let resolver = StationResolver::new(client.clone());
    let aggregator = FareAggregator::new(client.clone(), aggregator_config()?);

    let route = RouteFetcher::new(client)
        .fetch_route(&args.train, args.date)
        .await?;
    if route.is_empty() {
        return Err(FareError::EmptyRoute(args.train).into());
    }

    println!("Маршрут поезда: {}", args.train);
    for stop in route.stops() {
        println!("{}", stop.station);
    }

    let journey = match &args.segment {
        None => route,
        Some((from, to)) => {
            let from = resolver.resolve(from).await?;
            let to = resolver.resolve(to).await?;
            debug!(from = %from, to = %to, "Restricting route to segment");

            route.between(from.code, to.code).ok_or_else(|| {
                let station = if route.find_stop(from.code, 0).is_none() {
                    from
                } else {
                    to
                };
                FareError::NotOnRoute {
                    train: args.train.clone(),
                    station,
                }
            })?
        }
    };

    let comparison = aggregator.compare(&journey, &args.train, args.date).await?;
    print_comparison(&comparison);
    Ok(())
}

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Ошибка: {e}");
        std::process::exit(1);
    }
}
