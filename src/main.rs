use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use clean_route::comparison::compare_years_now;
use clean_route::config::Config;
use clean_route::evaluator::{EvaluateOptions, select_cleanest_route};
use clean_route::haversine::StraightLineRouter;
use clean_route::heatmap::heatmap;
use clean_route::models::Bounds;
use clean_route::nominatim::{NominatimClient, suggest};
use clean_route::open_meteo::AirQualityClient;
use clean_route::osrm::OsrmClient;
use clean_route::snapshot::snapshot;
use clean_route::traits::{Geocoder, RouteProvider};
use clean_route::waqi::WaqiClient;

#[derive(Parser, Debug)]
#[command(name = "clean-route", about = "Air-quality lookups and cleanest-route planning")]
struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the route with the cleanest air between two places.
    Route {
        from: String,
        to: String,
        /// Use a straight line instead of the routing service.
        #[arg(long)]
        straight_line: bool,
        #[arg(long, default_value_t = 0.95)]
        improvement_factor: f64,
        #[arg(long, default_value_t = 0.30)]
        max_distance_increase: f64,
        #[arg(long, default_value_t = 3)]
        alternatives: usize,
    },
    /// Current pollutant levels and 24-hour trend for a place.
    Aqi { place: String },
    /// Compare yearly mean PM2.5 for a place.
    Compare {
        place: String,
        first_year: i32,
        second_year: i32,
    },
    /// Live station readings inside a bounding box.
    Heatmap {
        /// south,west,north,east
        #[arg(long, value_parser = parse_bounds)]
        bounds: Option<Bounds>,
    },
    /// Place suggestions for a partial name.
    Suggest { query: String },
}

fn parse_bounds(value: &str) -> Result<Bounds, String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|err| err.to_string()))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [south, west, north, east] => Ok(Bounds {
            south: *south,
            west: *west,
            north: *north,
            east: *east,
        }),
        _ => Err("expected four comma-separated numbers".to_string()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "clean_route=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Route {
            from,
            to,
            straight_line,
            improvement_factor,
            max_distance_increase,
            alternatives,
        } => {
            let geocoder = NominatimClient::new(config.nominatim)?;
            let start = geocoder.locate(&from).with_context(|| format!("locating {from}"))?;
            let end = geocoder.locate(&to).with_context(|| format!("locating {to}"))?;
            let router: Box<dyn RouteProvider> = if straight_line {
                Box::new(StraightLineRouter::default())
            } else {
                Box::new(OsrmClient::new(config.osrm)?)
            };
            let air = AirQualityClient::new(config.air_quality)?;
            let options = EvaluateOptions {
                improvement_factor,
                max_distance_increase,
                max_alternatives: alternatives,
            };
            let result = select_cleanest_route(router.as_ref(), &air, start, end, &options)
                .context("finding the cleanest route")?;

            if cli.json {
                return print_json(&result);
            }
            for report in &result.reports {
                println!(
                    "route {}{}: {:.2} km, avg AQI {}, +{:.1}%",
                    report.index + 1,
                    if report.index == 0 { " (shortest)" } else { "" },
                    report.distance_km,
                    report
                        .average_aqi
                        .map_or_else(|| "n/a".to_string(), |aqi| format!("{aqi:.2}")),
                    report.distance_increase * 100.0
                );
            }
            println!(
                "cleanest route: #{} {:.2} km, average AQI {:.2}",
                result.route_index + 1,
                result.distance_km,
                result.average_aqi
            );
            if result.route_index != 0 {
                if let Some(improvement) = result.aqi_improvement() {
                    println!(
                        "{:.1}% longer with {:.1}% better air quality",
                        result.distance_increase * 100.0,
                        improvement * 100.0
                    );
                }
            } else if result.reports.len() > 1 {
                println!(
                    "no alternative was at least {:.0}% cleaner within {:.0}% extra distance",
                    (1.0 - options.improvement_factor) * 100.0,
                    options.max_distance_increase * 100.0
                );
            }
        }
        Command::Aqi { place } => {
            let geocoder = NominatimClient::new(config.nominatim)?;
            let point = geocoder.locate(&place).with_context(|| format!("locating {place}"))?;
            let air = AirQualityClient::new(config.air_quality)?;
            let report = snapshot(&air, point).context("fetching air quality")?;

            if cli.json {
                return print_json(&report);
            }
            let band = |band: Option<clean_route::aqi::Band>| band.map_or("n/a", |b| b.label());
            println!(
                "PM2.5 {:?} µg/m³ ({}), PM10 {:?} µg/m³ ({})",
                report.current.pm2_5,
                band(report.pm2_5_band),
                report.current.pm10,
                band(report.pm10_band)
            );
            for point in &report.trend {
                println!("{:>6}  pm2_5 {:?}  pm10 {:?}", point.label, point.pm2_5, point.pm10);
            }
        }
        Command::Compare {
            place,
            first_year,
            second_year,
        } => {
            let geocoder = NominatimClient::new(config.nominatim)?;
            let point = geocoder.locate(&place).with_context(|| format!("locating {place}"))?;
            let air = AirQualityClient::new(config.air_quality)?;
            let comparison = compare_years_now(&air, point, first_year, second_year)
                .context("comparing years")?;

            if cli.json {
                return print_json(&comparison);
            }
            for summary in [comparison.first, comparison.second] {
                println!(
                    "{}: mean PM2.5 {:.2} µg/m³, AQI {} ({})",
                    summary.year,
                    summary.average_pm25,
                    summary.category.value(),
                    summary.category.label()
                );
            }
            match comparison.pm25_change_pct() {
                Some(change) => println!("change: {:+.1}%", change),
                None => println!("change: n/a"),
            }
        }
        Command::Heatmap { bounds } => {
            let directory = WaqiClient::new(config.waqi)?;
            let stations = heatmap(&directory, bounds.unwrap_or(Bounds::INDIA))
                .context("fetching station data")?;

            if cli.json {
                return print_json(&stations);
            }
            for station in &stations {
                println!(
                    "{:<40} {:>8.4},{:<9.4} AQI {:>4} {}",
                    station.location,
                    station.point.lat,
                    station.point.lng,
                    station.aqi.map_or_else(|| "-".to_string(), |aqi| aqi.to_string()),
                    station.color().unwrap_or("")
                );
            }
        }
        Command::Suggest { query } => {
            let geocoder = NominatimClient::new(config.nominatim)?;
            let places = suggest(&geocoder, &query)?;

            if cli.json {
                return print_json(&places);
            }
            for place in &places {
                println!("{}, {}", place.name, place.country);
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
