use std::process::ExitCode;

use mbus_client::auth::Credentials;
use mbus_client::bustime::{BusApi, BustimeClient, BustimeConfig, BustimeError};
use tracing_subscriber::EnvFilter;

/// Default distance for `nearby` when no threshold is given, in meters.
const DEFAULT_NEARBY_THRESHOLD_M: f64 = 200.0;

const USAGE: &str = "\
Usage: mbus <command> [args]

Commands:
  routes                        List routes
  directions <route>            List directions for a route
  stops <route>                 List stops on a route (all directions)
  predictions <stop> [rt,rt]    Predictions for a stop
  feeds                         List data feeds
  nearby <lat> <lon> [meters]   Closest stop within a distance

Environment:
  MBUS_API_KEY, MBUS_HMAC_KEY   Credentials (required)
  MBUS_USER_AGENT               User-Agent header
  MBUS_DATA_FEED                Data feed to select (auto-configured if unset)
  RUST_LOG                      Log filter (default: info)";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let api_key = std::env::var("MBUS_API_KEY").unwrap_or_else(|_| {
        eprintln!("Warning: MBUS_API_KEY not set. API calls will fail.");
        String::new()
    });
    let hmac_key = std::env::var("MBUS_HMAC_KEY").unwrap_or_else(|_| {
        eprintln!("Warning: MBUS_HMAC_KEY not set. API calls will fail.");
        String::new()
    });

    let mut config = BustimeConfig::new(Credentials::new(api_key, hmac_key));
    if let Ok(user_agent) = std::env::var("MBUS_USER_AGENT") {
        config = config.with_user_agent(user_agent);
    }
    let preselected_feed = std::env::var("MBUS_DATA_FEED").ok();
    if let Some(feed) = &preselected_feed {
        config = config.with_data_feed(feed);
    }

    let client = match BustimeClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create BusTime client: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, command, preselected_feed.is_some()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Errors from parsing the command line.
#[derive(Debug, thiserror::Error, PartialEq)]
enum UsageError {
    #[error("no command given")]
    MissingCommand,

    #[error("unknown command or wrong arguments: {0}")]
    Unrecognized(String),

    #[error("invalid {what}: {value}")]
    InvalidNumber { what: &'static str, value: String },
}

/// A parsed `mbus` invocation.
#[derive(Debug, PartialEq)]
enum Command {
    Routes,
    Directions { route: String },
    Stops { route: String },
    Predictions { stop: String, routes: Option<Vec<String>> },
    Feeds,
    Nearby { latitude: f64, longitude: f64, threshold: f64 },
}

impl Command {
    fn needs_feed(&self) -> bool {
        matches!(
            self,
            Command::Routes | Command::Directions { .. } | Command::Stops { .. }
        )
    }
}

fn parse_command(args: &[String]) -> Result<Command, UsageError> {
    let Some((command, rest)) = args.split_first() else {
        return Err(UsageError::MissingCommand);
    };

    let command = match (command.as_str(), rest) {
        ("routes", []) => Command::Routes,
        ("directions", [route]) => Command::Directions {
            route: route.clone(),
        },
        ("stops", [route]) => Command::Stops {
            route: route.clone(),
        },
        ("predictions", [stop]) => Command::Predictions {
            stop: stop.clone(),
            routes: None,
        },
        ("predictions", [stop, routes]) => Command::Predictions {
            stop: stop.clone(),
            routes: Some(routes.split(',').map(str::to_string).collect()),
        },
        ("feeds", []) => Command::Feeds,
        ("nearby", [lat, lon, threshold @ ..]) if threshold.len() <= 1 => Command::Nearby {
            latitude: parse_number("latitude", lat)?,
            longitude: parse_number("longitude", lon)?,
            threshold: match threshold.first() {
                Some(t) => parse_number("threshold", t)?,
                None => DEFAULT_NEARBY_THRESHOLD_M,
            },
        },
        _ => return Err(UsageError::Unrecognized(args.join(" "))),
    };

    Ok(command)
}

fn parse_number(what: &'static str, value: &str) -> Result<f64, UsageError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| UsageError::InvalidNumber {
            what,
            value: value.to_string(),
        })
}

async fn run(api: &dyn BusApi, command: Command, has_feed: bool) -> Result<(), BustimeError> {
    if command.needs_feed() && !has_feed {
        let feed = api.auto_configure_data_feed().await?;
        tracing::info!(feed = ?feed, "selected data feed");
    }

    match command {
        Command::Routes => {
            for route in api.get_routes().await? {
                println!("{:<6} {:<8} {}", route.id, route.color, route.name);
            }
        }
        Command::Directions { route } => {
            for direction in api.get_directions(&route).await? {
                println!("{:<12} {}", direction.id, direction.name);
            }
        }
        Command::Stops { route } => {
            let mut stops = api.get_stops(&route).await?;
            stops.sort_by(|a, b| a.id.cmp(&b.id));
            for stop in stops {
                println!(
                    "{:<8} {:>10.5} {:>10.5}  {}",
                    stop.id, stop.latitude, stop.longitude, stop.name
                );
            }
        }
        Command::Predictions { stop, routes } => {
            let routes: Option<Vec<&str>> =
                routes.as_ref().map(|r| r.iter().map(String::as_str).collect());
            let predictions = api.get_stop_predictions(&stop, routes.as_deref()).await?;
            if predictions.is_empty() {
                println!("No upcoming buses.");
            }
            for p in predictions {
                println!(
                    "{:<6} {:>4} min  {}{}",
                    p.route_display,
                    p.prediction_countdown,
                    p.final_destination,
                    if p.delayed { " (delayed)" } else { "" }
                );
            }
        }
        Command::Feeds => {
            for feed in api.get_rtpi_data_feeds().await? {
                println!(
                    "{:<16} enabled={:<5} visible={:<5} {}",
                    feed.name, feed.enabled, feed.visible, feed.display_name
                );
            }
        }
        Command::Nearby {
            latitude,
            longitude,
            threshold,
        } => {
            let stop = api.get_closest_stop(latitude, longitude, threshold).await?;
            println!("{} ({:.0} m)", stop.id, stop.distance);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command(&args("routes")), Ok(Command::Routes));
        assert_eq!(parse_command(&args("feeds")), Ok(Command::Feeds));
        assert_eq!(
            parse_command(&args("stops BB")),
            Ok(Command::Stops { route: "BB".into() })
        );
        assert_eq!(
            parse_command(&args("directions NW")),
            Ok(Command::Directions { route: "NW".into() })
        );
    }

    #[test]
    fn parse_predictions_route_filter() {
        assert_eq!(
            parse_command(&args("predictions N550")),
            Ok(Command::Predictions {
                stop: "N550".into(),
                routes: None
            })
        );
        assert_eq!(
            parse_command(&args("predictions N550 BB,NW")),
            Ok(Command::Predictions {
                stop: "N550".into(),
                routes: Some(vec!["BB".into(), "NW".into()])
            })
        );
    }

    #[test]
    fn parse_nearby_threshold() {
        assert_eq!(
            parse_command(&args("nearby 42.2773 -83.7356")),
            Ok(Command::Nearby {
                latitude: 42.2773,
                longitude: -83.7356,
                threshold: DEFAULT_NEARBY_THRESHOLD_M
            })
        );
        assert_eq!(
            parse_command(&args("nearby 42.2773 -83.7356 50")),
            Ok(Command::Nearby {
                latitude: 42.2773,
                longitude: -83.7356,
                threshold: 50.0
            })
        );
    }

    #[test]
    fn unknown_commands_rejected() {
        assert_eq!(parse_command(&[]), Err(UsageError::MissingCommand));
        assert!(matches!(
            parse_command(&args("bogus")),
            Err(UsageError::Unrecognized(_))
        ));
        assert!(matches!(
            parse_command(&args("routes extra")),
            Err(UsageError::Unrecognized(_))
        ));
        assert!(matches!(
            parse_command(&args("stops")),
            Err(UsageError::Unrecognized(_))
        ));
    }

    #[test]
    fn bad_nearby_numbers_rejected() {
        assert_eq!(
            parse_command(&args("nearby abc def")),
            Err(UsageError::InvalidNumber {
                what: "latitude",
                value: "abc".into()
            })
        );
        assert_eq!(
            parse_command(&args("nearby 42.2 -83.7 far")),
            Err(UsageError::InvalidNumber {
                what: "threshold",
                value: "far".into()
            })
        );
        assert!(parse_command(&args("nearby 42.2 NaN")).is_err());
        assert!(parse_command(&args("nearby 1 2 3 4")).is_err());
    }

    #[test]
    fn feed_needed_for_route_listings_only() {
        assert!(Command::Routes.needs_feed());
        assert!(Command::Stops { route: "BB".into() }.needs_feed());
        assert!(!Command::Feeds.needs_feed());
    }
}
