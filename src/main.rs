use clap::{Parser, Subcommand};
use std::path::PathBuf;

use eirpost::config::Config;
use eirpost::geo::{Coordinate, POSTAL_AREAS};
use eirpost::logging::init_logger;
use eirpost::package::QuoteRequest;

/// eirpost — courier quotes for Irish addresses and Eircodes
///
/// Resolves addresses to approximate coordinates, measures the great-circle
/// distance between pickup and delivery, and prices the delivery.
///
/// Examples:
///   eirpost resolve "D02 AF30"
///   eirpost quote --from "Dublin D01" --to "Cork T12" --weight 2.5
///   eirpost quote --from x --to y --pickup-lat 53.35 --pickup-lon -6.26 --delivery-lat 51.9 --delivery-lon -8.48
///   eirpost serve --port 8080
#[derive(Parser)]
#[command(name = "eirpost", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.eirpost/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fixed seed for address jitter (reproducible output).
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Debug logging.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an address to approximate coordinates.
    Resolve {
        address: String,
    },

    /// Quote distance and price between two addresses.
    Quote {
        /// Pickup address or Eircode.
        #[arg(long)]
        from: String,

        /// Delivery address or Eircode.
        #[arg(long)]
        to: String,

        /// Parcel weight in kilograms (default 1.0).
        #[arg(long, allow_hyphen_values = true)]
        weight: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "pickup_lon")]
        pickup_lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "pickup_lat")]
        pickup_lon: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "delivery_lon")]
        delivery_lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "delivery_lat")]
        delivery_lon: Option<f64>,
    },

    /// List the built-in postal areas.
    Areas,

    /// Run the HTTP API.
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

fn pair(lat: Option<f64>, lon: Option<f64>) -> Option<Coordinate> {
    Some(Coordinate::new(lat?, lon?))
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: cannot serialize output: {}", e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    if cli.seed.is_some() {
        config.geo.seed = cli.seed;
    }

    match cli.command {
        Command::Resolve { address } => {
            let service = config.package_service();
            let resolution = service.resolve(&address);
            eprintln!("  \u{1F4CD} {} \u{2014} {}", resolution.coord, resolution.matched);
            print_json(&resolution);
        }
        Command::Quote {
            from,
            to,
            weight,
            pickup_lat,
            pickup_lon,
            delivery_lat,
            delivery_lon,
        } => {
            let service = config.package_service();
            let req = QuoteRequest {
                pickup_address: from,
                delivery_address: to,
                pickup_coords: pair(pickup_lat, pickup_lon),
                delivery_coords: pair(delivery_lat, delivery_lon),
                weight_kg: weight,
            };
            let quote = service.quote(&req);
            eprintln!(
                "  {} \u{2192} {}: {:.2} km, \u{20AC}{:.2}",
                req.pickup_address, req.delivery_address, quote.distance_km, quote.price
            );
            print_json(&quote);
        }
        Command::Areas => print_json(&POSTAL_AREAS),
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let service = config.package_service();
            if let Err(e) = eirpost::server::start(&host, port, service).await {
                eprintln!("Server error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
