use std::{fs::File, io::BufWriter, path::PathBuf};

use campus_nav::{
    config::{init_tracing, parse_coordinate},
    engine::RouteEngine,
    gpx_export::write_route_gpx,
    models::Coordinate,
    store::read_roads,
};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Compute a campus route from a road file without starting the server"
)]
struct Args {
    /// Road file (JSON array of roads, as written by the server)
    #[arg(long)]
    roads: PathBuf,

    /// Start coordinate as LAT,LNG
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    from: Coordinate,

    /// Destination coordinate as LAT,LNG
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    to: Coordinate,

    /// Also write the route as a GPX 1.1 file
    #[arg(long)]
    gpx: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info");

    let args = Args::parse();
    let roads = read_roads(&args.roads)?;
    tracing::info!("loaded {} roads from {:?}", roads.len(), args.roads);

    let route = RouteEngine::new().compute_route(args.from, args.to, &roads);
    tracing::info!(
        status = ?route.status,
        distance_m = route.distance_m,
        waypoints = route.waypoints.len(),
        "route computed"
    );

    if let Some(path) = &args.gpx {
        write_route_gpx(&route, BufWriter::new(File::create(path)?))?;
        tracing::info!("wrote GPX to {:?}", path);
    }

    println!("{}", serde_json::to_string_pretty(&route)?);
    Ok(())
}
