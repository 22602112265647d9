//! GeoTract CLI - census-tract demographics and road-corridor analysis

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geo::BooleanOps;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use geotract_algorithms::prelude::*;
use geotract_data::{
    fetch_tracts, filter_year, impute_median, read_roads_zip, read_snapshot, read_tracts_geojson,
    rescale_to_thousands, write_snapshot,
};
use geotract_render::{choropleth, choropleth_panel, explore, MapStyle, Palette};

mod config;
use config::AnalysisConfig;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "geotract")]
#[command(author, version, about = "Census-tract demographics and road-corridor analysis", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file overriding the built-in defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, clean and snapshot a county tract dataset
    Prepare {
        /// GeoJSON source: an http(s) URL (a `{county}` placeholder is
        /// substituted with the FIPS code) or a local file
        source: String,
        /// County FIPS code
        #[arg(long)]
        county: Option<String>,
        /// Census year to keep
        #[arg(short, long)]
        year: Option<i64>,
        /// Output snapshot file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Corridor analysis: buffer roads and interpolate population
    Corridor {
        /// Tract table (.parquet snapshot or GeoJSON)
        tracts: PathBuf,
        /// Zipped road-network shapefile
        #[arg(long)]
        roads: Option<PathBuf>,
        /// Buffer half-width in meters
        #[arg(short, long)]
        distance: Option<f64>,
        /// Vertices per buffer end cap
        #[arg(long)]
        segments: Option<usize>,
    },
    /// Static choropleth of one variable
    Choropleth {
        /// Tract table (.parquet snapshot or GeoJSON)
        tracts: PathBuf,
        /// Column to map
        variable: String,
        /// Output PNG file
        output: PathBuf,
        /// Number of classes
        #[arg(short, long)]
        k: Option<usize>,
        /// Classification scheme: quantiles, equal-interval
        #[arg(long, default_value = "quantiles")]
        scheme: String,
        /// Palette: viridis, ylorrd, blues, greys
        #[arg(long, default_value = "viridis")]
        palette: String,
        #[arg(long, default_value = "1000")]
        width: u32,
        #[arg(long, default_value = "800")]
        height: u32,
    },
    /// Interactive choropleth as a Leaflet HTML file
    Explore {
        /// Tract table (.parquet snapshot or GeoJSON)
        tracts: PathBuf,
        /// Column to map
        variable: String,
        /// Output HTML file
        output: PathBuf,
        /// Number of classes
        #[arg(short, long)]
        k: Option<usize>,
        /// Palette: viridis, ylorrd, blues, greys
        #[arg(long, default_value = "ylorrd")]
        palette: String,
    },
    /// Side-by-side share maps, optionally with a corridor overlay
    Panel {
        /// Tract table (.parquet snapshot or GeoJSON)
        tracts: PathBuf,
        /// Output PNG file
        output: PathBuf,
        /// Comma-separated share columns (default from config)
        #[arg(long)]
        variables: Option<String>,
        /// Overlay the corridor derived from this road file
        #[arg(long)]
        roads: Option<PathBuf>,
        /// Buffer half-width in meters for the overlay
        #[arg(short, long)]
        distance: Option<f64>,
        #[arg(long, default_value = "1500")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

/// Load a tract table from a snapshot or a GeoJSON file, by extension.
fn load_tracts(path: &Path) -> Result<GeoTable> {
    let pb = spinner("Reading tracts...");
    let table = match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => read_snapshot(path).context("Failed to read snapshot")?,
        _ => read_tracts_geojson(path).context("Failed to read tract GeoJSON")?,
    };
    pb.finish_and_clear();
    info!("Tracts: {} rows ({})", table.len(), table.crs);
    Ok(table)
}

fn parse_scheme(s: &str) -> Result<Scheme> {
    match s.to_lowercase().as_str() {
        "quantiles" | "q" => Ok(Scheme::Quantiles),
        "equal-interval" | "equal" | "e" => Ok(Scheme::EqualInterval),
        _ => anyhow::bail!("Unknown scheme: {}. Use quantiles or equal-interval.", s),
    }
}

fn parse_palette(s: &str) -> Result<Palette> {
    match s.to_lowercase().as_str() {
        "viridis" => Ok(Palette::Viridis),
        "ylorrd" => Ok(Palette::YlOrRd),
        "blues" => Ok(Palette::Blues),
        "greys" | "grays" => Ok(Palette::Greys),
        _ => anyhow::bail!("Unknown palette: {}. Use viridis, ylorrd, blues, or greys.", s),
    }
}

/// Project a geographic table into its estimated UTM zone. Projected
/// input passes through untouched.
fn to_utm(table: &GeoTable) -> Result<(GeoTable, Crs)> {
    if table.crs.is_projected() {
        return Ok((table.clone(), table.crs.clone()));
    }
    let utm = Crs::utm_for_extent(&table.bounds()?)?;
    info!("Estimated UTM zone: {}", utm);
    let projected = reproject_table(table, &utm)?;
    Ok((projected, utm))
}

/// Region boundary, clipped roads and corridor polygon in one go.
fn build_corridor(
    tracts: &GeoTable,
    roads_path: &Path,
    params: &BufferParams,
) -> Result<(GeoTable, geo::MultiPolygon<f64>, geo::MultiPolygon<f64>)> {
    let (tracts_utm, utm) = to_utm(tracts)?;

    let pb = spinner("Reading roads...");
    let roads = read_roads_zip(roads_path).context("Failed to read road network")?;
    pb.finish_and_clear();
    let roads_utm = reproject_table(&roads, &utm).context("Failed to project roads")?;

    let region = region_boundary(&tracts_utm).context("Failed to dissolve region boundary")?;
    let clipped = clip_roads(&roads_utm, &region).context("Failed to clip roads")?;
    info!("Roads intersecting region: {}", clipped.len());

    let buffered = corridor(&clipped, params).context("Failed to build corridor")?;
    // Population outside the region must not be attributed to the corridor
    let target = buffered.intersection(&region);
    Ok((tracts_utm, region, target))
}

/// Derive share columns from subgroup counts where they are missing.
fn attach_shares(table: &mut GeoTable, config: &AnalysisConfig) -> Result<()> {
    let missing: Vec<(String, String)> = config
        .subgroup_variables
        .iter()
        .zip(&config.share_variables)
        .filter(|(_, share)| !table.has_column(share))
        .map(|(n, p)| (n.clone(), p.clone()))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    let subgroups: Vec<String> = missing.iter().map(|(n, _)| n.clone()).collect();
    let rows = composition(table, &config.total_variable, &subgroups)
        .context("Failed to derive share columns")?;
    for (feature, row) in table.features.iter_mut().zip(rows) {
        for (subgroup, share) in &missing {
            feature.set_property(share.clone(), AttributeValue::Float(row.shares[subgroup]));
        }
    }
    Ok(())
}

fn print_estimates(estimates: &GeoTable, config: &AnalysisConfig) -> Result<()> {
    let names = ["region", "corridor"];
    let variables = config.extensive_variables();

    println!("\n{:<26} {:>14} {:>14}", "variable", names[0], names[1]);
    for variable in &variables {
        let column = estimates.numeric_column(variable)?;
        println!(
            "{:<26} {:>14.1} {:>14.1}",
            variable,
            column[0].unwrap_or(f64::NAN),
            column[1].unwrap_or(f64::NAN)
        );
    }

    let rows = composition(estimates, &config.total_variable, &config.subgroup_variables)
        .context("Composition is undefined for a zero-population target")?;
    println!("\n{:<26} {:>14} {:>14}", "share", names[0], names[1]);
    for subgroup in &config.subgroup_variables {
        println!(
            "{:<26} {:>14.4} {:>14.4}",
            subgroup, rows[0].shares[subgroup], rows[1].shares[subgroup]
        );
    }
    Ok(())
}

/// County-wide shares straight from the tract table, as a baseline
/// against the corridor composition.
fn print_county_shares(tracts: &GeoTable, config: &AnalysisConfig) -> Result<()> {
    let shares = aggregate_composition(tracts, &config.total_variable, &config.subgroup_variables)
        .context("County-wide composition is undefined")?;
    println!("\n{:<26} {:>14}", "share", "county");
    for subgroup in &config.subgroup_variables {
        println!("{:<26} {:>14.4}", subgroup, shares[subgroup]);
    }
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let config = AnalysisConfig::load(cli.config.as_deref())?;

    match cli.command {
        // ── Prepare ──────────────────────────────────────────────────
        Commands::Prepare {
            source,
            county,
            year,
            output,
        } => {
            let county = county.unwrap_or_else(|| config.county_fips.clone());
            let year = year.unwrap_or(config.year);
            let output = output.unwrap_or_else(|| config.snapshot_path.clone());

            let start = Instant::now();
            let table = if source.starts_with("http://") || source.starts_with("https://") {
                let pb = spinner("Fetching tracts...");
                let table = fetch_tracts(&source, &county).context("Failed to fetch tracts")?;
                pb.finish_and_clear();
                table
            } else {
                read_tracts_geojson(Path::new(&source)).context("Failed to read tracts")?
            };

            let mut table = filter_year(&table, year).context("Failed to filter year")?;
            info!("Tracts for {}: {}", year, table.len());
            impute_median(&mut table).context("Failed to impute missing values")?;
            rescale_to_thousands(&mut table, &config.home_value_variable)
                .context("Failed to rescale home values")?;
            write_snapshot(&table, &output).context("Failed to write snapshot")?;
            done("Snapshot", &output, start.elapsed());
        }

        // ── Corridor ─────────────────────────────────────────────────
        Commands::Corridor {
            tracts,
            roads,
            distance,
            segments,
        } => {
            let roads = roads.unwrap_or_else(|| config.roads_path.clone());
            let params = BufferParams {
                distance: distance.unwrap_or(config.buffer_distance),
                segments: segments.unwrap_or(config.segments),
            };

            let table = load_tracts(&tracts)?;
            let start = Instant::now();
            let (tracts_utm, region, target) = build_corridor(&table, &roads, &params)?;

            let estimates = area_interpolate(
                &tracts_utm,
                &[region, target],
                &config.extensive_variables(),
            )
            .context("Failed to interpolate population")?;
            print_estimates(&estimates, &config)?;
            print_county_shares(&tracts_utm, &config)?;
            println!("\n  Processing time: {:.2?}", start.elapsed());
        }

        // ── Choropleth ───────────────────────────────────────────────
        Commands::Choropleth {
            tracts,
            variable,
            output,
            k,
            scheme,
            palette,
            width,
            height,
        } => {
            let style = MapStyle {
                width,
                height,
                classify: ClassifyParams {
                    scheme: parse_scheme(&scheme)?,
                    k: k.unwrap_or(config.classes),
                },
                palette: parse_palette(&palette)?,
                ..MapStyle::default()
            };
            let table = load_tracts(&tracts)?;
            let start = Instant::now();
            choropleth(&table, &variable, &style, &output).context("Failed to render map")?;
            done("Choropleth", &output, start.elapsed());
        }

        // ── Explore ──────────────────────────────────────────────────
        Commands::Explore {
            tracts,
            variable,
            output,
            k,
            palette,
        } => {
            let style = MapStyle {
                classify: ClassifyParams {
                    scheme: Scheme::Quantiles,
                    k: k.unwrap_or(config.classes),
                },
                palette: parse_palette(&palette)?,
                ..MapStyle::default()
            };
            let table = load_tracts(&tracts)?;
            let start = Instant::now();
            explore(&table, &variable, &style, &output).context("Failed to render map")?;
            done("Interactive map", &output, start.elapsed());
        }

        // ── Panel ────────────────────────────────────────────────────
        Commands::Panel {
            tracts,
            output,
            variables,
            roads,
            distance,
            width,
            height,
        } => {
            let variables: Vec<String> = match variables {
                Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
                None => config.share_variables.clone(),
            };
            let style = MapStyle {
                width,
                height,
                classify: ClassifyParams {
                    scheme: Scheme::Quantiles,
                    k: config.classes,
                },
                ..MapStyle::default()
            };

            let table = load_tracts(&tracts)?;
            let start = Instant::now();
            let (mut table, overlay) = match roads {
                Some(roads) => {
                    let params = BufferParams {
                        distance: distance.unwrap_or(config.buffer_distance),
                        segments: config.segments,
                    };
                    let (tracts_utm, _, target) = build_corridor(&table, &roads, &params)?;
                    (tracts_utm, Some(target))
                }
                None => (table, None),
            };
            attach_shares(&mut table, &config)?;
            choropleth_panel(&table, &variables, &style, overlay.as_ref(), &output)
                .context("Failed to render panel")?;
            done("Panel", &output, start.elapsed());
        }
    }

    Ok(())
}
