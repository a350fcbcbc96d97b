use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use pathgrid::{dijkstra, reconstruct_path, Grid, GridConfig, GridSearch, Point};
use serde::Serialize;

/// Run Dijkstra from the start to the finish of a grid and print what it found
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON grid configuration, defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// ASCII layout (S start, F finish, # wall, . open), replaces the configured grid
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Extra wall as ROW,COL, may be repeated
    #[arg(long = "wall", value_parser = parse_point)]
    walls: Vec<Point>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize, Debug)]
struct Report<'a> {
    visited_order: &'a [Point],
    path: Option<Vec<Point>>,
    distance: Option<usize>,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL but got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok(Point::new(parse(row)?, parse(col)?))
}

fn load_grid(args: &Args) -> anyhow::Result<Grid> {
    let mut grid = match &args.layout {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading layout {}", path.display()))?
            .parse::<Grid>()?,
        None => {
            let config = match &args.config {
                Some(path) => GridConfig::load(path)?,
                None => GridConfig::default(),
            };
            Grid::from_config(&config)?
        }
    };

    for &wall in &args.walls {
        if wall == grid.start() || wall == grid.finish() {
            bail!("cannot place a wall on the start or finish at {wall}");
        }
        grid = grid.toggle_wall(wall)?;
    }

    Ok(grid)
}

/// Everything a run found, `path` and `distance` are `None` when the finish is unreachable
fn report<'a>(grid: &Grid, search: &'a GridSearch) -> anyhow::Result<Report<'a>> {
    let path = search
        .reached_goal()
        .then(|| reconstruct_path(search, grid.finish()))
        .transpose()?;

    Ok(Report {
        visited_order: search.visited_order(),
        distance: path.as_ref().and(search.distance(grid.finish())),
        path,
    })
}

/// The grid, the distance map and the grid with the path drawn in, followed by a summary line
fn render_text(grid: &Grid, search: &GridSearch, report: &Report<'_>) -> String {
    let mut out = format!("{}\n{}\n", grid, search.nodes());
    match (&report.path, report.distance) {
        (Some(path), Some(distance)) => {
            out.push_str(&format!("{}\n", grid.render_path(path)));
            out.push_str(&format!(
                "visited {} cells, shortest path has {} steps",
                report.visited_order.len(),
                distance
            ));
        }
        _ => out.push_str(&format!(
            "visited {} cells, the finish is unreachable",
            report.visited_order.len()
        )),
    }
    out
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args = Args::parse();
    let grid = load_grid(&args)?;

    let search = dijkstra(&grid, grid.start(), grid.finish())?;
    let report = report(&grid, &search)?;

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => println!("{}", render_text(&grid, &search, &report)),
    }

    Ok(())
}
