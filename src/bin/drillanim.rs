use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "drillanim", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile every continuity and list the diagnostics per sheet.
    Check(CheckArgs),
    /// Print every marcher's position at one beat as JSON.
    Positions(PositionsArgs),
    /// List colliding marchers for every beat of the show.
    Collisions(BuildArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Input show JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Compile marchers on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel` (defaults to one per core).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    #[command(flatten)]
    build: BuildArgs,
}

#[derive(Parser, Debug)]
struct PositionsArgs {
    #[command(flatten)]
    build: BuildArgs,

    /// Global beat (0-based).
    #[arg(long)]
    beat: u32,

    /// Only print this marcher.
    #[arg(long)]
    point: Option<usize>,
}

#[derive(serde::Serialize)]
struct PositionRow {
    point: usize,
    x: i32,
    y: i32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Positions(args) => cmd_positions(args),
        Command::Collisions(args) => cmd_collisions(args),
    }
}

fn read_show_json(path: &Path) -> anyhow::Result<drillanim::Show> {
    let f = File::open(path).with_context(|| format!("open show '{}'", path.display()))?;
    let r = BufReader::new(f);
    let show: drillanim::Show = serde_json::from_reader(r).with_context(|| "parse show JSON")?;
    show.validate()?;
    Ok(show)
}

fn build_animation(args: &BuildArgs) -> anyhow::Result<(drillanim::Show, drillanim::Animation)> {
    let show = read_show_json(&args.in_path)?;
    let opts = drillanim::BuildOptions {
        parallel: args.parallel,
        threads: args.threads,
        ..drillanim::BuildOptions::default()
    };
    let anim = drillanim::Animation::build_with(&show, &opts)?;
    Ok((show, anim))
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let (show, anim) = build_animation(&args.build)?;

    let mut total = 0usize;
    for (i, sheet) in show.sheets.iter().enumerate() {
        let Some(errors) = anim.errors_for_sheet(i) else {
            continue;
        };
        for (kind, marker) in errors.iter() {
            total += 1;
            let points: Vec<String> = marker.points.iter().map(usize::to_string).collect();
            let loc = marker
                .loc
                .map(|l| format!(" at {}:{}", l.line, l.col))
                .unwrap_or_default();
            println!(
                "sheet {i} '{}': {kind} (points {}; symbol {:?}){loc}",
                sheet.name,
                points.join(", "),
                marker.symbol,
            );
        }
    }

    if total > 0 {
        anyhow::bail!("{total} continuity error(s)");
    }
    eprintln!(
        "ok: {} sheets, {} beats, {} points",
        anim.sheets().len(),
        anim.total_beats(),
        anim.num_points()
    );
    Ok(())
}

fn cmd_positions(args: PositionsArgs) -> anyhow::Result<()> {
    let (_, anim) = build_animation(&args.build)?;

    let points: Vec<usize> = match args.point {
        Some(p) => vec![p],
        None => (0..anim.num_points()).collect(),
    };
    let rows = points
        .into_iter()
        .map(|point| {
            let c = anim.position_at(point, args.beat)?;
            Ok(PositionRow {
                point,
                x: c.x,
                y: c.y,
            })
        })
        .collect::<drillanim::DrillResult<Vec<_>>>()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&rows).context("serialize positions")?
    );
    Ok(())
}

fn cmd_collisions(args: BuildArgs) -> anyhow::Result<()> {
    let (_, anim) = build_animation(&args)?;

    for (beat, pairs) in anim.all_collisions() {
        let listed: Vec<String> = pairs
            .iter()
            .map(|(pair, kind)| format!("{}-{} {kind:?}", pair.first, pair.second))
            .collect();
        println!("beat {beat}: {}", listed.join(", "));
    }
    Ok(())
}
