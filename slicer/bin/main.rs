use std::{
    fs::File,
    io::{stdout, BufWriter, Write},
    thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

use area_slicer::distribution::{Axis, Distribution, Distributor};
use args::{Args, AxisArg};
use common::format::Format;

mod args;

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };
    let filter = filter::Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target("slicer", level)
        .with_target("area_slicer", level);
    let format = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();

    let config = args.distribution_config()?;
    let mesh = args.mesh()?;
    info!(
        "Generated {}. {{ vert: {}, face: {} }}",
        args.shape.name(),
        mesh.vertex_count(),
        mesh.face_count()
    );

    let now = Instant::now();

    let distributor = Distributor::new(mesh, config);
    let progress = distributor.progress();

    let axis = args.axis;
    let handle = thread::spawn(move || match axis {
        AxisArg::All => distributor.principal_distributions().map(Vec::from),
        AxisArg::Direction(direction) => distributor.distribution(direction).map(|x| vec![x]),
    });

    while !handle.is_finished() {
        if progress.total() > 0 {
            eprint!(
                "\rSlice: {}/{}, {:.1}%",
                progress.completed(),
                progress.total(),
                progress.progress() * 100.0
            );
        }
        thread::sleep(Duration::from_millis(50));
    }
    eprintln!();

    let distributions = handle
        .join()
        .map_err(|_| anyhow!("Slicing thread panicked"))??;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(stdout())),
    };
    match args.output_format() {
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &distributions)?;
            writeln!(out)?;
        }
        Format::Csv => write_csv(&mut out, &distributions)?,
    }
    out.flush()?;

    for distribution in &distributions {
        let Some(peak) = distribution.peak() else {
            continue;
        };
        eprintln!(
            "{}: peak area {:.6} at {:.6} of {:.6} ({} slices)",
            axis_label(distribution),
            peak.area,
            peak.location,
            distribution.length(),
            distribution.len()
        );
        for (location, diagnostic) in distribution.diagnostics() {
            eprintln!(" \\ at {location:.6}: {diagnostic}");
        }
    }

    eprintln!("Done. Elapsed: {:.1}s", now.elapsed().as_secs_f32());

    Ok(())
}

fn write_csv(out: &mut impl Write, distributions: &[Distribution]) -> Result<()> {
    writeln!(out, "axis,location,area,diagnostics")?;
    for distribution in distributions {
        let label = axis_label(distribution);
        for entry in &distribution.entries {
            writeln!(
                out,
                "{label},{},{},{}",
                entry.location,
                entry.area,
                entry.diagnostics.len()
            )?;
        }
    }

    Ok(())
}

fn axis_label(distribution: &Distribution) -> String {
    let axis = distribution.axis;
    match Axis::from_direction(&axis) {
        Some(axis) => axis.to_string(),
        None => format!("{} {} {}", axis.x, axis.y, axis.z),
    }
}
