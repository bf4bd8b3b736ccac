use aurora_render::{RenderSettings, Renderer, SampleScene, image_out};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, debug, error, info, warn};

#[derive(clap::ValueEnum, Clone, Debug, Copy)]
enum LoggerLevel {
    Debug,
    Info,
    Warn,
    Error,
    Trace,
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output image width in pixels
    #[arg(short, long, default_value_t = 512)]
    width: usize,
    /// Output image height in pixels
    #[arg(long, default_value_t = 512)]
    height: usize,
    /// Samples per pixel
    #[arg(short, long, default_value_t = 500)]
    samples: u32,
    /// Maximum scatter depth
    #[arg(short, long, default_value_t = 50)]
    depth: u32,
    /// Worker threads; defaults to the hardware thread count
    #[arg(short, long)]
    threads: Option<usize>,
    /// Disable a scene by index (repeatable)
    #[arg(long = "noscene", value_name = "INDEX")]
    noscene: Vec<usize>,
    /// Directory the images are written into
    #[arg(short, long, default_value = "output")]
    output: PathBuf,
    /// Verbose level
    #[arg(short, long, default_value = "info")]
    level: LoggerLevel,
    /// Master seed for all sampling
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
}

fn get_logger_level(level: LoggerLevel) -> Level {
    match level {
        LoggerLevel::Debug => Level::DEBUG,
        LoggerLevel::Info => Level::INFO,
        LoggerLevel::Warn => Level::WARN,
        LoggerLevel::Error => Level::ERROR,
        LoggerLevel::Trace => Level::TRACE,
    }
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(get_logger_level(cli.level))
        .init();

    let threads = cli.threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    });
    let settings = RenderSettings::new(
        cli.width,
        cli.height,
        cli.samples,
        cli.depth,
        threads,
        true,
        cli.seed,
    );
    info!(
        width = settings.width,
        height = settings.height,
        samples = settings.samples_per_pixel,
        depth = settings.max_depth,
        threads = settings.num_threads,
        "tracing parameters"
    );

    let mut enabled = [true; SampleScene::ALL.len()];
    for &index in &cli.noscene {
        match enabled.get_mut(index) {
            Some(flag) => *flag = false,
            None => warn!(index, "unknown scene index, ignoring"),
        }
    }

    if let Err(err) = std::fs::create_dir_all(&cli.output) {
        error!(path = %cli.output.display(), %err, "cannot create output directory");
        std::process::exit(1);
    }

    let mut renderer = Renderer::new(settings);
    for (index, scene_type) in SampleScene::ALL.into_iter().enumerate() {
        if !enabled[index] {
            debug!(name = scene_type.output_name(), "scene disabled");
            continue;
        }

        utils::seed_thread_rng(cli.seed);
        let mut scene = scene_type.build();
        scene
            .camera_mut()
            .set_aspect(cli.width as f32 / cli.height as f32);

        info!(name = scene_type.output_name(), "rendering scene");
        renderer.begin_trace(Arc::new(scene), None);

        let bar = ProgressBar::new(renderer.stats().total_num_pixel_samples as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap(),
        );
        while !renderer.wait_for_trace_to_finish(Some(Duration::from_millis(500))) {
            bar.set_position(renderer.stats().num_pixel_samples as u64);
        }
        bar.finish();

        let stats = renderer.stats();
        info!(
            rays = stats.total_rays_fired,
            pdf_retries = stats.num_pdf_query_retries,
            seconds = stats.total_time_seconds,
            "render finished"
        );

        write_outputs(&renderer, scene_type, &cli.output, cli.samples);
    }
}

fn write_outputs(
    renderer: &Renderer,
    scene_type: SampleScene,
    output_dir: &Path,
    samples: u32,
) {
    let name = scene_type.output_name();
    let buffer = renderer.buffer();
    let targets = [
        image_out::write_png(buffer, samples, output_dir.join(format!("{name}.png"))),
        image_out::write_ppm(buffer, samples, output_dir.join(format!("{name}.ppm"))),
        image_out::write_exr(buffer, samples, output_dir.join(format!("{name}.exr"))),
    ];
    for result in targets {
        if let Err(err) = result {
            error!(name, %err, "image write failed");
        }
    }
}
