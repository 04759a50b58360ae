use clap::{Args, Parser, Subcommand};
use millview::{
    compile, format_coordinate, format_distance, format_duration, init_logging, validate,
    CompiledProgram, GcodeError, PlaybackState, Point3D, TemplateLibrary, ViewerConfig,
    BUILD_DATE, VERSION,
};
use millview_visualizer::visualizer::{adaptive_pointer_scale, aggregate_statistics};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

/// Guard against programs that never finish playing
const MAX_SIMULATION_FRAMES: usize = 50_000_000;

/// MillView command-line interface
#[derive(Parser, Debug)]
#[command(
    name = "millview",
    version = VERSION,
    about = "Inspect, validate and simulate CNC milling programs."
)]
struct Cli {
    /// Viewer configuration file (.json or .toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print bounds, statistics and pointer scale for a program
    Stats(ProgramSource),
    /// Lint a program and report issues
    Validate {
        /// Program file
        file: PathBuf,
    },
    /// Play a program back with a fixed frame clock
    Simulate {
        #[command(flatten)]
        source: ProgramSource,

        /// Playback speed multiplier (defaults to the configured speed)
        #[arg(long)]
        speed: Option<f64>,

        /// Simulated frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },
    /// List built-in templates
    Templates,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ProgramSource {
    /// Program file
    file: Option<PathBuf>,

    /// Built-in template id
    #[arg(long)]
    template: Option<String>,
}

impl ProgramSource {
    /// Read the program text and a display name
    fn read(&self) -> millview::Result<(String, String)> {
        if let Some(id) = &self.template {
            let library = TemplateLibrary::builtin();
            let template = library
                .get(id)
                .ok_or_else(|| GcodeError::UnknownTemplate { id: id.clone() })?;
            return Ok((template.gcode.to_string(), template.file_name()));
        }

        let path = self.file.as_ref().ok_or_else(|| GcodeError::FileError {
            reason: "no program given".to_string(),
        })?;
        read_program(path)
    }
}

fn read_program(path: &Path) -> millview::Result<(String, String)> {
    let text = std::fs::read_to_string(path).map_err(|e| GcodeError::FileError {
        reason: format!("{}: {}", path.display(), e),
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((text, name))
}

fn format_point(p: &Point3D) -> String {
    format!(
        "X{} Y{} Z{}",
        format_coordinate(p.x),
        format_coordinate(p.y),
        format_coordinate(p.z)
    )
}

fn print_stats(name: &str, program: &CompiledProgram) {
    let stats = aggregate_statistics(program);
    let (dx, dy, dz) = program.bounds.extents();

    println!("{}", name);
    println!("  commands:        {}", program.commands.len());
    println!("  toolpath points: {}", program.len());
    println!("  bounds min:      {}", format_point(&program.bounds.min));
    println!("  bounds max:      {}", format_point(&program.bounds.max));
    println!(
        "  size:            {} x {} x {}",
        format_distance(dx),
        format_distance(dy),
        format_distance(dz)
    );
    println!("  total distance:  {}", format_distance(stats.total_distance));
    println!(
        "  cutting:         {} ({} moves, {} arc)",
        format_distance(stats.cutting_distance),
        stats.cutting_move_count,
        stats.arc_move_count
    );
    println!(
        "  rapid:           {} ({} moves)",
        format_distance(stats.rapid_distance),
        stats.rapid_move_count
    );
    println!(
        "  estimated time:  {}",
        format_duration(stats.estimated_time_seconds)
    );
    println!("  pointer scale:   {:.3}", adaptive_pointer_scale(program));
}

fn run_validate(file: &Path) -> anyhow::Result<ExitCode> {
    let (text, name) = read_program(file)?;
    let result = validate(&text);

    for issue in &result.issues {
        println!("{}:{}", name, issue);
    }
    println!(
        "{}: {} errors, {} warnings",
        name, result.error_count, result.warning_count
    );

    Ok(if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_simulate(program: &CompiledProgram, name: &str, speed: f64, fps: u32) -> anyhow::Result<()> {
    if fps == 0 {
        anyhow::bail!("--fps must be greater than zero");
    }
    if !(speed.is_finite() && speed > 0.0) {
        anyhow::bail!("--speed must be a positive number");
    }

    let frame = 1.0 / fps as f64;
    let mut playback = PlaybackState::new(speed);
    playback.play();

    let mut frames = 0usize;
    while playback.is_playing && frames < MAX_SIMULATION_FRAMES {
        if playback.tick(program, frame) {
            debug!(
                "Reached point {} ({:.1}%)",
                playback.current_index,
                playback.percent_complete(program)
            );
        }
        frames += 1;
    }

    println!("{}", name);
    println!("  speed:           {}x at {} fps", playback.speed, fps);
    println!("  frames:          {}", frames);
    println!("  simulated time:  {}", format_duration(frames as f64 * frame));
    println!(
        "  final position:  {}",
        format_point(&playback.tool_position(program))
    );
    println!(
        "  progress:        {:.1}%",
        playback.percent_complete(program)
    );
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    init_logging()?;
    debug!("MillView {} (built {})", VERSION, BUILD_DATE);

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ViewerConfig::load_from_file(path)?,
        None => ViewerConfig::default(),
    };

    match cli.command {
        Commands::Stats(source) => {
            let (text, name) = source.read()?;
            print_stats(&name, &compile(&text));
        }
        Commands::Validate { file } => return run_validate(&file),
        Commands::Simulate { source, speed, fps } => {
            let (text, name) = source.read()?;
            let speed = speed.unwrap_or(config.playback_speed);
            run_simulate(&compile(&text), &name, speed, fps)?;
        }
        Commands::Templates => {
            for template in TemplateLibrary::builtin().list() {
                println!("{:<10} {:<18} {}", template.id, template.name, template.description);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
