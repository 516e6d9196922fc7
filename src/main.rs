use anyhow::{Context, Result};
use blackhole_tracer::simulation::{SimulationConfig, Simulator};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Relativistic black hole ray tracer
#[derive(Parser, Debug)]
#[command(version, about = "Relativistic black hole ray tracer")]
struct Args {
    /// Mass in solar masses [default: 10]
    #[arg(short = 'm', long)]
    mass: Option<f64>,

    /// Spin parameter a/M; above 0.01 selects a Kerr hole [default: 0]
    #[arg(short = 's', long)]
    spin: Option<f64>,

    /// Inclination in degrees, 0 pole-on, 90 edge-on [default: 75]
    #[arg(short = 'i', long)]
    inclination: Option<f64>,

    /// Observer distance in Schwarzschild radii [default: 100]
    #[arg(short = 'd', long)]
    distance: Option<f64>,

    /// Image width in pixels [default: 800]
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Image height in pixels [default: 600]
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Horizontal field of view in degrees [default: 45]
    #[arg(short = 'f', long)]
    fov: Option<f64>,

    /// Worker threads [default: 4]
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Output directory [default: output]
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Base integration step in Schwarzschild radii [default: 0.1]
    #[arg(long)]
    step: Option<f64>,

    /// Integration step budget per ray [default: 10000]
    #[arg(long = "max-steps")]
    max_steps: Option<usize>,

    /// Render without the accretion disk
    #[arg(long = "no-disk", default_value_t = false)]
    no_disk: bool,

    /// Accretion rate as a fraction of Eddington [default: 0.1]
    #[arg(long)]
    eddington: Option<f64>,

    /// Also write a per-pixel CSV next to the image
    #[arg(long, default_value_t = false)]
    csv: bool,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Integrate a single photon with this impact parameter (r_s) and write it as CSV
    #[arg(long)]
    trajectory: Option<f64>,

    /// Print the physical analysis only
    #[arg(short = 'a', long, default_value_t = false)]
    analysis: bool,

    /// Prompt for the main parameters
    #[arg(short = 'I', long, default_value_t = false)]
    interactive: bool,
}

impl Args {
    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(v) = self.mass {
            config.mass_solar = v;
        }
        if let Some(v) = self.spin {
            config.set_spin(v);
        }
        if let Some(v) = self.inclination {
            config.inclination_deg = v;
        }
        if let Some(v) = self.distance {
            config.distance_rs = v;
        }
        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.height {
            config.height = v;
        }
        if let Some(v) = self.fov {
            config.fov_deg = v;
        }
        if let Some(v) = self.threads {
            config.threads = v;
        }
        if let Some(v) = &self.output {
            config.output_dir = v.clone();
        }
        if let Some(v) = self.step {
            config.step = v;
        }
        if let Some(v) = self.max_steps {
            config.max_steps = v;
        }
        if let Some(v) = self.eddington {
            config.eddington_fraction = v;
        }
        if self.no_disk {
            config.include_disk = false;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let interactive_by_default = std::env::args_os().len() == 1;
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    args.apply(&mut config);

    let interactive = args.interactive || interactive_by_default;
    if interactive {
        prompt_config(&mut config).context("Failed to read interactive input")?;
    }

    let mut simulator = Simulator::new(config);

    if args.analysis {
        println!("{}", simulator.analysis());
        return Ok(());
    }

    if let Some(b) = args.trajectory {
        let trajectory = simulator.trajectory(b);
        let path = simulator
            .save_trajectory(&trajectory, b)
            .context("Failed to write trajectory")?;
        println!(
            "Trajectory b = {b} r_s: {} points, ended by {:?}",
            trajectory.points.len(),
            trajectory.end
        );
        println!("Saved {}", path.display());
        return Ok(());
    }

    println!("Black hole ray tracer");
    println!("=====================");
    print!("{}", simulator.parameter_summary());
    println!();

    let progress = simulator.progress();
    let done = AtomicBool::new(false);
    let image = std::thread::scope(|s| {
        s.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                eprint!("\rRendering... {:5.1}%", 100.0 * progress.fraction());
                std::thread::sleep(Duration::from_millis(250));
            }
            eprintln!("\rRendering... 100.0%");
        });
        let result = simulator.render();
        done.store(true, Ordering::Relaxed);
        result
    })
    .context("Render failed")?;

    let stats = simulator.stats();
    if let Some(elapsed) = simulator.last_render_time() {
        let pixels = image.width() * image.height();
        println!(
            "Rendered {pixels} pixels in {:.2} s ({:.0} pixels/s)",
            elapsed.as_secs_f64(),
            pixels as f64 / elapsed.as_secs_f64().max(1e-9)
        );
    }
    println!(
        "Rays: {} captured, {} on disk, {} escaped, {} exhausted (mean {:.0} steps)",
        stats.captured,
        stats.disk,
        stats.escaped,
        stats.exhausted,
        stats.mean_steps()
    );

    let paths = simulator
        .save(&image, args.csv)
        .context("Failed to save output")?;
    for path in paths {
        println!("Saved {}", path.display());
    }

    if interactive && ask_yes_no("Show the physical analysis? (y/n): ")? {
        println!();
        println!("{}", simulator.analysis());
    }

    Ok(())
}

fn prompt_config(config: &mut SimulationConfig) -> io::Result<()> {
    println!("Press ENTER to keep the value in brackets.");
    println!();
    prompt("Black hole mass (M☉)", &mut config.mass_solar)?;
    prompt("Inclination (degrees)", &mut config.inclination_deg)?;
    prompt("Image width (px)", &mut config.width)?;
    prompt("Image height (px)", &mut config.height)?;
    prompt("Threads", &mut config.threads)?;
    println!();
    Ok(())
}

fn prompt<T>(label: &str, value: &mut T) -> io::Result<()>
where
    T: FromStr + std::fmt::Display,
{
    print!("{label} [{value}]: ");
    io::stdout().flush()?;
    let line = read_line()?;
    if line.is_empty() {
        return Ok(());
    }
    match line.parse() {
        Ok(parsed) => *value = parsed,
        Err(_) => eprintln!("Invalid value {line:?}, keeping {value}"),
    }
    Ok(())
}

fn ask_yes_no(question: &str) -> io::Result<bool> {
    print!("{question}");
    io::stdout().flush()?;
    let answer = read_line()?.to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes"))
}

fn read_line() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
