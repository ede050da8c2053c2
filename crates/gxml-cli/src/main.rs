use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use gxml_core::{RenderSettings, Scene};
use gxml_io::BinaryRenderEngine;
use gxml_render::timing::{format_timings, marker, RawTimings};
use gxml_render::{binary_headers, JsonRenderEngine, RenderResponse};

#[derive(Parser)]
#[command(name = "gxml")]
#[command(about = "Render laid-out GXML scenes to JSON or packed binary")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene file
    Render {
        /// Scene JSON file
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render settings JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the binary response headers to stderr
        #[arg(long)]
        headers: bool,
    },

    /// Summarize a binary buffer
    Inspect {
        input: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Binary,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            format,
            output,
            config,
            headers,
        } => render(&input, format, output.as_deref(), config.as_deref(), headers),
        Commands::Inspect { input } => inspect(&input),
    }
}

fn load_settings(path: Option<&Path>) -> Result<RenderSettings> {
    let Some(path) = path else {
        return Ok(RenderSettings::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings {}", path.display()))?;
    RenderSettings::from_json(&text)
        .with_context(|| format!("Invalid settings in {}", path.display()))
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn render(
    input: &Path,
    format: Format,
    output: Option<&Path>,
    config: Option<&Path>,
    print_headers: bool,
) -> Result<()> {
    let settings = load_settings(config)?;
    let mut timings = RawTimings::new();

    let t = Instant::now();
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read scene {}", input.display()))?;
    let scene = Scene::from_json(&text);
    timings.insert("parse".into(), marker(elapsed_ms(t)));

    let body = match format {
        Format::Json => {
            let response = match scene {
                Ok(scene) => {
                    let mut engine = JsonRenderEngine::with_settings(&settings)?;
                    let t = Instant::now();
                    let rendered = scene.render(&mut engine).map(|_| engine.to_document());
                    timings.insert("render".into(), marker(elapsed_ms(t)));
                    RenderResponse::from(rendered)
                }
                Err(e) => RenderResponse::failure(format!("Scene parse error: {}", e)),
            };
            if let Some(error) = &response.error {
                log::error!("{}", error);
            }
            serde_json::to_vec_pretty(&response)?
        }
        Format::Binary => {
            let scene = scene.context("Scene parse error")?;
            let mut engine = BinaryRenderEngine::with_settings(&settings)?;

            let t = Instant::now();
            scene.render(&mut engine)?;
            timings.insert("render".into(), marker(elapsed_ms(t)));

            let t = Instant::now();
            let bytes = engine.to_bytes()?;
            timings.insert("serialize".into(), marker(elapsed_ms(t)));

            if print_headers {
                let web = format_timings(Some(&timings));
                for (name, value) in binary_headers(engine.panel_count(), &web) {
                    eprintln!("{}: {}", name, value);
                }
            }
            bytes
        }
    };

    for (stage, ms) in format_timings(Some(&timings)).ordered() {
        log::info!("{:>12}: {:.2} ms", stage, ms);
    }

    match output {
        Some(path) => fs::write(path, &body)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => io::stdout().write_all(&body)?,
    }
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let decoded = gxml_io::decode(&bytes)
        .with_context(|| format!("{} is not a valid GXML buffer", input.display()))?;

    println!(
        "GXML v{}: {} panels, {} vertices, {} bytes",
        decoded.version,
        decoded.panels.len(),
        decoded.total_vertex_count,
        bytes.len()
    );
    for (i, panel) in decoded.panels.iter().enumerate() {
        let [r, g, b] = panel.color;
        println!(
            "{:>5}  {:<24} {:>5} verts  rgb({:.3}, {:.3}, {:.3}){}",
            i,
            panel.id,
            panel.vertices.len(),
            r,
            g,
            b,
            if panel.endpoints.is_some() { "  endpoints" } else { "" }
        );
    }
    Ok(())
}
