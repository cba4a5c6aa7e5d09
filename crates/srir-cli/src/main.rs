//! SRIR CLI — synthesize spatial room impulse responses from the command
//! line.
//!
//! # Usage
//!
//! ```bash
//! srir synth sweep.wav -o room.srir \
//!     --source 2.0,0.0,0.0 \
//!     --receiver 0.0,0.042,0.0 --receiver 0.0,-0.042,0.0
//! srir synth sweep.wav -o room.srir --source 2,0,0 --array tetra.json
//! srir info room.srir
//! srir info room.srir --json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use srir_sofa::{SofaMetadata, SofaReader, SofaWriter};
use srir_spatial::CartesianPoint;
use srir_synth::{synthesize_many, LengthPolicy, MonoIr, SynthConfig, DEFAULT_SPEED_OF_SOUND};

// ───────────────────────────── CLI definition ─────────────────────────────

/// Top-level CLI entry point for the `srir` binary.
#[derive(Parser)]
#[command(
    name = "srir",
    about = "Spatial room impulse response synthesis",
    version,
    long_about = "Synthesizes a multi-channel spatial room impulse response from a mono\n\
                  impulse response by modeling per-receiver propagation delays, and stores\n\
                  the result with its geometry in a SOFA SingleRoomSRIR-schema container."
)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available sub-commands.
#[derive(Subcommand)]
enum Commands {
    /// Synthesize a multi-channel container from a mono WAV impulse response.
    Synth {
        /// Input mono WAV impulse response.
        input: PathBuf,

        /// Output container path.
        #[arg(short, long)]
        output: PathBuf,

        /// Source position as "x,y,z" in metres. Repeat for multiple
        /// measurements against the same array.
        #[arg(short, long = "source", required = true)]
        sources: Vec<String>,

        /// Receiver position as "x,y,z" in metres. Repeat per channel;
        /// order defines channel order.
        #[arg(short, long = "receiver")]
        receivers: Vec<String>,

        /// JSON file containing an array of [x, y, z] receiver positions,
        /// appended after any --receiver flags.
        #[arg(long)]
        array: Option<PathBuf>,

        /// Speed of sound in m/s.
        #[arg(long, default_value_t = DEFAULT_SPEED_OF_SOUND)]
        speed_of_sound: f64,

        /// Keep each channel at the input length, dropping the shifted-out
        /// tail, instead of growing by the delay.
        #[arg(long)]
        truncate: bool,

        /// Database short name embedded in the container.
        #[arg(long)]
        db_name: Option<String>,

        /// Room short name embedded in the container.
        #[arg(long)]
        room_name: Option<String>,

        /// Listener/array short name embedded in the container.
        #[arg(long)]
        listener_name: Option<String>,

        /// Free-text comment embedded in the container.
        #[arg(long)]
        comment: Option<String>,
    },

    /// Inspect a container file: dimensions, attributes, variables.
    Info {
        /// Container file to inspect.
        input: PathBuf,

        /// Emit machine-readable JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

// ────────────────────────────── main ──────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Synth {
            input,
            output,
            sources,
            receivers,
            array,
            speed_of_sound,
            truncate,
            db_name,
            room_name,
            listener_name,
            comment,
        } => cmd_synth(
            &input,
            &output,
            &sources,
            &receivers,
            array.as_deref(),
            speed_of_sound,
            truncate,
            db_name,
            room_name,
            listener_name,
            comment,
        ),
        Commands::Info { input, json } => cmd_info(&input, json),
    }
}

// ──────────────────────────── synth ──────────────────────────────

#[allow(clippy::too_many_arguments)]
fn cmd_synth(
    input: &Path,
    output: &Path,
    source_args: &[String],
    receiver_args: &[String],
    array_path: Option<&Path>,
    speed_of_sound: f64,
    truncate: bool,
    db_name: Option<String>,
    room_name: Option<String>,
    listener_name: Option<String>,
    comment: Option<String>,
) -> Result<()> {
    let sources = source_args
        .iter()
        .map(|s| parse_point(s))
        .collect::<Result<Vec<CartesianPoint>>>()?;

    let mut receivers = receiver_args
        .iter()
        .map(|s| parse_point(s))
        .collect::<Result<Vec<CartesianPoint>>>()?;
    if let Some(path) = array_path {
        receivers.extend(load_array_file(path)?);
    }
    if receivers.is_empty() {
        bail!("no receivers given: pass --receiver x,y,z or --array file.json");
    }

    let (samples, sample_rate) = read_wav_mono(input)
        .with_context(|| format!("Failed to read WAV file: {}", input.display()))?;
    let ir = MonoIr::new(samples, sample_rate)
        .map_err(|e| anyhow::anyhow!("Invalid impulse response: {e}"))?;

    println!(
        "  {} {}Hz {:.3}s ({} samples), {} receiver(s), {} source position(s)",
        input.display(),
        ir.sampling_rate(),
        ir.duration_secs(),
        ir.len(),
        receivers.len(),
        sources.len(),
    );

    let config = SynthConfig {
        speed_of_sound,
        length_policy: if truncate {
            LengthPolicy::Truncate
        } else {
            LengthPolicy::Grow
        },
    };
    let tensor = synthesize_many(&ir, &receivers, &sources, &config)
        .map_err(|e| anyhow::anyhow!("Synthesis failed: {e}"))?;

    let mut metadata = SofaMetadata::default();
    if let Some(name) = db_name {
        metadata = metadata.with_database_name(name);
    }
    if let Some(name) = room_name {
        metadata = metadata.with_room_name(name);
    }
    if let Some(name) = listener_name {
        metadata = metadata.with_listener_name(name);
    }
    if let Some(text) = comment {
        metadata = metadata.with_comment(text);
    }

    let (m, r, n) = tensor.shape();
    let mut writer = SofaWriter::new(tensor.into_array(), sources, receivers, ir.sampling_rate());
    writer.set_metadata(metadata);
    writer
        .finalize(output)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    println!(
        "  wrote {} (M={m}, R={r}, N={n})",
        output.display()
    );
    Ok(())
}

// ──────────────────────────── info ───────────────────────────────

fn cmd_info(input: &Path, json: bool) -> Result<()> {
    let reader = SofaReader::open(input)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", input.display()))?;
    let dims = reader.dimensions();

    if json {
        let variables: Vec<serde_json::Value> = reader
            .variables()
            .iter()
            .map(|v| {
                serde_json::json!({
                    "name": v.name,
                    "dims": v.dims.iter().map(|d| d.as_char().to_string()).collect::<Vec<_>>(),
                    "elements": v.data.len(),
                })
            })
            .collect();
        let attributes: serde_json::Map<String, serde_json::Value> = reader
            .attributes()
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        let doc = serde_json::json!({
            "dimensions": { "M": dims.m, "N": dims.n, "E": dims.e,
                            "R": dims.r, "I": dims.i, "C": dims.c },
            "attributes": attributes,
            "variables": variables,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("  {}", input.display());
    println!("  ============================================");
    println!(
        "  dimensions: M={} N={} E={} R={} I={} C={}",
        dims.m, dims.n, dims.e, dims.r, dims.i, dims.c
    );
    println!("  attributes:");
    for (name, value) in reader.attributes() {
        println!("    {name} = {value}");
    }
    println!("  variables:");
    for variable in reader.variables() {
        let signature: String = variable.dims.iter().map(|d| d.as_char()).collect();
        println!(
            "    {} ({signature}) — {} element(s)",
            variable.name,
            variable.data.len()
        );
    }
    Ok(())
}

// ──────────────────────────── helpers ────────────────────────────

/// Parses an "x,y,z" triple into a Cartesian point.
fn parse_point(arg: &str) -> Result<CartesianPoint> {
    let parts: Vec<&str> = arg.split(',').collect();
    if parts.len() != 3 {
        bail!("expected \"x,y,z\", got \"{arg}\"");
    }
    let mut coords = [0.0f64; 3];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .with_context(|| format!("invalid coordinate \"{part}\" in \"{arg}\""))?;
    }
    Ok(CartesianPoint::from(coords))
}

/// Loads a JSON file holding an array of [x, y, z] positions.
fn load_array_file(path: &Path) -> Result<Vec<CartesianPoint>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open array file: {}", path.display()))?;
    let triples: Vec<[f64; 3]> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid array geometry JSON: {}", path.display()))?;
    Ok(triples.into_iter().map(CartesianPoint::from).collect())
}

/// Reads a mono WAV file into f64 samples plus its sampling rate.
fn read_wav_mono(path: &Path) -> Result<(Vec<f64>, u32)> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Cannot open WAV file: {}", path.display()))?;

    let spec = reader.spec();
    if spec.channels != 1 {
        bail!(
            "expected a mono impulse response, got {} channels",
            spec.channels
        );
    }
    let sample_rate = spec.sample_rate;

    let samples: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1u32 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| {
                    let s = s.context("Failed to read WAV sample")?;
                    Ok(s as f64 / max_val)
                })
                .collect::<Result<Vec<f64>>>()?
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| {
                let s = s.context("Failed to read WAV sample")?;
                Ok(s as f64)
            })
            .collect::<Result<Vec<f64>>>()?,
    };

    Ok((samples, sample_rate))
}
