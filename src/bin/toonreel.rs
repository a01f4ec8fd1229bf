use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use toonreel::{
    AnimationStyle, FrameIndex, FrameRange, GenerationStatus, GeneratorConfig, Pacing,
    PngSequenceSink, Script, SequenceOpts, Studio, VoiceStyle,
};

#[derive(Parser, Debug)]
#[command(name = "toonreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Run a full generation and write the snapshot PNG.
    Generate(GenerateArgs),
    /// Render a frame range as numbered PNGs, without realtime pacing.
    Frames(FramesArgs),
    /// List the available animation and voice styles.
    Options,
}

#[derive(Args, Debug)]
struct ScriptArgs {
    /// Script text.
    #[arg(long, conflicts_with = "script_file")]
    script: Option<String>,

    /// Read the script from a UTF-8 text file.
    #[arg(long)]
    script_file: Option<PathBuf>,

    /// Generator config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: ScriptArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    input: ScriptArgs,

    /// Animation style.
    #[arg(long, value_enum, default_value_t = AnimationStyle::Cartoon)]
    style: AnimationStyle,

    /// Voice style.
    #[arg(long, value_enum, default_value_t = VoiceStyle::Friendly)]
    voice: VoiceStyle,

    /// Directory receiving the snapshot PNG.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Also write every frame as a numbered PNG into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Pace frames at the configured refresh rate instead of rendering as fast as possible.
    #[arg(long, default_value_t = false)]
    realtime: bool,

    /// Print the video details as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    input: ScriptArgs,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Last frame (exclusive). Defaults to the frame budget.
    #[arg(long)]
    end: Option<u64>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size (parallel mode only).
    #[arg(long, default_value_t = 16)]
    chunk_size: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Generate(args) => cmd_generate(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Options => cmd_options(),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GeneratorConfig> {
    let cfg = match path {
        Some(p) => GeneratorConfig::from_path(p)?,
        None => GeneratorConfig::default(),
    };
    Ok(cfg.with_env_overrides()?)
}

fn read_script_text(args: &ScriptArgs) -> anyhow::Result<String> {
    match (&args.script, &args.script_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display())),
        (None, None) => anyhow::bail!("either --script or --script-file is required"),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = load_config(args.input.config.as_deref())?;
    let script = Script::parse(&read_script_text(&args.input)?);
    let frame = toonreel::render_frame(&config, &script, FrameIndex(args.frame))?;
    let png = toonreel::encode_png(&frame)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = load_config(args.input.config.as_deref())?;
    let pacing = if args.realtime {
        Pacing::Realtime
    } else {
        Pacing::Immediate
    };
    let mut studio = Studio::new(config)?.with_pacing(pacing);
    studio.set_script(read_script_text(&args.input)?);
    studio.set_style(args.style);
    studio.set_voice(args.voice);

    let task = match &args.frames_dir {
        Some(dir) => studio.generate_into(Box::new(PngSequenceSink::new(dir)))?,
        None => studio.generate()?,
    };
    tracing::info!(%task, "generating");

    match studio.wait().clone() {
        GenerationStatus::Complete { .. } => {}
        GenerationStatus::Failed { message, .. } => anyhow::bail!("generation failed: {message}"),
        other => anyhow::bail!("generation did not complete: {other:?}"),
    }

    let artifact = studio
        .download()
        .context("completed generation produced no artifact")?;
    let path = artifact.save_into(&args.out_dir)?;
    let details = studio
        .details()
        .context("completed generation produced no details")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(details)?);
    } else {
        println!("{details}");
    }
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let config = load_config(args.input.config.as_deref())?;
    let script = Script::parse(&read_script_text(&args.input)?);
    let end = args.end.unwrap_or(config.max_frames);
    let range = FrameRange::new(FrameIndex(args.start), FrameIndex(end))?;

    let mut sink = PngSequenceSink::new(&args.out_dir);
    let opts = SequenceOpts {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
    };
    let stats = toonreel::render_sequence(&config, &script, range, &mut sink, opts)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_rendered,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_options() -> anyhow::Result<()> {
    println!("Animation styles:");
    for style in AnimationStyle::ALL {
        println!("  {:<8} {} {}", style.id(), style.emoji(), style.display_name());
    }
    println!("Voice styles:");
    for voice in VoiceStyle::ALL {
        println!("  {:<12} {}", voice.id(), voice.display_name());
    }
    Ok(())
}
