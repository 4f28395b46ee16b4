use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use thumbforge::{
    EngineOptions, FsObjectStore, ThumbnailConfig, ThumbnailEngine, fingerprint_config,
};

#[derive(Parser, Debug)]
#[command(name = "thumbforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render both renditions into an output directory.
    Render(RenderArgs),
    /// Print the config fingerprint and the storage paths it implies.
    Fingerprint(FingerprintArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input thumbnail config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory, used as the object-store root.
    #[arg(long)]
    out: PathBuf,

    /// Local photo file overriding the config's face asset reference.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Extra font directory loaded next to system fonts.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Print the chosen font size and line breaks before rendering.
    #[arg(long)]
    dump_layout: bool,
}

#[derive(Parser, Debug)]
struct FingerprintArgs {
    /// Input thumbnail config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fingerprint(args) => cmd_fingerprint(args),
    }
}

fn read_config_json(path: &Path) -> anyhow::Result<ThumbnailConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let config: ThumbnailConfig =
        serde_json::from_reader(r).with_context(|| "parse thumbnail config JSON")?;
    Ok(config)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = read_config_json(&args.in_path)?;
    config.validate()?;

    let photo = match &args.photo {
        Some(path) => Some(
            std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?,
        ),
        None => None,
    };

    if args.dump_layout {
        dump_layout_diagnostics(&config, photo.is_some() || config.face_asset_url.is_some());
    }

    let engine = ThumbnailEngine::new(EngineOptions {
        fonts_dir: args.fonts_dir,
        ..EngineOptions::default()
    })?;

    let rendered = match &photo {
        Some(bytes) => engine.render_with_photo(&config, Some(bytes))?,
        None => engine.render(&config)?,
    };

    let store = FsObjectStore::new(&args.out);
    let published = engine.publish_rendered(&config, &rendered, &store)?;

    eprintln!("wrote {}", published.main_url);
    eprintln!("wrote {}", published.small_url);
    Ok(())
}

fn cmd_fingerprint(args: FingerprintArgs) -> anyhow::Result<()> {
    let config = read_config_json(&args.in_path)?;
    config.validate()?;

    let hex = fingerprint_config(&config).to_hex();
    println!("{hex}");
    println!("thumbnails/{hex}-main.png (or .jpg when the ceiling forces JPEG)");
    println!("thumbnails/{hex}-small.png");
    Ok(())
}

/// Width depends on whether a portrait lands; diagnostics assume it
/// does whenever a photo source exists.
fn dump_layout_diagnostics(config: &ThumbnailConfig, expects_portrait: bool) {
    let words = thumbforge::title::styled_words(
        &config.title_text,
        thumbforge::highlight::emphasis_word(&config.title_text),
    );
    let layout = thumbforge::title::layout_title(
        &words,
        thumbforge::compose::text_box_width(expects_portrait),
    );

    eprintln!("title layout diagnostics:");
    eprintln!("  font_size: {}", layout.font_size);
    for (i, line) in layout.lines.iter().enumerate() {
        let joined = line
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        eprintln!("  line {i}:   {joined}");
    }
}
