//! Filmstamp CLI - film simulation grading with a glowing date stamp.

use anyhow::Context;
use filmstamp::prelude::*;
use image::{Rgb, RgbImage};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const DEFAULT_INPUT: &str = "your_input_photo.jpg";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    let result = match args[1].as_str() {
        "list" => list_filters(args.iter().any(|a| a == "--json")),
        "info" => match args.get(2) {
            Some(id) => filter_info(id),
            None => Err(anyhow::anyhow!("Please specify a filter ID")),
        },
        "apply" => match args.get(2) {
            Some(filter) => apply(filter, &args[3..]),
            None => Err(anyhow::anyhow!("Please specify a filter ID")),
        },
        "placeholder" => {
            let path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_INPUT);
            create_placeholder(Path::new(path))
        }
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(&args[0]);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        if let Some(fix) = e.downcast_ref::<FilmError>().and_then(FilmError::suggested_fix) {
            eprintln!("   → Suggestion: {}", fix);
        }
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("🎞️  Filmstamp v{}", filmstamp::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list [--json]                       List all film simulations");
    println!("  info <filter>                       Show the steps of a simulation");
    println!("  apply <filter> [input] [output] [options]");
    println!("                                      Grade a photo and stamp it");
    println!("  placeholder [path]                  Write a placeholder input photo");
    println!("  help                                Show this help message");
    println!();
    println!("Apply options:");
    println!("  --timestamp <text>   Stamp text (default: MM-DD-'YY from the date parts)");
    println!("  --month <MM>         Month for the stamp (default: current month)");
    println!("  --day <DD>           Day for the stamp (default: current day)");
    println!("  --year <YY>          Two-digit year for the stamp (default: current year)");
    println!("  --message <text>     Message drawn top-right (default: none)");
    println!("  --interactive        Prompt for the message and date parts");
    println!("  --seed <n>           Seed the grain for reproducible output");
    println!("  --glow <file.toml>   Override the glow overlay settings");
    println!("  --font <path>        TrueType font used for the stamp");
    println!();
    println!("Input defaults to {}, output to retro_output_<filter>.jpg", DEFAULT_INPUT);
}

fn list_filters(json: bool) -> anyhow::Result<()> {
    let registry = FilterRegistry::with_builtins();

    if json {
        let pipelines: Vec<Pipeline> = registry
            .filters()
            .map(|(_, entry)| entry.preset.pipeline())
            .collect();
        println!("{}", serde_json::to_string_pretty(&pipelines)?);
        return Ok(());
    }

    println!("Available filters ({} total):", registry.len());
    println!();
    for (id, entry) in registry.filters() {
        println!("  • {} - {}: {}", id, entry.name, entry.description);
    }
    Ok(())
}

fn filter_info(filter_id: &str) -> anyhow::Result<()> {
    let registry = FilterRegistry::with_builtins();
    let pipeline = registry.resolve(filter_id)?;
    let preset = pipeline.preset();

    println!("Filter: {}", preset.name());
    println!("ID: {}", preset.id());
    println!("Tags: {}", preset.tags().join(", "));
    println!();
    println!("Description:");
    println!("  {}", preset.description());
    println!();
    println!("Steps:");
    for (i, step) in pipeline.steps().iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
    Ok(())
}

/// Parsed `apply` arguments.
#[derive(Debug, Default)]
struct ApplyArgs {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    timestamp: Option<String>,
    message: String,
    month: Option<String>,
    day: Option<String>,
    year: Option<String>,
    interactive: bool,
    seed: Option<u64>,
    glow: Option<PathBuf>,
    font: Option<PathBuf>,
}

fn parse_apply_args(args: &[String]) -> anyhow::Result<ApplyArgs> {
    let mut parsed = ApplyArgs::default();
    let mut positional = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let next = args.get(i + 1);
        let value = || next.cloned().with_context(|| format!("{} needs a value", flag));
        match flag {
            "--timestamp" => parsed.timestamp = Some(value()?),
            "--message" => parsed.message = value()?,
            "--month" => parsed.month = Some(value()?),
            "--day" => parsed.day = Some(value()?),
            "--year" => parsed.year = Some(value()?),
            "--seed" => {
                let raw = value()?;
                parsed.seed = Some(raw.parse().with_context(|| format!("invalid seed '{}'", raw))?);
            }
            "--glow" => parsed.glow = Some(PathBuf::from(value()?)),
            "--font" => parsed.font = Some(PathBuf::from(value()?)),
            "--interactive" => {
                parsed.interactive = true;
                i += 1;
                continue;
            }
            flag if flag.starts_with("--") => anyhow::bail!("Unknown option: {}", flag),
            path => {
                positional.push(PathBuf::from(path));
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    let mut positional = positional.into_iter();
    parsed.input = positional.next();
    parsed.output = positional.next();
    if let Some(extra) = positional.next() {
        anyhow::bail!("Unexpected argument: {}", extra.display());
    }
    Ok(parsed)
}

fn apply(filter: &str, args: &[String]) -> anyhow::Result<()> {
    let mut args = parse_apply_args(args)?;
    if args.interactive {
        prompt_inputs(&mut args)?;
    }

    let input = args.input.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("retro_output_{}.jpg", filter)));
    let timestamp = args.timestamp.clone().unwrap_or_else(|| {
        timestamp_text(args.month.as_deref(), args.day.as_deref(), args.year.as_deref())
    });

    let mut options = ApplyOptions::new().with_progress(|update| {
        if let ProgressUpdate::StageStarted { stage, .. } = update {
            println!("   • Running: {}", stage);
        }
    });
    if let Some(path) = &args.glow {
        options = options.with_glow(GlowSpec::load(path).map_err(FilmError::from)?);
    }
    if let Some(seed) = args.seed {
        options = options.with_seed(seed);
    }

    let mut fonts = SystemFonts::new();
    if let Some(font) = &args.font {
        if let Some(dir) = font.parent() {
            fonts = fonts.prepend_dir(dir);
        }
        if let Some(name) = font.file_name() {
            options.glow.font_name = name.to_string_lossy().into_owned();
        }
    }

    let engine = FilmEngine::with_parts(FilterRegistry::with_builtins(), FileCodec, fonts);
    println!("⚙️  Processing {} -> {}", input.display(), output.display());
    let written = engine.apply(filter, &input, &output, &timestamp, &args.message, &options)?;
    println!("🎉 Successfully applied filter '{}'. Output saved to: {}", filter, written.display());
    Ok(())
}

fn prompt_inputs(args: &mut ApplyArgs) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut ask = |question: &str| -> anyhow::Result<Option<String>> {
        print!("{}", question);
        io::stdout().flush()?;
        let answer = lines.next().transpose()?.unwrap_or_default();
        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    };

    args.message = ask("Enter a short message to appear on the top right (e.g., 'DAY 1', leave blank for none): ")?
        .unwrap_or_default();
    args.month = ask("Enter the month (MM, press Enter for current month): ")?.or(args.month.take());
    args.day = ask("Enter the day (DD, press Enter for current day): ")?.or(args.day.take());
    args.year = ask("Enter the 2-digit year (YY, press Enter for current year): ")?.or(args.year.take());
    Ok(())
}

/// `MM-DD-'YY`, each part defaulting to today's local date.
fn timestamp_text(month: Option<&str>, day: Option<&str>, year: Option<&str>) -> String {
    let now = chrono::Local::now();
    let part = |given: Option<&str>, format: &str| {
        given
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| now.format(format).to_string())
    };
    format!("{}-{}-'{}", part(month, "%m"), part(day, "%d"), part(year, "%y"))
}

fn create_placeholder(path: &Path) -> anyhow::Result<()> {
    let mut image = RgbImage::from_pixel(400, 300, Rgb([0xE0, 0xF7, 0xFA]));
    let font = SystemFonts::new()
        .load_font("arial.ttf", 18)
        .unwrap_or_else(|| GlyphFont::bitmap(18));

    let lines = [
        "REPLACE THIS FILE with your photo.",
        "Rename your picture to 'your_input_photo.jpg'",
    ];
    let mut y = 100;
    for line in lines {
        font.draw_rgb(&mut image, Rgb([0, 51, 102]), 20, y, line);
        y += font.measure(line).1 as i32 + 6;
    }

    FileCodec
        .encode(&image, path)
        .with_context(|| format!("could not create placeholder {}", path.display()))?;
    println!("Created placeholder '{}'.", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_timestamp_from_parts() {
        assert_eq!(timestamp_text(Some("01"), Some("02"), Some("24")), "01-02-'24");
        let today = timestamp_text(None, Some(" "), None);
        assert_eq!(today.len(), "MM-DD-'YY".len());
    }

    #[test]
    fn test_parse_apply_args() {
        let args = parse_apply_args(&strings(&[
            "in.jpg", "out.png", "--message", "DAY 1", "--seed", "7", "--interactive",
        ]))
        .unwrap();
        assert_eq!(args.input, Some(PathBuf::from("in.jpg")));
        assert_eq!(args.output, Some(PathBuf::from("out.png")));
        assert_eq!(args.message, "DAY 1");
        assert_eq!(args.seed, Some(7));
        assert!(args.interactive);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_apply_args(&strings(&["--seed"])).is_err());
        assert!(parse_apply_args(&strings(&["--seed", "x"])).is_err());
        assert!(parse_apply_args(&strings(&["--bogus", "1"])).is_err());
        assert!(parse_apply_args(&strings(&["a", "b", "c"])).is_err());
    }
}
