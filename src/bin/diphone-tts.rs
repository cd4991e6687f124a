//! Diphone text-to-speech command-line interface.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use diphone_tts::audio::with_wav_extension;
use diphone_tts::engines::diphone::{DiphoneModel, ReverseMode, SynthConfig};
use diphone_tts::SynthesisResult;

/// A basic text-to-speech app that synthesises speech using diphone concatenation.
#[derive(Debug, Parser)]
#[command(name = "diphone-tts")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["phrase", "fromfile"])))]
struct Cli {
    /// The phrase to be synthesised
    phrase: Option<String>,

    /// Folder containing diphone wavs
    #[arg(long, default_value = "./diphones")]
    diphones: PathBuf,

    /// CMU pronunciation dictionary (searched next to the diphones if omitted)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Save the output audio to a file
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// An int between 0 and 100 representing the desired volume
    #[arg(short, long, allow_negative_numbers = true)]
    volume: Option<i32>,

    /// Spell the input text instead of pronouncing it normally
    #[arg(short, long)]
    spell: bool,

    /// Speak backwards: reverse the words, the phones or the signal
    #[arg(short, long, value_enum)]
    reverse: Option<ReverseMode>,

    /// Synthesise all text of a .txt file, which can hold multiple sentences
    #[arg(short, long)]
    fromfile: Option<PathBuf>,

    /// Smoother concatenation by cross-fading between diphone units
    #[arg(short, long)]
    crossfade: bool,

    /// JSON file with synthesis settings; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn synth_config(&self) -> Result<SynthConfig> {
        let mut config = match &self.config {
            Some(path) => SynthConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SynthConfig::default(),
        };
        config.crossfade |= self.crossfade;
        config.spell |= self.spell;
        if let Some(reverse) = self.reverse {
            config.reverse = reverse;
        }
        if self.volume.is_some() {
            config.volume = self.volume;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.synth_config()?;

    log::info!("Will load wavs from: {}", cli.diphones.display());
    let model = DiphoneModel::load(&cli.diphones, cli.lexicon.as_deref())
        .with_context(|| format!("failed to load voice from {}", cli.diphones.display()))?;

    let result = match (&cli.fromfile, &cli.phrase) {
        (Some(path), _) => {
            let text = read_text_file(path)?;
            log::info!("Synthesise the text file: {}", path.display());
            model.synthesize_document(&text, &config)?
        }
        (None, Some(phrase)) => {
            log::info!("You printed: {phrase}");
            model.synthesize_text(phrase, &config)?
        }
        (None, None) => bail!("Must supply either a phrase or --fromfile to synthesise"),
    };

    report(&result);

    match &cli.outfile {
        Some(outfile) => {
            let path = with_wav_extension(outfile);
            result
                .audio
                .write_wav(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Saved {:.2}s of audio to {}", result.duration_secs(), path.display());
        }
        None => println!(
            "Synthesised {:.2}s of audio (use --outfile to save it)",
            result.duration_secs()
        ),
    }

    Ok(())
}

fn read_text_file(path: &Path) -> Result<String> {
    let is_txt = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == "txt");
    if !is_txt {
        bail!("Please provide a text file (*.txt), got {}", path.display());
    }
    if !path.is_file() {
        bail!("The given file \"{}\" does not exist.", path.display());
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn report(result: &SynthesisResult) {
    let diagnostics = &result.diagnostics;
    if !diagnostics.unknown_words.is_empty() {
        eprintln!(
            "These words cannot be pronounced because they are not in the dictionary: {:?}",
            diagnostics.unknown_words
        );
    }
    if !diagnostics.missing_diphones.is_empty() {
        eprintln!(
            "No recording found for these diphones: {:?}",
            diagnostics.missing_diphones
        );
    }
}
