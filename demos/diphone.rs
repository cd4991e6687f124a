use std::path::PathBuf;
use std::time::Instant;

use diphone_tts::{
    engines::diphone::{DiphoneEngine, DiphoneModelParams, ReverseMode, SynthConfigBuilder},
    SynthesisEngine,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut engine = DiphoneEngine::new();
    let model_path = PathBuf::from("voices/diphones");

    let load_start = Instant::now();
    engine.load_model_with_params(&model_path, DiphoneModelParams::default())?;
    println!("Voice loaded in {:.2?}", load_start.elapsed());
    println!("Diphones available: {}", engine.list_diphones().len());

    let text = "Hello! This is a diphone synthesiser, and it can speak {very} clearly.";

    let params = SynthConfigBuilder::default().crossfade(true).build()?;

    let synth_start = Instant::now();
    let result = engine.synthesize(text, Some(params))?;
    let synth_dur = synth_start.elapsed();

    println!(
        "Synthesized {:.2}s audio in {:.2?}",
        result.duration_secs(),
        synth_dur
    );
    if !result.diagnostics.is_empty() {
        println!("Skipped: {:?}", result.diagnostics);
    }

    engine.synthesize_to_file(text, &PathBuf::from("output.wav"), None)?;
    println!("Saved to output.wav");

    let backwards = SynthConfigBuilder::default()
        .reverse(ReverseMode::Signal)
        .build()?;
    engine.synthesize_to_file(text, &PathBuf::from("output-reversed.wav"), Some(backwards))?;
    println!("Saved to output-reversed.wav");

    engine.unload_model();
    Ok(())
}
