use std::path::PathBuf;

use vocab_tts::{
    engines::espeak::EspeakSynthesizer, BinOrchestrator, GeneratorConfig, ManifestBuilder,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // An optional JSON config path; otherwise the conventional layout in the cwd.
    let config = match std::env::args().nth(1) {
        Some(path) => GeneratorConfig::from_json_file(&PathBuf::from(path))?,
        None => GeneratorConfig::builder().audio_extension("wav").build()?,
    };

    let mut orchestrator = BinOrchestrator::new(&config, EspeakSynthesizer::new());
    let report = orchestrator.run()?;
    println!("{report}");

    for path in ManifestBuilder::new(&config).build_all()? {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
