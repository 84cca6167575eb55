//! # chatprep CLI
//!
//! Command-line interface for the chatprep library.

use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use chatprep::ChatprepError;
use chatprep::cli::{Args, Command, SessionsArgs};
use chatprep::core::write_json;
use chatprep::parsers::WhatsAppParser;

fn main() {
    let args = <Args as ClapParser>::parse();
    setup_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(args: Args) -> Result<(), ChatprepError> {
    println!("📦 chatprep v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match args.command {
        Command::Sessions(sessions) => run_sessions(&sessions),
        #[cfg(feature = "generator")]
        Command::Hellaswag(hellaswag) => run_hellaswag(&hellaswag),
        #[cfg(feature = "survey")]
        Command::Survey(survey) => run_survey(&survey),
    }
}

fn run_sessions(args: &SessionsArgs) -> Result<(), ChatprepError> {
    let total_start = Instant::now();
    let output_path = args.output_path();
    let filter = args.filter_config();
    let session_config = args.session_config();
    let parser = WhatsAppParser::with_config(args.parser_config());

    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", output_path.display());
    println!("⏱️  Gap:     {} min", session_config.gap_minutes);
    if args.streaming {
        println!("🌊 Mode:    Streaming");
    }
    if !filter.is_active() {
        println!("🔓 Filter:  off (--keep-all)");
    }
    println!();

    println!("⏳ Parsing {}...", parser.name());
    let parse_start = Instant::now();
    let export = parser.process(&args.input, &filter, &session_config)?;
    let stats = export.stats;
    println!(
        "   Found {} messages in {} lines ({:.2}s)",
        stats.messages,
        stats.lines,
        parse_start.elapsed().as_secs_f64()
    );
    if filter.is_active() {
        println!(
            "🔍 Dropped {} noise messages ({:.1}%)",
            stats.dropped,
            stats.drop_ratio()
        );
    }

    println!("💾 Writing JSON...");
    let write_start = Instant::now();
    ensure_parent(&output_path)?;
    write_json(&export.sessions, &output_path)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    let total_time = total_start.elapsed();

    println!();
    println!(
        "✅ Parsed {} sessions and saved to {}",
        stats.sessions,
        output_path.display()
    );

    println!();
    println!("📊 Summary:");
    println!("   Lines:     {}", stats.lines);
    println!("   Messages:  {}", stats.messages);
    println!("   Kept:      {}", stats.kept);
    println!("   Sessions:  {}", stats.sessions);

    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let msgs_per_sec = stats.messages as f64 / total_time.as_secs_f64().max(f64::EPSILON);
    println!("   Throughput:  {:.0} messages/sec", msgs_per_sec);

    Ok(())
}

#[cfg(feature = "generator")]
fn run_hellaswag(args: &chatprep::cli::HellaswagArgs) -> Result<(), ChatprepError> {
    use chatprep::config::GeneratorConfig;
    use chatprep::generator::{HellaSwagGenerator, OpenAiClient};

    let total_start = Instant::now();
    let config = args.apply(GeneratorConfig::from_env()?);
    let output_path = args.output_path();

    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", output_path.display());
    println!("🤖 Model:   {}", config.model);
    println!("🎲 Seed:    {}", config.seed);
    println!();

    let client = OpenAiClient::new(&config)?;
    let generator = HellaSwagGenerator::new(client, config);

    println!("⏳ Generating alternatives...");
    let stats = generator.process_file(&args.input, &output_path)?;

    println!();
    println!("✅ Done! HellaSwag file saved to {}", output_path.display());

    println!();
    println!("📊 Summary:");
    println!("   Read:       {}", stats.read);
    println!("   Written:    {}", stats.written);
    println!("   Malformed:  {}", stats.skipped_malformed);
    println!("   Failed:     {}", stats.skipped_failed);
    println!();
    println!("⚡ Total time:  {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

#[cfg(feature = "survey")]
fn run_survey(args: &chatprep::cli::SurveyArgs) -> Result<(), ChatprepError> {
    use chatprep::survey::{HttpTextGenerator, Survey, SurveyRunner};

    let total_start = Instant::now();
    let mut config = args.survey_config();
    if let Ok(key) = std::env::var("SURVEY_API_KEY") {
        config = config.with_api_key(key);
    }
    let survey = Survey::load(&args.survey)?;
    let output_path = args.output_path(&config.model);

    println!("📂 Survey:   {} ({} questions)", args.survey.display(), survey.questions.len());
    println!("🤖 Model:    {}", config.model);
    println!("🌐 Endpoint: {}", config.endpoint);
    println!("🔁 Samples:  {}", config.samples);
    println!();

    let generator = HttpTextGenerator::new(&config)?;
    let runner = SurveyRunner::new(generator, config);

    println!("⏳ Asking questions...");
    let results = runner.run(&survey)?;

    ensure_parent(&output_path)?;
    write_json(&results, &output_path)?;

    println!();
    for tally in &results.questions {
        println!("❓ {}", tally.question);
        for (answer, pct) in tally.percentages() {
            println!("   {answer}: {pct:.2}%");
        }
    }

    println!();
    println!("✅ Results saved to {}", output_path.display());
    println!("⚡ Total time:  {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), ChatprepError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
