use std::path::Path;

use cadara_studio::challenge::{check_progress, ChallengeCatalog};
use cadara_studio::command::execute_json_batch;
use cadara_studio::harness::TestHarness;
use cadara_studio::state::AppSettings;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadara=info,cadara_studio=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    if let Err(e) = run(&args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

#[derive(Debug, Default)]
struct Args {
    scene: Option<String>,
    commands: Option<String>,
    challenges: Option<String>,
    challenge: Option<String>,
    legacy_rules: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();
    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--scene" => parsed.scene = value,
            "--commands" => parsed.commands = value,
            "--challenges" => parsed.challenges = value,
            "--challenge" => parsed.challenge = value,
            "--legacy-rules" => {
                parsed.legacy_rules = true;
                i += 1;
                continue;
            }
            other => {
                tracing::warn!("Ignoring unknown argument {other}");
                i += 1;
                continue;
            }
        }
        i += 2;
    }
    parsed
}

fn run(args: &Args) -> Result<(), String> {
    let catalog = match &args.challenges {
        Some(path) => ChallengeCatalog::load(Path::new(path))?,
        None => ChallengeCatalog::builtin(),
    };
    let catalog = if args.legacy_rules {
        catalog.with_positional_rules()
    } else {
        catalog
    };
    let mut harness = TestHarness::with_catalog(catalog)
        .with_settings(AppSettings::load())
        .with_system_clock();

    if let Some(path) = &args.scene {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scene file {path}: {e}"))?;
        harness.load_scene_json(&json)?;
        tracing::info!(
            "Loaded scene from {path} ({} objects)",
            harness.object_count()
        );
    }

    if let Some(path) = &args.commands {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read commands file {path}: {e}"))?;
        let responses = execute_json_batch(&mut harness, &json)?;
        let failed = responses.iter().filter(|r| !r.success).count();
        tracing::info!("Executed {} commands ({failed} failed)", responses.len());
        print_json(&responses)?;
    }

    if let Some(id) = &args.challenge {
        let id: shared::ChallengeId = id
            .parse()
            .map_err(|e| format!("Invalid challenge id {id}: {e}"))?;
        let challenge = harness
            .catalog
            .get(id)
            .ok_or_else(|| format!("Unknown challenge: {id}"))?;
        let report = check_progress(harness.scene().objects(), challenge);
        print_json(&report)?;
    }

    if args.commands.is_none() && args.challenge.is_none() {
        println!("{}", harness.export_scene_json()?);
    }
    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<(), String> {
    let output = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {e}"))?;
    println!("{output}");
    Ok(())
}
