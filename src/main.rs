use clap::{Arg, Command};
use log::LevelFilter;
use scam_sentinel::classifier::demo_bundle;
use scam_sentinel::{
    Config, KeywordSets, ModelBundle, RiskAssessment, RiskBand, RiskScorer,
    ScamFeatureExtractor, KEYWORD_SET_VERSION,
};
use std::io::Read;
use std::process;

fn main() {
    let matches = Command::new("scam-sentinel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Explainable scam-page risk scoring from web-page text")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/scam-sentinel.yaml"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("FILE")
                .help("Model bundle path (overrides the config file)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("TEXT")
                .help("Analyze the given text")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Analyze the contents of a text file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit the assessment as JSON instead of the report view")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Score the built-in demonstration texts")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration, keyword tables and model bundle")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(path) = matches.get_one::<String>("generate-config") {
        if let Err(e) = std::fs::write(path, Config::generate_default()) {
            eprintln!("Error writing config file {path}: {e}");
            process::exit(1);
        }
        println!("Default configuration written to {path}");
        return;
    }

    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = match Config::load_or_default(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    if let Some(model_path) = matches.get_one::<String>("model") {
        config.model_path = model_path.clone();
    }

    if matches.get_flag("test-config") {
        test_config(&config);
        return;
    }

    let extractor = match build_extractor(&config) {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("Error initializing feature extractor: {e:#}");
            process::exit(1);
        }
    };

    let scorer = match RiskScorer::with_thresholds(config.thresholds) {
        Ok(scorer) => scorer,
        Err(e) => {
            eprintln!("Error in risk thresholds: {e:#}");
            process::exit(1);
        }
    };

    if matches.get_flag("demo") {
        run_demo(&config, &extractor, &scorer);
        return;
    }

    // Scoring a real text cannot proceed without a model bundle.
    let bundle = match ModelBundle::load_from_file(&config.model_path) {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("Error loading model bundle: {e:#}");
            process::exit(1);
        }
    };
    if bundle.keyword_set_version != KEYWORD_SET_VERSION {
        log::warn!(
            "model was trained against keyword set {} but this build carries {}; \
             count features may be miscalibrated",
            bundle.keyword_set_version,
            KEYWORD_SET_VERSION
        );
    }

    let text = match read_input(&matches) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading input text: {e:#}");
            process::exit(1);
        }
    };

    let features = extractor.extract(&text);
    let assessment =
        match scorer.assess(&features, bundle.classifier(), &bundle.feature_columns) {
            Ok(assessment) => assessment,
            Err(e) => {
                eprintln!("Error scoring text: {e:#}");
                process::exit(1);
            }
        };

    if matches.get_flag("json") {
        match serde_json::to_string_pretty(&assessment) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing assessment: {e}");
                process::exit(1);
            }
        }
    } else {
        print_assessment(&assessment);
    }
}

fn build_extractor(config: &Config) -> anyhow::Result<ScamFeatureExtractor> {
    let keywords = match &config.keyword_file {
        Some(path) => KeywordSets::load_from_file(path)?,
        None => KeywordSets::default(),
    };
    ScamFeatureExtractor::with_keywords(keywords)
}

fn read_input(matches: &clap::ArgMatches) -> anyhow::Result<String> {
    if let Some(text) = matches.get_one::<String>("text") {
        return Ok(text.clone());
    }
    if let Some(path) = matches.get_one::<String>("file") {
        return std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {path}: {e}"));
    }
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

fn test_config(config: &Config) {
    println!("🔍 Testing configuration...");
    println!();

    match build_extractor(config) {
        Ok(extractor) => {
            let keywords = extractor.keywords();
            println!(
                "✅ Keyword tables: {} urgency, {} threat, {} sensitive-data, {} action phrases",
                keywords.urgency.len(),
                keywords.threat.len(),
                keywords.sensitive_data.len(),
                keywords.action_phrases.len()
            );
        }
        Err(e) => {
            eprintln!("❌ Keyword tables: {e:#}");
            process::exit(1);
        }
    }

    if let Err(e) = config.thresholds.validate() {
        eprintln!("❌ Risk thresholds: {e:#}");
        process::exit(1);
    }
    println!(
        "✅ Risk thresholds: high_risk={} suspicious={}",
        config.thresholds.high_risk, config.thresholds.suspicious
    );

    match ModelBundle::load_from_file(&config.model_path) {
        Ok(bundle) => {
            println!(
                "✅ Model bundle: {} ({} features, keyword set {})",
                config.model_path,
                bundle.feature_columns.len(),
                bundle.keyword_set_version
            );
            if bundle.keyword_set_version != KEYWORD_SET_VERSION {
                println!(
                    "⚠️  Keyword set skew: model trained against {}, build carries {}",
                    bundle.keyword_set_version, KEYWORD_SET_VERSION
                );
            }
        }
        Err(e) => {
            eprintln!("❌ Model bundle: {e:#}");
            process::exit(1);
        }
    }

    println!();
    println!("Configuration is valid!");
}

fn run_demo(config: &Config, extractor: &ScamFeatureExtractor, scorer: &RiskScorer) {
    // Prefer the configured bundle; the bundled reference model keeps the
    // demo usable on a machine with no deployment artifacts.
    let bundle = match ModelBundle::load_from_file(&config.model_path) {
        Ok(bundle) => bundle,
        Err(e) => {
            log::warn!("no model bundle at {}: {e:#}", config.model_path);
            log::warn!("demo is using the built-in reference model");
            demo_bundle()
        }
    };

    let demo_cases = [
        (
            "Obvious Scam",
            "URGENT! Your account has been suspended. Enter card number, CVV NOW!!!",
        ),
        (
            "Legitimate Page",
            "Welcome to our store. Browse products with secure checkout. Free shipping over $50.",
        ),
        (
            "Subtle Scam",
            "Your KYC verification is pending. Please provide your card details to complete verification.",
        ),
    ];

    for (name, text) in demo_cases {
        println!();
        println!("{}", "=".repeat(60));
        println!("TEST: {name}");
        println!("{}", "=".repeat(60));
        println!("Text: {text}");

        let features = extractor.extract(text);
        match scorer.assess(&features, bundle.classifier(), &bundle.feature_columns) {
            Ok(assessment) => print_assessment(&assessment),
            Err(e) => {
                eprintln!("Error scoring demo text: {e:#}");
                process::exit(1);
            }
        }
    }
}

fn print_assessment(assessment: &RiskAssessment) {
    let marker = match assessment.risk_band {
        RiskBand::HighRisk => "🔴",
        RiskBand::Suspicious => "🟡",
        RiskBand::Safe => "🟢",
    };

    println!();
    println!("{}", "=".repeat(60));
    println!("{marker} SCAM DETECTION RESULT");
    println!("{}", "=".repeat(60));
    println!();
    println!("Risk Level: {}", assessment.risk_band.label());
    println!("Scam Score: {}/100", assessment.scam_score);
    println!();
    println!("Probability:");
    println!("  Safe: {}%", assessment.probability.safe);
    println!("  Scam: {}%", assessment.probability.scam);

    if assessment.contributing_factors.is_empty() {
        println!();
        println!("✓ No major red flags detected");
    } else {
        println!();
        println!("⚠️  Red Flags Detected:");
        for (i, factor) in assessment.contributing_factors.iter().enumerate() {
            println!("  {}. {factor}", i + 1);
        }
    }

    println!();
    println!("{}", "=".repeat(60));
}
