use crate::{
    services::backend::BackendConfig, GenerationGate, LocationRecommendation,
    LocationRecommender, PlanError, PlanRequestClient, RetryPolicy, TravelPlan, TripContent,
    UserProfile,
};
use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{collections::HashMap, env, fs, path::Path};
use tracing::{error, info};

/// CLI entry point for the cine-trip tool
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = command().get_matches();

    match matches.subcommand() {
        Some(("plan", args)) => run_plan(args).await,
        Some(("recommend", args)) => run_recommend(args),
        _ => Err(anyhow!("no subcommand given; try `cine-trip --help`")),
    }
}

fn command() -> Command {
    Command::new("cine-trip")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Cinema-themed travel itineraries with a base-camp recommendation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("plan")
                .about("Generate a travel plan for a destination")
                .arg(
                    Arg::new("destination")
                        .help("Where to go, e.g. \"Kyoto, Japan\"")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("days")
                        .short('d')
                        .long("days")
                        .value_name("DAYS")
                        .help("Trip length in days (1-7)")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("3"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .help("First day of the trip (defaults to today)"),
                )
                .arg(
                    Arg::new("travelers")
                        .short('n')
                        .long("travelers")
                        .value_name("COUNT")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("age")
                        .long("age")
                        .value_name("AGE")
                        .value_parser(clap::value_parser!(u8))
                        .default_value("30"),
                )
                .arg(
                    Arg::new("gender")
                        .long("gender")
                        .value_name("GENDER")
                        .help("male, female, non-binary or other")
                        .default_value("other"),
                )
                .arg(
                    Arg::new("nationality")
                        .long("nationality")
                        .value_name("NATIONALITY"),
                )
                .arg(
                    Arg::new("hobbies")
                        .long("hobbies")
                        .value_name("LIST")
                        .help("Comma separated interests")
                        .value_delimiter(','),
                )
                .arg(
                    Arg::new("style")
                        .short('s')
                        .long("style")
                        .value_name("STYLE")
                        .help("budget, balanced or luxury")
                        .default_value("balanced"),
                )
                .arg(
                    Arg::new("activity")
                        .long("activity")
                        .value_name("RHYTHM")
                        .help("early-bird or night-owl")
                        .default_value("early-bird"),
                )
                .arg(
                    Arg::new("language")
                        .short('l')
                        .long("language")
                        .value_name("LANGUAGE")
                        .help("Language for the narrative fields")
                        .default_value("English"),
                )
                .arg(
                    Arg::new("provider")
                        .short('p')
                        .long("provider")
                        .value_name("PROVIDER")
                        .help("gemini or openrouter (or set CINETRIP_PROVIDER)"),
                )
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .value_name("MODEL")
                        .help("Model name (or set CINETRIP_MODEL)"),
                )
                .arg(
                    Arg::new("api-key")
                        .short('k')
                        .long("api-key")
                        .value_name("KEY")
                        .help("API key (or set GEMINI_API_KEY / OPENAI_API_KEY)"),
                )
                .arg(
                    Arg::new("base-url")
                        .short('u')
                        .long("base-url")
                        .value_name("URL")
                        .help("Backend base URL (or set CINETRIP_BASE_URL)"),
                )
                .arg(
                    Arg::new("timeout")
                        .short('t')
                        .long("timeout")
                        .value_name("SECONDS")
                        .help("HTTP timeout in seconds (or set CINETRIP_TIMEOUT_SECS)"),
                )
                .arg(
                    Arg::new("retries")
                        .short('r')
                        .long("retries")
                        .value_name("ATTEMPTS")
                        .help("Total attempts for transient backend failures")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Write the plan and profile as JSON"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the plan as JSON instead of a summary")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("recommend")
                .about("Recommend where to stay for a saved trip")
                .arg(
                    Arg::new("file")
                        .help("Trip JSON written by `cine-trip plan --output`")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("destination")
                        .long("destination")
                        .value_name("DESTINATION")
                        .help("Override the destination stored in the file"),
                ),
        )
}

async fn run_plan(args: &ArgMatches) -> anyhow::Result<()> {
    let profile = profile_from_args(args)?.clamped();
    let config = backend_config_from_args(args)?;
    info!("Using {:?} backend with model {}", config.provider, config.model);

    let language = args
        .get_one::<String>("language")
        .cloned()
        .unwrap_or_else(|| "English".to_string());
    let client = PlanRequestClient::from_config(&config)?.with_narrative_language(language);

    let attempts = args.get_one::<usize>("retries").copied().unwrap_or(1);
    let policy = RetryPolicy::default().with_max_attempts(attempts);
    let gate = GenerationGate::new();

    let plan = match crate::retry_with_backoff(&policy, || client.generate_gated(&gate, &profile))
        .await
    {
        Ok(plan) => plan,
        Err(err) => {
            error!("Plan generation failed: {}", err);
            eprintln!("{}", err.user_message());
            return Err(err.into());
        }
    };

    let recommendation = LocationRecommender::new().recommend(&plan, &profile.destination);

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_summary(&plan, &recommendation);
    }

    if let Some(path) = args.get_one::<String>("output") {
        let content = TripContent { plan, profile };
        fs::write(path, serde_json::to_string_pretty(&content)?)
            .with_context(|| format!("failed to write {path}"))?;
        info!("Trip written to {}", path);
    }

    Ok(())
}

fn run_recommend(args: &ArgMatches) -> anyhow::Result<()> {
    let path = args
        .get_one::<String>("file")
        .ok_or_else(|| anyhow!("a trip file is required"))?;
    let content = read_trip(Path::new(path))?;

    let destination = args
        .get_one::<String>("destination")
        .cloned()
        .unwrap_or_else(|| content.profile.destination.clone());

    let recommendation = LocationRecommender::new().recommend(&content.plan, &destination);
    println!("{}", serde_json::to_string_pretty(&recommendation)?);
    Ok(())
}

fn read_trip(path: &Path) -> anyhow::Result<TripContent> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a trip file", path.display()))
}

fn profile_from_args(args: &ArgMatches) -> anyhow::Result<UserProfile> {
    let text = |name: &str| args.get_one::<String>(name).cloned().unwrap_or_default();

    let travel_date = match args.get_one::<String>("date") {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("invalid --date `{date}`, expected YYYY-MM-DD"))?,
        None => chrono::Local::now().date_naive(),
    };

    Ok(UserProfile {
        age: args.get_one::<u8>("age").copied().unwrap_or(30),
        gender: text("gender").parse().map_err(|err: String| anyhow!(err))?,
        nationality: text("nationality"),
        hobbies: args
            .get_many::<String>("hobbies")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        travel_style: text("style").parse().map_err(|err: String| anyhow!(err))?,
        destination: text("destination"),
        duration: args.get_one::<u32>("days").copied().unwrap_or(3),
        travelers: args.get_one::<u32>("travelers").copied().unwrap_or(1),
        travel_date,
        activity_time: text("activity").parse().map_err(|err: String| anyhow!(err))?,
    })
}

/// CLI flags take precedence over environment variables.
fn backend_config_from_args(args: &ArgMatches) -> Result<BackendConfig, PlanError> {
    let mut overrides: HashMap<&'static str, String> = HashMap::new();
    let flag_vars: [(&str, &[&'static str]); 5] = [
        ("provider", &["CINETRIP_PROVIDER"]),
        ("model", &["CINETRIP_MODEL"]),
        ("base-url", &["CINETRIP_BASE_URL"]),
        ("timeout", &["CINETRIP_TIMEOUT_SECS"]),
        ("api-key", &["GEMINI_API_KEY", "OPENAI_API_KEY"]),
    ];
    for (flag, vars) in flag_vars {
        if let Some(value) = args.get_one::<String>(flag) {
            for var in vars {
                overrides.insert(*var, value.clone());
            }
        }
    }

    BackendConfig::from_lookup(|name| {
        overrides
            .get(name)
            .cloned()
            .or_else(|| env::var(name).ok())
    })
}

fn print_summary(plan: &TravelPlan, recommendation: &LocationRecommendation) {
    println!("\n{}", plan.personality_title);
    println!("{}\n", plan.personality_description);
    println!(
        "Vibe score: {:.0}   Budget: {:.0} {}",
        plan.vibe_score,
        plan.total_estimated_budget,
        plan.currency.as_deref().unwrap_or("")
    );

    for day in &plan.itinerary {
        println!("\nDay {}", day.day);
        for place in &day.places {
            let time = place.best_time.as_deref().unwrap_or("-");
            println!("  [{}] {} ({})", time, place.name, place.address);
        }
    }

    println!("\nSoundtrack");
    for song in &plan.soundtrack {
        println!("  {} - {}", song.artist, song.title);
    }

    println!("\nFilms");
    for movie in &plan.movies {
        println!("  {} ({}, {})", movie.title, movie.director, movie.year);
    }

    println!("\nWhere to stay: {}", recommendation.search_term());
    println!("  {}", recommendation.reason);
}
