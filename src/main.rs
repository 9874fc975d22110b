use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use admit_odds::catalog::{load_catalog, Catalog, SchoolType};
use admit_odds::config::{dataset_source, load_config, run_init, validate_config, Config};
use admit_odds::explain::{Explanation, HttpNarrativeService};
use admit_odds::output;
use admit_odds::profile::{load_profile, validate_profile, StudentProfile, TestType};
use admit_odds::ranking::DEFAULT_COMPARABLE_LIMIT;
use admit_odds::scoring::estimate_net_price;
use admit_odds::session::Session;

const EXIT_SUCCESS: i32 = 0;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

/// Profile source and per-field overrides shared by the scoring commands
#[derive(Args, Debug)]
struct ProfileArgs {
    /// YAML file with the student profile
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Unweighted GPA (2.0-4.0)
    #[arg(long)]
    gpa: Option<f64>,

    /// SAT total (800-1600); selects SAT as the test type
    #[arg(long, conflicts_with = "act")]
    sat: Option<u32>,

    /// ACT composite (1-36); selects ACT as the test type
    #[arg(long)]
    act: Option<u32>,

    /// Number of AP/IB courses
    #[arg(long)]
    ap: Option<u32>,

    /// Extracurricular tier, 1 (highest impact) to 4
    #[arg(long)]
    ec_tier: Option<u8>,

    /// Held a leadership role (`--leadership=false` overrides the profile file)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    leadership: Option<bool>,

    /// First-generation college applicant (`--first-gen=false` overrides the profile file)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    first_gen: Option<bool>,

    /// Legacy applicant (`--legacy=false` overrides the profile file)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    legacy: Option<bool>,

    /// Annual family income in dollars
    #[arg(long)]
    income: Option<f64>,

    /// Intended major
    #[arg(long)]
    major: Option<String>,
}

impl ProfileArgs {
    fn resolve(&self) -> anyhow::Result<StudentProfile> {
        let mut profile = match &self.profile {
            Some(path) => load_profile(path)?,
            None => StudentProfile::default(),
        };

        if let Some(gpa) = self.gpa {
            profile.gpa = gpa;
        }
        if let Some(sat) = self.sat {
            profile.test_type = TestType::Sat;
            profile.sat_score = Some(sat);
        }
        if let Some(act) = self.act {
            profile.test_type = TestType::Act;
            profile.act_score = Some(act);
        }
        if let Some(ap) = self.ap {
            profile.ap_count = ap;
        }
        if let Some(tier) = self.ec_tier {
            profile.ec_tier = tier;
        }
        if let Some(leadership) = self.leadership {
            profile.leadership = leadership;
        }
        if let Some(first_gen) = self.first_gen {
            profile.first_gen = first_gen;
        }
        if let Some(legacy) = self.legacy {
            profile.legacy = legacy;
        }
        if let Some(income) = self.income {
            profile.family_income = income;
        }
        if let Some(major) = &self.major {
            profile.intended_major = major.clone();
        }

        Ok(profile)
    }
}

/// School type filter for `schools --type`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TypeFilter {
    Research,
    Lac,
}

impl From<TypeFilter> for SchoolType {
    fn from(filter: TypeFilter) -> Self {
        match filter {
            TypeFilter::Research => SchoolType::Research,
            TypeFilter::Lac => SchoolType::Lac,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the schools in the catalog
    Schools {
        /// Only show one type
        #[arg(long = "type", value_enum)]
        school_type: Option<TypeFilter>,
    },
    /// Estimate admission chances at one school
    Chance {
        /// School name (or part of it)
        school: String,

        /// Sticker price for the net price estimate (overrides config)
        #[arg(long)]
        sticker_price: Option<f64>,

        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// List schools with chances closest to the given school
    Compare {
        /// School name (or part of it)
        school: String,

        /// Maximum number of schools to show
        #[arg(long, default_value_t = DEFAULT_COMPARABLE_LIMIT)]
        limit: usize,

        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Ask the narrative service to explain the estimate
    Explain {
        /// School name (or part of it)
        school: String,

        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Write a config file
    Init {
        /// Overwrite an existing config without asking
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "admit-odds")]
#[command(about = "Estimate admission chances at selective schools", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/admit-odds/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();

    if let Err(e) = admit_odds::telemetry::init(cli.verbose) {
        eprintln!("Logging disabled: {}", e);
    }

    let config_path = cli.config.map(PathBuf::from);
    let use_colors = !cli.no_color && output::should_use_colors();

    if let Commands::Init { force } = cli.command {
        if let Err(e) = run_init(config_path, force) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let source = dataset_source(&config);
    let catalog = match load_catalog(&source).await {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Dataset error: {}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    if catalog.is_empty() {
        eprintln!("No eligible schools in dataset {}", source);
        std::process::exit(EXIT_NETWORK);
    }

    let code = match cli.command {
        Commands::Schools { school_type } => {
            let listing = match school_type {
                Some(kind) => output::format_school_list(catalog.of_type(kind.into()), use_colors),
                None => output::format_school_list(catalog.iter(), use_colors),
            };
            println!("{}", listing);
            EXIT_SUCCESS
        }
        Commands::Chance {
            school,
            sticker_price,
            profile,
        } => {
            let mut session = open_session(catalog, &profile, &config, &school);
            let sticker = sticker_price.unwrap_or(config.sticker_price);
            print_chance(&mut session, sticker, use_colors);
            EXIT_SUCCESS
        }
        Commands::Compare {
            school,
            limit,
            profile,
        } => {
            let session = open_session(catalog, &profile, &config, &school);
            if let Some((result, comparables)) = session.comparables(limit) {
                println!(
                    "Schools closest to {} at {}:",
                    session.selected_school().map(|s| s.name.as_str()).unwrap_or(school.as_str()),
                    output::format_probability(result.probability)
                );
                println!("{}", output::format_comparables_table(&comparables, use_colors));
            }
            EXIT_SUCCESS
        }
        Commands::Explain { school, profile } => {
            let mut session = open_session(catalog, &profile, &config, &school);
            print_chance(&mut session, config.sticker_price, use_colors);

            let service = Arc::new(HttpNarrativeService::from_config(&config.explain));
            session.request_explanation(service);
            eprintln!("Asking {} for an explanation...", config.explain.model);

            println!();
            match session.wait_explanation().await {
                Some(explanation) => {
                    if let Explanation::RawFallback(_) = explanation {
                        eprintln!("Reply was not in the expected format; showing it unparsed.");
                    }
                    println!("{}", output::format_explanation(&explanation, use_colors));
                }
                None => println!("No explanation received."),
            }
            EXIT_SUCCESS
        }
        Commands::Init { .. } => EXIT_SUCCESS,
    };

    std::process::exit(code);
}

/// Resolve and validate the profile, then select `school`. Exits on bad input.
fn open_session(
    catalog: Arc<Catalog>,
    args: &ProfileArgs,
    config: &Config,
    school: &str,
) -> Session {
    let profile = match args.resolve() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Profile error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = validate_profile(&profile) {
        eprintln!("Profile errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let mut session = Session::new(catalog, profile, config.explain.timeout());
    if session.select_by_name(school).is_none() {
        eprintln!("No school matching '{}'. Run `admit-odds schools` to list them.", school);
        std::process::exit(EXIT_CONFIG);
    }
    session
}

fn print_chance(session: &mut Session, sticker_price: f64, use_colors: bool) {
    let income = session.profile().family_income;
    let Some(result) = session.chance().cloned() else {
        return;
    };
    let Some(school) = session.selected_school() else {
        return;
    };
    let net_price = estimate_net_price(sticker_price, school.average_aid, income);
    println!("{}", output::format_chance(school, &result, net_price, use_colors));
}
