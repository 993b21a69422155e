use loadorder_rs::{ActivationSequence, EngineVersion, Registry, ResolverBuilder, ResolverConfig, load_catalog};

fn main() {
	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",         "Show help");
		opts.optflag( "v", "verbose",      "Increased vebosity");
		opts.optflag( "f", "fix",          "Print the automatically fixed load order");
		opts.optopt(  "c", "catalog",      "JSON catalog of installed packages", "FILE");
		opts.optopt(  "a", "active",       "Active package ids, one per line", "FILE");
		opts.optopt(  "e", "engine",       "Running engine version", "VERSION");
		opts.optopt(  "",  "version-file", "Read the engine version from a game version file", "FILE");
		opts.optopt(  "",  "config",       "Resolver config file", "FILE");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: loadorder-rs-terminal -c CATALOG -a ACTIVE [options]"));
			return;
		}

		parsed_options
	};

	{
		let default_filter = if parsed_options.opt_present("v") { "debug" } else { "warn" };
		env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
	}

	match run(&parsed_options) {
		Ok(true) => {},
		Ok(false) => std::process::exit(1),
		Err(e) => {
			log::error!("{}", e);
			std::process::exit(2);
		},
	}
}

/// Returns whether the printed order is free of problems.
fn run(parsed_options: &getopts::Matches) -> Result<bool, Error> {
	let config = match parsed_options.opt_str("config") {
		Some(path) => ResolverConfig::load_from_path(path).unwrap_or_else(|e| {
			log::warn!("Failed to read config file: {}", e);
			log::warn!("Using default config.");
			ResolverConfig::default()
		}),
		None => ResolverConfig::default(),
	};

	let catalog_path = parsed_options.opt_str("c").ok_or(Error::MissingArgument("--catalog"))?;
	let active_path = parsed_options.opt_str("a").ok_or(Error::MissingArgument("--active"))?;

	let engine = if let Some(version) = parsed_options.opt_str("e") {
		EngineVersion::new(version)
	} else if let Some(path) = parsed_options.opt_str("version-file") {
		let text = std::fs::read_to_string(&path).map_err(loadorder_rs::Error::from)?;
		EngineVersion::from_version_text(&text).ok_or(Error::EngineVersion(path))?
	} else {
		return Err(Error::MissingArgument("--engine or --version-file"));
	};

	log::debug!("Reading catalog from {}", catalog_path);
	let file = std::fs::File::open(&catalog_path).map_err(loadorder_rs::Error::from)?;
	let records = load_catalog(std::io::BufReader::new(file), &config)?;
	let registry = Registry::build(records, &config);

	let activation = read_active_list(&active_path)?;
	log::info!("{} packages installed, {} active, engine {}", registry.len(), activation.len(), engine);

	let resolver = ResolverBuilder::new(&registry)
		.engine_version(engine)
		.activation(activation)
		.build();

	let (entries, problems) = if parsed_options.opt_present("f") {
		let resolution = resolver.resolve();
		(resolution.entries, resolution.problems)
	} else {
		(resolver.activation().clone(), resolver.problems())
	};

	for entry in entries.entries() {
		println!("[{}] {}", if entry.enabled { "x" } else { " " }, entry.package_id);
	}

	if problems.is_empty() {
		println!("No problems found.");
	} else {
		println!("Problems:");
		for problem in &problems {
			println!("\t{}", problem.describe(&registry));
		}
	}

	Ok(problems.is_empty())
}

/// Blank lines and `#` comments are skipped.
fn read_active_list(path: &str) -> Result<ActivationSequence, Error> {
	let text = std::fs::read_to_string(path).map_err(loadorder_rs::Error::from)?;
	Ok(ActivationSequence::from_enabled_ids(
		text.lines()
			.map(str::trim)
			.filter(|l| !l.is_empty() && !l.starts_with('#'))
	))
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("loadorder-rs error: {0}")]
	LoadOrderError(#[from] loadorder_rs::Error),
	#[error("Missing argument {0}")]
	MissingArgument(&'static str),
	#[error("No engine version found in {0}")]
	EngineVersion(String),
}
