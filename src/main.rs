use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use imgix_url::config::BuilderConfig;
use imgix_url::logging::LogFormat;
use imgix_url::signing::SignatureAlgorithm;
use imgix_url::srcset::target_widths_between;
use imgix_url::{ParameterMap, UrlBuilder};
use std::path::PathBuf;

/// imgix-url - build signed image CDN URLs and srcset attributes
#[derive(Parser, Debug)]
#[command(name = "imgix-url")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one URL
    Url(UrlArgs),
    /// Print a srcset attribute value
    Srcset(UrlArgs),
    /// Print the width series, one width per line
    Widths {
        #[arg(long, default_value_t = imgix_url::srcset::MIN_WIDTH)]
        min: u32,
        #[arg(long, default_value_t = imgix_url::srcset::MAX_WIDTH)]
        max: u32,
        #[arg(long, default_value_t = imgix_url::srcset::INCREMENT_PERCENTAGE)]
        tolerance: f64,
    },
}

#[derive(Args, Debug)]
struct UrlArgs {
    /// Source image path
    path: String,

    /// Transformation parameter, repeatable (e.g. -p w=300 -p ar=3:2)
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Path to YAML configuration file
    #[arg(short, long, conflicts_with = "domain")]
    config: Option<PathBuf>,

    /// CDN domain (when no configuration file is given)
    #[arg(short, long)]
    domain: Option<String>,

    /// Signing token
    #[arg(short, long, env = "IMGIX_TOKEN")]
    token: Option<String>,

    /// Signature digest
    #[arg(long, default_value = "md5", conflicts_with = "config")]
    algorithm: SignatureAlgorithm,

    /// Use plain http
    #[arg(long, conflicts_with = "config")]
    http: bool,

    /// Leave out the ixlib parameter
    #[arg(long, conflicts_with = "config")]
    no_library_param: bool,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

impl UrlArgs {
    fn builder(&self) -> Result<UrlBuilder> {
        let mut config = match (&self.config, &self.domain) {
            (Some(path), _) => BuilderConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            (None, Some(domain)) => {
                let mut config = BuilderConfig::new(domain.clone());
                config.use_https = !self.http;
                config.include_library_param = !self.no_library_param;
                config.signature_algorithm = self.algorithm;
                config
            }
            (None, None) => return Err(anyhow!("either --config or --domain is required")),
        };

        if let Some(token) = &self.token {
            config.sign_key = Some(token.clone());
        }

        config.validate()?;

        tracing::info!(
            domain = %config.domain,
            signed = config.sign_key.is_some(),
            algorithm = config.signature_algorithm.as_str(),
            "Configuration loaded successfully"
        );

        Ok(UrlBuilder::from_config(&config)?)
    }

    fn param_map(&self) -> ParameterMap {
        self.params.iter().cloned().collect()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    imgix_url::logging::init_subscriber(cli.log_format)
        .map_err(|e| anyhow!("Failed to initialize logging subsystem: {}", e))?;

    match cli.command {
        Command::Url(args) => {
            let url = args.builder()?.create_url(&args.path, &args.param_map())?;
            println!("{}", url);
        }
        Command::Srcset(args) => {
            let srcset = args.builder()?.create_srcset(&args.path, &args.param_map())?;
            println!("{}", srcset);
        }
        Command::Widths {
            min,
            max,
            tolerance,
        } => {
            for width in target_widths_between(min, max, tolerance)? {
                println!("{}", width);
            }
        }
    }

    Ok(())
}
