use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use dog_fetch::app::{App, FetchResult, ProgressSink};
use dog_fetch::config::{ConfigLoader, ConfigOverrides, ResolvedConfig};
use dog_fetch::dog_ceo::{DogApiClient, DogCeoHttpClient};
use dog_fetch::domain::FailurePolicy;
use dog_fetch::error::DogError;
use dog_fetch::output::{JsonOutput, OutputMode, TextOutput};
use dog_fetch::session::{Session, SessionCommand};

#[derive(Parser)]
#[command(name = "dogfetch")]
#[command(about = "Browse dog breeds and fetch a random image for each selected breed")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SettingsArgs {
    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// What to do when one breed's image cannot be fetched
    #[arg(long, global = true, value_enum)]
    failure_policy: Option<FailurePolicy>,
}

impl SettingsArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_base_url: self.base_url.clone(),
            request_timeout_secs: self.timeout,
            failure_policy: self.failure_policy,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List every breed and sub-breed in the catalog")]
    Breeds,
    #[command(about = "Fetch one random image for each named breed")]
    Images(ImagesArgs),
    #[command(about = "Interactive session: toggle breeds, show images, go back")]
    Session,
}

#[derive(Args)]
struct ImagesArgs {
    /// Breed names as listed by `breeds`, or API paths such as `shiba/inu`
    #[arg(required = true)]
    breeds: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(report) = run().await {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<DogError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &DogError) -> u8 {
    match error {
        DogError::UnknownBreed(_)
        | DogError::ConfigRead(_)
        | DogError::ConfigParse(_) => 2,
        DogError::TaxonomyHttp(_)
        | DogError::TaxonomyStatus { .. }
        | DogError::MalformedTaxonomy(_)
        | DogError::ImageHttp(_)
        | DogError::ImageStatus { .. }
        | DogError::MalformedImage(_) => 3,
        _ => 1,
    }
}

async fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let config = ConfigLoader::resolve(cli.settings.config.as_deref())?;
    let config = cli.settings.overrides().apply(config);
    let client = DogCeoHttpClient::new(&config.api_base_url, config.request_timeout)?;
    let app = App::new(client, config.failure_policy);

    match cli.command {
        Some(Commands::Breeds) => run_breeds(&app, output_mode).await,
        Some(Commands::Images(args)) => run_images(args, &app, output_mode).await,
        Some(Commands::Session) => run_session(&app, &config, output_mode).await,
        None => match output_mode {
            OutputMode::Interactive => run_session(&app, &config, output_mode).await,
            OutputMode::NonInteractive => Err(miette::Report::msg(
                "command required (try `dogfetch --help`)",
            )),
        },
    }
}

fn progress_sink(output_mode: OutputMode) -> &'static dyn ProgressSink {
    match output_mode {
        OutputMode::Interactive => &TextOutput,
        OutputMode::NonInteractive => &JsonOutput,
    }
}

fn print_fetch(result: &FetchResult, output_mode: OutputMode) -> miette::Result<()> {
    match output_mode {
        OutputMode::Interactive => TextOutput::print_fetch(result).into_diagnostic(),
        OutputMode::NonInteractive => JsonOutput::print_fetch(result).into_diagnostic(),
    }
}

async fn run_breeds<C: DogApiClient>(app: &App<C>, output_mode: OutputMode) -> miette::Result<()> {
    let catalog = app.load_catalog(progress_sink(output_mode)).await;
    match output_mode {
        OutputMode::Interactive => {
            TextOutput::print_catalog(&catalog, &Default::default()).into_diagnostic()
        }
        OutputMode::NonInteractive => JsonOutput::print_catalog(&catalog).into_diagnostic(),
    }
}

async fn run_images<C: DogApiClient>(
    args: ImagesArgs,
    app: &App<C>,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let sink = progress_sink(output_mode);
    let catalog = app.load_catalog(sink).await;
    if catalog.is_empty() {
        return Err(miette::Report::msg(
            "breed list unavailable, cannot resolve breed names",
        ));
    }

    let mut session = Session::new(catalog);
    for name in &args.breeds {
        let id = session.catalog().resolve(name)?;
        if !session.selection().contains(&id) {
            session.toggle(&id);
        }
    }

    let result = session.request_show_images(app, sink).await?;
    print_fetch(result, output_mode)
}

async fn run_session<C: DogApiClient>(
    app: &App<C>,
    config: &ResolvedConfig,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let sink = progress_sink(output_mode);
    let mut session = Session::new(app.load_catalog(sink).await);
    for name in &config.breeds {
        match session.catalog().resolve(name) {
            Ok(id) => {
                if !session.selection().contains(&id) {
                    session.toggle(&id);
                }
            }
            Err(err) => warn!(error = %err, "skipping preselected breed"),
        }
    }

    if matches!(output_mode, OutputMode::Interactive) {
        eprintln!(
            "{} breeds loaded. Commands: list, toggle <breed>, clear, selected, show, back, status, quit",
            session.catalog().len()
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.into_diagnostic()? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        if let Err(err) = apply_command(&mut session, command, app, output_mode).await {
            eprintln!("{err}");
        }
    }
    Ok(())
}

async fn apply_command<C: DogApiClient>(
    session: &mut Session,
    command: SessionCommand,
    app: &App<C>,
    output_mode: OutputMode,
) -> miette::Result<()> {
    match command {
        SessionCommand::List => match output_mode {
            OutputMode::Interactive => {
                TextOutput::print_catalog(session.catalog(), session.selection()).into_diagnostic()
            }
            OutputMode::NonInteractive => {
                JsonOutput::print_catalog(session.catalog()).into_diagnostic()
            }
        },
        SessionCommand::Toggle(name) => {
            let id = session.catalog().resolve(&name)?;
            let selected = session.toggle(&id);
            if matches!(output_mode, OutputMode::Interactive) {
                let verb = if selected { "selected" } else { "deselected" };
                eprintln!("{verb} {id}");
            }
            Ok(())
        }
        SessionCommand::Clear => {
            session.clear_selection();
            Ok(())
        }
        SessionCommand::Selected => match output_mode {
            OutputMode::Interactive => {
                TextOutput::print_selection(session.selection()).into_diagnostic()
            }
            OutputMode::NonInteractive => {
                JsonOutput::print_selection(session.selection()).into_diagnostic()
            }
        },
        SessionCommand::Show => {
            let result = session
                .request_show_images(app, progress_sink(output_mode))
                .await?;
            print_fetch(result, output_mode)
        }
        SessionCommand::Back => {
            session.request_back()?;
            Ok(())
        }
        SessionCommand::Status => match output_mode {
            OutputMode::Interactive => {
                println!(
                    "view={} selected={} catalog={}",
                    session.view(),
                    session.selection().len(),
                    session.catalog().len()
                );
                Ok(())
            }
            OutputMode::NonInteractive => JsonOutput::print_session(session).into_diagnostic(),
        },
        SessionCommand::Quit => Ok(()),
    }
}
