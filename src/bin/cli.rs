//! Skilldesk CLI
//!
//! Command-line front end for browsing and editing the skill catalog.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use skilldesk::api::{is_valid_email, AuthService, HttpCatalogClient, RegisterUser};
use skilldesk::catalog::{
    BoardView, MutationCoordinator, PhotoFile, Skill, SkillBoard, SkillDraft, SkillFields,
    SkillId, SKILL_DESCRIPTIONS, SKILL_LEVELS, SKILL_NAMES, SKILL_TECHNOLOGIES,
};
use skilldesk::config::{self, Config, LogFormat};
use skilldesk::error::ValidationErrors;
use skilldesk::session::{Session, SessionFile};
use skilldesk::VERSION;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "skilldesk",
    author = "Skilldesk Contributors",
    version = VERSION,
    about = "Skilldesk - manage your organization's skill catalog",
    long_about = None
)]
struct Cli {
    /// Catalog service base URL (overrides config)
    #[arg(long, env = "SKILLDESK_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// Create a user account
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        /// Job title
        #[arg(long)]
        role: Option<String>,
    },

    /// List skills, optionally filtered
    List {
        /// Search name, description and technology
        #[arg(short, long, default_value = "")]
        query: String,
        /// Page to show (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Create a skill
    Create {
        #[command(flatten)]
        fields: FieldArgs,
        /// Image to upload after the skill is created
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Edit a skill's fields
    Edit {
        id: SkillId,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Replace a skill's photo
    Photo {
        id: SkillId,
        path: PathBuf,
    },

    /// Show one skill
    Show {
        id: SkillId,
        /// Write the skill's photo to this file
        #[arg(long)]
        save_photo: Option<PathBuf>,
    },

    /// Delete a skill
    Delete {
        id: SkillId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the accepted values for each field
    Options,

    /// Show the effective configuration
    Config {
        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(clap::Args, Default)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    technology: Option<String>,
    #[arg(long)]
    level: Option<String>,
}

/// Everything a command needs to talk to the catalog
struct App {
    config: Config,
    session_file: SessionFile,
    client: HttpCatalogClient,
}

impl App {
    fn new(config: Config) -> anyhow::Result<Self> {
        let session_file = SessionFile::default_location();
        let session = session_file
            .load()
            .with_context(|| format!("reading {}", session_file.path().display()))?;
        let client = HttpCatalogClient::new(&config.api, session)?;
        Ok(App {
            config,
            session_file,
            client,
        })
    }

    fn session(&self) -> &Session {
        self.client.session()
    }

    fn auth(&self) -> AuthService {
        AuthService::new(self.client.clone())
    }

    /// A board loaded from the service; fails if nobody is logged in or the
    /// list cannot be fetched
    async fn board(&self) -> anyhow::Result<SkillBoard> {
        if !self.session().is_authenticated().await {
            bail!("not logged in, run `skilldesk login` first");
        }

        let coordinator = MutationCoordinator::new(Arc::new(self.client.clone()));
        let mut board = SkillBoard::with_page_size(coordinator, self.config.board.page_size);
        if !board.load().await {
            bail!("could not load skills from {}", self.client.base_url());
        }
        Ok(board)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Runs before loading so a broken config file can still be reported
    if let Some(Commands::Config { init }) = cli.command {
        return show_config(cli.api_url, init);
    }

    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    init_logging(&config);

    let app = App::new(config)?;

    match cli.command {
        Some(Commands::Login { email }) => login(&app, email).await,
        Some(Commands::Logout) => logout(&app).await,
        Some(Commands::Register { name, email, role }) => register(&app, name, email, role).await,
        Some(Commands::List { query, page }) => list(&app, &query, page).await,
        Some(Commands::Create { fields, photo }) => create(&app, fields, photo).await,
        Some(Commands::Edit { id, fields }) => edit(&app, id, fields).await,
        Some(Commands::Photo { id, path }) => replace_photo(&app, id, path).await,
        Some(Commands::Show { id, save_photo }) => show(&app, id, save_photo).await,
        Some(Commands::Delete { id, yes }) => delete(&app, id, yes).await,
        Some(Commands::Options) => {
            print_options();
            Ok(())
        }
        Some(Commands::Config { init }) => show_config(Some(app.config.api.base_url.clone()), init),
        None => browse(&app).await,
    }
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.log.level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed
    let _ = match config.log.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

// ============================================================================
// Prompts
// ============================================================================

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

fn prompt(message: &str) -> anyhow::Result<String> {
    Ok(Input::<String>::with_theme(&theme())
        .with_prompt(message)
        .interact_text()?)
}

fn prompt_password(message: &str) -> anyhow::Result<String> {
    Ok(Password::with_theme(&theme())
        .with_prompt(message)
        .interact()?)
}

/// Ask for a new password twice
fn prompt_new_password() -> anyhow::Result<String> {
    Ok(Password::with_theme(&theme())
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?)
}

/// Pick one of `options`, starting on `current` when it is one of them
fn choose(message: &str, options: &[&str], current: Option<&str>) -> anyhow::Result<String> {
    let default = current
        .and_then(|c| options.iter().position(|o| *o == c))
        .unwrap_or(0);
    let index = Select::with_theme(&theme())
        .with_prompt(message)
        .items(options)
        .default(default)
        .interact()?;
    Ok(options[index].to_string())
}

/// Use the flag value, or ask for one of `options`
fn field_or_choose(
    value: Option<String>,
    label: &str,
    options: &[&str],
    existing: Option<&str>,
) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => choose(label, options, existing),
    }
}

/// Fill in whatever the flags left out, offering the current values
fn complete_fields(args: FieldArgs, current: Option<&SkillFields>) -> anyhow::Result<SkillFields> {
    Ok(SkillFields {
        name: field_or_choose(args.name, "Name", SKILL_NAMES, current.map(|c| c.name.as_str()))?,
        description: field_or_choose(
            args.description,
            "Description",
            SKILL_DESCRIPTIONS,
            current.map(|c| c.description.as_str()),
        )?,
        technology: field_or_choose(
            args.technology,
            "Technology",
            SKILL_TECHNOLOGIES,
            current.map(|c| c.technology.as_str()),
        )?,
        level: field_or_choose(args.level, "Level", SKILL_LEVELS, current.map(|c| c.level.as_str()))?,
    })
}

// ============================================================================
// Rendering
// ============================================================================

fn print_skill(skill: &Skill) {
    let photo = if skill.photo.is_some() {
        style("📷").to_string()
    } else {
        String::new()
    };
    println!(
        "  {} {}  {}",
        style(format!("#{:<4}", skill.id)).dim(),
        style(&skill.name).bold(),
        photo
    );
    println!(
        "        {} · {} · {}",
        skill.description.trim(),
        style(&skill.technology).cyan(),
        skill.level
    );
}

fn print_view(view: &BoardView<'_>, query: &str) {
    println!();
    if view.items.is_empty() {
        if query.trim().is_empty() {
            println!("  {}", style("No skills registered.").dim());
        } else {
            println!("  {} \"{}\"", style("No skills match").dim(), query);
        }
    }
    for skill in &view.items {
        print_skill(skill);
    }
    println!();
    println!(
        "  Page {} of {}  ·  {} shown of {} skills",
        view.page,
        view.page_count,
        view.matched,
        view.total
    );
}

fn print_options() {
    let groups: [(&str, &[&str]); 4] = [
        ("Names", SKILL_NAMES),
        ("Descriptions", SKILL_DESCRIPTIONS),
        ("Technologies", SKILL_TECHNOLOGIES),
        ("Levels", SKILL_LEVELS),
    ];
    for (label, options) in groups {
        println!("{}", style(label).bold());
        for option in options {
            println!("  - {}", option.trim());
        }
    }
}

const REQUEST_FAILED: &str = "request failed, see the log above";

fn report(ok: bool, success: &str) -> anyhow::Result<()> {
    if ok {
        println!("{} {}", style("✓").green(), success);
        Ok(())
    } else {
        bail!(REQUEST_FAILED)
    }
}

/// Like `report`, but for the interactive browser, which keeps going
fn announce(ok: bool, success: &str) {
    if ok {
        println!("{} {}", style("✓").green(), success);
    } else {
        println!("{} {}", style("✗").red(), REQUEST_FAILED);
    }
    pause();
}

fn print_field_errors(errors: &ValidationErrors) {
    for (field, message) in errors.iter() {
        println!("  {} {}: {}", style("✗").red(), field, message);
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn login(app: &App, email: Option<String>) -> anyhow::Result<()> {
    let email = match email {
        Some(e) => e,
        None => prompt("Email")?,
    };
    let senha = prompt_password("Password")?;

    if let Err(e) = app.auth().login(&email, &senha).await {
        if e.remote().is_some_and(|r| r.is_unauthorized()) {
            bail!("wrong email or password");
        }
        return Err(e.into());
    }
    app.session_file.save(app.session()).await?;
    println!("{} Logged in as {}", style("✓").green(), style(&email).cyan());
    Ok(())
}

async fn logout(app: &App) -> anyhow::Result<()> {
    let Some(email) = app.session().email().await else {
        println!("{} Not logged in", style("!").yellow());
        return Ok(());
    };
    app.auth().logout().await;
    app.session_file.save(app.session()).await?;
    println!("{} Logged out {}", style("✓").green(), style(&email).cyan());
    Ok(())
}

async fn register(
    app: &App,
    name: Option<String>,
    email: Option<String>,
    role: Option<String>,
) -> anyhow::Result<()> {
    let user = RegisterUser {
        nome: match name {
            Some(n) => n,
            None => prompt("Name")?,
        },
        email: match email {
            Some(e) => e,
            None => prompt("Email")?,
        },
        senha: String::new(),
        cargo: match role {
            Some(r) => r,
            None => prompt("Role")?,
        },
    };
    if !is_valid_email(user.email.trim()) {
        bail!("{} is not a valid email address", user.email);
    }
    let user = RegisterUser {
        senha: prompt_new_password()?,
        ..user
    };

    if let Err(e) = app.auth().register(&user).await {
        if let Some(errors) = e.validation() {
            print_field_errors(errors);
            bail!("account not created");
        }
        return Err(e.into());
    }
    println!(
        "{} Account created. Run {} to continue.",
        style("✓").green(),
        style("skilldesk login").cyan()
    );
    Ok(())
}

async fn list(app: &App, query: &str, page: usize) -> anyhow::Result<()> {
    let mut board = app.board().await?;
    board.set_query(query);
    board.go_to(page);
    print_view(&board.view(), query);
    Ok(())
}

async fn create(app: &App, args: FieldArgs, photo: Option<PathBuf>) -> anyhow::Result<()> {
    let fields = complete_fields(args, None)?;
    let mut draft = SkillDraft::new(fields);
    if let Some(path) = photo {
        draft = draft.with_photo(PhotoFile::from_path(&path).await?);
    }

    let mut board = app.board().await?;
    match board.submit_new(draft).await {
        Ok(ok) => report(ok, "Skill created"),
        Err(errors) => {
            print_field_errors(&errors);
            bail!("skill not created")
        }
    }
}

async fn edit(app: &App, id: SkillId, args: FieldArgs) -> anyhow::Result<()> {
    let mut board = app.board().await?;
    let current = board
        .store()
        .get(id)
        .map(Skill::fields)
        .with_context(|| format!("skill {} not found", id))?;

    let fields = complete_fields(args, Some(&current))?;
    let ok = board.submit_edit(id, fields).await;
    report(ok, "Skill updated")
}

async fn replace_photo(app: &App, id: SkillId, path: PathBuf) -> anyhow::Result<()> {
    let photo = PhotoFile::from_path(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let mut board = app.board().await?;
    let ok = board.replace_photo(Some(id), photo).await;
    report(ok, "Photo replaced")
}

async fn show(app: &App, id: SkillId, save_photo: Option<PathBuf>) -> anyhow::Result<()> {
    let board = app.board().await?;
    let skill = board
        .store()
        .get(id)
        .with_context(|| format!("skill {} not found", id))?;
    print_skill(skill);

    if let Some(path) = save_photo {
        let Some(bytes) = skill.photo_bytes()? else {
            bail!("skill {} has no photo", id);
        };
        tokio::fs::write(&path, bytes).await?;
        println!("{} Photo saved to {}", style("✓").green(), path.display());
    }
    Ok(())
}

async fn delete(app: &App, id: SkillId, yes: bool) -> anyhow::Result<()> {
    let mut board = app.board().await?;
    let Some(skill) = board.store().get(id) else {
        bail!("skill {} not found", id);
    };

    if !yes {
        let confirmed = Confirm::with_theme(&theme())
            .with_prompt(format!("Delete #{} {}?", skill.id, skill.name))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    let ok = board.remove(id).await;
    report(ok, "Skill deleted")
}

fn show_config(api_url: Option<String>, init: bool) -> anyhow::Result<()> {
    let path = config::config_path();
    let snapshot = config::read_config_snapshot(&path);
    dotenvy::dotenv().ok();
    let mut settings = snapshot.effective(|key| std::env::var(key).ok());
    if let Some(url) = api_url {
        settings.api.base_url = url;
    }
    init_logging(&settings);

    if init {
        if snapshot.is_broken() {
            bail!("{} could not be read; fix or remove it first", path.display());
        }
        config::save_config(&settings, &path)?;
        println!("{} Wrote {}", style("✓").green(), path.display());
    }

    println!("{}", style("Configuration").bold());
    if snapshot.exists || init {
        println!("  file:      {}", path.display());
    } else {
        println!("  file:      {} {}", path.display(), style("(not found, using defaults)").dim());
    }
    if snapshot.is_broken() {
        for issue in &snapshot.issues {
            println!("  {} {}", style("✗").red(), issue);
        }
        println!("      └─ {}", style("showing defaults and environment overrides").dim());
    }
    println!("  api:       {}", style(&settings.api.base_url).cyan());
    println!("  timeout:   {}", humantime_serde::re::humantime::format_duration(settings.api.timeout));
    println!("  page size: {}", settings.board.page_size);

    let result = config::validate_config(&settings);
    for issue in result.errors.iter() {
        println!("  {} {}: {}", style("✗").red(), issue.path, issue.message);
        if let Some(ref hint) = issue.suggestion {
            println!("      └─ {}", style(hint).dim());
        }
    }
    for issue in result.warnings.iter() {
        println!("  {} {}: {}", style("!").yellow(), issue.path, issue.message);
    }
    Ok(())
}

// ============================================================================
// Interactive browser
// ============================================================================

const ACTIONS: &[&str] = &[
    "Next page",
    "Previous page",
    "Search",
    "Add skill",
    "Edit skill",
    "Replace photo",
    "Delete skill",
    "Reload",
    "Exit",
];
const EXIT: usize = 8;

async fn browse(app: &App) -> anyhow::Result<()> {
    let mut board = app.board().await?;
    let user = app.session().email().await.unwrap_or_default();

    loop {
        let term = Term::stdout();
        let _ = term.clear_screen();
        println!("{}  {}", style("Skill catalog").bold().cyan(), style(&user).dim());
        if !board.query().is_empty() {
            println!("  search: {}", style(board.query()).yellow());
        }
        let view = board.view();
        print_view(&view, board.query());
        let has_next = view.has_next();
        println!();

        let selection = Select::with_theme(&theme())
            .with_prompt("What would you like to do?")
            .items(ACTIONS)
            .default(if has_next { 0 } else { 2 })
            .interact()?;
        if selection == EXIT {
            break;
        }

        if let Err(e) = browse_action(&mut board, selection).await {
            println!("{} {:#}", style("✗").red(), e);
            pause();
        }
    }

    Ok(())
}

/// Run one menu action; errors are shown and the browser keeps going
async fn browse_action(board: &mut SkillBoard, selection: usize) -> anyhow::Result<()> {
    match selection {
        0 => {
            board.next_page();
        }
        1 => {
            board.prev_page();
        }
        2 => {
            let query: String = Input::with_theme(&theme())
                .with_prompt("Search")
                .allow_empty(true)
                .interact_text()?;
            board.set_query(query);
        }
        3 => {
            let fields = complete_fields(FieldArgs::default(), None)?;
            let path: String = Input::with_theme(&theme())
                .with_prompt("Photo path (empty for none)")
                .allow_empty(true)
                .interact_text()?;
            let mut draft = SkillDraft::new(fields);
            if !path.trim().is_empty() {
                draft = draft.with_photo(read_photo(path.trim()).await?);
            }
            match board.submit_new(draft).await {
                Ok(ok) => announce(ok, "Skill created"),
                Err(errors) => {
                    print_field_errors(&errors);
                    pause();
                }
            }
        }
        4 => {
            let id = pick_skill(board)?;
            let current = board
                .store()
                .get(id)
                .map(Skill::fields)
                .with_context(|| format!("skill {} not found", id))?;
            let fields = complete_fields(FieldArgs::default(), Some(&current))?;
            let ok = board.submit_edit(id, fields).await;
            announce(ok, "Skill updated");
        }
        5 => {
            let id = pick_skill(board)?;
            let path = prompt("Photo path")?;
            let photo = read_photo(path.trim()).await?;
            let ok = board.replace_photo(Some(id), photo).await;
            announce(ok, "Photo replaced");
        }
        6 => {
            let id = pick_skill(board)?;
            let confirmed = Confirm::with_theme(&theme())
                .with_prompt(format!("Delete skill #{}?", id))
                .default(false)
                .interact()?;
            if confirmed {
                let ok = board.remove(id).await;
                announce(ok, "Skill deleted");
            }
        }
        7 => {
            let ok = board.load().await;
            announce(ok, "Skills reloaded");
        }
        _ => {}
    }
    Ok(())
}

async fn read_photo(path: &str) -> anyhow::Result<PhotoFile> {
    PhotoFile::from_path(path)
        .await
        .with_context(|| format!("reading {}", path))
}

/// Choose a skill from the current page
fn pick_skill(board: &SkillBoard) -> anyhow::Result<SkillId> {
    let view = board.view();
    if view.items.is_empty() {
        bail!("no skills on this page to choose from");
    }
    let labels: Vec<String> = view
        .items
        .iter()
        .map(|s| format!("#{} {} ({})", s.id, s.name, s.technology))
        .collect();
    let index = Select::with_theme(&theme())
        .with_prompt("Which skill?")
        .items(&labels[..])
        .default(0)
        .interact()?;
    Ok(view.items[index].id)
}

fn pause() {
    println!("\nPress Enter to continue...");
    let _ = std::io::stdin().read_line(&mut String::new());
}
