use std::error::Error;
use std::fs;
use std::path::PathBuf;

use atty::Stream;
use clap::{Parser, Subcommand, ValueEnum};
use eclipsesec_site::{
    ALL_TAG, Catalog, CatalogState, FileStore, MemoryDocument, SiteConfig, SiteError,
    SystemScheme, TagIndex, ThemeController, ToolRecord, compute_visible, render,
};
use serde_json::json;
use termimad::{FmtText, MadSkin, terminal_size};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "eclipsesec", about = "Inspect the EclipseSec site catalog and theme", version)]
pub struct Cli {
    /// Emit JSON instead of human-readable tables.
    #[arg(long, global = true)]
    json: bool,

    /// Tool catalog to load instead of the embedded one.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Site configuration (element ids, storage key, excluded tags).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Operations on the tool catalog.
    #[command(subcommand)]
    Tools(ToolsCommand),
    /// Operations on the stored theme preference.
    #[command(subcommand)]
    Theme(ThemeCommand),
}

#[derive(Subcommand, Debug)]
enum ToolsCommand {
    /// List tools visible under a tag and search filter.
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List the tags offered as filter buttons.
    Tags,
    /// Show one tool in full.
    Show {
        /// Tool name (case-insensitive).
        name: String,
    },
    /// Print the card grid and tag bar HTML for a filter.
    Render {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Exact tag to filter on; `all` disables the tag filter.
    #[arg(short, long, default_value = "all")]
    tag: String,
    /// Case-insensitive text matched against name, tagline, description, and tags.
    #[arg(short, long, default_value = "")]
    search: String,
}

impl FilterArgs {
    fn state(&self) -> CatalogState {
        CatalogState::new(self.tag.clone(), self.search.clone())
    }
}

#[derive(Subcommand, Debug)]
enum ThemeCommand {
    /// Print the theme a fresh page load would apply.
    Show {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Flip the theme and persist it.
    Toggle {
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(clap::Args, Debug)]
struct StoreArgs {
    /// JSON file holding the preference.
    #[arg(long, default_value = "eclipsesec-preferences.json")]
    store: PathBuf,
    /// Color scheme the system reports.
    #[arg(long, value_enum, default_value_t = SchemeArg::Light)]
    system: SchemeArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemeArg {
    Light,
    Dark,
}

impl From<SchemeArg> for SystemScheme {
    fn from(value: SchemeArg) -> Self {
        match value {
            SchemeArg::Light => SystemScheme::Light,
            SchemeArg::Dark => SystemScheme::Dark,
        }
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    match cli.command {
        Command::Tools(command) => {
            let catalog = load_catalog(cli.catalog.as_ref())?;
            match command {
                ToolsCommand::List { filter } => handle_list(&catalog, &config, &filter, cli.json),
                ToolsCommand::Tags => handle_tags(&catalog, &config, cli.json),
                ToolsCommand::Show { name } => handle_show(&catalog, &name, cli.json),
                ToolsCommand::Render { filter } => {
                    handle_render(&catalog, &config, &filter, cli.json)
                }
            }
        }
        Command::Theme(ThemeCommand::Show { store }) => {
            handle_theme(&config, store, false, cli.json)
        }
        Command::Theme(ThemeCommand::Toggle { store }) => {
            handle_theme(&config, store, true, cli.json)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_file(path: &PathBuf) -> Result<String, SiteError> {
    fs::read_to_string(path).map_err(|source| SiteError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<SiteConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(SiteConfig::from_json(&read_file(path)?)?),
        None => Ok(SiteConfig::default()),
    }
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog, SiteError> {
    match path {
        Some(path) => Ok(Catalog::from_json(&read_file(path)?)?),
        None => Ok(Catalog::builtin().clone()),
    }
}

fn handle_list(
    catalog: &Catalog,
    config: &SiteConfig,
    filter: &FilterArgs,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let state = filter.state();
    let visible = compute_visible(&state, catalog);
    let index = TagIndex::build(catalog, config.excluded_tags.as_slice());
    let suggestion = if index.contains(&state.active_tag) {
        None
    } else {
        index.suggest(&state.active_tag)
    };

    if as_json {
        let payload = json!({
            "tag": state.active_tag,
            "search": state.search_query,
            "suggestion": suggestion,
            "results": visible,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_tool_table(&visible);
        if let Some(suggestion) = suggestion {
            println!("Unknown tag \"{}\"; did you mean \"{suggestion}\"?", state.active_tag);
        }
    }
    Ok(())
}

fn handle_tags(
    catalog: &Catalog,
    config: &SiteConfig,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let index = TagIndex::build(catalog, config.excluded_tags.as_slice());
    if as_json {
        println!("{}", serde_json::to_string_pretty(index.as_slice())?);
    } else {
        for tag in &index {
            let count = if tag == ALL_TAG {
                catalog.len()
            } else {
                catalog.iter().filter(|r| r.has_tag(tag)).count()
            };
            println!("{tag:<12}  {count}");
        }
    }
    Ok(())
}

fn handle_show(catalog: &Catalog, name: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    let record = catalog
        .find(name)
        .ok_or_else(|| format!("No tool named {name:?}"))?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        print_record(record);
    }
    Ok(())
}

fn handle_render(
    catalog: &Catalog,
    config: &SiteConfig,
    filter: &FilterArgs,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let state = filter.state();
    let visible = compute_visible(&state, catalog);
    let index = TagIndex::build(catalog, config.excluded_tags.as_slice());
    let cards = render::render_cards_fragment(&visible).map_err(SiteError::from)?;
    let tags =
        render::render_tag_bar_fragment(&index, &state.active_tag, &config.catalog.tag_attribute)
            .map_err(SiteError::from)?;

    if as_json {
        let payload = json!({
            "visible": visible.len(),
            "empty": visible.is_empty(),
            "tag_bar": tags,
            "cards": cards,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{tags}");
        if visible.is_empty() {
            println!("<!-- no tools match; grid hidden, empty state shown -->");
        } else {
            println!("{cards}");
        }
    }
    Ok(())
}

fn handle_theme(
    config: &SiteConfig,
    args: StoreArgs,
    toggle: bool,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let mut page = MemoryDocument::new();
    let mut themes = ThemeController::new(FileStore::new(&args.store), config.theme.clone());
    themes.apply_initial_theme(&mut page, args.system.into());
    let theme = if toggle {
        themes.toggle_theme(&mut page)
    } else {
        themes.current(&page)
    };

    if as_json {
        let payload = json!({
            "theme": theme.as_str(),
            "stored": themes.stored().map(|t| t.as_str()),
            "store": args.store.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{theme}");
    }
    Ok(())
}

fn print_tool_table(rows: &[&ToolRecord]) {
    if rows.is_empty() {
        println!("No tools matched.");
        return;
    }
    let width = rows
        .iter()
        .map(|record| record.name.len())
        .max()
        .unwrap_or(4)
        .max("NAME".len());
    println!("{:<width$}  {}", "NAME", "TAGS", width = width);
    println!("{:-<width$}  {}", "", "----", width = width);
    for record in rows {
        println!("{:<width$}  {}", record.name, record.tags.join(", "), width = width);
    }
}

fn print_record(record: &ToolRecord) {
    println!("{} [{}]", record.name, record.status);
    println!("{}", record.tagline);
    println!("Tags: {}", record.tags.join(", "));
    if let Some(meta) = record.metadata_line() {
        println!("Meta: {meta}");
    }
    println!("GitHub: {}", record.github_url);
    if let Some(docs) = &record.docs_url {
        println!("Docs: {docs}");
    }
    render_markdown_block("Description", &record.description);
}

fn stdout_is_tty() -> bool {
    atty::is(Stream::Stdout)
}

fn markdown_width() -> usize {
    let (width, _) = terminal_size();
    width.max(60) as usize
}

fn render_markdown_block(title: &str, body: &str) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return;
    }
    println!("\n{title}:");
    if stdout_is_tty() {
        let skin = MadSkin::default();
        let formatted = FmtText::from(&skin, trimmed, Some(markdown_width()));
        println!("{formatted}");
    } else {
        println!("{trimmed}");
    }
}
